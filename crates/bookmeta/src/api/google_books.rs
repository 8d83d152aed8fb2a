//! Response model of the Google Books volumes API.
//!
//! Every field is optional: the API omits whatever it does not know about a volume, and a
//! missing value at any depth must leave the rest of the volume usable.

use serde::Deserialize;

/// The volumes search endpoint, the ISBN is appended to it.
pub const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes?q=isbn:";

/// Builds the lookup URL for `isbn` from the `endpoint` prefix.
///
/// Hyphens are removed from `isbn`, so `978-0-13-110362-7` is queried as `9780131103627` while
/// logs and the source row keep the hyphenated form.
#[must_use]
pub fn volumes_url(endpoint: &str, isbn: &str) -> String {
    // remove hypens from ISBN-13 (if applicable)
    let mut url = endpoint.to_owned();
    url.extend(isbn.chars().filter(|c| *c != '-'));
    url
}

/// The body of a volumes search.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Volumes {
    /// Matching volumes, `None` when the service found nothing.
    pub items: Option<Vec<Volume>>,
}

/// A single search hit.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Google Books volume id.
    pub id: Option<String>,
    /// Opaque revision tag of the volume resource.
    pub etag: Option<String>,
    /// Bibliographic section.
    pub volume_info: Option<VolumeInfo>,
    /// Sale section.
    pub sale_info: Option<SaleInfo>,
    /// Access section.
    pub access_info: Option<AccessInfo>,
}

/// Volume information from the Google Book API
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    /// Volume title.
    pub title: Option<String>,
    /// Volume subtitle.
    pub subtitle: Option<String>,
    /// Author names in credit order.
    pub authors: Option<Vec<String>>,
    /// Publisher name.
    pub publisher: Option<String>,
    /// Publication date, `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub published_date: Option<String>,
    /// Synopsis, may contain HTML.
    pub description: Option<String>,
    /// ISBNs and other identifiers of the volume.
    pub industry_identifiers: Option<Vec<IndustryIdentifier>>,
    /// Number of printed pages.
    pub page_count: Option<u64>,
    /// Subject categories.
    pub categories: Option<Vec<String>>,
    /// ISO 639-1 language code.
    pub language: Option<String>,
}

/// An identifier such as an ISBN, tagged by its type (`ISBN_10`, `ISBN_13`, `OTHER`..).
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct IndustryIdentifier {
    /// The identifier type tag.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// The identifier value.
    pub identifier: Option<String>,
}

/// Sale information, relative to the country of the request.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaleInfo {
    /// Country code the sale information applies to.
    pub country: Option<String>,
    /// `FOR_SALE`, `NOT_FOR_SALE`, `FREE`..
    pub saleability: Option<String>,
    /// Whether the volume is an ebook.
    pub is_ebook: Option<bool>,
}

/// Access information, relative to the country of the request.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessInfo {
    /// Country code the access information applies to.
    pub country: Option<String>,
    /// `PARTIAL`, `ALL_PAGES`, `NO_PAGES`..
    pub viewability: Option<String>,
    /// Whether the volume is in the public domain.
    pub public_domain: Option<bool>,
    /// Epub availability.
    pub epub: Option<Availability>,
    /// Pdf availability.
    pub pdf: Option<Availability>,
}

/// Whether a download format is offered.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    /// Whether the format can be downloaded.
    pub is_available: Option<bool>,
}
