//! The flat, fixed-schema book record and its construction from a lookup response.

use log::trace;

use crate::api::google_books::{
    AccessInfo, Availability, IndustryIdentifier, SaleInfo, Volume, VolumeInfo, Volumes,
};

/// Column names of an [`EnrichedRecord`], in output order.
pub const FIELD_NAMES: [&str; 21] = [
    "Id",
    "eTag",
    "Title",
    "Subtitle",
    "Author",
    "Publisher",
    "Published-Date",
    "Description",
    "ISBN_10",
    "ISBN_13",
    "PageCount",
    "Categories",
    "Language",
    "Sale_Info",
    "Saleability",
    "isEBook",
    "epub",
    "pdf",
    "Access_Info",
    "Viewability",
    "PublicDomain",
];

/// A book record flattened from a single lookup hit.
///
/// Every field holds the rendered cell value, empty when the lookup service did not provide it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnrichedRecord {
    id: String,
    etag: String,
    title: String,
    subtitle: String,
    author: String,
    publisher: String,
    published_date: String,
    description: String,
    isbn_10: String,
    isbn_13: String,
    page_count: String,
    categories: String,
    language: String,
    sale_info: String,
    saleability: String,
    is_ebook: String,
    epub: String,
    pdf: String,
    access_info: String,
    viewability: String,
    public_domain: String,
}

impl EnrichedRecord {
    /// The cell values in [`FIELD_NAMES`] order.
    #[must_use]
    pub fn values(&self) -> [&str; 21] {
        [
            self.id.as_str(),
            self.etag.as_str(),
            self.title.as_str(),
            self.subtitle.as_str(),
            self.author.as_str(),
            self.publisher.as_str(),
            self.published_date.as_str(),
            self.description.as_str(),
            self.isbn_10.as_str(),
            self.isbn_13.as_str(),
            self.page_count.as_str(),
            self.categories.as_str(),
            self.language.as_str(),
            self.sale_info.as_str(),
            self.saleability.as_str(),
            self.is_ebook.as_str(),
            self.epub.as_str(),
            self.pdf.as_str(),
            self.access_info.as_str(),
            self.viewability.as_str(),
            self.public_domain.as_str(),
        ]
    }

    /// The cell value of `column`, `None` if the column is not one of [`FIELD_NAMES`].
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        FIELD_NAMES
            .iter()
            .position(|name| *name == column)
            .map(|i| self.values()[i])
    }
}

/// Flattens the first volume of a lookup response into an [`EnrichedRecord`].
///
/// Returns `None` when the response has no volumes. Missing values at any depth are rendered as
/// empty cells.
#[must_use]
pub fn normalize(volumes: Volumes) -> Option<EnrichedRecord> {
    let Some(volume) = volumes.items.and_then(|items| items.into_iter().next()) else {
        trace!("Response has no items - nothing to normalize");
        return None;
    };

    // Deconstruct the volume to take ownership of fields (avoids cloning).
    let Volume {
        id,
        etag,
        volume_info,
        sale_info,
        access_info,
    } = volume;
    let VolumeInfo {
        title,
        subtitle,
        authors,
        publisher,
        published_date,
        description,
        industry_identifiers,
        page_count,
        categories,
        language,
    } = volume_info.unwrap_or_default();
    let SaleInfo {
        country: sale_country,
        saleability,
        is_ebook,
    } = sale_info.unwrap_or_default();
    let AccessInfo {
        country: access_country,
        viewability,
        public_domain,
        epub,
        pdf,
    } = access_info.unwrap_or_default();

    let identifiers = industry_identifiers.unwrap_or_default();

    Some(EnrichedRecord {
        id: id.unwrap_or_default(),
        etag: etag.unwrap_or_default(),
        title: title.unwrap_or_default(),
        subtitle: subtitle.unwrap_or_default(),
        author: join(authors),
        publisher: publisher.unwrap_or_default(),
        published_date: published_date.unwrap_or_default(),
        description: description.unwrap_or_default(),
        isbn_10: first_identifier(&identifiers, "ISBN_10"),
        isbn_13: first_identifier(&identifiers, "ISBN_13"),
        page_count: page_count.map_or_else(String::new, |n| n.to_string()),
        categories: join(categories),
        language: language.unwrap_or_default(),
        sale_info: sale_country.unwrap_or_default(),
        saleability: saleability.unwrap_or_default(),
        is_ebook: flag(is_ebook),
        epub: flag(epub.and_then(|a: Availability| a.is_available)),
        pdf: flag(pdf.and_then(|a: Availability| a.is_available)),
        access_info: access_country.unwrap_or_default(),
        viewability: viewability.unwrap_or_default(),
        public_domain: flag(public_domain),
    })
}

fn join(values: Option<Vec<String>>) -> String {
    values.map(|v| v.join(", ")).unwrap_or_default()
}

fn first_identifier(identifiers: &[IndustryIdentifier], kind: &str) -> String {
    identifiers
        .iter()
        .find(|id| id.kind.as_deref() == Some(kind))
        .and_then(|id| id.identifier.clone())
        .unwrap_or_default()
}

// renders `True` or `False`, absent flags are empty cells
fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "True".to_owned(),
        Some(false) => "False".to_owned(),
        None => String::new(),
    }
}
