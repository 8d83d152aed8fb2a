//! Single-key lookups with bounded retry.

use std::{thread, time::Duration};

use log::{error, trace, warn};

use crate::api::{
    google_books::{volumes_url, Volumes, GOOGLE_BOOKS_URL},
    Client,
};

/// Attempts made for a key before giving up on it.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Wait between two attempts for the same key.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Time allowed for a single attempt.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How the wait between attempts evolves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Backoff {
    /// Always wait the base delay.
    Fixed,
    /// Double the wait after every failed attempt, starting from the base delay.
    Exponential,
}

/// Retry settings of a [`LookupClient`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts per key, values below 1 behave as 1.
    pub max_attempts: u32,
    /// Base wait between attempts.
    pub delay: Duration,
    /// How the wait grows between attempts.
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
            backoff: Backoff::Fixed,
        }
    }
}

impl RetryPolicy {
    /// The wait after the failed `attempt` (1-based).
    #[must_use]
    pub const fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential => self
                .delay
                .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1))),
        }
    }

    const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

/// Looks up a single ISBN, retrying transient failures.
#[derive(Debug)]
pub struct LookupClient<C> {
    client: C,
    endpoint: String,
    policy: RetryPolicy,
}

impl<C: Client> LookupClient<C> {
    /// Creates a lookup client querying the Google Books volumes endpoint.
    pub fn new(client: C, policy: RetryPolicy) -> Self {
        Self::with_endpoint(client, GOOGLE_BOOKS_URL, policy)
    }

    /// Creates a lookup client querying `endpoint`, the ISBN being appended to it.
    pub fn with_endpoint<S: Into<String>>(client: C, endpoint: S, policy: RetryPolicy) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            policy,
        }
    }

    #[cfg(test)]
    pub(crate) fn client(&self) -> &C {
        &self.client
    }

    /// Fetches the volumes matching `isbn`.
    ///
    /// Connection failures, timeouts and error statuses are retried up to the attempt ceiling of
    /// the [`RetryPolicy`]. A response that cannot be decoded is not retried. Either way a key
    /// that cannot be fetched yields `None`: a failed lookup is an expected outcome.
    pub fn fetch(&self, isbn: &str) -> Option<Volumes> {
        let url = volumes_url(&self.endpoint, isbn);
        let attempts = self.policy.attempts();
        trace!("Looking up ISBN {isbn} at {url}");

        for attempt in 1..=attempts {
            match self.client.get_json::<Volumes>(&url) {
                Ok(volumes) => {
                    trace!("Request for ISBN {isbn} was successful on attempt {attempt}");
                    return Some(volumes);
                }
                Err(err) if err.is_transient() => {
                    warn!("Attempt {attempt}: Error fetching data for ISBN {isbn} - {err}");
                    if attempt < attempts {
                        let delay = self.policy.delay_after(attempt);
                        trace!("Waiting {delay:?} before retrying ISBN {isbn}");
                        thread::sleep(delay);
                    }
                }
                Err(err) => {
                    warn!("Unusable response for ISBN {isbn} from {url} - {err}");
                    return None;
                }
            }
        }

        error!("Failed to fetch data for ISBN {isbn} after {attempts} attempts.");
        None
    }
}
