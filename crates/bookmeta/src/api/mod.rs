//! The seam between the pipeline and the remote lookup service.

use std::time::Duration;

use log::trace;
use serde::de::DeserializeOwned;

pub mod google_books;

use crate::{Error, ErrorKind};

/// A blocking HTTP client able to fetch and decode a JSON document.
///
/// The orchestrator shares one client between its workers, so implementors used with more than
/// one worker also need to be [`Sync`].
pub trait Client {
    /// Performs a GET request for `url` and decodes the body as `T`.
    ///
    /// # Errors
    ///
    /// An `Err` with the kind [`ErrorKind::IO`], [`ErrorKind::Timeout`] or
    /// [`ErrorKind::Status`] is returned when the exchange fails, and [`ErrorKind::Deserialize`]
    /// when the body is not the expected JSON.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        trace!("GET {url}");
        let resp = self
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)?;
        resp.json().map_err(Error::from)
    }
}

/// Builds the default HTTP client where every attempt is bounded by `timeout`.
///
/// # Errors
///
/// An `Err` is returned when the TLS backend or system configuration cannot be initialised.
pub fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, Error> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::wrap(ErrorKind::IO, e))
}

#[cfg(test)]
pub(crate) use test::MockClient;


#[cfg(test)]
mod tests {
    use std::{
        io::{Read, Write},
        net::TcpListener,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        thread,
        time::Duration,
    };

    use super::{http_client, Client};
    use crate::{
        api::google_books::Volumes,
        lookup::{Backoff, LookupClient, RetryPolicy},
        ErrorKind,
    };

    const NO_WAIT: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::ZERO,
        backoff: Backoff::Fixed,
    };

    /// Serves `response` to every request made on a local port, after waiting `stall`.
    ///
    /// Returns the endpoint to query and the number of requests received so far.
    fn serve(response: String, stall: Duration) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!(
            "http://{}/volumes?q=isbn:",
            listener.local_addr().unwrap()
        );
        let requests = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&requests);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else {
                    continue;
                };
                let mut request = Vec::new();
                let mut buf = [0; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);
                thread::sleep(stall);
                // the client may have hung up already
                let _ = stream.write_all(response.as_bytes());
            }
        });

        (endpoint, requests)
    }

    fn respond(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn ok_response_is_decoded() {
        let (endpoint, requests) = serve(
            respond("200 OK", include_str!("../../tests/data/google_book_json.txt")),
            Duration::ZERO,
        );
        let client = http_client(Duration::from_secs(5)).unwrap();

        let volumes: Volumes = client.get_json(&format!("{endpoint}0735619670")).unwrap();

        assert_eq!(2, volumes.items.unwrap().len());
        assert_eq!(1, requests.load(Ordering::SeqCst));
    }

    #[test]
    fn error_status_is_a_failed_attempt() {
        let (endpoint, requests) = serve(respond("503 Service Unavailable", ""), Duration::ZERO);
        let client = http_client(Duration::from_secs(5)).unwrap();

        let err = client
            .get_json::<Volumes>(&format!("{endpoint}0735619670"))
            .unwrap_err();
        assert_eq!(ErrorKind::Status, err.kind());
        assert!(err.is_transient());

        let lookup = LookupClient::with_endpoint(client, endpoint, NO_WAIT);
        assert_eq!(None, lookup.fetch("0735619670"));
        assert_eq!(4, requests.load(Ordering::SeqCst));
    }

    #[test]
    fn stalled_response_times_out() {
        let (endpoint, requests) = serve(respond("200 OK", "{}"), Duration::from_secs(3));
        let client = http_client(Duration::from_secs(1)).unwrap();

        let err = client
            .get_json::<Volumes>(&format!("{endpoint}0735619670"))
            .unwrap_err();

        assert_eq!(ErrorKind::Timeout, err.kind());
        assert!(err.is_transient());
        assert_eq!(1, requests.load(Ordering::SeqCst));
    }

    #[test]
    fn html_body_is_not_retried() {
        let (endpoint, requests) = serve(respond("200 OK", "<html>quota</html>"), Duration::ZERO);
        let lookup = LookupClient::with_endpoint(
            http_client(Duration::from_secs(5)).unwrap(),
            endpoint,
            NO_WAIT,
        );

        assert_eq!(None, lookup.fetch("0735619670"));
        assert_eq!(1, requests.load(Ordering::SeqCst));
    }
}
