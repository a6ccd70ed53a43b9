use std::time::Duration;
use thiserror::Error;

/// A transport-level failure: the request never produced a usable response.
/// Carries only a message; the caller surfaces it to the user once and does
/// not retry.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self::new(error.to_string())
    }
}

/// A raw response: status code plus the body text. Interpretation (envelope
/// parsing, success flags) happens above this seam.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The seam between the reader/writer and the network.
///
/// Production code uses [`HttpTransport`]; tests swap in canned responses so
/// the mapping and reconciliation logic runs without a network.
pub trait Transport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse, TransportError>;
}

/// Blocking HTTP transport.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        let response = self.client.get(url).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }

    fn post_form(&self, url: &str, fields: &[(String, String)]) -> Result<HttpResponse, TransportError> {
        let response = self.client.post(url).form(fields).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub(crate) mod stub {
    use super::*;
    use std::cell::RefCell;

    /// Canned transport for tests: queued responses, recorded requests.
    #[derive(Default)]
    pub(crate) struct StubTransport {
        pub(crate) responses: RefCell<Vec<Result<HttpResponse, TransportError>>>,
        pub(crate) requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
    }

    impl StubTransport {
        pub(crate) fn replying(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                responses: RefCell::new(responses),
                requests: RefCell::new(Vec::new()),
            }
        }

        fn next(&self) -> Result<HttpResponse, TransportError> {
            let mut responses = self.responses.borrow_mut();
            if responses.is_empty() {
                return Err(TransportError::new("stub exhausted"));
            }
            responses.remove(0)
        }
    }

    impl Transport for StubTransport {
        fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            self.requests.borrow_mut().push((url.to_owned(), Vec::new()));
            self.next()
        }

        fn post_form(
            &self,
            url: &str,
            fields: &[(String, String)],
        ) -> Result<HttpResponse, TransportError> {
            self.requests
                .borrow_mut()
                .push((url.to_owned(), fields.to_vec()));
            self.next()
        }
    }

    pub(crate) fn ok(body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse { status: 200, body: body.to_owned() })
    }

    pub(crate) fn status(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse { status, body: body.to_owned() })
    }
}
