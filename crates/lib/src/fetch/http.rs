//! Blocking HTTP fetcher.

use reqwest::blocking::Client;
use tracing::debug;

use super::{Fetch, FetchError};

const USER_AGENT: &str = concat!("pomfetch/", env!("CARGO_PKG_VERSION"));

/// [`Fetch`] implementation backed by a blocking `reqwest` client.
///
/// Redirects are followed. Any non-2xx final status is an error.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new() -> Result<Self, FetchError> {
    let client = Client::builder()
      .user_agent(USER_AGENT)
      .build()
      .map_err(|e| FetchError::Client(e.to_string()))?;
    Ok(Self { client })
  }
}

impl Fetch for HttpFetcher {
  fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
    debug!(url = %url, "GET");

    let response = self.client.get(url).send().map_err(|e| FetchError::Request {
      url: url.to_string(),
      message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status: status.as_u16(),
      });
    }

    let bytes = response.bytes().map_err(|e| FetchError::Request {
      url: url.to_string(),
      message: e.to_string(),
    })?;

    debug!(url = %url, size = bytes.len(), "fetched");
    Ok(bytes.to_vec())
  }
}
