use std::io::{Cursor, Read};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use tracing::{debug, instrument, warn};
use zip::ZipArchive;

use crate::config::Config;
use crate::fetch_error::FetchError;

/// HTTP transport for the ERCOT endpoints.
///
/// Failed requests are retried on connect errors, timeouts and 5xx responses,
/// then reported as `None`. Callers decide what an unreachable resource means.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    max_retries: usize,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            max_retries: config.http_max_retries,
        })
    }

    #[instrument(skip(self, params), fields(url = %url))]
    pub async fn request(&self, url: &str, params: &[(&str, &str)]) -> Option<Vec<u8>> {
        let fetch = || async {
            debug!("Sending HTTP request");
            let mut builder = self.client.get(url);
            if !params.is_empty() {
                builder = builder.query(params);
            }
            let response = builder.send().await?;
            debug!("Received HTTP response with status: {}", response.status());
            let response = response.error_for_status()?;
            Ok::<_, reqwest::Error>(response.bytes().await?)
        };

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(200))
            .with_max_times(self.max_retries);

        match fetch
            .retry(backoff)
            .when(is_retryable)
            .notify(|err: &reqwest::Error, dur: Duration| {
                warn!("Request failed, retrying in {:?}: {}", dur, err);
            })
            .await
        {
            Ok(bytes) => {
                debug!("Retrieved {} bytes", bytes.len());
                Some(bytes.to_vec())
            }
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                None
            }
        }
    }

    pub async fn request_text(&self, url: &str, params: &[(&str, &str)]) -> Option<String> {
        self.request(url, params)
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout()
        || err.is_connect()
        || err.status().is_some_and(|status| status.is_server_error())
}

/// Decompress a zip archive into its member files, in archive order.
pub fn unzip(bytes: &[u8]) -> Result<Vec<Vec<u8>>, FetchError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut files = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }
        let mut content = Vec::new();
        file.read_to_end(&mut content)
            .map_err(|e| FetchError::ParseError(format!("failed to inflate {}: {}", file.name(), e)))?;
        debug!("Inflated {} ({} bytes)", file.name(), content.len());
        files.push(content);
    }
    Ok(files)
}
