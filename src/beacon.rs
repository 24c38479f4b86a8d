use serde_json::Value;
use tracing::instrument;
use url::Url;

/// Reports one page load to the remote counter endpoint.
///
/// The endpoint's response only ever goes to the log; the page does not wait
/// on it and never sees it.
#[derive(Debug, Clone)]
pub struct Beacon {
    client: reqwest::Client,
    endpoint: Url,
}

impl Beacon {
    pub fn new(endpoint: Url) -> Beacon {
        Beacon {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    /// One GET, no retry.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn send(&self) {
        let response = match self.client.get(self.endpoint.clone()).send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(%error, "failed to reach the counter endpoint");
                return;
            }
        };

        let status = response.status();
        match response.text().await {
            Ok(body) => match serde_json::from_str::<Value>(&body) {
                Ok(json) => tracing::info!(%status, %json, "counter endpoint response"),
                Err(_) => tracing::info!(%status, %body, "counter endpoint response"),
            },
            Err(error) => {
                tracing::error!(%status, %error, "failed to read the counter endpoint response");
            }
        }
    }
}
