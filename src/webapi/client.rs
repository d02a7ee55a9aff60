use std::time::{Duration, Instant};

use log::debug;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::auth::Token;
use crate::error::{ProbeError, Result};
use crate::models::ReportType;

const API_KEY_HEADER: &str = "x-api-key";

/// Body of a `200 OK` response, with what it cost to fetch it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub body: Vec<u8>,
    pub latency: Duration,
}

impl RawResponse {
    pub fn size(&self) -> usize {
        self.body.len()
    }
}

pub struct WebApiClient {
    client: Client,
    api_url: Url,
}

impl WebApiClient {
    /// Build a client for `base_url` (e.g. `https://api.example.org`) whose
    /// requests are bounded by `timeout`.
    ///
    /// # Errors
    /// Returns `ProbeError::Config` for an unusable base URL or when the HTTP
    /// client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("webapi-probe/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| ProbeError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v2/")
            .map_err(|e| ProbeError::Config(format!("Invalid API base URL: {e}")))?;

        if api_url.cannot_be_a_base() {
            return Err(ProbeError::Config(format!(
                "Invalid base URL: {base_url} cannot carry a path"
            )));
        }

        Ok(Self { client, api_url })
    }

    pub fn reports_url(&self) -> Result<Url> {
        self.api_url
            .join("reports")
            .map_err(|e| ProbeError::Config(format!("Invalid reports URL: {e}")))
    }

    /// `results/{report}/{group}` for AR, `status/{report}/{group}` otherwise.
    pub fn results_url(&self, rtype: ReportType, report: &str, group_type: &str) -> Result<Url> {
        let endpoint = match rtype {
            ReportType::Ar => "results",
            ReportType::Status => "status",
        };

        let mut url = self
            .api_url
            .join(endpoint)
            .map_err(|e| ProbeError::Config(format!("Invalid {endpoint} URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ProbeError::Config(format!("Invalid {endpoint} URL")))?
            .push(report)
            .push(group_type);

        Ok(url)
    }

    /// Issue one authenticated GET and read the whole body.
    ///
    /// Non-2xx statuses, transport failures and timeouts come back as
    /// `ProbeError::Network`; any other 2xx status as
    /// `ProbeError::UnexpectedStatus`.
    pub async fn get(
        &self,
        url: Url,
        query: &[(&str, String)],
        token: &Token,
    ) -> Result<RawResponse> {
        debug!("GET {url}");

        let started = Instant::now();
        let response = self
            .client
            .get(url)
            .query(query)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .header(API_KEY_HEADER, token.as_str())
            .send()
            .await?
            .error_for_status()?;
        if response.status() != StatusCode::OK {
            return Err(ProbeError::UnexpectedStatus(response.status()));
        }
        let body = response.bytes().await?.to_vec();
        let raw = RawResponse {
            body,
            latency: started.elapsed(),
        };

        debug!(
            "Received {} bytes in {:.6}s",
            raw.size(),
            raw.latency.as_secs_f64()
        );

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn key(value: &str) -> Token {
        Token::new(value).unwrap()
    }

    fn client() -> WebApiClient {
        WebApiClient::new("https://api.example.org", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_reports_url() {
        assert_eq!(
            client().reports_url().unwrap().as_str(),
            "https://api.example.org/api/v2/reports"
        );
    }

    #[test]
    fn test_results_url_for_ar() {
        let url = client()
            .results_url(ReportType::Ar, "REPORT1", "SERVICEGROUPS")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.org/api/v2/results/REPORT1/SERVICEGROUPS"
        );
    }

    #[test]
    fn test_results_url_for_status() {
        let url = client()
            .results_url(ReportType::Status, "REPORT2", "SITES")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.org/api/v2/status/REPORT2/SITES"
        );
    }

    #[test]
    fn test_results_url_encodes_segments() {
        let url = client()
            .results_url(ReportType::Ar, "my report/x", "SITES")
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.example.org/api/v2/results/my%20report%2Fx/SITES"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let result = WebApiClient::new("not a url", Duration::from_secs(5));

        assert!(matches!(result, Err(ProbeError::Config(_))));
    }

    #[tokio::test]
    async fn test_get_sends_headers_and_reads_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v2/reports")
            .match_header("accept", "application/json")
            .match_header("x-api-key", "key1")
            .with_status(200)
            .with_body("{\"data\": []}")
            .create_async()
            .await;

        let client = WebApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let url = client.reports_url().unwrap();
        let response = client.get(url, &[], &key("key1")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.body, b"{\"data\": []}");
        assert_eq!(response.size(), 12);
    }

    #[tokio::test]
    async fn test_get_rejects_other_success_statuses() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/reports")
            .with_status(204)
            .create_async()
            .await;

        let client = WebApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let url = client.reports_url().unwrap();
        let err = client.get(url, &[], &key("key1")).await.unwrap_err();

        assert!(matches!(
            err,
            ProbeError::UnexpectedStatus(StatusCode::NO_CONTENT)
        ));
    }

    #[tokio::test]
    async fn test_get_reports_timeout_in_cause() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/reports")
            .with_chunked_body(|w| {
                std::thread::sleep(Duration::from_millis(1000));
                w.write_all(b"{\"data\": []}")
            })
            .create_async()
            .await;

        let client = WebApiClient::new(&server.url(), Duration::from_millis(300)).unwrap();
        let url = client.reports_url().unwrap();
        let err = client.get(url, &[], &key("key1")).await.unwrap_err();

        assert!(matches!(err, ProbeError::Network(_)));
        assert!(err.root_cause().contains("timed out"), "{}", err.root_cause());
    }

    #[tokio::test]
    async fn test_get_maps_error_status_to_network_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v2/reports")
            .with_status(401)
            .create_async()
            .await;

        let client = WebApiClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let url = client.reports_url().unwrap();
        let err = client.get(url, &[], &key("bad")).await.unwrap_err();

        assert!(matches!(err, ProbeError::Network(_)));
        assert!(err.to_string().contains("401"));
    }
}
