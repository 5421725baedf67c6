//! Delivery of scan reports to the Malice webhook.

use reqwest::{Client, Proxy};
use std::path::Path;
use std::time::Duration;

use comodo_core::constants::{ENV_ENDPOINT, ENV_PROXY};
use comodo_core::{ComodoConfig, ScanError, ScanReport, ScanResult};

const USER_AGENT: &str = concat!("Malice-Comodo/", env!("CARGO_PKG_VERSION"));

/// Header carrying the absolute path of the scanned file.
pub const TASK_HEADER: &str = "Task";

/// Posts reports to a single webhook endpoint, once, without retries.
#[derive(Clone, Debug)]
pub struct WebhookReporter {
    http_client: Client,
    endpoint: String,
}

impl WebhookReporter {
    pub fn new(endpoint: String, proxy: Option<&str>, timeout: Duration) -> ScanResult<Self> {
        let mut builder = Client::builder().timeout(timeout).user_agent(USER_AGENT);
        builder = match proxy {
            Some(proxy) => builder.proxy(Proxy::all(proxy).map_err(|e| {
                ScanError::ReportDelivery(format!("invalid proxy {:?}: {}", proxy, e))
            })?),
            // Only an explicit --proxy routes the POST through a proxy
            None => builder.no_proxy(),
        };

        let http_client = builder.build().map_err(|e| {
            ScanError::ReportDelivery(format!("failed to create HTTP client for webhook: {}", e))
        })?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// Reporter for `MALICE_ENDPOINT`, optionally routed through
    /// `MALICE_PROXY`.
    pub fn from_config(config: &ComodoConfig, use_proxy: bool) -> ScanResult<Self> {
        let endpoint = config
            .webhook_endpoint
            .clone()
            .ok_or_else(|| ScanError::ReportDelivery(format!("{} is not set", ENV_ENDPOINT)))?;

        let proxy = if use_proxy {
            let proxy = config.webhook_proxy.as_deref();
            if proxy.is_none() {
                tracing::warn!("Proxy requested but {} is not set, posting directly", ENV_PROXY);
            }
            proxy
        } else {
            None
        };

        Self::new(endpoint, proxy, config.http_timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST the report; returns the response status code.
    #[tracing::instrument(skip(self, report), fields(endpoint = %self.endpoint))]
    pub async fn deliver(&self, report: &ScanReport, task: &Path) -> ScanResult<u16> {
        let body = report
            .envelope()
            .to_json()
            .map_err(|e| ScanError::ReportDelivery(format!("failed to serialize report: {}", e)))?;

        let response = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .header(TASK_HEADER, task.to_string_lossy().into_owned())
            .body(body)
            .send()
            .await
            .map_err(|e| ScanError::ReportDelivery(format!("failed to send report: {}", e)))?;

        let status = response.status();
        tracing::info!(status_code = status.as_u16(), "Webhook responded");

        if status.is_success() {
            Ok(status.as_u16())
        } else {
            let response_body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("Failed to read response body"));
            Err(ScanError::ReportDelivery(format!(
                "webhook returned non-2xx status: {} - {}",
                status, response_body
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use comodo_core::{FreshnessTracker, OutputParser, ResultAssembler};
    use mockito::Matcher;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn infected_report() -> ScanReport {
        let dir = TempDir::new().unwrap();
        let freshness = FreshnessTracker::new(dir.path().join("UPDATED"), "20230101");
        let assembler = ResultAssembler::new(freshness);
        let verdict = OutputParser::new()
            .parse("banner\n/malware/EICAR ---> Found Virus, Malware Name is Malware\nfooter")
            .unwrap();
        assembler.assemble(verdict).unwrap()
    }

    fn reporter(endpoint: String) -> WebhookReporter {
        WebhookReporter::new(endpoint, None, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_deliver_posts_report_with_task_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/malice/scan")
            .match_header("task", "/malware/EICAR")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "comodo": {
                    "infected": true,
                    "result": "Malware",
                    "engine": "1.1",
                    "updated": ""
                }
            })))
            .with_status(200)
            .create_async()
            .await;

        let status = reporter(format!("{}/malice/scan", server.url()))
            .deliver(&infected_report(), &PathBuf::from("/malware/EICAR"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_deliver_non_success_is_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/malice/scan")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = reporter(format!("{}/malice/scan", server.url()))
            .deliver(&infected_report(), &PathBuf::from("/malware/EICAR"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::ReportDelivery(_)));
        assert!(!err.is_fatal());
        assert!(err.to_string().contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_deliver_unreachable_endpoint_is_error() {
        let err = reporter("http://127.0.0.1:1/malice/scan".to_string())
            .deliver(&infected_report(), &PathBuf::from("/malware/EICAR"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScanError::ReportDelivery(_)));
    }

    #[test]
    fn test_from_config_requires_endpoint() {
        let config = ComodoConfig::default();
        assert!(matches!(
            WebhookReporter::from_config(&config, false),
            Err(ScanError::ReportDelivery(_))
        ));
    }

    fn proxied_config(proxy_url: String, endpoint: &str) -> ComodoConfig {
        ComodoConfig {
            webhook_endpoint: Some(endpoint.to_string()),
            webhook_proxy: Some(proxy_url),
            http_timeout: Duration::from_secs(5),
            ..ComodoConfig::default()
        }
    }

    #[tokio::test]
    async fn test_deliver_through_proxy_when_requested() {
        let mut proxy = mockito::Server::new_async().await;
        let relayed = proxy
            .mock("POST", Matcher::Any)
            .match_header("task", "/malware/EICAR")
            .with_status(200)
            .expect(1)
            .create_async()
            .await;

        // The endpoint host does not resolve, only the proxy can reach it
        let config = proxied_config(proxy.url(), "http://malice.invalid:3993/malice/scan");
        let reporter = WebhookReporter::from_config(&config, true).unwrap();
        assert_eq!(reporter.endpoint(), "http://malice.invalid:3993/malice/scan");

        let status = reporter
            .deliver(&infected_report(), &PathBuf::from("/malware/EICAR"))
            .await
            .unwrap();

        relayed.assert_async().await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn test_deliver_ignores_proxy_without_flag() {
        let mut proxy = mockito::Server::new_async().await;
        let relayed = proxy
            .mock("POST", Matcher::Any)
            .with_status(200)
            .expect(0)
            .create_async()
            .await;

        let config = proxied_config(proxy.url(), "http://127.0.0.1:1/malice/scan");
        let err = WebhookReporter::from_config(&config, false)
            .unwrap()
            .deliver(&infected_report(), &PathBuf::from("/malware/EICAR"))
            .await
            .unwrap_err();

        assert!(matches!(err, ScanError::ReportDelivery(_)));
        relayed.assert_async().await;
    }
}
