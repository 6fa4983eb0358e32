use anyhow::Result;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};

/// Hosting platforms idle the process after 15 minutes without traffic
pub const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(840);

pub struct KeepAliveService {
    url: String,
    client: reqwest::Client,
    scheduler: JobScheduler,
}

impl KeepAliveService {
    pub async fn new(url: String) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            url,
            client: reqwest::Client::new(),
            scheduler,
        })
    }

    pub async fn start(&mut self) -> Result<()> {
        let url = self.url.clone();
        let client = self.client.clone();

        let job = Job::new_repeated_async(KEEP_ALIVE_INTERVAL, move |_uuid, _l| {
            let url = url.clone();
            let client = client.clone();

            Box::pin(async move {
                Self::ping(&client, &url).await;
            })
        })?;

        self.scheduler.add(job).await?;
        self.scheduler.start().await?;

        log::info!(
            "✅ Keep-alive started: pinging {} every {}s",
            self.url,
            KEEP_ALIVE_INTERVAL.as_secs()
        );
        Ok(())
    }

    pub async fn stop(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        log::info!("Keep-alive service stopped");
        Ok(())
    }

    /// One GET against `url`. Failures are logged and swallowed.
    /// Returns the status code when the request completed.
    pub async fn ping(client: &reqwest::Client, url: &str) -> Option<reqwest::StatusCode> {
        let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");

        match client.get(url).send().await {
            Ok(response) => {
                let status = response.status();
                log::info!("🔔 [{}] Keep-alive ping to {}: {}", now, url, status);
                Some(status)
            }
            Err(e) => {
                log::error!("❌ [{}] Keep-alive ping to {} failed: {}", now, url, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_ping_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let status = KeepAliveService::ping(&client, &format!("{}/", server.uri())).await;

        assert_eq!(status, Some(reqwest::StatusCode::OK));
    }

    #[tokio::test]
    async fn test_ping_error_status_is_not_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = reqwest::Client::new();
        let status = KeepAliveService::ping(&client, &server.uri()).await;

        assert_eq!(status, Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn test_ping_unreachable_host_is_swallowed() {
        let client = reqwest::Client::new();
        let status = KeepAliveService::ping(&client, "http://127.0.0.1:9/").await;

        assert!(status.is_none());
    }

    #[test]
    fn test_interval_is_fourteen_minutes() {
        assert_eq!(KEEP_ALIVE_INTERVAL.as_secs(), 14 * 60);
    }
}
