use std::sync::LazyLock;

use async_trait::async_trait;
use const_format::concatcp;
use regex::Regex;
use reqwest::header::{HeaderMap, LINK, USER_AGENT};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{MonitorError, Result};
use crate::source::BuildSource;
use crate::types::{Build, Organization, Pipeline};

pub const API_ENDPOINT: &str = "https://api.buildkite.com/v2";

const CLIENT_USER_AGENT: &str = concatcp!("bkmon/", env!("CARGO_PKG_VERSION"));

const PAGE_SIZE: &str = "100";

/// Upper bound on `Link: rel="next"` hops for a single listing.
const MAX_PAGES: usize = 50;

static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("next-link pattern is valid")
});

/// Buildkite REST API client.
pub struct BuildkiteClient {
    http: Client,
    base_url: Url,
}

impl BuildkiteClient {
    pub fn new(api_url: &str) -> Result<Self> {
        let base_url =
            Url::parse(api_url).map_err(|_| MonitorError::InvalidUrl(api_url.to_string()))?;

        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MonitorError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn builds_url(&self, org: &str, pipeline: &str) -> Result<Url> {
        let mut url = self.endpoint(&["organizations", org, "pipelines", pipeline, "builds"])?;
        url.query_pairs_mut().append_pair("per_page", "1");
        Ok(url)
    }

    async fn get(&self, url: Url, token: &str) -> Result<Response> {
        debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MonitorError::Api {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        Ok(response)
    }

    /// Collect every page of a listing endpoint.
    async fn get_paged<T: DeserializeOwned>(&self, mut url: Url, token: &str) -> Result<Vec<T>> {
        url.query_pairs_mut().append_pair("per_page", PAGE_SIZE);
        let first = url.to_string();

        let mut items = Vec::new();
        let mut next = Some(url);
        let mut pages = 0;

        while let Some(url) = next.take() {
            if pages == MAX_PAGES {
                return Err(MonitorError::PaginationLimit { url: first, pages });
            }
            pages += 1;

            let response = self.get(url, token).await?;
            next = next_page(response.headers())?;

            let mut page: Vec<T> = response.json().await?;
            debug!(page = pages, count = page.len(), "fetched page");
            items.append(&mut page);
        }

        Ok(items)
    }

    async fn first_build(&self, url: Url, token: &str) -> Result<Option<Build>> {
        let builds: Vec<Build> = self.get(url, token).await?.json().await?;
        Ok(builds.into_iter().next())
    }
}

/// Extract the `rel="next"` target from a `Link` header, if present.
fn next_page(headers: &HeaderMap) -> Result<Option<Url>> {
    let Some(link) = headers.get(LINK).and_then(|v| v.to_str().ok()) else {
        return Ok(None);
    };

    match next_link(link) {
        Some(next) => Url::parse(next)
            .map(Some)
            .map_err(|_| MonitorError::InvalidUrl(next.to_string())),
        None => Ok(None),
    }
}

fn next_link(header: &str) -> Option<&str> {
    NEXT_LINK
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[async_trait]
impl BuildSource for BuildkiteClient {
    async fn fetch_organizations(&self, token: &str) -> Result<Vec<Organization>> {
        let url = self.endpoint(&["organizations"])?;
        self.get_paged(url, token).await
    }

    async fn fetch_pipelines(&self, pipelines_url: &str, token: &str) -> Result<Vec<Pipeline>> {
        let url = Url::parse(pipelines_url)
            .map_err(|_| MonitorError::InvalidUrl(pipelines_url.to_string()))?;
        self.get_paged(url, token).await
    }

    async fn fetch_latest_build(&self, org: &str, pipeline: &str, token: &str) -> Result<Build> {
        let url = self.builds_url(org, pipeline)?;
        self.first_build(url, token)
            .await?
            .ok_or_else(|| MonitorError::NoBuilds {
                org: org.to_string(),
                pipeline: pipeline.to_string(),
            })
    }

    async fn fetch_latest_finished_build(
        &self,
        org: &str,
        pipeline: &str,
        token: &str,
    ) -> Result<Option<Build>> {
        let mut url = self.builds_url(org, pipeline)?;
        url.query_pairs_mut().append_pair("state", "finished");
        self.first_build(url, token).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::types::BuildState;

    struct Canned {
        status: u16,
        link: Option<String>,
        body: String,
    }

    impl Canned {
        fn json(body: &str) -> Self {
            Self {
                status: 200,
                link: None,
                body: body.to_string(),
            }
        }
    }

    /// Serve canned responses on a loopback port. `route` gets the request
    /// target and the server's API base URL. Returns the base URL and the log
    /// of request targets.
    async fn serve<F>(route: F) -> (String, Arc<Mutex<Vec<String>>>)
    where
        F: Fn(&str, &str) -> Canned + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/v2", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));

        let server_base = base.clone();
        let log = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut chunk = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    let n = stream.read(&mut chunk).await.unwrap();
                    if n == 0 {
                        break;
                    }
                    head.extend_from_slice(&chunk[..n]);
                }

                let request = String::from_utf8_lossy(&head);
                let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                log.lock().unwrap().push(target.clone());

                let canned = route(&target, &server_base);
                let mut response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                    canned.status,
                    canned.body.len()
                );
                if let Some(link) = canned.link {
                    response.push_str(&format!("Link: {link}\r\n"));
                }
                response.push_str("\r\n");
                response.push_str(&canned.body);

                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        (base, requests)
    }

    fn org_json(slug: &str) -> String {
        format!(r#"{{"slug": "{slug}", "name": "{slug}", "pipelines_url": "http://unused/{slug}"}}"#)
    }

    #[tokio::test]
    async fn test_empty_builds_is_no_builds() {
        let (base, requests) = serve(|_, _| Canned::json("[]")).await;
        let client = BuildkiteClient::new(&base).unwrap();

        let err = client
            .fetch_latest_build("acme", "web", "token")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MonitorError::NoBuilds { ref org, ref pipeline } if org == "acme" && pipeline == "web"
        ));
        assert_eq!(
            requests.lock().unwrap().as_slice(),
            ["/v2/organizations/acme/pipelines/web/builds?per_page=1"]
        );
    }

    #[tokio::test]
    async fn test_empty_finished_builds_is_none() {
        let (base, requests) = serve(|_, _| Canned::json("[]")).await;
        let client = BuildkiteClient::new(&base).unwrap();

        let finished = client
            .fetch_latest_finished_build("acme", "web", "token")
            .await
            .unwrap();

        assert!(finished.is_none());
        assert_eq!(
            requests.lock().unwrap().as_slice(),
            ["/v2/organizations/acme/pipelines/web/builds?per_page=1&state=finished"]
        );
    }

    #[tokio::test]
    async fn test_finished_build_takes_first_entry() {
        let (base, _) = serve(|_, _| {
            Canned::json(
                r#"[{"state": "failed", "web_url": "https://buildkite.test/1"},
                    {"state": "passed", "web_url": "https://buildkite.test/0"}]"#,
            )
        })
        .await;
        let client = BuildkiteClient::new(&base).unwrap();

        let finished = client
            .fetch_latest_finished_build("acme", "web", "token")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(finished.state, BuildState::Failed);
        assert_eq!(finished.web_url, "https://buildkite.test/1");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let (base, _) = serve(|_, _| Canned {
            status: 404,
            link: None,
            body: "nope".to_string(),
        })
        .await;
        let client = BuildkiteClient::new(&base).unwrap();

        let err = client
            .fetch_latest_build("acme", "web", "token")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MonitorError::Api { status: 404, ref message } if message == "nope"
        ));
        assert_eq!(err.status(), Some(404));
    }

    #[tokio::test]
    async fn test_follows_next_link() {
        let (base, requests) = serve(|target, base| {
            if target.contains("page=2") {
                Canned::json(&format!("[{}]", org_json("b")))
            } else {
                Canned {
                    status: 200,
                    link: Some(format!(
                        r#"<{base}/organizations?page=2&per_page=100>; rel="next""#
                    )),
                    body: format!("[{}]", org_json("a")),
                }
            }
        })
        .await;
        let client = BuildkiteClient::new(&base).unwrap();

        let organizations = client.fetch_organizations("token").await.unwrap();

        let slugs: Vec<&str> = organizations.iter().map(|o| o.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b"]);
        assert_eq!(
            requests.lock().unwrap().as_slice(),
            [
                "/v2/organizations?per_page=100",
                "/v2/organizations?page=2&per_page=100"
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_at_page_limit() {
        let (base, requests) = serve(|target, base| Canned {
            status: 200,
            link: Some(format!(r#"<{base}/pipelines?page=next>; rel="next""#)),
            body: format!(r#"[{{"slug": "p", "name": "{target}"}}]"#),
        })
        .await;
        let client = BuildkiteClient::new(&base).unwrap();

        let err = client
            .fetch_pipelines(&format!("{base}/pipelines"), "token")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            MonitorError::PaginationLimit { pages: MAX_PAGES, .. }
        ));
        assert_eq!(requests.lock().unwrap().len(), MAX_PAGES);
    }

    #[test]
    fn test_next_link_picks_next_relation() {
        let header = r#"<https://api.buildkite.com/v2/organizations?page=3&per_page=100>; rel="last", <https://api.buildkite.com/v2/organizations?page=2&per_page=100>; rel="next""#;
        assert_eq!(
            next_link(header),
            Some("https://api.buildkite.com/v2/organizations?page=2&per_page=100")
        );
    }

    #[test]
    fn test_next_link_absent_on_last_page() {
        let header = r#"<https://api.buildkite.com/v2/organizations?page=1>; rel="first", <https://api.buildkite.com/v2/organizations?page=1>; rel="prev""#;
        assert_eq!(next_link(header), None);
    }

    #[test]
    fn test_builds_url_escapes_slugs() {
        let client = BuildkiteClient::new(API_ENDPOINT).unwrap();
        let url = client.builds_url("acme", "web app").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.buildkite.com/v2/organizations/acme/pipelines/web%20app/builds?per_page=1"
        );
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let client = BuildkiteClient::new("http://localhost:8080/v2/").unwrap();
        let url = client.endpoint(&["organizations"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v2/organizations");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        assert!(matches!(
            BuildkiteClient::new("not a url"),
            Err(MonitorError::InvalidUrl(_))
        ));
    }
}
