//! GitLab REST host client implementation

use super::cache::ResponseCache;
use crate::config::FileConfig;
use async_trait::async_trait;
use fleetlab_application::ports::host_client::{CacheMode, HostCallError, HostClient};
use fleetlab_domain::core::string::{single_line, truncate};
use fleetlab_domain::{FetchResult, Host, User, UserField, UserQuery};
use reqwest::{Response, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default page cap for one search on one host
const MAX_PAGES: u32 = 20;

/// Longest error body kept in a [`HostCallError::Status`]
const MAX_ERROR_LEN: usize = 200;

/// [`HostClient`] for the GitLab v4 REST API.
///
/// One client serves every host; the token travels with the [`Host`].
pub struct GitLabClient {
    http: reqwest::Client,
    cache: Option<ResponseCache>,
    per_page: u32,
    max_pages: u32,
}

impl GitLabClient {
    pub fn new(timeout: Duration, per_page: u32) -> Result<Self, HostCallError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("fleetlab/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HostCallError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            cache: None,
            per_page: per_page.clamp(1, 100),
            max_pages: MAX_PAGES,
        })
    }

    /// Build a client from file configuration, attaching the cache if enabled
    pub fn from_config(config: &FileConfig) -> Result<Self, HostCallError> {
        let mut client = Self::new(config.http.timeout(), config.http.per_page)?
            .with_max_pages(config.http.max_pages);
        if config.cache.enabled
            && let Some(dir) = config.cache.resolved_dir()
        {
            info!("Response cache at {}", dir.display());
            client = client.with_cache(ResponseCache::new(dir, config.cache.ttl()));
        }
        Ok(client)
    }

    /// Fail a search that still has results after `pages` pages
    pub fn with_max_pages(mut self, pages: u32) -> Self {
        self.max_pages = pages.max(1);
        self
    }

    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    fn api_url(host: &Host, path: &str) -> String {
        format!("{}/api/v4/{}", host.base_url(), path.trim_start_matches('/'))
    }

    /// Query parameters for one page of a user search.
    ///
    /// Usernames have an exact-match filter; other fields go through the
    /// fuzzy `search` parameter and are narrowed by the caller.
    fn search_params(&self, query: &UserQuery, page: u32) -> Vec<(&'static str, String)> {
        let filter = match query.by {
            UserField::Username => ("username", query.value.clone()),
            UserField::Email | UserField::Name => ("search", query.value.clone()),
        };
        vec![
            filter,
            ("per_page", self.per_page.to_string()),
            ("page", page.to_string()),
        ]
    }

    /// Follow `X-Next-Page` until the last page.
    ///
    /// Stopping early would hide exact matches on later pages, so hitting
    /// the page cap is an error for this host.
    async fn fetch_users(&self, host: &Host, query: &UserQuery) -> Result<Vec<User>, HostCallError> {
        let url = Self::api_url(host, "users");
        let mut users = Vec::new();
        let mut page = 1;

        loop {
            debug!(host = %host, page, "GET {}", url);
            let response = self
                .http
                .get(&url)
                .header("PRIVATE-TOKEN", &host.token)
                .query(&self.search_params(query, page))
                .send()
                .await
                .map_err(|e| HostCallError::Request(e.to_string()))?;
            let response = check_status(response).await?;

            let next_page = parse_next_page(
                response
                    .headers()
                    .get("x-next-page")
                    .and_then(|v| v.to_str().ok()),
            );
            let batch: Vec<User> = response
                .json()
                .await
                .map_err(|e| HostCallError::Decode(e.to_string()))?;
            users.extend(batch);

            match next_page {
                Some(next) if next > page => {
                    if next > self.max_pages {
                        warn!(
                            "{}: search for {:?} has more than {} pages, giving up",
                            host, query.value, self.max_pages
                        );
                        return Err(HostCallError::TooManyPages {
                            pages: self.max_pages,
                        });
                    }
                    page = next;
                }
                _ => break,
            }
        }

        Ok(users)
    }
}

#[async_trait]
impl HostClient for GitLabClient {
    async fn search_users(
        &self,
        host: &Host,
        query: &UserQuery,
        cache: CacheMode,
    ) -> Result<FetchResult<Vec<User>>, HostCallError> {
        let key = query.cache_key();

        if cache == CacheMode::Use
            && let Some(store) = &self.cache
            && let Some(users) = store.get::<Vec<User>>(&host.name, &key).await
        {
            return Ok(FetchResult::cached(users));
        }

        let users = self.fetch_users(host, query).await?;
        if let Some(store) = &self.cache {
            store.put(&host.name, &key, &users).await;
        }
        Ok(FetchResult::live(users))
    }

    async fn block_user(&self, host: &Host, user_id: u64) -> Result<(), HostCallError> {
        let url = Self::api_url(host, &format!("users/{}/block", user_id));
        debug!(host = %host, "POST {}", url);

        let response = self
            .http
            .post(&url)
            .header("PRIVATE-TOKEN", &host.token)
            .send()
            .await
            .map_err(|e| HostCallError::Request(e.to_string()))?;
        check_status(response).await?;

        info!("Blocked user {} on {}", user_id, host);
        Ok(())
    }
}

/// Turn a non-success response into [`HostCallError::Status`]
async fn check_status(response: Response) -> Result<Response, HostCallError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, &body))
}

fn status_error(status: StatusCode, body: &str) -> HostCallError {
    let plain = body.trim();
    let message = extract_message(body)
        .or_else(|| (!plain.is_empty() && !plain.starts_with('<')).then(|| single_line(plain)))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
    HostCallError::Status {
        code: status.as_u16(),
        message: truncate(&message, MAX_ERROR_LEN),
    }
}

/// GitLab error bodies look like `{"message": "404 User Not Found"}`
/// or `{"error": "insufficient_scope"}`
fn extract_message(body: &str) -> Option<String> {
    let json: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = json.get("message").or_else(|| json.get("error"))?;
    match message {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// GitLab sends an empty `X-Next-Page` on the last page
fn parse_next_page(header: Option<&str>) -> Option<u32> {
    header?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn host() -> Arc<Host> {
        Host::new("main", "https://gitlab.example.com/", "glpat-1").shared()
    }

    /// Answer `GET /api/v4/users` on a local port with one user per page.
    ///
    /// The user id is the page number. `last` is the final page; `None`
    /// keeps sending `X-Next-Page` forever. Returns the requested pages.
    async fn serve_pages(last: Option<u32>) -> (Arc<Host>, Arc<Mutex<Vec<u32>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let requested = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requested);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0; 8192];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let page = requested_page(&String::from_utf8_lossy(&buf[..n]));
                seen.lock().unwrap().push(page);

                let next = match last {
                    Some(last) if page >= last => String::new(),
                    _ => (page + 1).to_string(),
                };
                let body = format!(r#"[{{"id":{page},"username":"bob{page}","name":"Bob"}}]"#);
                let response = format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nX-Next-Page: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    next,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (Host::new("local", url, "glpat-1").shared(), requested)
    }

    fn requested_page(request: &str) -> u32 {
        request
            .lines()
            .next()
            .and_then(|line| line.split(['?', '&', ' ']).find_map(|p| p.strip_prefix("page=")))
            .and_then(|p| p.parse().ok())
            .unwrap_or(1)
    }

    #[test]
    fn test_api_url() {
        assert_eq!(
            GitLabClient::api_url(&host(), "users/7/block"),
            "https://gitlab.example.com/api/v4/users/7/block"
        );
    }

    #[test]
    fn test_search_params_use_exact_username_filter() {
        let client = GitLabClient::new(Duration::from_secs(5), 100).unwrap();
        let params = client.search_params(&UserQuery::new(UserField::Username, "bob"), 2);
        assert_eq!(params[0], ("username", "bob".to_string()));
        assert_eq!(params[2], ("page", "2".to_string()));

        let params = client.search_params(&UserQuery::new(UserField::Email, "bob@x.io"), 1);
        assert_eq!(params[0], ("search", "bob@x.io".to_string()));
    }

    #[test]
    fn test_per_page_clamped() {
        let client = GitLabClient::new(Duration::from_secs(5), 1000).unwrap();
        assert_eq!(client.per_page, 100);
    }

    #[test]
    fn test_status_error_prefers_api_message() {
        let err = status_error(StatusCode::NOT_FOUND, r#"{"message":"404 User Not Found"}"#);
        assert_eq!(
            err,
            HostCallError::Status {
                code: 404,
                message: "404 User Not Found".to_string(),
            }
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_status_error_falls_back_to_reason() {
        let err = status_error(StatusCode::FORBIDDEN, "<html>nope</html>");
        assert_eq!(err.to_string(), "HTTP 403: Forbidden");
    }

    #[test]
    fn test_status_error_keeps_plain_text_body() {
        let err = status_error(StatusCode::BAD_GATEWAY, "upstream\n  timed out\n");
        assert_eq!(err.to_string(), "HTTP 502: upstream timed out");
    }

    #[test]
    fn test_extract_message_variants() {
        assert_eq!(
            extract_message(r#"{"error":"insufficient_scope"}"#).as_deref(),
            Some("insufficient_scope")
        );
        assert_eq!(
            extract_message(r#"{"message":{"email":["is invalid"]}}"#).as_deref(),
            Some(r#"{"email":["is invalid"]}"#)
        );
        assert_eq!(extract_message("plain"), None);
    }

    #[tokio::test]
    async fn test_cached_search_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResponseCache::new(dir.path(), Duration::from_secs(60));
        let query = UserQuery::new(UserField::Username, "bob");
        let users = vec![User::new(1, "bob")];
        cache.put("main", &query.cache_key(), &users).await;

        // Unroutable host: only a cache hit can succeed.
        let client = GitLabClient::new(Duration::from_millis(200), 100)
            .unwrap()
            .with_cache(cache);
        let fetched = client
            .search_users(&host(), &query, CacheMode::Use)
            .await
            .unwrap();

        assert!(fetched.cached);
        assert_eq!(fetched.value, users);
    }

    #[test]
    fn test_parse_next_page() {
        assert_eq!(parse_next_page(Some("2")), Some(2));
        assert_eq!(parse_next_page(Some(" 3 ")), Some(3));
        assert_eq!(parse_next_page(Some("")), None);
        assert_eq!(parse_next_page(Some("next")), None);
        assert_eq!(parse_next_page(None), None);
    }

    #[tokio::test]
    async fn test_pages_accumulate_until_last() {
        let (host, requested) = serve_pages(Some(3)).await;
        let client = GitLabClient::new(Duration::from_secs(5), 1).unwrap();

        let fetched = client
            .search_users(&host, &UserQuery::new(UserField::Name, "Bob"), CacheMode::Bypass)
            .await
            .unwrap();

        assert!(!fetched.cached);
        let ids: Vec<u64> = fetched.value.iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(*requested.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_page_cap_fails_the_host() {
        let (host, requested) = serve_pages(None).await;
        let client = GitLabClient::new(Duration::from_secs(5), 1)
            .unwrap()
            .with_max_pages(4);

        let err = client
            .search_users(&host, &UserQuery::new(UserField::Name, "Bob"), CacheMode::Bypass)
            .await
            .unwrap_err();

        assert_eq!(err, HostCallError::TooManyPages { pages: 4 });
        assert_eq!(
            err.to_string(),
            "more than 4 pages of results; narrow the query"
        );
        assert_eq!(*requested.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_default_page_cap() {
        let (host, requested) = serve_pages(None).await;
        let client = GitLabClient::new(Duration::from_secs(5), 1).unwrap();

        let err = client
            .search_users(&host, &UserQuery::new(UserField::Email, "bob@x.io"), CacheMode::Bypass)
            .await
            .unwrap_err();

        assert_eq!(err, HostCallError::TooManyPages { pages: MAX_PAGES });
        assert_eq!(requested.lock().unwrap().len(), MAX_PAGES as usize);
    }
}
