//! Authenticated GET against the API. Every call goes to `{scheme}://{host}/{endpoint}` with
//! the `x-rapidapi-*` headers taken from the same [ApiConfig].

use crate::config::ApiConfig;
use crate::error::{FetchError, FetchErrorKind};
use log::{debug, error, info};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Url;
use serde_json::Value;

/// Key in the body under which the API nests the payload
pub const RESPONSE_FIELD: &str = "response";

/// Holds one reqwest client, so repeated calls reuse the connection.
#[derive(Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let client = create_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Calls `endpoint` and hands back what sits under `response` in the body, untouched.
    pub async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let body = self.get_raw(endpoint, params).await?;
        extract_response(body)
    }

    /// Same request as [ApiClient::get] but returns the whole decoded body.
    pub async fn get_raw(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, FetchError> {
        let result = self.send(endpoint, params).await;
        match &result {
            Ok(_) => info!("API Call Successful!"),
            Err(e) => log_failure(e),
        }
        info!("API Call completed.");
        result
    }

    async fn send(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, FetchError> {
        let url = build_url(&self.config, endpoint, params)?;
        debug!("Fetching data from {}", url);
        let resp = self.client.get(url).send().await?;
        let resp = resp.error_for_status()?;
        let content = resp.text().await?;
        serde_json::from_str(&content)
            .map_err(|e| FetchError::new(FetchErrorKind::Decode, e.to_string()))
    }
}

/// One-off call, builds a fresh client each time.
pub async fn fetch(
    config: &ApiConfig,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<Value, FetchError> {
    let client = ApiClient::new(config.clone())?;
    client.get(endpoint, params).await
}

pub fn build_url(
    config: &ApiConfig,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<Url, FetchError> {
    let full_url = format!(
        "{}://{}/{}",
        config.scheme.as_str(),
        config.host.trim(),
        endpoint.trim_start_matches('/')
    );
    let mut url = Url::parse(&full_url).map_err(|e| {
        FetchError::new(
            FetchErrorKind::Request,
            format!("Invalid url {}: {}", full_url, e),
        )
    })?;
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    Ok(url)
}

pub fn extract_response(mut body: Value) -> Result<Value, FetchError> {
    match body.get_mut(RESPONSE_FIELD) {
        Some(response) => Ok(response.take()),
        None => {
            let err = FetchError::new(
                FetchErrorKind::MissingResponse,
                format!("Body has no \"{}\" field", RESPONSE_FIELD),
            );
            error!("{}", err);
            Err(err)
        }
    }
}

fn log_failure(err: &FetchError) {
    match err.kind {
        FetchErrorKind::Http(_) => error!("HTTP error occurred: {}", err.message),
        FetchErrorKind::Connection => error!("Connection error occurred: {}", err.message),
        FetchErrorKind::Timeout => error!("Timeout error occurred: {}", err.message),
        FetchErrorKind::Decode => error!("Failed to decode body: {}", err.message),
        FetchErrorKind::Request | FetchErrorKind::MissingResponse => {
            error!("An error occurred: {}", err.message)
        }
    }
}

fn default_headers(config: &ApiConfig) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        reqwest::header::ACCEPT_ENCODING,
        HeaderValue::from_static("gzip, deflate"),
    );
    headers.insert(
        reqwest::header::CONNECTION,
        HeaderValue::from_static("keep-alive"),
    );
    headers.insert(
        HeaderName::from_static("x-rapidapi-host"),
        header_value("x-rapidapi-host", config.host.trim())?,
    );
    let mut key = header_value("x-rapidapi-key", config.key())?;
    key.set_sensitive(true);
    headers.insert(HeaderName::from_static("x-rapidapi-key"), key);
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value).map_err(|e| {
        FetchError::new(
            FetchErrorKind::Request,
            format!("Invalid value for header {}: {}", name, e),
        )
    })
}

fn create_client(config: &ApiConfig) -> Result<reqwest::Client, FetchError> {
    let mut client_builder =
        reqwest::ClientBuilder::new().default_headers(default_headers(config)?);
    if let Some(timeout) = config.timeout {
        client_builder = client_builder.timeout(timeout);
    }
    Ok(client_builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scheme;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves a single canned response on localhost and reports the raw request it got.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_head(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            let _ = tx.send(request);
        });
        (addr.to_string(), rx)
    }

    async fn read_head(socket: &mut tokio::net::TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 1024];
        while !buffer.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..n]);
        }
        String::from_utf8_lossy(&buffer).to_string()
    }

    fn local_config(host: &str) -> ApiConfig {
        ApiConfig::new(host, "test-key").with_scheme(Scheme::Http)
    }

    #[test]
    fn url_from_host_and_endpoint() {
        let config = ApiConfig::new("v3.football.api-sports.io", "k");
        let url = build_url(&config, "leagues", &[]).unwrap();
        assert_eq!(url.as_str(), "https://v3.football.api-sports.io/leagues");
        let url = build_url(&config, "/teams", &[("league", "39"), ("season", "2023")]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://v3.football.api-sports.io/teams?league=39&season=2023"
        );
    }

    #[test]
    fn url_encodes_params() {
        let config = ApiConfig::new("example.com", "k");
        let url = build_url(&config, "teams", &[("search", "real madrid")]).unwrap();
        assert_eq!(url.query(), Some("search=real+madrid"));
    }

    #[test]
    fn headers_come_from_config() {
        let config = ApiConfig::new("example.com", "abc123");
        let headers = default_headers(&config).unwrap();
        assert_eq!(headers["accept"], "application/json");
        assert_eq!(headers["accept-encoding"], "gzip, deflate");
        assert_eq!(headers["connection"], "keep-alive");
        assert_eq!(headers["x-rapidapi-host"], "example.com");
        assert_eq!(headers["x-rapidapi-key"], "abc123");
        assert!(headers["x-rapidapi-key"].is_sensitive());
    }

    #[test]
    fn extract_missing_response() {
        let err = extract_response(serde_json::json!({"errors": []})).unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::MissingResponse);
        let value = extract_response(serde_json::json!({"response": null})).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[tokio::test]
    async fn returns_response_field_unchanged() {
        let body = r#"{"get":"leagues","results":2,"response":[{"league":{"id":39}},{"league":{"id":140}}]}"#;
        let (host, request) = serve_once("200 OK", body).await;
        let value = fetch(&local_config(&host), "leagues", &[("country", "England")])
            .await
            .unwrap();
        assert_eq!(
            value,
            serde_json::json!([{"league":{"id":39}},{"league":{"id":140}}])
        );

        let request = request.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /leagues?country=england http/1.1"));
        assert!(request.contains("x-rapidapi-key: test-key"));
        assert!(request.contains(&format!("x-rapidapi-host: {}", host)));
        assert!(request.contains("accept: application/json"));
    }

    #[tokio::test]
    async fn not_found_is_http_error() {
        let (host, _request) = serve_once("404 Not Found", r#"{"message":"nope"}"#).await;
        let err = fetch(&local_config(&host), "nothing", &[]).await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Http(404));
    }

    #[tokio::test]
    async fn body_without_response_field() {
        let (host, _request) = serve_once("200 OK", r#"{"errors":{"token":"bad"}}"#).await;
        let err = fetch(&local_config(&host), "leagues", &[]).await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::MissingResponse);
    }

    #[tokio::test]
    async fn raw_keeps_whole_body() {
        let (host, _request) = serve_once("200 OK", r#"{"results":0,"response":[]}"#).await;
        let client = ApiClient::new(local_config(&host)).unwrap();
        let body = client.get_raw("leagues", &[]).await.unwrap();
        assert_eq!(body, serde_json::json!({"results": 0, "response": []}));
    }

    #[tokio::test]
    async fn invalid_json_is_decode_error() {
        let (host, _request) = serve_once("200 OK", "<html>oops</html>").await;
        let err = fetch(&local_config(&host), "leagues", &[]).await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Decode);
    }

    #[tokio::test]
    async fn refused_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();
        drop(listener);
        let err = fetch(&local_config(&host), "leagues", &[]).await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Connection);
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let host = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            // Accept and then never answer
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
        });
        let config = local_config(&host).with_timeout(Duration::from_millis(200));
        let err = fetch(&config, "leagues", &[]).await.unwrap_err();
        assert_eq!(err.kind, FetchErrorKind::Timeout);
    }
}
