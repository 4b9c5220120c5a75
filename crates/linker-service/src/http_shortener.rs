use async_trait::async_trait;
use linker_core::error::ShortenerError;
use linker_core::model::Alias;
use linker_core::shortener::UrlShortener;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

type Result<T> = std::result::Result<T, ShortenerError>;

const STATUS_OK: &str = "OK";

#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    url: &'a str,
    alias: &'a str,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    alias: &'a str,
}

#[derive(Debug, Deserialize)]
struct ShortenerResponse {
    status: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    alias: Option<String>,
}

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: Option<String>,
}

/// [`UrlShortener`] backed by a JSON-over-HTTP shortening service.
///
/// `POST {base}/` registers `{url, alias}` and `DELETE {base}/` releases
/// `{alias}`. A response whose `status` is not `"OK"` is a rejection. The
/// short URL handed back to callers is `{base}/{alias}`.
#[derive(Debug, Clone)]
pub struct HttpUrlShortener {
    client: reqwest::Client,
    base_url: String,
    credentials: Option<Credentials>,
}

impl HttpUrlShortener {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(base_url)
            .map_err(|err| ShortenerError::Transport(format!("invalid base url {base_url}: {err}")))?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ShortenerError::Transport(err.to_string()))?;

        Ok(Self {
            client,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            credentials: None,
        })
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: Option<String>) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            password,
        });
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            Some(credentials) => {
                request.basic_auth(&credentials.username, credentials.password.as_deref())
            }
            None => request,
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ShortenerResponse> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response
            .json::<ShortenerResponse>()
            .await
            .map_err(|err| {
                if status.is_success() {
                    ShortenerError::InvalidResponse(err.to_string())
                } else {
                    ShortenerError::Rejected(format!("unexpected http status {status}"))
                }
            })?;

        if body.status != STATUS_OK {
            return Err(ShortenerError::Rejected(
                body.error
                    .unwrap_or_else(|| format!("status {}", body.status)),
            ));
        }
        Ok(body)
    }
}

fn map_transport_error(err: reqwest::Error) -> ShortenerError {
    if err.is_timeout() {
        ShortenerError::Timeout
    } else {
        ShortenerError::Transport(err.to_string())
    }
}

#[async_trait]
impl UrlShortener for HttpUrlShortener {
    async fn shorten(&self, url: &str, desired_alias: &Alias) -> Result<String> {
        trace!(alias = %desired_alias, "registering link with shortener");
        let request = self.client.post(self.endpoint()).json(&SaveRequest {
            url,
            alias: desired_alias.as_str(),
        });

        let response = self.send(request).await?;
        let alias = response
            .alias
            .filter(|alias| !alias.is_empty())
            .unwrap_or_else(|| desired_alias.to_string());
        Ok(format!("{}/{}", self.base_url, alias))
    }

    async fn release(&self, alias: &str) -> Result<()> {
        trace!(alias = %alias, "releasing alias at shortener");
        let request = self
            .client
            .delete(self.endpoint())
            .json(&DeleteRequest { alias });

        self.send(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    const EXPECTED_AUTH: &str = "Basic bGlua2VyOnNlY3JldA==";

    async fn save(headers: HeaderMap, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        if headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) != Some(EXPECTED_AUTH) {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"status": "Error", "error": "unauthorized"})),
            );
        }
        if body["alias"] == "taken" {
            return (
                StatusCode::OK,
                Json(json!({"status": "Error", "error": "alias already exists"})),
            );
        }
        (
            StatusCode::OK,
            Json(json!({"status": "OK", "alias": body["alias"]})),
        )
    }

    async fn remove(Json(body): Json<Value>) -> Json<Value> {
        if body["alias"] == "unknown" {
            Json(json!({"status": "Error", "error": "url not found"}))
        } else {
            Json(json!({"status": "OK"}))
        }
    }

    async fn spawn_shortener() -> String {
        let router = Router::new().route("/", post(save).delete(remove));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn client() -> HttpUrlShortener {
        let base = spawn_shortener().await;
        HttpUrlShortener::new(&base, Duration::from_secs(2))
            .unwrap()
            .with_basic_auth("linker", Some("secret".to_string()))
    }

    #[tokio::test]
    async fn shorten_returns_url_under_base() {
        let shortener = client().await;

        let short = shortener
            .shorten("https://example.com", &Alias::new_unchecked("doc1"))
            .await
            .unwrap();

        assert_eq!(short, format!("{}/doc1", shortener.base_url));
    }

    #[tokio::test]
    async fn status_other_than_ok_is_rejection() {
        let shortener = client().await;

        let err = shortener
            .shorten("https://example.com", &Alias::new_unchecked("taken"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenerError::Rejected(msg) if msg == "alias already exists"));
    }

    #[tokio::test]
    async fn missing_credentials_are_rejected() {
        let base = spawn_shortener().await;
        let shortener = HttpUrlShortener::new(&base, Duration::from_secs(2)).unwrap();

        let err = shortener
            .shorten("https://example.com", &Alias::new_unchecked("doc1"))
            .await
            .unwrap_err();

        assert!(matches!(err, ShortenerError::Rejected(_)));
    }

    #[tokio::test]
    async fn release_known_and_unknown_alias() {
        let shortener = client().await;

        shortener.release("doc1").await.unwrap();
        let err = shortener.release("unknown").await.unwrap_err();
        assert!(matches!(err, ShortenerError::Rejected(_)));
    }

    #[tokio::test]
    async fn unreachable_shortener_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let shortener =
            HttpUrlShortener::new(&format!("http://{addr}"), Duration::from_secs(2)).unwrap();

        let err = shortener.release("doc1").await.unwrap_err();

        assert!(matches!(err, ShortenerError::Transport(_)));
    }

    #[test]
    fn invalid_base_url() {
        assert!(HttpUrlShortener::new("not a url", Duration::from_secs(1)).is_err());
    }
}
