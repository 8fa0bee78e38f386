use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use super::oauth1::OAuth1Credentials;
use crate::core::posts::{PlatformError, SocialPlatform};
use crate::infra::http::{send_with_backoff, RetryPolicy, SendError};

const API_BASE: &str = "https://api.twitter.com";

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: CreatedPost,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
}

/// Posting client for the v2 API, signed with the account's OAuth 1.0a keys.
pub struct TwitterApiClient {
    client: Client,
    credentials: OAuth1Credentials,
    base_url: String,
    retry: RetryPolicy,
}

impl TwitterApiClient {
    pub fn new(credentials: OAuth1Credentials) -> Result<Self, PlatformError> {
        let mut headers = HeaderMap::new();
        headers.insert("User-Agent", HeaderValue::from_static("sheet_poster/1.0"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| PlatformError::Http(e.to_string()))?;

        Ok(Self {
            client,
            credentials,
            base_url: API_BASE.to_string(),
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn submit(&self, body: serde_json::Value) -> Result<String, PlatformError> {
        let url = format!("{}/2/tweets", self.base_url);

        // Each retry gets a fresh nonce and timestamp.
        let response = send_with_backoff(self.retry, || {
            self.client
                .post(&url)
                .header(
                    AUTHORIZATION,
                    self.credentials.authorization_header("POST", &url, &[]),
                )
                .json(&body)
        })
        .await
        .map_err(|e| match e {
            SendError::RateLimited { attempts } => PlatformError::RateLimited { attempts },
            SendError::Http(e) => PlatformError::Http(e.to_string()),
        })?;

        Self::created_id(response).await
    }

    async fn created_id(response: Response) -> Result<String, PlatformError> {
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api { status, body });
        }

        let created: CreatePostResponse = response
            .json()
            .await
            .map_err(|e| PlatformError::Decode(e.to_string()))?;
        Ok(created.data.id)
    }
}

#[async_trait]
impl SocialPlatform for TwitterApiClient {
    async fn create_post(&self, text: &str) -> Result<String, PlatformError> {
        let id = self.submit(json!({ "text": text })).await?;
        tracing::debug!("Created post {}", id);
        Ok(id)
    }

    async fn create_reply(&self, text: &str, in_reply_to: &str) -> Result<String, PlatformError> {
        let id = self
            .submit(json!({
                "text": text,
                "reply": { "in_reply_to_tweet_id": in_reply_to },
            }))
            .await?;
        tracing::debug!("Created reply {} under {}", id, in_reply_to);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap as AxumHeaders, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(Option<String>, serde_json::Value)>>>;

    fn credentials() -> OAuth1Credentials {
        OAuth1Credentials {
            consumer_key: "ck".to_string(),
            consumer_secret: "cs".to_string(),
            access_token: "at".to_string(),
            access_token_secret: "ats".to_string(),
        }
    }

    /// Local stand-in for the posting endpoint. Answers with `status` and,
    /// on success, sequential ids.
    async fn fake_api(status: StatusCode) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let recorded = Arc::clone(&seen);
        let app = Router::new().route(
            "/2/tweets",
            post(move |headers: AxumHeaders, Json(body): Json<serde_json::Value>| {
                let recorded = Arc::clone(&recorded);
                async move {
                    let auth = headers
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    let mut seen = recorded.lock().unwrap();
                    seen.push((auth, body));
                    let id = format!("{}", 1000 + seen.len());
                    (status, Json(json!({ "data": { "id": id, "text": "" } })))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    #[tokio::test]
    async fn posts_and_replies_are_signed_and_threaded() {
        let (base, seen) = fake_api(StatusCode::CREATED).await;
        let client = TwitterApiClient::new(credentials())
            .unwrap()
            .with_base_url(base);

        let primary = client.create_post("hello\nhttps://v.example/1").await.unwrap();
        let reply = client
            .create_reply("https://shop.example/1", &primary)
            .await
            .unwrap();
        assert_eq!(primary, "1001");
        assert_eq!(reply, "1002");

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].1, json!({ "text": "hello\nhttps://v.example/1" }));
        assert_eq!(
            seen[1].1,
            json!({
                "text": "https://shop.example/1",
                "reply": { "in_reply_to_tweet_id": "1001" }
            })
        );
        for (auth, _) in seen.iter() {
            let auth = auth.as_deref().unwrap();
            assert!(auth.starts_with("OAuth "));
            assert!(auth.contains("oauth_consumer_key=\"ck\""));
            assert!(auth.contains("oauth_signature="));
        }
    }

    #[tokio::test]
    async fn rejected_post_is_an_api_error() {
        let (base, _) = fake_api(StatusCode::FORBIDDEN).await;
        let client = TwitterApiClient::new(credentials())
            .unwrap()
            .with_base_url(base);

        let err = client.create_post("duplicate").await.unwrap_err();
        assert!(matches!(err, PlatformError::Api { status: 403, .. }));
    }

    #[tokio::test]
    async fn persistent_throttling_is_reported() {
        let (base, seen) = fake_api(StatusCode::TOO_MANY_REQUESTS).await;
        let client = TwitterApiClient::new(credentials())
            .unwrap()
            .with_base_url(base)
            .with_retry(RetryPolicy {
                max_retries: 1,
                base_delay: std::time::Duration::from_millis(1),
            });

        let err = client.create_post("hi").await.unwrap_err();
        assert!(matches!(err, PlatformError::RateLimited { attempts: 2 }));
        assert_eq!(seen.lock().unwrap().len(), 2);
    }
}
