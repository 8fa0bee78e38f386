use super::posts_models::{PostPair, PublishedPair};
use async_trait::async_trait;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("Platform API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("Rate limited after {attempts} attempt(s)")]
    RateLimited { attempts: u32 },
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Unexpected response: {0}")]
    Decode(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Primary post failed: {0}")]
    Primary(PlatformError),
    #[error("Reply to post {primary_id} failed: {source}")]
    Reply {
        primary_id: String,
        source: PlatformError,
    },
}

/// The two operations we need from the social platform.
#[async_trait]
pub trait SocialPlatform: Send + Sync {
    /// Create a standalone post and return its id.
    async fn create_post(&self, text: &str) -> Result<String, PlatformError>;

    /// Create a post threaded under `in_reply_to` and return its id.
    async fn create_reply(&self, text: &str, in_reply_to: &str) -> Result<String, PlatformError>;
}

#[async_trait]
impl<T: SocialPlatform + ?Sized> SocialPlatform for std::sync::Arc<T> {
    async fn create_post(&self, text: &str) -> Result<String, PlatformError> {
        (**self).create_post(text).await
    }

    async fn create_reply(&self, text: &str, in_reply_to: &str) -> Result<String, PlatformError> {
        (**self).create_reply(text, in_reply_to).await
    }
}

/// Posts a primary message, waits, then threads the reply under it.
pub struct Publisher<P: SocialPlatform> {
    platform: P,
    reply_delay: Duration,
}

impl<P: SocialPlatform> Publisher<P> {
    pub fn new(platform: P, reply_delay: Duration) -> Self {
        Self {
            platform,
            reply_delay,
        }
    }

    /// Publish `text + "\n" + url`, then `link` as a reply to it.
    ///
    /// Both submissions must succeed. Nothing is rolled back when the reply
    /// fails, so the primary post stays up.
    pub async fn publish(
        &self,
        text: &str,
        url: &str,
        link: &str,
    ) -> Result<PublishedPair, PublishError> {
        self.publish_pair(&PostPair::new(text, url, link)).await
    }

    pub async fn publish_pair(&self, pair: &PostPair) -> Result<PublishedPair, PublishError> {
        let primary_id = match self.platform.create_post(&pair.primary).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to create primary post: {}", e);
                return Err(PublishError::Primary(e));
            }
        };
        tracing::info!(post_id = %primary_id, "Primary post created");

        if !self.reply_delay.is_zero() {
            tracing::debug!("Waiting {:?} before posting the reply", self.reply_delay);
            tokio::time::sleep(self.reply_delay).await;
        }

        let reply_id = match self.platform.create_reply(&pair.reply, &primary_id).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(post_id = %primary_id, "Failed to create reply: {}", e);
                return Err(PublishError::Reply {
                    primary_id,
                    source: e,
                });
            }
        };
        tracing::info!(post_id = %primary_id, reply_id = %reply_id, "Reply created");

        Ok(PublishedPair {
            primary_id,
            reply_id,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingPlatform;
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn publishes_primary_then_threaded_reply() {
        let platform = Arc::new(RecordingPlatform::default());
        let publisher = Publisher::new(Arc::clone(&platform), Duration::ZERO);

        let ids = publisher
            .publish("Great post", "http://v.example/1", "http://aff.example/1")
            .await
            .unwrap();

        assert_eq!(ids.primary_id, "post-1");
        assert_eq!(ids.reply_id, "post-2");
        assert_eq!(
            platform.submitted(),
            vec![
                ("Great post\nhttp://v.example/1".to_string(), None),
                (
                    "http://aff.example/1".to_string(),
                    Some("post-1".to_string())
                ),
            ]
        );
    }

    #[tokio::test]
    async fn primary_failure_skips_reply() {
        let platform = Arc::new(RecordingPlatform {
            fail_primary: true,
            ..Default::default()
        });
        let publisher = Publisher::new(Arc::clone(&platform), Duration::ZERO);

        let err = publisher.publish("t", "u", "l").await.unwrap_err();
        assert!(matches!(err, PublishError::Primary(_)));
        assert!(platform.submitted().is_empty());
    }

    #[tokio::test]
    async fn reply_failure_is_overall_failure() {
        let platform = Arc::new(RecordingPlatform {
            fail_reply: true,
            ..Default::default()
        });
        let publisher = Publisher::new(Arc::clone(&platform), Duration::ZERO);

        match publisher.publish("t", "u", "l").await {
            Err(PublishError::Reply { primary_id, .. }) => assert_eq!(primary_id, "post-1"),
            other => panic!("expected reply failure, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn waits_before_replying() {
        let platform = Arc::new(RecordingPlatform::default());
        let publisher = Publisher::new(Arc::clone(&platform), Duration::from_secs(20));

        let started = tokio::time::Instant::now();
        publisher.publish("t", "u", "l").await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(20));
    }
}
