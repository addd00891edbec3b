//! SMS and topic notification senders.

use super::{SmsSender, TopicPublisher, http_client};
use crate::config::NotificationsConfig;
use crate::error::CollaboratorError;
use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

/// Posts `{ "destination", "message" }` to an SMS gateway webhook.
pub struct WebhookSmsSender {
    http: reqwest::Client,
    endpoint: String,
}

impl WebhookSmsSender {
    pub fn new(endpoint: impl Into<String>, config: &NotificationsConfig) -> Self {
        Self {
            http: http_client(config.timeout_secs),
            endpoint: endpoint.into(),
        }
    }

    async fn post(&self, message: &str, destination: &str) -> Result<(), CollaboratorError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "destination": destination, "message": message }))
            .send()
            .await
            .map_err(|source| CollaboratorError::Request {
                service: "sms gateway",
                source,
            })?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(CollaboratorError::Status {
                service: "sms gateway",
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            })
        }
    }
}

#[async_trait]
impl SmsSender for WebhookSmsSender {
    async fn send(&self, message: &str, destination: &str) -> Result<(), CollaboratorError> {
        let result = self.post(message, destination).await;
        match &result {
            Ok(()) => info!("SMS sent to {}", destination),
            Err(e) => error!("Error sending SMS to {}: {}", destination, e),
        }
        result
    }
}

/// Posts `{ "TopicArn", "Message" }` to a topic publish endpoint.
pub struct WebhookTopicPublisher {
    http: reqwest::Client,
    endpoint: String,
    topic_arn: String,
}

impl WebhookTopicPublisher {
    pub fn new(
        endpoint: impl Into<String>,
        topic_arn: impl Into<String>,
        config: &NotificationsConfig,
    ) -> Self {
        Self {
            http: http_client(config.timeout_secs),
            endpoint: endpoint.into(),
            topic_arn: topic_arn.into(),
        }
    }
}

#[async_trait]
impl TopicPublisher for WebhookTopicPublisher {
    async fn publish(&self, message: &str) -> Result<u16, CollaboratorError> {
        info!("Publishing to {}: {}", self.topic_arn, message);
        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "TopicArn": self.topic_arn, "Message": message }))
            .send()
            .await
            .map_err(|source| {
                let e = CollaboratorError::Request {
                    service: "topic publisher",
                    source,
                };
                error!("Error publishing to topic: {}", e);
                e
            })?;

        let status = response.status().as_u16();
        if status == 200 {
            info!("Message published to topic {}", self.topic_arn);
        } else {
            let body = response.text().await.unwrap_or_default();
            error!("Message failed to publish to topic (status {}): {}", status, body);
        }
        Ok(status)
    }
}

/// Used when no SMS endpoint or destination is configured.
pub struct DisabledSmsSender;

#[async_trait]
impl SmsSender for DisabledSmsSender {
    async fn send(&self, message: &str, _destination: &str) -> Result<(), CollaboratorError> {
        info!("SMS not configured; dropping staff message: {}", message);
        Ok(())
    }
}

/// Used when no publish endpoint or topic is configured.
pub struct DisabledTopicPublisher;

#[async_trait]
impl TopicPublisher for DisabledTopicPublisher {
    async fn publish(&self, message: &str) -> Result<u16, CollaboratorError> {
        info!("Topic publishing not configured; dropping staff message: {}", message);
        Ok(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_sms_posts_destination_and_message() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/sms")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "destination": "+15550100",
                "message": "Guest rated 2 out of 5"
            })))
            .with_status(202)
            .create_async()
            .await;

        let sender = WebhookSmsSender::new(
            format!("{}/sms", server.url()),
            &NotificationsConfig::default(),
        );
        sender
            .send("Guest rated 2 out of 5", "+15550100")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sms_gateway_rejection_is_an_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/sms")
            .with_status(500)
            .with_body("gateway down")
            .create_async()
            .await;

        let sender = WebhookSmsSender::new(
            format!("{}/sms", server.url()),
            &NotificationsConfig::default(),
        );
        let err = sender.send("hello", "+15550100").await.unwrap_err();
        mock.assert_async().await;
        assert!(matches!(err, CollaboratorError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_topic_publish_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/publish")
            .match_body(Matcher::Json(json!({
                "TopicArn": "arn:aws:sns:us-east-1:000000000000:front-desk",
                "Message": "Guest rated 1 out of 5"
            })))
            .with_status(200)
            .create_async()
            .await;

        let publisher = WebhookTopicPublisher::new(
            format!("{}/publish", server.url()),
            "arn:aws:sns:us-east-1:000000000000:front-desk",
            &NotificationsConfig::default(),
        );
        assert_eq!(publisher.publish("Guest rated 1 out of 5").await.unwrap(), 200);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_topic_failure_status_is_returned() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/publish")
            .with_status(500)
            .with_body("throttled")
            .create_async()
            .await;

        let publisher = WebhookTopicPublisher::new(
            format!("{}/publish", server.url()),
            "front-desk",
            &NotificationsConfig::default(),
        );
        assert_eq!(publisher.publish("hello").await.unwrap(), 500);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_topic_endpoint_is_an_error() {
        let publisher = WebhookTopicPublisher::new(
            "http://127.0.0.1:1/publish",
            "front-desk",
            &NotificationsConfig::default(),
        );
        let err = publisher.publish("hello").await.unwrap_err();
        assert!(matches!(err, CollaboratorError::Request { .. }));
    }
}
