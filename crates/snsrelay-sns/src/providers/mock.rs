//! In-memory SNS and STS double for testing

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::credentials::CredentialBundle;
use crate::errors::SnsError;
use crate::providers::{
    CallerIdentity, IdentityApi, NotificationApi, PublishRequest, SnsClientFactory, TopicPage,
};

pub const MOCK_ACCOUNT_ID: &str = "123456789012";

/// A message recorded by the mock on publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    pub message_id: String,
    pub topic_arn: String,
    pub subject: String,
    pub message: String,
}

/// Mock remote service for testing
#[derive(Debug, Clone)]
pub struct MockSnsApi {
    /// Counters for tracking calls
    pub identity_count: Arc<AtomicUsize>,
    pub create_topic_count: Arc<AtomicUsize>,
    pub list_topics_count: Arc<AtomicUsize>,
    pub subscribe_count: Arc<AtomicUsize>,
    pub publish_count: Arc<AtomicUsize>,

    /// Topics keyed by name, valued by ARN
    topics: Arc<Mutex<BTreeMap<String, String>>>,
    subscriptions: Arc<Mutex<Vec<(String, String, String)>>>,
    published: Arc<Mutex<Vec<PublishedMessage>>>,

    /// Configurable responses
    pub region: String,
    pub identity_error: Option<SnsError>,
    pub list_topics_error: Option<SnsError>,
    pub create_topic_error: Option<SnsError>,
    pub conflict_on_existing_topic: bool,
    pub subscribe_error: Option<SnsError>,
    pub publish_error: Option<SnsError>,
    pub page_size: usize,
}

impl Default for MockSnsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSnsApi {
    pub fn new() -> Self {
        Self {
            identity_count: Arc::new(AtomicUsize::new(0)),
            create_topic_count: Arc::new(AtomicUsize::new(0)),
            list_topics_count: Arc::new(AtomicUsize::new(0)),
            subscribe_count: Arc::new(AtomicUsize::new(0)),
            publish_count: Arc::new(AtomicUsize::new(0)),
            topics: Arc::new(Mutex::new(BTreeMap::new())),
            subscriptions: Arc::new(Mutex::new(Vec::new())),
            published: Arc::new(Mutex::new(Vec::new())),
            region: "us-east-1".to_string(),
            identity_error: None,
            list_topics_error: None,
            create_topic_error: None,
            conflict_on_existing_topic: false,
            subscribe_error: None,
            publish_error: None,
            page_size: 100,
        }
    }

    pub fn topic_arn(&self, name: &str) -> String {
        format!("arn:aws:sns:{}:{}:{}", self.region, MOCK_ACCOUNT_ID, name)
    }

    pub fn with_topic(self, name: &str) -> Self {
        let arn = self.topic_arn(name);
        self.topics.lock().unwrap().insert(name.to_string(), arn);
        self
    }

    pub fn with_identity_error(mut self, error: SnsError) -> Self {
        self.identity_error = Some(error);
        self
    }

    pub fn with_list_topics_error(mut self, error: SnsError) -> Self {
        self.list_topics_error = Some(error);
        self
    }

    pub fn with_create_topic_error(mut self, error: SnsError) -> Self {
        self.create_topic_error = Some(error);
        self
    }

    /// Reject creation of a topic that already exists, like SNS does when attributes differ
    pub fn with_existing_topic_conflict(mut self) -> Self {
        self.conflict_on_existing_topic = true;
        self
    }

    pub fn with_subscribe_error(mut self, error: SnsError) -> Self {
        self.subscribe_error = Some(error);
        self
    }

    pub fn with_publish_error(mut self, error: SnsError) -> Self {
        self.publish_error = Some(error);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn identity_call_count(&self) -> usize {
        self.identity_count.load(Ordering::SeqCst)
    }

    pub fn create_topic_call_count(&self) -> usize {
        self.create_topic_count.load(Ordering::SeqCst)
    }

    pub fn list_topics_call_count(&self) -> usize {
        self.list_topics_count.load(Ordering::SeqCst)
    }

    pub fn subscribe_call_count(&self) -> usize {
        self.subscribe_count.load(Ordering::SeqCst)
    }

    pub fn publish_call_count(&self) -> usize {
        self.publish_count.load(Ordering::SeqCst)
    }

    /// Total number of remote calls of any kind
    pub fn remote_call_count(&self) -> usize {
        self.identity_call_count()
            + self.create_topic_call_count()
            + self.list_topics_call_count()
            + self.subscribe_call_count()
            + self.publish_call_count()
    }

    pub fn topic_count(&self) -> usize {
        self.topics.lock().unwrap().len()
    }

    pub fn subscriptions(&self) -> Vec<(String, String, String)> {
        self.subscriptions.lock().unwrap().clone()
    }

    pub fn published(&self) -> Vec<PublishedMessage> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityApi for MockSnsApi {
    async fn get_caller_identity(&self) -> Result<CallerIdentity, SnsError> {
        self.identity_count.fetch_add(1, Ordering::SeqCst);

        if let Some(ref err) = self.identity_error {
            return Err(err.clone());
        }

        Ok(CallerIdentity {
            account: Some(MOCK_ACCOUNT_ID.to_string()),
            arn: Some(format!("arn:aws:iam::{}:user/mock", MOCK_ACCOUNT_ID)),
            user_id: Some("AIDAMOCKUSER".to_string()),
        })
    }
}

#[async_trait]
impl NotificationApi for MockSnsApi {
    async fn create_topic(&self, name: &str) -> Result<String, SnsError> {
        self.create_topic_count.fetch_add(1, Ordering::SeqCst);

        if let Some(ref err) = self.create_topic_error {
            return Err(err.clone());
        }

        let mut topics = self.topics.lock().unwrap();
        if let Some(arn) = topics.get(name) {
            if self.conflict_on_existing_topic {
                return Err(SnsError::remote(
                    "InvalidParameter",
                    "Invalid parameter: Attributes Reason: Topic already exists with different attributes",
                ));
            }
            return Ok(arn.clone());
        }

        let arn = self.topic_arn(name);
        topics.insert(name.to_string(), arn.clone());
        Ok(arn)
    }

    async fn list_topics(&self, next_token: Option<String>) -> Result<TopicPage, SnsError> {
        self.list_topics_count.fetch_add(1, Ordering::SeqCst);

        if let Some(ref err) = self.list_topics_error {
            return Err(err.clone());
        }

        let start: usize = next_token.and_then(|t| t.parse().ok()).unwrap_or(0);
        let topics = self.topics.lock().unwrap();
        let topic_arns: Vec<String> = topics
            .values()
            .skip(start)
            .take(self.page_size)
            .cloned()
            .collect();
        let end = start + topic_arns.len();
        let next_token = (end < topics.len()).then(|| end.to_string());

        Ok(TopicPage {
            topic_arns,
            next_token,
        })
    }

    async fn subscribe(
        &self,
        topic_arn: &str,
        protocol: &str,
        endpoint: &str,
    ) -> Result<String, SnsError> {
        self.subscribe_count.fetch_add(1, Ordering::SeqCst);

        if let Some(ref err) = self.subscribe_error {
            return Err(err.clone());
        }

        let mut subscriptions = self.subscriptions.lock().unwrap();
        subscriptions.push((
            topic_arn.to_string(),
            protocol.to_string(),
            endpoint.to_string(),
        ));
        Ok(format!("{}:{}", topic_arn, uuid::Uuid::new_v4()))
    }

    async fn publish(&self, request: &PublishRequest<'_>) -> Result<String, SnsError> {
        self.publish_count.fetch_add(1, Ordering::SeqCst);

        if let Some(ref err) = self.publish_error {
            return Err(err.clone());
        }

        let exists = self
            .topics
            .lock()
            .unwrap()
            .values()
            .any(|arn| arn == request.topic_arn);
        if !exists {
            return Err(SnsError::remote("NotFound", "Topic does not exist"));
        }

        let message_id = uuid::Uuid::new_v4().to_string();
        self.published.lock().unwrap().push(PublishedMessage {
            message_id: message_id.clone(),
            topic_arn: request.topic_arn.to_string(),
            subject: request.subject.to_string(),
            message: request.message.to_string(),
        });
        Ok(message_id)
    }
}

#[async_trait]
impl SnsClientFactory for MockSnsApi {
    async fn identity_client(&self, _credentials: &CredentialBundle) -> Arc<dyn IdentityApi> {
        Arc::new(self.clone())
    }

    async fn notification_client(
        &self,
        _credentials: &CredentialBundle,
    ) -> Arc<dyn NotificationApi> {
        Arc::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_create_topic_is_idempotent_by_default() {
        let mock = MockSnsApi::new();

        let first = mock.create_topic("alerts").await.unwrap();
        let second = mock.create_topic("alerts").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "arn:aws:sns:us-east-1:123456789012:alerts");
        assert_eq!(mock.topic_count(), 1);
        assert_eq!(mock.create_topic_call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_conflict_on_existing_topic() {
        let mock = MockSnsApi::new()
            .with_topic("alerts")
            .with_existing_topic_conflict();

        let err = mock.create_topic("alerts").await.unwrap_err();
        assert_eq!(err.remote_code(), Some("InvalidParameter"));
    }

    #[tokio::test]
    async fn test_mock_list_topics_pages() {
        let mock = MockSnsApi::new()
            .with_topic("a")
            .with_topic("b")
            .with_topic("c")
            .with_page_size(2);

        let first = mock.list_topics(None).await.unwrap();
        assert_eq!(first.topic_arns.len(), 2);
        assert_eq!(first.next_token.as_deref(), Some("2"));

        let second = mock.list_topics(first.next_token).await.unwrap();
        assert_eq!(second.topic_arns.len(), 1);
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn test_mock_publish_unknown_topic() {
        let mock = MockSnsApi::new();
        let request = PublishRequest {
            topic_arn: "arn:aws:sns:us-east-1:123456789012:missing",
            subject: "Subject",
            message: "Body",
        };

        let err = mock.publish(&request).await.unwrap_err();
        assert_eq!(err.remote_code(), Some("NotFound"));
        assert!(mock.published().is_empty());
    }

    #[tokio::test]
    async fn test_mock_identity_failure() {
        let mock = MockSnsApi::new()
            .with_identity_error(SnsError::remote("InvalidClientTokenId", "bad key"));

        assert!(mock.get_caller_identity().await.is_err());
        assert_eq!(mock.identity_call_count(), 1);
    }
}
