//! Relay topics for direct email delivery
//!
//! SNS cannot deliver to an email address directly, so each recipient gets a
//! topic named after their address. The topic is created on first use and
//! reused afterwards; it is never deleted.

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::errors::SnsError;
use crate::providers::NotificationApi;

/// SNS limit on topic name length
pub const MAX_TOPIC_NAME_LEN: usize = 256;

/// A topic used to route a single recipient's email through SNS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayTopic {
    pub name: String,
    pub arn: String,
}

/// Hex characters of the address digest appended to every relay-topic name
const DIGEST_LEN: usize = 12;

/// Derive the relay-topic name for an email address.
///
/// The readable part replaces characters SNS does not accept in topic names
/// with `-` and is cut to fit; a digest of the lowercased address keeps
/// distinct recipients on distinct topics.
pub fn relay_topic_name(prefix: &str, email: &str) -> String {
    let email = email.trim().to_lowercase();

    let mut hasher = Sha256::new();
    hasher.update(email.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    let suffix = format!("-{}", &digest[..DIGEST_LEN]);

    let readable: String = format!("{}-{}", prefix, email)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .take(MAX_TOPIC_NAME_LEN - suffix.len())
        .collect();

    format!("{}{}", readable, suffix)
}

/// Whether a topic ARN names the given topic (the ARN's last segment)
fn arn_matches_name(arn: &str, name: &str) -> bool {
    arn.rsplit(':').next() == Some(name)
}

/// Page through all topics looking for one with the given name
pub async fn find_topic_by_name(
    api: &dyn NotificationApi,
    name: &str,
) -> Result<Option<String>, SnsError> {
    let mut next_token = None;

    loop {
        let page = api.list_topics(next_token).await?;

        if let Some(arn) = page
            .topic_arns
            .into_iter()
            .find(|arn| arn_matches_name(arn, name))
        {
            return Ok(Some(arn));
        }

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => return Ok(None),
        }
    }
}

/// Create the relay topic, or find it by name when creation is refused
pub async fn resolve_relay_topic(
    api: &dyn NotificationApi,
    name: &str,
) -> Result<RelayTopic, SnsError> {
    let create_err = match api.create_topic(name).await {
        Ok(arn) => {
            debug!("Relay topic ready: {}", arn);
            return Ok(RelayTopic {
                name: name.to_string(),
                arn,
            });
        }
        Err(e) if e.is_service_reported() => e,
        Err(e) => return Err(e),
    };

    debug!(
        "Creating relay topic {} failed ({}), looking it up by name",
        name, create_err
    );

    match find_topic_by_name(api, name).await {
        Ok(Some(arn)) => {
            debug!("Reusing existing relay topic: {}", arn);
            Ok(RelayTopic {
                name: name.to_string(),
                arn,
            })
        }
        Ok(None) => Err(create_err),
        Err(list_err) => {
            warn!("Listing topics for {} failed: {}", name, list_err);
            Err(create_err)
        }
    }
}
