pub mod dispatcher;
pub mod relay;
pub mod validator;

pub use dispatcher::{DispatchOutcome, NotificationDispatcher, SendRequest};
pub use relay::{relay_topic_name, RelayTopic};
pub use validator::CredentialValidator;
