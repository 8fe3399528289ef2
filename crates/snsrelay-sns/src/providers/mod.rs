//! Remote API abstractions and implementations

mod aws;
mod traits;

#[cfg(test)]
pub mod mock;

pub use aws::{AwsClientFactory, AwsIdentityClient, AwsSnsClient};
pub use traits::*;

#[cfg(test)]
pub use mock::MockSnsApi;
