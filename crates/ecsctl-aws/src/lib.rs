//! # ecsctl-aws
//!
//! AWS plumbing behind the ECS commands.
//!
//! ```text
//! ClientSettings ──► SdkConfig::resolve ──► EcsTransport
//!   (flags)            (flags > env >          │
//!                       shared files)          ▼
//!                                          AwsClient::json_request
//!                                              │  SigV4Signer
//!                                              ▼
//!                                   POST / x-amz-target: ...V20141113.Op
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod signing;
pub mod transport;

pub use client::{AwsClient, AwsResponse};
pub use config::{AwsCredentials, AwsProfile, AwsRegion, ClientSettings, SdkConfig};
pub use error::{AwsError, AwsResult};
pub use transport::EcsTransport;
