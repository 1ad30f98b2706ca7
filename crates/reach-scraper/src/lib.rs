//! Resilient follower-count extraction for public social profiles.
//!
//! Each platform owns an ordered list of [`Strategy`] implementations. A
//! [`PlatformExtractor`] walks that list until one strategy yields a follower
//! count and otherwise returns a degraded [`reach_core::SocialStats`]; the
//! [`RequestCoordinator`] runs one extractor per requested platform
//! concurrently and assembles the report.

pub mod canonical;
pub mod coordinator;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod normalize;
pub(crate) mod patterns;
pub mod platforms;
pub mod strategy;
pub mod transport;

pub use canonical::canonicalize;
pub use coordinator::RequestCoordinator;
pub use error::ScraperError;
pub use extractor::PlatformExtractor;
pub use identity::{FixedIdentity, Identity, IdentityPolicy, RotatingIdentity};
pub use normalize::normalize_count;
pub use strategy::{PartialStats, Strategy, StrategyOutcome, StrategyRequest};
pub use transport::{FetchRequest, FetchResponse, ReqwestTransport, Transport, TransportError};
