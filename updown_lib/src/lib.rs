//! updown.io API client library.
//!
//! Provides a typed client for the updown.io REST API: checks, downtimes,
//! metrics, nodes, recipients, and webhooks, plus cached resolution of check
//! aliases to tokens.

pub mod alias;
pub mod cache;
pub mod checks;
pub mod client;
pub mod downtimes;
pub mod error;
pub mod helpers;
pub mod metrics;
pub mod nodes;
pub mod recipients;
pub mod secret;
pub mod webhooks;

pub use alias::{AliasResolver, Aliased};
pub use cache::{Cache, MemoryCache};
pub use checks::{Check, CheckItem, Ssl};
pub use client::{Client, Response, ResponseInfo, API_BASE, NO_BODY};
pub use downtimes::Downtime;
pub use error::{ApiError, Error};
pub use helpers::{calculate_range, get_api_key, ApiKeySource};
pub use metrics::{MetricGroup, MetricItem, Metrics};
pub use nodes::{NodeDetails, Nodes};
pub use recipients::{Recipient, RecipientType};
pub use url::Url;
pub use webhooks::Webhook;

/// Library version for User-Agent and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
