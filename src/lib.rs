//! Pre-assessment webhook receiver.
//!
//! Accepts `organization_id`, `preassessment_id` and `regulation_id`
//! notifications over HTTP and keeps them in memory for inspection.

pub mod config;
pub mod error;
pub mod http_server;
pub mod store;
pub mod types;

pub use error::{FieldError, ReceiverError, ServeError, StoreError};
pub use http_server::{router, serve};
pub use store::WebhookStore;
pub use types::{PreassessmentPayload, WebhookRecord};
