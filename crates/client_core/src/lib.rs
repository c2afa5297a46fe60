//! Client-side orchestration for the promotions service: form binding,
//! request dispatch and search result rendering.

pub mod error;
pub mod form;
pub mod render;
pub mod service;
pub mod session;

pub use error::ServiceError;
pub use form::{FormField, PromotionForm};
pub use render::ResultsTable;
pub use service::{HttpPromotionService, PromotionService, ServiceOptions};
pub use session::{Action, Completion, Dispatcher, EditSession};

#[cfg(test)]
#[path = "tests/fake_server.rs"]
pub(crate) mod fake_server;
