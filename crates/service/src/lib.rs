//! Service layer: business operations on top of the `models` entities.
//! - `store::EntityStore` is the facade the HTTP layer talks to.
//! - Per-entity modules hold the operations, generic over the connection so
//!   they compose inside transactions.
//! - `ai` wraps the optional language-model assistant.

pub mod errors;
pub mod observability;
pub mod restaurant_service;
pub mod menu_service;
pub mod table_service;
pub mod staff_service;
pub mod reservation_service;
pub mod analytics;
pub mod store;
pub mod ai;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use reservation_service::{ReservationFilter, ReservationPolicy};
pub use store::EntityStore;
