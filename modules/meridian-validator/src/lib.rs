//! Business-rule validator/processor: user validation, order processing,
//! analytics summary.

pub mod analytics;
pub mod health;
pub mod orders;
pub mod routes;
pub mod validate;
