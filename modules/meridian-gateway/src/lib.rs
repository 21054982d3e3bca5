//! User-facing gateway: validated user writes (remote validation before the
//! local insert), user listing, ingestion proxying, and transitive
//! readiness over both backend services.

pub mod health;
pub mod proxy;
pub mod routes;
pub mod users;
