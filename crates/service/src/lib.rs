//! Service layer providing business-oriented CRUD operations on user records.
//! - Separates business logic from data access (`user::UserRepository`).
//! - Reuses entity definitions in the `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod user;
#[cfg(test)]
pub mod test_support;

pub use errors::ServiceError;
pub use user::{UserPolicy, UserService};
