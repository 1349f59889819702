//! User module: three-layer architecture (domain, repository, service).
//!
//! Age eligibility, partial patches, full replacement and birth-date range search
//! live here; storage is reached only through [`repository::UserRepository`].

pub mod domain;
pub mod patch;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{parse_iso_date, User, UserData, UserRecord};
pub use patch::{UserField, UserPatch};
pub use repo::{memory::InMemoryUserRepository, seaorm::SeaOrmUserRepository};
pub use repository::UserRepository;
pub use service::{UserPolicy, UserService};
