use std::sync::Arc;

use service::user::{UserPolicy, UserRepository, UserService};

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService<dyn UserRepository>>,
}

impl AppState {
    pub fn new(repo: Arc<dyn UserRepository>, policy: UserPolicy) -> Self {
        Self { users: Arc::new(UserService::new(repo, policy)) }
    }

    pub fn from_service(users: UserService<dyn UserRepository>) -> Self {
        Self { users: Arc::new(users) }
    }
}
