//! Business logic between the routes and the store.

mod auth;
mod users;

pub use auth::AuthService;
pub use users::{UserService, UserUpdate};
