//! Users Module
//!
//! HTTP handlers for user administration. The user model and its database
//! operations live in `auth::users` because login needs them too.

pub mod handlers;

pub use handlers::{
    create_user, delete_user, get_user, list_users, update_user, CreateUserRequest,
    UpdateUserRequest,
};
