//! Authentication Handlers
//!
//! HTTP handlers for login, the current user and authority grants.

pub mod authorities;
pub mod login;
pub mod me;
pub mod types;

pub use authorities::{
    grant_group_authority, grant_user_authority, list_authorities, revoke_group_authority,
    revoke_user_authority,
};
pub use login::login;
pub use me::get_me;
