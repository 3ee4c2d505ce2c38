//! Groups Module
//!
//! User groups and their membership. Authorities granted to a group apply
//! to every member (see `auth::authorities`).

pub mod db;
pub mod handlers;

pub use db::Group;
pub use handlers::{
    add_member, create_group, delete_group, get_group, list_groups, remove_member, update_group,
    GroupRequest, GroupView,
};
