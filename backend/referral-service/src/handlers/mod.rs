pub mod admin;
pub mod bulk;
pub mod health;
pub mod signup;
pub mod users;

pub use admin::{
    add_blacklist_entry, create_reserved_account, list_blacklist, list_reserved_accounts,
    remove_blacklist_entry,
};
pub use bulk::bulk_create;
pub use health::{health_check, readiness_check};
pub use signup::submit_signup;
pub use users::{lookup_user, search_users, update_profile};
