/// Referral Service Library
///
/// Onboards users into a referral program: unique code generation,
/// referrer resolution with idempotent edge recording, blacklist
/// screening, and atomic allocation of reserved usernames from a shared
/// pool under concurrent signups.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers (thin adapters over the engine)
/// - `models`: Data structures for users, edges, the pool and the blacklist
/// - `services`: The engine - code generation, screening, signup orchestration
/// - `db`: Database access layer and repositories
/// - `error`: Error types and HTTP mapping
/// - `config`: Configuration management
/// - `validators`: Input validation
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod validators;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::SignupService;
