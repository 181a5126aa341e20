pub mod codes;
pub mod screening;
pub mod signup;

pub use signup::SignupService;
