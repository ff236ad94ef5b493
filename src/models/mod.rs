pub mod reset_code;
pub mod user;

pub use reset_code::ResetCode;
pub use user::{User, UserRole};
