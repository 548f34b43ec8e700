pub mod auth_dto;
pub mod auth_handlers;
pub mod jwt;
pub mod password;

pub use jwt::{create_token, verify_token, Claims};
pub use password::{hash_password, verify_password};
