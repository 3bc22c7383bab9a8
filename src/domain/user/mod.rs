//! User aggregate
//!
//! Contains the User entity, the registration candidate and the identity
//! store port.

pub mod model;
pub mod repository;

mod dto_create;

pub use dto_create::NewUser;
pub use model::{User, UserRole};
pub use repository::UserRepository;
