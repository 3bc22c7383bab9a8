//! Commentary aggregate

pub mod model;
pub mod repository;

pub use model::Commentary;
pub use repository::CommentaryRepository;
