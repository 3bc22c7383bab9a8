//! Score value object and its store port

pub mod model;
pub mod repository;

pub use model::{mean_score, Score};
pub use repository::ScoreRepository;
