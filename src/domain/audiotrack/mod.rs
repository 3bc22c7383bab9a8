//! Audiotrack aggregate

pub mod model;
pub mod repository;

pub use model::Audiotrack;
pub use repository::AudiotrackRepository;
