//! Audiotrack scoring

pub mod service;

pub use service::ScoreService;
