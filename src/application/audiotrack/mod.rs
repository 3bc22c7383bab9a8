//! Audiotrack metadata plus binary content

pub mod service;

pub use service::AudiotrackService;
