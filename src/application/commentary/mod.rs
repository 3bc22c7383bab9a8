//! Commentary lifecycle

pub mod service;

pub use service::CommentaryService;
