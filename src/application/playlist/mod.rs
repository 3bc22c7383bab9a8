//! Playlists and their audiotracks

pub mod service;

pub use service::PlaylistService;
