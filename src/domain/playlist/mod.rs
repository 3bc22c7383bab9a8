//! Playlist aggregate plus the favourite and playlist-track link tables.

pub mod model;
pub mod repository;

pub use model::{Playlist, PlaylistAudiotrack, UserFavourite};
pub use repository::{PlaylistAudiotrackRepository, PlaylistRepository, UserFavouriteRepository};
