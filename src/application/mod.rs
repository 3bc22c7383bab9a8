//! Application layer - use-case services over the domain ports

pub mod audiotrack;
pub mod commentary;
pub mod identity;
pub mod playlist;
pub mod score;

pub use audiotrack::AudiotrackService;
pub use commentary::CommentaryService;
pub use identity::{IdentityService, IdentityServiceBuilder};
pub use playlist::PlaylistService;
pub use score::ScoreService;
