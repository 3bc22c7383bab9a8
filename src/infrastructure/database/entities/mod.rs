//! Database entities module

pub mod audiotrack;
pub mod commentary;
pub mod playlist;
pub mod playlist_audiotrack;
pub mod score;
pub mod user;
pub mod user_favourite;

pub use audiotrack::Entity as Audiotrack;
pub use commentary::Entity as Commentary;
pub use playlist::Entity as Playlist;
pub use playlist_audiotrack::Entity as PlaylistAudiotrack;
pub use score::Entity as Score;
pub use user::Entity as User;
pub use user_favourite::Entity as UserFavourite;
