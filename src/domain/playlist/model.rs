use uuid::Uuid;

/// Playlist owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: Uuid,
    pub title: String,
    pub user_id: Uuid,
}

impl Playlist {
    pub fn new(title: impl Into<String>, user_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            user_id,
        }
    }
}

/// Link record marking a playlist as one of the user's favourites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserFavourite {
    pub user_id: Uuid,
    pub playlist_id: Uuid,
}

impl UserFavourite {
    pub fn new(user_id: Uuid, playlist_id: Uuid) -> Self {
        Self {
            user_id,
            playlist_id,
        }
    }
}

/// Link record placing an audiotrack in a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaylistAudiotrack {
    pub playlist_id: Uuid,
    pub audiotrack_id: Uuid,
}

impl PlaylistAudiotrack {
    pub fn new(playlist_id: Uuid, audiotrack_id: Uuid) -> Self {
        Self {
            playlist_id,
            audiotrack_id,
        }
    }
}
