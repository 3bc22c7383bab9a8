use uuid::Uuid;

/// Audiotrack metadata. The binary lives in the audio file store under `filepath`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Audiotrack {
    pub id: Uuid,
    pub title: String,
    pub author_id: Uuid,
    pub filepath: String,
}

impl Audiotrack {
    pub fn new(title: impl Into<String>, author_id: Uuid, filepath: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            author_id,
            filepath: filepath.into(),
        }
    }
}
