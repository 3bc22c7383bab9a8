use uuid::Uuid;

/// A user's comment on an audiotrack. Ids are supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commentary {
    pub id: Uuid,
    pub author_id: Uuid,
    pub audiotrack_id: Uuid,
    pub text: String,
}

impl Commentary {
    pub fn new(author_id: Uuid, audiotrack_id: Uuid, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            audiotrack_id,
            text: text.into(),
        }
    }
}
