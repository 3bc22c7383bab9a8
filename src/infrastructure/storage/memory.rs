//! In-memory repository provider for development and testing

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::domain::{
    Audiotrack, AudiotrackRepository, Commentary, CommentaryRepository, DomainError,
    DomainResult, Playlist, PlaylistAudiotrack, PlaylistAudiotrackRepository, PlaylistRepository,
    ProvisioningTransaction, RepositoryProvider, Score, ScoreRepository, User, UserFavourite,
    UserFavouriteRepository, UserRepository,
};

/// Provisioning step at which an injected failure fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStep {
    InsertUser,
    InsertPlaylist,
    LinkFavourite,
    Commit,
}

#[derive(Default)]
struct MemoryState {
    users: DashMap<Uuid, User>,
    playlists: DashMap<Uuid, Playlist>,
    /// link → insertion sequence
    favourites: DashMap<UserFavourite, u64>,
    playlist_audiotracks: DashMap<PlaylistAudiotrack, ()>,
    audiotracks: DashMap<Uuid, Audiotrack>,
    /// id → (insertion sequence, commentary)
    commentaries: DashMap<Uuid, (u64, Commentary)>,
    /// (audiotrack, author) → score
    scores: DashMap<(Uuid, Uuid), Score>,
    seq: AtomicU64,
    /// Serialises provisioning commits so validation and apply are one step.
    commit_lock: Mutex<()>,
}

impl MemoryState {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    fn email_taken(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email == email)
    }
}

/// In-memory storage for development and testing
pub struct InMemoryRepositoryProvider {
    users: MemoryUsers,
    playlists: MemoryPlaylists,
    favourites: MemoryFavourites,
    playlist_audiotracks: MemoryPlaylistAudiotracks,
    audiotracks: MemoryAudiotracks,
    commentaries: MemoryCommentaries,
    scores: MemoryScores,
    state: Arc<MemoryState>,
    fail_at: Mutex<Option<ProvisioningStep>>,
}

impl InMemoryRepositoryProvider {
    pub fn new() -> Self {
        let state = Arc::new(MemoryState::default());
        Self {
            users: MemoryUsers(state.clone()),
            playlists: MemoryPlaylists(state.clone()),
            favourites: MemoryFavourites(state.clone()),
            playlist_audiotracks: MemoryPlaylistAudiotracks(state.clone()),
            audiotracks: MemoryAudiotracks(state.clone()),
            commentaries: MemoryCommentaries(state.clone()),
            scores: MemoryScores(state.clone()),
            state,
            fail_at: Mutex::new(None),
        }
    }

    /// Make every subsequent provisioning transaction fail at `step`.
    pub fn fail_provisioning_at(&self, step: Option<ProvisioningStep>) {
        if let Ok(mut guard) = self.fail_at.lock() {
            *guard = step;
        }
    }

    pub fn user_count(&self) -> usize {
        self.state.users.len()
    }

    pub fn playlist_count(&self) -> usize {
        self.state.playlists.len()
    }

    pub fn playlists_by_user(&self) -> HashMap<Uuid, Vec<Playlist>> {
        let mut grouped: HashMap<Uuid, Vec<Playlist>> = HashMap::new();
        for p in self.state.playlists.iter() {
            grouped.entry(p.user_id).or_default().push(p.clone());
        }
        grouped
    }

    pub fn favourite_links(&self) -> Vec<UserFavourite> {
        self.state.favourites.iter().map(|e| *e.key()).collect()
    }
}

impl Default for InMemoryRepositoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RepositoryProvider for InMemoryRepositoryProvider {
    fn users(&self) -> &dyn UserRepository {
        &self.users
    }

    fn playlists(&self) -> &dyn PlaylistRepository {
        &self.playlists
    }

    fn favourites(&self) -> &dyn UserFavouriteRepository {
        &self.favourites
    }

    fn playlist_audiotracks(&self) -> &dyn PlaylistAudiotrackRepository {
        &self.playlist_audiotracks
    }

    fn audiotracks(&self) -> &dyn AudiotrackRepository {
        &self.audiotracks
    }

    fn commentaries(&self) -> &dyn CommentaryRepository {
        &self.commentaries
    }

    fn scores(&self) -> &dyn ScoreRepository {
        &self.scores
    }

    async fn begin_provisioning(&self) -> DomainResult<Box<dyn ProvisioningTransaction>> {
        let fail_at = self.fail_at.lock().map(|g| *g).unwrap_or(None);
        Ok(Box::new(MemoryProvisioningTransaction {
            state: self.state.clone(),
            staged_users: Vec::new(),
            staged_playlists: Vec::new(),
            staged_links: Vec::new(),
            fail_at,
        }))
    }
}

// ── Provisioning transaction ────────────────────────────────────

/// Stages writes locally and applies them on commit.
struct MemoryProvisioningTransaction {
    state: Arc<MemoryState>,
    staged_users: Vec<User>,
    staged_playlists: Vec<Playlist>,
    staged_links: Vec<UserFavourite>,
    fail_at: Option<ProvisioningStep>,
}

impl MemoryProvisioningTransaction {
    fn check_fault(&self, step: ProvisioningStep) -> DomainResult<()> {
        if self.fail_at == Some(step) {
            return Err(DomainError::Storage(format!("injected failure at {:?}", step)));
        }
        Ok(())
    }

    fn user_known(&self, id: Uuid) -> bool {
        self.state.users.contains_key(&id) || self.staged_users.iter().any(|u| u.id == id)
    }

    fn playlist_known(&self, id: Uuid) -> bool {
        self.state.playlists.contains_key(&id) || self.staged_playlists.iter().any(|p| p.id == id)
    }

    fn validate(&self) -> DomainResult<()> {
        for user in &self.staged_users {
            if self.state.users.contains_key(&user.id) || self.state.email_taken(&user.email) {
                return Err(DomainError::UserAlreadyRegistered(user.email.clone()));
            }
        }
        for playlist in &self.staged_playlists {
            if self.state.playlists.contains_key(&playlist.id) {
                return Err(DomainError::PlaylistAlreadyExists(playlist.id));
            }
        }
        for link in &self.staged_links {
            if self.state.favourites.contains_key(link) {
                return Err(already_linked(link));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ProvisioningTransaction for MemoryProvisioningTransaction {
    async fn insert_user(&mut self, user: &User) -> DomainResult<()> {
        self.check_fault(ProvisioningStep::InsertUser)?;
        let staged_dup = self.staged_users.iter().any(|u| u.email == user.email);
        if staged_dup || self.state.email_taken(&user.email) {
            return Err(DomainError::UserAlreadyRegistered(user.email.clone()));
        }
        self.staged_users.push(user.clone());
        Ok(())
    }

    async fn insert_playlist(&mut self, playlist: &Playlist) -> DomainResult<()> {
        self.check_fault(ProvisioningStep::InsertPlaylist)?;
        if !self.user_known(playlist.user_id) {
            return Err(DomainError::UserNotFound(playlist.user_id.to_string()));
        }
        if self.playlist_known(playlist.id) {
            return Err(DomainError::PlaylistAlreadyExists(playlist.id));
        }
        self.staged_playlists.push(playlist.clone());
        Ok(())
    }

    async fn link_favourite(&mut self, link: UserFavourite) -> DomainResult<()> {
        self.check_fault(ProvisioningStep::LinkFavourite)?;
        if !self.user_known(link.user_id) {
            return Err(DomainError::UserNotFound(link.user_id.to_string()));
        }
        if !self.playlist_known(link.playlist_id) {
            return Err(DomainError::PlaylistNotFound(link.playlist_id));
        }
        if self.staged_links.contains(&link) || self.state.favourites.contains_key(&link) {
            return Err(already_linked(&link));
        }
        self.staged_links.push(link);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.check_fault(ProvisioningStep::Commit)?;
        let state = self.state.clone();
        let _guard = state
            .commit_lock
            .lock()
            .map_err(|_| DomainError::Storage("commit lock poisoned".into()))?;

        self.validate()?;

        let this = *self;
        for user in this.staged_users {
            state.users.insert(user.id, user);
        }
        for playlist in this.staged_playlists {
            state.playlists.insert(playlist.id, playlist);
        }
        for link in this.staged_links {
            state.favourites.insert(link, state.next_seq());
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        Ok(())
    }
}

fn already_linked(link: &UserFavourite) -> DomainError {
    DomainError::FavouriteAlreadyLinked {
        user_id: link.user_id,
        playlist_id: link.playlist_id,
    }
}

// ── Per-aggregate stores ────────────────────────────────────────

struct MemoryUsers(Arc<MemoryState>);

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.0.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<User>> {
        Ok(self
            .0
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn find_admins(&self) -> DomainResult<Vec<User>> {
        let mut admins: Vec<User> = self
            .0
            .users
            .iter()
            .filter(|u| u.is_admin())
            .map(|u| u.clone())
            .collect();
        admins.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(admins)
    }

    async fn insert(&self, user: &User) -> DomainResult<()> {
        let _guard = self
            .0
            .commit_lock
            .lock()
            .map_err(|_| DomainError::Storage("commit lock poisoned".into()))?;
        if self.0.users.contains_key(&user.id) || self.0.email_taken(&user.email) {
            return Err(DomainError::UserAlreadyRegistered(user.email.clone()));
        }
        self.0.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> DomainResult<()> {
        let email_clash = self
            .0
            .users
            .iter()
            .any(|u| u.id != user.id && u.email == user.email);
        if email_clash {
            return Err(DomainError::UserAlreadyRegistered(user.email.clone()));
        }
        match self.0.users.get_mut(&user.id) {
            Some(mut stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(DomainError::UserNotFound(user.id.to_string())),
        }
    }
}

struct MemoryPlaylists(Arc<MemoryState>);

#[async_trait]
impl PlaylistRepository for MemoryPlaylists {
    async fn insert(&self, playlist: &Playlist) -> DomainResult<()> {
        if self.0.playlists.contains_key(&playlist.id) {
            return Err(DomainError::PlaylistAlreadyExists(playlist.id));
        }
        self.0.playlists.insert(playlist.id, playlist.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Playlist>> {
        Ok(self.0.playlists.get(&id).map(|p| p.clone()))
    }

    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Playlist>> {
        let mut playlists: Vec<Playlist> = self
            .0
            .playlists
            .iter()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.clone())
            .collect();
        playlists.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(playlists)
    }

    async fn update(&self, playlist: &Playlist) -> DomainResult<()> {
        match self.0.playlists.get_mut(&playlist.id) {
            Some(mut stored) => {
                *stored = playlist.clone();
                Ok(())
            }
            None => Err(DomainError::PlaylistNotFound(playlist.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        if self.0.playlists.remove(&id).is_none() {
            return Err(DomainError::PlaylistNotFound(id));
        }
        self.0.playlist_audiotracks.retain(|link, _| link.playlist_id != id);
        self.0.favourites.retain(|link, _| link.playlist_id != id);
        Ok(())
    }
}

struct MemoryFavourites(Arc<MemoryState>);

#[async_trait]
impl UserFavouriteRepository for MemoryFavourites {
    async fn link(&self, link: UserFavourite) -> DomainResult<()> {
        if !self.0.playlists.contains_key(&link.playlist_id) {
            return Err(DomainError::PlaylistNotFound(link.playlist_id));
        }
        match self.0.favourites.entry(link) {
            Entry::Occupied(_) => Err(already_linked(&link)),
            Entry::Vacant(slot) => {
                slot.insert(self.0.next_seq());
                Ok(())
            }
        }
    }

    async fn find_favourites_playlist(&self, user_id: Uuid) -> DomainResult<Option<Playlist>> {
        let earliest = self
            .0
            .favourites
            .iter()
            .filter(|e| e.key().user_id == user_id)
            .min_by_key(|e| *e.value())
            .map(|e| e.key().playlist_id);
        Ok(earliest.and_then(|id| self.0.playlists.get(&id).map(|p| p.clone())))
    }

    async fn count_links(&self, user_id: Uuid) -> DomainResult<usize> {
        Ok(self
            .0
            .favourites
            .iter()
            .filter(|e| e.key().user_id == user_id)
            .count())
    }
}

struct MemoryPlaylistAudiotracks(Arc<MemoryState>);

#[async_trait]
impl PlaylistAudiotrackRepository for MemoryPlaylistAudiotracks {
    async fn add(&self, link: PlaylistAudiotrack) -> DomainResult<()> {
        match self.0.playlist_audiotracks.entry(link) {
            Entry::Occupied(_) => Err(DomainError::AudiotrackAlreadyInPlaylist {
                playlist_id: link.playlist_id,
                audiotrack_id: link.audiotrack_id,
            }),
            Entry::Vacant(slot) => {
                slot.insert(());
                Ok(())
            }
        }
    }

    async fn remove(&self, link: PlaylistAudiotrack) -> DomainResult<()> {
        match self.0.playlist_audiotracks.remove(&link) {
            Some(_) => Ok(()),
            None => Err(DomainError::AudiotrackNotInPlaylist {
                playlist_id: link.playlist_id,
                audiotrack_id: link.audiotrack_id,
            }),
        }
    }

    async fn contains(&self, link: PlaylistAudiotrack) -> DomainResult<bool> {
        Ok(self.0.playlist_audiotracks.contains_key(&link))
    }

    async fn audiotracks_of(&self, playlist_id: Uuid) -> DomainResult<Vec<Audiotrack>> {
        let mut tracks: Vec<Audiotrack> = self
            .0
            .playlist_audiotracks
            .iter()
            .filter(|e| e.key().playlist_id == playlist_id)
            .filter_map(|e| {
                self.0
                    .audiotracks
                    .get(&e.key().audiotrack_id)
                    .map(|a| a.clone())
            })
            .collect();
        tracks.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tracks)
    }

    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()> {
        self.0
            .playlist_audiotracks
            .retain(|link, _| link.audiotrack_id != audiotrack_id);
        Ok(())
    }
}

struct MemoryAudiotracks(Arc<MemoryState>);

#[async_trait]
impl AudiotrackRepository for MemoryAudiotracks {
    async fn insert(&self, audiotrack: &Audiotrack) -> DomainResult<()> {
        if self.0.audiotracks.contains_key(&audiotrack.id) {
            return Err(DomainError::AudiotrackAlreadyExists(audiotrack.id));
        }
        self.0.audiotracks.insert(audiotrack.id, audiotrack.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Audiotrack>> {
        Ok(self.0.audiotracks.get(&id).map(|a| a.clone()))
    }

    async fn find_all(&self) -> DomainResult<Vec<Audiotrack>> {
        let mut tracks: Vec<Audiotrack> = self.0.audiotracks.iter().map(|a| a.clone()).collect();
        tracks.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tracks)
    }

    async fn find_by_title(&self, title: &str) -> DomainResult<Vec<Audiotrack>> {
        let needle = title.to_lowercase();
        let mut tracks: Vec<Audiotrack> = self
            .0
            .audiotracks
            .iter()
            .filter(|a| a.title.to_lowercase().contains(&needle))
            .map(|a| a.clone())
            .collect();
        tracks.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tracks)
    }

    async fn update(&self, audiotrack: &Audiotrack) -> DomainResult<()> {
        match self.0.audiotracks.get_mut(&audiotrack.id) {
            Some(mut stored) => {
                *stored = audiotrack.clone();
                Ok(())
            }
            None => Err(DomainError::AudiotrackNotFound(audiotrack.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        match self.0.audiotracks.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::AudiotrackNotFound(id)),
        }
    }
}

struct MemoryCommentaries(Arc<MemoryState>);

#[async_trait]
impl CommentaryRepository for MemoryCommentaries {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Commentary>> {
        Ok(self.0.commentaries.get(&id).map(|e| e.1.clone()))
    }

    async fn insert(&self, commentary: &Commentary) -> DomainResult<()> {
        if self.0.commentaries.contains_key(&commentary.id) {
            return Err(DomainError::CommentaryAlreadyExists(commentary.id));
        }
        let seq = self.0.next_seq();
        self.0
            .commentaries
            .insert(commentary.id, (seq, commentary.clone()));
        Ok(())
    }

    async fn update(&self, commentary: &Commentary) -> DomainResult<()> {
        match self.0.commentaries.get_mut(&commentary.id) {
            Some(mut stored) => {
                stored.1 = commentary.clone();
                Ok(())
            }
            None => Err(DomainError::CommentaryNotFound(commentary.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        match self.0.commentaries.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::CommentaryNotFound(id)),
        }
    }

    async fn find_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<Vec<Commentary>> {
        let mut found: Vec<(u64, Commentary)> = self
            .0
            .commentaries
            .iter()
            .filter(|e| e.1.audiotrack_id == audiotrack_id)
            .map(|e| e.value().clone())
            .collect();
        found.sort_by_key(|(seq, _)| *seq);
        Ok(found.into_iter().map(|(_, c)| c).collect())
    }

    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()> {
        self.0
            .commentaries
            .retain(|_, (_, c)| c.audiotrack_id != audiotrack_id);
        Ok(())
    }
}

struct MemoryScores(Arc<MemoryState>);

#[async_trait]
impl ScoreRepository for MemoryScores {
    async fn find(&self, audiotrack_id: Uuid, author_id: Uuid) -> DomainResult<Option<Score>> {
        Ok(self.0.scores.get(&(audiotrack_id, author_id)).map(|s| *s))
    }

    async fn insert(&self, score: &Score) -> DomainResult<()> {
        let key = (score.audiotrack_id, score.author_id);
        if self.0.scores.contains_key(&key) {
            return Err(DomainError::ScoreAlreadyExists {
                audiotrack_id: score.audiotrack_id,
                author_id: score.author_id,
            });
        }
        self.0.scores.insert(key, *score);
        Ok(())
    }

    async fn update(&self, score: &Score) -> DomainResult<()> {
        match self.0.scores.get_mut(&(score.audiotrack_id, score.author_id)) {
            Some(mut stored) => {
                *stored = *score;
                Ok(())
            }
            None => Err(DomainError::ScoreNotFound {
                audiotrack_id: score.audiotrack_id,
                author_id: score.author_id,
            }),
        }
    }

    async fn find_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<Vec<Score>> {
        Ok(self
            .0
            .scores
            .iter()
            .filter(|e| e.key().0 == audiotrack_id)
            .map(|e| *e.value())
            .collect())
    }

    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()> {
        self.0.scores.retain(|(a, _), _| *a != audiotrack_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            username: "mew".into(),
            email: email.into(),
            password_hash: "hash".into(),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn staged_writes_invisible_until_commit() {
        let repos = InMemoryRepositoryProvider::new();
        let u = user("staged@example.com");
        let p = Playlist::new("Favourites", u.id);

        let mut tx = repos.begin_provisioning().await.unwrap();
        tx.insert_user(&u).await.unwrap();
        tx.insert_playlist(&p).await.unwrap();
        tx.link_favourite(UserFavourite::new(u.id, p.id)).await.unwrap();
        assert_eq!(repos.user_count(), 0);

        tx.commit().await.unwrap();
        assert_eq!(repos.user_count(), 1);
        assert_eq!(repos.favourite_links(), vec![UserFavourite::new(u.id, p.id)]);
    }

    #[tokio::test]
    async fn injected_failure_fires_at_requested_step() {
        let repos = InMemoryRepositoryProvider::new();
        repos.fail_provisioning_at(Some(ProvisioningStep::InsertPlaylist));
        let u = user("fault@example.com");

        let mut tx = repos.begin_provisioning().await.unwrap();
        tx.insert_user(&u).await.unwrap();
        let err = tx
            .insert_playlist(&Playlist::new("Favourites", u.id))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
        tx.rollback().await.unwrap();
        assert_eq!(repos.user_count(), 0);
    }

    #[tokio::test]
    async fn commit_rechecks_email_uniqueness() {
        let repos = InMemoryRepositoryProvider::new();
        let first = user("race@example.com");
        let second = user("race@example.com");

        let mut tx_a = repos.begin_provisioning().await.unwrap();
        let mut tx_b = repos.begin_provisioning().await.unwrap();
        tx_a.insert_user(&first).await.unwrap();
        tx_b.insert_user(&second).await.unwrap();

        tx_a.commit().await.unwrap();
        let err = tx_b.commit().await.unwrap_err();
        assert!(matches!(err, DomainError::UserAlreadyRegistered(_)));
        assert_eq!(repos.user_count(), 1);
    }

    #[tokio::test]
    async fn repeated_favourite_link_conflicts() {
        let repos = InMemoryRepositoryProvider::new();
        let owner = user("fav@example.com");
        let playlist = Playlist::new("Favourites", owner.id);
        repos.playlists().insert(&playlist).await.unwrap();

        let link = UserFavourite::new(owner.id, playlist.id);
        repos.favourites().link(link).await.unwrap();
        let err = repos.favourites().link(link).await.unwrap_err();
        assert!(matches!(err, DomainError::FavouriteAlreadyLinked { .. }));
        assert_eq!(repos.favourites().count_links(owner.id).await.unwrap(), 1);
    }
}
