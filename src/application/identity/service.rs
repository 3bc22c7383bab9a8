//! Identity service — application-layer orchestration
//!
//! Registration is the one multi-step write in the core: the user, the
//! favourites playlist and the link between them are inserted through a
//! single [`ProvisioningTransaction`] and become visible together or not at all.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::{
    CredentialVerifier, DomainError, DomainResult, NewUser, Playlist, ProvisioningTransaction,
    RepositoryProvider, User, UserFavourite, UserRole,
};

/// Identity service — orchestrates registration, sign-in and role changes.
pub struct IdentityService {
    repos: Arc<dyn RepositoryProvider>,
    credentials: Arc<dyn CredentialVerifier>,
    favourites_name: String,
}

impl IdentityService {
    pub fn builder() -> IdentityServiceBuilder {
        IdentityServiceBuilder::default()
    }

    // ── Registration ────────────────────────────────────────────

    /// Register a new user with a freshly provisioned favourites playlist.
    ///
    /// The candidate keeps its role (`User` unless set otherwise).
    pub async fn register_user(&self, candidate: NewUser) -> DomainResult<User> {
        debug!(email = %candidate.email, role = %candidate.role, "Registering user");

        if self
            .repos
            .users()
            .find_by_email(&candidate.email)
            .await?
            .is_some()
        {
            warn!(email = %candidate.email, "Registration rejected: email already registered");
            return Err(DomainError::UserAlreadyRegistered(candidate.email));
        }

        let password_hash = self.credentials.hash(&candidate.password)?;
        let user = candidate.into_user(password_hash);
        let favourites = Playlist::new(self.favourites_name.clone(), user.id);

        let mut tx = self.repos.begin_provisioning().await?;
        if let Err(e) = provision(tx.as_mut(), &user, &favourites).await {
            warn!(user_id = %user.id, error = %e, "Provisioning failed, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                warn!(user_id = %user.id, error = %rollback_err, "Rollback failed");
            }
            return Err(e);
        }
        tx.commit().await?;

        info!(
            user_id = %user.id,
            username = %user.username,
            playlist_id = %favourites.id,
            "New user registered"
        );
        Ok(user)
    }

    /// Ensure an administrator exists for `email`.
    ///
    /// Returns the existing account untouched if it is already an admin,
    /// elevates it if it is not, and registers a new admin otherwise.
    pub async fn register_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> DomainResult<User> {
        if let Some(existing) = self.repos.users().find_by_email(email).await? {
            if existing.is_admin() {
                debug!(user_id = %existing.id, "Admin already registered");
                return Ok(existing);
            }
            return self.elevate_to_admin(existing.id).await;
        }

        let admin = self
            .register_user(NewUser::new(username, email, password).with_role(UserRole::Admin))
            .await?;
        info!(user_id = %admin.id, email = %admin.email, "Administrator registered");
        Ok(admin)
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by email and plaintext password.
    ///
    /// Unknown email and wrong password fail differently here;
    /// callers facing the outside world should report
    /// [`DomainError::public_message`] instead.
    pub async fn sign_in_user(&self, email: &str, password: &str) -> DomainResult<User> {
        debug!(email, "Sign-in attempt");

        let Some(user) = self.repos.users().find_by_email(email).await? else {
            warn!(email, "Sign-in failed: unknown email");
            return Err(DomainError::UserNotFound(email.to_string()));
        };

        if !self.credentials.verify(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Sign-in failed: wrong password");
            return Err(DomainError::InvalidCredentials(email.to_string()));
        }

        info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    // ── Permissions ─────────────────────────────────────────────

    /// Set a user's role. No check is made on who is asking.
    pub async fn change_user_permissions(&self, user_id: Uuid, role: UserRole) -> DomainResult<User> {
        let mut user = self.get_user_by_id(user_id).await?;
        let previous = user.role;
        user.role = role;
        self.repos.users().update(&user).await?;

        info!(user_id = %user.id, from = %previous, to = %role, "User role changed");
        Ok(user)
    }

    pub async fn elevate_to_admin(&self, user_id: Uuid) -> DomainResult<User> {
        self.change_user_permissions(user_id, UserRole::Admin).await
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn get_user_by_id(&self, user_id: Uuid) -> DomainResult<User> {
        match self.repos.users().find_by_id(user_id).await? {
            Some(user) => Ok(user),
            None => {
                warn!(%user_id, "User not found");
                Err(DomainError::UserNotFound(user_id.to_string()))
            }
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> DomainResult<User> {
        match self.repos.users().find_by_email(email).await? {
            Some(user) => Ok(user),
            None => {
                warn!(email, "User not found");
                Err(DomainError::UserNotFound(email.to_string()))
            }
        }
    }
}

async fn provision(
    tx: &mut dyn ProvisioningTransaction,
    user: &User,
    favourites: &Playlist,
) -> DomainResult<()> {
    tx.insert_user(user).await?;
    tx.insert_playlist(favourites).await?;
    tx.link_favourite(UserFavourite::new(user.id, favourites.id))
        .await
}

// ── Builder ─────────────────────────────────────────────────────

#[derive(Default)]
pub struct IdentityServiceBuilder {
    repos: Option<Arc<dyn RepositoryProvider>>,
    credentials: Option<Arc<dyn CredentialVerifier>>,
    favourites_name: Option<String>,
}

impl IdentityServiceBuilder {
    pub fn repositories(mut self, repos: Arc<dyn RepositoryProvider>) -> Self {
        self.repos = Some(repos);
        self
    }

    pub fn credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn favourites_name(mut self, name: impl Into<String>) -> Self {
        self.favourites_name = Some(name.into());
        self
    }

    pub fn build(self) -> DomainResult<IdentityService> {
        let repos = self
            .repos
            .ok_or(DomainError::MissingCollaborator("repository provider"))?;
        let credentials = self
            .credentials
            .ok_or(DomainError::MissingCollaborator("credential verifier"))?;
        let favourites_name = self
            .favourites_name
            .filter(|name| !name.trim().is_empty())
            .ok_or(DomainError::MissingCollaborator("favourites playlist name"))?;

        Ok(IdentityService {
            repos,
            credentials,
            favourites_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::crypto::BcryptCredentialVerifier;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::{init_database_with_migrations, DatabaseConfig};
    use crate::infrastructure::storage::{InMemoryRepositoryProvider, ProvisioningStep};
    use crate::shared::ErrorKind;

    /// Reversible stand-in so tests don't pay for bcrypt.
    struct PrefixVerifier;

    impl CredentialVerifier for PrefixVerifier {
        fn hash(&self, plaintext: &str) -> DomainResult<String> {
            Ok(format!("hashed:{}", plaintext))
        }

        fn verify(&self, plaintext: &str, hash: &str) -> DomainResult<bool> {
            Ok(hash == format!("hashed:{}", plaintext))
        }
    }

    fn service(repos: Arc<InMemoryRepositoryProvider>) -> IdentityService {
        IdentityService::builder()
            .repositories(repos)
            .credentials(Arc::new(PrefixVerifier))
            .favourites_name("Favourites")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn register_provisions_exactly_one_favourites_playlist() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = service(repos.clone());

        let user = svc
            .register_user(NewUser::new("mew", "mew@example.com", "secret"))
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::User);
        assert_eq!(user.password_hash, "hashed:secret");

        let playlists = repos.playlists_by_user();
        let owned = &playlists[&user.id];
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].title, "Favourites");
        assert_eq!(
            repos.favourite_links(),
            vec![UserFavourite::new(user.id, owned[0].id)]
        );

        let favourites = repos
            .favourites()
            .find_favourites_playlist(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(favourites.id, owned[0].id);
    }

    #[tokio::test]
    async fn register_keeps_candidate_role() {
        let svc = service(Arc::new(InMemoryRepositoryProvider::new()));
        let user = svc
            .register_user(NewUser::new("guest", "guest@example.com", "pw").with_role(UserRole::Guest))
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::Guest);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_without_side_effects() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = service(repos.clone());

        svc.register_user(NewUser::new("mew", "dup@example.com", "a"))
            .await
            .unwrap();

        for _ in 0..2 {
            let err = svc
                .register_user(NewUser::new("other", "dup@example.com", "b"))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::UserAlreadyRegistered(ref e) if e == "dup@example.com"));
            assert_eq!(err.kind(), ErrorKind::Conflict);
        }

        assert_eq!(repos.user_count(), 1);
        assert_eq!(repos.playlist_count(), 1);
        assert_eq!(repos.favourite_links().len(), 1);
    }

    #[tokio::test]
    async fn failure_at_any_provisioning_step_leaves_nothing_behind() {
        for step in [
            ProvisioningStep::InsertUser,
            ProvisioningStep::InsertPlaylist,
            ProvisioningStep::LinkFavourite,
            ProvisioningStep::Commit,
        ] {
            let repos = Arc::new(InMemoryRepositoryProvider::new());
            let svc = service(repos.clone());
            repos.fail_provisioning_at(Some(step));

            let err = svc
                .register_user(NewUser::new("mew", "fail@example.com", "pw"))
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Storage(_)), "{:?}", step);
            assert_eq!(repos.user_count(), 0, "{:?}", step);
            assert_eq!(repos.playlist_count(), 0, "{:?}", step);
            assert!(repos.favourite_links().is_empty(), "{:?}", step);

            // the same email registers cleanly once the fault is gone
            repos.fail_provisioning_at(None);
            let user = svc
                .register_user(NewUser::new("mew", "fail@example.com", "pw"))
                .await
                .unwrap();
            assert_eq!(repos.user_count(), 1);
            let favourites_id = repos.playlists_by_user()[&user.id][0].id;
            assert_eq!(
                repos.favourite_links(),
                vec![UserFavourite::new(user.id, favourites_id)]
            );
        }
    }

    #[tokio::test]
    async fn sign_in_distinguishes_failures_internally_only() {
        let svc = service(Arc::new(InMemoryRepositoryProvider::new()));
        let registered = svc
            .register_user(NewUser::new("mew", "mew@example.com", "secret"))
            .await
            .unwrap();

        let signed_in = svc.sign_in_user("mew@example.com", "secret").await.unwrap();
        assert_eq!(signed_in, registered);

        let wrong = svc
            .sign_in_user("mew@example.com", "nope")
            .await
            .unwrap_err();
        assert!(matches!(wrong, DomainError::InvalidCredentials(_)));

        let unknown = svc
            .sign_in_user("ghost@example.com", "secret")
            .await
            .unwrap_err();
        assert!(matches!(unknown, DomainError::UserNotFound(_)));

        assert_eq!(wrong.public_message(), unknown.public_message());
    }

    #[tokio::test]
    async fn change_permissions_persists_role() {
        let svc = service(Arc::new(InMemoryRepositoryProvider::new()));
        let user = svc
            .register_user(NewUser::new("mew", "mew@example.com", "pw"))
            .await
            .unwrap();

        let updated = svc.elevate_to_admin(user.id).await.unwrap();
        assert_eq!(updated.role, UserRole::Admin);
        assert_eq!(svc.get_user_by_id(user.id).await.unwrap().role, UserRole::Admin);

        let demoted = svc
            .change_user_permissions(user.id, UserRole::Guest)
            .await
            .unwrap();
        assert_eq!(demoted.role, UserRole::Guest);
        assert_eq!(
            svc.get_user_by_email("mew@example.com").await.unwrap().role,
            UserRole::Guest
        );
    }

    #[tokio::test]
    async fn unknown_user_lookups_fail() {
        let svc = service(Arc::new(InMemoryRepositoryProvider::new()));
        let id = Uuid::new_v4();

        let err = svc.elevate_to_admin(id).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(ref s) if *s == id.to_string()));
        assert!(matches!(
            svc.get_user_by_email("ghost@example.com").await,
            Err(DomainError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn register_admin_is_idempotent_and_elevates() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let svc = service(repos.clone());

        let first = svc
            .register_admin("root", "root@example.com", "pw")
            .await
            .unwrap();
        let second = svc
            .register_admin("root", "root@example.com", "other")
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(repos.user_count(), 1);

        let plain = svc
            .register_user(NewUser::new("mew", "mew@example.com", "pw"))
            .await
            .unwrap();
        let elevated = svc
            .register_admin("mew", "mew@example.com", "pw")
            .await
            .unwrap();
        assert_eq!(elevated.id, plain.id);
        assert!(elevated.is_admin());
        assert_eq!(repos.users().find_admins().await.unwrap().len(), 2);
    }

    #[test]
    fn builder_reports_missing_collaborators() {
        let err = IdentityService::builder()
            .credentials(Arc::new(PrefixVerifier))
            .favourites_name("Favourites")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::MissingCollaborator("repository provider")));
        assert_eq!(err.kind(), ErrorKind::Invariant);

        let err = IdentityService::builder()
            .repositories(Arc::new(InMemoryRepositoryProvider::new()))
            .favourites_name("Favourites")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::MissingCollaborator("credential verifier")));

        let err = IdentityService::builder()
            .repositories(Arc::new(InMemoryRepositoryProvider::new()))
            .credentials(Arc::new(PrefixVerifier))
            .favourites_name("  ")
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, DomainError::MissingCollaborator("favourites playlist name")));
    }

    #[tokio::test]
    async fn bcrypt_backed_registration_against_sqlite() {
        let db = init_database_with_migrations(&DatabaseConfig::sqlite_in_memory())
            .await
            .unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db));
        let svc = IdentityService::builder()
            .repositories(repos.clone())
            .credentials(Arc::new(BcryptCredentialVerifier::new(4)))
            .favourites_name("Liked")
            .build()
            .unwrap();

        let user = svc
            .register_user(NewUser::new("mew", "mew@example.com", "secret"))
            .await
            .unwrap();
        assert_ne!(user.password_hash, "secret");

        let favourites = repos
            .favourites()
            .find_favourites_playlist(user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(favourites.title, "Liked");
        assert_eq!(repos.favourites().count_links(user.id).await.unwrap(), 1);

        assert_eq!(svc.sign_in_user("mew@example.com", "secret").await.unwrap().id, user.id);
        assert!(matches!(
            svc.register_user(NewUser::new("x", "mew@example.com", "y")).await,
            Err(DomainError::UserAlreadyRegistered(_))
        ));
    }
}
