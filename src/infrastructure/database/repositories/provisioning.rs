//! Registration unit of work over a SeaORM transaction

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use tracing::debug;

use super::db_err;
use super::playlist_repository::{insert_playlist, link_favourite};
use super::user_repository::insert_user;
use crate::domain::{DomainResult, Playlist, ProvisioningTransaction, User, UserFavourite};

/// Wraps one open database transaction. SeaORM rolls the transaction back
/// when it is dropped uncommitted.
pub struct SeaOrmProvisioningTransaction {
    txn: DatabaseTransaction,
}

impl SeaOrmProvisioningTransaction {
    pub fn new(txn: DatabaseTransaction) -> Self {
        Self { txn }
    }
}

#[async_trait]
impl ProvisioningTransaction for SeaOrmProvisioningTransaction {
    async fn insert_user(&mut self, user: &User) -> DomainResult<()> {
        insert_user(&self.txn, user).await
    }

    async fn insert_playlist(&mut self, playlist: &Playlist) -> DomainResult<()> {
        insert_playlist(&self.txn, playlist).await
    }

    async fn link_favourite(&mut self, link: UserFavourite) -> DomainResult<()> {
        link_favourite(&self.txn, link).await
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        debug!("Committing provisioning transaction");
        self.txn.commit().await.map_err(db_err)
    }

    async fn rollback(self: Box<Self>) -> DomainResult<()> {
        debug!("Rolling back provisioning transaction");
        self.txn.rollback().await.map_err(db_err)
    }
}
