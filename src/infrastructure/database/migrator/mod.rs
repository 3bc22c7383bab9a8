//! Database migrations module

pub use sea_orm_migration::prelude::*;

mod m20240605_000001_create_users;
mod m20240605_000002_create_playlists;
mod m20240605_000003_create_audiotracks;
mod m20240605_000004_create_link_tables;
mod m20240605_000005_create_commentaries_and_scores;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240605_000001_create_users::Migration),
            Box::new(m20240605_000002_create_playlists::Migration),
            Box::new(m20240605_000003_create_audiotracks::Migration),
            Box::new(m20240605_000004_create_link_tables::Migration),
            Box::new(m20240605_000005_create_commentaries_and_scores::Migration),
        ]
    }
}
