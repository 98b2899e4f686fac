pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_network_credentials_table;
mod m20240101_000003_create_pending_authorizations_table;
mod m20240101_000004_create_follow_edges_table;
mod m20240101_000005_insert_default_suggested_users;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_network_credentials_table::Migration),
            Box::new(m20240101_000003_create_pending_authorizations_table::Migration),
            Box::new(m20240101_000004_create_follow_edges_table::Migration),
            Box::new(m20240101_000005_insert_default_suggested_users::Migration),
        ]
    }
}
