//! Storage infrastructure - repository backends

mod factory;
pub mod json_file;
pub mod migrations;
pub mod postgres;

pub use factory::{Repositories, StorageFactory, StorageType};
pub use migrations::{run_storage_migrations, Migration, PostgresMigrator};
pub use postgres::PostgresConfig;
