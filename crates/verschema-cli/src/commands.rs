mod backup;
pub use backup::BackupCommand;

mod mapping;
pub use mapping::MappingCommand;

mod restore;
pub use restore::RestoreCommand;

mod schema;
pub use schema::SchemaCommand;
