mod diff;
pub use diff::{FieldChange, FieldShape, SchemaDiff, TableDiff};

mod document;

mod field;
pub use field::Field;

mod registry;
pub use registry::Registry;

mod table;
pub use table::Table;

mod ty;
pub use ty::Type;

mod version;
pub use version::SchemaVersion;
