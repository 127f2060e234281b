mod field;
pub use field::{FieldMapping, MappingKind};

mod generator;
pub use generator::{GeneratedMapping, MappingGenerator};

mod mapper;
pub use mapper::{apply_mapping, MappedRow, Mapper, MappingWarning};

mod stats;
pub use stats::MappingStats;

mod table;
pub use table::TableMapping;

mod transform;
pub use transform::{ComputeFn, Transform, Transforms};
