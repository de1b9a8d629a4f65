pub mod error;
pub mod record;
pub mod schema;
pub mod value;

pub use error::{RecordError, RecordResult};
pub use record::{Record, RecordBuilder};
pub use schema::{FieldKind, FieldSpec, MergeStrategy, Presence, ResourceSchema};
pub use value::AttrValue;
