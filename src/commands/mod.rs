pub mod consolidate;
pub mod render;
pub mod schema;

pub use consolidate::ConsolidateCommand;
pub use render::RenderCommand;
pub use schema::SchemaCommand;
