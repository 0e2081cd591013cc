pub mod errors;
pub mod schema_model;
pub mod sdl_parser;

pub use errors::{SchemaCatalogError, SchemaLookupError};
pub use schema_model::{
    ArgumentDefinition, CypherDirective, FieldMetadata, RelationDirection, RelationDirective,
    SchemaModel, TypeDefinition, TypeKind,
};
