//! # Schema Catalog Error Types
//!
//! Two families live here:
//!
//! - [`SchemaCatalogError`]: problems building a schema model (SDL syntax, duplicate or
//!   unknown types, malformed directives, unreadable files).
//! - [`SchemaLookupError`]: a query asked for a type, field or argument the model does not
//!   have. The translator treats these as caller contract violations.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaCatalogError {
    #[error("Type `{type_name}` is defined more than once")]
    DuplicateType { type_name: String },
    #[error("Field `{type_name}.{field}` is defined more than once")]
    DuplicateField { type_name: String, field: String },
    #[error("Unknown type `{type_name}` referenced by {context}")]
    UnknownType { type_name: String, context: String },
    #[error("Invalid @{directive} directive on `{type_name}.{field}`: {message}")]
    InvalidDirective {
        directive: String,
        type_name: String,
        field: String,
        message: String,
    },
    #[error("Root {operation} type `{type_name}` is not an object type")]
    InvalidRootType { operation: String, type_name: String },
    #[error("Failed to read schema file: {error}")]
    SchemaReadError { error: String },
    #[error("Failed to parse schema definition: {error}")]
    SdlParseError { error: String },
}

impl SchemaCatalogError {
    /// Create an UnknownType error naming where the reference occurred
    ///
    /// # Example
    /// ```ignore
    /// SchemaCatalogError::unknown_type_with_context("Persn", "field `Query.person`")
    /// ```
    pub fn unknown_type_with_context(
        type_name: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        SchemaCatalogError::UnknownType {
            type_name: type_name.into(),
            context: context.into(),
        }
    }

    pub fn invalid_directive(
        directive: impl Into<String>,
        type_name: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        SchemaCatalogError::InvalidDirective {
            directive: directive.into(),
            type_name: type_name.into(),
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaLookupError {
    #[error("No type `{type_name}` in schema")]
    UnknownType { type_name: String },
    #[error("No field `{field}` on type `{type_name}`")]
    UnknownField { type_name: String, field: String },
    #[error("Field `{type_name}.{field}` has no argument `{argument}`")]
    UnknownArgument {
        type_name: String,
        field: String,
        argument: String,
    },
    #[error("Schema defines no {operation} root type")]
    MissingRootType { operation: String },
    #[error("Field `{type_name}.{field}` is a leaf and cannot have a selection set")]
    SubselectionOnLeaf { type_name: String, field: String },
    #[error("Field `{type_name}.{field}` returns an object type and needs a selection set")]
    MissingSubselection { type_name: String, field: String },
    #[error("Root field `{type_name}.{field}` returns a leaf type and has no @cypher directive to resolve it")]
    NoGraphPattern { type_name: String, field: String },
}
