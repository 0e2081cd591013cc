use thiserror::Error;

use crate::schema_catalog::SchemaLookupError;

/// Argument and variable binding failures. Any of these aborts the whole operation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BindingError {
    #[error("Argument `{argument}` of `{field}` references undeclared variable `${variable}`")]
    UndeclaredVariable {
        field: String,
        argument: String,
        variable: String,
    },
    #[error("Argument `{argument}` of `{field}` expects `{expected}` but got {found}")]
    IncompatibleArgument {
        field: String,
        argument: String,
        expected: String,
        found: String,
    },
    #[error(
        "Variable `${variable}` of type `{variable_type}` cannot be used for argument `{argument}` of `{field}` (expects `{expected}`)"
    )]
    VariableTypeMismatch {
        field: String,
        argument: String,
        variable: String,
        variable_type: String,
        expected: String,
    },
    #[error("Missing required argument `{argument}` of `{field}`")]
    MissingArgument { field: String, argument: String },
    #[error("@{directive} on `{field}` needs a literal boolean `if` argument")]
    UnsupportedConditional { directive: String, field: String },
    #[error("No value supplied for variable `${variable}`")]
    MissingVariable { variable: String },
    #[error("Fields with response key `{key}` differ in name or arguments")]
    FieldConflict { key: String },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslationError {
    #[error(transparent)]
    Binding(#[from] BindingError),
    #[error(transparent)]
    SchemaLookup(#[from] SchemaLookupError),
    #[error("Selection set nesting depth {depth} exceeds the configured limit of {limit}")]
    SelectionTooDeep { depth: u32, limit: u32 },
    #[error("Operation selects no root fields")]
    EmptyOperation,
    #[error("Expected exactly one root field, found {count}")]
    MultipleRootFields { count: usize },
    #[error("Failed to parse operation: {0}")]
    Parse(String),
    #[error("No operation named {name:?} in document (or several anonymous operations)")]
    UnknownOperation { name: Option<String> },
}
