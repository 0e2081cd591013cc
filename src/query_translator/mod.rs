//! GraphQL operation → parameterized Cypher.
//!
//! Each root field of an operation becomes one statement. Fields carrying a `@cypher`
//! directive splice the directive statement into an `apoc.cypher.runFirstColumn*` call;
//! everything else is resolved against the graph directly (`MATCH`, pattern
//! comprehensions, property reads). Arguments become parameters named after the field that
//! owns them, so the same input always yields the same statement and parameter map.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::TranslatorConfig;
use crate::graphql_parser::ast::Operation;
use crate::graphql_parser::parse_document;
use crate::schema_catalog::SchemaModel;
use cypher_ast::ToCypher;
use projection::ProjectionComposer;

pub mod argument_resolver;
pub mod cypher_ast;
pub mod directive_translator;
pub mod errors;
pub mod field_kind;
pub mod param_namer;
pub mod params;
pub mod projection;

pub use errors::{BindingError, TranslationError};
pub use params::{ParamValue, ParameterMap};

/// Statement text plus the parameters it references
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    pub statement: String,
    pub parameters: ParameterMap,
    /// Defaults declared by the operation's variable definitions
    #[serde(skip)]
    pub variable_defaults: BTreeMap<String, ParamValue>,
}

impl TranslationResult {
    /// Replace variable references with caller-supplied values, falling back to the
    /// operation's declared variable defaults
    pub fn bind_variables(
        &self,
        variables: &Map<String, Value>,
    ) -> Result<BTreeMap<String, Value>, BindingError> {
        params::bind_parameters(&self.parameters, variables, &self.variable_defaults)
    }
}

pub struct Translator<'s> {
    schema: &'s SchemaModel,
    config: TranslatorConfig,
}

impl<'s> Translator<'s> {
    pub fn new(schema: &'s SchemaModel, config: TranslatorConfig) -> Self {
        Translator { schema, config }
    }

    /// One statement per selected root field, in selection order
    pub fn translate_operation(
        &self,
        operation: &Operation<'_>,
    ) -> Result<Vec<TranslationResult>, TranslationError> {
        let root_type = self.schema.root_type(operation.kind)?;

        let selections = projection::merge_selections(&operation.selection_set)?;
        let mut results = Vec::with_capacity(selections.len());
        for selection in &selections {
            log::debug!(
                "Translating {} root field `{}`",
                operation.kind,
                selection.response_key()
            );
            let composer = ProjectionComposer::new(self.schema, operation, &self.config);
            let (statement, parameters) = composer.compose_root(root_type, selection)?;
            results.push(TranslationResult {
                statement: statement.to_cypher(),
                parameters,
                variable_defaults: variable_defaults(operation),
            });
        }

        if results.is_empty() {
            return Err(TranslationError::EmptyOperation);
        }
        Ok(results)
    }

    /// Translate an operation that selects exactly one root field
    pub fn translate(&self, operation: &Operation<'_>) -> Result<TranslationResult, TranslationError> {
        let mut results = self.translate_operation(operation)?;
        if results.len() > 1 {
            return Err(TranslationError::MultipleRootFields {
                count: results.len(),
            });
        }
        results.pop().ok_or(TranslationError::EmptyOperation)
    }

    /// Parse `query` and translate the selected operation
    pub fn translate_query(
        &self,
        query: &str,
        operation_name: Option<&str>,
    ) -> Result<Vec<TranslationResult>, TranslationError> {
        let document = parse_document(query).map_err(|e| TranslationError::Parse(e.to_string()))?;
        let operation =
            document
                .operation(operation_name)
                .ok_or_else(|| TranslationError::UnknownOperation {
                    name: operation_name.map(str::to_string),
                })?;
        self.translate_operation(operation)
    }
}

/// Translate a single-root-field operation with the default configuration
pub fn translate(
    schema: &SchemaModel,
    operation: &Operation<'_>,
) -> Result<TranslationResult, TranslationError> {
    Translator::new(schema, TranslatorConfig::default()).translate(operation)
}

fn variable_defaults(operation: &Operation<'_>) -> BTreeMap<String, ParamValue> {
    operation
        .variable_definitions
        .iter()
        .filter_map(|definition| {
            definition
                .default_value
                .as_ref()
                .map(|value| (definition.name.to_string(), ParamValue::from(value)))
        })
        .collect()
}
