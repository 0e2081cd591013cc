//! `@cypher` directive fields.
//!
//! The directive statement is opaque text. It is prefixed with a `WITH` clause that binds
//! `this` and the field's arguments, quoted as a string literal and passed to
//! `apoc.cypher.runFirstColumnSingle` or `apoc.cypher.runFirstColumnMany` together with a
//! map supplying those bindings.

use super::argument_resolver::ResolvedArgument;
use super::cypher_ast::{CypherExpr, CypherLiteral};
use super::params::ParamValue;
use crate::config::ObjectArgumentMode;
use crate::graphql_parser::ast::ArgValue;
use crate::schema_catalog::{CypherDirective, FieldMetadata};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallConvention {
    Single,
    Many,
}

impl CallConvention {
    pub fn for_field(field: &FieldMetadata) -> Self {
        if field.is_list() {
            CallConvention::Many
        } else {
            CallConvention::Single
        }
    }

    pub fn procedure(&self) -> &'static str {
        match self {
            CallConvention::Single => "apoc.cypher.runFirstColumnSingle",
            CallConvention::Many => "apoc.cypher.runFirstColumnMany",
        }
    }
}

/// `WITH $this AS this,$mult AS mult`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BindingPrefix {
    names: Vec<String>,
}

impl BindingPrefix {
    pub fn new(bind_this: bool, arguments: &[ResolvedArgument]) -> Self {
        let names = bind_this
            .then(|| "this".to_string())
            .into_iter()
            .chain(arguments.iter().map(|a| a.name.clone()))
            .collect();
        BindingPrefix { names }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn render(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let items = self
            .names
            .iter()
            .map(|name| format!("${} AS {}", name, name))
            .collect::<Vec<_>>()
            .join(",");
        Some(format!("WITH {}", items))
    }

    /// Prefix, one space, then the statement untouched
    pub fn apply(&self, statement: &str) -> String {
        match self.render() {
            Some(prefix) => format!("{} {}", prefix, statement),
            None => statement.to_string(),
        }
    }
}

/// The call expression for one directive field and the parameters it binds
#[derive(Debug, Clone, PartialEq)]
pub struct CypherFragment {
    pub call: CypherExpr,
    pub bound_params: Vec<(String, ParamValue)>,
}

pub struct DirectiveTranslator {
    object_argument_mode: ObjectArgumentMode,
}

impl DirectiveTranslator {
    pub fn new(object_argument_mode: ObjectArgumentMode) -> Self {
        DirectiveTranslator {
            object_argument_mode,
        }
    }

    /// Build the fragment. `enclosing_row` is the row variable of a nested field, `None` at
    /// the root.
    pub fn translate(
        &self,
        field: &FieldMetadata,
        directive: &CypherDirective,
        enclosing_row: Option<&str>,
        arguments: &[ResolvedArgument],
    ) -> CypherFragment {
        if directive.statement.trim().is_empty() {
            log::warn!("@cypher directive on `{}` has an empty statement", field.name);
        }

        let prefix = BindingPrefix::new(enclosing_row.is_some(), arguments);
        let statement = prefix.apply(&directive.statement);

        let mut bindings = Vec::with_capacity(arguments.len() + 1);
        if let Some(row) = enclosing_row {
            bindings.push(("this".to_string(), CypherExpr::variable(row)));
        }

        let mut bound_params = Vec::new();
        for argument in arguments {
            match self.inline_value(&argument.value) {
                Some(literal) => bindings.push((argument.name.clone(), literal)),
                None => {
                    bindings.push((
                        argument.name.clone(),
                        CypherExpr::parameter(&argument.param_name),
                    ));
                    bound_params.push((argument.param_name.clone(), ParamValue::from(&argument.value)));
                }
            }
        }

        let convention = CallConvention::for_field(field);
        log::debug!(
            "Directive field `{}` uses {} with {} bound parameter(s)",
            field.name,
            convention.procedure(),
            bound_params.len()
        );

        CypherFragment {
            call: CypherExpr::call(
                convention.procedure(),
                vec![CypherExpr::string(statement), CypherExpr::MapLiteral(bindings)],
            ),
            bound_params,
        }
    }

    /// Object literals are rendered in place under `ObjectArgumentMode::Inline` as long as
    /// they contain no variable references
    fn inline_value(&self, value: &ArgValue) -> Option<CypherExpr> {
        match (self.object_argument_mode, value) {
            (ObjectArgumentMode::Inline, ArgValue::Object(_)) if !value.contains_variable() => {
                Some(literal_expr(value))
            }
            _ => None,
        }
    }
}

/// Cypher literal for a variable-free argument value
fn literal_expr(value: &ArgValue) -> CypherExpr {
    match value {
        ArgValue::Null | ArgValue::Variable(_) => CypherExpr::Literal(CypherLiteral::Null),
        ArgValue::Int(i) => CypherExpr::Literal(CypherLiteral::Integer(*i)),
        ArgValue::Float(f) => CypherExpr::Literal(CypherLiteral::Float(*f)),
        ArgValue::Boolean(b) => CypherExpr::Literal(CypherLiteral::Boolean(*b)),
        ArgValue::String(s) | ArgValue::Enum(s) => CypherExpr::string(s.clone()),
        ArgValue::List(items) => CypherExpr::ListLiteral(items.iter().map(literal_expr).collect()),
        ArgValue::Object(fields) => CypherExpr::MapLiteral(
            fields
                .iter()
                .map(|(key, value)| (key.clone(), literal_expr(value)))
                .collect(),
        ),
    }
}
