use super::argument_resolver::{ArgumentResolver, ResolvedArgument};
use super::cypher_ast::{Clause, CypherExpr, CypherStatement, ProjectionItem, RelationshipPattern};
use super::directive_translator::{CypherFragment, DirectiveTranslator};
use super::errors::{BindingError, TranslationError};
use super::field_kind::FieldTranslationKind;
use super::param_namer::{allocate, ParamScope, ParameterNamer};
use super::params::{ParamValue, ParameterMap};
use crate::config::TranslatorConfig;
use crate::graphql_parser::ast::{ArgValue, FieldSelection, Operation};
use crate::schema_catalog::{FieldMetadata, SchemaModel, TypeDefinition};

const FIRST_ARGUMENT: &str = "first";
const OFFSET_ARGUMENT: &str = "offset";

/// Whether `@skip` / `@include` keep the field. Only literal conditions are supported.
pub fn is_selected(selection: &FieldSelection<'_>) -> Result<bool, BindingError> {
    let mut selected = true;
    for directive in &selection.directives {
        let skip_when = match directive.name {
            "skip" => true,
            "include" => false,
            other => {
                log::debug!(
                    "Ignoring query directive @{} on `{}`",
                    other,
                    selection.response_key()
                );
                continue;
            }
        };
        match directive.argument("if") {
            Some(ArgValue::Boolean(condition)) => {
                if *condition == skip_when {
                    selected = false;
                }
            }
            _ => {
                return Err(BindingError::UnsupportedConditional {
                    directive: directive.name.to_string(),
                    field: selection.response_key().to_string(),
                })
            }
        }
    }
    Ok(selected)
}

/// Selected fields of one selection set, with selections sharing a response key merged into
/// the first one. Such selections must agree on field name and arguments.
pub fn merge_selections<'q>(
    selections: &[FieldSelection<'q>],
) -> Result<Vec<FieldSelection<'q>>, BindingError> {
    let mut merged: Vec<FieldSelection<'q>> = Vec::with_capacity(selections.len());
    for selection in selections {
        if !is_selected(selection)? {
            continue;
        }
        let key = selection.response_key();
        match merged.iter_mut().find(|existing| existing.response_key() == key) {
            Some(existing) => {
                if existing.name != selection.name
                    || !same_arguments(&existing.arguments, &selection.arguments)
                {
                    return Err(BindingError::FieldConflict {
                        key: key.to_string(),
                    });
                }
                existing
                    .selection_set
                    .extend(selection.selection_set.iter().cloned());
            }
            None => merged.push(selection.clone()),
        }
    }
    Ok(merged)
}

fn same_arguments(left: &[(&str, ArgValue)], right: &[(&str, ArgValue)]) -> bool {
    left.len() == right.len() && left.iter().all(|argument| right.contains(argument))
}

/// Filters and paging taken from the arguments of a plain (non-directive) field
#[derive(Debug, Default)]
struct PlainFilters {
    predicates: Vec<CypherExpr>,
    first: Option<CypherExpr>,
    offset: Option<CypherExpr>,
}

/// Builds the statement for one root field, recursing through its selection set
pub struct ProjectionComposer<'a, 'q> {
    schema: &'a SchemaModel,
    config: &'a TranslatorConfig,
    resolver: ArgumentResolver<'a, 'q>,
    directives: DirectiveTranslator,
    namer: ParameterNamer,
}

impl<'a, 'q> ProjectionComposer<'a, 'q> {
    pub fn new(
        schema: &'a SchemaModel,
        operation: &'a Operation<'q>,
        config: &'a TranslatorConfig,
    ) -> Self {
        ProjectionComposer {
            schema,
            config,
            resolver: ArgumentResolver::new(schema, operation),
            directives: DirectiveTranslator::new(config.object_argument_mode),
            namer: ParameterNamer::new(),
        }
    }

    pub fn compose_root(
        mut self,
        root_type: &TypeDefinition,
        selection: &FieldSelection<'_>,
    ) -> Result<(CypherStatement, ParameterMap), TranslationError> {
        let type_name = root_type.name.as_str();
        let field = root_type.field(selection.name);
        let kind = FieldTranslationKind::classify(self.schema, type_name, selection, field, true)?;
        let alias = selection.response_key();

        let Some(field) = field else {
            // `__typename` at the root
            let clause = Clause::Return {
                expr: CypherExpr::string(type_name),
                alias: alias.to_string(),
            };
            return Ok((CypherStatement::new(vec![clause]), self.namer.into_parameters()));
        };

        let clauses = match (kind, &field.cypher) {
            (FieldTranslationKind::Directive(_), Some(directive)) => {
                let scope = ParamScope::new(alias, alias);
                let arguments =
                    self.resolver
                        .resolve(type_name, selection, field, &mut self.namer, &scope)?;
                let fragment = self.directives.translate(field, directive, None, &arguments);
                let CypherFragment { call, bound_params } = fragment;
                self.bind_all(bound_params);

                let returned = if selection.selection_set.is_empty() {
                    CypherExpr::variable(alias)
                } else {
                    self.project(
                        alias,
                        field.field_type.named_type(),
                        alias,
                        &selection.selection_set,
                        1,
                    )?
                };
                vec![
                    Clause::Unwind {
                        expr: call,
                        alias: alias.to_string(),
                    },
                    Clause::Return {
                        expr: returned,
                        alias: alias.to_string(),
                    },
                ]
            }
            _ => {
                let scope = ParamScope::new(alias, alias);
                let arguments =
                    self.resolver
                        .resolve(type_name, selection, field, &mut self.namer, &scope)?;
                let filters = self.plain_filters(alias, arguments);
                let label = field.field_type.named_type();
                let projection =
                    self.project(alias, label, alias, &selection.selection_set, 1)?;

                let mut clauses = vec![
                    Clause::Match {
                        variable: alias.to_string(),
                        label: label.to_string(),
                        predicates: filters.predicates,
                    },
                    Clause::Return {
                        expr: projection,
                        alias: alias.to_string(),
                    },
                ];
                clauses.extend(filters.offset.map(Clause::Skip));
                clauses.extend(filters.first.map(Clause::Limit));
                clauses
            }
        };

        Ok((CypherStatement::new(clauses), self.namer.into_parameters()))
    }

    fn bind_all(&mut self, bound_params: Vec<(String, ParamValue)>) {
        for (name, value) in bound_params {
            self.namer.bind(name, value);
        }
    }

    /// `first` and `offset` page the result, every other argument is an equality filter
    fn plain_filters(&mut self, variable: &str, arguments: Vec<ResolvedArgument>) -> PlainFilters {
        let mut filters = PlainFilters::default();
        for argument in arguments {
            let parameter = CypherExpr::parameter(&argument.param_name);
            match argument.name.as_str() {
                FIRST_ARGUMENT => filters.first = Some(parameter),
                OFFSET_ARGUMENT => filters.offset = Some(parameter),
                name => filters.predicates.push(CypherExpr::equals(
                    CypherExpr::property(variable, name),
                    parameter,
                )),
            }
            self.namer
                .bind(argument.param_name, ParamValue::from(&argument.value));
        }
        filters
    }

    /// Map projection of `row` for one selection set
    fn project(
        &mut self,
        row: &str,
        type_name: &str,
        path: &str,
        selections: &[FieldSelection<'_>],
        depth: u32,
    ) -> Result<CypherExpr, TranslationError> {
        let limit = self.config.max_selection_depth;
        if depth > limit {
            return Err(TranslationError::SelectionTooDeep { depth, limit });
        }

        let selections = merge_selections(selections)?;
        let mut items = Vec::with_capacity(selections.len());
        for selection in &selections {
            items.push(self.project_item(row, type_name, path, selection, depth)?);
        }
        Ok(CypherExpr::MapProjection {
            variable: row.to_string(),
            items,
        })
    }

    fn project_item(
        &mut self,
        row: &str,
        type_name: &str,
        path: &str,
        selection: &FieldSelection<'_>,
        depth: u32,
    ) -> Result<ProjectionItem, TranslationError> {
        let field = self.schema.field(type_name, selection.name).ok();
        let kind = FieldTranslationKind::classify(self.schema, type_name, selection, field, false)?;
        let key = selection.response_key();
        let field_path = format!("{}.{}", path, key);

        let Some(field) = field else {
            return Ok(ProjectionItem::Entry {
                key: key.to_string(),
                value: CypherExpr::string(type_name),
            });
        };

        let value = match (kind, &field.cypher) {
            (FieldTranslationKind::PlainProperty, _) => {
                // Arguments of plain properties are checked but have nothing to bind to
                self.resolver.resolve(
                    type_name,
                    selection,
                    field,
                    &mut ParameterNamer::new(),
                    &ParamScope::new(key, &field_path),
                )?;
                if key == field.name {
                    return Ok(ProjectionItem::Shorthand(field.name.clone()));
                }
                CypherExpr::property(row, &field.name)
            }
            (FieldTranslationKind::Directive(_), Some(directive)) => {
                let scope = ParamScope::new(selection.alias.unwrap_or(row), &field_path)
                    .with_fallback(allocate(row, key));
                let arguments =
                    self.resolver
                        .resolve(type_name, selection, field, &mut self.namer, &scope)?;
                let fragment = self
                    .directives
                    .translate(field, directive, Some(row), &arguments);
                let CypherFragment { call, bound_params } = fragment;
                self.bind_all(bound_params);

                if selection.selection_set.is_empty() {
                    call
                } else {
                    let child = allocate(row, key);
                    let projection = self.project(
                        &child,
                        field.field_type.named_type(),
                        &field_path,
                        &selection.selection_set,
                        depth + 1,
                    )?;
                    let source = if field.is_list() {
                        call
                    } else {
                        CypherExpr::ListLiteral(vec![call])
                    };
                    let comprehension = CypherExpr::ListComprehension {
                        variable: child,
                        source: Box::new(source),
                        projection: Box::new(projection),
                    };
                    if field.is_list() {
                        comprehension
                    } else {
                        CypherExpr::head(comprehension)
                    }
                }
            }
            _ => self.relationship_expr(row, type_name, &field_path, selection, field, depth)?,
        };

        Ok(ProjectionItem::Entry {
            key: key.to_string(),
            value,
        })
    }

    /// `[(row)-[:REL]->(rowKey:Type) WHERE ... | rowKey { ... }]`, sliced for paging and
    /// unwrapped with `head` for single-valued fields
    fn relationship_expr(
        &mut self,
        row: &str,
        type_name: &str,
        field_path: &str,
        selection: &FieldSelection<'_>,
        field: &FieldMetadata,
        depth: u32,
    ) -> Result<CypherExpr, TranslationError> {
        let child = allocate(row, selection.response_key());
        let scope = ParamScope::new(&child, field_path);
        let arguments = self
            .resolver
            .resolve(type_name, selection, field, &mut self.namer, &scope)?;
        let filters = self.plain_filters(&child, arguments);

        let target = field.field_type.named_type();
        let projection = self.project(&child, target, field_path, &selection.selection_set, depth + 1)?;

        let mut expr = CypherExpr::PatternComprehension {
            pattern: RelationshipPattern {
                from: row.to_string(),
                relationship: field
                    .relation
                    .as_ref()
                    .map(|relation| (relation.name.clone(), relation.direction)),
                to: child,
                to_label: target.to_string(),
            },
            predicates: filters.predicates,
            projection: Box::new(projection),
        };

        if filters.first.is_some() || filters.offset.is_some() {
            let end = match (&filters.offset, filters.first) {
                (Some(offset), Some(first)) => Some(CypherExpr::Add(
                    Box::new(offset.clone()),
                    Box::new(first),
                )),
                (None, first) => first,
                (Some(_), None) => None,
            };
            expr = CypherExpr::Slice {
                expr: Box::new(expr),
                start: filters.offset.map(Box::new),
                end: end.map(Box::new),
            };
        }

        if field.is_list() {
            Ok(expr)
        } else {
            Ok(CypherExpr::head(expr))
        }
    }
}
