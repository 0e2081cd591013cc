use super::errors::{BindingError, TranslationError};
use super::param_namer::{ParamScope, ParameterNamer};
use crate::graphql_parser::ast::{ArgValue, FieldSelection, Operation, TypeRef};
use crate::schema_catalog::{FieldMetadata, SchemaLookupError, SchemaModel, TypeKind};

/// One argument of one field invocation, ready for binding
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArgument {
    pub name: String,
    pub value: ArgValue,
    pub param_name: String,
}

pub struct ArgumentResolver<'a, 'q> {
    schema: &'a SchemaModel,
    operation: &'a Operation<'q>,
}

impl<'a, 'q> ArgumentResolver<'a, 'q> {
    pub fn new(schema: &'a SchemaModel, operation: &'a Operation<'q>) -> Self {
        ArgumentResolver { schema, operation }
    }

    /// Resolve every declared argument of `field` in declared order.
    ///
    /// Query value first, then the schema default; arguments with neither are omitted.
    pub fn resolve(
        &self,
        type_name: &str,
        selection: &FieldSelection<'_>,
        field: &FieldMetadata,
        namer: &mut ParameterNamer,
        scope: &ParamScope,
    ) -> Result<Vec<ResolvedArgument>, TranslationError> {
        for (name, _) in &selection.arguments {
            if field.argument(name).is_none() {
                return Err(SchemaLookupError::UnknownArgument {
                    type_name: type_name.to_string(),
                    field: field.name.clone(),
                    argument: name.to_string(),
                }
                .into());
            }
        }

        let field_label = format!("{}.{}", type_name, field.name);
        let mut resolved = Vec::with_capacity(field.arguments.len());
        for declared in &field.arguments {
            let value = match selection
                .argument(&declared.name)
                .or(declared.default_value.as_ref())
            {
                Some(value) => value,
                None if declared.value_type.is_non_null() => {
                    return Err(BindingError::MissingArgument {
                        field: field_label,
                        argument: declared.name.clone(),
                    }
                    .into())
                }
                None => continue,
            };

            let check = ValueCheck {
                resolver: self,
                field: &field_label,
                argument: &declared.name,
            };
            check.check(value, &declared.value_type)?;

            resolved.push(ResolvedArgument {
                name: declared.name.clone(),
                value: value.clone(),
                param_name: namer.claim(scope, &declared.name),
            });
        }
        Ok(resolved)
    }
}

struct ValueCheck<'r, 'a, 'q> {
    resolver: &'r ArgumentResolver<'a, 'q>,
    field: &'r str,
    argument: &'r str,
}

impl ValueCheck<'_, '_, '_> {
    fn incompatible(&self, expected: &TypeRef, value: &ArgValue) -> BindingError {
        BindingError::IncompatibleArgument {
            field: self.field.to_string(),
            argument: self.argument.to_string(),
            expected: expected.to_string(),
            found: value.kind_name().to_string(),
        }
    }

    fn check(&self, value: &ArgValue, expected: &TypeRef) -> Result<(), BindingError> {
        match value {
            ArgValue::Variable(name) => self.check_variable(name, expected),
            ArgValue::Null if expected.is_non_null() => Err(self.incompatible(expected, value)),
            ArgValue::Null => Ok(()),
            ArgValue::List(items) => match expected.nullable() {
                TypeRef::List(inner) => items.iter().try_for_each(|item| self.check(item, inner)),
                _ => Err(self.incompatible(expected, value)),
            },
            // A single value is accepted where a list is expected
            _ => match expected.nullable() {
                TypeRef::List(inner) => self.check(value, inner),
                _ => self.check_named(value, expected),
            },
        }
    }

    fn check_variable(&self, name: &str, expected: &TypeRef) -> Result<(), BindingError> {
        let definition = self.resolver.operation.variable(name).ok_or_else(|| {
            BindingError::UndeclaredVariable {
                field: self.field.to_string(),
                argument: self.argument.to_string(),
                variable: name.to_string(),
            }
        })?;

        let declared = &definition.var_type;
        if declared.named_type() != expected.named_type()
            || declared.list_depth() != expected.list_depth()
        {
            return Err(BindingError::VariableTypeMismatch {
                field: self.field.to_string(),
                argument: self.argument.to_string(),
                variable: name.to_string(),
                variable_type: declared.to_string(),
                expected: expected.to_string(),
            });
        }
        Ok(())
    }

    fn check_named(&self, value: &ArgValue, expected: &TypeRef) -> Result<(), BindingError> {
        let type_name = expected.named_type();
        let compatible = match (value, type_name) {
            (ArgValue::Int(_), "Int" | "Float" | "ID") => true,
            (ArgValue::Float(_), "Float") => true,
            (ArgValue::String(_), "String" | "ID") => true,
            (ArgValue::Boolean(_), "Boolean") => true,
            _ => match self
                .resolver
                .schema
                .type_definition(type_name)
                .map(|t| &t.kind)
            {
                // Custom scalars take any literal
                Some(TypeKind::Scalar) => true,
                Some(TypeKind::Enum(values)) => {
                    matches!(value, ArgValue::Enum(v) if values.contains(v))
                }
                Some(TypeKind::InputObject) => {
                    return self.check_input_object(value, expected, type_name)
                }
                _ => false,
            },
        };

        if compatible {
            Ok(())
        } else {
            Err(self.incompatible(expected, value))
        }
    }

    fn check_input_object(
        &self,
        value: &ArgValue,
        expected: &TypeRef,
        type_name: &str,
    ) -> Result<(), BindingError> {
        let (ArgValue::Object(fields), Some(input_type)) =
            (value, self.resolver.schema.type_definition(type_name))
        else {
            return Err(self.incompatible(expected, value));
        };

        for (key, field_value) in fields {
            let input_field = input_type
                .field(key)
                .ok_or_else(|| self.incompatible(expected, value))?;
            self.check(field_value, &input_field.field_type)?;
        }
        for input_field in &input_type.fields {
            let supplied = fields.iter().any(|(key, _)| *key == input_field.name);
            if !supplied && input_field.field_type.is_non_null() {
                return Err(BindingError::MissingArgument {
                    field: self.field.to_string(),
                    argument: format!("{}.{}", self.argument, input_field.name),
                });
            }
        }
        Ok(())
    }
}
