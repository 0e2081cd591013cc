use std::collections::HashMap;
use std::path::Path;

use super::errors::{SchemaCatalogError, SchemaLookupError};
use super::sdl_parser::parse_sdl;
use crate::graphql_parser::ast::{ArgValue, OperationKind, TypeRef};

pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Object,
    Interface,
    InputObject,
    Enum(Vec<String>),
    Scalar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub name: String,
    pub kind: TypeKind,
    /// Declared fields in SDL order. Input objects keep their input fields here too.
    pub fields: Vec<FieldMetadata>,
    pub interfaces: Vec<String>,
}

impl TypeDefinition {
    pub fn object(name: impl Into<String>, fields: Vec<FieldMetadata>) -> Self {
        TypeDefinition {
            name: name.into(),
            kind: TypeKind::Object,
            fields,
            interfaces: vec![],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldMetadata> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// `@cypher(statement: "...")` payload. The statement is opaque.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CypherDirective {
    pub statement: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationDirection {
    In,
    Out,
    Both,
}

/// `@relation(name: "KNOWS", direction: OUT)` payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDirective {
    pub name: String,
    pub direction: RelationDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentDefinition {
    pub name: String,
    pub value_type: TypeRef,
    pub default_value: Option<ArgValue>,
}

impl ArgumentDefinition {
    pub fn new(name: impl Into<String>, value_type: TypeRef) -> Self {
        ArgumentDefinition {
            name: name.into(),
            value_type,
            default_value: None,
        }
    }

    pub fn with_default(mut self, default_value: ArgValue) -> Self {
        self.default_value = Some(default_value);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetadata {
    pub name: String,
    pub field_type: TypeRef,
    /// Declared arguments in SDL order
    pub arguments: Vec<ArgumentDefinition>,
    pub cypher: Option<CypherDirective>,
    pub relation: Option<RelationDirective>,
}

impl FieldMetadata {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        FieldMetadata {
            name: name.into(),
            field_type,
            arguments: vec![],
            cypher: None,
            relation: None,
        }
    }

    pub fn with_argument(mut self, argument: ArgumentDefinition) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_cypher(mut self, statement: impl Into<String>) -> Self {
        self.cypher = Some(CypherDirective {
            statement: statement.into(),
        });
        self
    }

    /// Multi-value cardinality: the declared return type is a list
    pub fn is_list(&self) -> bool {
        self.field_type.is_list()
    }

    pub fn argument(&self, name: &str) -> Option<&ArgumentDefinition> {
        self.arguments.iter().find(|a| a.name == name)
    }
}

/// Immutable type → field → metadata lookup built from SDL or by hand
#[derive(Debug, Clone)]
pub struct SchemaModel {
    types: HashMap<String, TypeDefinition>,
    query_type: String,
    mutation_type: String,
}

impl SchemaModel {
    /// Build and validate a model with the default root names `Query` and `Mutation`
    pub fn new(types: Vec<TypeDefinition>) -> Result<Self, SchemaCatalogError> {
        Self::with_root_types(types, None, None)
    }

    pub fn with_root_types(
        types: Vec<TypeDefinition>,
        query_type: Option<String>,
        mutation_type: Option<String>,
    ) -> Result<Self, SchemaCatalogError> {
        let mut by_name = HashMap::with_capacity(types.len());
        for type_def in types {
            if BUILTIN_SCALARS.contains(&type_def.name.as_str())
                || by_name.contains_key(&type_def.name)
            {
                return Err(SchemaCatalogError::DuplicateType {
                    type_name: type_def.name,
                });
            }
            by_name.insert(type_def.name.clone(), type_def);
        }

        let schema = SchemaModel {
            types: by_name,
            query_type: query_type.unwrap_or_else(|| "Query".to_string()),
            mutation_type: mutation_type.unwrap_or_else(|| "Mutation".to_string()),
        };
        schema.validate()?;

        log::debug!(
            "Schema model built: {} types (query root `{}`)",
            schema.types.len(),
            schema.query_type
        );
        Ok(schema)
    }

    pub fn from_sdl(sdl: &str) -> Result<Self, SchemaCatalogError> {
        let document = parse_sdl(sdl)?;
        Self::with_root_types(document.types, document.query_type, document.mutation_type)
    }

    pub fn from_sdl_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaCatalogError> {
        let path = path.as_ref();
        let sdl = std::fs::read_to_string(path).map_err(|e| SchemaCatalogError::SchemaReadError {
            error: format!("{}: {}", path.display(), e),
        })?;
        Self::from_sdl(&sdl)
    }

    fn validate(&self) -> Result<(), SchemaCatalogError> {
        for type_def in self.types.values() {
            let mut seen = Vec::with_capacity(type_def.fields.len());
            for field in &type_def.fields {
                if seen.contains(&field.name.as_str()) {
                    return Err(SchemaCatalogError::DuplicateField {
                        type_name: type_def.name.clone(),
                        field: field.name.clone(),
                    });
                }
                seen.push(field.name.as_str());

                self.check_type_exists(&field.field_type, || {
                    format!("field `{}.{}`", type_def.name, field.name)
                })?;
                for argument in &field.arguments {
                    self.check_type_exists(&argument.value_type, || {
                        format!(
                            "argument `{}` of `{}.{}`",
                            argument.name, type_def.name, field.name
                        )
                    })?;
                }
            }
            for interface in &type_def.interfaces {
                if !self.types.contains_key(interface) {
                    return Err(SchemaCatalogError::unknown_type_with_context(
                        interface,
                        format!("implements clause of `{}`", type_def.name),
                    ));
                }
            }
        }

        for (operation, root) in [("query", &self.query_type), ("mutation", &self.mutation_type)] {
            if let Some(type_def) = self.types.get(root) {
                if type_def.kind != TypeKind::Object {
                    return Err(SchemaCatalogError::InvalidRootType {
                        operation: operation.to_string(),
                        type_name: root.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_type_exists(
        &self,
        type_ref: &TypeRef,
        context: impl FnOnce() -> String,
    ) -> Result<(), SchemaCatalogError> {
        let name = type_ref.named_type();
        if BUILTIN_SCALARS.contains(&name) || self.types.contains_key(name) {
            Ok(())
        } else {
            Err(SchemaCatalogError::unknown_type_with_context(name, context()))
        }
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Metadata for `type_name.field_name`
    pub fn field(&self, type_name: &str, field_name: &str) -> Result<&FieldMetadata, SchemaLookupError> {
        let type_def = self
            .types
            .get(type_name)
            .ok_or_else(|| SchemaLookupError::UnknownType {
                type_name: type_name.to_string(),
            })?;
        type_def
            .field(field_name)
            .ok_or_else(|| SchemaLookupError::UnknownField {
                type_name: type_name.to_string(),
                field: field_name.to_string(),
            })
    }

    pub fn root_type(&self, kind: OperationKind) -> Result<&TypeDefinition, SchemaLookupError> {
        let name = match kind {
            OperationKind::Query => &self.query_type,
            OperationKind::Mutation => &self.mutation_type,
        };
        self.types
            .get(name)
            .ok_or_else(|| SchemaLookupError::MissingRootType {
                operation: kind.to_string(),
            })
    }

    /// Leaf types (scalars and enums) are projected as values, never as maps
    pub fn is_leaf_type(&self, name: &str) -> bool {
        if BUILTIN_SCALARS.contains(&name) {
            return true;
        }
        matches!(
            self.types.get(name).map(|t| &t.kind),
            Some(TypeKind::Scalar) | Some(TypeKind::Enum(_))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_type() -> TypeDefinition {
        TypeDefinition::object(
            "Person",
            vec![
                FieldMetadata::new("id", TypeRef::named("ID")),
                FieldMetadata::new("age", TypeRef::list(TypeRef::named("Int")))
                    .with_argument(
                        ArgumentDefinition::new("mult", TypeRef::named("Int"))
                            .with_default(ArgValue::Int(13)),
                    )
                    .with_cypher("RETURN this.age * mult as age"),
            ],
        )
    }

    #[test]
    fn test_field_lookup() {
        let schema = SchemaModel::new(vec![person_type()]).unwrap();
        let age = schema.field("Person", "age").unwrap();
        assert!(age.is_list());
        assert_eq!(
            age.cypher.as_ref().map(|c| c.statement.as_str()),
            Some("RETURN this.age * mult as age")
        );
        assert_eq!(
            schema.field("Person", "nope"),
            Err(SchemaLookupError::UnknownField {
                type_name: "Person".to_string(),
                field: "nope".to_string()
            })
        );
        assert!(matches!(
            schema.field("Nope", "id"),
            Err(SchemaLookupError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let err = SchemaModel::new(vec![person_type(), person_type()]).unwrap_err();
        assert_eq!(
            err,
            SchemaCatalogError::DuplicateType {
                type_name: "Person".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_field_type_rejected() {
        let query = TypeDefinition::object(
            "Query",
            vec![FieldMetadata::new("people", TypeRef::list(TypeRef::named("Persn")))],
        );
        let err = SchemaModel::new(vec![person_type(), query]).unwrap_err();
        assert!(matches!(err, SchemaCatalogError::UnknownType { ref type_name, .. } if type_name == "Persn"));
    }

    #[test]
    fn test_missing_root_type() {
        let schema = SchemaModel::new(vec![person_type()]).unwrap();
        assert_eq!(
            schema.root_type(OperationKind::Mutation).unwrap_err(),
            SchemaLookupError::MissingRootType {
                operation: "mutation".to_string()
            }
        );
    }

    #[test]
    fn test_leaf_types() {
        let status = TypeDefinition {
            name: "Status".to_string(),
            kind: TypeKind::Enum(vec!["ACTIVE".to_string()]),
            fields: vec![],
            interfaces: vec![],
        };
        let schema = SchemaModel::new(vec![person_type(), status]).unwrap();
        assert!(schema.is_leaf_type("Int"));
        assert!(schema.is_leaf_type("Status"));
        assert!(!schema.is_leaf_type("Person"));
    }
}
