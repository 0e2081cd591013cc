use crate::graphql_parser::ast::FieldSelection;
use crate::schema_catalog::{FieldMetadata, SchemaLookupError, SchemaModel};

pub const TYPENAME_FIELD: &str = "__typename";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectivePlacement {
    /// Entry point of the statement: `UNWIND <call> AS alias`
    RootLevel,
    /// Value inside the enclosing row's map projection
    Nested,
}

/// How one selected field is translated, decided once from its metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldTranslationKind {
    Directive(DirectivePlacement),
    /// Leaf field read straight off the row
    PlainProperty,
    /// Object field reached over a relationship
    PlainNested,
    /// Object-typed root field without a directive: `MATCH (alias:Type)`
    PlainRoot,
    TypeName,
}

impl FieldTranslationKind {
    pub fn classify(
        schema: &SchemaModel,
        parent_type: &str,
        selection: &FieldSelection<'_>,
        field: Option<&FieldMetadata>,
        is_root: bool,
    ) -> Result<Self, SchemaLookupError> {
        let Some(field) = field else {
            return if selection.name == TYPENAME_FIELD {
                Ok(FieldTranslationKind::TypeName)
            } else {
                Err(SchemaLookupError::UnknownField {
                    type_name: parent_type.to_string(),
                    field: selection.name.to_string(),
                })
            };
        };

        let is_leaf = schema.is_leaf_type(field.field_type.named_type());
        if is_leaf && !selection.selection_set.is_empty() {
            return Err(SchemaLookupError::SubselectionOnLeaf {
                type_name: parent_type.to_string(),
                field: field.name.clone(),
            });
        }

        if field.cypher.is_some() {
            // Directive fields may return their value unprojected
            let placement = if is_root {
                DirectivePlacement::RootLevel
            } else {
                DirectivePlacement::Nested
            };
            return Ok(FieldTranslationKind::Directive(placement));
        }

        if !is_leaf && selection.selection_set.is_empty() {
            return Err(SchemaLookupError::MissingSubselection {
                type_name: parent_type.to_string(),
                field: field.name.clone(),
            });
        }

        Ok(match (is_root, is_leaf) {
            (true, true) => {
                return Err(SchemaLookupError::NoGraphPattern {
                    type_name: parent_type.to_string(),
                    field: field.name.clone(),
                })
            }
            (true, false) => FieldTranslationKind::PlainRoot,
            (false, true) => FieldTranslationKind::PlainProperty,
            (false, false) => FieldTranslationKind::PlainNested,
        })
    }
}
