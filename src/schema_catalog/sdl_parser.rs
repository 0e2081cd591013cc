//! SDL loader for the schema model.
//!
//! Understands object, interface, input, enum and scalar definitions, `schema { ... }`
//! root declarations, and the `@cypher` / `@relation` field directives. Directive
//! definitions and unknown directives are accepted and ignored.
use nom::{
    branch::alt,
    combinator::{cut, opt},
    error::context,
    multi::{many0, many1},
    sequence::preceded,
    IResult, Parser,
};

use super::errors::SchemaCatalogError;
use super::schema_model::{
    ArgumentDefinition, CypherDirective, FieldMetadata, RelationDirection, RelationDirective,
    TypeDefinition, TypeKind,
};
use crate::graphql_parser::{
    ast::{ArgValue, Directive, TypeRef},
    common::{ignored, keyword, name, punct, ws},
    errors::GraphqlParsingError,
    value::{parse_const_value, parse_directives, parse_type_ref, skip_description},
};

type PResult<'a, O> = IResult<&'a str, O, GraphqlParsingError<'a>>;

/// Output of SDL parsing before validation
#[derive(Debug, Default)]
pub struct SdlDocument {
    pub types: Vec<TypeDefinition>,
    pub query_type: Option<String>,
    pub mutation_type: Option<String>,
}

enum Definition<'a> {
    Type(RawType<'a>),
    Schema(Vec<(&'a str, &'a str)>),
    Ignored,
}

struct RawType<'a> {
    name: &'a str,
    kind: TypeKind,
    interfaces: Vec<&'a str>,
    fields: Vec<RawField<'a>>,
}

struct RawField<'a> {
    name: &'a str,
    field_type: TypeRef,
    arguments: Vec<RawArgument<'a>>,
    directives: Vec<Directive<'a>>,
}

struct RawArgument<'a> {
    name: &'a str,
    value_type: TypeRef,
    default_value: Option<ArgValue>,
}

pub fn parse_sdl(input: &str) -> Result<SdlDocument, SchemaCatalogError> {
    let definitions = match parse_definitions(input) {
        Ok((remainder, definitions)) => {
            if !remainder.is_empty() {
                let snippet: String = remainder.chars().take(40).collect();
                return Err(SchemaCatalogError::SdlParseError {
                    error: format!("Unexpected tokens in schema definition: {}", snippet),
                });
            }
            definitions
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(SchemaCatalogError::SdlParseError {
                error: e.to_string().trim_end().to_string(),
            });
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(SchemaCatalogError::SdlParseError {
                error: "Incomplete schema definition".to_string(),
            });
        }
    };

    let mut document = SdlDocument::default();
    for definition in definitions {
        match definition {
            Definition::Type(raw) => document.types.push(convert_type(raw)?),
            Definition::Schema(roots) => {
                for (operation, type_name) in roots {
                    match operation {
                        "query" => document.query_type = Some(type_name.to_string()),
                        "mutation" => document.mutation_type = Some(type_name.to_string()),
                        // subscriptions have no Cypher translation
                        _ => {}
                    }
                }
            }
            Definition::Ignored => {}
        }
    }
    Ok(document)
}

fn parse_definitions(input: &str) -> PResult<'_, Vec<Definition<'_>>> {
    let (input, _) = ignored.parse(input)?;
    let (input, definitions) = many0(parse_definition).parse(input)?;
    let (input, _) = ignored.parse(input)?;
    Ok((input, definitions))
}

fn parse_definition(input: &str) -> PResult<'_, Definition<'_>> {
    let (input, _) = skip_description(input)?;
    alt((
        parse_schema_definition,
        parse_object_like,
        parse_input_definition,
        parse_enum_definition,
        parse_scalar_definition,
        parse_directive_definition,
    ))
    .parse(input)
}

fn parse_schema_definition(input: &str) -> PResult<'_, Definition<'_>> {
    let (input, _) = ws(keyword("schema")).parse(input)?;
    let (input, _) = parse_directives(input, true)?;
    let (input, _) = context("Expected '{' after schema", cut(punct('{'))).parse(input)?;
    let (input, roots) = many1(|i| {
        let (i, operation) = ws(name).parse(i)?;
        let (i, _) = cut(punct(':')).parse(i)?;
        let (i, type_name) = cut(ws(name)).parse(i)?;
        Ok((i, (operation, type_name)))
    })
    .parse(input)?;
    let (input, _) = context("Unclosed schema definition", cut(punct('}'))).parse(input)?;
    Ok((input, Definition::Schema(roots)))
}

fn parse_object_like(input: &str) -> PResult<'_, Definition<'_>> {
    let (input, kind) = ws(alt((
        |i| {
            let (i, _) = keyword("type").parse(i)?;
            Ok((i, TypeKind::Object))
        },
        |i| {
            let (i, _) = keyword("interface").parse(i)?;
            Ok((i, TypeKind::Interface))
        },
    )))
    .parse(input)?;
    let (input, type_name) = context("Expected a type name", cut(ws(name))).parse(input)?;
    let (input, interfaces) = opt(|i| {
        let (i, _) = ws(keyword("implements")).parse(i)?;
        let (i, _) = opt(punct('&')).parse(i)?;
        let (i, first) = cut(ws(name)).parse(i)?;
        let (i, rest) = many0(preceded(punct('&'), cut(ws(name)))).parse(i)?;
        Ok((i, std::iter::once(first).chain(rest).collect::<Vec<_>>()))
    })
    .parse(input)?;
    let (input, _) = parse_directives(input, true)?;
    let (input, fields) = opt(parse_fields_definition).parse(input)?;

    Ok((
        input,
        Definition::Type(RawType {
            name: type_name,
            kind,
            interfaces: interfaces.unwrap_or_default(),
            fields: fields.unwrap_or_default(),
        }),
    ))
}

fn parse_fields_definition(input: &str) -> PResult<'_, Vec<RawField<'_>>> {
    let (input, _) = punct('{').parse(input)?;
    let (input, fields) = many0(parse_field_definition).parse(input)?;
    let (input, _) = context("Unclosed fields definition", cut(punct('}'))).parse(input)?;
    Ok((input, fields))
}

fn parse_field_definition(input: &str) -> PResult<'_, RawField<'_>> {
    let (input, _) = skip_description(input)?;
    let (input, field_name) = ws(name).parse(input)?;
    let (input, arguments) = opt(parse_arguments_definition).parse(input)?;
    let (input, _) = context("Expected ':' after field name", cut(punct(':'))).parse(input)?;
    let (input, field_type) = context("Expected a field type", cut(parse_type_ref)).parse(input)?;
    let (input, directives) = parse_directives(input, true)?;

    Ok((
        input,
        RawField {
            name: field_name,
            field_type,
            arguments: arguments.unwrap_or_default(),
            directives,
        },
    ))
}

fn parse_arguments_definition(input: &str) -> PResult<'_, Vec<RawArgument<'_>>> {
    let (input, _) = punct('(').parse(input)?;
    let (input, arguments) = many1(parse_input_value_definition).parse(input)?;
    let (input, _) = context("Unclosed argument definitions", cut(punct(')'))).parse(input)?;
    Ok((input, arguments))
}

fn parse_input_value_definition(input: &str) -> PResult<'_, RawArgument<'_>> {
    let (input, _) = skip_description(input)?;
    let (input, value_name) = ws(name).parse(input)?;
    let (input, _) = context("Expected ':' after argument name", cut(punct(':'))).parse(input)?;
    let (input, value_type) = context("Expected an argument type", cut(parse_type_ref)).parse(input)?;
    let (input, default_value) = opt(preceded(punct('='), cut(parse_const_value))).parse(input)?;
    let (input, _) = parse_directives(input, true)?;

    Ok((
        input,
        RawArgument {
            name: value_name,
            value_type,
            default_value,
        },
    ))
}

fn parse_input_definition(input: &str) -> PResult<'_, Definition<'_>> {
    let (input, _) = ws(keyword("input")).parse(input)?;
    let (input, type_name) = context("Expected an input type name", cut(ws(name))).parse(input)?;
    let (input, _) = parse_directives(input, true)?;
    let (input, fields) = opt(|i| {
        let (i, _) = punct('{').parse(i)?;
        let (i, values) = many0(parse_input_value_definition).parse(i)?;
        let (i, _) = context("Unclosed input definition", cut(punct('}'))).parse(i)?;
        Ok((i, values))
    })
    .parse(input)?;

    // Input fields are modelled as argument-less fields carrying the input type
    let fields = fields
        .unwrap_or_default()
        .into_iter()
        .map(|value| RawField {
            name: value.name,
            field_type: value.value_type,
            arguments: vec![],
            directives: vec![],
        })
        .collect();

    Ok((
        input,
        Definition::Type(RawType {
            name: type_name,
            kind: TypeKind::InputObject,
            interfaces: vec![],
            fields,
        }),
    ))
}

fn parse_enum_definition(input: &str) -> PResult<'_, Definition<'_>> {
    let (input, _) = ws(keyword("enum")).parse(input)?;
    let (input, type_name) = context("Expected an enum name", cut(ws(name))).parse(input)?;
    let (input, _) = parse_directives(input, true)?;
    let (input, values) = opt(|i| {
        let (i, _) = punct('{').parse(i)?;
        let (i, values) = many0(|i| {
            let (i, _) = skip_description(i)?;
            let (i, value) = ws(name).parse(i)?;
            let (i, _) = parse_directives(i, true)?;
            Ok((i, value.to_string()))
        })
        .parse(i)?;
        let (i, _) = context("Unclosed enum definition", cut(punct('}'))).parse(i)?;
        Ok((i, values))
    })
    .parse(input)?;

    Ok((
        input,
        Definition::Type(RawType {
            name: type_name,
            kind: TypeKind::Enum(values.unwrap_or_default()),
            interfaces: vec![],
            fields: vec![],
        }),
    ))
}

fn parse_scalar_definition(input: &str) -> PResult<'_, Definition<'_>> {
    let (input, _) = ws(keyword("scalar")).parse(input)?;
    let (input, type_name) = context("Expected a scalar name", cut(ws(name))).parse(input)?;
    let (input, _) = parse_directives(input, true)?;
    Ok((
        input,
        Definition::Type(RawType {
            name: type_name,
            kind: TypeKind::Scalar,
            interfaces: vec![],
            fields: vec![],
        }),
    ))
}

// directive @cypher(statement: String) on FIELD_DEFINITION
fn parse_directive_definition(input: &str) -> PResult<'_, Definition<'_>> {
    let (input, _) = ws(keyword("directive")).parse(input)?;
    let (input, _) = cut(preceded(punct('@'), name)).parse(input)?;
    let (input, _) = opt(parse_arguments_definition).parse(input)?;
    let (input, _) = opt(ws(keyword("repeatable"))).parse(input)?;
    let (input, _) = context("Expected 'on' in directive definition", cut(ws(keyword("on"))))
        .parse(input)?;
    let (input, _) = opt(punct('|')).parse(input)?;
    let (input, _) = cut(ws(name)).parse(input)?;
    let (input, _) = many0(preceded(punct('|'), cut(ws(name)))).parse(input)?;
    Ok((input, Definition::Ignored))
}

fn convert_type(raw: RawType<'_>) -> Result<TypeDefinition, SchemaCatalogError> {
    let mut fields = Vec::with_capacity(raw.fields.len());
    for field in raw.fields {
        fields.push(convert_field(raw.name, field)?);
    }
    Ok(TypeDefinition {
        name: raw.name.to_string(),
        kind: raw.kind,
        fields,
        interfaces: raw.interfaces.into_iter().map(str::to_string).collect(),
    })
}

fn convert_field(type_name: &str, raw: RawField<'_>) -> Result<FieldMetadata, SchemaCatalogError> {
    let mut cypher = None;
    let mut relation = None;

    for directive in &raw.directives {
        match directive.name {
            "cypher" => {
                let statement = match directive.argument("statement") {
                    Some(ArgValue::String(statement)) => statement.clone(),
                    Some(other) => {
                        return Err(SchemaCatalogError::invalid_directive(
                            "cypher",
                            type_name,
                            raw.name,
                            format!("`statement` must be a string, found {}", other.kind_name()),
                        ));
                    }
                    None => {
                        return Err(SchemaCatalogError::invalid_directive(
                            "cypher",
                            type_name,
                            raw.name,
                            "missing `statement` argument",
                        ));
                    }
                };
                cypher = Some(CypherDirective { statement });
            }
            "relation" => {
                relation = Some(convert_relation(type_name, raw.name, directive)?);
            }
            other => log::trace!("Ignoring @{} on {}.{}", other, type_name, raw.name),
        }
    }

    Ok(FieldMetadata {
        name: raw.name.to_string(),
        field_type: raw.field_type,
        arguments: raw
            .arguments
            .into_iter()
            .map(|arg| ArgumentDefinition {
                name: arg.name.to_string(),
                value_type: arg.value_type,
                default_value: arg.default_value,
            })
            .collect(),
        cypher,
        relation,
    })
}

fn convert_relation(
    type_name: &str,
    field_name: &str,
    directive: &Directive<'_>,
) -> Result<RelationDirective, SchemaCatalogError> {
    let name = match directive.argument("name") {
        Some(ArgValue::String(name)) => name.clone(),
        _ => {
            return Err(SchemaCatalogError::invalid_directive(
                "relation",
                type_name,
                field_name,
                "`name` must be a string",
            ));
        }
    };

    let direction = match directive.argument("direction") {
        None => RelationDirection::Out,
        Some(ArgValue::Enum(d)) | Some(ArgValue::String(d)) => {
            match d.to_ascii_uppercase().as_str() {
                "OUT" => RelationDirection::Out,
                "IN" => RelationDirection::In,
                "BOTH" => RelationDirection::Both,
                _ => {
                    return Err(SchemaCatalogError::invalid_directive(
                        "relation",
                        type_name,
                        field_name,
                        format!("unknown direction `{}` (expected IN, OUT or BOTH)", d),
                    ));
                }
            }
        }
        Some(other) => {
            return Err(SchemaCatalogError::invalid_directive(
                "relation",
                type_name,
                field_name,
                format!("`direction` must be an enum, found {}", other.kind_name()),
            ));
        }
    };

    Ok(RelationDirective { name, direction })
}
