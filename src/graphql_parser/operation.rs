use nom::{
    branch::alt,
    combinator::{cut, opt},
    error::context,
    multi::many1,
    sequence::preceded,
    IResult, Parser,
};

use super::{
    ast::{FieldSelection, Operation, OperationKind, VariableDefinition},
    common::{keyword, name, punct, ws, MAX_NESTING_DEPTH},
    errors::GraphqlParsingError,
    value::{
        parse_arguments, parse_const_value, parse_directives, parse_directives_at, parse_type_ref,
    },
};

type PResult<'a, O> = IResult<&'a str, O, GraphqlParsingError<'a>>;

pub fn parse_operation(input: &str) -> PResult<'_, Operation<'_>> {
    alt((parse_shorthand_operation, parse_full_operation)).parse(input)
}

fn parse_shorthand_operation(input: &str) -> PResult<'_, Operation<'_>> {
    let (input, selection_set) = parse_selection_set(input, 0)?;
    Ok((input, Operation::query(selection_set)))
}

fn parse_full_operation(input: &str) -> PResult<'_, Operation<'_>> {
    let (input, kind) = ws(alt((
        |i| {
            let (i, _) = keyword("query").parse(i)?;
            Ok((i, OperationKind::Query))
        },
        |i| {
            let (i, _) = keyword("mutation").parse(i)?;
            Ok((i, OperationKind::Mutation))
        },
    )))
    .parse(input)?;

    let (input, operation_name) = opt(ws(name)).parse(input)?;
    let (input, variable_definitions) = opt(parse_variable_definitions).parse(input)?;
    // Operation-level directives carry no meaning for translation
    let (input, _) = parse_directives(input, false)?;
    let (input, selection_set) =
        context("Expected a selection set", cut(|i| parse_selection_set(i, 0))).parse(input)?;

    Ok((
        input,
        Operation {
            kind,
            name: operation_name,
            variable_definitions: variable_definitions.unwrap_or_default(),
            selection_set,
        },
    ))
}

fn parse_variable_definitions(input: &str) -> PResult<'_, Vec<VariableDefinition<'_>>> {
    let (input, _) = punct('(').parse(input)?;
    let (input, definitions) = many1(parse_variable_definition).parse(input)?;
    let (input, _) = context("Unclosed variable definitions", cut(punct(')'))).parse(input)?;
    Ok((input, definitions))
}

fn parse_variable_definition(input: &str) -> PResult<'_, VariableDefinition<'_>> {
    let (input, var_name) = preceded(punct('$'), name).parse(input)?;
    let (input, _) = context("Expected ':' after variable name", cut(punct(':'))).parse(input)?;
    let (input, var_type) = context("Expected a variable type", cut(parse_type_ref)).parse(input)?;
    let (input, default_value) = opt(preceded(punct('='), parse_const_value)).parse(input)?;
    let (input, _) = parse_directives(input, true)?;

    Ok((
        input,
        VariableDefinition {
            name: var_name,
            var_type,
            default_value,
        },
    ))
}

/// `depth` is the number of selection sets already open around this one
fn parse_selection_set(input: &str, depth: usize) -> PResult<'_, Vec<FieldSelection<'_>>> {
    let (input, _) = punct('{').parse(input)?;
    let depth = depth + 1;
    if depth > MAX_NESTING_DEPTH {
        return Err(nom::Err::Failure(GraphqlParsingError::new(
            input,
            "Selection set nested too deeply",
        )));
    }
    let (input, selections) = many1(|i| parse_selection(i, depth)).parse(input)?;
    let (input, _) = context("Unclosed selection set", cut(punct('}'))).parse(input)?;
    Ok((input, selections))
}

fn parse_selection(input: &str, depth: usize) -> PResult<'_, FieldSelection<'_>> {
    if input.trim_start_matches([' ', '\t', '\n', '\r', ',']).starts_with("...") {
        return Err(nom::Err::Failure(GraphqlParsingError::new(
            input,
            "Fragments are not supported",
        )));
    }
    parse_field(input, depth)
}

fn parse_field(input: &str, depth: usize) -> PResult<'_, FieldSelection<'_>> {
    let (input, first) = ws(name).parse(input)?;
    let (input, second) = opt(preceded(punct(':'), ws(name))).parse(input)?;
    let (alias, field_name) = match second {
        Some(field_name) => (Some(first), field_name),
        None => (None, first),
    };

    let (input, arguments) = parse_arguments(input, false, depth)?;
    let (input, directives) = parse_directives_at(input, false, depth)?;
    let (input, selection_set) = opt(|i| parse_selection_set(i, depth)).parse(input)?;

    Ok((
        input,
        FieldSelection {
            name: field_name,
            alias,
            arguments,
            directives,
            selection_set: selection_set.unwrap_or_default(),
        },
    ))
}
