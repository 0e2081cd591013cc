use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit1},
    combinator::{opt, recognize},
    error::context,
    multi::many0,
    sequence::{pair, preceded, separated_pair},
    IResult, Parser,
};

use super::{
    ast::{ArgValue, Directive, TypeRef},
    common::{ignored, name, punct, ws, MAX_NESTING_DEPTH},
    errors::GraphqlParsingError,
};

type PResult<'a, O> = IResult<&'a str, O, GraphqlParsingError<'a>>;

/// `depth` counts the lists, objects and selection sets already open around the value
pub fn parse_value(input: &str, depth: usize) -> PResult<'_, ArgValue> {
    context(
        "Expected a value",
        ws(alt((
            parse_variable,
            parse_number,
            parse_block_string,
            parse_string,
            |i| parse_list(i, depth),
            |i| parse_object(i, depth),
            parse_name_value,
        ))),
    )
    .parse(input)
}

/// Value in a constant position (defaults): variables are rejected
pub fn parse_const_value(input: &str) -> PResult<'_, ArgValue> {
    parse_const_value_at(input, 0)
}

fn parse_const_value_at(input: &str, depth: usize) -> PResult<'_, ArgValue> {
    let (rest, value) = parse_value(input, depth)?;
    if value.contains_variable() {
        return Err(nom::Err::Failure(GraphqlParsingError::new(
            input,
            "Variables are not allowed in constant values",
        )));
    }
    Ok((rest, value))
}

fn parse_variable(input: &str) -> PResult<'_, ArgValue> {
    let (input, var_name) = preceded(char('$'), name).parse(input)?;
    Ok((input, ArgValue::Variable(var_name.to_string())))
}

fn parse_number(input: &str) -> PResult<'_, ArgValue> {
    let (rest, text) = recognize((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            digit1,
        )),
    ))
    .parse(input)?;

    if text.contains(['.', 'e', 'E']) {
        match text.parse::<f64>() {
            Ok(f) => Ok((rest, ArgValue::Float(f))),
            Err(_) => Err(nom::Err::Failure(GraphqlParsingError::new(
                input,
                "Invalid float literal",
            ))),
        }
    } else {
        match text.parse::<i64>() {
            Ok(i) => Ok((rest, ArgValue::Int(i))),
            Err(_) => Err(nom::Err::Failure(GraphqlParsingError::new(
                input,
                "Integer literal out of range",
            ))),
        }
    }
}

fn parse_string(input: &str) -> PResult<'_, ArgValue> {
    let (input, s) = parse_string_literal(input)?;
    Ok((input, ArgValue::String(s)))
}

/// Double-quoted string with GraphQL escapes, returned unescaped
pub fn parse_string_literal(input: &str) -> PResult<'_, String> {
    let (mut rest, _) = char('"').parse(input)?;
    let mut out = String::new();

    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None | Some('\n') | Some('\r') => {
                return Err(nom::Err::Failure(GraphqlParsingError::new(
                    input,
                    "Unterminated string",
                )));
            }
            Some('"') => return Ok((&rest[1..], out)),
            Some('\\') => {
                let escaped = chars.next();
                let unescaped = match escaped {
                    Some('"') => '"',
                    Some('\\') => '\\',
                    Some('/') => '/',
                    Some('b') => '\u{0008}',
                    Some('f') => '\u{000C}',
                    Some('n') => '\n',
                    Some('r') => '\r',
                    Some('t') => '\t',
                    Some('u') => {
                        let hex = rest.get(2..6).unwrap_or("");
                        let code = u32::from_str_radix(hex, 16).ok();
                        match code.and_then(char::from_u32) {
                            Some(c) => {
                                out.push(c);
                                rest = &rest[6..];
                                continue;
                            }
                            None => {
                                return Err(nom::Err::Failure(GraphqlParsingError::new(
                                    rest,
                                    "Invalid unicode escape",
                                )));
                            }
                        }
                    }
                    _ => {
                        return Err(nom::Err::Failure(GraphqlParsingError::new(
                            rest,
                            "Invalid escape sequence",
                        )));
                    }
                };
                out.push(unescaped);
                // backslash plus a single ASCII escape character
                rest = &rest[2..];
            }
            Some(c) => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }
}

fn parse_block_string(input: &str) -> PResult<'_, ArgValue> {
    let (input, s) = parse_block_string_literal(input)?;
    Ok((input, ArgValue::String(s)))
}

/// `"""` block string. Common indentation and blank leading/trailing lines are removed.
pub fn parse_block_string_literal(input: &str) -> PResult<'_, String> {
    let (mut rest, _) = tag("\"\"\"").parse(input)?;
    let mut raw = String::new();

    loop {
        if let Some(after) = rest.strip_prefix("\"\"\"") {
            return Ok((after, dedent_block_string(&raw)));
        }
        if let Some(after) = rest.strip_prefix("\\\"\"\"") {
            raw.push_str("\"\"\"");
            rest = after;
            continue;
        }
        match rest.chars().next() {
            Some(c) => {
                raw.push(c);
                rest = &rest[c.len_utf8()..];
            }
            None => {
                return Err(nom::Err::Failure(GraphqlParsingError::new(
                    input,
                    "Unterminated block string",
                )));
            }
        }
    }
}

fn dedent_block_string(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start_matches([' ', '\t']).len())
        .min()
        .unwrap_or(0);

    let mut dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                *line
            } else {
                line.get(common_indent..).unwrap_or("")
            }
        })
        .collect();

    while dedented.first().is_some_and(|l| l.trim().is_empty()) {
        dedented.remove(0);
    }
    while dedented.last().is_some_and(|l| l.trim().is_empty()) {
        dedented.pop();
    }
    dedented.join("\n")
}

fn nesting_guard<'a>(input: &'a str, depth: usize, message: &'static str) -> PResult<'a, ()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(nom::Err::Failure(GraphqlParsingError::new(input, message)));
    }
    Ok((input, ()))
}

fn parse_list(input: &str, depth: usize) -> PResult<'_, ArgValue> {
    let (input, _) = char('[').parse(input)?;
    let depth = depth + 1;
    let (input, _) = nesting_guard(input, depth, "Value nested too deeply")?;
    let (input, _) = ignored.parse(input)?;
    let (input, items) = many0(|i| parse_value(i, depth)).parse(input)?;
    let (input, _) = context("Unclosed list value", punct(']')).parse(input)?;
    Ok((input, ArgValue::List(items)))
}

fn parse_object(input: &str, depth: usize) -> PResult<'_, ArgValue> {
    let (input, _) = char('{').parse(input)?;
    let depth = depth + 1;
    let (input, _) = nesting_guard(input, depth, "Value nested too deeply")?;
    let (input, _) = ignored.parse(input)?;
    let (input, fields) = many0(separated_pair(ws(name), punct(':'), |i| {
        parse_value(i, depth)
    }))
    .parse(input)?;
    let (input, _) = context("Unclosed object value", punct('}')).parse(input)?;
    Ok((
        input,
        ArgValue::Object(
            fields
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        ),
    ))
}

fn parse_name_value(input: &str) -> PResult<'_, ArgValue> {
    let (input, word) = name.parse(input)?;
    let value = match word {
        "true" => ArgValue::Boolean(true),
        "false" => ArgValue::Boolean(false),
        "null" => ArgValue::Null,
        other => ArgValue::Enum(other.to_string()),
    };
    Ok((input, value))
}

/// `(name: value, ...)`; absent parentheses give an empty list
pub fn parse_arguments<'a>(
    input: &'a str,
    const_only: bool,
    depth: usize,
) -> PResult<'a, Vec<(&'a str, ArgValue)>> {
    let (input, open) = opt(punct('(')).parse(input)?;
    if open.is_none() {
        return Ok((input, vec![]));
    }
    let value_parser = |i: &'a str| {
        if const_only {
            parse_const_value_at(i, depth)
        } else {
            parse_value(i, depth)
        }
    };
    let (input, arguments) =
        many0(separated_pair(ws(name), punct(':'), value_parser)).parse(input)?;
    let (input, _) = context("Unclosed argument list", punct(')')).parse(input)?;
    Ok((input, arguments))
}

/// Zero or more `@name(args)` directives
pub fn parse_directives<'a>(
    input: &'a str,
    const_only: bool,
) -> PResult<'a, Vec<Directive<'a>>> {
    parse_directives_at(input, const_only, 0)
}

pub(crate) fn parse_directives_at<'a>(
    input: &'a str,
    const_only: bool,
    depth: usize,
) -> PResult<'a, Vec<Directive<'a>>> {
    many0(|i: &'a str| {
        let (i, directive_name) = preceded(punct('@'), name).parse(i)?;
        let (i, arguments) = parse_arguments(i, const_only, depth)?;
        Ok((
            i,
            Directive {
                name: directive_name,
                arguments,
            },
        ))
    })
    .parse(input)
}

pub fn parse_type_ref(input: &str) -> PResult<'_, TypeRef> {
    parse_type_ref_at(input, 0)
}

fn parse_type_ref_at(input: &str, depth: usize) -> PResult<'_, TypeRef> {
    let (input, base) = alt((
        |i| {
            let (i, _) = punct('[').parse(i)?;
            let (i, _) = nesting_guard(i, depth + 1, "Type nested too deeply")?;
            let (i, inner) = parse_type_ref_at(i, depth + 1)?;
            let (i, _) = context("Unclosed list type", punct(']')).parse(i)?;
            Ok((i, TypeRef::list(inner)))
        },
        |i| {
            let (i, type_name) = ws(name).parse(i)?;
            Ok((i, TypeRef::named(type_name)))
        },
    ))
    .parse(input)?;

    let (input, bang) = opt(punct('!')).parse(input)?;
    let type_ref = if bang.is_some() {
        TypeRef::non_null(base)
    } else {
        base
    };
    Ok((input, type_ref))
}

/// Skip an optional description string in front of a schema definition
pub fn skip_description(input: &str) -> PResult<'_, ()> {
    let (input, _) = opt(ws(alt((parse_block_string_literal, parse_string_literal)))).parse(input)?;
    Ok((input, ()))
}
