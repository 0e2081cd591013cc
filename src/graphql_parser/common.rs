use nom::{
    branch::alt,
    bytes::complete::{take_while, take_while1, take_while_m_n},
    character::complete::char,
    combinator::{recognize, value},
    error::ParseError,
    multi::many0_count,
    sequence::{delimited, pair},
    IResult, Parser,
};

/// Bound on nested selection sets, list/object values and list types combined.
/// Deeper documents fail with a parse error instead of exhausting the stack.
pub const MAX_NESTING_DEPTH: usize = 128;

// GraphQL "ignored tokens": whitespace, line terminators, commas, BOM and # comments.
pub fn ignored<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (), E> {
    value(
        (),
        many0_count(alt((
            value(
                (),
                take_while1(|c: char| c.is_whitespace() || c == ',' || c == '\u{feff}'),
            ),
            value((), pair(char('#'), take_while(|c: char| c != '\n' && c != '\r'))),
        ))),
    )
    .parse(input)
}

pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(ignored, inner, ignored)
}

/// GraphQL name: `/[_A-Za-z][_0-9A-Za-z]*/`
pub fn name<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    recognize(pair(
        take_while_m_n(1, 1, |c: char| c == '_' || c.is_ascii_alphabetic()),
        take_while(|c: char| c == '_' || c.is_ascii_alphanumeric()),
    ))
    .parse(input)
}

/// Single punctuator surrounded by ignored tokens
pub fn punct<'a, E: ParseError<&'a str>>(c: char) -> impl Parser<&'a str, Output = char, Error = E> {
    ws(char(c))
}

/// Keyword: a name equal to `word` that is not a prefix of a longer name
pub fn keyword<'a, E: ParseError<&'a str>>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = E> {
    move |input: &'a str| {
        let (rest, found) = name::<E>(input)?;
        if found == word {
            Ok((rest, found))
        } else {
            Err(nom::Err::Error(E::from_error_kind(
                input,
                nom::error::ErrorKind::Tag,
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nom::bytes::complete::tag;

    #[test]
    fn test_ws_skips_commas_and_comments() {
        assert_eq!(
            ws(tag::<&str, &str, nom::error::Error<&str>>("test")).parse(" ,, test # trailing\n"),
            Ok(("", "test"))
        );
        assert_eq!(
            ws(tag::<&str, &str, nom::error::Error<&str>>("test")).parse("test"),
            Ok(("", "test"))
        );
    }

    #[test]
    fn test_name() {
        assert_eq!(name::<nom::error::Error<&str>>("person_1 {"), Ok((" {", "person_1")));
        assert_eq!(name::<nom::error::Error<&str>>("_id"), Ok(("", "_id")));
        assert!(name::<nom::error::Error<&str>>("1abc").is_err());
    }

    #[test]
    fn test_keyword_rejects_longer_names() {
        assert_eq!(
            keyword::<nom::error::Error<&str>>("query").parse("query Q"),
            Ok((" Q", "query"))
        );
        assert!(keyword::<nom::error::Error<&str>>("query")
            .parse("queryX")
            .is_err());
    }
}
