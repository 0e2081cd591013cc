use nom::error::{ContextError, ParseError};
use std::fmt;

#[derive(Debug, PartialEq)]
pub struct GraphqlParsingError<'a> {
    pub errors: Vec<(&'a str, &'static str)>,
}

impl<'a> GraphqlParsingError<'a> {
    pub fn new(input: &'a str, message: &'static str) -> Self {
        GraphqlParsingError {
            errors: vec![(input, message)],
        }
    }

    /// Innermost message, the one closest to the failing token
    pub fn message(&self) -> &'static str {
        self.errors.first().map(|(_, ctx)| *ctx).unwrap_or("unknown error")
    }
}

impl<'a> ParseError<&'a str> for GraphqlParsingError<'a> {
    fn from_error_kind(input: &'a str, _kind: nom::error::ErrorKind) -> Self {
        GraphqlParsingError {
            errors: vec![(input, "unknown error")],
        }
    }

    fn append(input: &'a str, _kind: nom::error::ErrorKind, mut other: Self) -> Self {
        other.errors.push((input, "unknown error (appended)"));
        other
    }
}

impl<'a> ContextError<&'a str> for GraphqlParsingError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, ctx));
        other
    }
}

impl fmt::Display for GraphqlParsingError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (input, ctx) in &self.errors {
            // Show just enough of the remaining input to locate the problem
            let snippet: String = input.chars().take(40).collect();
            writeln!(f, "{}: {}", ctx, snippet)?;
        }
        Ok(())
    }
}

impl std::error::Error for GraphqlParsingError<'_> {}

impl<'a> From<nom::error::Error<&'a str>> for GraphqlParsingError<'a> {
    fn from(err: nom::error::Error<&'a str>) -> Self {
        GraphqlParsingError {
            errors: vec![(err.input, "Unable to parse")],
        }
    }
}
