//! GraphQL executable-document parser.
//!
//! Produces the operation AST consumed by the translator: operations, variable
//! definitions and field selections. Fragments are rejected.
use ast::Document;
use common::ignored;
use errors::GraphqlParsingError;
use nom::{multi::many1, IResult, Parser};

pub mod ast;
pub(crate) mod common;
pub mod errors;
mod operation;
pub(crate) mod value;

/// Parse a sequence of operation definitions, leaving unparsed input to the caller
pub fn parse_operations(
    input: &'_ str,
) -> IResult<&'_ str, Document<'_>, GraphqlParsingError<'_>> {
    let (input, _) = ignored.parse(input)?;
    let (input, operations) = many1(operation::parse_operation).parse(input)?;
    let (input, _) = ignored.parse(input)?;
    Ok((input, Document { operations }))
}

pub fn parse_document(input: &'_ str) -> Result<Document<'_>, GraphqlParsingError<'_>> {
    match parse_operations(input) {
        Ok((remainder, document)) => {
            if !remainder.is_empty() {
                let message = if remainder.starts_with("fragment") {
                    "Fragments are not supported"
                } else {
                    "Unexpected tokens after operation"
                };
                return Err(GraphqlParsingError {
                    errors: vec![(remainder, message)],
                });
            }
            Ok(document)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
        Err(nom::Err::Incomplete(_)) => Err(GraphqlParsingError {
            errors: vec![(input, "Incomplete document")],
        }),
    }
}
