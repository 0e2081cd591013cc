//! graphql-cypher - GraphQL to Cypher translation
//!
//! This crate turns GraphQL operations into parameterized Cypher statements:
//! - GraphQL operation parsing
//! - Schema catalog loaded from SDL, including `@cypher` and `@relation` directives
//! - Directive-driven translation with deterministic parameter naming
//!
//! ```ignore
//! let schema = SchemaModel::from_sdl(sdl)?;
//! let translator = Translator::new(&schema, TranslatorConfig::default());
//! for result in translator.translate_query("{ person { name } }", None)? {
//!     println!("{} {:?}", result.statement, result.parameters);
//! }
//! ```

pub mod config;
pub mod graphql_parser;
pub mod query_translator;
pub mod schema_catalog;

pub use query_translator::{translate, TranslationError, TranslationResult, Translator};
