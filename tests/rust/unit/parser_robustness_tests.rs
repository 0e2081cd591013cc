//! Unit tests for GraphQL and SDL parsing edge cases and error handling
//!
//! Tests malformed documents, edge cases, and error conditions to ensure
//! robust parsing without panics.

#[cfg(test)]
mod parser_robustness_tests {
    use graphql_cypher::graphql_parser::ast::{ArgValue, OperationKind};
    use graphql_cypher::graphql_parser::parse_document;
    use graphql_cypher::schema_catalog::sdl_parser::parse_sdl;

    /// Test that malformed documents don't cause panics
    #[test]
    fn test_malformed_documents_no_panic() {
        let malformed = vec![
            "",                              // Empty document
            "{",                             // Unclosed selection set
            "{ }",                           // Empty selection set
            "{ person {",                    // Unclosed nested selection
            "{ person(name: ) { id } }",     // Missing argument value
            "{ person(name \"x\") { id } }", // Missing colon
            "query ($x) { a }",              // Variable without type
            "{ a(s: \"unterminated) }",      // Unterminated string
            "{ a(n: 99999999999999999999) }", // Integer overflow
            "{ ...Frag }",                   // Fragment spread
            "subscription { a }",            // Unsupported operation type
            "{ a } }",                       // Trailing tokens
        ];

        for document in malformed {
            let result = parse_document(document);
            assert!(result.is_err(), "Expected parse error for: {}", document);
        }
    }

    /// Test valid documents that should parse successfully
    #[test]
    fn test_valid_documents_parse() {
        let valid = vec![
            "{ person { id } }",
            "query { person { id } }",
            "query People { person { id name } }",
            "query($n: String = \"x\") { p3(name: $n) { id } }",
            "mutation M($id: ID!) { rename(id: $id) { id } }",
            "{ a: person { b: id } }",
            "{ person { age(mult: 2) @skip(if: false) } }",
            "{ a(list: [1, 2.5, \"s\", true, null, ENUM]) }",
            "{ a(obj: {nested: {deep: [$v]}}) }",
            "{ a(s: \"\"\"\n  block\n  string\n\"\"\") }",
            "# comment\n{ person { id } } # trailing",
            "\u{feff}{ person { id } }",
        ];

        for document in valid {
            let result = parse_document(document);
            assert!(result.is_ok(), "Failed to parse valid document: {}", document);
        }
    }

    /// Test GraphQL syntax variations: commas and whitespace are insignificant
    #[test]
    fn test_syntax_variations_equivalent() {
        let variations = vec![
            "{person{age(mult:2)name}}",
            "{ person { age(mult: 2), name } }",
            "{\n  person {\n    age(\n      mult: 2\n    )\n    name\n  }\n}",
            ",,{ person ,{ age(mult:2,), name, } },",
        ];

        let expected = parse_document(variations[0]).unwrap();
        for document in &variations[1..] {
            assert_eq!(parse_document(document).unwrap(), expected, "{}", document);
        }
    }

    /// Test that pathologically nested documents fail instead of overflowing the stack
    #[test]
    fn test_deep_nesting_is_rejected() {
        let selections = format!(
            "{{ person {}id{} }}",
            "{ friends ".repeat(1000),
            " }".repeat(1000)
        );
        let err = parse_document(&selections).unwrap_err();
        assert_eq!(err.message(), "Selection set nested too deeply");

        let values = format!("{{ a(l: {}1{}) }}", "[".repeat(1000), "]".repeat(1000));
        let err = parse_document(&values).unwrap_err();
        assert_eq!(err.message(), "Value nested too deeply");

        let objects = format!("{{ a(o: {}1{}) }}", "{k: ".repeat(1000), "}".repeat(1000));
        let err = parse_document(&objects).unwrap_err();
        assert_eq!(err.message(), "Value nested too deeply");

        let types = format!(
            "query($v: {}Int{}) {{ a }}",
            "[".repeat(1000),
            "]".repeat(1000)
        );
        let err = parse_document(&types).unwrap_err();
        assert_eq!(err.message(), "Type nested too deeply");
    }

    /// Test string escape handling
    #[test]
    fn test_string_escapes() {
        let document = parse_document(r#"{ a(s: "q\"b\\nA\n") }"#).unwrap();
        let operation = document.operation(None).unwrap();
        assert_eq!(operation.kind, OperationKind::Query);
        assert_eq!(
            operation.selection_set[0].argument("s"),
            Some(&ArgValue::String("q\"b\\nA\n".to_string()))
        );
    }

    /// Test SDL documents with unsupported or broken definitions
    #[test]
    fn test_malformed_sdl_no_panic() {
        let malformed = vec![
            "type",
            "type Person {",
            "type Person { id: }",
            "type Person { id: ID @cypher(statement: 1) }",
            "enum Color { RED",
            "schema { query }",
            "union U = A | B",
        ];

        for sdl in malformed {
            assert!(parse_sdl(sdl).is_err(), "Expected SDL error for: {}", sdl);
        }
    }
}
