use std::collections::BTreeSet;

use graphql_cypher::config::{ObjectArgumentMode, TranslatorConfig};
use graphql_cypher::query_translator::{
    BindingError, ParamValue, TranslationError, TranslationResult, Translator,
};
use graphql_cypher::schema_catalog::{SchemaLookupError, SchemaModel};
use serde_json::json;
use test_case::test_case;

const PERSON_SCHEMA: &str = r#"
type Person {
  id: ID
  name: String @cypher(statement: "RETURN this.name")
  age(mult: Int = 13): [Int] @cypher(statement: "RETURN this.age * mult as age")
  score(mult: Int = 2): Float @cypher(statement: "RETURN this.score * mult")
}

input NameFilter {
  name: String!
}

type Query {
  person: Person
  p2: [Person] @cypher(statement: "MATCH (p:Person) RETURN p")
  p3(name: String): Person @cypher(statement: "MATCH (p:Person) WHERE p.name = name RETURN p LIMIT 1")
  byFilter(filter: NameFilter): [Person] @cypher(statement: "MATCH (p:Person) WHERE p.name = filter.name RETURN p")
  required(name: String!): Person @cypher(statement: "MATCH (p:Person) WHERE p.name = name RETURN p")
}

type Mutation {
  rename(id: ID!, name: String!): Person @cypher(statement: "MATCH (p:Person {id: id}) SET p.name = name RETURN p")
}
"#;

fn schema() -> SchemaModel {
    SchemaModel::from_sdl(PERSON_SCHEMA).unwrap()
}

fn translate_one(query: &str) -> Result<TranslationResult, TranslationError> {
    translate_with(query, TranslatorConfig::default())
}

fn translate_with(query: &str, config: TranslatorConfig) -> Result<TranslationResult, TranslationError> {
    let schema = schema();
    let translator = Translator::new(&schema, config);
    let mut results = translator.translate_query(query, None)?;
    assert_eq!(results.len(), 1);
    Ok(results.remove(0))
}

/// `$name` tokens outside single-quoted string literals
fn statement_parameters(statement: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut chars = statement.chars().peekable();
    let mut in_string = false;
    while let Some(c) = chars.next() {
        match c {
            '\\' if in_string => {
                chars.next();
            }
            '\'' => in_string = !in_string,
            '$' if !in_string => {
                let mut name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                names.insert(name);
            }
            _ => {}
        }
    }
    names
}

fn assert_complete(result: &TranslationResult) {
    let keys: BTreeSet<String> = result.parameters.keys().cloned().collect();
    assert_eq!(statement_parameters(&result.statement), keys);
}

#[test]
fn test_nested_directive_single_value() {
    let result = translate_one("{ person { name }}").unwrap();
    assert_eq!(
        result.statement,
        "MATCH (person:Person) RETURN person { name:apoc.cypher.runFirstColumnSingle('WITH $this AS this RETURN this.name',{this:person}) } AS person"
    );
    assert!(result.parameters.is_empty());
}

#[test]
fn test_nested_directive_uses_default_argument() {
    let result = translate_one("{ person { age }}").unwrap();
    assert_eq!(
        result.statement,
        "MATCH (person:Person) RETURN person { age:apoc.cypher.runFirstColumnMany('WITH $this AS this,$mult AS mult RETURN this.age * mult as age',{this:person,mult:$personMult}) } AS person"
    );
    assert_eq!(result.parameters.len(), 1);
    assert_eq!(result.parameters["personMult"], ParamValue::Int(13));
    assert_complete(&result);
}

#[test]
fn test_nested_directive_query_argument_overrides_default() {
    let result = translate_one("{ person { age(mult:25) }}").unwrap();
    assert!(result.statement.contains(
        "age:apoc.cypher.runFirstColumnMany('WITH $this AS this,$mult AS mult RETURN this.age * mult as age',{this:person,mult:$personMult})"
    ));
    assert_eq!(result.parameters["personMult"], ParamValue::Int(25));
}

#[test]
fn test_root_directive_without_arguments() {
    let result = translate_one("{ p2 { id }}").unwrap();
    assert_eq!(
        result.statement,
        "UNWIND apoc.cypher.runFirstColumnMany('MATCH (p:Person) RETURN p',{}) AS p2 RETURN p2 { .id } AS p2"
    );
    assert!(result.parameters.is_empty());
}

#[test]
fn test_root_directive_with_literal_argument() {
    let result = translate_one(r#"{ p3(name:"Jane") { id }}"#).unwrap();
    assert_eq!(
        result.statement,
        "UNWIND apoc.cypher.runFirstColumnSingle('WITH $name AS name MATCH (p:Person) WHERE p.name = name RETURN p LIMIT 1',{name:$p3Name}) AS p3 RETURN p3 { .id } AS p3"
    );
    assert_eq!(result.parameters.len(), 1);
    assert_eq!(
        result.parameters["p3Name"],
        ParamValue::String("Jane".to_string())
    );
}

#[test]
fn test_root_directive_with_variable_argument() {
    let result = translate_one("query($pname:String) { p3(name:$pname) { id }}").unwrap();
    assert!(result
        .statement
        .starts_with("UNWIND apoc.cypher.runFirstColumnSingle('WITH $name AS name "));
    assert!(result.statement.contains(",{name:$p3Name}) AS p3"));
    assert_eq!(
        result.parameters["p3Name"],
        ParamValue::Variable("pname".to_string())
    );

    let bound = result
        .bind_variables(json!({"pname": "Jane"}).as_object().unwrap())
        .unwrap();
    assert_eq!(bound["p3Name"], json!("Jane"));
}

#[test]
fn test_realiasing_changes_key_and_prefix_only() {
    let result = translate_one("{ person { renamed: age, name }}").unwrap();
    assert_eq!(
        result.statement,
        "MATCH (person:Person) RETURN person { renamed:apoc.cypher.runFirstColumnMany('WITH $this AS this,$mult AS mult RETURN this.age * mult as age',{this:person,mult:$renamedMult}), name:apoc.cypher.runFirstColumnSingle('WITH $this AS this RETURN this.name',{this:person}) } AS person"
    );
    assert_eq!(result.parameters["renamedMult"], ParamValue::Int(13));
    assert!(!result.parameters.contains_key("personMult"));
}

#[test]
fn test_same_field_twice_under_different_aliases() {
    let result = translate_one("{ person { age, doubled: age(mult: 2) }}").unwrap();
    assert_eq!(result.parameters["personMult"], ParamValue::Int(13));
    assert_eq!(result.parameters["doubledMult"], ParamValue::Int(2));
    assert_complete(&result);
}

#[test]
fn test_unaliased_siblings_sharing_argument_name() {
    let result = translate_one("{ person { age, score }}").unwrap();
    assert_eq!(result.parameters["personMult"], ParamValue::Int(13));
    assert_eq!(result.parameters["personScoreMult"], ParamValue::Int(2));
    assert_complete(&result);
}

#[test]
fn test_alias_taking_a_fallback_name() {
    let result = translate_one("{ person { personScore: age, age, score } }").unwrap();
    assert_eq!(result.parameters["personScoreMult"], ParamValue::Int(13));
    assert_eq!(result.parameters["personMult"], ParamValue::Int(13));
    assert_eq!(result.parameters["person_score_mult"], ParamValue::Int(2));
    assert!(result
        .statement
        .contains("score:apoc.cypher.runFirstColumnSingle('WITH $this AS this,$mult AS mult RETURN this.score * mult',{this:person,mult:$person_score_mult})"));
    assert_complete(&result);
}

#[test]
fn test_repeated_field_is_projected_once() {
    let result = translate_one("{ person { age age } }").unwrap();
    assert_eq!(
        result.statement,
        "MATCH (person:Person) RETURN person { age:apoc.cypher.runFirstColumnMany('WITH $this AS this,$mult AS mult RETURN this.age * mult as age',{this:person,mult:$personMult}) } AS person"
    );
    assert_complete(&result);

    assert!(matches!(
        translate_one("{ person { age(mult: 1) age(mult: 2) } }"),
        Err(TranslationError::Binding(BindingError::FieldConflict { .. }))
    ));
}

#[test]
fn test_deeply_nested_query_fails_to_parse() {
    let query = format!("{}id{}", "{ person ".repeat(1000), " }".repeat(1000));
    match translate_one(&query) {
        Err(TranslationError::Parse(message)) => {
            assert!(message.contains("Selection set nested too deeply"), "{}", message)
        }
        other => panic!("Expected parse error, got {:?}", other),
    }
}

#[test]
fn test_translation_is_deterministic() {
    let query = r#"{ person { renamed: age(mult: 3), age, score, personScore: age, name } }"#;
    let first = translate_one(query).unwrap();
    for _ in 0..5 {
        assert_eq!(translate_one(query).unwrap(), first);
    }
    assert_complete(&first);
}

#[test_case("{ p2 { id } }", "apoc.cypher.runFirstColumnMany" ; "list root field")]
#[test_case(r#"{ p3(name: "x") { id } }"#, "apoc.cypher.runFirstColumnSingle" ; "single root field")]
#[test_case("{ person { age } }", "apoc.cypher.runFirstColumnMany" ; "list nested field")]
#[test_case("{ person { score } }", "apoc.cypher.runFirstColumnSingle" ; "single nested field")]
fn test_cardinality_selects_call_convention(query: &str, procedure: &str) {
    let result = translate_one(query).unwrap();
    assert!(
        result.statement.contains(&format!("{}(", procedure)),
        "{} not in {}",
        procedure,
        result.statement
    );
}

#[test]
fn test_absent_argument_without_default_is_omitted() {
    let result = translate_one("{ p3 { id } }").unwrap();
    assert_eq!(
        result.statement,
        "UNWIND apoc.cypher.runFirstColumnSingle('MATCH (p:Person) WHERE p.name = name RETURN p LIMIT 1',{}) AS p3 RETURN p3 { .id } AS p3"
    );
    assert!(result.parameters.is_empty());
}

#[test]
fn test_root_directive_without_selection_returns_alias() {
    let schema = SchemaModel::from_sdl(
        r#"type Query { total: Int @cypher(statement: "MATCH (p:Person) RETURN count(p)") }"#,
    )
    .unwrap();
    let results = Translator::new(&schema, TranslatorConfig::default())
        .translate_query("{ total }", None)
        .unwrap();
    assert_eq!(
        results[0].statement,
        "UNWIND apoc.cypher.runFirstColumnSingle('MATCH (p:Person) RETURN count(p)',{}) AS total RETURN total AS total"
    );
}

#[test]
fn test_mutation_root_field() {
    let result = translate_one(r#"mutation { rename(id: "1", name: "Jo") { id } }"#).unwrap();
    assert_eq!(
        result.statement,
        "UNWIND apoc.cypher.runFirstColumnSingle('WITH $id AS id,$name AS name MATCH (p:Person {id: id}) SET p.name = name RETURN p',{id:$renameId,name:$renameName}) AS rename RETURN rename { .id } AS rename"
    );
    assert_complete(&result);
}

#[test]
fn test_object_argument_parameter_and_inline_modes() {
    let query = r#"{ byFilter(filter: {name: "Jane"}) { id } }"#;

    let parameter = translate_one(query).unwrap();
    assert!(parameter.statement.contains(",{filter:$byFilterFilter}) AS byFilter"));
    assert_eq!(
        parameter.parameters["byFilterFilter"],
        ParamValue::Map(vec![(
            "name".to_string(),
            ParamValue::String("Jane".to_string())
        )])
    );

    let inline = translate_with(
        query,
        TranslatorConfig {
            object_argument_mode: ObjectArgumentMode::Inline,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(inline.statement.contains(",{filter:{name:'Jane'}}) AS byFilter"));
    assert!(inline.parameters.is_empty());
    assert_complete(&inline);
}

#[test]
fn test_binding_errors() {
    assert!(matches!(
        translate_one("{ p3(name: $missing) { id } }"),
        Err(TranslationError::Binding(BindingError::UndeclaredVariable { .. }))
    ));
    assert!(matches!(
        translate_one("{ person { age(mult: \"many\") } }"),
        Err(TranslationError::Binding(BindingError::IncompatibleArgument { .. }))
    ));
    assert!(matches!(
        translate_one("query($m: String) { person { age(mult: $m) } }"),
        Err(TranslationError::Binding(BindingError::VariableTypeMismatch { .. }))
    ));
    assert!(matches!(
        translate_one("{ required { id } }"),
        Err(TranslationError::Binding(BindingError::MissingArgument { .. }))
    ));
}

#[test]
fn test_schema_lookup_errors() {
    assert!(matches!(
        translate_one("{ person { age(factor: 2) } }"),
        Err(TranslationError::SchemaLookup(SchemaLookupError::UnknownArgument { .. }))
    ));
    assert!(matches!(
        translate_one("{ person { shoeSize } }"),
        Err(TranslationError::SchemaLookup(SchemaLookupError::UnknownField { .. }))
    ));
}

#[test]
fn test_error_aborts_whole_operation() {
    let schema = schema();
    let translator = Translator::new(&schema, TranslatorConfig::default());
    let result = translator.translate_query("{ p2 { id } p3(name: 5) { id } }", None);
    assert!(matches!(result, Err(TranslationError::Binding(_))));
}

#[test]
fn test_missing_variable_at_bind_time() {
    let result = translate_one("query($pname: String) { p3(name: $pname) { id } }").unwrap();
    assert_eq!(
        result.bind_variables(&serde_json::Map::new()),
        Err(BindingError::MissingVariable {
            variable: "pname".to_string()
        })
    );
}
