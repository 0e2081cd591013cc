use std::io::Write;

use graphql_cypher::config::{ObjectArgumentMode, TranslatorConfig};
use graphql_cypher::query_translator::{TranslationError, Translator};
use graphql_cypher::schema_catalog::{SchemaCatalogError, SchemaModel};
use tempfile::NamedTempFile;

const SOCIAL_SCHEMA: &str = r#"
"A person in the social graph"
type Person {
  id: ID!
  name: String
  friends(first: Int, offset: Int): [Person] @relation(name: "KNOWS", direction: BOTH)
  city: City @relation(name: "LIVES_IN", direction: OUT)
  friendCount: Int @cypher(statement: "MATCH (this)-[:KNOWS]-(f) RETURN count(f)")
}

type City {
  name: String
  residents: [Person] @relation(name: "LIVES_IN", direction: IN)
}

schema {
  query: Root
}

type Root {
  person(name: String, first: Int): Person
}
"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", contents).unwrap();
    file
}

#[test]
fn test_schema_loaded_from_file() {
    let file = write_temp(SOCIAL_SCHEMA);
    let schema = SchemaModel::from_sdl_file(file.path()).unwrap();
    let translator = Translator::new(&schema, TranslatorConfig::default());

    let results = translator
        .translate_query(
            r#"{ person(name: "Jane", first: 1) { name city { name } friends(first: 3) { id friendCount } } }"#,
            None,
        )
        .unwrap();
    assert_eq!(
        results[0].statement,
        "MATCH (person:Person) WHERE person.name = $personName RETURN person { .name, city:head([(person)-[:LIVES_IN]->(personCity:City) | personCity { .name }]), friends:[(person)-[:KNOWS]-(personFriends:Person) | personFriends { .id, friendCount:apoc.cypher.runFirstColumnSingle('WITH $this AS this MATCH (this)-[:KNOWS]-(f) RETURN count(f)',{this:personFriends}) }][..$personFriendsFirst] } AS person LIMIT $personFirst"
    );
    assert_eq!(results[0].parameters.len(), 3);
}

#[test]
fn test_missing_schema_file() {
    let err = SchemaModel::from_sdl_file("/nonexistent/schema.graphql").unwrap_err();
    assert!(matches!(err, SchemaCatalogError::SchemaReadError { .. }));
}

#[test]
fn test_invalid_schema_file() {
    let file = write_temp("type Person { id: ID @cypher(query: \"RETURN 1\") }");
    let err = SchemaModel::from_sdl_file(file.path()).unwrap_err();
    assert!(matches!(err, SchemaCatalogError::InvalidDirective { .. }));
}

#[test]
fn test_config_file_limits_depth() {
    let config_file = write_temp("max_selection_depth: 2\nobject_argument_mode: inline\n");
    let config = TranslatorConfig::from_yaml_file(config_file.path()).unwrap();
    assert_eq!(config.object_argument_mode, ObjectArgumentMode::Inline);

    let schema = SchemaModel::from_sdl(SOCIAL_SCHEMA).unwrap();
    let translator = Translator::new(&schema, config);
    assert!(translator
        .translate_query("{ person { friends { id } } }", None)
        .is_ok());
    assert_eq!(
        translator.translate_query("{ person { friends { city { name } } } }", None),
        Err(TranslationError::SelectionTooDeep { depth: 3, limit: 2 })
    );
}
