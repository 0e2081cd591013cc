use std::io::Read;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use graphql_cypher::config::{self, ObjectArgumentMode, TranslatorConfig};
use graphql_cypher::query_translator::Translator;
use graphql_cypher::schema_catalog::SchemaModel;
use serde_json::{json, Value};

/// gql2cypher - Translate GraphQL operations into parameterized Cypher
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GraphQL SDL file describing the schema
    #[arg(long)]
    schema: PathBuf,

    /// File holding the GraphQL document, `-` for stdin
    #[arg(long, default_value = "-")]
    query: String,

    /// Operation to translate when the document holds several
    #[arg(long)]
    operation: Option<String>,

    /// Variables as a JSON object; when given, parameters are printed bound
    #[arg(long)]
    variables: Option<String>,

    /// YAML translator configuration (defaults come from the environment otherwise)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Deepest selection-set nesting to translate
    #[arg(long)]
    max_selection_depth: Option<u32>,

    /// How input-object literal arguments reach @cypher statements (parameter|inline)
    #[arg(long)]
    object_argument_mode: Option<ObjectArgumentMode>,
}

impl Cli {
    fn cli_config(&self, base: &TranslatorConfig) -> config::CliConfig {
        config::CliConfig {
            max_selection_depth: self.max_selection_depth.unwrap_or(base.max_selection_depth),
            object_argument_mode: self
                .object_argument_mode
                .unwrap_or(base.object_argument_mode),
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<TranslatorConfig> {
    let base = match &cli.config {
        Some(path) => TranslatorConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => TranslatorConfig::from_env().context("reading configuration from environment")?,
    };
    if cli.max_selection_depth.is_none() && cli.object_argument_mode.is_none() {
        return Ok(base);
    }
    Ok(TranslatorConfig::from_cli(cli.cli_config(&base))?)
}

fn read_query(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut query = String::new();
        std::io::stdin()
            .read_to_string(&mut query)
            .context("reading query from stdin")?;
        Ok(query)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("reading query from {}", source))
    }
}

fn main() -> anyhow::Result<()> {
    // Defaults to WARN, can be overridden with RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    log::debug!("Translator configuration: {:?}", config);

    let schema = SchemaModel::from_sdl_file(&cli.schema)?;
    let query = read_query(&cli.query)?;
    let variables = match &cli.variables {
        Some(raw) => match serde_json::from_str::<Value>(raw).context("parsing --variables")? {
            Value::Object(map) => Some(map),
            _ => bail!("--variables must be a JSON object"),
        },
        None => None,
    };

    let translator = Translator::new(&schema, config);
    let results = translator.translate_query(&query, cli.operation.as_deref())?;

    for result in results {
        let output = match &variables {
            Some(variables) => json!({
                "statement": result.statement,
                "parameters": result.bind_variables(variables)?,
            }),
            None => serde_json::to_value(&result)?,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}
