//! arcadex - filter game catalog databases
//!
//! Usage:
//!   arcadex parse "year >= 1980 AND name LIKE '%pac%'"
//!   arcadex criteria "Games.year = 1980 OR Categories.name = 'Maze'"
//!   arcadex where '{"rows": [{"name": "pac", "year": "1980~1985"}]}'
//!   arcadex --database mame.db query --where "Games.year = 1980" --sort name

mod config;
mod logging;

use anyhow::Context;
use arcadex_filter::{criteria_from_sql, parse, tokenize, FilterSet};
use arcadex_query::{Executor, FilterSession, QueryBuilder, Rows, SortSpec, SqliteExecutor};
use arcadex_schema::{builtin, Schema};
use clap::{Parser, Subcommand, ValueEnum};
use crate::config::Config;
use std::path::{Path, PathBuf};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "kebab_case")]
enum OutputType {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "arcadex", version, about = "Filter game catalog databases", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./arcadex.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite catalog database
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// JSON schema file
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse WHERE text and print it back in canonical form
    Parse {
        #[arg(index = 1)]
        filter: String,

        /// Print the token stream first
        #[arg(long)]
        tokens: bool,
    },
    /// Derive per-column criteria (JSON) from WHERE text
    Criteria {
        #[arg(index = 1)]
        filter: String,
    },
    /// Render criteria JSON as WHERE text
    Where {
        #[arg(index = 1)]
        criteria: String,
    },
    /// Print the SELECT statement for a view
    Sql {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Run a view against the database
    Query {
        #[command(flatten)]
        view: ViewArgs,

        #[arg(short, long, value_enum, default_value_t = OutputType::Table)]
        output: OutputType,
    },
    /// List the catalog columns
    Columns,
}

#[derive(clap::Args, Debug, Default)]
struct ViewArgs {
    /// WHERE text
    #[arg(long = "where", conflicts_with = "criteria")]
    where_text: Option<String>,

    /// Criteria JSON, `{"rows": [{"<column>": "<criterion>"}]}`
    #[arg(long)]
    criteria: Option<String>,

    /// Visible column ids
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Sort specs, `column[:asc|:desc]`
    #[arg(long, value_delimiter = ',')]
    sort: Vec<String>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database = Some(database.clone());
        }
        if let Some(schema) = &self.schema {
            config.schema = Some(schema.clone());
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Commands::Sql { view } | Commands::Query { view, .. } = &self.cmd {
            if !view.columns.is_empty() {
                config.columns = view.columns.clone();
            }
            if !view.sort.is_empty() {
                config.sort = view.sort.clone();
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;

    logging::init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.cmd {
        Commands::Parse { filter, tokens } => run_parse(&filter, tokens),
        Commands::Criteria { filter } => {
            let schema = load_schema(&config)?;
            let set = criteria_from_sql(&filter, schema.columns())
                .with_context(|| format!("Failed to parse filter '{filter}'"))?;
            println!("{}", serde_json::to_string_pretty(&set)?);
            Ok(())
        }
        Commands::Where { criteria } => {
            let schema = load_schema(&config)?;
            println!("{}", parse_criteria(&criteria)?.to_sql_where(schema.columns()));
            Ok(())
        }
        Commands::Sql { view } => run_sql(&config, &view),
        Commands::Query { view, output } => run_query(&config, &view, output),
        Commands::Columns => run_columns(&config),
    }
}

fn run_parse(filter: &str, tokens: bool) -> anyhow::Result<()> {
    if tokens {
        for token in tokenize(filter).context("Failed to tokenize filter")? {
            println!("{:?}\t{}", token.token_type, token);
        }
    }
    match parse(filter) {
        Ok(ast) => println!("{ast}"),
        Err(e) if e.is_empty_input() => {}
        Err(e) => return Err(e).context("Failed to parse filter"),
    }
    Ok(())
}

fn run_sql(config: &Config, view: &ViewArgs) -> anyhow::Result<()> {
    let schema = load_schema(config)?;
    let where_text = match (&view.where_text, &view.criteria) {
        (Some(text), _) => text.clone(),
        (None, Some(json)) => parse_criteria(json)?.to_sql_where(schema.columns()),
        (None, None) => String::new(),
    };
    let columns = if config.columns.is_empty() {
        schema.columns().filterable().map(|c| c.id.clone()).collect()
    } else {
        config.columns.clone()
    };

    let query = QueryBuilder::new(&schema)
        .with_columns(columns)
        .with_where(where_text)
        .with_sort(sort_specs(config)?)
        .build();
    println!("{}", query.sql);
    Ok(())
}

fn run_query(config: &Config, view: &ViewArgs, output: OutputType) -> anyhow::Result<()> {
    let schema = load_schema(config)?;
    let executor = open_database(config)?;

    let mut session = FilterSession::open(schema, executor)?.with_sort(sort_specs(config)?)?;
    if !config.columns.is_empty() {
        session = session.with_columns(config.columns.iter().cloned())?;
    }

    let result = match (&view.where_text, &view.criteria) {
        (Some(text), _) => session.set_where_text(text),
        (None, Some(json)) => session.set_criteria(parse_criteria(json)?),
        (None, None) => session.refresh(),
    };
    result.context("Query failed")?;

    tracing::info!(sql = ?session.query().map(|q| q.sql.as_str()), "ran query");

    match output {
        OutputType::Table => print_table(&session),
        OutputType::Json => print_json(&session)?,
    }
    Ok(())
}

fn run_columns(config: &Config) -> anyhow::Result<()> {
    let mut schema = load_schema(config)?;
    if config.database.is_some() {
        let tables = open_database(config)?.table_names()?;
        schema.retain_existing_tables(&tables);
    }

    for column in schema.columns().iter() {
        let source = column
            .source
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        let mut flags = Vec::new();
        if column.filterable {
            flags.push("filter");
        }
        if column.sortable {
            flags.push("sort");
        }
        println!("{}\t{}\t{}\t{}", column.id, column.label, source, flags.join(","));
    }
    Ok(())
}

fn print_table(session: &FilterSession<SqliteExecutor>) {
    let Some(query) = session.query() else {
        return;
    };
    let catalog = session.schema().columns();
    let descriptors: Vec<_> = query.columns.iter().filter_map(|id| catalog.get(id)).collect();

    let header: Vec<&str> = descriptors.iter().map(|c| c.label.as_str()).collect();
    println!("{}", header.join("\t"));

    for row in &session.rows().rows {
        let cells: Vec<String> = descriptors
            .iter()
            .map(|column| {
                query
                    .value_index(&column.id)
                    .and_then(|idx| row.get(idx))
                    .map(|value| value.display(&column.value_type))
                    .unwrap_or_default()
            })
            .collect();
        println!("{}", cells.join("\t"));
    }
}

fn print_json(session: &FilterSession<SqliteExecutor>) -> anyhow::Result<()> {
    let Some(query) = session.query() else {
        return Ok(());
    };
    let rows: &Rows = session.rows();
    let mut out = Vec::with_capacity(rows.len());
    for row in &rows.rows {
        let mut object = serde_json::Map::new();
        for id in &query.columns {
            if let Some(value) = query.value_index(id).and_then(|idx| row.get(idx)) {
                object.insert(id.clone(), serde_json::to_value(value)?);
            }
        }
        out.push(serde_json::Value::Object(object));
    }
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn load_schema(config: &Config) -> anyhow::Result<Schema> {
    match &config.schema {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read schema file {}", path.display()))?;
            Schema::from_json(&json)
                .with_context(|| format!("Invalid schema file {}", path.display()))
        }
        None => builtin::schema().context("Failed to load built-in schema"),
    }
}

fn open_database(config: &Config) -> anyhow::Result<SqliteExecutor> {
    let path: &Path = config
        .database
        .as_deref()
        .context("No database configured; pass --database or set `database` in arcadex.toml")?;
    SqliteExecutor::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

fn parse_criteria(json: &str) -> anyhow::Result<FilterSet> {
    serde_json::from_str(json).context("Invalid criteria JSON")
}

fn sort_specs(config: &Config) -> anyhow::Result<Vec<SortSpec>> {
    config.sort_specs().map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_view_flags_override_config() {
        let cli = Cli::try_parse_from([
            "arcadex",
            "--database",
            "mame.db",
            "query",
            "--columns",
            "name,year",
            "--sort",
            "year:desc",
            "--where",
            "Games.year > 1980",
        ])
        .unwrap();

        let mut config = Config::default();
        config.columns = vec!["manufacturer".into()];
        cli.apply_overrides(&mut config);

        assert_eq!(config.database, Some(PathBuf::from("mame.db")));
        assert_eq!(config.columns, vec!["name", "year"]);
        assert_eq!(config.sort_specs().unwrap(), vec![SortSpec::descending("year")]);
    }

    #[test]
    fn test_where_conflicts_with_criteria() {
        let result = Cli::try_parse_from([
            "arcadex",
            "sql",
            "--where",
            "Games.year = 1980",
            "--criteria",
            r#"{"rows": []}"#,
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_criteria() {
        let set = parse_criteria(r#"{"rows": [{"name": "pac"}]}"#).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.rows()[0].get("name"), Some("pac"));
        assert!(parse_criteria("[").is_err());
    }
}
