//! nlsql CLI - natural-language-to-SQL workbench over SQLite databases
//!
//! Usage:
//!   nlsql serve [--port <port>]
//!   nlsql schema <file.sqlite>
//!   nlsql prompt <file.sqlite> "<question>"
//!   nlsql ask <file.sqlite> "<question>" [--model <variant>] [--execute]
//!   nlsql score "<reference sql>" "<candidate sql>"
//!
//! Examples:
//!   nlsql serve --port 3000
//!   nlsql schema college.sqlite
//!   nlsql ask college.sqlite "list all student names" --model finetuned --execute

use clap::{Parser, Subcommand, ValueEnum};
use nlsql::config::Settings;
use nlsql::db::LoadedDatabase;
use nlsql::remote::{format_score, ModelVariant, ScoringClient, TranslationClient};
use nlsql::render::{render_rows, NULL_PLACEHOLDER};
use nlsql::schema::Table;
use nlsql::serialize_prompt;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nlsql")]
#[command(about = "nlsql - translate natural-language questions into SQL and run them")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web workbench
    Serve {
        /// Port to listen on (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the schema of a SQLite database
    Schema {
        /// Path to the .sqlite file
        file: PathBuf,
    },

    /// Print the model prompt for a database and question
    Prompt {
        /// Path to the .sqlite file
        file: PathBuf,

        /// Natural-language question
        question: String,
    },

    /// Translate a question into SQL, optionally executing it
    Ask {
        /// Path to the .sqlite file
        file: PathBuf,

        /// Natural-language question
        question: String,

        /// Model variant to query
        #[arg(short, long, default_value = "finetuned")]
        model: ModelArg,

        /// Execute the predicted SQL and print the results
        #[arg(short, long)]
        execute: bool,
    },

    /// Score a candidate SQL query against a reference
    Score {
        /// Reference SQL (ground truth)
        reference: String,

        /// Candidate SQL (prediction)
        candidate: String,
    },
}

#[derive(Clone, ValueEnum)]
enum ModelArg {
    /// Pretrained model without fine-tuning
    Base,
    /// Model fine-tuned for SQL generation
    Finetuned,
}

impl From<ModelArg> for ModelVariant {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Base => ModelVariant::Base,
            ModelArg::Finetuned => ModelVariant::Finetuned,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = Settings::load().unwrap_or_default();

    match cli.command {
        Commands::Serve { port } => cmd_serve(settings, port).await,
        Commands::Schema { file } => cmd_schema(file),
        Commands::Prompt { file, question } => cmd_prompt(file, question),
        Commands::Ask {
            file,
            question,
            model,
            execute,
        } => cmd_ask(settings, file, question, model.into(), execute).await,
        Commands::Score {
            reference,
            candidate,
        } => cmd_score(settings, reference, candidate).await,
    }
}

async fn cmd_serve(settings: Settings, port: Option<u16>) -> ExitCode {
    let port = port.unwrap_or(settings.server.port);
    match nlsql::web::serve(settings, port).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn open_database(file: &PathBuf) -> Result<LoadedDatabase, ExitCode> {
    LoadedDatabase::open(file).map_err(|e| {
        eprintln!("Error opening database '{}': {}", file.display(), e);
        ExitCode::FAILURE
    })
}

fn print_schema(tables: &[Table]) {
    for table in tables {
        println!("{}:", table.table_name);
        for column in &table.columns {
            let mut line = format!("  - {}", column.name);
            if column.is_primary_key {
                line.push_str(" [pk]");
            }
            if let Some(fk) = &column.foreign_key {
                line.push_str(&format!(
                    " -> {}.{}",
                    fk.parent_table, fk.parent_column
                ));
            }
            println!("{}", line);
        }
    }
}

fn cmd_schema(file: PathBuf) -> ExitCode {
    let db = match open_database(&file) {
        Ok(db) => db,
        Err(code) => return code,
    };

    let tables = match db.schema() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Error reading schema: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Database: {}", db.database_id());
    println!();
    print_schema(&tables);
    ExitCode::SUCCESS
}

fn cmd_prompt(file: PathBuf, question: String) -> ExitCode {
    let db = match open_database(&file) {
        Ok(db) => db,
        Err(code) => return code,
    };

    let tables = match db.schema() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Error reading schema: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", serialize_prompt(db.database_id(), &tables, &question));
    ExitCode::SUCCESS
}

async fn cmd_ask(
    settings: Settings,
    file: PathBuf,
    question: String,
    model: ModelVariant,
    execute: bool,
) -> ExitCode {
    let db = match open_database(&file) {
        Ok(db) => db,
        Err(code) => return code,
    };

    let tables = match db.schema() {
        Ok(tables) => tables,
        Err(e) => {
            eprintln!("Error reading schema: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let prompt = serialize_prompt(db.database_id(), &tables, &question);

    let client = TranslationClient::new(
        reqwest::Client::new(),
        settings.endpoints.translation_url.clone(),
        settings.endpoints.timeout(),
    );

    let sql = match client.translate(model, &prompt).await {
        Ok(sql) => sql,
        Err(e) => {
            eprintln!("Translation error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", sql);

    if !execute {
        return ExitCode::SUCCESS;
    }

    let result = match db.execute(&sql) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Execution error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let rows = render_rows(&result);
    if rows.is_empty() {
        println!();
        println!("No results found");
        return ExitCode::SUCCESS;
    }

    println!();
    println!("{}", result.columns.join(" | "));
    for row in &rows {
        let cells: Vec<&str> = result
            .columns
            .iter()
            .map(|col| {
                row.get(col)
                    .and_then(|v| v.as_str())
                    .unwrap_or(NULL_PLACEHOLDER)
            })
            .collect();
        println!("{}", cells.join(" | "));
    }
    ExitCode::SUCCESS
}

async fn cmd_score(settings: Settings, reference: String, candidate: String) -> ExitCode {
    let client = ScoringClient::new(
        reqwest::Client::new(),
        settings.endpoints.scoring_url.clone(),
        settings.endpoints.timeout(),
    );

    match client.score(&reference, &candidate).await {
        Ok(score) => {
            println!("{}", format_score(score));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Scoring error: {}", e);
            ExitCode::FAILURE
        }
    }
}
