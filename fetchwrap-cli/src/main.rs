mod client;
mod ops;

use clap::{Parser, Subcommand};
use ops::{clear_token, get_token, run_query, set_token, OutputFormat, QueryInput};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// CLI for authenticated GraphQL requests.
#[derive(Parser)]
#[command(
    name = "fetchwrap",
    author,
    version,
    about = "Send GraphQL operations with a stored bearer token"
)]
struct Cli {
    /// GraphQL endpoint url
    #[arg(
        long,
        env = "FETCHWRAP_ENDPOINT",
        default_value = "http://127.0.0.1:4000/graphql",
        value_parser = client::parse_endpoint
    )]
    endpoint: Url,

    /// Token file (defaults to the user config directory)
    #[arg(long, env = "FETCHWRAP_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query or mutation
    Query {
        /// Query text, or @file to read it from disk
        query: String,
        /// Variables as a JSON object
        #[arg(long, short)]
        variables: Option<String>,
        /// Operation name
        #[arg(long)]
        operation: Option<String>,
        /// Extra request header, "Name: Value" (repeatable)
        #[arg(long = "header", short = 'H')]
        headers: Vec<String>,
    },
    /// Manage the stored access token
    #[command(subcommand)]
    Token(TokenCommands),
}

#[derive(Subcommand)]
enum TokenCommands {
    /// Show the stored token
    Get,
    /// Store a token
    Set { token: String },
    /// Remove the stored token
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载 .env 文件（如果存在），忽略错误
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            query,
            variables,
            operation,
            headers,
        } => {
            let client = client::build_client(&cli.token_file)?;
            let input = QueryInput {
                query,
                variables,
                operation,
                headers,
            };
            run_query(&client, cli.endpoint.as_str(), input, cli.output).await?
        }
        Commands::Token(token_cmd) => {
            let store = client::token_store(&cli.token_file);
            let key = fetchwrap_core::ClientConfig::from_env()?.token_key;
            match token_cmd {
                TokenCommands::Get => get_token(&store, &key, cli.output)?,
                TokenCommands::Set { token } => set_token(&store, &key, &token, cli.output)?,
                TokenCommands::Clear => clear_token(&store, &key, cli.output)?,
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
