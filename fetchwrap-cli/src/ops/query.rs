//! 执行 GraphQL 操作

use super::output::print_json;
use super::ui::{format_status, print_block, print_error, print_header, print_kv, print_section};
use super::OutputFormat;
use crate::client::parse_header;
use fetchwrap_core::{FetchClient, FetchError, FetchOptions, GraphQLRequest, TokenStore};
use serde_json::Value;
use std::path::Path;

/// Inputs for one operation, as given on the command line.
#[derive(Debug, Clone)]
pub struct QueryInput {
    /// Query text, or `@path` to read it from a file.
    pub query: String,
    pub variables: Option<String>,
    pub operation: Option<String>,
    pub headers: Vec<String>,
}

fn load_query(query: &str) -> anyhow::Result<String> {
    match query.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(Path::new(path))
            .map_err(|e| anyhow::anyhow!("failed to read query file {path}: {e}")),
        None => Ok(query.to_string()),
    }
}

/// Build the request options for `input`.
pub fn build_options(input: &QueryInput) -> anyhow::Result<FetchOptions> {
    let mut request = GraphQLRequest::new(load_query(&input.query)?);
    if let Some(name) = &input.operation {
        request = request.with_operation_name(name.clone());
    }
    let mut options = match &input.variables {
        Some(raw) => {
            let variables: Value = serde_json::from_str(raw)
                .map_err(|e| anyhow::anyhow!("--variables is not valid json: {e}"))?;
            FetchOptions::post().json(&request.with_variables(variables))?
        }
        None => FetchOptions::post().json(&request)?,
    };
    for raw in &input.headers {
        let (name, value) = parse_header(raw)?;
        options = options.header(&name, &value)?;
    }
    Ok(options)
}

/// Run one operation against `endpoint` and print the response.
pub async fn run_query<S: TokenStore>(
    client: &FetchClient<S>,
    endpoint: &str,
    input: QueryInput,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let options = build_options(&input)?;
    tracing::debug!(endpoint, operation = ?input.operation, "sending operation");
    let resp = match client.fetch(endpoint, options).await {
        Ok(resp) => resp,
        Err(FetchError::GraphQL(err)) => {
            match output {
                OutputFormat::Json => print_json(&err)?,
                OutputFormat::Table => {
                    print_error("request returned errors");
                    print_kv("Message", &err.message);
                    print_kv("Status Code", &err.status_code.to_string());
                }
            }
            anyhow::bail!("{err}");
        }
        Err(e) => return Err(e.into()),
    };

    let body: Value = resp.json()?;
    match output {
        OutputFormat::Json => print_json(&body)?,
        OutputFormat::Table => {
            let status = resp.status();
            print_header("GraphQL");
            print_kv("Endpoint", resp.url().as_str());
            print_kv(
                "Status",
                &format_status(status.as_u16(), status.canonical_reason().unwrap_or("")),
            );
            print_section("Data");
            print_block(&serde_json::to_string_pretty(&body["data"])?);
        }
    }
    Ok(())
}
