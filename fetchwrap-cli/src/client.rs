use fetchwrap_core::{ClientConfig, FetchClient, FileTokenStore};
use std::path::PathBuf;
use url::Url;

/// Build a fetch client reading its token from `token_file` (or the default location).
pub fn build_client(
    token_file: &Option<PathBuf>,
) -> anyhow::Result<FetchClient<FileTokenStore>> {
    let config = ClientConfig::from_env()?;
    Ok(FetchClient::with_config(token_store(token_file), config)?)
}

pub fn token_store(token_file: &Option<PathBuf>) -> FileTokenStore {
    let path = token_file
        .clone()
        .unwrap_or_else(FileTokenStore::default_path);
    FileTokenStore::new(path)
}

/// clap value parser for the endpoint argument.
pub fn parse_endpoint(s: &str) -> Result<Url, String> {
    let url = Url::parse(s).map_err(|e| format!("invalid endpoint {s}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme: {other}")),
    }
}

/// Split `Name: Value` (or `Name=Value`) into its parts.
pub fn parse_header(s: &str) -> anyhow::Result<(String, String)> {
    let (name, value) = s
        .split_once(|c: char| c == ':' || c == '=')
        .ok_or_else(|| anyhow::anyhow!("header must look like 'Name: Value': {s}"))?;
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("header name is empty: {s}");
    }
    Ok((name.to_string(), value.trim().to_string()))
}
