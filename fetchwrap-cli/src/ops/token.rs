//! 本地 token 管理

use super::output::print_json;
use super::ui::{mask_secret, print_kv, print_success, print_warning};
use super::OutputFormat;
use fetchwrap_core::{FileTokenStore, TokenStore};
use serde_json::json;

pub fn get_token(store: &FileTokenStore, key: &str, output: OutputFormat) -> anyhow::Result<()> {
    let token = store.get(key);
    match output {
        OutputFormat::Json => print_json(&json!({ "key": key, "token": token }))?,
        OutputFormat::Table => match token {
            Some(token) => {
                print_kv("Key", key);
                print_kv("Token", &mask_secret(&token));
                print_kv("File", &store.path().display().to_string());
            }
            None => print_warning(&format!("no token stored under {key}")),
        },
    }
    Ok(())
}

pub fn set_token(
    store: &FileTokenStore,
    key: &str,
    token: &str,
    output: OutputFormat,
) -> anyhow::Result<()> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("token is empty");
    }
    store.set(key, token)?;
    match output {
        OutputFormat::Json => print_json(&json!({ "key": key, "stored": true }))?,
        OutputFormat::Table => {
            print_success(&format!("token stored under {key}"));
            print_kv("File", &store.path().display().to_string());
        }
    }
    Ok(())
}

pub fn clear_token(store: &FileTokenStore, key: &str, output: OutputFormat) -> anyhow::Result<()> {
    let removed = store.remove(key)?;
    match output {
        OutputFormat::Json => print_json(&json!({ "key": key, "removed": removed }))?,
        OutputFormat::Table if removed => print_success(&format!("token {key} removed")),
        OutputFormat::Table => print_warning(&format!("no token stored under {key}")),
    }
    Ok(())
}
