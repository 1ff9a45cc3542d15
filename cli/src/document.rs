use eyre::WrapErr;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a YAML or JSON document, the format is picked by the file extension
pub(crate) async fn read<T: DeserializeOwned>(path: &Path) -> eyre::Result<T> {
    let text = tokio::fs::read_to_string(path)
        .await
        .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    parse(&text, is_json).wrap_err_with(|| format!("Failed to parse {}", path.display()))
}

pub(crate) fn parse<T: DeserializeOwned>(text: &str, is_json: bool) -> eyre::Result<T> {
    if is_json {
        Ok(serde_json::from_str(text)?)
    } else {
        Ok(serde_saphyr::from_str(text)?)
    }
}
