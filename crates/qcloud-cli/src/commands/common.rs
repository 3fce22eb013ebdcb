//! Shared helpers for CLI commands.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use tracing::debug;

use qcloud::{Circuit, CredentialSource, MeasurementOutcome};

/// Load a circuit from an OpenQASM file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    let path_obj = Path::new(path);
    if !path_obj.exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;
    parse_circuit(&source)
}

/// Parse OpenQASM 2 or Braket OpenQASM 3 source.
pub fn parse_circuit(source: &str) -> Result<Circuit> {
    qcloud_qasm::parse(source).map_err(|e| anyhow::anyhow!("Parse error: {e}"))
}

/// `~/.qcloud/credentials.yaml`.
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".qcloud").join("credentials.yaml"))
}

/// Read a credentials file: a flat map from variable name to value.
pub fn read_credentials_file(path: &Path) -> Result<BTreeMap<String, String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read credentials: {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_yaml_ng::from_str(&text)
        .with_context(|| format!("Invalid credentials file: {}", path.display()))
}

/// Merge file entries under the process environment.
///
/// Non-empty environment variables win over the file.
pub fn merge_credentials(
    file: BTreeMap<String, String>,
    environment: impl IntoIterator<Item = (String, String)>,
) -> CredentialSource {
    let mut entries = file;
    for (key, value) in environment {
        if !value.is_empty() {
            entries.insert(key, value);
        }
    }
    CredentialSource::injected(entries)
}

/// Resolve where credentials come from.
///
/// An explicit path must exist. Without one the default file is used when
/// present, otherwise the environment alone.
pub fn credential_source(explicit: Option<&Path>) -> Result<CredentialSource> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Credentials file not found: {}", path.display());
            }
            path.to_path_buf()
        }
        None => match default_credentials_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(CredentialSource::Environment),
        },
    };
    debug!("Reading credentials from {}", path.display());
    let file = read_credentials_file(&path)?;
    Ok(merge_credentials(file, std::env::vars()))
}

/// Print frequencies as a table with bars.
pub fn print_outcome(outcome: &MeasurementOutcome) {
    let counts = outcome.frequencies();
    let total = f64::from(outcome.nshots().max(1));

    println!(
        "\n{} Results ({} shots):",
        style("✓").green().bold(),
        outcome.nshots()
    );

    let mut sorted: Vec<(&String, &u64)> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    for (bitstring, count) in sorted.iter().take(16) {
        let prob = **count as f64 / total * 100.0;
        let bar: String = "█".repeat((prob / 2.0).round() as usize);
        println!(
            "  {}: {:>6} ({:>5.2}%) {}",
            style(bitstring).cyan(),
            count,
            prob,
            style(bar).green()
        );
    }

    if sorted.len() > 16 {
        println!("  ... and {} more outcomes", sorted.len() - 16);
    }
}
