//! Run command implementation.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qcloud::{ClientConfig, ExecuteOptions};

use super::common::{credential_source, load_circuit, print_outcome};

/// Settings collected from the command line.
#[derive(Debug, Default)]
pub struct RunSettings {
    pub token: Option<String>,
    pub platform: Option<String>,
    pub project: Option<String>,
    pub provider: Option<String>,
    pub device: Option<String>,
    pub verbatim: bool,
    pub optimization_level: Option<u8>,
    pub noise_type: Option<String>,
    pub noise_level: Option<f64>,
    pub json: bool,
    pub verbose: bool,
}

impl RunSettings {
    /// The client configuration these settings describe.
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new()
            .with_verbatim(self.verbatim)
            .with_verbose(self.verbose);
        if let Some(platform) = &self.platform {
            config = config.with_platform(platform);
        }
        if let Some(project) = &self.project {
            config = config.with_project(project);
        }
        if let Some(provider) = &self.provider {
            config = config.with_provider(provider);
        }
        if let Some(device) = &self.device {
            config = config.with_device(device);
        }
        if let Some(level) = self.optimization_level {
            config = config.with_optimization_level(level);
        }
        config.noise_type = self.noise_type.clone();
        config.noise_level = self.noise_level;
        config
    }
}

/// Execute the run command.
pub async fn execute(
    input: &str,
    client: &str,
    shots: u32,
    settings: &RunSettings,
    credentials: Option<&Path>,
) -> Result<()> {
    if !settings.json {
        println!(
            "{} Running {} on {} ({} shots)",
            style("→").cyan().bold(),
            style(input).green(),
            style(client).yellow(),
            shots
        );
    }

    let circuit = load_circuit(input)?;
    if !settings.json {
        println!(
            "  Loaded: {} qubits, {} gates",
            circuit.num_qubits(),
            circuit.gate_count()
        );
    }

    let source = credential_source(credentials)?;
    let backend = qcloud::load_with(
        client,
        settings.token.as_deref(),
        &settings.client_config(),
        &source,
    )
    .await?;

    let spinner = if settings.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Running on {}...", backend.name()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = backend
        .execute(&circuit, shots, &ExecuteOptions::new())
        .await;
    spinner.finish_and_clear();
    let outcome = result?;

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&outcome.frequencies())?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}
