//! qcloud command-line interface.
//!
//! ```text
//! qcloud run -i bell.qasm -c braket-client -s 1000
//! qcloud clients
//! qcloud translate -i bell.qasm --dialect aws --verbatim
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::run::RunSettings;
use commands::translate::Dialect;
use commands::{clients, run, translate, version};

/// qcloud - run quantum circuits on cloud providers
#[derive(Parser)]
#[command(name = "qcloud")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Credentials file (default ~/.qcloud/credentials.yaml)
    #[arg(long, env = "QCLOUD_CREDENTIALS", global = true)]
    credentials: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a circuit on a client
    Run {
        /// Input file (OpenQASM 2 or Braket OpenQASM 3)
        #[arg(short, long)]
        input: String,

        /// Client name
        #[arg(short, long, default_value = "braket-client")]
        client: String,

        /// Number of shots
        #[arg(short, long, default_value_t = qcloud::DEFAULT_SHOTS)]
        shots: u32,

        /// API token, overriding the client's variable
        #[arg(long)]
        token: Option<String>,

        /// Provider platform or device (k2, ionq_qpu, ibm_torino, ...)
        #[arg(long)]
        platform: Option<String>,

        /// Project or service instance
        #[arg(long)]
        project: Option<String>,

        /// qiskit-client provider (basic_simulator, aer_simulator, ibm-q)
        #[arg(long)]
        provider: Option<String>,

        /// Braket device ARN or name
        #[arg(long)]
        device: Option<String>,

        /// Wrap the gates in a verbatim box
        #[arg(long)]
        verbatim: bool,

        /// Optimization level (0-3)
        #[arg(long)]
        optimization_level: Option<u8>,

        /// Noise channel for aer_simulator
        #[arg(long)]
        noise_type: Option<String>,

        /// Noise strength for aer_simulator
        #[arg(long)]
        noise_level: Option<f64>,

        /// Print frequencies as JSON
        #[arg(long)]
        json: bool,
    },

    /// Probe which clients can be constructed
    Clients,

    /// Print the program a Braket client would submit
    Translate {
        /// Input file (OpenQASM 2 or Braket OpenQASM 3)
        #[arg(short, long)]
        input: String,

        /// Output dialect
        #[arg(short, long, value_enum, default_value = "braket")]
        dialect: Dialect,

        /// Wrap the gates in a verbatim box
        #[arg(long)]
        verbatim: bool,
    },

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let credentials = cli.credentials.as_deref();
    let result = match cli.command {
        Commands::Run {
            input,
            client,
            shots,
            token,
            platform,
            project,
            provider,
            device,
            verbatim,
            optimization_level,
            noise_type,
            noise_level,
            json,
        } => {
            let settings = RunSettings {
                token,
                platform,
                project,
                provider,
                device,
                verbatim,
                optimization_level,
                noise_type,
                noise_level,
                json,
                verbose: cli.verbose > 0,
            };
            run::execute(&input, &client, shots, &settings, credentials).await
        }

        Commands::Clients => clients::execute(credentials).await,

        Commands::Translate {
            input,
            dialect,
            verbatim,
        } => translate::execute(&input, dialect, verbatim),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_minimal() {
        let cli = Cli::try_parse_from(["qcloud", "run", "-i", "bell.qasm"]).unwrap();
        match cli.command {
            Commands::Run {
                input,
                client,
                shots,
                verbatim,
                ..
            } => {
                assert_eq!(input, "bell.qasm");
                assert_eq!(client, "braket-client");
                assert_eq!(shots, 1000);
                assert!(!verbatim);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_with_options() {
        let cli = Cli::try_parse_from([
            "qcloud",
            "-vv",
            "run",
            "-i",
            "ghz.qasm",
            "-c",
            "qiskit-client",
            "-s",
            "500",
            "--provider",
            "aer_simulator",
            "--noise-type",
            "depolarizing_error",
            "--noise-level",
            "0.05",
            "--optimization-level",
            "2",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run {
                client,
                shots,
                provider,
                noise_type,
                noise_level,
                optimization_level,
                ..
            } => {
                assert_eq!(client, "qiskit-client");
                assert_eq!(shots, 500);
                assert_eq!(provider.as_deref(), Some("aer_simulator"));
                assert_eq!(noise_type.as_deref(), Some("depolarizing_error"));
                assert_eq!(noise_level, Some(0.05));
                assert_eq!(optimization_level, Some(2));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_run_missing_input() {
        assert!(Cli::try_parse_from(["qcloud", "run"]).is_err());
    }

    #[test]
    fn test_parse_translate() {
        let cli = Cli::try_parse_from([
            "qcloud",
            "translate",
            "-i",
            "bell.qasm",
            "--dialect",
            "aws",
            "--verbatim",
        ])
        .unwrap();
        match cli.command {
            Commands::Translate {
                dialect, verbatim, ..
            } => {
                assert_eq!(dialect, Dialect::Aws);
                assert!(verbatim);
            }
            _ => panic!("expected translate"),
        }

        assert!(
            Cli::try_parse_from(["qcloud", "translate", "-i", "x.qasm", "--dialect", "cirq"])
                .is_err()
        );
    }

    #[test]
    fn test_parse_clients_and_version() {
        assert!(matches!(
            Cli::try_parse_from(["qcloud", "clients"]).unwrap().command,
            Commands::Clients
        ));
        assert!(matches!(
            Cli::try_parse_from(["qcloud", "version"]).unwrap().command,
            Commands::Version
        ));
    }

    #[test]
    fn test_global_credentials_flag() {
        let cli =
            Cli::try_parse_from(["qcloud", "clients", "--credentials", "/tmp/creds.yaml"]).unwrap();
        assert_eq!(cli.credentials, Some(PathBuf::from("/tmp/creds.yaml")));
    }

    #[test]
    fn test_no_subcommand() {
        assert!(Cli::try_parse_from(["qcloud"]).is_err());
    }
}
