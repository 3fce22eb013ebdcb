//! Client names, loading and the capability probe.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use qcloud_adapter_braket::{AwsClientBackend, BraketClientBackend};
use qcloud_adapter_ibm::QiskitClientBackend;
use qcloud_adapter_ionq::IonQClientBackend;
use qcloud_adapter_qibo::QiboClientBackend;
use qcloud_hal::{ClientBackend, ClientConfig, ClientFactory, CredentialSource, HalError, HalResult};

/// The closed set of clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClientName {
    #[serde(rename = "qibo-client")]
    Qibo,
    #[serde(rename = "qiskit-client")]
    Qiskit,
    #[serde(rename = "braket-client")]
    Braket,
    #[serde(rename = "aws-client")]
    Aws,
    #[serde(rename = "ionq-client")]
    IonQ,
}

impl ClientName {
    /// Every client, in probe order.
    pub const ALL: [ClientName; 5] = [
        ClientName::Qibo,
        ClientName::Qiskit,
        ClientName::Braket,
        ClientName::Aws,
        ClientName::IonQ,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Qibo => "qibo-client",
            Self::Qiskit => "qiskit-client",
            Self::Braket => "braket-client",
            Self::Aws => "aws-client",
            Self::IonQ => "ionq-client",
        }
    }

    /// Whether the client needs an API token to be constructed.
    pub fn needs_token(self) -> bool {
        matches!(self, Self::Qibo | Self::IonQ)
    }

    /// Names of every client.
    pub fn supported() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientName {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| HalError::UnsupportedClient {
                name: s.to_string(),
                supported: Self::supported(),
            })
    }
}

/// Construct a client, reading credentials from the environment.
///
/// `token` overrides `config.token`.
pub async fn load(
    name: &str,
    token: Option<&str>,
    config: &ClientConfig,
) -> HalResult<Box<dyn ClientBackend>> {
    load_with(name, token, config, &CredentialSource::Environment).await
}

/// Construct a client, reading credentials from `credentials`.
pub async fn load_with(
    name: &str,
    token: Option<&str>,
    config: &ClientConfig,
    credentials: &CredentialSource,
) -> HalResult<Box<dyn ClientBackend>> {
    let client: ClientName = name.parse()?;
    let mut config = config.clone();
    if let Some(token) = token {
        config.token = Some(token.to_string());
    }
    debug!("Loading {client}");

    Ok(match client {
        ClientName::Qibo => Box::new(QiboClientBackend::from_config(&config, credentials).await?),
        ClientName::Qiskit => {
            Box::new(QiskitClientBackend::from_config(&config, credentials).await?)
        }
        ClientName::Braket => {
            Box::new(BraketClientBackend::from_config(&config, credentials).await?)
        }
        ClientName::Aws => Box::new(AwsClientBackend::from_config(&config, credentials).await?),
        ClientName::IonQ => Box::new(IonQClientBackend::from_config(&config, credentials).await?),
    })
}

/// Try to construct every client with default settings.
///
/// Construction errors only mark a client unavailable; nothing is returned
/// as an error.
pub async fn list_available(credentials: &CredentialSource) -> BTreeMap<String, bool> {
    let config = ClientConfig::new();
    let mut available = BTreeMap::new();
    for client in ClientName::ALL {
        let ok = match load_with(client.as_str(), None, &config, credentials).await {
            Ok(_) => true,
            Err(e) => {
                debug!("{client} unavailable: {e}");
                false
            }
        };
        available.insert(client.as_str().to_string(), ok);
    }
    available
}
