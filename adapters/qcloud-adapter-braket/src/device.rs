//! Device selection.
//!
//! A device selector is either the local simulator, a friendly preset name,
//! or a full Braket device ARN.

use std::fmt;

use crate::error::{BraketError, BraketResult};

// ──────────────────────────────────────────────────────────────────────
// Known device ARNs
// ──────────────────────────────────────────────────────────────────────

/// Rigetti Ankaa-3 (84 qubits, superconducting).
pub const RIGETTI_ANKAA_3: &str = "arn:aws:braket:us-west-1::device/qpu/rigetti/Ankaa-3";

/// IonQ Aria (25 qubits, trapped-ion).
pub const IONQ_ARIA: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-1";

/// IonQ Aria 2 (25 qubits, trapped-ion).
pub const IONQ_ARIA_2: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Aria-2";

/// IonQ Forte (36 qubits, trapped-ion).
pub const IONQ_FORTE: &str = "arn:aws:braket:us-east-1::device/qpu/ionq/Forte-1";

/// IQM Garnet (20 qubits, superconducting).
pub const IQM_GARNET: &str = "arn:aws:braket:eu-north-1::device/qpu/iqm/Garnet";

/// SV1 state vector simulator.
pub const SV1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/sv1";

/// TN1 tensor network simulator.
pub const TN1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/tn1";

/// DM1 density matrix simulator.
pub const DM1: &str = "arn:aws:braket:::device/quantum-simulator/amazon/dm1";

const ARN_PREFIX: &str = "arn:aws:braket:";

/// Map a friendly device name to its ARN.
pub fn arn_for_name(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "rigetti" | "ankaa" | "ankaa-3" | "ankaa3" => Some(RIGETTI_ANKAA_3),
        "ionq" | "aria" | "aria-1" => Some(IONQ_ARIA),
        "aria-2" => Some(IONQ_ARIA_2),
        "forte" | "forte-1" => Some(IONQ_FORTE),
        "iqm" | "garnet" | "iqm-garnet" => Some(IQM_GARNET),
        "sv1" | "braket-sv1" => Some(SV1),
        "tn1" | "braket-tn1" => Some(TN1),
        "dm1" | "braket-dm1" => Some(DM1),
        _ => None,
    }
}

/// Qubit capacity of a known device.
pub fn qubit_capacity(device_arn: &str) -> Option<usize> {
    match device_arn {
        RIGETTI_ANKAA_3 => Some(84),
        IONQ_ARIA | IONQ_ARIA_2 => Some(25),
        IONQ_FORTE => Some(36),
        IQM_GARNET => Some(20),
        SV1 => Some(34),
        TN1 => Some(50),
        DM1 => Some(17),
        _ => None,
    }
}

/// Extract provider name from a device ARN.
pub fn provider_from_arn(device_arn: &str) -> &str {
    // arn:aws:braket:<region>::device/<type>/<provider>/<device>
    device_arn.split('/').nth(2).unwrap_or("unknown")
}

/// Which device a Braket client talks to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeviceSpec {
    /// The in-process simulator.
    #[default]
    Local,
    /// A remote device by ARN.
    Arn(String),
}

impl DeviceSpec {
    /// Parse a selector: empty, `local` or `default` select the local
    /// simulator; preset names resolve to their ARN.
    pub fn parse(selector: &str) -> BraketResult<Self> {
        let selector = selector.trim();
        match selector.to_lowercase().as_str() {
            "" | "local" | "default" => return Ok(Self::Local),
            _ => {}
        }
        if let Some(arn) = arn_for_name(selector) {
            return Ok(Self::Arn(arn.to_string()));
        }
        if selector.starts_with(ARN_PREFIX) {
            return Ok(Self::Arn(selector.to_string()));
        }
        Err(BraketError::InvalidDeviceArn(format!(
            "'{selector}' is neither 'local', a known device name nor a Braket ARN"
        )))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Arn(arn) => write!(f, "{arn}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arn_for_name() {
        assert_eq!(arn_for_name("rigetti"), Some(RIGETTI_ANKAA_3));
        assert_eq!(arn_for_name("SV1"), Some(SV1));
        assert_eq!(arn_for_name("ionq"), Some(IONQ_ARIA));
        assert!(arn_for_name("nonexistent").is_none());
    }

    #[test]
    fn test_provider_from_arn() {
        assert_eq!(provider_from_arn(RIGETTI_ANKAA_3), "rigetti");
        assert_eq!(provider_from_arn(IQM_GARNET), "iqm");
        assert_eq!(provider_from_arn(DM1), "amazon");
    }

    #[test]
    fn test_capacity() {
        assert_eq!(qubit_capacity(SV1), Some(34));
        assert_eq!(qubit_capacity("arn:aws:braket:::device/qpu/acme/x"), None);
    }

    #[test]
    fn test_device_spec_parse() {
        assert_eq!(DeviceSpec::parse("").unwrap(), DeviceSpec::Local);
        assert_eq!(DeviceSpec::parse("Local").unwrap(), DeviceSpec::Local);
        assert_eq!(DeviceSpec::parse("dm1").unwrap(), DeviceSpec::Arn(DM1.into()));

        let custom = "arn:aws:braket:us-west-2::device/qpu/acme/Prototype";
        assert_eq!(
            DeviceSpec::parse(custom).unwrap(),
            DeviceSpec::Arn(custom.into())
        );
        assert!(matches!(
            DeviceSpec::parse("my-laptop"),
            Err(BraketError::InvalidDeviceArn(_))
        ));
    }
}
