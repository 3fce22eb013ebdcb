//! Single-qubit noise channels for trajectory simulation.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use qcloud_ir::GateKind;

use crate::error::{SimError, SimResult};
use crate::gates;

/// Channel names accepted by [`NoiseChannel::from_name`]. A trailing
/// `_error` suffix is also accepted (`depolarizing_error`).
pub const NOISE_TYPES: &[&str] = &[
    "depolarizing",
    "amplitude_damping",
    "phase_damping",
    "bit_flip",
    "phase_flip",
];

const COMPLETENESS_TOL: f64 = 1e-8;

/// A single-qubit quantum channel.
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseChannel {
    /// Applies X, Y or Z each with probability `p/4`.
    Depolarizing(f64),
    /// Energy relaxation towards |0⟩ with rate `γ`.
    AmplitudeDamping(f64),
    /// Dephasing with rate `γ`.
    PhaseDamping(f64),
    /// X with probability `p`.
    BitFlip(f64),
    /// Z with probability `p`.
    PhaseFlip(f64),
    /// Explicit Kraus operators.
    Kraus(Vec<Array2<Complex64>>),
}

impl NoiseChannel {
    /// Look a named channel up and attach its level.
    pub fn from_name(name: &str, level: f64) -> SimResult<Self> {
        if !(0.0..=1.0).contains(&level) {
            return Err(SimError::NoiseLevelOutOfRange);
        }
        let base = name.strip_suffix("_error").unwrap_or(name);
        match base {
            "depolarizing" => Ok(Self::Depolarizing(level)),
            "amplitude_damping" => Ok(Self::AmplitudeDamping(level)),
            "phase_damping" => Ok(Self::PhaseDamping(level)),
            "bit_flip" => Ok(Self::BitFlip(level)),
            "phase_flip" => Ok(Self::PhaseFlip(level)),
            _ => Err(SimError::UnknownNoiseType(name.to_string())),
        }
    }

    /// The channel's Kraus operators.
    pub fn kraus_operators(&self) -> Vec<Array2<Complex64>> {
        let re = |x: f64| Complex64::new(x, 0.0);
        let scaled = |m: Array2<Complex64>, k: f64| m.mapv(|z| z * k);
        match self {
            Self::Depolarizing(p) => {
                let id = (1.0 - 3.0 * p / 4.0).sqrt();
                let pauli = (p / 4.0).sqrt();
                vec![
                    scaled(Array2::eye(2), id),
                    scaled(gates::pauli_x(), pauli),
                    scaled(gates::pauli_y(), pauli),
                    scaled(gates::pauli_z(), pauli),
                ]
            }
            Self::AmplitudeDamping(gamma) => {
                let mut k1 = Array2::zeros((2, 2));
                k1[[0, 1]] = re(gamma.sqrt());
                vec![gates::diagonal(&[re(1.0), re((1.0 - gamma).sqrt())]), k1]
            }
            Self::PhaseDamping(gamma) => vec![
                gates::diagonal(&[re(1.0), re((1.0 - gamma).sqrt())]),
                gates::diagonal(&[re(0.0), re(gamma.sqrt())]),
            ],
            Self::BitFlip(p) => vec![
                scaled(Array2::eye(2), (1.0 - p).sqrt()),
                scaled(gates::pauli_x(), p.sqrt()),
            ],
            Self::PhaseFlip(p) => vec![
                scaled(Array2::eye(2), (1.0 - p).sqrt()),
                scaled(gates::pauli_z(), p.sqrt()),
            ],
            Self::Kraus(ops) => ops.clone(),
        }
    }
}

/// Noise attached to every 1-qubit gate of the kinds in
/// [`NoiseModel::applies_to`].
#[derive(Debug, Clone)]
pub struct NoiseModel {
    channel: NoiseChannel,
    operators: Vec<Array2<Complex64>>,
}

impl NoiseModel {
    /// Build a model, checking that the operators are 2x2 and complete.
    pub fn new(channel: NoiseChannel) -> SimResult<Self> {
        let operators = channel.kraus_operators();
        validate_kraus(&operators)?;
        debug!("Noise model: {} ({} Kraus operators)", channel_label(&channel), operators.len());
        Ok(Self { channel, operators })
    }

    /// Build a model from a named channel or explicit operators.
    ///
    /// Exactly one of `noise_type` and `kraus` must be set; a named channel
    /// needs a level in `[0, 1]`.
    pub fn from_settings(
        noise_type: Option<&str>,
        noise_level: Option<f64>,
        kraus: Option<Vec<Array2<Complex64>>>,
    ) -> SimResult<Self> {
        match (noise_type, kraus) {
            (Some(name), None) => {
                let level = noise_level.ok_or(SimError::MissingNoiseLevel)?;
                Self::new(NoiseChannel::from_name(name, level)?)
            }
            (None, Some(operators)) => Self::new(NoiseChannel::Kraus(operators)),
            _ => Err(SimError::NoiseSource),
        }
    }

    pub fn channel(&self) -> &NoiseChannel {
        &self.channel
    }

    pub fn kraus_operators(&self) -> &[Array2<Complex64>] {
        &self.operators
    }

    /// Gates followed by the channel: `h`, `id`, `x`, `y`, `z`, `rx`,
    /// `ry`, `rz` and `u3`.
    pub fn applies_to(kind: &GateKind) -> bool {
        matches!(
            kind,
            GateKind::H
                | GateKind::I
                | GateKind::X
                | GateKind::Y
                | GateKind::Z
                | GateKind::Rx(_)
                | GateKind::Ry(_)
                | GateKind::Rz(_)
                | GateKind::U3(..)
        )
    }
}

fn channel_label(channel: &NoiseChannel) -> &'static str {
    match channel {
        NoiseChannel::Depolarizing(_) => "depolarizing",
        NoiseChannel::AmplitudeDamping(_) => "amplitude_damping",
        NoiseChannel::PhaseDamping(_) => "phase_damping",
        NoiseChannel::BitFlip(_) => "bit_flip",
        NoiseChannel::PhaseFlip(_) => "phase_flip",
        NoiseChannel::Kraus(_) => "kraus",
    }
}

fn validate_kraus(operators: &[Array2<Complex64>]) -> SimResult<()> {
    if operators.is_empty() {
        return Err(SimError::InvalidKraus("no operators given".into()));
    }
    if let Some(bad) = operators.iter().find(|k| k.dim() != (2, 2)) {
        return Err(SimError::InvalidKraus(format!(
            "expected 2x2 operators, got {}x{}",
            bad.nrows(),
            bad.ncols()
        )));
    }
    let mut sum = Array2::<Complex64>::zeros((2, 2));
    for k in operators {
        sum = sum + k.t().mapv(|z| z.conj()).dot(k);
    }
    let identity = Array2::<Complex64>::eye(2);
    if sum
        .iter()
        .zip(identity.iter())
        .any(|(a, b)| (a - b).norm() > COMPLETENESS_TOL)
    {
        return Err(SimError::InvalidKraus(
            "operators do not satisfy sum(K^dagger K) = I".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_channels_are_complete() {
        for name in NOISE_TYPES {
            for level in [0.0, 0.25, 1.0] {
                let model = NoiseModel::from_settings(Some(*name), Some(level), None).unwrap();
                assert!(!model.kraus_operators().is_empty());
            }
        }
    }

    #[test]
    fn test_error_suffix_accepted() {
        let model = NoiseModel::from_settings(Some("depolarizing_error"), Some(0.1), None).unwrap();
        assert_eq!(model.channel(), &NoiseChannel::Depolarizing(0.1));
    }

    #[test]
    fn test_settings_validation_messages() {
        let err = NoiseModel::from_settings(None, Some(0.1), None).unwrap_err();
        assert_eq!(err.to_string(), "Need to specify noise type / Kraus operators.");

        let kraus = NoiseChannel::BitFlip(0.1).kraus_operators();
        let err = NoiseModel::from_settings(Some("bit_flip"), Some(0.1), Some(kraus)).unwrap_err();
        assert_eq!(err.to_string(), "Need to specify noise type / Kraus operators.");

        let err = NoiseModel::from_settings(Some("bit_flip"), None, None).unwrap_err();
        assert_eq!(err.to_string(), "Need to specify noise level.");

        let err = NoiseModel::from_settings(Some("bit_flip"), Some(1.5), None).unwrap_err();
        assert_eq!(err.to_string(), "Noise level needs to be between 0 and 1.");

        let err = NoiseModel::from_settings(Some("bit_flip"), Some(-0.1), None).unwrap_err();
        assert_eq!(err.to_string(), "Noise level needs to be between 0 and 1.");

        assert!(matches!(
            NoiseModel::from_settings(Some("thermal"), Some(0.1), None),
            Err(SimError::UnknownNoiseType(_))
        ));
    }

    #[test]
    fn test_explicit_kraus_checked() {
        let ops = NoiseChannel::AmplitudeDamping(0.2).kraus_operators();
        assert!(NoiseModel::from_settings(None, None, Some(ops.clone())).is_ok());

        let incomplete = vec![ops[0].clone()];
        assert!(matches!(
            NoiseModel::from_settings(None, None, Some(incomplete)),
            Err(SimError::InvalidKraus(_))
        ));

        let wrong_shape = vec![Array2::<Complex64>::eye(4)];
        assert!(matches!(
            NoiseModel::from_settings(None, None, Some(wrong_shape)),
            Err(SimError::InvalidKraus(_))
        ));
    }

    #[test]
    fn test_noisy_gate_set() {
        assert!(NoiseModel::applies_to(&GateKind::H));
        assert!(NoiseModel::applies_to(&GateKind::U3(0.1, 0.2, 0.3)));
        assert!(!NoiseModel::applies_to(&GateKind::S));
        assert!(!NoiseModel::applies_to(&GateKind::CNOT));
    }
}
