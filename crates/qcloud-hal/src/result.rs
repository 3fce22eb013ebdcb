//! Measurement outcomes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use qcloud_ir::{MeasurementRegister, QubitId};

use crate::error::{HalError, HalResult};

/// Widest marginal [`MeasurementOutcome::probabilities`] will build.
pub const MAX_MARGINAL_QUBITS: usize = 24;

/// Bitstring → occurrence count.
pub type Counts = BTreeMap<String, u64>;

/// Per-shot samples of the measured qubits.
///
/// Row `s`, column `i` holds the bit observed on the `i`-th measured qubit
/// (registers in declaration order, qubits in register order) in shot `s`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementOutcome {
    registers: Vec<MeasurementRegister>,
    samples: Vec<Vec<u8>>,
    nshots: u32,
}

impl MeasurementOutcome {
    /// Build an outcome; every row must have one `0`/`1` entry per measured
    /// qubit.
    pub fn new(
        registers: Vec<MeasurementRegister>,
        samples: Vec<Vec<u8>>,
        nshots: u32,
    ) -> HalResult<Self> {
        let width: usize = registers.iter().map(|r| r.qubits().len()).sum();
        for (shot, row) in samples.iter().enumerate() {
            if row.len() != width {
                return Err(HalError::Backend(format!(
                    "shot {shot} has {} columns, expected {width}",
                    row.len()
                )));
            }
            if row.iter().any(|b| *b > 1) {
                return Err(HalError::Backend(format!("shot {shot} contains a non-binary value")));
            }
        }
        Ok(Self {
            registers,
            samples,
            nshots,
        })
    }

    /// Build an outcome from a count map whose keys list column 0 as the
    /// rightmost character, as IBM and IonQ report them.
    pub fn from_counts(
        registers: Vec<MeasurementRegister>,
        counts: &Counts,
        nshots: u32,
    ) -> HalResult<Self> {
        let samples = samples_from_counts(counts)?;
        Self::new(registers, samples, nshots)
    }

    /// Measurement registers in declaration order.
    pub fn registers(&self) -> &[MeasurementRegister] {
        &self.registers
    }

    /// The raw sample rows.
    pub fn samples(&self) -> &[Vec<u8>] {
        &self.samples
    }

    /// Number of shots requested.
    pub fn nshots(&self) -> u32 {
        self.nshots
    }

    /// Measured qubits in column order.
    pub fn measured_qubits(&self) -> Vec<QubitId> {
        self.registers
            .iter()
            .flat_map(|r| r.qubits().iter().copied())
            .collect()
    }

    /// Count of each row, written column 0 first.
    pub fn frequencies(&self) -> Counts {
        let mut counts = Counts::new();
        for row in &self.samples {
            *counts.entry(bitstring(row)).or_insert(0) += 1;
        }
        counts
    }

    /// Frequencies restricted to one register's columns.
    pub fn register_frequencies(&self, name: &str) -> HalResult<Counts> {
        let mut offset = 0;
        for register in &self.registers {
            let width = register.qubits().len();
            if register.name() == name {
                let mut counts = Counts::new();
                for row in &self.samples {
                    *counts
                        .entry(bitstring(&row[offset..offset + width]))
                        .or_insert(0) += 1;
                }
                return Ok(counts);
            }
            offset += width;
        }
        Err(HalError::InvalidCircuit(format!("no measurement register named '{name}'")))
    }

    /// Marginal distribution over `qubits` (every measured qubit when
    /// `None`). Index `k` encodes the listed qubits big-endian: the first
    /// listed qubit is the most significant bit.
    ///
    /// The vector is dense, so at most [`MAX_MARGINAL_QUBITS`] qubits can be
    /// selected; use [`Self::frequencies`] for wider outcomes.
    pub fn probabilities(&self, qubits: Option<&[QubitId]>) -> HalResult<Vec<f64>> {
        let measured = self.measured_qubits();
        let selected = qubits.map_or_else(|| measured.clone(), <[QubitId]>::to_vec);
        let columns = selected
            .iter()
            .map(|q| {
                measured
                    .iter()
                    .position(|m| m == q)
                    .ok_or(HalError::QubitNotMeasured(*q))
            })
            .collect::<HalResult<Vec<usize>>>()?;
        if columns.len() > MAX_MARGINAL_QUBITS {
            return Err(HalError::Unsupported(format!(
                "marginal over {} qubits exceeds the {MAX_MARGINAL_QUBITS}-qubit limit",
                columns.len()
            )));
        }

        let mut probabilities = vec![0.0; 1 << columns.len()];
        if self.samples.is_empty() {
            return Ok(probabilities);
        }
        for row in &self.samples {
            let index = columns
                .iter()
                .fold(0usize, |acc, &c| (acc << 1) | usize::from(row[c]));
            probabilities[index] += 1.0;
        }
        let total = self.samples.len() as f64;
        for p in &mut probabilities {
            *p /= total;
        }
        Ok(probabilities)
    }
}

fn bitstring(row: &[u8]) -> String {
    row.iter().map(|b| if *b == 0 { '0' } else { '1' }).collect()
}

/// Expand a count map into sample rows.
///
/// Each key is reversed so that its rightmost character becomes column 0,
/// then repeated `count` times. Rows come out grouped by key in key order.
pub fn samples_from_counts(counts: &Counts) -> HalResult<Vec<Vec<u8>>> {
    let mut samples = Vec::with_capacity(counts.values().sum::<u64>() as usize);
    for (key, count) in counts {
        let row = key
            .chars()
            .rev()
            .map(|c| match c {
                '0' => Ok(0),
                '1' => Ok(1),
                other => Err(HalError::Backend(format!(
                    "unexpected character '{other}' in bitstring '{key}'"
                ))),
            })
            .collect::<HalResult<Vec<u8>>>()?;
        for _ in 0..*count {
            samples.push(row.clone());
        }
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcloud_ir::Circuit;

    fn registers(circuit: &Circuit) -> Vec<MeasurementRegister> {
        circuit.measurements().cloned().collect()
    }

    #[test]
    fn test_frequencies_follow_declaration_order() {
        let mut circuit = Circuit::new(3);
        circuit.measure([QubitId(2), QubitId(0)]).unwrap();

        let outcome = MeasurementOutcome::new(
            registers(&circuit),
            vec![vec![1, 0], vec![1, 0], vec![0, 0]],
            3,
        )
        .unwrap();

        let counts = outcome.frequencies();
        assert_eq!(counts.get("10"), Some(&2));
        assert_eq!(counts.get("00"), Some(&1));
    }

    #[test]
    fn test_probabilities_big_endian() {
        let mut circuit = Circuit::new(2);
        circuit.measure_all().unwrap();
        let outcome = MeasurementOutcome::new(
            registers(&circuit),
            vec![vec![1, 0], vec![1, 0], vec![1, 1], vec![0, 0]],
            4,
        )
        .unwrap();

        let all = outcome.probabilities(None).unwrap();
        assert_eq!(all, vec![0.25, 0.0, 0.5, 0.25]);

        let reversed = outcome
            .probabilities(Some(&[QubitId(1), QubitId(0)]))
            .unwrap();
        assert_eq!(reversed, vec![0.25, 0.5, 0.0, 0.25]);

        let q0 = outcome.probabilities(Some(&[QubitId(0)])).unwrap();
        assert_eq!(q0, vec![0.25, 0.75]);
    }

    #[test]
    fn test_probabilities_unmeasured_qubit() {
        let mut circuit = Circuit::new(2);
        circuit.measure([QubitId(0)]).unwrap();
        let outcome = MeasurementOutcome::new(registers(&circuit), vec![vec![0]], 1).unwrap();
        assert!(matches!(
            outcome.probabilities(Some(&[QubitId(1)])),
            Err(HalError::QubitNotMeasured(QubitId(1)))
        ));
    }

    #[test]
    fn test_row_width_checked() {
        let mut circuit = Circuit::new(2);
        circuit.measure_all().unwrap();
        assert!(MeasurementOutcome::new(registers(&circuit), vec![vec![0]], 1).is_err());
        assert!(MeasurementOutcome::new(registers(&circuit), vec![vec![0, 2]], 1).is_err());
    }

    #[test]
    fn test_samples_from_counts_reverses_keys() {
        let counts = Counts::from([("01".to_string(), 2), ("10".to_string(), 1)]);
        let samples = samples_from_counts(&counts).unwrap();
        assert_eq!(samples, vec![vec![1, 0], vec![1, 0], vec![0, 1]]);
    }

    #[test]
    fn test_register_frequencies() {
        let mut circuit = Circuit::new(3);
        circuit.measure([QubitId(0)]).unwrap();
        circuit.measure_into("tail", [QubitId(1), QubitId(2)]).unwrap();
        let outcome = MeasurementOutcome::new(
            registers(&circuit),
            vec![vec![1, 0, 1], vec![0, 0, 1]],
            2,
        )
        .unwrap();

        let tail = outcome.register_frequencies("tail").unwrap();
        assert_eq!(tail.get("01"), Some(&2));
        assert!(outcome.register_frequencies("missing").is_err());
    }

    #[test]
    fn test_wide_outcome_marginals() {
        let mut circuit = Circuit::new(64);
        circuit.measure_all().unwrap();
        let outcome =
            MeasurementOutcome::new(registers(&circuit), vec![vec![0; 64]; 4], 4).unwrap();

        assert!(matches!(
            outcome.probabilities(None),
            Err(HalError::Unsupported(_))
        ));
        assert_eq!(outcome.probabilities(Some(&[QubitId(63)])).unwrap(), vec![1.0, 0.0]);
        assert_eq!(outcome.frequencies().get(&"0".repeat(64)), Some(&4));
    }
}
