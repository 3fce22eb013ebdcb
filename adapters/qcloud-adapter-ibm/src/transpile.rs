//! Transpilation settings.
//!
//! Local providers cannot rewrite circuits, so the settings are checked
//! against the circuit instead: every gate must be native and every
//! multi-qubit gate must sit on coupled qubits. The remote provider forwards
//! them to the runtime.

use serde::Serialize;
use serde_json::{Map, Value, json};

use qcloud_ir::Circuit;

use crate::coupling::CouplingMap;
use crate::error::{IbmError, IbmResult};

/// Optimisation level used when none is configured.
pub const DEFAULT_OPTIMIZATION_LEVEL: u8 = 1;

/// Reject levels outside `0..=3`.
pub fn validate_optimization_level(level: u8) -> IbmResult<u8> {
    if level > 3 {
        return Err(IbmError::InvalidOptimizationLevel(level));
    }
    Ok(level)
}

/// Native gate set, connectivity and optimisation level.
#[derive(Debug, Clone, Serialize)]
pub struct TranspileOptions {
    pub native_gates: Vec<String>,
    pub coupling_map: Option<CouplingMap>,
    pub optimization_level: u8,
}

impl TranspileOptions {
    /// Validate a full set of options.
    ///
    /// A requested custom connectivity needs a `qubit_map`, and a non-empty
    /// native gate set is always required.
    pub fn new(
        native_gates: Option<Vec<String>>,
        custom_connectivity: bool,
        qubit_map: Option<Vec<(u32, u32)>>,
        optimization_level: u8,
    ) -> IbmResult<Self> {
        let coupling_map = match (custom_connectivity, qubit_map) {
            (true, None) => return Err(IbmError::MissingQubitMap),
            (true, Some(edges)) if edges.is_empty() => return Err(IbmError::MissingQubitMap),
            (_, Some(edges)) => Some(CouplingMap::from_edges(edges)),
            (false, None) => None,
        };
        let native_gates = match native_gates {
            Some(gates) if !gates.is_empty() => gates,
            _ => return Err(IbmError::MissingNativeGates),
        };
        Ok(Self {
            native_gates,
            coupling_map,
            optimization_level: validate_optimization_level(optimization_level)?,
        })
    }

    /// Read the settings from a client's `extra` map.
    ///
    /// Returns `None` when no transpilation was asked for: no `transpile`
    /// flag, no `native_gates`, no `custom_connectivity`.
    pub fn from_extra(extra: &Map<String, Value>, optimization_level: u8) -> IbmResult<Option<Self>> {
        let transpile = flag(extra, "transpile")?;
        let custom_connectivity = flag(extra, "custom_connectivity")?;
        let native_gates = extra.get("native_gates").map(parse_native_gates).transpose()?;
        let qubit_map = extra.get("qubit_map").map(parse_qubit_map).transpose()?;

        if !transpile && !custom_connectivity && native_gates.is_none() && qubit_map.is_none() {
            return Ok(None);
        }
        Self::new(native_gates, custom_connectivity, qubit_map, optimization_level).map(Some)
    }

    /// Check a circuit against the native set and the coupling map.
    ///
    /// `id` and `i` are treated as the same gate.
    pub fn check(&self, circuit: &Circuit) -> IbmResult<()> {
        for (position, gate) in circuit.gates() {
            let name = gate.name();
            let native = self
                .native_gates
                .iter()
                .any(|g| g.eq_ignore_ascii_case(name) || (name == "id" && g == "i"));
            if !native {
                return Err(IbmError::NonNativeGate {
                    gate: name.to_string(),
                    position,
                });
            }
        }
        if let Some(map) = &self.coupling_map {
            map.check_circuit(circuit)?;
        }
        Ok(())
    }

    /// Runtime transpilation options.
    pub fn runtime_options(&self) -> Value {
        let mut options = json!({
            "optimization_level": self.optimization_level,
            "basis_gates": self.native_gates,
        });
        if let Some(map) = &self.coupling_map {
            options["coupling_map"] = json!(map);
        }
        options
    }
}

fn flag(extra: &Map<String, Value>, key: &str) -> IbmResult<bool> {
    match extra.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(IbmError::InvalidOption {
            key: key.to_string(),
            message: format!("expected a boolean, got {other}"),
        }),
    }
}

fn parse_native_gates(value: &Value) -> IbmResult<Vec<String>> {
    serde_json::from_value(value.clone()).map_err(|e| IbmError::InvalidOption {
        key: "native_gates".into(),
        message: e.to_string(),
    })
}

fn parse_qubit_map(value: &Value) -> IbmResult<Vec<(u32, u32)>> {
    let pairs: Vec<[u32; 2]> =
        serde_json::from_value(value.clone()).map_err(|e| IbmError::InvalidOption {
            key: "qubit_map".into(),
            message: e.to_string(),
        })?;
    Ok(pairs.into_iter().map(|[a, b]| (a, b)).collect())
}
