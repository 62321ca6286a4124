//! Typed request and result values of the qureg operations.

use std::fmt;

use num_complex::Complex64;

/// Server-side qureg handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QuregHandle(pub u32);

impl fmt::Display for QuregHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Target of a state set request.
#[derive(Debug, Clone, PartialEq)]
pub enum StateSet {
    /// Pure computational basis state `|index>`.
    BasisIndex(u64),
    /// Explicit amplitude vector, one amplitude per basis state.
    Amplitudes(Vec<Complex64>),
}

/// Measurement request over `qubit_len` qubits starting at `qubit_start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasureRequest {
    pub handle: QuregHandle,
    pub qubit_start: u32,
    pub qubit_len: u32,
    /// Sample the outcome instead of taking the most probable state.
    pub randomize: bool,
    /// Collapse the register onto the measured state.
    pub collapse: bool,
}

impl MeasureRequest {
    /// Randomized, collapsing measurement of the given qubits.
    pub fn new(handle: QuregHandle, qubit_start: u32, qubit_len: u32) -> Self {
        Self {
            handle,
            qubit_start,
            qubit_len,
            randomize: true,
            collapse: true,
        }
    }
}

/// Outcome of a measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub state_index: u64,
    /// Probability of the measured state, when reported.
    pub probability: Option<f64>,
    /// Residual basis state indices, when reported (typically without collapse).
    pub residual_states: Option<Vec<u64>>,
}

/// Observable operator for expectation values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Observable {
    #[default]
    Computational,
    PauliZ,
}

impl Observable {
    pub fn code(self) -> i32 {
        match self {
            Observable::Computational => 0,
            Observable::PauliZ => 1,
        }
    }
}

/// Expectation value request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectationRequest {
    pub handle: QuregHandle,
    /// Basis state index; passed through to the server unchanged.
    pub state_index: i64,
    pub qubit_start: u32,
    pub qubit_len: u32,
    pub observable: Observable,
}
