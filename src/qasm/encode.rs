//! Text encodings for values carried inside QASM parameters.
//!
//! None of these encodings may produce the message separators `|`, `:` or
//! `=` on their own; function argument lists add `|` type tags, which the
//! codec tolerates because they come after the header fields.

use std::fmt;
use std::str::FromStr;

use num_complex::Complex64;
use thiserror::Error;

/// Text of an absent index range.
pub const EMPTY_RANGE: &str = "(-1, -1)";

/// Failure to encode or decode a parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// An amplitude group does not hold exactly a real and an imaginary part.
    #[error("Unpaired amplitude component in {token:?}")]
    UnpairedAmplitude { token: String },

    /// Text outside any `( ... )` amplitude group.
    #[error("Malformed amplitude {token:?}")]
    MalformedAmplitude { token: String },

    #[error("Invalid floating point value {value:?}")]
    InvalidFloat { value: String },

    #[error("Invalid index value {value:?}")]
    InvalidIndex { value: String },

    /// Index list not enclosed in `[` `]`.
    #[error("Malformed index list {text:?}")]
    MalformedIndexList { text: String },

    #[error("Malformed index range {text:?}")]
    MalformedRange { text: String },

    /// Index ranges hold zero, one or two bounds.
    #[error("Index range must have 0, 1 or 2 bounds, got {len}")]
    RangeArity { len: usize },
}

// =============================================================================
// Complex amplitude vectors
// =============================================================================

/// Encode amplitudes as `"(<re>, <im>) "` groups.
pub fn encode_amplitudes(amplitudes: &[Complex64]) -> String {
    amplitudes
        .iter()
        .map(|a| format!("({:?}, {:?}) ", a.re, a.im))
        .collect()
}

/// Decode an amplitude vector.
///
/// Accepts both the client form `"(r, i) (r, i) "` and the server form
/// `"(r, i), (r, i), "`. Each group must hold exactly one real and one
/// imaginary token; an unpaired token fails the whole decode.
pub fn decode_amplitudes(text: &str) -> Result<Vec<Complex64>, ValueError> {
    let mut amplitudes = Vec::new();

    for group in text.split(')') {
        let group = group.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        if group.is_empty() {
            continue;
        }
        let inner = group
            .strip_prefix('(')
            .ok_or_else(|| ValueError::MalformedAmplitude {
                token: group.to_string(),
            })?;

        let mut parts = inner.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(re), Some(im), None) => {
                amplitudes.push(Complex64::new(parse_float(re)?, parse_float(im)?));
            }
            _ => {
                return Err(ValueError::UnpairedAmplitude {
                    token: group.to_string(),
                })
            }
        }
    }

    Ok(amplitudes)
}

pub(crate) fn parse_float(value: &str) -> Result<f64, ValueError> {
    value
        .trim()
        .parse()
        .map_err(|_| ValueError::InvalidFloat {
            value: value.trim().to_string(),
        })
}

// =============================================================================
// Index ranges
// =============================================================================

/// Qubit index selector used for control/target ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexRange {
    /// No range; encoded as the `(-1, -1)` sentinel.
    #[default]
    Empty,
    /// A single index.
    Single(u32),
    /// A closed `low..=high` pair.
    Span(u32, u32),
}

impl IndexRange {
    /// Build from a 0, 1 or 2 element slice.
    pub fn from_slice(bounds: &[u32]) -> Result<Self, ValueError> {
        match *bounds {
            [] => Ok(Self::Empty),
            [single] => Ok(Self::Single(single)),
            [low, high] => Ok(Self::Span(low, high)),
            _ => Err(ValueError::RangeArity { len: bounds.len() }),
        }
    }
}

/// Encode an optional range; `None` is the same as [`IndexRange::Empty`].
pub fn encode_index_range(range: Option<&IndexRange>) -> String {
    range.copied().unwrap_or_default().to_string()
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(EMPTY_RANGE),
            Self::Single(index) => write!(f, "({})", index),
            Self::Span(low, high) => write!(f, "({}, {})", low, high),
        }
    }
}

impl FromStr for IndexRange {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ValueError::MalformedRange {
            text: s.to_string(),
        };
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(malformed)?;

        if inner.trim().is_empty() {
            return Ok(Self::Empty);
        }

        let bounds: Vec<i64> = inner
            .split(',')
            .map(|v| v.trim().parse::<i64>().map_err(|_| malformed()))
            .collect::<Result<_, _>>()?;

        match bounds[..] {
            [-1, -1] => Ok(Self::Empty),
            [single] => Ok(Self::Single(u32::try_from(single).map_err(|_| malformed())?)),
            [low, high] => Ok(Self::Span(
                u32::try_from(low).map_err(|_| malformed())?,
                u32::try_from(high).map_err(|_| malformed())?,
            )),
            _ => Err(malformed()),
        }
    }
}

// =============================================================================
// Residual state index lists and flags
// =============================================================================

/// Parse a bracketed index list such as `"[0, 4, 6]"`.
///
/// Only non-negative integers separated by commas are accepted; `"[]"` is an
/// empty list.
pub fn parse_index_list(text: &str) -> Result<Vec<u64>, ValueError> {
    let inner = text
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| ValueError::MalformedIndexList {
            text: text.to_string(),
        })?;

    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|v| {
            v.trim().parse().map_err(|_| ValueError::InvalidIndex {
                value: v.trim().to_string(),
            })
        })
        .collect()
}

pub fn encode_flag(flag: bool) -> &'static str {
    if flag {
        "1"
    } else {
        "0"
    }
}
