//! QASM message model and its text encoding.
//!
//! # Wire Format
//!
//! ```text
//! <counter>|<id>|<tag1>=<val1>:<tag2>=<val2>:...:
//! ```
//!
//! Only the first two `|` separate fields. Anything after the second `|` is
//! the parameter list, whose values may themselves contain `|` (function
//! argument lists do, e.g. `f_args=[0.5|D]`).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::qasm::tags;

/// Field separator between counter, id and parameters.
pub const FIELD_SEP: char = '|';
/// Terminator after each `tag=value` pair.
pub const PARAM_SEP: char = ':';
/// Separator between a tag and its value.
pub const PARVAL_SEP: char = '=';

/// Longest parameter value printed in diagnostic output.
const DUMP_VALUE_LIMIT: usize = 100;

/// Operation selector carried in the second message field.
///
/// Kept as an open integer newtype so that ids outside the known table can
/// still be decoded and reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u32);

impl MessageId {
    pub const NOP: MessageId = MessageId(0);
    pub const REGISTER: MessageId = MessageId(1);
    pub const UNREGISTER: MessageId = MessageId(2);

    pub const QREG_ALLOCATE: MessageId = MessageId(10);
    pub const QREG_RELEASE: MessageId = MessageId(11);
    pub const QREG_STATE_RESET: MessageId = MessageId(12);
    pub const QREG_STATE_SET: MessageId = MessageId(13);
    pub const QREG_STATE_TRANSFORM: MessageId = MessageId(14);
    pub const QREG_STATE_PEEK: MessageId = MessageId(15);
    pub const QREG_MEASURE: MessageId = MessageId(16);
    pub const QREG_EXPECT: MessageId = MessageId(17);

    pub const RESPONSE: MessageId = MessageId(20);

    /// Symbolic name, if the id is part of the known table.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::NOP => "NOP",
            Self::REGISTER => "REGISTER",
            Self::UNREGISTER => "UNREGISTER",
            Self::QREG_ALLOCATE => "QREG_ALLOCATE",
            Self::QREG_RELEASE => "QREG_RELEASE",
            Self::QREG_STATE_RESET => "QREG_STATE_RESET",
            Self::QREG_STATE_SET => "QREG_STATE_SET",
            Self::QREG_STATE_TRANSFORM => "QREG_STATE_TRANSFORM",
            Self::QREG_STATE_PEEK => "QREG_STATE_PEEK",
            Self::QREG_MEASURE => "QREG_MEASURE",
            Self::QREG_EXPECT => "QREG_EXPECT",
            Self::RESPONSE => "RESPONSE",
            _ => return None,
        };
        Some(name)
    }

    /// Connection-control message (REGISTER / UNREGISTER).
    pub fn is_control(self) -> bool {
        self == Self::REGISTER || self == Self::UNREGISTER
    }

    /// Qureg instruction message (ALLOCATE ..= EXPECT).
    pub fn is_instruction(self) -> bool {
        (Self::QREG_ALLOCATE.0..=Self::QREG_EXPECT.0).contains(&self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}({})", name, self.0),
            None => write!(f, "UNKNOWN({})", self.0),
        }
    }
}

/// Failure to decode message text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The `|` ending the given field is missing or the field is empty.
    #[error("Missing '|' after {field} field")]
    MissingFieldSeparator { field: &'static str },

    /// A header field is not an unsigned integer.
    #[error("Invalid {field} value: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// A parameter is not terminated by `:`.
    #[error("Unterminated parameter: {segment:?}")]
    UnterminatedParam { segment: String },

    /// A parameter segment has no `=` or an empty tag.
    #[error("Malformed parameter (expected tag=value): {segment:?}")]
    MalformedParam { segment: String },
}

/// A message lacks a parameter its id requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Message {id} is missing required parameter '{tag}'")]
pub struct SyntaxError {
    pub id: MessageId,
    pub tag: &'static str,
}

/// One QASM message: counter, operation id and ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Request counter, echoed by the server. 0 for connection control.
    pub counter: u32,
    /// Operation selector.
    pub id: MessageId,
    params: Vec<(String, String)>,
}

impl Default for Message {
    fn default() -> Self {
        Self::new(0, MessageId::NOP)
    }
}

impl Message {
    /// Create a message with no parameters.
    pub fn new(counter: u32, id: MessageId) -> Self {
        Self {
            counter,
            id,
            params: Vec::new(),
        }
    }

    /// Set a parameter. Re-adding a tag replaces its value in place.
    pub fn add_param(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        let value = value.into();
        match self.params.iter_mut().find(|(t, _)| *t == tag) {
            Some((_, existing)) => *existing = value,
            None => self.params.push((tag, value)),
        }
    }

    /// Builder form of [`Message::add_param`].
    pub fn with_param(mut self, tag: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_param(tag, value);
        self
    }

    /// Value of the given tag, if present.
    pub fn param(&self, tag: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_param(&self, tag: &str) -> bool {
        self.param(tag).is_some()
    }

    /// Parameters in insertion order.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Encode to wire text.
    pub fn to_wire(&self) -> String {
        let mut out = format!("{}{}{}{}", self.counter, FIELD_SEP, self.id.0, FIELD_SEP);
        for (tag, value) in &self.params {
            out.push_str(tag);
            out.push(PARVAL_SEP);
            out.push_str(value);
            out.push(PARAM_SEP);
        }
        out
    }

    /// Decode wire text into a new message.
    pub fn from_wire(text: &str) -> Result<Self, ParseError> {
        let (counter, rest) = split_field(text, "counter")?;
        let (id, mut rest) = split_field(rest, "id")?;

        let counter = parse_number(counter, "counter")?;
        let id = MessageId(parse_number(id, "id")?);
        let mut msg = Message::new(counter, id);

        while !rest.is_empty() {
            let end = match rest.find(PARAM_SEP) {
                Some(end) => end,
                None => {
                    return Err(ParseError::UnterminatedParam {
                        segment: rest.to_string(),
                    })
                }
            };
            let segment = &rest[..end];
            match segment.find(PARVAL_SEP) {
                Some(eq) if eq > 0 => msg.add_param(&segment[..eq], &segment[eq + 1..]),
                _ => {
                    return Err(ParseError::MalformedParam {
                        segment: segment.to_string(),
                    })
                }
            }
            rest = &rest[end + 1..];
        }

        Ok(msg)
    }

    /// Decode wire text into this message.
    ///
    /// On failure the message is reset to its default (empty) state, never
    /// left holding partially decoded data.
    pub fn decode_into(&mut self, text: &str) -> Result<(), ParseError> {
        match Self::from_wire(text) {
            Ok(msg) => {
                *self = msg;
                Ok(())
            }
            Err(e) => {
                *self = Message::default();
                Err(e)
            }
        }
    }

    /// Check that every parameter required by this message's id is present.
    ///
    /// Every request other than REGISTER must carry a `token`; responses must
    /// carry a `result`. Unknown ids need only the token.
    pub fn check_syntax(&self) -> Result<(), SyntaxError> {
        let needs_token = self.id != MessageId::REGISTER
            && self.id != MessageId::RESPONSE
            && self.id != MessageId::NOP;
        if needs_token && !self.has_param(tags::TOKEN) {
            return Err(SyntaxError {
                id: self.id,
                tag: tags::TOKEN,
            });
        }

        match required_params(self.id).iter().find(|tag| !self.has_param(tag)) {
            Some(tag) => Err(SyntaxError {
                id: self.id,
                tag: *tag,
            }),
            None => Ok(()),
        }
    }
}

impl FromStr for Message {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
    }
}

/// One-line diagnostic dump, long values truncated.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} [", self.counter, self.id)?;
        for (i, (tag, value)) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match value.char_indices().nth(DUMP_VALUE_LIMIT) {
                Some((cut, _)) => write!(f, "{}={}...", tag, &value[..cut])?,
                None => write!(f, "{}={}", tag, value)?,
            }
        }
        f.write_str("]")
    }
}

/// Parameters the server rejects a message without, by id.
fn required_params(id: MessageId) -> &'static [&'static str] {
    match id {
        MessageId::REGISTER => &[tags::CLIENT_ID],
        MessageId::UNREGISTER => &[tags::TOKEN],
        MessageId::QREG_ALLOCATE => &[tags::QREG_QN],
        MessageId::QREG_RELEASE
        | MessageId::QREG_STATE_RESET
        | MessageId::QREG_STATE_SET
        | MessageId::QREG_STATE_PEEK
        | MessageId::QREG_EXPECT => &[tags::QREG_H],
        MessageId::QREG_MEASURE => &[tags::QREG_H, tags::QREG_M_QIDX, tags::QREG_M_QLEN],
        MessageId::QREG_STATE_TRANSFORM => &[tags::QREG_H, tags::F_TYPE],
        MessageId::RESPONSE => &[tags::RESULT],
        _ => &[],
    }
}

/// Split off one `|`-terminated, non-empty header field.
fn split_field<'a>(text: &'a str, field: &'static str) -> Result<(&'a str, &'a str), ParseError> {
    match text.find(FIELD_SEP) {
        Some(idx) if idx > 0 => Ok((&text[..idx], &text[idx + 1..])),
        _ => Err(ParseError::MissingFieldSeparator { field }),
    }
}

fn parse_number(value: &str, field: &'static str) -> Result<u32, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
