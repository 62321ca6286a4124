//! QASM: the tag-value instruction encoding spoken with the qSim server.
//!
//! - [`message`]: the `counter|id|tag=value:...` message model and codec.
//! - [`encode`]: value encodings used inside parameters (amplitude vectors,
//!   index ranges, index lists, flags).
//! - [`function`]: function descriptors for state transforms and the
//!   argument-shape table.
//! - [`tags`]: parameter tag names.
//!
//! # Example
//!
//! ```
//! use qsim_client::qasm::{tags, Message, MessageId};
//!
//! let msg = Message::new(1, MessageId::QREG_ALLOCATE)
//!     .with_param(tags::TOKEN, "abc")
//!     .with_param(tags::QREG_QN, "3");
//! assert_eq!(msg.to_wire(), "1|10|token=abc:qr_n=3:");
//! ```

pub mod encode;
pub mod function;
pub mod message;
pub mod tags;

pub use encode::{
    decode_amplitudes, encode_amplitudes, encode_flag, encode_index_range, parse_index_list,
    IndexRange, ValueError,
};
pub use function::{
    arg_shape, encode_args, ArgShape, ArgumentShapeError, Entanglement, FeatureMapKind,
    FunctionArg, FunctionCategory, FunctionDescriptor, FunctionType, QmlBlock, QmlBlockKind,
    QnetLayout,
};
pub use message::{Message, MessageId, ParseError, SyntaxError};
