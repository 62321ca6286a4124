//! qbus transport: framed text messages over a TCP stream.
//!
//! This module is the byte-level boundary between the client and the qSim
//! server. It knows nothing about QASM content; it only moves whole text
//! payloads.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐           TCP            ┌─────────────────────┐
//! │   QsimClient    │  ◄─────────────────────► │     qSim server     │
//! │  (QasmSocket)   │   u32 LE length + text   │   (qbus / qcpu)     │
//! └─────────────────┘                          └─────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use qsim_client::qbus::QasmSocket;
//!
//! let mut socket = QasmSocket::connect("127.0.0.1:27020").await?;
//! socket.send("0|1|id=my-client:").await?;
//! let reply = socket.receive().await?;
//! ```

mod framing;
mod socket;

pub use framing::{
    read_frame, write_frame, FrameError, DEFAULT_MAX_FRAME_LEN, LENGTH_PREFIX_LEN, MAX_FRAME_LEN,
};
pub use socket::{QasmSocket, TransportError};
