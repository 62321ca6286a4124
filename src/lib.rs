//! qSim client library
//!
//! Client-side protocol engine for the qSim quantum register simulation
//! server:
//!
//! - `qbus` - length-prefixed framing over a TCP connection
//! - `qasm` - QASM message codec, value encoders and function descriptors
//! - `client` - session lifecycle and typed qureg operations
//! - `config` - connection settings from file and environment
//!
//! # Client Module
//!
//! The `client` module is the entry point for applications:
//!
//! ```ignore
//! use qsim_client::client::QsimClient;
//! use qsim_client::config::ClientConfig;
//!
//! let mut client = QsimClient::new(ClientConfig::resolve()?);
//! client.connect().await?;
//! let qureg = client.allocate(2).await?;
//! let state = client.peek_state(qureg).await?;
//! client.release(qureg).await?;
//! client.disconnect().await;
//! ```

pub mod client;
pub mod config;
pub mod qasm;
pub mod qbus;
