//! Session and request orchestration against a qSim server.
//!
//! `QsimClient` owns the transport, the session token and the request
//! counter. Every qureg operation is one request/response exchange: build a
//! message carrying the token and the next counter value, send it, read the
//! single response and interpret its `result`.
//!
//! # Session lifecycle
//!
//! ```text
//! Disconnected ──connect()──► Registered(token) ──disconnect()──► Disconnected
//!       ▲                            │
//!       └─── REGISTER Not-Ok / I/O ──┘ (socket closed, token unset)
//! ```
//!
//! A transport or parse failure on a qureg request (timeout included) also
//! closes the socket and unsets the token: a late response would otherwise
//! be read as the answer to the next request. Call `connect()` again to
//! start a new session.
//!
//! # Example
//!
//! ```ignore
//! use qsim_client::client::{MeasureRequest, QsimClient};
//! use qsim_client::config::ClientConfig;
//! use qsim_client::qasm::{FunctionDescriptor, FunctionType};
//!
//! let mut client = QsimClient::new(ClientConfig::default());
//! client.connect().await?;
//!
//! let qureg = client.allocate(3).await?;
//! client
//!     .transform(qureg, &FunctionDescriptor::new(FunctionType::H, 2, 1, 1))
//!     .await?;
//! let outcome = client.measure(MeasureRequest::new(qureg, 0, 3)).await?;
//! client.release(qureg).await?;
//!
//! client.disconnect().await;
//! ```

mod error;
mod types;

pub use error::ClientError;
pub use types::{
    ExpectationRequest, MeasureRequest, Measurement, Observable, QuregHandle, StateSet,
};

use std::fmt::Display;
use std::str::FromStr;

use num_complex::Complex64;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::qasm::{
    decode_amplitudes, encode_amplitudes, encode_flag, parse_index_list, tags,
    FunctionDescriptor, Message, MessageId, QmlBlock,
};
use crate::qbus::QasmSocket;

/// Counter value of the first qureg request.
const FIRST_COUNTER: u32 = 1;
/// Counter value carried by REGISTER / UNREGISTER.
const CONTROL_COUNTER: u32 = 0;

/// Client for one qSim server session.
///
/// Methods take `&mut self`, so a client serves one request at a time. Use
/// one client per task when concurrent sessions are needed.
pub struct QsimClient {
    config: ClientConfig,
    socket: Option<QasmSocket>,
    /// Session token; set only while registered.
    token: Option<String>,
    /// Counter for the next qureg request. Never reset.
    counter: u32,
}

impl QsimClient {
    /// Create a disconnected client.
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            socket: None,
            token: None,
            counter: FIRST_COUNTER,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Registered with a live connection.
    pub fn is_connected(&self) -> bool {
        self.socket.is_some() && self.token.is_some()
    }

    /// Session token, while registered.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Counter the next qureg request will carry.
    pub fn next_counter(&self) -> u32 {
        self.counter
    }

    /// Connect to the server and register, obtaining a session token.
    ///
    /// On any failure the connection is closed and the token stays unset.
    ///
    /// # Errors
    ///
    /// - `SessionState` if the client is already connected.
    /// - `Transport` if the server cannot be reached or stops answering.
    /// - `Protocol` if the server refuses the registration.
    /// - `InvalidResponse` if the response carries no token.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        if self.socket.is_some() {
            return Err(ClientError::SessionState("already connected"));
        }
        self.token = None;

        let mut socket =
            QasmSocket::connect_with_retry(&self.config.server_addr, self.config.connect_attempts)
                .await?;
        socket.set_read_timeout(self.config.read_timeout());
        socket.set_max_frame_len(self.config.max_frame_len);

        let request = Message::new(CONTROL_COUNTER, MessageId::REGISTER)
            .with_param(tags::CLIENT_ID, self.config.client_id.as_str());

        let token = match register(&mut socket, &request).await {
            Ok(token) => token,
            Err(e) => {
                warn!("Registration with {} failed: {}", self.config.server_addr, e);
                socket.disconnect().await;
                return Err(e);
            }
        };

        info!(
            "Registered with qSim server {} as '{}'",
            self.config.server_addr, self.config.client_id
        );
        self.socket = Some(socket);
        self.token = Some(token);
        Ok(())
    }

    /// Unregister and close the connection.
    ///
    /// Best effort: failures while unregistering are logged, and the token
    /// and connection are released regardless.
    pub async fn disconnect(&mut self) {
        let token = self.token.take();
        let Some(mut socket) = self.socket.take() else {
            return;
        };

        if let Some(token) = token {
            let request = Message::new(CONTROL_COUNTER, MessageId::UNREGISTER)
                .with_param(tags::TOKEN, token);
            match exchange_on(&mut socket, &request).await {
                Ok(response) => {
                    if let Err(e) = check_result(&response) {
                        warn!("Unregister not acknowledged: {}", e);
                    }
                }
                Err(e) => warn!("Unregister exchange failed: {}", e),
            }
        }

        socket.disconnect().await;
        info!("Disconnected from qSim server {}", self.config.server_addr);
    }

    /// Allocate a qureg of `qubits` qubits.
    pub async fn allocate(&mut self, qubits: u32) -> Result<QuregHandle, ClientError> {
        let request = self
            .request(MessageId::QREG_ALLOCATE)?
            .with_param(tags::QREG_QN, qubits.to_string());
        let response = self.exchange(request).await?;

        let handle = QuregHandle(required(&response, tags::QREG_H)?);
        debug!(%handle, qubits, "Qureg allocated");
        Ok(handle)
    }

    pub async fn release(&mut self, handle: QuregHandle) -> Result<(), ClientError> {
        let request = self.qureg_request(MessageId::QREG_RELEASE, handle)?;
        self.exchange(request).await?;
        Ok(())
    }

    /// Reset the qureg to `|0...0>`.
    pub async fn reset_state(&mut self, handle: QuregHandle) -> Result<(), ClientError> {
        let request = self.qureg_request(MessageId::QREG_STATE_RESET, handle)?;
        self.exchange(request).await?;
        Ok(())
    }

    /// Set the qureg state to a basis state or an explicit amplitude vector.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` for an empty amplitude vector; nothing is sent.
    pub async fn set_state(
        &mut self,
        handle: QuregHandle,
        state: &StateSet,
    ) -> Result<(), ClientError> {
        let (tag, value) = match state {
            StateSet::BasisIndex(index) => (tags::QREG_ST_IDX, index.to_string()),
            StateSet::Amplitudes(amplitudes) if amplitudes.is_empty() => {
                return Err(ClientError::InvalidRequest(
                    "state set needs a basis index or a non-empty amplitude vector".to_string(),
                ));
            }
            StateSet::Amplitudes(amplitudes) => (tags::QREG_ST_VALS, encode_amplitudes(amplitudes)),
        };

        let request = self
            .qureg_request(MessageId::QREG_STATE_SET, handle)?
            .with_param(tag, value);
        self.exchange(request).await?;
        Ok(())
    }

    /// Apply a gate or function block to the qureg state.
    ///
    /// Arguments are validated against the function's layout before anything
    /// is sent.
    pub async fn transform(
        &mut self,
        handle: QuregHandle,
        function: &FunctionDescriptor,
    ) -> Result<(), ClientError> {
        let params = function.to_params()?;
        self.transform_with(handle, params).await
    }

    /// Apply a QML feature-map or q-network block to the qureg state.
    pub async fn transform_qml(
        &mut self,
        handle: QuregHandle,
        block: &QmlBlock,
    ) -> Result<(), ClientError> {
        let params = block.to_params()?;
        self.transform_with(handle, params).await
    }

    async fn transform_with(
        &mut self,
        handle: QuregHandle,
        params: Vec<(&'static str, String)>,
    ) -> Result<(), ClientError> {
        let mut request = self.qureg_request(MessageId::QREG_STATE_TRANSFORM, handle)?;
        for (tag, value) in params {
            request.add_param(tag, value);
        }
        self.exchange(request).await?;
        Ok(())
    }

    /// Read the full amplitude vector of the qureg.
    pub async fn peek_state(&mut self, handle: QuregHandle) -> Result<Vec<Complex64>, ClientError> {
        let request = self.qureg_request(MessageId::QREG_STATE_PEEK, handle)?;
        let response = self.exchange(request).await?;

        let text = required_str(&response, tags::QREG_ST_VALS)?;
        decode_amplitudes(text).map_err(|e| invalid(tags::QREG_ST_VALS, e))
    }

    pub async fn measure(&mut self, request: MeasureRequest) -> Result<Measurement, ClientError> {
        let message = self
            .qureg_request(MessageId::QREG_MEASURE, request.handle)?
            .with_param(tags::QREG_M_QIDX, request.qubit_start.to_string())
            .with_param(tags::QREG_M_QLEN, request.qubit_len.to_string())
            .with_param(tags::QREG_M_RAND, encode_flag(request.randomize))
            .with_param(tags::QREG_M_COLL, encode_flag(request.collapse));
        let response = self.exchange(message).await?;

        let residual_states = response
            .param(tags::QREG_M_ST_IDXS)
            .map(|text| parse_index_list(text).map_err(|e| invalid(tags::QREG_M_ST_IDXS, e)))
            .transpose()?;

        Ok(Measurement {
            state_index: required(&response, tags::QREG_M_ST_IDX)?,
            probability: optional(&response, tags::QREG_M_ST_PR)?,
            residual_states,
        })
    }

    pub async fn expectation(&mut self, request: ExpectationRequest) -> Result<f64, ClientError> {
        let message = self
            .qureg_request(MessageId::QREG_EXPECT, request.handle)?
            .with_param(tags::QREG_EX_ST_IDX, request.state_index.to_string())
            .with_param(tags::QREG_EX_QIDX, request.qubit_start.to_string())
            .with_param(tags::QREG_EX_QLEN, request.qubit_len.to_string())
            .with_param(tags::QREG_EX_OBS_OP, request.observable.code().to_string());
        let response = self.exchange(message).await?;

        required(&response, tags::QREG_EX_ST_VAL)
    }

    /// Start a request: check the session, take the next counter, add the token.
    fn request(&mut self, id: MessageId) -> Result<Message, ClientError> {
        if self.socket.is_none() {
            return Err(ClientError::SessionState("not connected"));
        }
        let token = self
            .token
            .clone()
            .ok_or(ClientError::SessionState("not registered"))?;

        let counter = self.take_counter()?;
        Ok(Message::new(counter, id).with_param(tags::TOKEN, token))
    }

    /// Take the next counter value. The counter never wraps back onto 0,
    /// which REGISTER / UNREGISTER use.
    fn take_counter(&mut self) -> Result<u32, ClientError> {
        let next = self
            .counter
            .checked_add(1)
            .ok_or(ClientError::SessionState("request counter exhausted"))?;
        Ok(std::mem::replace(&mut self.counter, next))
    }

    fn qureg_request(&mut self, id: MessageId, handle: QuregHandle) -> Result<Message, ClientError> {
        Ok(self.request(id)?.with_param(tags::QREG_H, handle.to_string()))
    }

    /// Send a request and return its response if the server accepted it.
    ///
    /// A transport or parse failure drops the session.
    async fn exchange(&mut self, request: Message) -> Result<Message, ClientError> {
        let socket = self
            .socket
            .as_mut()
            .ok_or(ClientError::SessionState("not connected"))?;
        let response = match exchange_on(socket, &request).await {
            Ok(response) => response,
            Err(e) => {
                if e.breaks_session() {
                    self.drop_session(&e).await;
                }
                return Err(e);
            }
        };
        check_result(&response)?;
        Ok(response)
    }

    /// Close the socket and unset the token without unregistering.
    async fn drop_session(&mut self, cause: &ClientError) {
        self.token = None;
        if let Some(socket) = self.socket.take() {
            warn!("Dropping session with {}: {}", socket.peer(), cause);
            socket.disconnect().await;
        }
    }
}

/// REGISTER exchange, returning the issued token.
async fn register(socket: &mut QasmSocket, request: &Message) -> Result<String, ClientError> {
    let response = exchange_on(socket, request).await?;
    check_result(&response)?;
    match response.param(tags::TOKEN) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(ClientError::InvalidResponse {
            tag: tags::TOKEN,
            reason: "missing or empty".to_string(),
        }),
    }
}

/// One request/response round trip. Does not interpret `result`.
async fn exchange_on(socket: &mut QasmSocket, request: &Message) -> Result<Message, ClientError> {
    request.check_syntax()?;
    debug!(request = %request, "-> qSim");
    socket.send(&request.to_wire()).await?;

    let raw = socket.receive().await?;
    let response = Message::from_wire(&raw)?;
    debug!(response = %response, "<- qSim");

    if response.id != MessageId::RESPONSE {
        warn!("Expected {} from server, got {}", MessageId::RESPONSE, response.id);
    }
    Ok(response)
}

/// Map `result`/`error` onto success or `ClientError::Protocol`.
fn check_result(response: &Message) -> Result<(), ClientError> {
    match response.param(tags::RESULT) {
        Some(tags::RESULT_OK) => Ok(()),
        Some(tags::RESULT_NOT_OK) => {
            let message = response
                .param(tags::ERROR)
                .unwrap_or("no error details")
                .to_string();
            debug!("Server rejected request #{}: {}", response.counter, message);
            Err(ClientError::Protocol { message })
        }
        Some(other) => Err(invalid(tags::RESULT, format!("unknown result {:?}", other))),
        None => Err(invalid(tags::RESULT, "missing")),
    }
}

fn invalid(tag: &'static str, reason: impl Display) -> ClientError {
    ClientError::InvalidResponse {
        tag,
        reason: reason.to_string(),
    }
}

fn required_str<'a>(response: &'a Message, tag: &'static str) -> Result<&'a str, ClientError> {
    response.param(tag).ok_or_else(|| invalid(tag, "missing"))
}

fn required<T>(response: &Message, tag: &'static str) -> Result<T, ClientError>
where
    T: FromStr,
    T::Err: Display,
{
    let text = required_str(response, tag)?;
    text.trim().parse().map_err(|e| invalid(tag, e))
}

fn optional<T>(response: &Message, tag: &'static str) -> Result<Option<T>, ClientError>
where
    T: FromStr,
    T::Err: Display,
{
    response
        .param(tag)
        .map(|text| text.trim().parse().map_err(|e| invalid(tag, e)))
        .transpose()
}
