//! Common test utilities for session integration tests.
//!
//! `MockServer` is an in-process stand-in for the qSim server: it speaks the
//! real framing and QASM text on a loopback port, keeps a small state-vector
//! simulation per qureg, and records every request it receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::f64::consts::FRAC_1_SQRT_2;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use num_complex::Complex64;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use qsim_client::client::{ClientError, QsimClient};
use qsim_client::config::ClientConfig;
use qsim_client::qasm::{decode_amplitudes, tags, Message, MessageId};
use qsim_client::qbus::{read_frame, write_frame, DEFAULT_MAX_FRAME_LEN};

/// Guard so no test can hang on a broken exchange.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client id the mock refuses to register.
pub const REJECTED_CLIENT_ID: &str = "reject-me";

/// Mock server behaviour switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockOptions {
    /// Stop answering after the registration response.
    pub silent_after_register: bool,
    /// Close the connection instead of acknowledging UNREGISTER.
    pub drop_on_unregister: bool,
    /// Hold every non-REGISTER response on the first connection this long.
    pub first_session_reply_delay: Option<Duration>,
}

/// Running mock qSim server.
pub struct MockServer {
    addr: String,
    requests: Arc<Mutex<Vec<Message>>>,
    task: JoinHandle<()>,
}

impl MockServer {
    pub async fn start() -> Self {
        Self::start_with(MockOptions::default()).await
    }

    pub async fn start_with(options: MockOptions) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock server");
        let addr = listener.local_addr().expect("No local addr").to_string();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = Arc::clone(&requests);
        let task = tokio::spawn(async move {
            let mut session = 0u32;
            while let Ok((stream, _)) = listener.accept().await {
                session += 1;
                let log = Arc::clone(&log);
                tokio::spawn(serve_connection(stream, session, options, log));
            }
        });

        Self {
            addr,
            requests,
            task,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Client config pointing at this server, with a short read timeout.
    pub fn config(&self) -> ClientConfig {
        ClientConfig {
            read_timeout_ms: Some(2_000),
            ..ClientConfig::with_server_addr(self.addr.clone())
        }
    }

    pub fn client(&self) -> QsimClient {
        QsimClient::new(self.config())
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<Message> {
        self.requests.lock().expect("Request log poisoned").clone()
    }

    pub fn requests_with_id(&self, id: MessageId) -> Vec<Message> {
        self.requests().into_iter().filter(|m| m.id == id).collect()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Connect a fresh client to `server`, bounded by [`TEST_TIMEOUT`].
pub async fn connected_client(server: &MockServer) -> QsimClient {
    let mut client = server.client();
    tokio::time::timeout(TEST_TIMEOUT, client.connect())
        .await
        .expect("Connect timed out")
        .expect("Connect failed");
    client
}

/// Await an operation under [`TEST_TIMEOUT`].
pub async fn within<T>(
    fut: impl std::future::Future<Output = Result<T, ClientError>>,
) -> Result<T, ClientError> {
    tokio::time::timeout(TEST_TIMEOUT, fut)
        .await
        .expect("Operation timed out")
}

struct Session {
    token: Option<String>,
    next_handle: u32,
    quregs: HashMap<u32, Vec<Complex64>>,
}

async fn serve_connection(
    mut stream: TcpStream,
    session_id: u32,
    options: MockOptions,
    log: Arc<Mutex<Vec<Message>>>,
) {
    let mut session = Session {
        token: None,
        next_handle: 1,
        quregs: HashMap::new(),
    };

    while let Ok(raw) = read_frame(&mut stream, DEFAULT_MAX_FRAME_LEN).await {
        let request = match Message::from_wire(&raw) {
            Ok(request) => request,
            Err(_) => return,
        };
        log.lock().expect("Request log poisoned").push(request.clone());

        if request.id == MessageId::UNREGISTER && options.drop_on_unregister {
            return;
        }
        if request.id != MessageId::REGISTER && options.silent_after_register {
            continue;
        }

        let response = handle(&mut session, session_id, &request);
        if let (1, Some(delay)) = (session_id, options.first_session_reply_delay) {
            if request.id != MessageId::REGISTER {
                tokio::time::sleep(delay).await;
            }
        }
        if write_frame(&mut stream, &response.to_wire()).await.is_err() {
            return;
        }
    }
}

fn ok(request: &Message) -> Message {
    Message::new(request.counter, MessageId::RESPONSE).with_param(tags::RESULT, tags::RESULT_OK)
}

fn not_ok(request: &Message, error: &str) -> Message {
    Message::new(request.counter, MessageId::RESPONSE)
        .with_param(tags::RESULT, tags::RESULT_NOT_OK)
        .with_param(tags::ERROR, error)
}

fn handle(session: &mut Session, session_id: u32, request: &Message) -> Message {
    if request.id == MessageId::REGISTER {
        return match request.param(tags::CLIENT_ID) {
            Some(REJECTED_CLIENT_ID) => not_ok(request, "client registration refused"),
            Some(_) => {
                let token = format!("1653751880-{}", session_id);
                session.token = Some(token.clone());
                ok(request).with_param(tags::TOKEN, token)
            }
            None => not_ok(request, "missing client id"),
        };
    }

    if request.param(tags::TOKEN) != session.token.as_deref() || session.token.is_none() {
        return not_ok(request, "invalid token");
    }
    if request.id == MessageId::UNREGISTER {
        session.token = None;
        return ok(request);
    }

    if request.id == MessageId::QREG_ALLOCATE {
        let qubits: u32 = match request.param(tags::QREG_QN).and_then(|v| v.parse().ok()) {
            Some(n) if n > 0 && n <= 16 => n,
            _ => return not_ok(request, "invalid qureg size"),
        };
        let handle = session.next_handle;
        session.next_handle += 1;
        session.quregs.insert(handle, basis_state(qubits, 0));
        return ok(request).with_param(tags::QREG_H, handle.to_string());
    }

    let handle: u32 = match request.param(tags::QREG_H).and_then(|v| v.parse().ok()) {
        Some(h) => h,
        None => return not_ok(request, "missing qureg handle"),
    };
    if request.id == MessageId::QREG_RELEASE {
        return match session.quregs.remove(&handle) {
            Some(_) => ok(request),
            None => not_ok(request, "qureg not found"),
        };
    }
    let state = match session.quregs.get_mut(&handle) {
        Some(state) => state,
        None => return not_ok(request, "qureg not found"),
    };
    let qubits = state.len().trailing_zeros();

    match request.id {
        MessageId::QREG_STATE_RESET => {
            *state = basis_state(qubits, 0);
            ok(request)
        }
        MessageId::QREG_STATE_SET => {
            if let Some(index) = request.param(tags::QREG_ST_IDX).and_then(|v| v.parse().ok()) {
                *state = basis_state(qubits, index);
                ok(request)
            } else if let Some(vals) = request.param(tags::QREG_ST_VALS) {
                match decode_amplitudes(vals) {
                    Ok(amplitudes) if amplitudes.len() == state.len() => {
                        *state = amplitudes;
                        ok(request)
                    }
                    _ => not_ok(request, "invalid state vector"),
                }
            } else {
                not_ok(request, "no state given")
            }
        }
        MessageId::QREG_STATE_TRANSFORM => transform(state, request),
        MessageId::QREG_STATE_PEEK => {
            let vals: String = state
                .iter()
                .map(|a| format!("({:.6}, {:.6}), ", a.re, a.im))
                .collect();
            ok(request).with_param(tags::QREG_ST_VALS, vals)
        }
        MessageId::QREG_MEASURE => measure(state, request),
        MessageId::QREG_EXPECT => {
            let index: usize = request
                .param(tags::QREG_EX_ST_IDX)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let value = state.get(index).map_or(0.0, |a| a.norm_sqr());
            ok(request).with_param(tags::QREG_EX_ST_VAL, format!("{:.6}", value))
        }
        _ => not_ok(request, "unsupported message id"),
    }
}

fn basis_state(qubits: u32, index: usize) -> Vec<Complex64> {
    let mut state = vec![Complex64::new(0.0, 0.0); 1 << qubits];
    if let Some(amplitude) = state.get_mut(index) {
        *amplitude = Complex64::new(1.0, 0.0);
    }
    state
}

/// Hadamard on qubit `f_lsq`; QML blocks and other known gates are accepted
/// without changing the state.
fn transform(state: &mut [Complex64], request: &Message) -> Message {
    let ftype: i32 = match request.param(tags::F_TYPE).and_then(|v| v.parse().ok()) {
        Some(t) => t,
        None => return not_ok(request, "missing function type"),
    };
    if request.param(tags::F_ARGS).is_none() {
        return not_ok(request, "missing function args");
    }

    match ftype {
        1 => {
            let lsq: usize = request
                .param(tags::F_LSQ)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0);
            let bit = 1usize << lsq;
            if bit >= state.len() {
                return not_ok(request, "qubit out of range");
            }
            for i in (0..state.len()).filter(|i| i & bit == 0) {
                let (a, b) = (state[i], state[i | bit]);
                state[i] = (a + b) * FRAC_1_SQRT_2;
                state[i | bit] = (a - b) * FRAC_1_SQRT_2;
            }
            ok(request)
        }
        0..=17 | 100..=103 | 200 | 201 => ok(request),
        _ => not_ok(request, "unknown function type"),
    }
}

/// Deterministic measurement: the most probable basis state.
fn measure(state: &mut Vec<Complex64>, request: &Message) -> Message {
    let collapse = request.param(tags::QREG_M_COLL) == Some("1");

    let (index, probability) = state
        .iter()
        .map(|a| a.norm_sqr())
        .enumerate()
        .fold((0, -1.0), |best, (i, p)| if p > best.1 { (i, p) } else { best });

    let mut response = ok(request)
        .with_param(tags::QREG_M_ST_IDX, index.to_string())
        .with_param(tags::QREG_M_ST_PR, format!("{:.6}", probability));

    if collapse {
        *state = basis_state(state.len().trailing_zeros(), index);
    } else {
        let residual: Vec<String> = state
            .iter()
            .enumerate()
            .filter(|(_, a)| a.norm_sqr() > 1e-12)
            .map(|(i, _)| i.to_string())
            .collect();
        response.add_param(tags::QREG_M_ST_IDXS, format!("[{}]", residual.join(", ")));
    }
    response
}
