//! qsim-client - run a short qureg session against a qSim server.
//!
//! Allocates a register, puts the selected qubit in superposition, prints
//! the state vector and a measurement, then releases the register.
//!
//! ```bash
//! qsim-client [qubits]
//! QSIM_SERVER_ADDR=10.0.0.5:27020 RUST_LOG=qsim_client=debug qsim-client 3
//! ```

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use qsim_client::client::{MeasureRequest, QsimClient};
use qsim_client::config::ClientConfig;
use qsim_client::qasm::{FunctionDescriptor, FunctionType};

const DEFAULT_QUBITS: u32 = 3;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "qsim_client=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    tracing::info!("Starting qsim-client v{}", env!("CARGO_PKG_VERSION"));

    let qubits = match std::env::args().nth(1) {
        Some(arg) => arg
            .parse()
            .with_context(|| format!("Invalid qubit count {:?}", arg))?,
        None => DEFAULT_QUBITS,
    };

    let config = ClientConfig::resolve()?;
    let mut client = QsimClient::new(config);
    if let Err(e) = client.connect().await {
        let addr = &client.config().server_addr;
        if e.is_protocol() {
            anyhow::bail!("qSim server {} refused registration: {}", addr, e);
        }
        return Err(anyhow::Error::new(e).context(format!("Failed to register with {}", addr)));
    }

    let result = run_session(&mut client, qubits).await;

    // Unregister on every path, then report.
    client.disconnect().await;
    result
}

async fn run_session(client: &mut QsimClient, qubits: u32) -> Result<()> {
    let qureg = client.allocate(qubits).await.context("Allocate failed")?;
    println!("qureg {} allocated ({} qubits)", qureg, qubits);

    let lsq = if qubits > 1 { 1 } else { 0 };
    let hadamard = FunctionDescriptor::new(FunctionType::H, 2, 1, lsq);
    client
        .transform(qureg, &hadamard)
        .await
        .context("Hadamard transform failed")?;

    let state = client.peek_state(qureg).await.context("Peek failed")?;
    let norm: f64 = state.iter().map(|a| a.norm_sqr()).sum();
    for (index, amplitude) in state.iter().enumerate() {
        println!(
            "  |{:0width$b}>  {:+.6} {:+.6}i",
            index,
            amplitude.re,
            amplitude.im,
            width = qubits as usize
        );
    }
    println!("norm = {:.6}", norm);

    let outcome = client
        .measure(MeasureRequest::new(qureg, 0, qubits))
        .await
        .context("Measure failed")?;
    match outcome.probability {
        Some(p) => println!("measured |{}> with p = {:.6}", outcome.state_index, p),
        None => println!("measured |{}>", outcome.state_index),
    }

    client.release(qureg).await.context("Release failed")?;
    println!("qureg {} released", qureg);
    Ok(())
}
