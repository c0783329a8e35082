//! # Swap Node
//!
//! Devnet entry point. Builds the configured domains, starts the relayer
//! and walks one router-relay swap and one shared-secret swap end to end.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use swap_bus::EventFilter;
use swap_htlc::{generate_secret, AssetTransferPort, Clock, SystemClock};
use swap_node::{record_bus_metrics, NodeConfig, Relayer, SwapNetwork};
use swap_telemetry::{encode_metrics, init_telemetry};
use swap_types::{Address, DomainId, TokenId};
use tokio::sync::watch;
use tracing::info;

const ALICE: Address = Address::repeat(0xA1);
const BOB: Address = Address::repeat(0xB0);
const TOKEN_A: TokenId = TokenId::repeat(0x70);
const TOKEN_B: TokenId = TokenId::repeat(0x71);
const SWAP_WINDOW_SECS: u64 = 3_600;

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    let _telemetry = init_telemetry(config.telemetry.clone())?;

    info!("===========================================");
    info!("  Swap Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let network = SwapNetwork::from_config(&config, clock.clone())
        .context("Failed to build domain network")?;
    let mut domains = network.nodes().keys().copied();
    let (alpha, beta) = match (domains.next(), domains.next()) {
        (Some(a), Some(b)) => (a, b),
        _ => anyhow::bail!("demo needs at least two domains"),
    };

    tokio::spawn(record_bus_metrics(network.bus().subscribe(EventFilter::all())));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let relayer = Relayer::new(&network, config.relayer.clone());
    let relayer_task = tokio::spawn(relayer.run(shutdown_rx));

    fund(&network, alpha, beta)?;
    relay_swap(&network, &clock, alpha, beta, config.relayer.poll_interval_ms).await?;
    shared_secret_swap(&network, &clock, alpha)?;

    shutdown_tx.send(true).ok();
    relayer_task.await.context("Relayer task panicked")?;

    if config.telemetry.metrics_enabled {
        info!("Metrics snapshot:\n{}", encode_metrics()?);
    }
    Ok(())
}

/// Alice holds TOKEN_A on alpha, Bob holds TOKEN_B on beta.
fn fund(network: &SwapNetwork, alpha: DomainId, beta: DomainId) -> Result<()> {
    let node = network.node(alpha)?;
    let node = node.lock();
    node.ledger().mint(TOKEN_A, ALICE, 1_000);
    node.ledger()
        .approve(TOKEN_A, ALICE, node.config().sender_registry, 1_000);
    node.ledger()
        .approve(TOKEN_A, ALICE, node.config().shared_secret_registry, 1_000);
    drop(node);

    let node = network.node(beta)?;
    let node = node.lock();
    node.ledger().mint(TOKEN_B, BOB, 1_000);
    node.ledger()
        .approve(TOKEN_B, BOB, node.config().receiver_registry, 1_000);
    Ok(())
}

async fn relay_swap(
    network: &SwapNetwork,
    clock: &Arc<dyn Clock>,
    alpha: DomainId,
    beta: DomainId,
    poll_interval_ms: u64,
) -> Result<()> {
    let timelock = clock.now() + SWAP_WINDOW_SECS;

    let id = network
        .node(alpha)?
        .lock()
        .sender()
        .new_contract(ALICE, timelock, TOKEN_A, 100, beta, TOKEN_B, 250)?;
    info!(swap_id = %id, "Alice opened intent on {}", alpha);

    network
        .node(beta)?
        .lock()
        .receiver()
        .start_withdrawal(BOB, timelock, ALICE, alpha, TOKEN_A, 100, TOKEN_B, 250)?;
    info!(swap_id = %id, "Bob escrowed the return leg on {}", beta);

    // Two hops: confirmation to alpha, completion back to beta
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(poll_interval_ms)).await;
        let completed = network
            .node(beta)?
            .lock()
            .receiver()
            .get(&id)
            .map(|r| r.state.is_terminal())
            .unwrap_or(false);
        if completed {
            break;
        }
    }

    let bob_a = network.node(alpha)?.lock().ledger().balance_of(TOKEN_A, BOB)?;
    let alice_b = network.node(beta)?.lock().ledger().balance_of(TOKEN_B, ALICE)?;
    info!(
        swap_id = %id,
        bob_token_a = bob_a,
        alice_token_b = alice_b,
        "Relay swap settled"
    );
    ensure!(bob_a == 100 && alice_b == 250, "relay swap did not settle");
    Ok(())
}

fn shared_secret_swap(network: &SwapNetwork, clock: &Arc<dyn Clock>, alpha: DomainId) -> Result<()> {
    let (secret, hash_lock) = generate_secret();
    let timelock = clock.now() + SWAP_WINDOW_SECS;

    let node = network.node(alpha)?;
    let mut node = node.lock();
    let id = node
        .shared_secret()
        .create(ALICE, Some(BOB), hash_lock, timelock, TOKEN_A, 50)?;
    node.shared_secret().withdraw(BOB, id, secret.reveal())?;

    let bob_a = node.ledger().balance_of(TOKEN_A, BOB)?;
    info!(swap_id = %id, bob_token_a = bob_a, "Shared-secret swap withdrawn");
    Ok(())
}
