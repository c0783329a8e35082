//! # Devnet Fixture
//!
//! A two-domain network on a manual clock with funded, approved parties.
//!
//! Every domain mints `FUNDS` of `TOKEN_A` to Alice and `FUNDS` of
//! `TOKEN_B` to Bob, and both parties approve every registry on every
//! domain for the full amount.

use std::sync::Arc;

use swap_htlc::{AssetTransferPort, ManualClock, RouterMessage};
use swap_node::{DomainConfig, NodeConfig, RelayReport, Relayer, SharedDomain, SwapNetwork};
use swap_types::{Address, Amount, DomainId, SwapId, Timestamp, TokenId};

pub const ALICE: Address = Address::repeat(0xA1);
pub const BOB: Address = Address::repeat(0xB0);
pub const EVE: Address = Address::repeat(0xEE);
pub const TOKEN_A: TokenId = TokenId::repeat(0x70);
pub const TOKEN_B: TokenId = TokenId::repeat(0x71);
pub const ALPHA: DomainId = DomainId(1);
pub const BETA: DomainId = DomainId(2);
pub const GAMMA: DomainId = DomainId(3);
pub const T0: Timestamp = 1_700_000_000;
pub const FUNDS: Amount = 1_000;

/// Sweeps before a relay loop is considered stuck.
const MAX_SWEEPS: usize = 16;

pub struct Devnet {
    pub network: SwapNetwork,
    pub clock: Arc<ManualClock>,
    pub relayer: Relayer,
}

impl Devnet {
    /// Alpha and beta.
    pub fn new() -> Self {
        Self::with_config(NodeConfig::default())
    }

    /// Alpha, beta and gamma.
    pub fn three_domains() -> Self {
        let mut config = NodeConfig::default();
        config.domains.push(DomainConfig::devnet(3, "gamma"));
        Self::with_config(config)
    }

    pub fn with_config(config: NodeConfig) -> Self {
        let clock = Arc::new(ManualClock::new(T0));
        let network = SwapNetwork::from_config(&config, clock.clone()).expect("valid config");
        let relayer = Relayer::new(&network, config.relayer.clone());

        for node in network.nodes().values() {
            let node = node.lock();
            let ledger = node.ledger();
            ledger.mint(TOKEN_A, ALICE, FUNDS);
            ledger.mint(TOKEN_B, BOB, FUNDS);
            for registry in node.config().registry_addresses() {
                ledger.approve(TOKEN_A, ALICE, registry, FUNDS);
                ledger.approve(TOKEN_B, BOB, registry, FUNDS);
            }
        }

        Self {
            network,
            clock,
            relayer,
        }
    }

    pub fn node(&self, domain: DomainId) -> SharedDomain {
        self.network.node(domain).expect("hosted domain")
    }

    pub fn config(&self, domain: DomainId) -> DomainConfig {
        self.node(domain).lock().config().clone()
    }

    pub fn balance(&self, domain: DomainId, token: TokenId, holder: Address) -> Amount {
        self.node(domain)
            .lock()
            .ledger()
            .balance_of(token, holder)
            .expect("known token")
    }

    pub fn now(&self) -> Timestamp {
        use swap_htlc::Clock;
        self.clock.now()
    }

    pub fn advance(&self, secs: u64) {
        self.clock.advance_time(secs);
    }

    /// Sweep until the mailbox is quiet.
    pub fn relay(&self) -> RelayReport {
        self.relayer.pump_until_idle(MAX_SWEEPS)
    }

    /// Alice offers `give` of A on alpha for `want` of B on beta.
    pub fn open_relay_intent(&self, timelock: Timestamp, give: Amount, want: Amount) -> SwapId {
        self.node(ALPHA)
            .lock()
            .sender()
            .new_contract(ALICE, timelock, TOKEN_A, give, BETA, TOKEN_B, want)
            .expect("intent created")
    }

    /// Bob accepts the matching intent on beta.
    pub fn accept_relay_intent(&self, timelock: Timestamp, give: Amount, want: Amount) -> SwapId {
        self.node(BETA)
            .lock()
            .receiver()
            .start_withdrawal(BOB, timelock, ALICE, ALPHA, TOKEN_A, give, TOKEN_B, want)
            .expect("withdrawal started")
    }

    /// Body of a `ConfirmWithdrawal` naming `receiver`.
    pub fn confirm_withdrawal_body(id: SwapId, receiver: Address) -> Vec<u8> {
        RouterMessage::ConfirmWithdrawal { id, receiver }
            .encode()
            .expect("encodable")
    }
}

impl Default for Devnet {
    fn default() -> Self {
        Self::new()
    }
}
