//! # Swap Benchmarks
//!
//! | Area | Operation |
//! |------|-----------|
//! | Identity | SHA-256 id derivation per variant |
//! | Secrets | hash-lock computation and preimage check |
//! | Registry | create + withdraw round on a populated registry |
//! | Routing | router message codec |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use std::sync::Arc;
use swap_htlc::{
    derive_predefined_id, derive_relay_id, derive_shared_secret_id, hash_lock_for,
    verify_preimage, InMemoryLedger, ManualClock, PredefinedTerms, RegistryContext, RelayTerms,
    RouterMessage, SharedSecretTerms, SwapRegistry, SwapSecret,
};
use swap_types::{Address, Amount, DomainId, Preimage, SwapId, TokenId};

const ALICE: Address = Address::repeat(0xA1);
const BOB: Address = Address::repeat(0xB0);
const REGISTRY: Address = Address::repeat(0x11);
const TOKEN_A: TokenId = TokenId::repeat(0x70);
const TOKEN_B: TokenId = TokenId::repeat(0x71);
const T0: u64 = 1_700_000_000;

// ============================================================================
// Identity
// ============================================================================

fn bench_id_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap-identity");

    let shared = SharedSecretTerms {
        sender: ALICE,
        receiver: Some(BOB),
        token: TOKEN_A,
        amount: 5,
        hash_lock: hash_lock_for(&Preimage::repeat(0x42)),
        timelock: T0 + 60,
    };
    group.bench_function("derive_shared_secret_id", |b| {
        b.iter(|| black_box(derive_shared_secret_id(black_box(&shared))))
    });

    let predefined = PredefinedTerms {
        sender: ALICE,
        sender_token: TOKEN_A,
        sender_amount: 5,
        receiver_token: TOKEN_B,
        receiver_amount: 10,
        timelock: T0 + 60,
    };
    group.bench_function("derive_predefined_id", |b| {
        b.iter(|| black_box(derive_predefined_id(black_box(&predefined))))
    });

    let relay = RelayTerms {
        sender: ALICE,
        sender_domain: DomainId(1),
        sender_token: TOKEN_A,
        sender_amount: 5,
        receiver_domain: DomainId(2),
        receiver_token: TOKEN_B,
        receiver_amount: 10,
        timelock: T0 + 60,
    };
    group.bench_function("derive_relay_id", |b| {
        b.iter(|| black_box(derive_relay_id(black_box(&relay))))
    });

    group.finish();
}

// ============================================================================
// Secrets
// ============================================================================

fn bench_secret_checks(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap-secrets");
    let mut rng = rand::thread_rng();
    let secret = SwapSecret::new(rng.gen());
    let preimage = secret.reveal();
    let lock = hash_lock_for(&preimage);
    let wrong = Preimage::new(rng.gen());

    group.bench_function("hash_lock_for", |b| {
        b.iter(|| black_box(hash_lock_for(black_box(&preimage))))
    });
    group.bench_function("verify_preimage_match", |b| {
        b.iter(|| black_box(verify_preimage(black_box(&preimage), &lock)))
    });
    group.bench_function("verify_preimage_mismatch", |b| {
        b.iter(|| black_box(verify_preimage(black_box(&wrong), &lock)))
    });

    group.finish();
}

// ============================================================================
// Registry
// ============================================================================

fn registry_with_pending(pending: usize) -> (SwapRegistry, Preimage) {
    let ledger = Arc::new(InMemoryLedger::new());
    ledger.mint(TOKEN_A, ALICE, Amount::MAX / 2);
    ledger.approve(TOKEN_A, ALICE, REGISTRY, Amount::MAX / 2);
    let clock = Arc::new(ManualClock::new(T0));
    let mut registry = SwapRegistry::new(RegistryContext::new(
        DomainId(1),
        REGISTRY,
        ledger,
        clock,
    ));

    let preimage = Preimage::repeat(0x42);
    let lock = hash_lock_for(&preimage);
    for i in 0..pending {
        let amount = 1_000_000 + i as Amount;
        let _ = registry.create(ALICE, Some(BOB), lock, T0 + 3_600, TOKEN_A, amount);
    }
    (registry, preimage)
}

fn bench_registry_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap-registry");

    for pending in [0usize, 100, 1_000, 10_000] {
        let (mut registry, preimage) = registry_with_pending(pending);
        let lock = hash_lock_for(&preimage);
        let mut amount: Amount = 0;

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("create_withdraw", pending),
            &pending,
            |b, _| {
                b.iter(|| {
                    amount += 1;
                    let id: SwapId = registry
                        .create(ALICE, Some(BOB), lock, T0 + 60, TOKEN_A, amount)
                        .unwrap_or_default();
                    black_box(registry.withdraw(BOB, id, preimage).is_ok())
                })
            },
        );
    }

    group.finish();
}

// ============================================================================
// Routing
// ============================================================================

fn bench_router_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("swap-routing");
    let message = RouterMessage::ConfirmWithdrawal {
        id: SwapId::repeat(0x5A),
        receiver: BOB,
    };
    let body = message.encode().unwrap_or_default();

    group.bench_function("encode_confirm_withdrawal", |b| {
        b.iter(|| black_box(black_box(&message).encode().is_ok()))
    });
    group.bench_function("decode_confirm_withdrawal", |b| {
        b.iter(|| black_box(RouterMessage::decode(black_box(&body)).is_ok()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_id_derivation,
    bench_secret_checks,
    bench_registry_round,
    bench_router_codec,
);

criterion_main!(benches);
