//! # Registry Properties
//!
//! Invariants that must hold for every record in every registry:
//! exclusivity of terminal states, conservation of escrow, timelock
//! monotonicity, secret-variant atomicity and duplicate rejection.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;
    use std::fmt::Debug;
    use swap_htlc::{
        generate_secret, hash_lock_for, AssetTransferPort, Envelope, ReceiptState, SwapError,
        SwapSecret, SwapState,
    };
    use swap_types::{Amount, Preimage, SwapId, Timestamp};

    /// Remember the first terminal state seen for `id` and fail if it ever moves.
    fn track_terminal<S: Copy + PartialEq + Debug>(
        settled: &mut HashMap<SwapId, S>,
        id: SwapId,
        state: S,
        terminal: bool,
    ) {
        match settled.get(&id) {
            Some(first) => assert_eq!(state, *first, "terminal state of {id} changed"),
            None if terminal => {
                settled.insert(id, state);
            }
            None => {}
        }
    }

    // =============================================================================
    // EXCLUSIVITY + CONSERVATION
    // =============================================================================

    #[test]
    fn test_random_walk_preserves_escrow_invariants() {
        let net = Devnet::new();
        let registry = net.config(ALPHA).shared_secret_registry;
        let alpha = net.node(ALPHA);
        let mut rng = StdRng::seed_from_u64(0x5EED);
        let mut secrets: Vec<(SwapId, SwapSecret)> = Vec::new();
        let mut settled: HashMap<SwapId, SwapState> = HashMap::new();

        for _ in 0..400 {
            let mut node = alpha.lock();
            match rng.gen_range(0..4) {
                0 => {
                    let (secret, lock) = generate_secret();
                    let amount: Amount = rng.gen_range(1..=20);
                    let timelock = net.now() + rng.gen_range(1..=10);
                    if let Ok(id) = node.shared_secret().create(
                        ALICE,
                        Some(BOB),
                        lock,
                        timelock,
                        TOKEN_A,
                        amount,
                    ) {
                        secrets.push((id, secret));
                    }
                }
                1 if !secrets.is_empty() => {
                    let (id, secret) = &secrets[rng.gen_range(0..secrets.len())];
                    let preimage = if rng.gen_bool(0.8) {
                        secret.reveal()
                    } else {
                        Preimage::repeat(0x42)
                    };
                    let _ = node.shared_secret().withdraw(BOB, *id, preimage);
                }
                2 if !secrets.is_empty() => {
                    let (id, _) = &secrets[rng.gen_range(0..secrets.len())];
                    let _ = node.shared_secret().refund(ALICE, *id);
                }
                _ => net.advance(rng.gen_range(0..=3)),
            }

            let registry_view = node.shared_secret();
            let pending = registry_view.pending_escrow(TOKEN_A);
            let mut paid_to_bob: Amount = 0;
            for id in registry_view.ids() {
                let record = registry_view.get(&id).unwrap();
                track_terminal(&mut settled, id, record.state, record.state.is_terminal());
                match record.state {
                    SwapState::Withdrawn => {
                        assert!(record.preimage.is_some());
                        paid_to_bob += record.amount;
                    }
                    SwapState::Refunded => assert!(record.preimage.is_none()),
                    SwapState::Pending => assert!(record.withdrawn_by.is_none()),
                }
            }

            let ledger = node.ledger();
            let held = ledger.balance_of(TOKEN_A, registry).unwrap();
            let alice = ledger.balance_of(TOKEN_A, ALICE).unwrap();
            let bob = ledger.balance_of(TOKEN_A, BOB).unwrap();
            assert_eq!(held, pending);
            assert_eq!(bob, paid_to_bob);
            assert_eq!(alice + bob + held, FUNDS);
        }

        assert!(!settled.is_empty());
    }

    #[test]
    fn test_random_walk_predefined_preserves_escrow_invariants() {
        let net = Devnet::new();
        let registry = net.config(ALPHA).predefined_registry;
        let alpha = net.node(ALPHA);
        let mut rng = StdRng::seed_from_u64(0xD1CE);
        let mut created: Vec<SwapId> = Vec::new();
        let mut settled: HashMap<SwapId, SwapState> = HashMap::new();

        for _ in 0..400 {
            let mut node = alpha.lock();
            match rng.gen_range(0..4) {
                0 => {
                    let give: Amount = rng.gen_range(1..=20);
                    let want: Amount = rng.gen_range(1..=20);
                    let timelock = net.now() + rng.gen_range(1..=10);
                    if let Ok(id) = node
                        .predefined()
                        .create(ALICE, timelock, TOKEN_A, give, TOKEN_B, want)
                    {
                        created.push(id);
                    }
                }
                1 if !created.is_empty() => {
                    let id = created[rng.gen_range(0..created.len())];
                    let _ = node.predefined().withdraw(BOB, id);
                }
                2 if !created.is_empty() => {
                    let id = created[rng.gen_range(0..created.len())];
                    let _ = node.predefined().refund(ALICE, id);
                }
                _ => net.advance(rng.gen_range(0..=3)),
            }

            let registry_view = node.predefined();
            let pending = registry_view.pending_escrow(TOKEN_A);
            let mut paid_to_bob: Amount = 0;
            let mut paid_to_alice: Amount = 0;
            for id in registry_view.ids() {
                let record = registry_view.get(&id).unwrap();
                track_terminal(&mut settled, id, record.state, record.state.is_terminal());
                if record.state == SwapState::Withdrawn {
                    let mirror = record.counterparty_record.unwrap();
                    assert_eq!(
                        registry_view.get(&mirror).unwrap().counterparty_record,
                        Some(id)
                    );
                    if record.sender == ALICE {
                        paid_to_bob += record.sender_amount;
                        paid_to_alice += record.receiver_amount;
                    }
                } else {
                    assert!(record.counterparty_record.is_none());
                }
            }

            let ledger = node.ledger();
            let held_a = ledger.balance_of(TOKEN_A, registry).unwrap();
            let held_b = ledger.balance_of(TOKEN_B, registry).unwrap();
            let alice_a = ledger.balance_of(TOKEN_A, ALICE).unwrap();
            let bob_a = ledger.balance_of(TOKEN_A, BOB).unwrap();
            let alice_b = ledger.balance_of(TOKEN_B, ALICE).unwrap();
            let bob_b = ledger.balance_of(TOKEN_B, BOB).unwrap();
            assert_eq!(held_a, pending);
            // The reverse leg passes straight through
            assert_eq!(held_b, 0);
            assert_eq!(bob_a, paid_to_bob);
            assert_eq!(alice_b, paid_to_alice);
            assert_eq!(alice_a + bob_a + held_a, FUNDS);
            assert_eq!(alice_b + bob_b, FUNDS);
        }

        assert!(settled.values().any(|s| *s == SwapState::Withdrawn));
        assert!(settled.values().any(|s| *s == SwapState::Refunded));
    }

    #[test]
    fn test_random_walk_relay_preserves_escrow_invariants() {
        let net = Devnet::new();
        let sender_registry = net.config(ALPHA).sender_registry;
        let receiver_registry = net.config(BETA).receiver_registry;
        let hub = net.network.mailbox();
        let mut rng = StdRng::seed_from_u64(0x2E1A);
        let mut intents: Vec<(SwapId, Timestamp, Amount, Amount)> = Vec::new();
        let mut seen: Vec<Envelope> = Vec::new();
        let mut settled_intents: HashMap<SwapId, SwapState> = HashMap::new();
        let mut settled_receipts: HashMap<SwapId, ReceiptState> = HashMap::new();

        for _ in 0..500 {
            match rng.gen_range(0..9) {
                0 => {
                    let give: Amount = rng.gen_range(1..=20);
                    let want: Amount = rng.gen_range(1..=20);
                    let timelock = net.now() + rng.gen_range(1..=15);
                    if let Ok(id) = net
                        .node(ALPHA)
                        .lock()
                        .sender()
                        .new_contract(ALICE, timelock, TOKEN_A, give, BETA, TOKEN_B, want)
                    {
                        intents.push((id, timelock, give, want));
                    }
                }
                1 if !intents.is_empty() => {
                    let (_, timelock, give, want) = intents[rng.gen_range(0..intents.len())];
                    let _ = net.node(BETA).lock().receiver().start_withdrawal(
                        BOB, timelock, ALICE, ALPHA, TOKEN_A, give, TOKEN_B, want,
                    );
                }
                2 | 3 => {
                    seen.extend(hub.peek(ALPHA));
                    seen.extend(hub.peek(BETA));
                    let _ = net.relayer.pump();
                }
                // Transport loses a message
                4 => {
                    let domain = if rng.gen_bool(0.5) { ALPHA } else { BETA };
                    let _ = hub.drain(domain, 1);
                }
                // Transport replays a message
                5 if !seen.is_empty() => {
                    hub.requeue(seen[rng.gen_range(0..seen.len())].clone());
                }
                6 if !intents.is_empty() => {
                    let (id, ..) = intents[rng.gen_range(0..intents.len())];
                    let _ = net.node(ALPHA).lock().sender().refund(ALICE, id);
                }
                7 if !intents.is_empty() => {
                    let (id, ..) = intents[rng.gen_range(0..intents.len())];
                    let _ = net.node(BETA).lock().receiver().refund(BOB, id);
                }
                _ => net.advance(rng.gen_range(0..=3)),
            }

            let mut paid_to_bob: Amount = 0;
            {
                let alpha = net.node(ALPHA);
                let mut alpha = alpha.lock();
                let sender = alpha.sender();
                let pending = sender.pending_escrow(TOKEN_A);
                for id in sender.ids() {
                    let intent = sender.get(&id).unwrap();
                    let terminal = intent.state.is_terminal();
                    track_terminal(&mut settled_intents, id, intent.state, terminal);
                    if intent.state == SwapState::Withdrawn {
                        assert_eq!(intent.receiver, Some(BOB));
                        paid_to_bob += intent.sender_amount;
                    }
                }
                let ledger = alpha.ledger();
                let held = ledger.balance_of(TOKEN_A, sender_registry).unwrap();
                let alice = ledger.balance_of(TOKEN_A, ALICE).unwrap();
                let bob = ledger.balance_of(TOKEN_A, BOB).unwrap();
                assert_eq!(held, pending);
                assert_eq!(bob, paid_to_bob);
                assert_eq!(alice + bob + held, FUNDS);
            }

            let mut paid_to_alice: Amount = 0;
            let mut confirmed: Vec<SwapId> = Vec::new();
            {
                let beta = net.node(BETA);
                let mut beta = beta.lock();
                let receiver = beta.receiver();
                let pending = receiver.pending_escrow(TOKEN_B);
                for id in receiver.ids() {
                    let receipt = receiver.get(&id).unwrap();
                    let terminal = receipt.state.is_terminal();
                    track_terminal(&mut settled_receipts, id, receipt.state, terminal);
                    if receipt.state == ReceiptState::Confirmed {
                        paid_to_alice += receipt.amount;
                        confirmed.push(id);
                    }
                }
                let ledger = beta.ledger();
                let held = ledger.balance_of(TOKEN_B, receiver_registry).unwrap();
                let alice = ledger.balance_of(TOKEN_B, ALICE).unwrap();
                let bob = ledger.balance_of(TOKEN_B, BOB).unwrap();
                assert_eq!(held, pending);
                assert_eq!(alice, paid_to_alice);
                assert_eq!(alice + bob + held, FUNDS);
            }

            // Completion is only ever sent after the intent paid out
            for id in confirmed {
                assert_eq!(settled_intents.get(&id), Some(&SwapState::Withdrawn));
            }
        }

        assert!(settled_receipts
            .values()
            .any(|s| *s == ReceiptState::Confirmed));
        assert!(settled_intents.values().any(|s| *s == SwapState::Refunded));
    }

    #[test]
    fn test_withdrawn_record_cannot_be_refunded() {
        let net = Devnet::new();
        let (secret, lock) = generate_secret();
        let alpha = net.node(ALPHA);
        let mut alpha = alpha.lock();
        let registry = alpha.shared_secret();
        let id = registry
            .create(ALICE, None, lock, net.now() + 10, TOKEN_A, 5)
            .unwrap();
        registry.withdraw(BOB, id, secret.reveal()).unwrap();

        net.advance(10);
        assert_eq!(
            registry.refund(ALICE, id),
            Err(SwapError::AlreadyWithdrawn(id))
        );
        assert_eq!(
            registry.withdraw(BOB, id, secret.reveal()),
            Err(SwapError::AlreadyWithdrawn(id))
        );
    }

    #[test]
    fn test_refunded_record_cannot_be_withdrawn() {
        let net = Devnet::new();
        let (secret, lock) = generate_secret();
        let alpha = net.node(ALPHA);
        let mut alpha = alpha.lock();
        let registry = alpha.shared_secret();
        let id = registry
            .create(ALICE, None, lock, net.now() + 10, TOKEN_A, 5)
            .unwrap();

        net.advance(10);
        registry.refund(ALICE, id).unwrap();
        assert_eq!(
            registry.withdraw(BOB, id, secret.reveal()),
            Err(SwapError::AlreadyRefunded(id))
        );
        assert_eq!(registry.refund(ALICE, id), Err(SwapError::AlreadyRefunded(id)));
    }

    // =============================================================================
    // SECRET-VARIANT ATOMICITY
    // =============================================================================

    #[test]
    fn test_published_preimage_is_the_only_key_to_the_other_leg() {
        let net = Devnet::new();
        let (secret, lock) = generate_secret();
        let timelock = net.now() + 30;

        let leg_a = net
            .node(ALPHA)
            .lock()
            .shared_secret()
            .create(ALICE, Some(BOB), lock, timelock, TOKEN_A, 5)
            .unwrap();
        let leg_b = net
            .node(BETA)
            .lock()
            .shared_secret()
            .create(BOB, None, lock, timelock, TOKEN_B, 10)
            .unwrap();

        net.node(ALPHA)
            .lock()
            .shared_secret()
            .withdraw(BOB, leg_a, secret.reveal())
            .unwrap();
        let published = net
            .node(ALPHA)
            .lock()
            .shared_secret()
            .get(&leg_a)
            .unwrap()
            .preimage
            .unwrap();
        assert_eq!(hash_lock_for(&published), lock);

        let mut rng = StdRng::seed_from_u64(7);
        let beta = net.node(BETA);
        let mut beta = beta.lock();
        for _ in 0..32 {
            let guess = Preimage::new(rng.gen());
            if guess == published {
                continue;
            }
            assert_eq!(
                beta.shared_secret().withdraw(ALICE, leg_b, guess),
                Err(SwapError::InvalidPreimage)
            );
        }
        beta.shared_secret()
            .withdraw(ALICE, leg_b, published)
            .unwrap();
        drop(beta);
        assert_eq!(net.balance(BETA, TOKEN_B, ALICE), 10);
    }

    // =============================================================================
    // TIMELOCK MONOTONICITY
    // =============================================================================

    #[test]
    fn test_timelock_boundaries_shared_secret() {
        let net = Devnet::new();
        let (secret, lock) = generate_secret();
        let alpha = net.node(ALPHA);
        let mut alpha = alpha.lock();
        let registry = alpha.shared_secret();

        let now = net.now();
        assert!(matches!(
            registry.create(ALICE, None, lock, now, TOKEN_A, 5),
            Err(SwapError::InvalidTimelock { .. })
        ));
        let timelock = now + 10;
        let id = registry
            .create(ALICE, None, lock, timelock, TOKEN_A, 5)
            .unwrap();

        net.advance(9);
        assert!(matches!(
            registry.refund(ALICE, id),
            Err(SwapError::TimelockNotPassed { .. })
        ));
        net.advance(1);
        assert!(matches!(
            registry.withdraw(BOB, id, secret.reveal()),
            Err(SwapError::TimelockExpired { .. })
        ));
        registry.refund(ALICE, id).unwrap();
    }

    #[test]
    fn test_timelock_boundaries_predefined() {
        let net = Devnet::new();
        let alpha = net.node(ALPHA);
        let mut alpha = alpha.lock();
        let registry = alpha.predefined();
        let timelock = net.now() + 10;
        let id = registry
            .create(ALICE, timelock, TOKEN_A, 5, TOKEN_B, 10)
            .unwrap();

        net.advance(9);
        assert!(matches!(
            registry.refund(ALICE, id),
            Err(SwapError::TimelockNotPassed { .. })
        ));
        net.advance(1);
        assert!(matches!(
            registry.withdraw(BOB, id),
            Err(SwapError::TimelockExpired { .. })
        ));
        registry.refund(ALICE, id).unwrap();
    }

    #[test]
    fn test_timelock_boundaries_relay_refunds() {
        let net = Devnet::new();
        let timelock = net.now() + 10;
        let id = net.open_relay_intent(timelock, 5, 10);
        net.accept_relay_intent(timelock, 5, 10);

        net.advance(9);
        assert!(matches!(
            net.node(ALPHA).lock().sender().refund(ALICE, id),
            Err(SwapError::TimelockNotPassed { .. })
        ));
        assert!(matches!(
            net.node(BETA).lock().receiver().refund(BOB, id),
            Err(SwapError::TimelockNotPassed { .. })
        ));

        net.advance(1);
        // Confirmation now arrives too late and is refused
        let report = net.relay();
        assert_eq!(report.applied, 0);
        assert_eq!(report.rejected, 1);

        net.node(ALPHA).lock().sender().refund(ALICE, id).unwrap();
        net.node(BETA).lock().receiver().refund(BOB, id).unwrap();
        assert_eq!(net.balance(ALPHA, TOKEN_A, ALICE), FUNDS);
        assert_eq!(net.balance(BETA, TOKEN_B, BOB), FUNDS);
    }

    // =============================================================================
    // NO DOUBLE-SPEND UNDER RETRY
    // =============================================================================

    #[test]
    fn test_identical_create_rejected_as_duplicate() {
        let net = Devnet::new();
        let (_secret, lock) = generate_secret();
        let timelock = net.now() + 10;
        let registry_address = net.config(ALPHA).shared_secret_registry;
        let alpha = net.node(ALPHA);
        let mut alpha = alpha.lock();

        let id = alpha
            .shared_secret()
            .create(ALICE, Some(BOB), lock, timelock, TOKEN_A, 5)
            .unwrap();
        assert_eq!(
            alpha
                .shared_secret()
                .create(ALICE, Some(BOB), lock, timelock, TOKEN_A, 5),
            Err(SwapError::DuplicateSwap(id))
        );
        assert_eq!(alpha.shared_secret().ids(), vec![id]);
        assert_eq!(
            alpha
                .ledger()
                .balance_of(TOKEN_A, registry_address)
                .unwrap(),
            5
        );
    }

    #[test]
    fn test_identical_relay_calls_rejected_as_duplicate() {
        let net = Devnet::new();
        let timelock = net.now() + 10;
        let id = net.open_relay_intent(timelock, 5, 10);
        net.accept_relay_intent(timelock, 5, 10);

        assert_eq!(
            net.node(ALPHA)
                .lock()
                .sender()
                .new_contract(ALICE, timelock, TOKEN_A, 5, BETA, TOKEN_B, 10),
            Err(SwapError::DuplicateSwap(id))
        );
        assert_eq!(
            net.node(BETA)
                .lock()
                .receiver()
                .start_withdrawal(BOB, timelock, ALICE, ALPHA, TOKEN_A, 5, TOKEN_B, 10),
            Err(SwapError::DuplicateSwap(id))
        );
        assert_eq!(net.balance(ALPHA, TOKEN_A, ALICE), FUNDS - 5);
        assert_eq!(net.balance(BETA, TOKEN_B, BOB), FUNDS - 10);
        // Only one request crossed over
        assert_eq!(net.network.mailbox().pending(ALPHA), 1);
    }
}
