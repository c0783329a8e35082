//! # Router Relay Under Faults
//!
//! Redelivery, lost hops, refused dispatches and foreign routers.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use swap_htlc::{CrossDomainTransport, ReceiptState, ReceiverRegistryConfig, SwapError, SwapState};
    use swap_node::NodeConfig;

    fn intent_state(net: &Devnet, id: swap_types::SwapId) -> SwapState {
        net.node(ALPHA).lock().sender().get(&id).unwrap().state
    }

    fn receipt_state(net: &Devnet, id: swap_types::SwapId) -> ReceiptState {
        net.node(BETA).lock().receiver().get(&id).unwrap().state
    }

    // =============================================================================
    // IDEMPOTENT DELIVERY
    // =============================================================================

    #[test]
    fn test_replayed_hops_are_duplicates() {
        let net = Devnet::new();
        let timelock = net.now() + 60;
        let id = net.open_relay_intent(timelock, 5, 10);
        net.accept_relay_intent(timelock, 5, 10);
        let hub = net.network.mailbox();

        let confirmation = hub.peek(ALPHA);
        assert_eq!(confirmation.len(), 1);
        assert_eq!(net.relayer.pump().applied, 1);

        let completion = hub.peek(BETA);
        assert_eq!(completion.len(), 1);
        assert_eq!(net.relayer.pump().applied, 1);

        // Transport retries both hops
        for envelope in confirmation.into_iter().chain(completion) {
            hub.requeue(envelope);
        }
        let report = net.relay();
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.applied, 0);
        assert_eq!(report.rejected, 0);

        assert_eq!(net.balance(ALPHA, TOKEN_A, BOB), 5);
        assert_eq!(net.balance(BETA, TOKEN_B, ALICE), 10);
        assert_eq!(intent_state(&net, id), SwapState::Withdrawn);
        assert_eq!(receipt_state(&net, id), ReceiptState::Confirmed);
    }

    // =============================================================================
    // LOST HOPS
    // =============================================================================

    #[test]
    fn test_lost_confirmation_both_sides_refund() {
        let net = Devnet::new();
        let timelock = net.now() + 60;
        let id = net.open_relay_intent(timelock, 5, 10);
        net.accept_relay_intent(timelock, 5, 10);

        let lost = net.network.mailbox().drain(ALPHA, usize::MAX);
        assert_eq!(lost.len(), 1);
        assert!(net.relay().is_idle());

        net.advance(60);
        net.node(ALPHA).lock().sender().refund(ALICE, id).unwrap();
        net.node(BETA).lock().receiver().refund(BOB, id).unwrap();

        assert_eq!(net.balance(ALPHA, TOKEN_A, ALICE), FUNDS);
        assert_eq!(net.balance(BETA, TOKEN_B, BOB), FUNDS);
        assert_eq!(intent_state(&net, id), SwapState::Refunded);
        assert_eq!(receipt_state(&net, id), ReceiptState::Refunded);
    }

    #[test]
    fn test_lost_completion_leaves_receipt_refundable() {
        let net = Devnet::new();
        let timelock = net.now() + 60;
        let id = net.open_relay_intent(timelock, 5, 10);
        net.accept_relay_intent(timelock, 5, 10);

        assert_eq!(net.relayer.pump().applied, 1);
        let lost = net.network.mailbox().drain(BETA, usize::MAX);
        assert_eq!(lost.len(), 1);

        // Alpha has paid, beta still holds Bob's escrow
        assert_eq!(intent_state(&net, id), SwapState::Withdrawn);
        assert_eq!(receipt_state(&net, id), ReceiptState::Pending);
        assert_eq!(net.balance(ALPHA, TOKEN_A, BOB), 5);

        net.advance(60);
        net.node(BETA).lock().receiver().refund(BOB, id).unwrap();
        assert_eq!(receipt_state(&net, id), ReceiptState::Refunded);
        assert_eq!(net.balance(BETA, TOKEN_B, BOB), FUNDS);
        assert_eq!(net.balance(BETA, TOKEN_B, ALICE), 0);

        // A straggling copy now finds a terminal receipt
        net.network.mailbox().requeue(lost.into_iter().next().unwrap());
        let report = net.relay();
        assert_eq!(report.duplicates, 1);
        assert_eq!(net.balance(BETA, TOKEN_B, ALICE), 0);
    }

    #[test]
    fn test_refund_grace_lets_late_completion_land() {
        let config = NodeConfig {
            receiver: ReceiverRegistryConfig {
                refund_grace_secs: 30,
            },
            ..NodeConfig::default()
        };
        let net = Devnet::with_config(config);
        let timelock = net.now() + 60;
        let id = net.open_relay_intent(timelock, 5, 10);
        net.accept_relay_intent(timelock, 5, 10);
        assert_eq!(net.relayer.pump().applied, 1);

        net.advance(60);
        assert!(matches!(
            net.node(BETA).lock().receiver().refund(BOB, id),
            Err(SwapError::TimelockNotPassed { .. })
        ));

        let report = net.relay();
        assert_eq!(report.applied, 1);
        assert_eq!(receipt_state(&net, id), ReceiptState::Confirmed);
        assert_eq!(net.balance(BETA, TOKEN_B, ALICE), 10);
    }

    #[test]
    fn test_refund_grace_still_ends() {
        let config = NodeConfig {
            receiver: ReceiverRegistryConfig {
                refund_grace_secs: 30,
            },
            ..NodeConfig::default()
        };
        let net = Devnet::with_config(config);
        let timelock = net.now() + 60;
        let id = net.open_relay_intent(timelock, 5, 10);
        net.accept_relay_intent(timelock, 5, 10);
        net.network.mailbox().drain(ALPHA, usize::MAX);

        net.advance(89);
        assert!(net.node(BETA).lock().receiver().refund(BOB, id).is_err());
        net.advance(1);
        net.node(BETA).lock().receiver().refund(BOB, id).unwrap();
        assert_eq!(net.balance(BETA, TOKEN_B, BOB), FUNDS);
    }

    // =============================================================================
    // REFUSED DISPATCH
    // =============================================================================

    #[test]
    fn test_refused_dispatch_is_retained_and_resent() {
        let net = Devnet::new();
        let timelock = net.now() + 60;
        let id = net.open_relay_intent(timelock, 5, 10);

        net.network.mailbox().set_offline(BETA, true);
        net.accept_relay_intent(timelock, 5, 10);
        // The receipt committed even though nothing left beta
        assert_eq!(receipt_state(&net, id), ReceiptState::Pending);
        assert_eq!(net.node(BETA).lock().retained_dispatches(), 1);
        assert_eq!(net.network.mailbox().pending(ALPHA), 0);

        let report = net.relay();
        assert_eq!(report.redispatched, 0);
        assert_eq!(net.node(BETA).lock().retained_dispatches(), 1);

        net.network.mailbox().set_offline(BETA, false);
        let report = net.relay();
        assert_eq!(report.redispatched, 1);
        assert_eq!(report.applied, 2);
        assert_eq!(net.node(BETA).lock().retained_dispatches(), 0);
        assert_eq!(intent_state(&net, id), SwapState::Withdrawn);
        assert_eq!(receipt_state(&net, id), ReceiptState::Confirmed);
    }

    // =============================================================================
    // FOREIGN ROUTERS AND LATE CONFIRMATIONS
    // =============================================================================

    #[test]
    fn test_router_of_other_domain_cannot_confirm() {
        let net = Devnet::three_domains();
        let timelock = net.now() + 60;
        let alpha_cfg = net.config(ALPHA);
        let gamma_cfg = net.config(GAMMA);
        let id = net.open_relay_intent(timelock, 5, 10);

        // Gamma's router is trusted on alpha, but not for a beta-bound intent
        net.network
            .mailbox()
            .handle(GAMMA)
            .dispatch(
                gamma_cfg.receiver_registry,
                ALPHA,
                alpha_cfg.sender_registry,
                Devnet::confirm_withdrawal_body(id, EVE),
            )
            .unwrap();

        let report = net.relay();
        assert_eq!(report.rejected, 1);
        assert_eq!(report.applied, 0);
        assert_eq!(intent_state(&net, id), SwapState::Pending);
        assert_eq!(net.balance(ALPHA, TOKEN_A, EVE), 0);
    }

    #[test]
    fn test_late_confirmation_rejected_then_both_refund() {
        let net = Devnet::new();
        let timelock = net.now() + 60;
        let id = net.open_relay_intent(timelock, 5, 10);
        net.accept_relay_intent(timelock, 5, 10);

        net.advance(60);
        let report = net.relay();
        assert_eq!(report.rejected, 1);
        assert_eq!(report.requeued, 0);
        assert_eq!(intent_state(&net, id), SwapState::Pending);
        assert_eq!(net.network.mailbox().pending(BETA), 0);

        net.node(ALPHA).lock().sender().refund(ALICE, id).unwrap();
        net.node(BETA).lock().receiver().refund(BOB, id).unwrap();
        assert_eq!(net.balance(ALPHA, TOKEN_A, ALICE), FUNDS);
        assert_eq!(net.balance(BETA, TOKEN_B, BOB), FUNDS);
        assert_eq!(net.balance(ALPHA, TOKEN_A, BOB), 0);
    }
}
