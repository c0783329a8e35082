//! In-Memory Ledger Adapter
//!
//! Implements `AssetTransferPort` over a per-token balance table with
//! ERC-20 style allowances.

use crate::domain::AssetError;
use crate::ports::{AssetTransferPort, LedgerTransfer};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use swap_types::{Address, Amount, TokenId};
use tracing::debug;

#[derive(Clone, Default)]
struct LedgerState {
    tokens: HashSet<TokenId>,
    balances: HashMap<(TokenId, Address), Amount>,
    allowances: HashMap<(TokenId, Address, Address), Amount>,
}

impl LedgerState {
    fn known(&self, token: TokenId) -> Result<(), AssetError> {
        if self.tokens.contains(&token) {
            Ok(())
        } else {
            Err(AssetError::UnknownToken(token))
        }
    }

    fn balance(&self, token: TokenId, holder: Address) -> Amount {
        self.balances.get(&(token, holder)).copied().unwrap_or(0)
    }

    fn check_balance(
        &self,
        token: TokenId,
        holder: Address,
        amount: Amount,
    ) -> Result<(), AssetError> {
        let available = self.balance(token, holder);
        if available < amount {
            return Err(AssetError::InsufficientBalance {
                token,
                holder,
                required: amount,
                available,
            });
        }
        Ok(())
    }

    fn move_balance(&mut self, token: TokenId, from: Address, to: Address, amount: Amount) {
        *self.balances.entry((token, from)).or_default() -= amount;
        *self.balances.entry((token, to)).or_default() += amount;
    }

    fn apply(&mut self, op: &LedgerTransfer) -> Result<(), AssetError> {
        match *op {
            LedgerTransfer::Transfer {
                token,
                from,
                to,
                amount,
            } => {
                self.known(token)?;
                self.check_balance(token, from, amount)?;
                self.move_balance(token, from, to, amount);
            }
            LedgerTransfer::TransferFrom {
                token,
                spender,
                owner,
                to,
                amount,
            } => {
                self.known(token)?;
                let approved = self
                    .allowances
                    .get(&(token, owner, spender))
                    .copied()
                    .unwrap_or(0);
                if approved < amount {
                    return Err(AssetError::InsufficientAllowance {
                        token,
                        owner,
                        required: amount,
                        available: approved,
                    });
                }
                self.check_balance(token, owner, amount)?;
                self.allowances
                    .insert((token, owner, spender), approved - amount);
                self.move_balance(token, owner, to, amount);
            }
        }
        Ok(())
    }
}

/// Ledger for tests and the demo node.
#[derive(Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
    should_fail: AtomicBool,
}

impl InMemoryLedger {
    /// Empty ledger with no tokens.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` of `token` to `holder`, registering the token.
    pub fn mint(&self, token: TokenId, holder: Address, amount: Amount) {
        let mut state = self.state.write();
        state.tokens.insert(token);
        *state.balances.entry((token, holder)).or_default() += amount;
        debug!("[swap-htlc] Minted {} of {} to {}", amount, token, holder);
    }

    /// Set `spender`'s allowance over `owner`'s `token`.
    pub fn approve(&self, token: TokenId, owner: Address, spender: Address, amount: Amount) {
        self.state
            .write()
            .allowances
            .insert((token, owner, spender), amount);
    }

    /// Make every subsequent call fail with `Unavailable`.
    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Sum of all balances of `token`.
    pub fn total_supply(&self, token: TokenId) -> Amount {
        self.state
            .read()
            .balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .map(|(_, amount)| *amount)
            .sum()
    }

    fn check_available(&self) -> Result<(), AssetError> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(AssetError::Unavailable("ledger offline".into()));
        }
        Ok(())
    }
}

impl AssetTransferPort for InMemoryLedger {
    fn balance_of(&self, token: TokenId, holder: Address) -> Result<Amount, AssetError> {
        self.check_available()?;
        let state = self.state.read();
        state.known(token)?;
        Ok(state.balance(token, holder))
    }

    fn allowance(
        &self,
        token: TokenId,
        owner: Address,
        spender: Address,
    ) -> Result<Amount, AssetError> {
        self.check_available()?;
        let state = self.state.read();
        state.known(token)?;
        Ok(state
            .allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or(0))
    }

    fn transfer(
        &self,
        token: TokenId,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError> {
        self.execute(&[LedgerTransfer::Transfer {
            token,
            from,
            to,
            amount,
        }])
    }

    fn transfer_from(
        &self,
        token: TokenId,
        spender: Address,
        owner: Address,
        to: Address,
        amount: Amount,
    ) -> Result<(), AssetError> {
        self.execute(&[LedgerTransfer::TransferFrom {
            token,
            spender,
            owner,
            to,
            amount,
        }])
    }

    fn execute(&self, batch: &[LedgerTransfer]) -> Result<(), AssetError> {
        self.check_available()?;
        let mut state = self.state.write();
        if let [single] = batch {
            // Checks precede mutation within one transfer
            return state.apply(single);
        }
        let mut staged = state.clone();
        for op in batch {
            staged.apply(op)?;
        }
        *state = staged;
        Ok(())
    }
}
