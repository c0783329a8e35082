//! # Record Arena
//!
//! Id-indexed storage for a registry's records. Records are never removed;
//! `ids()` returns them in creation order.

use super::entities::EscrowRecord;
use super::errors::SwapError;
use std::collections::HashMap;
use swap_types::{Amount, SwapId, TokenId};

/// Append-only record store keyed by swap id.
#[derive(Debug, Clone)]
pub struct SwapArena<R> {
    records: Vec<R>,
    index: HashMap<SwapId, usize>,
}

impl<R> Default for SwapArena<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<R: EscrowRecord> SwapArena<R> {
    /// Empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new record. Fails if the id is taken.
    pub fn insert(&mut self, record: R) -> Result<(), SwapError> {
        let id = record.id();
        if self.index.contains_key(&id) {
            return Err(SwapError::DuplicateSwap(id));
        }
        self.index.insert(id, self.records.len());
        self.records.push(record);
        Ok(())
    }

    /// True if a record exists for `id`.
    pub fn contains(&self, id: &SwapId) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a record.
    pub fn get(&self, id: &SwapId) -> Option<&R> {
        self.index.get(id).map(|&slot| &self.records[slot])
    }

    /// Look up a record for mutation.
    pub fn get_mut(&mut self, id: &SwapId) -> Option<&mut R> {
        match self.index.get(id) {
            Some(&slot) => self.records.get_mut(slot),
            None => None,
        }
    }

    /// Look up a record or fail with `NotFound`.
    pub fn require(&self, id: &SwapId) -> Result<&R, SwapError> {
        self.get(id).ok_or(SwapError::NotFound(*id))
    }

    /// Every id in creation order.
    pub fn ids(&self) -> Vec<SwapId> {
        self.records.iter().map(EscrowRecord::id).collect()
    }

    /// Iterate records in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no record was ever created.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of pending escrow in `token`. Must equal the registry's holding.
    pub fn pending_escrow(&self, token: TokenId) -> Amount {
        self.records
            .iter()
            .filter_map(EscrowRecord::escrow)
            .filter(|(t, _)| *t == token)
            .map(|(_, amount)| amount)
            .sum()
    }
}
