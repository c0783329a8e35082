//! # Router Enrollment
//!
//! Trust table mapping each remote domain to the single address allowed to
//! originate messages from it. Outbound messages are addressed to the same
//! router.

use crate::domain::SwapError;
use std::collections::BTreeMap;
use swap_types::{Address, DomainId};
use tracing::{info, warn};

/// Remote routers trusted by one registry.
#[derive(Clone, Debug)]
pub struct RouterEnrollment {
    owner: Address,
    routers: BTreeMap<DomainId, Address>,
}

impl RouterEnrollment {
    /// Empty table administered by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            routers: BTreeMap::new(),
        }
    }

    /// Administrator of the table.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Trust `router` as the only origin on `domain`. Replaces any previous
    /// entry and returns it.
    pub fn enroll(
        &mut self,
        caller: Address,
        domain: DomainId,
        router: Address,
    ) -> Result<Option<Address>, SwapError> {
        if caller != self.owner {
            return Err(SwapError::NotOwner { caller });
        }
        let previous = self.routers.insert(domain, router);
        match previous {
            Some(old) if old != router => warn!(
                "[swap-htlc] Router for {} replaced: {} -> {}",
                domain, old, router
            ),
            _ => info!("[swap-htlc] Enrolled router {} for {}", router, domain),
        }
        Ok(previous)
    }

    /// Stop trusting `domain`.
    pub fn unenroll(
        &mut self,
        caller: Address,
        domain: DomainId,
    ) -> Result<Option<Address>, SwapError> {
        if caller != self.owner {
            return Err(SwapError::NotOwner { caller });
        }
        Ok(self.routers.remove(&domain))
    }

    /// Enrolled router of `domain`.
    pub fn router_for(&self, domain: DomainId) -> Option<Address> {
        self.routers.get(&domain).copied()
    }

    /// Enrolled router of `domain`, or `NoRouterEnrolled`.
    pub fn require_router(&self, domain: DomainId) -> Result<Address, SwapError> {
        self.router_for(domain)
            .ok_or(SwapError::NoRouterEnrolled(domain))
    }

    /// Accept a message only from the router enrolled for its origin domain.
    pub fn verify_origin(&self, domain: DomainId, sender: Address) -> Result<(), SwapError> {
        match self.routers.get(&domain) {
            Some(router) if *router == sender => Ok(()),
            _ => Err(SwapError::UntrustedOrigin { domain, sender }),
        }
    }

    /// Enrolled domains in ascending order.
    pub fn domains(&self) -> Vec<DomainId> {
        self.routers.keys().copied().collect()
    }
}
