//! # Per-Selector Authority
//!
//! Fine grants: a caller is allowed exactly the operations listed for it on
//! a given target. A resource-production module that may mint and burn
//! on a token, but do nothing else there, is expressed as two grants.

use std::any::Any;
use std::collections::BTreeSet;

use atlas_core::{Address, Selector};
use serde::{Deserialize, Serialize};

use crate::authority::Authority;
use crate::error::AuthorityError;

/// Canonical signature of the grant mutator.
pub const SET_GRANT_SIGNATURE: &str = "setGrant(address,address,bytes4,bool)";

/// One permitted (caller, target, selector) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Grant {
    /// Account allowed to call.
    pub caller: Address,
    /// Module the call is aimed at.
    pub target: Address,
    /// Operation allowed.
    pub selector: Selector,
}

/// Authority with an explicit table of permitted operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureAuthority {
    address: Address,
    admin: Address,
    grants: BTreeSet<Grant>,
}

impl SignatureAuthority {
    /// Create an empty table controlled by `admin`.
    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            admin,
            grants: BTreeSet::new(),
        }
    }

    /// Create a table allowing each of `callers` every one of `selectors` on `target`.
    pub fn for_selectors(
        address: Address,
        admin: Address,
        target: Address,
        callers: &[Address],
        selectors: &[Selector],
    ) -> Self {
        let grants = callers
            .iter()
            .flat_map(|caller| {
                selectors.iter().map(move |selector| Grant {
                    caller: *caller,
                    target,
                    selector: *selector,
                })
            })
            .collect();
        Self {
            address,
            admin,
            grants,
        }
    }

    /// Controlling account.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// All grants in deterministic order.
    pub fn grants(&self) -> impl Iterator<Item = &Grant> {
        self.grants.iter()
    }

    /// Add or remove one grant. Admin only.
    pub fn set_grant(
        &mut self,
        admin: &Address,
        grant: Grant,
        allowed: bool,
    ) -> Result<(), AuthorityError> {
        if *admin != self.admin {
            return Err(AuthorityError::Unauthorized {
                caller: *admin,
                target: self.address,
                selector: Selector::of(SET_GRANT_SIGNATURE),
            });
        }
        if allowed {
            self.grants.insert(grant);
        } else {
            self.grants.remove(&grant);
        }
        tracing::info!(
            authority = %self.address,
            caller = %grant.caller,
            target = %grant.target,
            selector = %grant.selector,
            allowed,
            "grant updated"
        );
        Ok(())
    }
}

impl Authority for SignatureAuthority {
    fn address(&self) -> Address {
        self.address
    }

    fn can_call(&self, caller: &Address, target: &Address, selector: Selector) -> bool {
        self.grants.contains(&Grant {
            caller: *caller,
            target: *target,
            selector,
        })
    }

    fn authority_name(&self) -> &str {
        "SignatureAuthority"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
