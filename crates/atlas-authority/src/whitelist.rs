//! # Whitelist Authority
//!
//! Coarse grants: a caller is either fully trusted by a target module or
//! not at all. This is the pattern used to let an issuance module mint on
//! the ownership ledger: whitelist the issuer for the ledger, done.

use std::any::Any;
use std::collections::BTreeSet;

use atlas_core::{Address, Selector};
use serde::{Deserialize, Serialize};

use crate::authority::Authority;
use crate::error::AuthorityError;

/// Canonical signature of the whitelist mutator.
pub const SET_WHITELIST_SIGNATURE: &str = "setWhitelist(address,address,bool)";

/// Canonical signature of the admin hand-over.
pub const TRANSFER_ADMIN_SIGNATURE: &str = "transferAdmin(address)";

/// Authority granting all operations on a target to whitelisted callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhitelistAuthority {
    address: Address,
    admin: Address,
    /// (target, caller) pairs that are allowed.
    entries: BTreeSet<(Address, Address)>,
}

impl WhitelistAuthority {
    /// Create an empty whitelist controlled by `admin`.
    pub fn new(address: Address, admin: Address) -> Self {
        Self {
            address,
            admin,
            entries: BTreeSet::new(),
        }
    }

    /// Create a whitelist that trusts `callers` on `target` from the start.
    pub fn with_callers(
        address: Address,
        admin: Address,
        target: Address,
        callers: impl IntoIterator<Item = Address>,
    ) -> Self {
        let entries = callers.into_iter().map(|c| (target, c)).collect();
        Self {
            address,
            admin,
            entries,
        }
    }

    /// Controlling account.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// Whether `caller` is whitelisted on `target`.
    pub fn is_whitelisted(&self, target: &Address, caller: &Address) -> bool {
        self.entries.contains(&(*target, *caller))
    }

    /// Set or clear the flag for (target, caller). Admin only.
    pub fn set_whitelist(
        &mut self,
        admin: &Address,
        target: Address,
        caller: Address,
        allowed: bool,
    ) -> Result<(), AuthorityError> {
        self.require_admin(admin, SET_WHITELIST_SIGNATURE)?;
        if allowed {
            self.entries.insert((target, caller));
        } else {
            self.entries.remove(&(target, caller));
        }
        tracing::info!(
            authority = %self.address,
            %target,
            %caller,
            allowed,
            "whitelist updated"
        );
        Ok(())
    }

    /// Hand control to a new admin. Admin only.
    pub fn transfer_admin(
        &mut self,
        admin: &Address,
        new_admin: Address,
    ) -> Result<(), AuthorityError> {
        self.require_admin(admin, TRANSFER_ADMIN_SIGNATURE)?;
        self.admin = new_admin;
        Ok(())
    }

    fn require_admin(&self, caller: &Address, signature: &str) -> Result<(), AuthorityError> {
        if *caller != self.admin {
            return Err(AuthorityError::Unauthorized {
                caller: *caller,
                target: self.address,
                selector: Selector::of(signature),
            });
        }
        Ok(())
    }
}

impl Authority for WhitelistAuthority {
    fn address(&self) -> Address {
        self.address
    }

    fn can_call(&self, caller: &Address, target: &Address, _selector: Selector) -> bool {
        self.is_whitelisted(target, caller)
    }

    fn authority_name(&self) -> &str {
        "WhitelistAuthority"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(label: &str) -> Address {
        Address::derive(label)
    }

    #[test]
    fn test_grant_is_per_target() {
        let mut auth = WhitelistAuthority::new(addr("auth"), addr("admin"));
        auth.set_whitelist(&addr("admin"), addr("ledger"), addr("issuer"), true)
            .unwrap();
        let any_op = Selector::of("anything()");
        assert!(auth.can_call(&addr("issuer"), &addr("ledger"), any_op));
        assert!(!auth.can_call(&addr("issuer"), &addr("location"), any_op));
        assert!(!auth.can_call(&addr("stranger"), &addr("ledger"), any_op));
    }

    #[test]
    fn test_revoke() {
        let mut auth = WhitelistAuthority::with_callers(
            addr("auth"),
            addr("admin"),
            addr("ledger"),
            [addr("issuer")],
        );
        assert!(auth.is_whitelisted(&addr("ledger"), &addr("issuer")));
        auth.set_whitelist(&addr("admin"), addr("ledger"), addr("issuer"), false)
            .unwrap();
        assert!(!auth.is_whitelisted(&addr("ledger"), &addr("issuer")));
    }

    #[test]
    fn test_non_admin_cannot_mutate() {
        let mut auth = WhitelistAuthority::new(addr("auth"), addr("admin"));
        let err = auth
            .set_whitelist(&addr("mallory"), addr("ledger"), addr("mallory"), true)
            .unwrap_err();
        assert_eq!(
            err,
            AuthorityError::Unauthorized {
                caller: addr("mallory"),
                target: addr("auth"),
                selector: Selector::of(SET_WHITELIST_SIGNATURE),
            }
        );
        assert!(!auth.is_whitelisted(&addr("ledger"), &addr("mallory")));
    }

    #[test]
    fn test_transfer_admin() {
        let mut auth = WhitelistAuthority::new(addr("auth"), addr("admin"));
        auth.transfer_admin(&addr("admin"), addr("ops")).unwrap();
        assert_eq!(auth.admin(), addr("ops"));
        assert!(auth
            .set_whitelist(&addr("admin"), addr("t"), addr("c"), true)
            .is_err());
        assert!(auth
            .set_whitelist(&addr("ops"), addr("t"), addr("c"), true)
            .is_ok());
    }

    #[test]
    fn test_serde_roundtrip_preserves_entries() {
        let auth = WhitelistAuthority::with_callers(
            addr("auth"),
            addr("admin"),
            addr("ledger"),
            [addr("a"), addr("b")],
        );
        let json = serde_json::to_string(&auth).unwrap();
        let back: WhitelistAuthority = serde_json::from_str(&json).unwrap();
        assert!(back.is_whitelisted(&addr("ledger"), &addr("b")));
        assert_eq!(back.admin(), addr("admin"));
    }
}
