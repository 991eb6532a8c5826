//! # Module Guard
//!
//! The owner + authority pair every gated module keeps in its storage.
//!
//! ## Authorization rule
//!
//! A call from `caller` to `selector` on module `module` is allowed when:
//!
//! 1. `caller == module` (the module calling itself), or
//! 2. `caller` is the module owner, or
//! 3. an authority is referenced and it answers `can_call` with `true`.
//!
//! With no authority referenced, only rules 1 and 2 apply. Rejections are
//! logged at `warn` and surface as [`AuthorityError::Unauthorized`].

use atlas_core::{Address, Selector};
use serde::{Deserialize, Serialize};

use crate::directory::AuthorityDirectory;
use crate::error::AuthorityError;

/// Canonical signature of the owner hand-over.
pub const SET_OWNER_SIGNATURE: &str = "setOwner(address)";

/// Canonical signature of the authority swap.
pub const SET_AUTHORITY_SIGNATURE: &str = "setAuthority(address)";

/// Owner and current authority reference of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guard {
    owner: Address,
    authority: Option<Address>,
}

impl Guard {
    /// A guard owned by `owner` with no authority referenced.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            authority: None,
        }
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Address of the referenced authority, if any.
    pub fn authority(&self) -> Option<Address> {
        self.authority
    }

    /// Whether the call is allowed under the authorization rule.
    pub fn is_authorized(
        &self,
        directory: &AuthorityDirectory,
        caller: &Address,
        module: &Address,
        selector: Selector,
    ) -> bool {
        if caller == module || *caller == self.owner {
            return true;
        }
        match &self.authority {
            Some(authority) => directory.can_call(authority, caller, module, selector),
            None => false,
        }
    }

    /// Fail with `Unauthorized` unless the call is allowed.
    pub fn ensure(
        &self,
        directory: &AuthorityDirectory,
        caller: &Address,
        module: &Address,
        selector: Selector,
    ) -> Result<(), AuthorityError> {
        if self.is_authorized(directory, caller, module, selector) {
            return Ok(());
        }
        tracing::warn!(
            %caller,
            target = %module,
            %selector,
            authority = ?self.authority,
            "call rejected by authority"
        );
        Err(AuthorityError::Unauthorized {
            caller: *caller,
            target: *module,
            selector,
        })
    }

    /// Hand the module to a new owner. Owner only.
    pub fn set_owner(
        &mut self,
        caller: &Address,
        module: &Address,
        new_owner: Address,
    ) -> Result<(), AuthorityError> {
        self.require_owner(caller, module, SET_OWNER_SIGNATURE)?;
        tracing::info!(%module, old = %self.owner, new = %new_owner, "owner changed");
        self.owner = new_owner;
        Ok(())
    }

    /// Point the module at a different authority, or at none. Owner only.
    ///
    /// The new authority must already be installed in `directory`. Grants
    /// held by the previous authority stop applying immediately.
    pub fn set_authority(
        &mut self,
        directory: &AuthorityDirectory,
        caller: &Address,
        module: &Address,
        authority: Option<Address>,
    ) -> Result<(), AuthorityError> {
        self.require_owner(caller, module, SET_AUTHORITY_SIGNATURE)?;
        if let Some(address) = authority {
            if !directory.contains(&address) {
                return Err(AuthorityError::UnknownAuthority(address));
            }
        }
        tracing::info!(%module, authority = ?authority, "authority changed");
        self.authority = authority;
        Ok(())
    }

    fn require_owner(
        &self,
        caller: &Address,
        module: &Address,
        signature: &str,
    ) -> Result<(), AuthorityError> {
        if *caller != self.owner {
            let selector = Selector::of(signature);
            tracing::warn!(%caller, target = %module, %selector, "owner-only call rejected");
            return Err(AuthorityError::Unauthorized {
                caller: *caller,
                target: *module,
                selector,
            });
        }
        Ok(())
    }
}
