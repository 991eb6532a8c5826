//! # Authority Directory
//!
//! Installed authorities keyed by address. Gated modules store only the
//! address of their current authority and resolve it here on every check,
//! so the rules an authority holds can change (or a different authority
//! can be referenced) without redeploying the module.

use std::collections::BTreeMap;

use atlas_core::{Address, Selector};

use crate::authority::Authority;
use crate::error::AuthorityError;

/// Address-keyed set of installed authorities.
#[derive(Default)]
pub struct AuthorityDirectory {
    authorities: BTreeMap<Address, Box<dyn Authority>>,
}

impl AuthorityDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install an authority at its own address.
    ///
    /// Returns the address. Fails if the address is zero or already taken.
    pub fn install(&mut self, authority: Box<dyn Authority>) -> Result<Address, AuthorityError> {
        let address = authority.address();
        if address.is_zero() || self.authorities.contains_key(&address) {
            return Err(AuthorityError::AddressInUse(address));
        }
        tracing::info!(
            %address,
            kind = authority.authority_name(),
            "authority installed"
        );
        self.authorities.insert(address, authority);
        Ok(address)
    }

    /// Whether an authority is installed at `address`.
    pub fn contains(&self, address: &Address) -> bool {
        self.authorities.contains_key(address)
    }

    /// The authority installed at `address`.
    pub fn get(&self, address: &Address) -> Option<&dyn Authority> {
        self.authorities.get(address).map(|a| &**a)
    }

    /// Typed read access to the authority at `address`.
    pub fn get_as<A: Authority>(&self, address: &Address) -> Result<&A, AuthorityError> {
        let authority = self
            .authorities
            .get(address)
            .ok_or(AuthorityError::UnknownAuthority(*address))?;
        authority
            .as_any()
            .downcast_ref::<A>()
            .ok_or(AuthorityError::WrongKind {
                address: *address,
                expected: std::any::type_name::<A>(),
            })
    }

    /// Typed mutable access to the authority at `address`, for rule administration.
    pub fn get_mut<A: Authority>(&mut self, address: &Address) -> Result<&mut A, AuthorityError> {
        let authority = self
            .authorities
            .get_mut(address)
            .ok_or(AuthorityError::UnknownAuthority(*address))?;
        authority
            .as_any_mut()
            .downcast_mut::<A>()
            .ok_or(AuthorityError::WrongKind {
                address: *address,
                expected: std::any::type_name::<A>(),
            })
    }

    /// Ask the authority at `authority` whether the call is allowed.
    ///
    /// An address with nothing installed denies everything.
    pub fn can_call(
        &self,
        authority: &Address,
        caller: &Address,
        target: &Address,
        selector: Selector,
    ) -> bool {
        match self.authorities.get(authority) {
            Some(a) => a.can_call(caller, target, selector),
            None => false,
        }
    }

    /// Number of installed authorities.
    pub fn len(&self) -> usize {
        self.authorities.len()
    }

    /// Whether no authority is installed.
    pub fn is_empty(&self) -> bool {
        self.authorities.is_empty()
    }
}

impl std::fmt::Debug for AuthorityDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.authorities
                    .iter()
                    .map(|(addr, a)| (addr, a.authority_name())),
            )
            .finish()
    }
}
