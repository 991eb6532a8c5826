//! # Upgrade Proxy
//!
//! A stable address that owns module storage and delegates behaviour to a
//! replaceable implementation. Upgrading swaps the implementation and
//! nothing else: storage, including the module's access-control guard,
//! stays where it is.

use std::sync::Arc;

use atlas_authority::AuthorityError;
use atlas_core::{Address, Selector};

use crate::error::RegistryError;
use crate::journal::Transactional;

/// Canonical signature of the implementation swap.
pub const UPGRADE_TO_SIGNATURE: &str = "upgradeTo(address)";

/// Canonical signature of the proxy-owner hand-over.
pub const TRANSFER_PROXY_OWNERSHIP_SIGNATURE: &str = "transferProxyOwnership(address)";

/// Behaviour shared by every module implementation.
pub trait Implementation: Send + Sync {
    /// Name and version of this implementation, for logs.
    fn implementation_name(&self) -> &str;
}

/// Stable-address container for storage `S` and logic `L`.
pub struct Proxy<S, L: ?Sized> {
    address: Address,
    proxy_owner: Address,
    version: u32,
    implementation: Option<Arc<L>>,
    storage: S,
}

/// Proxy metadata captured when a transaction opens, plus the storage's
/// own snapshot.
pub struct ProxySnapshot<T, L: ?Sized> {
    proxy_owner: Address,
    version: u32,
    implementation: Option<Arc<L>>,
    storage: T,
}

impl<S: Transactional, L: ?Sized> Transactional for Proxy<S, L> {
    type Snapshot = ProxySnapshot<S::Snapshot, L>;

    fn begin(&mut self) -> Self::Snapshot {
        ProxySnapshot {
            proxy_owner: self.proxy_owner,
            version: self.version,
            implementation: self.implementation.clone(),
            storage: self.storage.begin(),
        }
    }

    fn rollback(&mut self, snapshot: Self::Snapshot) {
        self.proxy_owner = snapshot.proxy_owner;
        self.version = snapshot.version;
        self.implementation = snapshot.implementation;
        self.storage.rollback(snapshot.storage);
    }

    fn commit(&mut self) {
        self.storage.commit();
    }
}

impl<S: std::fmt::Debug, L: ?Sized + Implementation> std::fmt::Debug for Proxy<S, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Proxy")
            .field("address", &self.address)
            .field("proxy_owner", &self.proxy_owner)
            .field("version", &self.version)
            .field(
                "implementation",
                &self.implementation.as_ref().map(|i| i.implementation_name()),
            )
            .field("storage", &self.storage)
            .finish()
    }
}

impl<S, L: ?Sized + Implementation> Proxy<S, L> {
    /// A proxy with storage but no implementation yet.
    pub fn new(address: Address, proxy_owner: Address, storage: S) -> Self {
        Self {
            address,
            proxy_owner,
            version: 0,
            implementation: None,
            storage,
        }
    }

    /// Stable address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Account allowed to upgrade.
    pub fn proxy_owner(&self) -> Address {
        self.proxy_owner
    }

    /// Number of upgrades applied so far.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Current implementation.
    pub fn implementation(&self) -> Result<Arc<L>, RegistryError> {
        self.implementation
            .clone()
            .ok_or(RegistryError::NotInitialized(self.address))
    }

    /// Install a new implementation. Proxy owner only.
    pub fn upgrade_to(&mut self, caller: &Address, implementation: Arc<L>) -> Result<(), RegistryError> {
        self.require_proxy_owner(caller, UPGRADE_TO_SIGNATURE)?;
        self.version += 1;
        tracing::info!(
            proxy = %self.address,
            version = self.version,
            implementation = implementation.implementation_name(),
            "proxy upgraded"
        );
        self.implementation = Some(implementation);
        Ok(())
    }

    /// Hand upgrade rights to a new account. Proxy owner only.
    pub fn transfer_proxy_ownership(
        &mut self,
        caller: &Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        self.require_proxy_owner(caller, TRANSFER_PROXY_OWNERSHIP_SIGNATURE)?;
        self.proxy_owner = new_owner;
        Ok(())
    }

    /// Module storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable module storage.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    fn require_proxy_owner(&self, caller: &Address, signature: &str) -> Result<(), RegistryError> {
        if *caller != self.proxy_owner {
            let selector = Selector::of(signature);
            tracing::warn!(%caller, proxy = %self.address, %selector, "proxy admin call rejected");
            return Err(AuthorityError::Unauthorized {
                caller: *caller,
                target: self.address,
                selector,
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Implementation {
        fn greet(&self, storage: &mut Vec<String>);
    }

    struct English;
    struct French;

    impl Implementation for English {
        fn implementation_name(&self) -> &str {
            "English"
        }
    }

    impl Greeter for English {
        fn greet(&self, storage: &mut Vec<String>) {
            storage.push("hello".into());
        }
    }

    impl Implementation for French {
        fn implementation_name(&self) -> &str {
            "French"
        }
    }

    impl Greeter for French {
        fn greet(&self, storage: &mut Vec<String>) {
            storage.push("bonjour".into());
        }
    }

    fn addr(label: &str) -> Address {
        Address::derive(label)
    }

    fn greet(proxy: &mut Proxy<Vec<String>, dyn Greeter>) -> Result<(), RegistryError> {
        let logic = proxy.implementation()?;
        logic.greet(proxy.storage_mut());
        Ok(())
    }

    #[test]
    fn test_uninitialized_proxy_fails() {
        let mut proxy: Proxy<Vec<String>, dyn Greeter> =
            Proxy::new(addr("proxy"), addr("owner"), Vec::new());
        assert_eq!(greet(&mut proxy), Err(RegistryError::NotInitialized(addr("proxy"))));
    }

    #[test]
    fn test_upgrade_keeps_storage() {
        let mut proxy: Proxy<Vec<String>, dyn Greeter> =
            Proxy::new(addr("proxy"), addr("owner"), Vec::new());
        proxy.upgrade_to(&addr("owner"), Arc::new(English)).unwrap();
        greet(&mut proxy).unwrap();
        proxy.upgrade_to(&addr("owner"), Arc::new(French)).unwrap();
        greet(&mut proxy).unwrap();
        assert_eq!(proxy.storage(), &vec!["hello".to_string(), "bonjour".to_string()]);
        assert_eq!(proxy.version(), 2);
        assert_eq!(proxy.address(), addr("proxy"));
    }

    #[test]
    fn test_only_proxy_owner_upgrades() {
        let mut proxy: Proxy<Vec<String>, dyn Greeter> =
            Proxy::new(addr("proxy"), addr("owner"), Vec::new());
        let err = proxy.upgrade_to(&addr("mallory"), Arc::new(English)).unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(proxy.version(), 0);

        proxy
            .transfer_proxy_ownership(&addr("owner"), addr("ops"))
            .unwrap();
        assert!(proxy.upgrade_to(&addr("owner"), Arc::new(English)).is_err());
        assert!(proxy.upgrade_to(&addr("ops"), Arc::new(English)).is_ok());
    }

    #[test]
    fn test_rollback_restores_implementation_and_storage() {
        use crate::journal::JournaledMap;

        let mut proxy: Proxy<JournaledMap<u32, String>, dyn Greeter> =
            Proxy::new(addr("proxy"), addr("owner"), JournaledMap::new());
        proxy.upgrade_to(&addr("owner"), Arc::new(English)).unwrap();
        proxy.storage_mut().insert(1, "kept".into());

        let snapshot = proxy.begin();
        proxy.upgrade_to(&addr("owner"), Arc::new(French)).unwrap();
        proxy.transfer_proxy_ownership(&addr("owner"), addr("ops")).unwrap();
        proxy.storage_mut().insert(2, "dropped".into());
        proxy.rollback(snapshot);

        assert_eq!(proxy.version(), 1);
        assert_eq!(proxy.proxy_owner(), addr("owner"));
        assert_eq!(proxy.implementation().unwrap().implementation_name(), "English");
        assert_eq!(proxy.storage().len(), 1);
        assert!(proxy.storage().get(&2).is_none());
    }
}
