//! # Settings Registry
//!
//! Symbolic name → value store consulted by modules to discover each other
//! and the five resource tokens. Writes are gated by the registry's own
//! [`Guard`]; reads are open.

use atlas_authority::{AuthorityDirectory, Guard};
use atlas_core::{Address, ResourceKind, Selector};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::journal::{JournaledMap, Transactional};

/// Well-known setting names.
pub mod setting_ids {
    /// Gold resource token.
    pub const CONTRACT_GOLD_ERC20_TOKEN: &str = "CONTRACT_GOLD_ERC20_TOKEN";
    /// Wood resource token.
    pub const CONTRACT_WOOD_ERC20_TOKEN: &str = "CONTRACT_WOOD_ERC20_TOKEN";
    /// Water resource token.
    pub const CONTRACT_WATER_ERC20_TOKEN: &str = "CONTRACT_WATER_ERC20_TOKEN";
    /// Fire resource token.
    pub const CONTRACT_FIRE_ERC20_TOKEN: &str = "CONTRACT_FIRE_ERC20_TOKEN";
    /// Soil resource token.
    pub const CONTRACT_SOIL_ERC20_TOKEN: &str = "CONTRACT_SOIL_ERC20_TOKEN";
    /// Global identifier encoder.
    pub const CONTRACT_INTERSTELLAR_ENCODER: &str = "CONTRACT_INTERSTELLAR_ENCODER";
    /// Ownership ledger proxy.
    pub const CONTRACT_OBJECT_OWNERSHIP: &str = "CONTRACT_OBJECT_OWNERSHIP";
    /// Land issuance proxy.
    pub const CONTRACT_LAND_BASE: &str = "CONTRACT_LAND_BASE";
    /// Location ledger.
    pub const CONTRACT_TOKEN_LOCATION: &str = "CONTRACT_TOKEN_LOCATION";
}

/// Setting name holding the token address of `kind`.
pub fn resource_setting(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Gold => setting_ids::CONTRACT_GOLD_ERC20_TOKEN,
        ResourceKind::Wood => setting_ids::CONTRACT_WOOD_ERC20_TOKEN,
        ResourceKind::Water => setting_ids::CONTRACT_WATER_ERC20_TOKEN,
        ResourceKind::Fire => setting_ids::CONTRACT_FIRE_ERC20_TOKEN,
        ResourceKind::Soil => setting_ids::CONTRACT_SOIL_ERC20_TOKEN,
    }
}

/// Canonical signature of the address setter.
pub const SET_ADDRESS_PROPERTY: &str = "setAddressProperty(bytes32,address)";

/// Canonical signature of the scalar setter.
pub const SET_UINT_PROPERTY: &str = "setUintProperty(bytes32,uint256)";

/// Addresses of the five resource tokens, in slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTokens {
    /// Gold token.
    pub gold: Address,
    /// Wood token.
    pub wood: Address,
    /// Water token.
    pub water: Address,
    /// Fire token.
    pub fire: Address,
    /// Soil token.
    pub soil: Address,
}

impl ResourceTokens {
    /// Address of the token for `kind`.
    pub fn get(&self, kind: ResourceKind) -> Address {
        match kind {
            ResourceKind::Gold => self.gold,
            ResourceKind::Wood => self.wood,
            ResourceKind::Water => self.water,
            ResourceKind::Fire => self.fire,
            ResourceKind::Soil => self.soil,
        }
    }

    /// Deterministic token addresses derived from `namespace`.
    pub fn derived(namespace: &str) -> Self {
        let at = |kind: ResourceKind| Address::derive(&format!("{namespace}/token/{kind}"));
        Self {
            gold: at(ResourceKind::Gold),
            wood: at(ResourceKind::Wood),
            water: at(ResourceKind::Water),
            fire: at(ResourceKind::Fire),
            soil: at(ResourceKind::Soil),
        }
    }
}

/// In-memory settings store.
#[derive(Debug)]
pub struct SettingsRegistry {
    address: Address,
    guard: Guard,
    addresses: JournaledMap<String, Address>,
    uints: JournaledMap<String, u128>,
}

impl SettingsRegistry {
    /// Create an empty registry owned by `owner`.
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            guard: Guard::new(owner),
            addresses: JournaledMap::new(),
            uints: JournaledMap::new(),
        }
    }

    /// Registry address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Access-control state.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub(crate) fn guard_mut(&mut self) -> &mut Guard {
        &mut self.guard
    }

    /// Store an address under `name`.
    pub fn set_address(
        &mut self,
        authorities: &AuthorityDirectory,
        caller: &Address,
        name: &str,
        value: Address,
    ) -> Result<(), RegistryError> {
        self.guard.ensure(
            authorities,
            caller,
            &self.address,
            Selector::of(SET_ADDRESS_PROPERTY),
        )?;
        tracing::info!(name, %value, "address setting updated");
        self.addresses.insert(name.to_string(), value);
        Ok(())
    }

    /// Store a scalar under `name`.
    pub fn set_uint(
        &mut self,
        authorities: &AuthorityDirectory,
        caller: &Address,
        name: &str,
        value: u128,
    ) -> Result<(), RegistryError> {
        self.guard.ensure(
            authorities,
            caller,
            &self.address,
            Selector::of(SET_UINT_PROPERTY),
        )?;
        tracing::info!(name, %value, "uint setting updated");
        self.uints.insert(name.to_string(), value);
        Ok(())
    }

    /// Address stored under `name`.
    pub fn address_of(&self, name: &str) -> Result<Address, RegistryError> {
        self.addresses
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::SettingNotFound(name.to_string()))
    }

    /// Scalar stored under `name`.
    pub fn uint(&self, name: &str) -> Result<u128, RegistryError> {
        self.uints
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::SettingNotFound(name.to_string()))
    }

    /// Resource kind whose token lives at `token`, if any.
    pub fn resource_kind(&self, token: &Address) -> Option<ResourceKind> {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| self.addresses.get(resource_setting(*kind)) == Some(token))
    }
}

impl Transactional for SettingsRegistry {
    type Snapshot = Guard;

    fn begin(&mut self) -> Guard {
        self.addresses.begin();
        self.uints.begin();
        self.guard.clone()
    }

    fn rollback(&mut self, guard: Guard) {
        self.addresses.rollback(());
        self.uints.rollback(());
        self.guard = guard;
    }

    fn commit(&mut self) {
        self.addresses.commit();
        self.uints.commit();
    }
}
