//! # Atlas — the Composed Registry
//!
//! Owns every registry module plus the authority directory, wires them the
//! way a standard deployment does, and exposes each operation as one atomic
//! call.
//!
//! ## Atomicity
//!
//! Every mutating entry point runs inside [`Atlas::transact`]: each module
//! opens a write journal first, and if the operation fails at any point the
//! journals are replayed backwards, so a mint rejected by the location
//! ledger leaves no orphaned ownership record behind. Undoing costs as much
//! as the writes being undone, whatever the number of issued parcels.
//! Authority rule tables are administered through their own single-step,
//! validate-then-write methods and are not journaled.
//!
//! ## Burned tokens
//!
//! Reads of rates, flags and location answer only for live tokens. A burned
//! parcel keeps its issuance record, which blocks the coordinate from ever
//! being issued again.
//!
//! ## Standard wiring
//!
//! - Ownership ledger (proxied) registered under `LEDGER_CLASS`.
//! - Land module (proxied) registered under `LAND_CLASS`.
//! - One whitelist authority per ledger, each trusting the land module.
//! - The land module itself has no authority: only its owner may issue
//!   until one is installed with `set_authority`.
//! - Every module address and the five resource tokens recorded in the
//!   settings registry.

use std::sync::Arc;

use atlas_authority::{Authority, AuthorityDirectory, AuthorityError, Guard, WhitelistAuthority};
use atlas_core::{
    Address, AtlasConfig, ClassTag, Coordinate, GlobalId, LandFlags, ModuleIndex,
    ProductionRates, ResourceKind, Selector, LAND_CLASS, LEDGER_CLASS,
};
use serde::{Deserialize, Serialize};

use crate::encoder::InterstellarEncoder;
use crate::error::RegistryError;
use crate::journal::Transactional;
use crate::land::{LandBase, LandBaseV1, LandDeps, LandLogic, LandStorage};
use crate::location::TokenLocation;
use crate::ownership::{ObjectOwnership, ObjectOwnershipV1, OwnershipLogic, OwnershipStorage};
use crate::settings::{resource_setting, setting_ids, ResourceTokens, SettingsRegistry};

/// Canonical signature of module registration.
pub const REGISTER_MODULE_SIGNATURE: &str = "registerModule(address,uint8)";

/// The gated modules of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Settings registry.
    Settings,
    /// Ownership ledger.
    Ownership,
    /// Location ledger.
    Location,
    /// Land issuance.
    Land,
}

/// Addresses assigned at deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Settings registry.
    pub settings: Address,
    /// Identifier encoder.
    pub encoder: Address,
    /// Ownership ledger proxy.
    pub ownership: Address,
    /// Location ledger.
    pub location: Address,
    /// Land module proxy.
    pub land: Address,
    /// Whitelist authority guarding the ownership ledger.
    pub ownership_authority: Address,
    /// Whitelist authority guarding the location ledger.
    pub location_authority: Address,
}

impl Deployment {
    /// Deterministic addresses derived from `namespace`.
    pub fn derived(namespace: &str) -> Self {
        let at = |role: &str| Address::derive(&format!("{namespace}/{role}"));
        Self {
            settings: at("settings-registry"),
            encoder: at("interstellar-encoder"),
            ownership: at("object-ownership"),
            location: at("token-location"),
            land: at("land-base"),
            ownership_authority: at("object-ownership-authority"),
            location_authority: at("token-location-authority"),
        }
    }
}

/// Everything rolled back by a failed operation.
#[derive(Debug)]
struct AtlasState {
    settings: SettingsRegistry,
    encoder: InterstellarEncoder,
    ownership: ObjectOwnership,
    location: TokenLocation,
    land: LandBase,
}

struct AtlasSnapshot {
    settings: <SettingsRegistry as Transactional>::Snapshot,
    encoder: <InterstellarEncoder as Transactional>::Snapshot,
    ownership: <ObjectOwnership as Transactional>::Snapshot,
    location: <TokenLocation as Transactional>::Snapshot,
    land: <LandBase as Transactional>::Snapshot,
}

impl Transactional for AtlasState {
    type Snapshot = AtlasSnapshot;

    fn begin(&mut self) -> AtlasSnapshot {
        AtlasSnapshot {
            settings: self.settings.begin(),
            encoder: self.encoder.begin(),
            ownership: self.ownership.begin(),
            location: self.location.begin(),
            land: self.land.begin(),
        }
    }

    fn rollback(&mut self, snapshot: AtlasSnapshot) {
        self.settings.rollback(snapshot.settings);
        self.encoder.rollback(snapshot.encoder);
        self.ownership.rollback(snapshot.ownership);
        self.location.rollback(snapshot.location);
        self.land.rollback(snapshot.land);
    }

    fn commit(&mut self) {
        self.settings.commit();
        self.encoder.commit();
        self.ownership.commit();
        self.location.commit();
        self.land.commit();
    }
}

impl AtlasState {
    fn guard_mut(&mut self, kind: ModuleKind) -> (Address, &mut Guard) {
        match kind {
            ModuleKind::Settings => (self.settings.address(), self.settings.guard_mut()),
            ModuleKind::Ownership => (self.ownership.address(), self.ownership.storage_mut().guard_mut()),
            ModuleKind::Location => (self.location.address(), self.location.guard_mut()),
            ModuleKind::Land => (self.land.address(), self.land.storage_mut().guard_mut()),
        }
    }

    fn guard(&self, kind: ModuleKind) -> &Guard {
        match kind {
            ModuleKind::Settings => self.settings.guard(),
            ModuleKind::Ownership => self.ownership.storage().guard(),
            ModuleKind::Location => self.location.guard(),
            ModuleKind::Land => self.land.storage().guard(),
        }
    }

    /// Split borrow: the land proxy plus everything it calls into.
    fn land_call<'a>(
        &'a mut self,
        authorities: &'a AuthorityDirectory,
    ) -> (&'a mut LandBase, LandDeps<'a>) {
        let AtlasState {
            settings,
            encoder,
            ownership,
            location,
            land,
        } = self;
        (
            land,
            LandDeps {
                encoder,
                ownership,
                location,
                settings,
                authorities,
            },
        )
    }
}

/// A complete, wired registry.
#[derive(Debug)]
pub struct Atlas {
    config: AtlasConfig,
    operator: Address,
    deployment: Deployment,
    authorities: AuthorityDirectory,
    state: AtlasState,
}

impl Atlas {
    /// Deploy and wire a registry operated by `operator`.
    pub fn deploy(
        config: AtlasConfig,
        operator: Address,
        resources: ResourceTokens,
    ) -> Result<Self, RegistryError> {
        Self::deploy_at(config, operator, resources, Deployment::derived("atlas"))
    }

    /// Deploy at explicit addresses.
    pub fn deploy_at(
        config: AtlasConfig,
        operator: Address,
        resources: ResourceTokens,
        deployment: Deployment,
    ) -> Result<Self, RegistryError> {
        config.validate()?;
        let codec = config.coordinate_codec()?;
        let packer = config.attribute_packer()?;

        let mut authorities = AuthorityDirectory::new();
        authorities.install(Box::new(WhitelistAuthority::with_callers(
            deployment.ownership_authority,
            operator,
            deployment.ownership,
            [deployment.land],
        )))?;
        authorities.install(Box::new(WhitelistAuthority::with_callers(
            deployment.location_authority,
            operator,
            deployment.location,
            [deployment.land],
        )))?;

        let mut encoder = InterstellarEncoder::from_config(&config)?;
        encoder.register_module(deployment.ownership, LEDGER_CLASS)?;
        encoder.register_module(deployment.land, LAND_CLASS)?;

        let mut ownership = ObjectOwnership::new(
            deployment.ownership,
            operator,
            OwnershipStorage::new(operator),
        );
        ownership.upgrade_to(&operator, Arc::new(ObjectOwnershipV1))?;
        ownership.storage_mut().guard_mut().set_authority(
            &authorities,
            &operator,
            &deployment.ownership,
            Some(deployment.ownership_authority),
        )?;

        let mut location = TokenLocation::new(deployment.location, operator, codec);
        location.guard_mut().set_authority(
            &authorities,
            &operator,
            &deployment.location,
            Some(deployment.location_authority),
        )?;

        let mut land = LandBase::new(deployment.land, operator, LandStorage::new(operator, packer));
        land.upgrade_to(&operator, Arc::new(LandBaseV1))?;

        let mut settings = SettingsRegistry::new(deployment.settings, operator);
        for kind in ResourceKind::ALL {
            settings.set_address(&authorities, &operator, resource_setting(kind), resources.get(kind))?;
        }
        for (name, address) in [
            (setting_ids::CONTRACT_INTERSTELLAR_ENCODER, deployment.encoder),
            (setting_ids::CONTRACT_OBJECT_OWNERSHIP, deployment.ownership),
            (setting_ids::CONTRACT_TOKEN_LOCATION, deployment.location),
            (setting_ids::CONTRACT_LAND_BASE, deployment.land),
        ] {
            settings.set_address(&authorities, &operator, name, address)?;
        }

        tracing::info!(%operator, land = %deployment.land, ownership = %deployment.ownership, "registry deployed");
        Ok(Self {
            config,
            operator,
            deployment,
            authorities,
            state: AtlasState {
                settings,
                encoder,
                ownership,
                location,
                land,
            },
        })
    }

    /// Run `op` against module state, undoing its writes on error.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&mut AtlasState, &AuthorityDirectory) -> Result<T, RegistryError>,
    ) -> Result<T, RegistryError> {
        let snapshot = self.state.begin();
        let result = op(&mut self.state, &self.authorities);
        match &result {
            Ok(_) => self.state.commit(),
            Err(err) => {
                tracing::debug!(error = %err, "operation failed, state restored");
                self.state.rollback(snapshot);
            }
        }
        result
    }

    fn require_live(&self, id: GlobalId) -> Result<(), RegistryError> {
        if self.state.ownership.exists(id) {
            Ok(())
        } else {
            Err(RegistryError::NonexistentToken(id))
        }
    }

    // ─── Administration ──────────────────────────────────────────────

    /// Register a module with the encoder. Operator only.
    pub fn register_module(
        &mut self,
        caller: &Address,
        module: Address,
        class_tag: ClassTag,
    ) -> Result<ModuleIndex, RegistryError> {
        let operator = self.operator;
        let encoder_address = self.deployment.encoder;
        self.transact(|state, _| {
            if *caller != operator {
                let selector = Selector::of(REGISTER_MODULE_SIGNATURE);
                tracing::warn!(%caller, %selector, "module registration rejected");
                return Err(AuthorityError::Unauthorized {
                    caller: *caller,
                    target: encoder_address,
                    selector,
                }
                .into());
            }
            state.encoder.register_module(module, class_tag)
        })
    }

    /// Install an authority so modules can reference it.
    pub fn install_authority(
        &mut self,
        authority: Box<dyn Authority>,
    ) -> Result<Address, RegistryError> {
        Ok(self.authorities.install(authority)?)
    }

    /// Typed mutable access to an installed authority, for rule changes.
    ///
    /// The authority's own admin checks still apply to every mutation.
    pub fn authority_mut<A: Authority>(&mut self, address: &Address) -> Result<&mut A, RegistryError> {
        Ok(self.authorities.get_mut::<A>(address)?)
    }

    /// Point a module at a different authority, or none. Module owner only.
    pub fn set_authority(
        &mut self,
        caller: &Address,
        module: ModuleKind,
        authority: Option<Address>,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| {
            let (address, guard) = state.guard_mut(module);
            Ok(guard.set_authority(authorities, caller, &address, authority)?)
        })
    }

    /// Hand a module to a new owner. Module owner only.
    pub fn set_owner(
        &mut self,
        caller: &Address,
        module: ModuleKind,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        self.transact(|state, _| {
            let (address, guard) = state.guard_mut(module);
            Ok(guard.set_owner(caller, &address, new_owner)?)
        })
    }

    /// Swap the land module's implementation. Proxy owner only.
    pub fn upgrade_land(
        &mut self,
        caller: &Address,
        implementation: Arc<dyn LandLogic>,
    ) -> Result<(), RegistryError> {
        self.transact(|state, _| state.land.upgrade_to(caller, implementation))
    }

    /// Swap the ownership ledger's implementation. Proxy owner only.
    pub fn upgrade_ownership(
        &mut self,
        caller: &Address,
        implementation: Arc<dyn OwnershipLogic>,
    ) -> Result<(), RegistryError> {
        self.transact(|state, _| state.ownership.upgrade_to(caller, implementation))
    }

    /// Record an address setting. Gated by the settings registry's guard.
    pub fn set_setting_address(
        &mut self,
        caller: &Address,
        name: &str,
        value: Address,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| state.settings.set_address(authorities, caller, name, value))
    }

    /// Record a scalar setting. Gated by the settings registry's guard.
    pub fn set_setting_uint(
        &mut self,
        caller: &Address,
        name: &str,
        value: u128,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| state.settings.set_uint(authorities, caller, name, value))
    }

    // ─── Land ────────────────────────────────────────────────────────

    /// Issue the parcel at `(x, y)` to `to` with all rates zero.
    pub fn assign_new_land(
        &mut self,
        caller: &Address,
        x: i32,
        y: i32,
        to: Address,
    ) -> Result<GlobalId, RegistryError> {
        self.assign_new_land_with_rates(caller, x, y, to, ProductionRates::default())
    }

    /// Issue the parcel at `(x, y)` to `to` with initial `rates`.
    pub fn assign_new_land_with_rates(
        &mut self,
        caller: &Address,
        x: i32,
        y: i32,
        to: Address,
        rates: ProductionRates,
    ) -> Result<GlobalId, RegistryError> {
        self.transact(|state, authorities| {
            let (land, deps) = state.land_call(authorities);
            land.assign_new_land(deps, caller, x, y, to, rates)
        })
    }

    /// Replace all five rates of `id`.
    pub fn set_resource_rates(
        &mut self,
        caller: &Address,
        id: GlobalId,
        rates: ProductionRates,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| {
            let (land, deps) = state.land_call(authorities);
            land.set_resource_rates(deps, caller, id, rates)
        })
    }

    /// Replace the rate of the resource whose token is `resource`.
    pub fn set_resource_rate(
        &mut self,
        caller: &Address,
        id: GlobalId,
        resource: Address,
        rate: u32,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| {
            let (land, deps) = state.land_call(authorities);
            land.set_resource_rate(deps, caller, id, resource, rate)
        })
    }

    /// Replace the flags of `id`.
    pub fn set_flags(
        &mut self,
        caller: &Address,
        id: GlobalId,
        flags: LandFlags,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| {
            let (land, deps) = state.land_call(authorities);
            land.set_flags(deps, caller, id, flags)
        })
    }

    /// Flags of the live parcel `id`.
    pub fn flags(&self, id: GlobalId) -> Result<LandFlags, RegistryError> {
        self.require_live(id)?;
        self.state.land.flags(id)
    }

    /// Unpacked rates of the live parcel `id`.
    pub fn resource_rates(&self, id: GlobalId) -> Result<ProductionRates, RegistryError> {
        self.require_live(id)?;
        self.state.land.resource_rates(id)
    }

    /// Rate of the resource whose token is `resource`.
    pub fn resource_rate(&self, id: GlobalId, resource: &Address) -> Result<u32, RegistryError> {
        let kind = self
            .state
            .settings
            .resource_kind(resource)
            .ok_or(RegistryError::UnknownResource(*resource))?;
        Ok(self.resource_rates(id)?.get(kind))
    }

    /// Raw packed attribute of the live parcel `id`.
    pub fn land_attribute(&self, id: GlobalId) -> Result<u128, RegistryError> {
        self.require_live(id)?;
        self.state.land.land_attribute(id)
    }

    /// Identifier the parcel at `(x, y)` has or would have.
    pub fn encode_token_id(&self, x: i32, y: i32) -> Result<GlobalId, RegistryError> {
        self.state
            .encoder
            .encode_for_coordinate(&self.deployment.land, x, y)
    }

    /// Identifier of the issued parcel at `(x, y)`.
    pub fn token_id_by_location(&self, x: i32, y: i32) -> Result<GlobalId, RegistryError> {
        let id = self.encode_token_id(x, y)?;
        if !self.state.ownership.exists(id) {
            return Err(RegistryError::NonexistentToken(id));
        }
        Ok(id)
    }

    /// Whether the parcel at `(x, y)` has been issued and not burned.
    pub fn land_exists(&self, x: i32, y: i32) -> Result<bool, RegistryError> {
        Ok(self.state.ownership.exists(self.encode_token_id(x, y)?))
    }

    /// Coordinate encoded in a land identifier.
    pub fn decode_token_id(&self, id: GlobalId) -> Result<Coordinate, RegistryError> {
        Ok(self.state.encoder.decode_coordinate(id)?.1)
    }

    // ─── Ledgers ─────────────────────────────────────────────────────

    /// Mint an identifier directly on the ownership ledger. Gated.
    pub fn mint_object(
        &mut self,
        caller: &Address,
        to: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| {
            state
                .ownership
                .mint_object(&state.encoder, authorities, caller, to, id)
        })
    }

    /// Burn a token held by `from`. Gated.
    pub fn burn_object(
        &mut self,
        caller: &Address,
        from: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| {
            state
                .ownership
                .burn_object(&state.encoder, authorities, caller, from, id)
        })
    }

    /// Move a token from its holder (`caller`) to `to`.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| {
            state
                .ownership
                .transfer(&state.encoder, authorities, caller, to, id)
        })
    }

    /// Place a token on the grid. Gated.
    pub fn set_location(
        &mut self,
        caller: &Address,
        id: GlobalId,
        x: i32,
        y: i32,
    ) -> Result<(), RegistryError> {
        self.transact(|state, authorities| {
            state
                .location
                .set_location(authorities, caller, id, Coordinate::new(x, y))
        })
    }

    /// Holder of `id`.
    pub fn owner_of(&self, id: GlobalId) -> Result<Address, RegistryError> {
        self.state.ownership.owner_of(id)
    }

    /// Whether `id` exists.
    pub fn exists(&self, id: GlobalId) -> bool {
        self.state.ownership.exists(id)
    }

    /// Number of tokens held by `holder`.
    pub fn balance_of(&self, holder: &Address) -> u64 {
        self.state.ownership.balance_of(holder)
    }

    /// Total number of live tokens.
    pub fn total_supply(&self) -> u64 {
        self.state.ownership.total_supply()
    }

    /// Live token at position `index`, for `0 <= index < total_supply()`.
    pub fn token_by_index(&self, index: u64) -> Result<GlobalId, RegistryError> {
        self.state.ownership.token_by_index(index)
    }

    /// Where `id` sits, if placed and not burned.
    pub fn location_of(&self, id: GlobalId) -> Option<Coordinate> {
        if self.state.ownership.storage().is_retired(id) {
            return None;
        }
        self.state.location.location_of(id)
    }

    // ─── Lookups ─────────────────────────────────────────────────────

    /// Recover (module, local index) from an identifier.
    pub fn decode(&self, id: GlobalId) -> Result<(Address, u64), RegistryError> {
        self.state.encoder.decode(id)
    }

    /// Ask the authority at `authority` whether a call would be allowed.
    pub fn can_call(
        &self,
        authority: &Address,
        caller: &Address,
        target: &Address,
        selector: Selector,
    ) -> bool {
        self.authorities.can_call(authority, caller, target, selector)
    }

    /// Authority currently referenced by a module.
    pub fn authority_of(&self, module: ModuleKind) -> Option<Address> {
        self.state.guard(module).authority()
    }

    /// Owner of a module.
    pub fn owner_of_module(&self, module: ModuleKind) -> Address {
        self.state.guard(module).owner()
    }

    /// Resolve a symbolic setting to an address.
    pub fn module_address(&self, name: &str) -> Result<Address, RegistryError> {
        self.state.settings.address_of(name)
    }

    /// Scalar setting stored under `name`.
    pub fn setting_uint(&self, name: &str) -> Result<u128, RegistryError> {
        self.state.settings.uint(name)
    }

    /// Configuration the registry was deployed with.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Deployment addresses.
    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    /// Account that deployed and operates the registry.
    pub fn operator(&self) -> Address {
        self.operator
    }

    /// Identifier encoder.
    pub fn encoder(&self) -> &InterstellarEncoder {
        &self.state.encoder
    }

    /// Land module.
    pub fn land(&self) -> &LandBase {
        &self.state.land
    }

    /// Ownership ledger.
    pub fn ownership(&self) -> &ObjectOwnership {
        &self.state.ownership
    }

    /// Installed authorities.
    pub fn authorities(&self) -> &AuthorityDirectory {
        &self.authorities
    }
}
