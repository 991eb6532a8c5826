//! # Land Base — Parcel Issuance
//!
//! Issues land parcels at grid coordinates and keeps each parcel's packed
//! production-rate attribute.
//!
//! ## Minting
//!
//! `assign_new_land` runs, in order:
//!
//! 1. the land module's own authority check,
//! 2. rate packing (range-checked),
//! 3. coordinate → global identifier through the encoder,
//! 4. the first-write-wins check against the land module's own issuance
//!    record and the ownership ledger,
//! 5. the mint on the ownership ledger (the land module is the caller, so
//!    the ledger's authority must trust it),
//! 6. the location write (same trust requirement on the location ledger),
//! 7. the attribute write.
//!
//! Any failure aborts the call. Atomicity across the three ledgers is
//! provided by `Atlas::transact`.
//!
//! ## Burned parcels
//!
//! The issuance record outlives the token. Once a parcel's token is burned
//! its coordinate can never be issued again, and its rates and flags can no
//! longer be changed.

use atlas_authority::{AuthorityDirectory, Guard};
use atlas_core::{
    Address, AttributePacker, Coordinate, GlobalId, LandFlags, ProductionRates, Selector,
};

use crate::encoder::InterstellarEncoder;
use crate::error::RegistryError;
use crate::journal::{JournaledMap, Transactional};
use crate::location::TokenLocation;
use crate::ownership::ObjectOwnership;
use crate::proxy::{Implementation, Proxy};
use crate::settings::SettingsRegistry;

/// Canonical signature of the gated parcel mint.
pub const ASSIGN_NEW_LAND_SIGNATURE: &str = "assignNewLand(int32,int32,address,uint128)";

/// Canonical signature of the gated bulk rate write.
pub const SET_RESOURCE_RATES_SIGNATURE: &str = "setResourceRates(uint128,uint128)";

/// Canonical signature of the gated single rate write.
pub const SET_RESOURCE_RATE_SIGNATURE: &str = "setResourceRate(uint128,address,uint16)";

/// Canonical signature of the gated flag write.
pub const SET_FLAGS_SIGNATURE: &str = "setFlags(uint128,uint8)";

/// What the land module recorded when it issued a parcel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parcel {
    /// Packed production rates.
    pub attribute: u128,
    /// Marker flags.
    pub flags: LandFlags,
}

/// Persistent land module state.
#[derive(Debug)]
pub struct LandStorage {
    guard: Guard,
    packer: AttributePacker,
    parcels: JournaledMap<GlobalId, Parcel>,
}

impl LandStorage {
    /// Empty storage owned by `owner`, packing rates with `packer`.
    pub fn new(owner: Address, packer: AttributePacker) -> Self {
        Self {
            guard: Guard::new(owner),
            packer,
            parcels: JournaledMap::new(),
        }
    }

    /// Access-control state.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub(crate) fn guard_mut(&mut self) -> &mut Guard {
        &mut self.guard
    }

    /// Packer used for the attribute word.
    pub fn packer(&self) -> &AttributePacker {
        &self.packer
    }

    /// Whether this module ever issued `id`, burned or not.
    pub fn is_issued(&self, id: GlobalId) -> bool {
        self.parcels.contains_key(&id)
    }

    /// Issuance record of `id`.
    pub fn parcel(&self, id: GlobalId) -> Result<Parcel, RegistryError> {
        self.parcels
            .get(&id)
            .copied()
            .ok_or(RegistryError::NonexistentToken(id))
    }

    /// Raw packed attribute of `id`.
    pub fn attribute(&self, id: GlobalId) -> Result<u128, RegistryError> {
        Ok(self.parcel(id)?.attribute)
    }

    /// Flags of `id`.
    pub fn flags(&self, id: GlobalId) -> Result<LandFlags, RegistryError> {
        Ok(self.parcel(id)?.flags)
    }

    /// Record a freshly issued parcel.
    pub fn record(&mut self, id: GlobalId, attribute: u128) {
        self.parcels.insert(
            id,
            Parcel {
                attribute,
                flags: LandFlags::empty(),
            },
        );
    }

    /// Overwrite the packed attribute of an issued parcel.
    pub fn set_attribute(&mut self, id: GlobalId, attribute: u128) -> Result<(), RegistryError> {
        let parcel = self.parcel(id)?;
        self.parcels.insert(id, Parcel { attribute, ..parcel });
        Ok(())
    }

    /// Overwrite the flags of an issued parcel.
    pub fn set_flags(&mut self, id: GlobalId, flags: LandFlags) -> Result<(), RegistryError> {
        let parcel = self.parcel(id)?;
        self.parcels.insert(id, Parcel { flags, ..parcel });
        Ok(())
    }

    /// Number of parcels ever issued.
    pub fn parcel_count(&self) -> usize {
        self.parcels.len()
    }
}

impl Transactional for LandStorage {
    type Snapshot = Guard;

    fn begin(&mut self) -> Guard {
        self.parcels.begin();
        self.guard.clone()
    }

    fn rollback(&mut self, guard: Guard) {
        self.parcels.rollback(());
        self.guard = guard;
    }

    fn commit(&mut self) {
        self.parcels.commit();
    }
}

/// Collaborators a land call runs against.
pub struct LandEnv<'a> {
    /// Stable address of the land module.
    pub module: Address,
    /// Land storage.
    pub storage: &'a mut LandStorage,
    /// Everything outside the land module.
    pub deps: LandDeps<'a>,
}

/// Modules the land module calls into.
pub struct LandDeps<'a> {
    /// Identifier registry.
    pub encoder: &'a InterstellarEncoder,
    /// Ownership ledger.
    pub ownership: &'a mut ObjectOwnership,
    /// Location ledger.
    pub location: &'a mut TokenLocation,
    /// Settings, for resource token lookup.
    pub settings: &'a SettingsRegistry,
    /// Installed authorities.
    pub authorities: &'a AuthorityDirectory,
}

/// Replaceable land behaviour.
pub trait LandLogic: Implementation {
    /// Issue the parcel at `(x, y)` to `to` with initial `rates`. Gated.
    fn assign_new_land(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        x: i32,
        y: i32,
        to: Address,
        rates: ProductionRates,
    ) -> Result<GlobalId, RegistryError>;

    /// Replace all five rates of `id`. Gated.
    fn set_resource_rates(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        id: GlobalId,
        rates: ProductionRates,
    ) -> Result<(), RegistryError>;

    /// Replace the rate of the resource whose token is `resource`. Gated.
    fn set_resource_rate(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        id: GlobalId,
        resource: Address,
        rate: u32,
    ) -> Result<(), RegistryError>;

    /// Replace the flags of `id`. Gated.
    fn set_flags(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        id: GlobalId,
        flags: LandFlags,
    ) -> Result<(), RegistryError>;
}

/// Fail unless `id` is a live parcel of this module.
fn require_live(env: &LandEnv<'_>, id: GlobalId) -> Result<(), RegistryError> {
    if env.storage.is_issued(id) && env.deps.ownership.exists(id) {
        Ok(())
    } else {
        Err(RegistryError::NonexistentToken(id))
    }
}

/// First land implementation.
#[derive(Debug, Default)]
pub struct LandBaseV1;

impl Implementation for LandBaseV1 {
    fn implementation_name(&self) -> &str {
        "LandBaseV1"
    }
}

impl LandLogic for LandBaseV1 {
    fn assign_new_land(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        x: i32,
        y: i32,
        to: Address,
        rates: ProductionRates,
    ) -> Result<GlobalId, RegistryError> {
        env.storage.guard().ensure(
            env.deps.authorities,
            caller,
            &env.module,
            Selector::of(ASSIGN_NEW_LAND_SIGNATURE),
        )?;
        let attribute = env.storage.packer().pack(&rates)?;
        let id = env.deps.encoder.encode_for_coordinate(&env.module, x, y)?;
        if env.storage.is_issued(id) || env.deps.ownership.exists(id) {
            tracing::warn!(%id, x, y, "parcel already assigned");
            return Err(RegistryError::AlreadyAssigned(id));
        }
        env.deps
            .ownership
            .mint_object(env.deps.encoder, env.deps.authorities, &env.module, to, id)?;
        env.deps
            .location
            .set_location(env.deps.authorities, &env.module, id, Coordinate::new(x, y))?;
        env.storage.record(id, attribute);
        tracing::info!(%id, x, y, %to, "land assigned");
        Ok(id)
    }

    fn set_resource_rates(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        id: GlobalId,
        rates: ProductionRates,
    ) -> Result<(), RegistryError> {
        env.storage.guard().ensure(
            env.deps.authorities,
            caller,
            &env.module,
            Selector::of(SET_RESOURCE_RATES_SIGNATURE),
        )?;
        require_live(env, id)?;
        let attribute = env.storage.packer().pack(&rates)?;
        env.storage.set_attribute(id, attribute)?;
        tracing::info!(%id, ?rates, "resource rates set");
        Ok(())
    }

    fn set_resource_rate(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        id: GlobalId,
        resource: Address,
        rate: u32,
    ) -> Result<(), RegistryError> {
        env.storage.guard().ensure(
            env.deps.authorities,
            caller,
            &env.module,
            Selector::of(SET_RESOURCE_RATE_SIGNATURE),
        )?;
        let kind = env
            .deps
            .settings
            .resource_kind(&resource)
            .ok_or(RegistryError::UnknownResource(resource))?;
        require_live(env, id)?;
        let current = env.storage.attribute(id)?;
        let attribute = env.storage.packer().with_rate(current, kind, rate)?;
        env.storage.set_attribute(id, attribute)?;
        tracing::info!(%id, %kind, rate, "resource rate set");
        Ok(())
    }

    fn set_flags(
        &self,
        env: &mut LandEnv<'_>,
        caller: &Address,
        id: GlobalId,
        flags: LandFlags,
    ) -> Result<(), RegistryError> {
        env.storage.guard().ensure(
            env.deps.authorities,
            caller,
            &env.module,
            Selector::of(SET_FLAGS_SIGNATURE),
        )?;
        require_live(env, id)?;
        env.storage.set_flags(id, flags)?;
        tracing::info!(%id, %flags, "parcel flags set");
        Ok(())
    }
}

/// The proxied land module.
pub type LandBase = Proxy<LandStorage, dyn LandLogic>;

impl Proxy<LandStorage, dyn LandLogic> {
    fn env<'a>(&'a mut self, deps: LandDeps<'a>) -> LandEnv<'a> {
        LandEnv {
            module: self.address(),
            storage: self.storage_mut(),
            deps,
        }
    }

    /// Issue a parcel through the current implementation.
    pub fn assign_new_land(
        &mut self,
        deps: LandDeps<'_>,
        caller: &Address,
        x: i32,
        y: i32,
        to: Address,
        rates: ProductionRates,
    ) -> Result<GlobalId, RegistryError> {
        let logic = self.implementation()?;
        logic.assign_new_land(&mut self.env(deps), caller, x, y, to, rates)
    }

    /// Replace all rates through the current implementation.
    pub fn set_resource_rates(
        &mut self,
        deps: LandDeps<'_>,
        caller: &Address,
        id: GlobalId,
        rates: ProductionRates,
    ) -> Result<(), RegistryError> {
        let logic = self.implementation()?;
        logic.set_resource_rates(&mut self.env(deps), caller, id, rates)
    }

    /// Replace one rate through the current implementation.
    pub fn set_resource_rate(
        &mut self,
        deps: LandDeps<'_>,
        caller: &Address,
        id: GlobalId,
        resource: Address,
        rate: u32,
    ) -> Result<(), RegistryError> {
        let logic = self.implementation()?;
        logic.set_resource_rate(&mut self.env(deps), caller, id, resource, rate)
    }

    /// Replace flags through the current implementation.
    pub fn set_flags(
        &mut self,
        deps: LandDeps<'_>,
        caller: &Address,
        id: GlobalId,
        flags: LandFlags,
    ) -> Result<(), RegistryError> {
        let logic = self.implementation()?;
        logic.set_flags(&mut self.env(deps), caller, id, flags)
    }

    /// Flags of `id`.
    pub fn flags(&self, id: GlobalId) -> Result<LandFlags, RegistryError> {
        self.storage().flags(id)
    }

    /// Unpacked rates of `id`.
    pub fn resource_rates(&self, id: GlobalId) -> Result<ProductionRates, RegistryError> {
        let storage = self.storage();
        Ok(storage.packer().unpack(storage.attribute(id)?))
    }

    /// Raw packed attribute of `id`.
    pub fn land_attribute(&self, id: GlobalId) -> Result<u128, RegistryError> {
        self.storage().attribute(id)
    }
}
