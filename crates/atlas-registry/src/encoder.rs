//! # Interstellar Encoder — Global Identifier Registry
//!
//! Turns a (module, local index) pair into one [`GlobalId`] that every
//! registry module understands, and turns it back again.
//!
//! ## Registration
//!
//! Modules register once with a class tag and receive the next
//! [`ModuleIndex`] (1, 2, 3, …). The table is append-only; a module address
//! may appear at most once. Class tags are not unique: sharded modules of
//! the same kind register under the same tag.
//!
//! ## Decoding
//!
//! Decoding reads the module index straight out of the identifier and
//! checks it against the table. It fails with `UnknownIdentifier` when the
//! magic byte, chain id or reserved bits are off, the index was never
//! assigned, or the class tag disagrees with the module's registration.
//!
//! ## Land
//!
//! For modules registered under [`LAND_CLASS`], `encode_for_coordinate`
//! composes the coordinate codec with `encode_for_module`.

use std::collections::BTreeMap;

use atlas_core::{
    Address, AtlasConfig, ClassTag, Coordinate, CoordinateCodec, GlobalId, ModuleIndex, LAND_CLASS,
};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::journal::Transactional;

/// One row of the registration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRegistration {
    /// Module address.
    pub address: Address,
    /// Class tag the module issues under.
    pub class_tag: ClassTag,
    /// Index embedded in the module's identifiers.
    pub index: ModuleIndex,
}

/// Module registration table plus the identifier codec.
#[derive(Debug)]
pub struct InterstellarEncoder {
    chain_id: u8,
    codec: CoordinateCodec,
    modules: Vec<ModuleRegistration>,
    by_address: BTreeMap<Address, ModuleIndex>,
}

impl InterstellarEncoder {
    /// Create an encoder with an empty table.
    pub fn new(chain_id: u8, codec: CoordinateCodec) -> Self {
        Self {
            chain_id,
            codec,
            modules: Vec::new(),
            by_address: BTreeMap::new(),
        }
    }

    /// Create an encoder from validated configuration.
    pub fn from_config(config: &AtlasConfig) -> Result<Self, RegistryError> {
        Ok(Self::new(config.chain_id, config.coordinate_codec()?))
    }

    /// Chain id stamped into identifiers.
    pub fn chain_id(&self) -> u8 {
        self.chain_id
    }

    /// Coordinate codec used for land identifiers.
    pub fn coordinate_codec(&self) -> &CoordinateCodec {
        &self.codec
    }

    /// Register a module under `class_tag`.
    pub fn register_module(
        &mut self,
        address: Address,
        class_tag: ClassTag,
    ) -> Result<ModuleIndex, RegistryError> {
        if self.by_address.contains_key(&address) {
            return Err(RegistryError::AlreadyRegistered(address));
        }
        let next = u32::try_from(self.modules.len() + 1).map_err(|_| RegistryError::RegistryFull)?;
        let index = ModuleIndex(next);
        self.modules.push(ModuleRegistration {
            address,
            class_tag,
            index,
        });
        self.by_address.insert(address, index);
        tracing::info!(module = %address, %class_tag, %index, "module registered");
        Ok(index)
    }

    /// Registration row for `address`, if registered.
    pub fn registration(&self, address: &Address) -> Option<&ModuleRegistration> {
        let index = self.by_address.get(address)?;
        self.by_index(*index)
    }

    /// All registrations in index order.
    pub fn modules(&self) -> &[ModuleRegistration] {
        &self.modules
    }

    fn by_index(&self, index: ModuleIndex) -> Option<&ModuleRegistration> {
        let position = usize::try_from(index.0).ok()?.checked_sub(1)?;
        self.modules.get(position)
    }

    fn require(&self, address: &Address) -> Result<&ModuleRegistration, RegistryError> {
        self.registration(address)
            .ok_or(RegistryError::UnregisteredModule(*address))
    }

    /// Identifier for `local_index` inside `module`.
    pub fn encode_for_module(
        &self,
        module: &Address,
        local_index: u64,
    ) -> Result<GlobalId, RegistryError> {
        let registration = self.require(module)?;
        Ok(GlobalId::compose(
            self.chain_id,
            registration.class_tag,
            registration.index,
            local_index,
        ))
    }

    /// Identifier of the land parcel at `(x, y)` issued by `module`.
    pub fn encode_for_coordinate(
        &self,
        module: &Address,
        x: i32,
        y: i32,
    ) -> Result<GlobalId, RegistryError> {
        let registration = self.require(module)?;
        if registration.class_tag != LAND_CLASS {
            return Err(RegistryError::ClassMismatch {
                module: *module,
                expected: LAND_CLASS,
                actual: registration.class_tag,
            });
        }
        let local_index = self.codec.encode(x, y)?;
        self.encode_for_module(module, local_index)
    }

    fn resolve(&self, id: GlobalId) -> Result<(&ModuleRegistration, u64), RegistryError> {
        let parts = id.parts();
        if !parts.is_well_formed(self.chain_id) {
            return Err(RegistryError::UnknownIdentifier(id));
        }
        let registration = self
            .by_index(parts.module_index)
            .filter(|r| r.class_tag == parts.class_tag)
            .ok_or(RegistryError::UnknownIdentifier(id))?;
        Ok((registration, parts.local_index))
    }

    /// Recover (module address, local index) from an identifier.
    pub fn decode(&self, id: GlobalId) -> Result<(Address, u64), RegistryError> {
        let (registration, local_index) = self.resolve(id)?;
        Ok((registration.address, local_index))
    }

    /// Module that issued `id`.
    pub fn module_of(&self, id: GlobalId) -> Result<Address, RegistryError> {
        Ok(self.resolve(id)?.0.address)
    }

    /// Class tag of `id`, after full validation.
    pub fn class_of(&self, id: GlobalId) -> Result<ClassTag, RegistryError> {
        Ok(self.resolve(id)?.0.class_tag)
    }

    /// Coordinate of a land identifier.
    pub fn decode_coordinate(&self, id: GlobalId) -> Result<(Address, Coordinate), RegistryError> {
        let (registration, local_index) = self.resolve(id)?;
        if registration.class_tag != LAND_CLASS {
            return Err(RegistryError::ClassMismatch {
                module: registration.address,
                expected: LAND_CLASS,
                actual: registration.class_tag,
            });
        }
        Ok((registration.address, self.codec.decode(local_index)?))
    }
}

/// The table is append-only, so a rollback truncates to the length seen at
/// `begin`.
impl Transactional for InterstellarEncoder {
    type Snapshot = usize;

    fn begin(&mut self) -> usize {
        self.modules.len()
    }

    fn rollback(&mut self, len: usize) {
        for registration in self.modules.drain(len..) {
            self.by_address.remove(&registration.address);
        }
    }

    fn commit(&mut self) {}
}
