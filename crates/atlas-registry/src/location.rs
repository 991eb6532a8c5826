//! # Token Location Ledger
//!
//! Records where on the grid a token sits. Not proxied; writes are gated
//! by the ledger's own guard so only trusted issuers can place tokens.

use atlas_authority::{AuthorityDirectory, Guard};
use atlas_core::{Address, Coordinate, CoordinateCodec, GlobalId, Selector};

use crate::error::RegistryError;
use crate::journal::{JournaledMap, Transactional};

/// Canonical signature of the gated location write.
pub const SET_LOCATION_SIGNATURE: &str = "setTokenLocation(uint128,int32,int32)";

/// Token → coordinate ledger.
#[derive(Debug)]
pub struct TokenLocation {
    address: Address,
    guard: Guard,
    codec: CoordinateCodec,
    locations: JournaledMap<GlobalId, Coordinate>,
}

impl TokenLocation {
    /// Empty ledger at `address`, owned by `owner`.
    pub fn new(address: Address, owner: Address, codec: CoordinateCodec) -> Self {
        Self {
            address,
            guard: Guard::new(owner),
            codec,
            locations: JournaledMap::new(),
        }
    }

    /// Ledger address.
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

    /// Place `id` at `coordinate`. Gated; the coordinate must be in range.
    pub fn set_location(
        &mut self,
        authorities: &AuthorityDirectory,
        caller: &Address,
        id: GlobalId,
        coordinate: Coordinate,
    ) -> Result<(), RegistryError> {
        self.guard.ensure(
            authorities,
            caller,
            &self.address,
            Selector::of(SET_LOCATION_SIGNATURE),
        )?;
        self.codec.encode_coordinate(coordinate)?;
        self.locations.insert(id, coordinate);
        tracing::debug!(%id, %coordinate, "location set");
        Ok(())
    }

    /// Where `id` sits, if placed.
    pub fn location_of(&self, id: GlobalId) -> Option<Coordinate> {
        self.locations.get(&id).copied()
    }

    /// Whether `id` has been placed.
    pub fn has_location(&self, id: GlobalId) -> bool {
        self.locations.contains_key(&id)
    }
}

impl Transactional for TokenLocation {
    type Snapshot = Guard;

    fn begin(&mut self) -> Guard {
        self.locations.begin();
        self.guard.clone()
    }

    fn rollback(&mut self, guard: Guard) {
        self.locations.rollback(());
        self.guard = guard;
    }

    fn commit(&mut self) {
        self.locations.commit();
    }
}
