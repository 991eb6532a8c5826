//! # Object Ownership Ledger
//!
//! Who holds which global identifier. The ledger is proxied: holdings and
//! the access-control guard live in [`OwnershipStorage`], behaviour lives in
//! an [`OwnershipLogic`] implementation that can be swapped.
//!
//! Minting and burning are gated operations, reserved for issuance modules
//! that the ledger's authority trusts. Transfers are initiated by the
//! current holder and need no authority.
//!
//! Burned identifiers are retired, never reissued. Live tokens are
//! enumerable by position; burning moves the last token into the vacated
//! slot, so positions are stable only between burns.

use atlas_authority::{AuthorityDirectory, Guard};
use atlas_core::{Address, GlobalId, Selector};

use crate::encoder::InterstellarEncoder;
use crate::error::RegistryError;
use crate::journal::{JournaledMap, Transactional};
use crate::proxy::{Implementation, Proxy};

/// Canonical signature of the gated mint.
pub const MINT_OBJECT_SIGNATURE: &str = "mintObject(address,uint128)";

/// Canonical signature of the gated burn.
pub const BURN_OBJECT_SIGNATURE: &str = "burnObject(address,uint128)";

/// Persistent ledger state.
///
/// Holdings are written only by the ledger's logic; code outside the crate
/// cannot add or drop a holding directly:
///
/// ```compile_fail
/// use atlas_core::{Address, GlobalId};
/// use atlas_registry::OwnershipStorage;
///
/// let mut storage = OwnershipStorage::new(Address::derive("owner"));
/// storage.insert(Address::derive("mallory"), GlobalId::from_u128(1));
/// ```
///
/// ```compile_fail
/// use atlas_core::{Address, GlobalId};
/// use atlas_registry::OwnershipStorage;
///
/// let mut storage = OwnershipStorage::new(Address::derive("owner"));
/// storage.remove(GlobalId::from_u128(1));
/// ```
#[derive(Debug)]
pub struct OwnershipStorage {
    guard: Guard,
    owners: JournaledMap<GlobalId, Address>,
    balances: JournaledMap<Address, u64>,
    retired: JournaledMap<GlobalId, Address>,
    token_at: JournaledMap<u64, GlobalId>,
    position: JournaledMap<GlobalId, u64>,
}

impl OwnershipStorage {
    /// Empty ledger owned by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            guard: Guard::new(owner),
            owners: JournaledMap::new(),
            balances: JournaledMap::new(),
            retired: JournaledMap::new(),
            token_at: JournaledMap::new(),
            position: JournaledMap::new(),
        }
    }

    /// Access-control state.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }

    pub(crate) fn guard_mut(&mut self) -> &mut Guard {
        &mut self.guard
    }

    /// Holder of `id`.
    pub fn owner_of(&self, id: GlobalId) -> Result<Address, RegistryError> {
        self.owners
            .get(&id)
            .copied()
            .ok_or(RegistryError::NonexistentToken(id))
    }

    /// Whether `id` has been minted and not burned.
    pub fn exists(&self, id: GlobalId) -> bool {
        self.owners.contains_key(&id)
    }

    /// Whether `id` was minted once and later burned.
    pub fn is_retired(&self, id: GlobalId) -> bool {
        self.retired.contains_key(&id)
    }

    /// Number of tokens held by `holder`.
    pub fn balance_of(&self, holder: &Address) -> u64 {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    /// Total number of live tokens.
    pub fn total_supply(&self) -> u64 {
        self.token_at.len() as u64
    }

    /// Live token at position `index`.
    pub fn token_by_index(&self, index: u64) -> Result<GlobalId, RegistryError> {
        self.token_at
            .get(&index)
            .copied()
            .ok_or(RegistryError::IndexOutOfBounds {
                index,
                supply: self.total_supply(),
            })
    }

    /// Record `id` as held by `to`. Callers have checked `id` is free.
    pub(crate) fn insert(&mut self, to: Address, id: GlobalId) {
        let index = self.total_supply();
        self.owners.insert(id, to);
        self.credit(to);
        self.token_at.insert(index, id);
        self.position.insert(id, index);
    }

    /// Drop `id` from the live set and retire it, returning its holder.
    pub(crate) fn remove(&mut self, id: GlobalId) -> Option<Address> {
        let holder = self.owners.remove(&id)?;
        self.debit(&holder);
        if let Some(index) = self.position.remove(&id) {
            let last = self.total_supply() - 1;
            if index != last {
                if let Some(moved) = self.token_at.get(&last).copied() {
                    self.token_at.insert(index, moved);
                    self.position.insert(moved, index);
                }
            }
            self.token_at.remove(&last);
        }
        self.retired.insert(id, holder);
        Some(holder)
    }

    /// Hand `id` to `to` without changing its position.
    pub(crate) fn reassign(&mut self, id: GlobalId, to: Address) -> Option<Address> {
        let from = self.owners.insert(id, to)?;
        self.debit(&from);
        self.credit(to);
        Some(from)
    }

    fn credit(&mut self, holder: Address) {
        let balance = self.balance_of(&holder);
        self.balances.insert(holder, balance + 1);
    }

    fn debit(&mut self, holder: &Address) {
        match self.balance_of(holder) {
            0 => {}
            1 => {
                self.balances.remove(holder);
            }
            n => {
                self.balances.insert(*holder, n - 1);
            }
        }
    }
}

impl Transactional for OwnershipStorage {
    type Snapshot = Guard;

    fn begin(&mut self) -> Guard {
        self.owners.begin();
        self.balances.begin();
        self.retired.begin();
        self.token_at.begin();
        self.position.begin();
        self.guard.clone()
    }

    fn rollback(&mut self, guard: Guard) {
        self.owners.rollback(());
        self.balances.rollback(());
        self.retired.rollback(());
        self.token_at.rollback(());
        self.position.rollback(());
        self.guard = guard;
    }

    fn commit(&mut self) {
        self.owners.commit();
        self.balances.commit();
        self.retired.commit();
        self.token_at.commit();
        self.position.commit();
    }
}

/// Collaborators an ownership call runs against.
pub struct OwnershipEnv<'a> {
    /// Stable address of the ledger.
    pub module: Address,
    /// Ledger storage.
    pub storage: &'a mut OwnershipStorage,
    /// Identifier registry, for validating minted identifiers.
    pub encoder: &'a InterstellarEncoder,
    /// Installed authorities.
    pub authorities: &'a AuthorityDirectory,
}

/// Replaceable ledger behaviour.
pub trait OwnershipLogic: Implementation {
    /// Mint `id` to `to`. Gated.
    fn mint_object(
        &self,
        env: &mut OwnershipEnv<'_>,
        caller: &Address,
        to: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError>;

    /// Burn `id`, which `from` must hold. Gated.
    fn burn_object(
        &self,
        env: &mut OwnershipEnv<'_>,
        caller: &Address,
        from: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError>;

    /// Move `id` from the caller to `to`.
    fn transfer(
        &self,
        env: &mut OwnershipEnv<'_>,
        caller: &Address,
        to: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError>;
}

/// First ledger implementation.
#[derive(Debug, Default)]
pub struct ObjectOwnershipV1;

impl Implementation for ObjectOwnershipV1 {
    fn implementation_name(&self) -> &str {
        "ObjectOwnershipV1"
    }
}

impl OwnershipLogic for ObjectOwnershipV1 {
    fn mint_object(
        &self,
        env: &mut OwnershipEnv<'_>,
        caller: &Address,
        to: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        env.storage.guard().ensure(
            env.authorities,
            caller,
            &env.module,
            Selector::of(MINT_OBJECT_SIGNATURE),
        )?;
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        env.encoder.decode(id)?;
        if env.storage.exists(id) || env.storage.is_retired(id) {
            tracing::warn!(%id, "identifier already issued");
            return Err(RegistryError::AlreadyAssigned(id));
        }
        env.storage.insert(to, id);
        tracing::info!(%id, %to, minter = %caller, "object minted");
        Ok(())
    }

    fn burn_object(
        &self,
        env: &mut OwnershipEnv<'_>,
        caller: &Address,
        from: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        env.storage.guard().ensure(
            env.authorities,
            caller,
            &env.module,
            Selector::of(BURN_OBJECT_SIGNATURE),
        )?;
        if env.storage.owner_of(id)? != from {
            return Err(RegistryError::NotHolder { caller: from, id });
        }
        env.storage.remove(id);
        tracing::info!(%id, %from, burner = %caller, "object burned");
        Ok(())
    }

    fn transfer(
        &self,
        env: &mut OwnershipEnv<'_>,
        caller: &Address,
        to: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        if env.storage.owner_of(id)? != *caller {
            return Err(RegistryError::NotHolder { caller: *caller, id });
        }
        if to.is_zero() {
            return Err(RegistryError::ZeroAddress);
        }
        env.storage.reassign(id, to);
        tracing::debug!(%id, from = %caller, %to, "object transferred");
        Ok(())
    }
}

/// The proxied ownership ledger.
pub type ObjectOwnership = Proxy<OwnershipStorage, dyn OwnershipLogic>;

impl Proxy<OwnershipStorage, dyn OwnershipLogic> {
    fn env<'a>(
        &'a mut self,
        encoder: &'a InterstellarEncoder,
        authorities: &'a AuthorityDirectory,
    ) -> OwnershipEnv<'a> {
        OwnershipEnv {
            module: self.address(),
            storage: self.storage_mut(),
            encoder,
            authorities,
        }
    }

    /// Mint through the current implementation.
    pub fn mint_object(
        &mut self,
        encoder: &InterstellarEncoder,
        authorities: &AuthorityDirectory,
        caller: &Address,
        to: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        let logic = self.implementation()?;
        logic.mint_object(&mut self.env(encoder, authorities), caller, to, id)
    }

    /// Burn through the current implementation.
    pub fn burn_object(
        &mut self,
        encoder: &InterstellarEncoder,
        authorities: &AuthorityDirectory,
        caller: &Address,
        from: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        let logic = self.implementation()?;
        logic.burn_object(&mut self.env(encoder, authorities), caller, from, id)
    }

    /// Transfer through the current implementation.
    pub fn transfer(
        &mut self,
        encoder: &InterstellarEncoder,
        authorities: &AuthorityDirectory,
        caller: &Address,
        to: Address,
        id: GlobalId,
    ) -> Result<(), RegistryError> {
        let logic = self.implementation()?;
        logic.transfer(&mut self.env(encoder, authorities), caller, to, id)
    }

    /// Holder of `id`.
    pub fn owner_of(&self, id: GlobalId) -> Result<Address, RegistryError> {
        self.storage().owner_of(id)
    }

    /// Whether `id` exists.
    pub fn exists(&self, id: GlobalId) -> bool {
        self.storage().exists(id)
    }

    /// Number of tokens held by `holder`.
    pub fn balance_of(&self, holder: &Address) -> u64 {
        self.storage().balance_of(holder)
    }

    /// Total number of live tokens.
    pub fn total_supply(&self) -> u64 {
        self.storage().total_supply()
    }

    /// Live token at position `index`.
    pub fn token_by_index(&self, index: u64) -> Result<GlobalId, RegistryError> {
        self.storage().token_by_index(index)
    }
}
