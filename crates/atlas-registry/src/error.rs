//! # Registry Errors
//!
//! Every failure a registry operation can report. Lower-layer errors from
//! the codecs and the authority checks are wrapped unchanged, so callers can
//! still match on `CodecError::OutOfRange` or `AuthorityError::Unauthorized`.
//!
//! All variants are terminal for the attempt that raised them. The `Atlas`
//! context discards every state change made by a failed operation.

use atlas_authority::AuthorityError;
use atlas_core::{Address, ClassTag, CodecError, GlobalId};
use thiserror::Error;

/// Errors raised by registry modules.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Coordinate, rate or identifier encoding failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Access control rejected the call.
    #[error(transparent)]
    Authority(#[from] AuthorityError),

    /// The module was never registered with the encoder.
    #[error("module {0} is not registered")]
    UnregisteredModule(Address),

    /// The module is already registered.
    #[error("module {0} is already registered")]
    AlreadyRegistered(Address),

    /// The encoder's module table is full.
    #[error("module registration table is full")]
    RegistryFull,

    /// The identifier was not produced by this encoder.
    #[error("identifier {0} is not recognized")]
    UnknownIdentifier(GlobalId),

    /// An asset already exists under this identifier.
    #[error("identifier {0} is already assigned")]
    AlreadyAssigned(GlobalId),

    /// No asset exists under this identifier.
    #[error("token {0} does not exist")]
    NonexistentToken(GlobalId),

    /// The operation requires a module of a different class.
    #[error("module {module} has {actual}, operation requires {expected}")]
    ClassMismatch {
        /// Module that was used.
        module: Address,
        /// Class the operation needs.
        expected: ClassTag,
        /// Class the module was registered with.
        actual: ClassTag,
    },

    /// A proxy has no implementation installed yet.
    #[error("proxy {0} has no implementation")]
    NotInitialized(Address),

    /// A settings lookup found nothing under this name.
    #[error("setting {0:?} is not set")]
    SettingNotFound(String),

    /// The address is not one of the five resource tokens.
    #[error("{0} is not a registered resource token")]
    UnknownResource(Address),

    /// The caller does not hold the token it tried to move.
    #[error("{caller} does not hold token {id}")]
    NotHolder {
        /// Account that attempted the move.
        caller: Address,
        /// Token concerned.
        id: GlobalId,
    },

    /// Enumeration index at or past the live supply.
    #[error("index {index} is out of bounds for a supply of {supply}")]
    IndexOutOfBounds {
        /// Requested position.
        index: u64,
        /// Live tokens at the time of the call.
        supply: u64,
    },

    /// The zero address cannot receive or own assets.
    #[error("the zero address cannot hold assets")]
    ZeroAddress,
}

impl RegistryError {
    /// Whether this error is an access-control rejection.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Authority(AuthorityError::Unauthorized { .. }))
    }
}
