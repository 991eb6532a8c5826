//! Authority errors.

use atlas_core::{Address, Selector};
use thiserror::Error;

/// Errors raised by access-control checks and authority administration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthorityError {
    /// The caller may not perform this operation on this target.
    #[error("{caller} is not authorized to call {selector} on {target}")]
    Unauthorized {
        /// Account that attempted the call.
        caller: Address,
        /// Module or authority the call was aimed at.
        target: Address,
        /// Operation that was attempted.
        selector: Selector,
    },

    /// No authority is installed at this address.
    #[error("no authority installed at {0}")]
    UnknownAuthority(Address),

    /// An authority already occupies this address.
    #[error("an authority is already installed at {0}")]
    AddressInUse(Address),

    /// The authority at this address is not of the requested kind.
    #[error("authority at {address} is not a {expected}")]
    WrongKind {
        /// Address that was looked up.
        address: Address,
        /// Kind the caller asked for.
        expected: &'static str,
    },
}
