//! # atlas-authority — Pluggable Access Control
//!
//! Every state-mutating entry point of a registry module asks one question
//! before it touches storage: may `caller` invoke `selector` on `target`?
//! The answer comes from whichever [`Authority`] the module currently
//! references.
//!
//! ## Pieces
//!
//! - [`Authority`]: the one-method decision interface.
//! - [`WhitelistAuthority`]: coarse grants, one flag per (target, caller).
//! - [`SignatureAuthority`]: fine grants, one flag per (caller, target, selector).
//! - [`AuthorityDirectory`]: installed authorities keyed by address. Modules
//!   hold an address, never a copy of the rules, so grants can change or the
//!   whole authority can be swapped without touching the module.
//! - [`Guard`]: owner + current authority reference, embedded in module
//!   storage so it survives logic upgrades.
//!
//! ## Failure mode
//!
//! Rejection is always an explicit [`AuthorityError::Unauthorized`], never a
//! silent no-op.

pub mod authority;
pub mod directory;
pub mod error;
pub mod guard;
pub mod signature;
pub mod whitelist;

pub use authority::Authority;
pub use directory::AuthorityDirectory;
pub use error::AuthorityError;
pub use guard::Guard;
pub use signature::{Grant, SignatureAuthority};
pub use whitelist::WhitelistAuthority;
