//! # The Authority Interface
//!
//! One decision method plus the hooks the directory needs to hand out
//! typed mutable access to an installed authority's rule table.

use std::any::Any;

use atlas_core::{Address, Selector};

/// Decides whether a caller may invoke an operation on a target module.
///
/// Implementations must be `Send + Sync` so a directory can be shared
/// read-only across threads by embedders.
pub trait Authority: Send + Sync + 'static {
    /// Address this authority is installed at.
    fn address(&self) -> Address;

    /// Whether `caller` may invoke `selector` on `target`.
    fn can_call(&self, caller: &Address, target: &Address, selector: Selector) -> bool;

    /// Human-readable name for diagnostics and logging.
    fn authority_name(&self) -> &str;

    /// Upcast for typed lookup.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed mutable lookup.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
