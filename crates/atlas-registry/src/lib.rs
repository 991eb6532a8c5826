//! # atlas-registry — Registry Modules
//!
//! The modules that share one global identifier space:
//!
//! - **Encoder** (`encoder.rs`): module registration table and the
//!   (module, local index) ↔ global identifier mapping, including the
//!   coordinate path for land.
//! - **Settings** (`settings.rs`): symbolic name → address store.
//! - **Journal** (`journal.rs`): per-key undo logs behind atomic calls.
//! - **Proxy** (`proxy.rs`): stable address + storage + swappable logic.
//! - **Ownership** (`ownership.rs`): proxied holder ledger; gated mint/burn,
//!   enumeration of live tokens.
//! - **Location** (`location.rs`): gated token → coordinate ledger.
//! - **Land** (`land.rs`): proxied parcel issuance, packed production rates
//!   and parcel flags.
//! - **Atlas** (`atlas.rs`): standard wiring and atomic entry points.
//!
//! Every state-mutating entry point consults its module's guard before
//! touching storage.

pub mod atlas;
pub mod encoder;
pub mod error;
pub mod journal;
pub mod land;
pub mod location;
pub mod ownership;
pub mod proxy;
pub mod settings;

// ─── Re-exports ─────────────────────────────────────────────────────

pub use atlas::{Atlas, Deployment, ModuleKind};
pub use encoder::{InterstellarEncoder, ModuleRegistration};
pub use error::RegistryError;
pub use journal::{JournaledMap, Transactional};
pub use land::{LandBase, LandBaseV1, LandDeps, LandEnv, LandLogic, LandStorage, Parcel};
pub use location::TokenLocation;
pub use ownership::{ObjectOwnership, ObjectOwnershipV1, OwnershipEnv, OwnershipLogic, OwnershipStorage};
pub use proxy::{Implementation, Proxy, ProxySnapshot};
pub use settings::{resource_setting, setting_ids, ResourceTokens, SettingsRegistry};
