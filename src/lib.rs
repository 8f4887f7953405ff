//! Platform, version and environment metadata, plus the constraint engine
//! that decides whether a piece of platform-specific code should be loaded.
//!
//! A [`Constraint`] is a predicate over the facts an [`Environment`] exposes
//! (loaded mods, mapping flavor, platforms, side and Minecraft version).
//! [`Constraints`] composes several of them as an AND-set plus an optional OR-set.
//! Declarations written in the plain [`Declaration`] schema are translated into
//! this model up-front, so evaluation never has to resolve symbols.
extern crate indexmap;
extern crate failure;
extern crate failure_derive;
extern crate serde;
extern crate serde_derive;
extern crate serde_json;
extern crate itertools;
extern crate parking_lot;
extern crate lazycell;
extern crate log;
#[macro_use]
extern crate scopeguard;

#[macro_use]
mod utils;
mod version;
mod platform;
mod environment;
mod constraint;
mod constraints;
mod evaluator;
pub mod versions;
pub mod declaration;
pub mod debug;

pub use self::version::{MinecraftVersion, VersionRange, InvalidMinecraftVersion, InvalidVersionRange};
pub use self::platform::{Platform, Side, Mappings};
pub use self::environment::{Environment, Snapshot, SnapshotConfig};
pub use self::constraint::{Constraint, ConstraintBuilder};
pub use self::constraints::Constraints;
pub use self::evaluator::{Evaluator, install, global, EnvironmentNotInstalled, EnvironmentAlreadyInstalled, DEFAULT_CACHE_CAPACITY};
pub use self::declaration::{Declaration, Dependency, Versions, MultiDeclaration, ConstraintDeclaration, Condition, EmptyDependencyId};
pub use self::utils::{ClockCache, UnknownSymbol};
