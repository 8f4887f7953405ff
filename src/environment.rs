use std::io::Read;
use std::fs::File;
use std::path::Path;

use failure::Error;
use indexmap::IndexSet;
use serde_derive::Deserialize;

use crate::{MinecraftVersion, Platform, Side, Mappings};

/// The facts about the running process that constraints are evaluated against.
///
/// Implementations are expected to be populated eagerly and answer from memory.
/// The dependency queries are fallible because they may have to ask the host loader,
/// and a failure there is treated as "not satisfied" by the evaluator.
pub trait Environment: Send + Sync {
    fn version(&self) -> &MinecraftVersion;
    fn mappings(&self) -> Mappings;
    fn platforms(&self) -> &IndexSet<Platform>;
    fn side(&self) -> Side;
    /// Check if any of the specified mod or plugin ids is loaded
    fn is_any_mod_loaded(&self, ids: &[&str]) -> Result<bool, Error>;
    /// Check if every one of the specified mod or plugin ids is loaded
    fn are_all_mods_loaded(&self, ids: &[&str]) -> Result<bool, Error> {
        for &id in ids {
            if !self.is_any_mod_loaded(&[id])? {
                return Ok(false)
            }
        }
        Ok(true)
    }
    #[inline]
    fn is_platform_present(&self, platform: Platform) -> bool {
        self.platforms().contains(&platform)
    }
}

/// An in-memory [`Environment`], usually loaded from the detection results of the host.
#[derive(Clone, Debug, Deserialize)]
#[serde(from = "SnapshotConfig")]
pub struct Snapshot {
    version: MinecraftVersion,
    mappings: Mappings,
    platforms: IndexSet<Platform>,
    side: Side,
    mods: IndexSet<String>
}
impl Snapshot {
    #[inline]
    pub fn new(version: MinecraftVersion, side: Side) -> Snapshot {
        Snapshot {
            version, side,
            mappings: Mappings::None,
            platforms: IndexSet::new(),
            mods: IndexSet::new()
        }
    }
    #[inline]
    pub fn with_mappings(mut self, mappings: Mappings) -> Snapshot {
        self.mappings = mappings;
        self
    }
    /// Add the specified platform, along with every platform it implies
    pub fn with_platform(mut self, platform: Platform) -> Snapshot {
        self.platforms.insert(platform);
        self.platforms.extend(platform.implied().iter().cloned());
        self
    }
    pub fn with_mods<I, S>(mut self, mods: I) -> Snapshot
        where I: IntoIterator<Item=S>, S: Into<String> {
        self.mods.extend(mods.into_iter().map(Into::into));
        self
    }
    pub fn load(path: &Path) -> Result<Snapshot, Error> {
        Snapshot::from_reader(File::open(path)?)
    }
    pub fn from_reader<R: Read>(reader: R) -> Result<Snapshot, Error> {
        Ok(::serde_json::from_reader(reader)?)
    }
}
impl Environment for Snapshot {
    #[inline]
    fn version(&self) -> &MinecraftVersion {
        &self.version
    }
    #[inline]
    fn mappings(&self) -> Mappings {
        self.mappings
    }
    #[inline]
    fn platforms(&self) -> &IndexSet<Platform> {
        &self.platforms
    }
    #[inline]
    fn side(&self) -> Side {
        self.side
    }
    fn is_any_mod_loaded(&self, ids: &[&str]) -> Result<bool, Error> {
        Ok(ids.iter().any(|id| self.mods.contains(*id)))
    }
}

/// The on-disk form of a [`Snapshot`]
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SnapshotConfig {
    pub version: MinecraftVersion,
    #[serde(default)]
    pub mappings: Mappings,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    pub side: Side,
    #[serde(default)]
    pub mods: Vec<String>
}
impl From<SnapshotConfig> for Snapshot {
    fn from(config: SnapshotConfig) -> Snapshot {
        let snapshot = Snapshot::new(config.version, config.side)
            .with_mappings(config.mappings)
            .with_mods(config.mods);
        config.platforms.into_iter()
            .fold(snapshot, Snapshot::with_platform)
    }
}
