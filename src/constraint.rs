use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};

use itertools::Itertools;

use crate::{MinecraftVersion, Platform, Side, Mappings, Evaluator, EnvironmentNotInstalled};
use crate::{debug, evaluator};

/// A predicate over the running environment.
///
/// Every field defaults to "no constraint", so `Constraint::default()` is always satisfied.
/// Constraints are plain values: two constraints with the same fields are interchangeable,
/// which is what lets the [`Evaluator`] cache results by value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Constraint {
    deps: BTreeSet<String>,
    not_deps: BTreeSet<String>,
    mappings: Mappings,
    platform: BTreeSet<Platform>,
    not_platform: BTreeSet<Platform>,
    side: BTreeSet<Side>,
    version: BTreeSet<MinecraftVersion>,
    min: MinecraftVersion,
    max: MinecraftVersion,
    not_version: BTreeSet<MinecraftVersion>,
    not_min: MinecraftVersion,
    not_max: MinecraftVersion,
    invert: bool
}
impl Constraint {
    #[inline]
    pub fn builder() -> ConstraintBuilder {
        ConstraintBuilder(Constraint::default())
    }
    /// Dependency ids (aliases included), any of which satisfies the requirement
    #[inline]
    pub fn deps(&self) -> &BTreeSet<String> {
        &self.deps
    }
    /// Dependency ids (aliases included) that must not be loaded
    #[inline]
    pub fn not_deps(&self) -> &BTreeSet<String> {
        &self.not_deps
    }
    #[inline]
    pub fn mappings(&self) -> Mappings {
        self.mappings
    }
    #[inline]
    pub fn platform(&self) -> &BTreeSet<Platform> {
        &self.platform
    }
    #[inline]
    pub fn not_platform(&self) -> &BTreeSet<Platform> {
        &self.not_platform
    }
    #[inline]
    pub fn side(&self) -> &BTreeSet<Side> {
        &self.side
    }
    #[inline]
    pub fn version(&self) -> &BTreeSet<MinecraftVersion> {
        &self.version
    }
    #[inline]
    pub fn min(&self) -> &MinecraftVersion {
        &self.min
    }
    #[inline]
    pub fn max(&self) -> &MinecraftVersion {
        &self.max
    }
    #[inline]
    pub fn not_version(&self) -> &BTreeSet<MinecraftVersion> {
        &self.not_version
    }
    #[inline]
    pub fn not_min(&self) -> &MinecraftVersion {
        &self.not_min
    }
    #[inline]
    pub fn not_max(&self) -> &MinecraftVersion {
        &self.not_max
    }
    #[inline]
    pub fn invert(&self) -> bool {
        self.invert
    }
    /// Check if the forbidden version range is actually bounded on some side
    #[inline]
    pub(crate) fn has_forbidden_range(&self) -> bool {
        !self.not_min.is_unknown() || !self.not_max.is_unknown()
    }
    /// Evaluate this constraint with the specified evaluator
    #[inline]
    pub fn evaluate(&self, evaluator: &Evaluator, verbose: bool) -> bool {
        evaluator.evaluate(self, verbose)
    }
    /// Evaluate this constraint against the installed process-wide environment,
    /// logging details if the current thread is in a [verbose scope](crate::debug::scoped).
    pub fn result(&self) -> Result<bool, EnvironmentNotInstalled> {
        Ok(evaluator::global()?.evaluate(self, debug::is_verbose()))
    }
}
impl Display for Constraint {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "Constraint{{deps=[{}], notDeps=[{}], mappings={}, platform=[{}], notPlatform=[{}], \
            side=[{}], version=[{}], min={}, max={}, notVersion=[{}], notMin={}, notMax={}",
            self.deps.iter().join(", "),
            self.not_deps.iter().join(", "),
            self.mappings,
            self.platform.iter().join(", "),
            self.not_platform.iter().join(", "),
            self.side.iter().join(", "),
            self.version.iter().join(", "),
            self.min,
            self.max,
            self.not_version.iter().join(", "),
            self.not_min,
            self.not_max,
        )?;
        if self.invert {
            f.write_str(", inverted")?;
        }
        f.write_str("}")
    }
}

/// Accumulates the fields of a [`Constraint`].
///
/// Set-valued fields are extended by each call, so `deps` can be called once
/// for the primary ids and again for their aliases.
#[derive(Clone, Debug, Default)]
pub struct ConstraintBuilder(Constraint);
impl ConstraintBuilder {
    pub fn deps<I, S>(mut self, deps: I) -> Self where I: IntoIterator<Item=S>, S: Into<String> {
        self.0.deps.extend(deps.into_iter().map(Into::into));
        self
    }
    pub fn not_deps<I, S>(mut self, deps: I) -> Self where I: IntoIterator<Item=S>, S: Into<String> {
        self.0.not_deps.extend(deps.into_iter().map(Into::into));
        self
    }
    #[inline]
    pub fn mappings(mut self, mappings: Mappings) -> Self {
        self.0.mappings = mappings;
        self
    }
    pub fn platform<I: IntoIterator<Item=Platform>>(mut self, platform: I) -> Self {
        self.0.platform.extend(platform);
        self
    }
    pub fn not_platform<I: IntoIterator<Item=Platform>>(mut self, platform: I) -> Self {
        self.0.not_platform.extend(platform);
        self
    }
    pub fn side<I: IntoIterator<Item=Side>>(mut self, side: I) -> Self {
        self.0.side.extend(side);
        self
    }
    pub fn version<I: IntoIterator<Item=MinecraftVersion>>(mut self, version: I) -> Self {
        self.0.version.extend(version);
        self
    }
    #[inline]
    pub fn min(mut self, min: MinecraftVersion) -> Self {
        self.0.min = min;
        self
    }
    #[inline]
    pub fn max(mut self, max: MinecraftVersion) -> Self {
        self.0.max = max;
        self
    }
    pub fn not_version<I: IntoIterator<Item=MinecraftVersion>>(mut self, version: I) -> Self {
        self.0.not_version.extend(version);
        self
    }
    #[inline]
    pub fn not_min(mut self, not_min: MinecraftVersion) -> Self {
        self.0.not_min = not_min;
        self
    }
    #[inline]
    pub fn not_max(mut self, not_max: MinecraftVersion) -> Self {
        self.0.not_max = not_max;
        self
    }
    #[inline]
    pub fn invert(mut self, invert: bool) -> Self {
        self.0.invert = invert;
        self
    }
    #[inline]
    pub fn build(self) -> Constraint {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn builder_flattens_sets() {
        let constraint = Constraint::builder()
            .deps(vec!["a"])
            .deps(vec!["b", "a"])
            .platform(vec![Platform::Fabric, Platform::Fabric])
            .build();
        assert_eq!(constraint.deps().len(), 2);
        assert_eq!(constraint.platform().len(), 1);
        assert!(Constraint::min(&constraint).is_unknown());
        assert!(!constraint.has_forbidden_range());
    }
    #[test]
    fn equal_by_value() {
        let build = || Constraint::builder()
            .deps(vec!["b", "a"])
            .version(vec!["1.20.1".parse().unwrap()])
            .build();
        assert_eq!(build(), build());
        assert_ne!(build(), Constraint::builder().deps(vec!["a"]).build());
        assert_eq!(Constraint::builder().build(), Constraint::default());
    }
    #[test]
    fn display_is_deterministic() {
        let constraint = Constraint::builder()
            .deps(vec!["b", "a"])
            .side(vec![Side::Server])
            .min("1.18".parse().unwrap())
            .build();
        assert_eq!(
            format!("{}", constraint),
            "Constraint{deps=[a, b], notDeps=[], mappings=None, platform=[], notPlatform=[], \
            side=[Server], version=[], min=1.18, max=unknown, notVersion=[], notMin=unknown, notMax=unknown}"
        );
    }
}
