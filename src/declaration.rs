//! The plain data schema that constraints are declared with.
//!
//! Declarations can come from annotations, config files or code, and they reference
//! versions, platforms, sides and mappings symbolically. Translation into a [`Constraint`]
//! resolves every symbol up-front and fails on the first one that doesn't resolve,
//! so a typo is reported instead of quietly loosening or tightening the constraint.
use failure::Error;
use failure_derive::Fail;
use serde_derive::{Serialize, Deserialize};

use crate::{Constraint, Constraints, Evaluator, EnvironmentNotInstalled};
use crate::{Platform, Side, Mappings, MinecraftVersion, versions};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct Declaration {
    pub deps: Vec<Dependency>,
    pub not_deps: Vec<Dependency>,
    pub mappings: Option<String>,
    pub platform: Vec<String>,
    pub not_platform: Vec<String>,
    pub side: Vec<String>,
    pub version: Versions,
    pub not_version: Versions,
    pub invert: bool
}
impl Declaration {
    pub fn to_constraint(&self) -> Result<Constraint, Error> {
        let mut builder = Constraint::builder()
            .deps(flatten_dependencies(&self.deps)?)
            .not_deps(flatten_dependencies(&self.not_deps)?)
            .platform(resolve_all::<Platform>(&self.platform)?)
            .not_platform(resolve_all::<Platform>(&self.not_platform)?)
            .side(resolve_all::<Side>(&self.side)?)
            .version(self.version.resolve_values()?)
            .not_version(self.not_version.resolve_values()?)
            .invert(self.invert);
        if let Some(ref mappings) = self.mappings {
            builder = builder.mappings(mappings.parse::<Mappings>()?);
        }
        if let Some((min, max)) = self.version.resolve_bounds()? {
            builder = builder.min(min).max(max);
        }
        if let Some((min, max)) = self.not_version.resolve_bounds()? {
            builder = builder.not_min(min).not_max(max);
        }
        Ok(builder.build())
    }
}
fn resolve_all<T>(symbols: &[String]) -> Result<Vec<T>, Error>
    where T: ::std::str::FromStr, T::Err: ::failure::Fail {
    let mut result = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        result.push(symbol.parse::<T>()?);
    }
    Ok(result)
}
/// Flatten each dependency and its aliases into a single set of ids
fn flatten_dependencies(dependencies: &[Dependency]) -> Result<Vec<String>, Error> {
    let mut ids = Vec::new();
    for dependency in dependencies {
        for id in dependency.ids() {
            let id = id.trim();
            if id.is_empty() {
                return Err(EmptyDependencyId.into())
            }
            ids.push(id.to_string());
        }
    }
    Ok(ids)
}

/// A mod or plugin id along with the other ids the same dependency is known by.
///
/// Deserializes from either a plain string or `{"id": ..., "aliases": [...]}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "DependencyRepr")]
pub struct Dependency {
    pub id: String,
    pub aliases: Vec<String>
}
impl Dependency {
    #[inline]
    pub fn new<S: Into<String>>(id: S) -> Dependency {
        Dependency { id: id.into(), aliases: Vec::new() }
    }
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Dependency
        where I: IntoIterator<Item=S>, S: Into<String> {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }
    pub fn ids(&self) -> impl Iterator<Item=&str> {
        Some(self.id.as_str()).into_iter()
            .chain(self.aliases.iter().map(String::as_str))
    }
}
#[derive(Deserialize)]
#[serde(untagged)]
enum DependencyRepr {
    Id(String),
    Full {
        id: String,
        #[serde(default)]
        aliases: Vec<String>
    }
}
impl From<DependencyRepr> for Dependency {
    fn from(repr: DependencyRepr) -> Dependency {
        match repr {
            DependencyRepr::Id(id) => Dependency::new(id),
            DependencyRepr::Full { id, aliases } => Dependency { id, aliases }
        }
    }
}

/// A set of exact versions plus an inclusive range, all referenced symbolically
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Versions {
    pub values: Vec<String>,
    pub min: Option<String>,
    pub max: Option<String>
}
impl Versions {
    fn resolve_values(&self) -> Result<Vec<MinecraftVersion>, Error> {
        let mut result = Vec::with_capacity(self.values.len());
        for value in &self.values {
            result.push(versions::resolve(value)?);
        }
        Ok(result)
    }
    /// Resolve the range, or `None` if neither end was declared
    fn resolve_bounds(&self) -> Result<Option<(MinecraftVersion, MinecraftVersion)>, Error> {
        if self.min.is_none() && self.max.is_none() {
            return Ok(None)
        }
        let bound = |symbol: &Option<String>| -> Result<MinecraftVersion, Error> {
            match *symbol {
                Some(ref symbol) => Ok(versions::resolve(symbol)?),
                None => Ok(MinecraftVersion::UNKNOWN)
            }
        };
        Ok(Some((bound(&self.min)?, bound(&self.max)?)))
    }
}

/// Several declarations, all of the `and` group plus at least one of the `or` group
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultiDeclaration {
    pub and: Vec<Declaration>,
    pub or: Vec<Declaration>
}
impl MultiDeclaration {
    pub fn to_constraints(&self) -> Result<Constraints, Error> {
        let translate = |declarations: &[Declaration]| -> Result<Vec<Constraint>, Error> {
            declarations.iter().map(Declaration::to_constraint).collect()
        };
        Ok(Constraints::new(translate(&self.and)?, translate(&self.or)?))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintDeclaration {
    Multi(MultiDeclaration),
    Single(Declaration)
}
impl ConstraintDeclaration {
    pub fn from_json(json: &str) -> Result<ConstraintDeclaration, Error> {
        Ok(::serde_json::from_str(json)?)
    }
    pub fn to_condition(&self) -> Result<Condition, Error> {
        Ok(match *self {
            ConstraintDeclaration::Single(ref declaration) => {
                Condition::Single(declaration.to_constraint()?)
            },
            ConstraintDeclaration::Multi(ref multi) => {
                Condition::Multi(multi.to_constraints()?)
            }
        })
    }
}
impl From<Declaration> for ConstraintDeclaration {
    #[inline]
    fn from(declaration: Declaration) -> Self {
        ConstraintDeclaration::Single(declaration)
    }
}
impl From<MultiDeclaration> for ConstraintDeclaration {
    #[inline]
    fn from(multi: MultiDeclaration) -> Self {
        ConstraintDeclaration::Multi(multi)
    }
}

/// A translated declaration, ready to evaluate
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    Single(Constraint),
    Multi(Constraints)
}
impl Condition {
    pub fn evaluate(&self, evaluator: &Evaluator, verbose: bool) -> bool {
        match *self {
            Condition::Single(ref constraint) => evaluator.evaluate(constraint, verbose),
            Condition::Multi(ref constraints) => constraints.evaluate(evaluator, verbose)
        }
    }
    pub fn result(&self) -> Result<bool, EnvironmentNotInstalled> {
        match *self {
            Condition::Single(ref constraint) => constraint.result(),
            Condition::Multi(ref constraints) => constraints.result()
        }
    }
}
impl From<Constraint> for Condition {
    #[inline]
    fn from(constraint: Constraint) -> Self {
        Condition::Single(constraint)
    }
}
impl From<Constraints> for Condition {
    #[inline]
    fn from(constraints: Constraints) -> Self {
        Condition::Multi(constraints)
    }
}

#[derive(Debug, Fail)]
#[fail(display = "Dependency ids must not be empty")]
pub struct EmptyDependencyId;
