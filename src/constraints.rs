use std::collections::BTreeSet;
use std::fmt::{self, Debug, Display, Formatter};

use itertools::Itertools;
use lazycell::AtomicLazyCell;

use crate::{Constraint, Evaluator, EnvironmentNotInstalled};
use crate::{debug, evaluator};

/// A composite condition: every constraint in the AND-set,
/// plus at least one of the OR-set when it isn't empty.
///
/// The result is computed at most once per instance,
/// since the environment it's evaluated against never changes.
pub struct Constraints {
    and: BTreeSet<Constraint>,
    or: BTreeSet<Constraint>,
    result: AtomicLazyCell<bool>
}
impl Constraints {
    pub fn new<A, O>(and: A, or: O) -> Constraints
        where A: IntoIterator<Item=Constraint>, O: IntoIterator<Item=Constraint> {
        Constraints {
            and: and.into_iter().collect(),
            or: or.into_iter().collect(),
            result: AtomicLazyCell::new()
        }
    }
    /// Require every one of the specified constraints
    #[inline]
    pub fn all<A: IntoIterator<Item=Constraint>>(and: A) -> Constraints {
        Constraints::new(and, None)
    }
    /// Require at least one of the specified constraints
    #[inline]
    pub fn any<O: IntoIterator<Item=Constraint>>(or: O) -> Constraints {
        Constraints::new(None, or)
    }
    #[inline]
    pub fn and(&self) -> &BTreeSet<Constraint> {
        &self.and
    }
    #[inline]
    pub fn or(&self) -> &BTreeSet<Constraint> {
        &self.or
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.and.is_empty() && self.or.is_empty()
    }
    pub fn evaluate(&self, evaluator: &Evaluator, verbose: bool) -> bool {
        if let Some(result) = self.result.get() {
            return result;
        }
        let result = self.and.iter().all(|constraint| evaluator.evaluate(constraint, verbose))
            && (self.or.is_empty() || self.or.iter().any(|constraint| evaluator.evaluate(constraint, verbose)));
        // Losing the race is fine since both threads computed the same value
        let _ = self.result.fill(result);
        result
    }
    /// Evaluate against the installed process-wide environment
    pub fn result(&self) -> Result<bool, EnvironmentNotInstalled> {
        Ok(self.evaluate(evaluator::global()?, debug::is_verbose()))
    }
}
impl Clone for Constraints {
    /// Clones the constraints but not the memoized result
    fn clone(&self) -> Constraints {
        Constraints::new(self.and.iter().cloned(), self.or.iter().cloned())
    }
}
impl PartialEq for Constraints {
    #[inline]
    fn eq(&self, other: &Constraints) -> bool {
        self.and == other.and && self.or == other.or
    }
}
impl Eq for Constraints {}
impl Debug for Constraints {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Constraints")
            .field("and", &self.and)
            .field("or", &self.or)
            .field("result", &self.result.get())
            .finish()
    }
}
impl Display for Constraints {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f, "Constraints{{and=[{}], or=[{}]}}",
            self.and.iter().join(", "),
            self.or.iter().join(", ")
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{Snapshot, Platform, Side, MinecraftVersion};

    fn fabric_with(mods: &[&str]) -> Evaluator {
        Evaluator::new(Snapshot::new("1.20.1".parse().unwrap(), Side::Client)
            .with_platform(Platform::Fabric)
            .with_mods(mods.iter().cloned()))
    }
    fn either_loader() -> Constraints {
        Constraints::new(
            vec![Constraint::builder().deps(vec!["depA"]).build()],
            vec![
                Constraint::builder().platform(vec![Platform::Fabric]).build(),
                Constraint::builder().platform(vec![Platform::Forge]).build(),
            ]
        )
    }

    #[test]
    fn empty_is_satisfied() {
        let evaluator = Evaluator::new(Snapshot::new(MinecraftVersion::UNKNOWN, Side::Server));
        let empty = Constraints::new(None, None);
        assert!(empty.is_empty());
        assert!(empty.evaluate(&evaluator, false));
    }
    #[test]
    fn and_with_or() {
        assert!(either_loader().evaluate(&fabric_with(&["depA"]), false));
        assert!(!either_loader().evaluate(&fabric_with(&[]), false));
        let paper = Evaluator::new(Snapshot::new("1.20.1".parse().unwrap(), Side::Server)
            .with_platform(Platform::Paper)
            .with_mods(vec!["depA"]));
        assert!(!either_loader().evaluate(&paper, false));
    }
    #[test]
    fn or_only() {
        let constraints = Constraints::any(vec![
            Constraint::builder().platform(vec![Platform::Forge]).build(),
        ]);
        assert!(!constraints.evaluate(&fabric_with(&[]), false));
        let constraints = Constraints::all(vec![
            Constraint::builder().platform(vec![Platform::Fabric]).build(),
        ]);
        assert!(constraints.evaluate(&fabric_with(&[]), false));
    }
    #[test]
    fn result_is_memoized() {
        let constraints = either_loader();
        assert!(constraints.evaluate(&fabric_with(&["depA"]), false));
        // A different environment doesn't change an already computed result
        assert!(constraints.evaluate(&fabric_with(&[]), false));
        assert!(!constraints.clone().evaluate(&fabric_with(&[]), false));
        assert_eq!(constraints, either_loader());
    }
}
