use std::sync::Arc;

use failure::Error;
use failure_derive::Fail;
use itertools::Itertools;
use lazycell::AtomicLazyCell;
use log::{debug, warn};
use parking_lot::Mutex;

use crate::utils::ClockCache;
use crate::{Constraint, Environment};

pub const DEFAULT_CACHE_CAPACITY: usize = 512;

/// Evaluates constraints against an [`Environment`], remembering the results.
///
/// The environment is assumed not to change for the lifetime of the evaluator,
/// so every distinct constraint value is evaluated at most once while it stays in the cache.
pub struct Evaluator {
    environment: Arc<dyn Environment>,
    cache: Mutex<ClockCache<Constraint, bool>>
}
impl Evaluator {
    #[inline]
    pub fn new<E: Environment + 'static>(environment: E) -> Evaluator {
        Evaluator::with_capacity(Arc::new(environment), DEFAULT_CACHE_CAPACITY)
    }
    #[inline]
    pub fn with_capacity(environment: Arc<dyn Environment>, capacity: usize) -> Evaluator {
        Evaluator { environment, cache: Mutex::new(ClockCache::new(capacity)) }
    }
    #[inline]
    pub fn environment(&self) -> &dyn Environment {
        &*self.environment
    }
    /// The number of results currently cached
    #[inline]
    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }
    pub fn evaluate(&self, constraint: &Constraint, verbose: bool) -> bool {
        if let Some(&result) = self.cache.lock().get(constraint) {
            return result;
        }
        self.evaluate_fallback(constraint, verbose)
    }
    #[cold]
    fn evaluate_fallback(&self, constraint: &Constraint, verbose: bool) -> bool {
        if verbose {
            debug!("Evaluating constraint: {}", constraint);
        }
        /*
         * The cache lock isn't held while evaluating.
         * Two threads may race to evaluate the same constraint,
         * but the result is a pure function of the environment so they'll agree.
         */
        let result = match self.check(constraint, verbose) {
            Ok(result) => result != constraint.invert(),
            Err(cause) => {
                warn!("Unable to evaluate {}, treating it as unmet: {}", constraint, cause);
                false
            }
        };
        self.cache.lock().insert(constraint.clone(), result);
        result
    }
    fn check(&self, constraint: &Constraint, verbose: bool) -> Result<bool, Error> {
        Ok(self.eval_deps(constraint, verbose)?
            && self.eval_mappings(constraint, verbose)
            && self.eval_platform(constraint, verbose)
            && self.eval_side(constraint, verbose)
            && self.eval_version(constraint, verbose))
    }
    /// Check that some required dependency (or alias) is loaded,
    /// and that no forbidden dependency (or alias) is.
    pub fn eval_deps(&self, constraint: &Constraint, verbose: bool) -> Result<bool, Error> {
        let deps = constraint.deps().iter().map(String::as_str).collect_vec();
        if !deps.is_empty() && !self.environment.is_any_mod_loaded(&deps)? {
            if verbose {
                debug!("Dependency constraint failed. Required deps not found: {:?}", deps);
            }
            return Ok(false);
        }
        let not_deps = constraint.not_deps().iter().map(String::as_str).collect_vec();
        if !not_deps.is_empty() && self.environment.is_any_mod_loaded(&not_deps)? {
            if verbose {
                debug!("Dependency constraint failed. Forbidden deps found: {:?}", not_deps);
            }
            return Ok(false);
        }
        Ok(true)
    }
    pub fn eval_mappings(&self, constraint: &Constraint, verbose: bool) -> bool {
        let expected = constraint.mappings();
        let actual = self.environment.mappings();
        if expected != crate::Mappings::None && expected != actual {
            if verbose {
                debug!("Mappings constraint failed. Required: {}, Found: {}", expected, actual);
            }
            return false;
        }
        true
    }
    pub fn eval_platform(&self, constraint: &Constraint, verbose: bool) -> bool {
        let environment = &*self.environment;
        if let Some(missing) = constraint.platform().iter()
            .find(|&&platform| !environment.is_platform_present(platform)) {
            if verbose {
                debug!("Platform constraint failed. Required platform not found: {}", missing);
            }
            return false;
        }
        if let Some(forbidden) = constraint.not_platform().iter()
            .find(|&&platform| environment.is_platform_present(platform)) {
            if verbose {
                debug!("Platform constraint failed. Forbidden platform found: {}", forbidden);
            }
            return false;
        }
        true
    }
    pub fn eval_side(&self, constraint: &Constraint, verbose: bool) -> bool {
        let side = self.environment.side();
        if !constraint.side().is_empty() && !constraint.side().contains(&side) {
            if verbose {
                debug!(
                    "Side constraint failed. Required one of [{}], Found: {}",
                    constraint.side().iter().join(", "), side
                );
            }
            return false;
        }
        true
    }
    pub fn eval_version(&self, constraint: &Constraint, verbose: bool) -> bool {
        let version = self.environment.version();
        if !constraint.version().is_empty() && !constraint.version().contains(version) {
            if verbose {
                debug!(
                    "Version constraint failed. Required one of [{}], Found: {}",
                    constraint.version().iter().join(", "), version
                );
            }
            return false;
        }
        if !version.is_in_range(constraint.min(), constraint.max()) {
            if verbose {
                debug!(
                    "Version constraint failed. Required range {} - {}, Found: {}",
                    constraint.min(), constraint.max(), version
                );
            }
            return false;
        }
        if constraint.not_version().contains(version) {
            if verbose {
                debug!("Version constraint failed. Forbidden version found: {}", version);
            }
            return false;
        }
        if constraint.has_forbidden_range()
            && version.is_in_range(constraint.not_min(), constraint.not_max()) {
            if verbose {
                debug!(
                    "Version constraint failed. Forbidden range {} - {} contains {}",
                    constraint.not_min(), constraint.not_max(), version
                );
            }
            return false;
        }
        true
    }
}

static GLOBAL: AtomicLazyCell<Evaluator> = AtomicLazyCell::NONE;

/// Install the process-wide environment, which can only happen once
pub fn install<E: Environment + 'static>(environment: E) -> Result<&'static Evaluator, EnvironmentAlreadyInstalled> {
    GLOBAL.fill(Evaluator::new(environment))
        .map_err(|_| EnvironmentAlreadyInstalled)?;
    global().map_err(|_| EnvironmentAlreadyInstalled)
}

/// The process-wide evaluator, once an environment has been installed
#[inline]
pub fn global() -> Result<&'static Evaluator, EnvironmentNotInstalled> {
    GLOBAL.borrow().ok_or(EnvironmentNotInstalled)
}

#[derive(Debug, Fail)]
#[fail(display = "No environment has been installed")]
pub struct EnvironmentNotInstalled;
#[derive(Debug, Fail)]
#[fail(display = "The environment has already been installed")]
pub struct EnvironmentAlreadyInstalled;
