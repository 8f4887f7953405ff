//! Conditional mixins.
//!
//! Mixin classes and their members carry constraint annotations, which are evaluated
//! against the running environment before the mixins are applied:
//! - A class whose constraints aren't met is skipped entirely.
//! - A field or method whose constraints aren't met is removed from its class.
//! - Constraint annotations are always stripped, so they never reach the runtime.
extern crate failure;
extern crate failure_derive;
extern crate indexmap;
extern crate itertools;
extern crate log;
extern crate parking_lot;
extern crate serde;
extern crate serde_derive;
extern crate serde_json;
#[cfg(dummy)] // Needed for IntelliJ autocomplete
extern crate tater_meta as meta;

pub mod tree;
pub mod reader;
pub mod ansi;
mod checker;
mod transformer;
mod extension;
mod logger;
mod config;

use failure::Error;
use indexmap::IndexMap;
use itertools::Itertools;
use parking_lot::Mutex;

use meta::{Evaluator, EnvironmentNotInstalled};

pub use self::checker::AnnotationChecker;
pub use self::transformer::{transform, TransformReport, TransformError};
pub use self::extension::{MuxinExtension, MixinClass};
pub use self::logger::{MixinLogger, LogLogger, MemoryLogger};
pub use self::config::MuxinsConfig;
pub use self::reader::MalformedAnnotation;
pub use self::tree::{ClassNode, FieldNode, MethodNode, AnnotationNode, AnnotationValue};

static LOG_LOGGER: LogLogger = LogLogger { colored: true };

/// The entry point for hosts that run their own mixin plugin
pub struct Muxins<'a> {
    evaluator: &'a Evaluator,
    logger: &'a dyn MixinLogger,
    config: MuxinsConfig,
    extensions: Mutex<IndexMap<String, MuxinExtension>>
}
impl<'a> Muxins<'a> {
    /// Bootstraps every package in the config
    pub fn new(evaluator: &'a Evaluator, logger: &'a dyn MixinLogger, config: MuxinsConfig) -> Muxins<'a> {
        let muxins = Muxins {
            evaluator, logger, config,
            extensions: Mutex::new(IndexMap::new())
        };
        for package in &muxins.config.mixin_packages {
            muxins.bootstrap(package, muxins.config.verbose);
        }
        muxins
    }
    #[inline]
    pub fn config(&self) -> &MuxinsConfig {
        &self.config
    }
    #[inline]
    pub fn checker(&self) -> AnnotationChecker<'a> {
        AnnotationChecker::new(self.evaluator, self.logger)
    }
    /// Register an extension for the specified mixin package,
    /// returning `false` if the package was already registered.
    pub fn bootstrap(&self, package: &str, verbose: bool) -> bool {
        let extension = MuxinExtension::new(package, verbose);
        let mut extensions = self.extensions.lock();
        if extensions.contains_key(extension.package()) {
            return false;
        }
        extensions.insert(extension.package().into(), extension);
        true
    }
    pub fn extensions(&self) -> Vec<MuxinExtension> {
        self.extensions.lock().values().cloned().collect_vec()
    }
    /// Check whether the mixin class should be applied at all,
    /// considering both the config and the class-level constraints.
    pub fn should_apply_mixin(&self, class: &ClassNode) -> Result<bool, Error> {
        let class_name = class.class_name();
        let verbose = self.config.verbose;
        if self.config.disabled_by(&class_name).is_some() {
            if verbose {
                self.logger.info(&format!("§4Skipping mixin §9{} §4disabled in config", class_name));
            }
            return Ok(false);
        }
        let result = self.checker().check_annotations(&class.annotations, &class_name, verbose)?;
        if result && verbose {
            self.logger.info(&format!("§2Applying mixin §9{}", class_name));
        }
        Ok(result)
    }
    /// Run every registered extension over the mixins about to be applied.
    ///
    /// A class that fails to transform is logged and left untouched, and the rest are still transformed.
    pub fn pre_apply(&self, mixins: &mut [MixinClass]) -> Vec<Result<TransformReport, TransformError>> {
        let checker = self.checker();
        let mut results = Vec::new();
        for extension in self.extensions() {
            results.extend(extension.pre_apply(&checker, mixins));
        }
        results
    }
}
impl Muxins<'static> {
    /// Use the process-wide evaluator, logging through the `log` facade
    pub fn global(config: MuxinsConfig) -> Result<Muxins<'static>, EnvironmentNotInstalled> {
        Ok(Muxins::new(meta::global()?, &LOG_LOGGER, config))
    }
}
