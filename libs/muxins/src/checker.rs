use failure::Error;
use itertools::Itertools;

use meta::{Condition, Constraints, Evaluator};

use crate::logger::MixinLogger;
use crate::reader;
use crate::tree::AnnotationNode;

/// Evaluates the constraint annotations of mixin classes and members.
///
/// Malformed annotations and unresolvable symbols are returned as errors,
/// while constraints that simply aren't met are `Ok(false)`.
#[derive(Copy, Clone)]
pub struct AnnotationChecker<'a> {
    evaluator: &'a Evaluator,
    logger: &'a dyn MixinLogger
}
impl<'a> AnnotationChecker<'a> {
    #[inline]
    pub fn new(evaluator: &'a Evaluator, logger: &'a dyn MixinLogger) -> AnnotationChecker<'a> {
        AnnotationChecker { evaluator, logger }
    }
    #[inline]
    pub fn logger(&self) -> &'a dyn MixinLogger {
        self.logger
    }
    /// Check a single annotation, where anything that isn't a constraint annotation passes
    pub fn check_annotation(&self, node: &AnnotationNode, target: &str, verbose: bool) -> Result<bool, Error> {
        let declaration = match reader::read(node)? {
            Some(declaration) => declaration,
            None => return Ok(true)
        };
        let condition = declaration.to_condition()?;
        let met = condition.evaluate(self.evaluator, verbose);
        if !met && verbose {
            let reason = match condition {
                Condition::Multi(ref constraints) if node.desc == reader::REQ_DEPENDENCY_DESC => {
                    self.dependency_reason(constraints)
                },
                Condition::Single(_) => "§4constraint not met.".into(),
                Condition::Multi(_) => "§4constraints not met.".into(),
            };
            self.logger.info(&format!("§4Skipping mixin §9{} {}", target, reason));
        }
        Ok(met)
    }
    /// Name the dependencies behind an unmet `ReqDependency`
    fn dependency_reason(&self, constraints: &Constraints) -> String {
        let failed = match constraints.and().iter().find(|c| !c.evaluate(self.evaluator, false)) {
            Some(failed) => failed,
            None => return "§4constraints not met.".into()
        };
        if !failed.deps().is_empty() {
            return format!("§4missing dependency: §9{}", failed.deps().iter().join(", "));
        }
        let environment = self.evaluator.environment();
        let present = failed.not_deps().iter()
            .filter(|id| environment.is_any_mod_loaded(&[id.as_str()]).unwrap_or(false))
            .collect_vec();
        if present.is_empty() {
            format!("§4conflicts with dependency: §9{}", failed.not_deps().iter().join(", "))
        } else {
            format!("§4conflicts with dependency: §9{}", present.iter().join(", "))
        }
    }
    /// Check that every constraint annotation is met, stopping at the first one that isn't
    pub fn check_annotations(&self, nodes: &[AnnotationNode], target: &str, verbose: bool) -> Result<bool, Error> {
        for node in nodes {
            if !self.check_annotation(node, target, verbose)? {
                return Ok(false)
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use meta::{Snapshot, Platform, Side};
    use crate::logger::MemoryLogger;
    use crate::tree::AnnotationValue;
    use crate::reader::{CONSTRAINT_DESC, REQ_DEPENDENCY_DESC, REQ_PLATFORM_DESC};

    fn forge_required() -> AnnotationNode {
        AnnotationNode::new(CONSTRAINT_DESC).with("platform", vec![
            AnnotationValue::enum_constant("Ldev/neuralnexus/taterapi/meta/enums/Platform;", "FORGE")
        ])
    }
    fn fabric() -> Evaluator {
        Evaluator::new(Snapshot::new("1.20.1".parse().unwrap(), Side::Client)
            .with_platform(Platform::Fabric))
    }

    #[test]
    fn verbose_skip_message() {
        let (evaluator, logger) = (fabric(), MemoryLogger::new());
        let checker = AnnotationChecker::new(&evaluator, &logger);
        assert!(!checker.check_annotation(&forge_required(), "com.example.ForgeMixin", true).unwrap());
        assert_eq!(logger.messages().len(), 1);
        assert!(logger.contains("Skipping mixin com.example.ForgeMixin constraint not met."));
    }
    #[test]
    fn quiet_when_not_verbose() {
        let (evaluator, logger) = (fabric(), MemoryLogger::new());
        let checker = AnnotationChecker::new(&evaluator, &logger);
        assert!(!checker.check_annotation(&forge_required(), "com.example.ForgeMixin", false).unwrap());
        assert!(logger.is_empty());
    }
    #[test]
    fn other_annotations_pass() {
        let (evaluator, logger) = (fabric(), MemoryLogger::new());
        let checker = AnnotationChecker::new(&evaluator, &logger);
        let annotations = vec![
            AnnotationNode::new("Lorg/spongepowered/asm/mixin/Mixin;"),
            AnnotationNode::new(REQ_PLATFORM_DESC).with("not", vec![
                AnnotationValue::enum_constant("Ldev/neuralnexus/taterapi/meta/enums/Platform;", "FORGE")
            ]),
        ];
        assert!(checker.check_annotations(&annotations, "com.example.Mixin", true).unwrap());
        assert!(checker.check_annotations(&[], "com.example.Mixin", true).unwrap());
        assert!(logger.is_empty());
    }
    #[test]
    fn unknown_symbols_are_errors() {
        let (evaluator, logger) = (fabric(), MemoryLogger::new());
        let checker = AnnotationChecker::new(&evaluator, &logger);
        let node = AnnotationNode::new(CONSTRAINT_DESC).with("platform", vec![
            AnnotationValue::enum_constant("Ldev/neuralnexus/taterapi/meta/enums/Platform;", "FORGEE")
        ]);
        assert!(checker.check_annotation(&node, "com.example.Mixin", false).is_err());
    }
    #[test]
    fn dependency_skip_messages() {
        let evaluator = Evaluator::new(Snapshot::new("1.20.1".parse().unwrap(), Side::Client)
            .with_platform(Platform::Fabric)
            .with_mods(vec!["fabric-api", "optifine"]));
        let logger = MemoryLogger::new();
        let checker = AnnotationChecker::new(&evaluator, &logger);
        let requires = |ids: &[&str]| AnnotationNode::new(REQ_DEPENDENCY_DESC).with("value", ids.iter()
            .map(|&id| AnnotationValue::String(id.into()))
            .collect::<Vec<_>>());
        assert!(!checker.check_annotation(&requires(&["fabric-api", "sodium"]), "method onRender", true).unwrap());
        assert!(logger.contains("Skipping mixin method onRender missing dependency: sodium"));
        assert!(!checker.check_annotation(&requires(&["fabric-api", "!iris", "!optifine"]), "method onShader", true).unwrap());
        assert!(logger.contains("Skipping mixin method onShader conflicts with dependency: optifine"));
        logger.clear();
        assert!(checker.check_annotation(&requires(&["fabric-api", "!sodium"]), "method onTick", true).unwrap());
        assert!(logger.is_empty());
    }
}
