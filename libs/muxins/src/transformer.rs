//! Strips unmet members and constraint annotations from mixin classes.
//!
//! Every decision is made before anything is mutated, so a class whose declarations
//! fail to translate is left exactly as it was.
use std::mem;

use failure::Error;
use failure_derive::Fail;
use serde_derive::Serialize;

use crate::checker::AnnotationChecker;
use crate::logger::MixinLogger;
use crate::reader::is_constraint_annotation;
use crate::tree::{ClassNode, Member};

/// What the transformer did to a single class
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransformReport {
    pub class_name: String,
    /// Whether the class-level constraints were met
    pub applied: bool,
    /// The members that were removed, like `method onTick`
    pub removed: Vec<String>
}

/// A class that couldn't be transformed, which was left untouched
#[derive(Debug, Fail)]
#[fail(display = "Unable to transform mixin {}: {}", class_name, cause)]
pub struct TransformError {
    pub class_name: String,
    pub cause: Error
}

pub fn transform(checker: &AnnotationChecker, class: &mut ClassNode, verbose: bool) -> Result<TransformReport, Error> {
    let class_name = class.class_name();
    let logger = checker.logger();
    if verbose {
        logger.info(&format!("Checking inner mixin constraints for {}", class_name));
    }
    let applied = checker.check_annotations(&class.annotations, &class_name, verbose)?;
    let (unmet_fields, unmet_methods) = if applied {
        (unmet_members(checker, &class.fields, verbose)?, unmet_members(checker, &class.methods, verbose)?)
    } else {
        (Vec::new(), Vec::new())
    };
    class.annotations.retain(|node| !is_constraint_annotation(node));
    let mut removed = Vec::new();
    if applied {
        removed.extend(strip_members(&mut class.fields, &unmet_fields, logger, verbose));
        removed.extend(strip_members(&mut class.methods, &unmet_methods, logger, verbose));
    }
    Ok(TransformReport { class_name, applied, removed })
}

fn unmet_members<M: Member>(checker: &AnnotationChecker, members: &[M], verbose: bool) -> Result<Vec<bool>, Error> {
    let mut unmet = Vec::with_capacity(members.len());
    for member in members {
        let met = checker.check_annotations(member.annotations(), &member.target_name(), verbose)?;
        unmet.push(!met);
    }
    Ok(unmet)
}

/// Remove the unmet members, and the constraint annotations of the ones that survive
fn strip_members<M: Member>(
    members: &mut Vec<M>,
    unmet: &[bool],
    logger: &dyn MixinLogger,
    verbose: bool
) -> Vec<String> {
    debug_assert_eq!(members.len(), unmet.len());
    let mut removed = Vec::new();
    let original = mem::replace(members, Vec::with_capacity(unmet.len()));
    for (mut member, &unmet) in original.into_iter().zip(unmet) {
        if unmet {
            let target = member.target_name();
            if verbose {
                logger.warn(&format!("Preventing application of mixin {} due to failing constraint", target));
            }
            removed.push(target);
        } else {
            member.annotations_mut().retain(|node| !is_constraint_annotation(node));
            members.push(member);
        }
    }
    removed
}

#[cfg(test)]
mod test {
    use super::*;
    use meta::{Evaluator, Snapshot, Platform, Side};
    use crate::logger::MemoryLogger;
    use crate::reader::{CONSTRAINT_DESC, REQ_MAPPINGS_DESC};
    use crate::tree::{AnnotationNode, AnnotationValue, FieldNode, MethodNode};

    const PLATFORM: &str = "Ldev/neuralnexus/taterapi/meta/enums/Platform;";

    fn requires(platform: &str) -> AnnotationNode {
        AnnotationNode::new(CONSTRAINT_DESC)
            .with("platform", vec![AnnotationValue::enum_constant(PLATFORM, platform)])
    }
    fn fabric() -> Evaluator {
        Evaluator::new(Snapshot::new("1.20.1".parse().unwrap(), Side::Server)
            .with_platform(Platform::Fabric))
    }

    #[test]
    fn rejected_classes_keep_their_members() {
        let (evaluator, logger) = (fabric(), MemoryLogger::new());
        let checker = AnnotationChecker::new(&evaluator, &logger);
        let mut class = ClassNode::new("com/example/ForgeMixin")
            .with_annotation(requires("FORGE"))
            .with_method(MethodNode::new("onTick", "()V").with_annotation(requires("FORGE")));
        let report = transform(&checker, &mut class, false).unwrap();
        assert!(!report.applied);
        assert!(report.removed.is_empty());
        assert!(class.annotations.is_empty());
        assert_eq!(class.methods.len(), 1);
    }
    #[test]
    fn strips_fields_and_methods() {
        let (evaluator, logger) = (fabric(), MemoryLogger::new());
        let checker = AnnotationChecker::new(&evaluator, &logger);
        let mut class = ClassNode::new("com/example/ServerMixin")
            .with_annotation(requires("FABRIC"))
            .with_field(FieldNode::new("forgeField", "I").with_annotation(requires("FORGE")))
            .with_field(FieldNode::new("fabricField", "I").with_annotation(requires("FABRIC")))
            .with_method(MethodNode::new("onTick", "()V"));
        let report = transform(&checker, &mut class, true).unwrap();
        assert!(report.applied);
        assert_eq!(report.removed, vec!["field forgeField"]);
        assert!(class.field("forgeField").is_none());
        assert!(class.field("fabricField").unwrap().annotations.is_empty());
        assert!(class.method("onTick").is_some());
        assert!(logger.contains("Checking inner mixin constraints for com.example.ServerMixin"));
        assert!(logger.contains("Preventing application of mixin field forgeField due to failing constraint"));
    }
    #[test]
    fn malformed_declarations_leave_the_class_untouched() {
        let (evaluator, logger) = (fabric(), MemoryLogger::new());
        let checker = AnnotationChecker::new(&evaluator, &logger);
        let original = ClassNode::new("com/example/BrokenMixin")
            .with_annotation(requires("FABRIC"))
            .with_method(MethodNode::new("a", "()V").with_annotation(requires("FORGE")))
            .with_method(MethodNode::new("b", "()V").with_annotation(
                AnnotationNode::new(REQ_MAPPINGS_DESC).with("value", "MOJMAP")
            ));
        let mut class = original.clone();
        assert!(transform(&checker, &mut class, false).is_err());
        assert_eq!(class, original);
    }
}
