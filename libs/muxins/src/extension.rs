use serde_derive::{Serialize, Deserialize};

use crate::checker::AnnotationChecker;
use crate::transformer::{self, TransformReport, TransformError};
use crate::tree::ClassNode;

/// A mixin class along with the package of the mixin config that declared it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct MixinClass {
    pub mixin_package: String,
    pub node: ClassNode
}

/// Runs the transformer over the mixins of a single package, right before they're applied
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MuxinExtension {
    package: String,
    verbose: bool
}
impl MuxinExtension {
    pub fn new(package: &str, verbose: bool) -> MuxinExtension {
        MuxinExtension { package: normalize_package(package), verbose }
    }
    /// The mixin package, which always ends with `.`
    #[inline]
    pub fn package(&self) -> &str {
        &self.package
    }
    #[inline]
    pub fn owns(&self, mixin: &MixinClass) -> bool {
        normalize_package(&mixin.mixin_package) == self.package
    }
    /// Transform every mixin belonging to this package, leaving the others untouched.
    ///
    /// Each class gets its own result, so a malformed class never stops the rest of the batch.
    pub fn pre_apply(&self, checker: &AnnotationChecker, mixins: &mut [MixinClass]) -> Vec<Result<TransformReport, TransformError>> {
        mixins.iter_mut()
            .filter(|mixin| self.owns(mixin))
            .map(|mixin| {
                transformer::transform(checker, &mut mixin.node, self.verbose).map_err(|cause| {
                    let error = TransformError { class_name: mixin.node.class_name(), cause };
                    checker.logger().error(&error.to_string());
                    error
                })
            })
            .collect()
    }
}

pub(crate) fn normalize_package(package: &str) -> String {
    if package.ends_with('.') {
        package.into()
    } else {
        format!("{}.", package)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use meta::{Evaluator, Snapshot, Side};
    use crate::logger::MemoryLogger;
    use crate::reader::CONSTRAINT_DESC;
    use crate::tree::{AnnotationNode, AnnotationValue, MethodNode};

    fn mixin(package: &str, name: &str) -> MixinClass {
        let client_only = AnnotationNode::new(CONSTRAINT_DESC).with("side", vec![
            AnnotationValue::enum_constant("Ldev/neuralnexus/taterapi/meta/Side;", "CLIENT")
        ]);
        MixinClass {
            mixin_package: package.into(),
            node: ClassNode::new(name)
                .with_method(MethodNode::new("render", "()V").with_annotation(client_only))
        }
    }

    #[test]
    fn packages_are_normalized() {
        assert_eq!(MuxinExtension::new("com.example.mixin", false).package(), "com.example.mixin.");
        assert_eq!(MuxinExtension::new("com.example.mixin.", false).package(), "com.example.mixin.");
    }
    #[test]
    fn only_transforms_owned_mixins() {
        let evaluator = Evaluator::new(Snapshot::new("1.20.1".parse().unwrap(), Side::Server));
        let logger = MemoryLogger::new();
        let checker = AnnotationChecker::new(&evaluator, &logger);
        let extension = MuxinExtension::new("com.example.mixin", false);
        let mut mixins = vec![
            mixin("com.example.mixin.", "com/example/mixin/ServerMixin"),
            mixin("com.other.mixin", "com/other/mixin/ServerMixin"),
        ];
        let results = extension.pre_apply(&checker, &mut mixins);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].as_ref().unwrap().class_name, "com.example.mixin.ServerMixin");
        assert!(mixins[0].node.methods.is_empty());
        assert_eq!(mixins[1].node.methods.len(), 1);
        assert_eq!(mixins[1].node.methods[0].annotations.len(), 1);
    }
}
