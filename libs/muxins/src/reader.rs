//! Reads constraint annotations into declarations.
//!
//! Both the current `AConstraint`/`AConstraints` annotations and the older single-axis
//! `Req*` annotations are understood. Everything is translated into the same declaration
//! schema, so there's only one evaluation path.
use failure::Error;
use failure_derive::Fail;

use meta::{Declaration, Dependency, Versions, MultiDeclaration, ConstraintDeclaration};

use crate::tree::{AnnotationNode, AnnotationValue};

pub const CONSTRAINT_DESC: &str = "Ldev/neuralnexus/taterapi/meta/anno/AConstraint;";
pub const CONSTRAINTS_DESC: &str = "Ldev/neuralnexus/taterapi/meta/anno/AConstraints;";
pub const DEPENDENCY_DESC: &str = "Ldev/neuralnexus/taterapi/meta/anno/Dependency;";
pub const VERSIONS_DESC: &str = "Ldev/neuralnexus/taterapi/meta/anno/Versions;";
pub const REQ_DEPENDENCY_DESC: &str = "Ldev/neuralnexus/taterapi/muxins/annotations/ReqDependency;";
pub const REQ_MAPPINGS_DESC: &str = "Ldev/neuralnexus/taterapi/muxins/annotations/ReqMappings;";
pub const REQ_PLATFORM_DESC: &str = "Ldev/neuralnexus/taterapi/muxins/annotations/ReqPlatform;";
pub const REQ_MC_VERSION_DESC: &str = "Ldev/neuralnexus/taterapi/muxins/annotations/ReqMCVersion;";

const CONSTRAINT_ANNOTATIONS: &[&str] = &[
    CONSTRAINT_DESC, CONSTRAINTS_DESC,
    REQ_DEPENDENCY_DESC, REQ_MAPPINGS_DESC, REQ_PLATFORM_DESC, REQ_MC_VERSION_DESC
];

/// Check if the annotation declares a constraint, and should never reach the runtime
#[inline]
pub fn is_constraint_annotation(node: &AnnotationNode) -> bool {
    CONSTRAINT_ANNOTATIONS.contains(&node.desc.as_str())
}

/// Read the declaration carried by the specified annotation,
/// or `None` if it isn't a constraint annotation.
pub fn read(node: &AnnotationNode) -> Result<Option<ConstraintDeclaration>, Error> {
    let reader = AnnotationReader(node);
    Ok(Some(match node.desc.as_str() {
        CONSTRAINT_DESC => reader.constraint()?.into(),
        CONSTRAINTS_DESC => MultiDeclaration {
            and: reader.nested_constraints("value")?,
            or: reader.nested_constraints("or")?
        }.into(),
        REQ_DEPENDENCY_DESC => reader.req_dependency()?.into(),
        REQ_MAPPINGS_DESC => Declaration {
            mappings: reader.enum_constant("value")?,
            ..Declaration::default()
        }.into(),
        REQ_PLATFORM_DESC => Declaration {
            platform: reader.enum_constants("value")?,
            not_platform: reader.enum_constants("not")?,
            ..Declaration::default()
        }.into(),
        REQ_MC_VERSION_DESC => Declaration {
            version: reader.versions()?,
            ..Declaration::default()
        }.into(),
        _ => return Ok(None)
    }))
}

struct AnnotationReader<'a>(&'a AnnotationNode);
impl<'a> AnnotationReader<'a> {
    fn malformed(&self, key: &str, expected: &'static str) -> MalformedAnnotation {
        MalformedAnnotation {
            desc: self.0.desc.clone(),
            key: key.into(),
            expected
        }
    }
    /// Array values, where a lone value is treated as a single element array
    fn array(&self, key: &str) -> &'a [AnnotationValue] {
        match self.0.get(key) {
            None => &[],
            Some(AnnotationValue::Array(values)) => values,
            Some(value) => ::std::slice::from_ref(value),
        }
    }
    fn string(&self, key: &str) -> Result<Option<String>, MalformedAnnotation> {
        match self.0.get(key) {
            None => Ok(None),
            Some(AnnotationValue::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(self.malformed(key, "string"))
        }
    }
    fn strings(&self, key: &str) -> Result<Vec<String>, MalformedAnnotation> {
        self.array(key).iter().map(|value| match *value {
            AnnotationValue::String(ref value) => Ok(value.clone()),
            _ => Err(self.malformed(key, "string array"))
        }).collect()
    }
    fn boolean(&self, key: &str) -> Result<bool, MalformedAnnotation> {
        match self.0.get(key) {
            None => Ok(false),
            Some(&AnnotationValue::Bool(value)) => Ok(value),
            Some(_) => Err(self.malformed(key, "boolean"))
        }
    }
    fn enum_constant(&self, key: &str) -> Result<Option<String>, MalformedAnnotation> {
        match self.0.get(key) {
            None => Ok(None),
            Some(AnnotationValue::Enum { value, .. }) => Ok(Some(value.clone())),
            Some(_) => Err(self.malformed(key, "enum constant"))
        }
    }
    fn enum_constants(&self, key: &str) -> Result<Vec<String>, MalformedAnnotation> {
        self.array(key).iter().map(|value| match *value {
            AnnotationValue::Enum { ref value, .. } => Ok(value.clone()),
            _ => Err(self.malformed(key, "enum array"))
        }).collect()
    }
    fn annotations(&self, key: &str, desc: &'static str) -> Result<Vec<&'a AnnotationNode>, MalformedAnnotation> {
        self.array(key).iter().map(|value| match *value {
            AnnotationValue::Annotation(ref node) if node.desc == desc => Ok(node),
            _ => Err(self.malformed(key, desc))
        }).collect()
    }
    fn annotation(&self, key: &str, desc: &'static str) -> Result<Option<&'a AnnotationNode>, MalformedAnnotation> {
        match self.0.get(key) {
            None => Ok(None),
            Some(AnnotationValue::Annotation(node)) if node.desc == desc => Ok(Some(node)),
            Some(_) => Err(self.malformed(key, desc))
        }
    }
    fn dependencies(&self, key: &str) -> Result<Vec<Dependency>, MalformedAnnotation> {
        self.annotations(key, DEPENDENCY_DESC)?.into_iter().map(|node| -> Result<Dependency, MalformedAnnotation> {
            let reader = AnnotationReader(node);
            let id = reader.string("value")?
                .ok_or_else(|| reader.malformed("value", "string"))?;
            Ok(Dependency::new(id).with_aliases(reader.strings("aliases")?))
        }).collect()
    }
    fn versions(&self) -> Result<Versions, MalformedAnnotation> {
        Ok(Versions {
            values: self.enum_constants("value")?,
            min: self.enum_constant("min")?,
            max: self.enum_constant("max")?
        })
    }
    fn nested_versions(&self, key: &str) -> Result<Versions, MalformedAnnotation> {
        match self.annotation(key, VERSIONS_DESC)? {
            Some(node) => AnnotationReader(node).versions(),
            None => Ok(Versions::default())
        }
    }
    fn constraint(&self) -> Result<Declaration, MalformedAnnotation> {
        Ok(Declaration {
            deps: self.dependencies("deps")?,
            not_deps: self.dependencies("notDeps")?,
            mappings: self.enum_constant("mappings")?,
            platform: self.enum_constants("platform")?,
            not_platform: self.enum_constants("notPlatform")?,
            side: self.enum_constants("side")?,
            version: self.nested_versions("version")?,
            not_version: self.nested_versions("notVersion")?,
            invert: self.boolean("invert")?
        })
    }
    fn nested_constraints(&self, key: &str) -> Result<Vec<Declaration>, MalformedAnnotation> {
        self.annotations(key, CONSTRAINT_DESC)?.into_iter()
            .map(|node| AnnotationReader(node).constraint())
            .collect()
    }
    /// Every plain id is required, and every `!id` is forbidden
    fn req_dependency(&self) -> Result<MultiDeclaration, MalformedAnnotation> {
        let mut and = Vec::new();
        let mut forbidden = Vec::new();
        for id in self.strings("value")? {
            if id.starts_with('!') {
                forbidden.push(Dependency::new(&id[1..]));
            } else {
                and.push(Declaration { deps: vec![Dependency::new(id)], ..Declaration::default() });
            }
        }
        if !forbidden.is_empty() {
            and.push(Declaration { not_deps: forbidden, ..Declaration::default() });
        }
        Ok(MultiDeclaration { and, or: Vec::new() })
    }
}

#[derive(Debug, Fail)]
#[fail(display = "Malformed {} annotation: expected {} for {:?}", desc, expected, key)]
pub struct MalformedAnnotation {
    pub desc: String,
    pub key: String,
    pub expected: &'static str
}

#[cfg(test)]
mod test {
    use super::*;
    const PLATFORM: &str = "Ldev/neuralnexus/taterapi/meta/enums/Platform;";
    const VERSION: &str = "Ldev/neuralnexus/taterapi/meta/enums/MinecraftVersion;";

    fn platform(name: &str) -> AnnotationValue {
        AnnotationValue::enum_constant(PLATFORM, name)
    }
    fn version(name: &str) -> AnnotationValue {
        AnnotationValue::enum_constant(VERSION, name)
    }

    #[test]
    fn reads_constraint() {
        let node = AnnotationNode::new(CONSTRAINT_DESC)
            .with("deps", vec![
                AnnotationNode::new(DEPENDENCY_DESC)
                    .with("value", "viaversion")
                    .with("aliases", vec!["viabackwards"])
            ])
            .with("platform", vec![platform("FABRIC")])
            .with("version", AnnotationNode::new(VERSIONS_DESC)
                .with("min", version("V1_18"))
                .with("max", version("V1_20")))
            .with("invert", true);
        let declaration = match read(&node).unwrap() {
            Some(ConstraintDeclaration::Single(declaration)) => declaration,
            other => panic!("Unexpected declaration: {:?}", other)
        };
        assert_eq!(declaration.deps, vec![Dependency::new("viaversion").with_aliases(vec!["viabackwards"])]);
        assert_eq!(declaration.platform, vec!["FABRIC"]);
        assert_eq!(declaration.version.min.as_ref().map(String::as_str), Some("V1_18"));
        assert_eq!(declaration.version.max.as_ref().map(String::as_str), Some("V1_20"));
        assert!(declaration.not_version.min.is_none());
        assert!(declaration.invert);
    }
    #[test]
    fn reads_constraints() {
        let node = AnnotationNode::new(CONSTRAINTS_DESC)
            .with("value", vec![
                AnnotationNode::new(CONSTRAINT_DESC).with("platform", vec![platform("FABRIC")]),
                AnnotationNode::new(CONSTRAINT_DESC).with("side", vec![
                    AnnotationValue::enum_constant("Ldev/neuralnexus/taterapi/meta/Side;", "CLIENT")
                ]),
            ]);
        match read(&node).unwrap() {
            Some(ConstraintDeclaration::Multi(multi)) => {
                assert_eq!(multi.and.len(), 2);
                assert!(multi.or.is_empty());
                assert_eq!(multi.and[1].side, vec!["CLIENT"]);
            },
            other => panic!("Unexpected declaration: {:?}", other)
        }
    }
    #[test]
    fn reads_legacy_annotations() {
        let node = AnnotationNode::new(REQ_DEPENDENCY_DESC)
            .with("value", vec!["fabric-api", "!optifine", "sodium"]);
        match read(&node).unwrap() {
            Some(ConstraintDeclaration::Multi(multi)) => {
                assert_eq!(multi.and.len(), 3);
                assert_eq!(multi.and[0].deps, vec![Dependency::new("fabric-api")]);
                assert_eq!(multi.and[1].deps, vec![Dependency::new("sodium")]);
                assert_eq!(multi.and[2].not_deps, vec![Dependency::new("optifine")]);
            },
            other => panic!("Unexpected declaration: {:?}", other)
        }
        let node = AnnotationNode::new(REQ_PLATFORM_DESC)
            .with("value", vec![platform("FORGE")])
            .with("not", platform("MOHIST"));
        match read(&node).unwrap() {
            Some(ConstraintDeclaration::Single(declaration)) => {
                assert_eq!(declaration.platform, vec!["FORGE"]);
                assert_eq!(declaration.not_platform, vec!["MOHIST"]);
            },
            other => panic!("Unexpected declaration: {:?}", other)
        }
        let node = AnnotationNode::new(REQ_MC_VERSION_DESC)
            .with("value", vec![version("V1_12_2")])
            .with("max", version("V1_16_5"));
        match read(&node).unwrap() {
            Some(ConstraintDeclaration::Single(declaration)) => {
                assert_eq!(declaration.version.values, vec!["V1_12_2"]);
                assert!(declaration.version.min.is_none());
            },
            other => panic!("Unexpected declaration: {:?}", other)
        }
    }
    #[test]
    fn ignores_other_annotations() {
        let node = AnnotationNode::new("Lorg/spongepowered/asm/mixin/Mixin;");
        assert!(!is_constraint_annotation(&node));
        assert!(read(&node).unwrap().is_none());
        assert!(is_constraint_annotation(&AnnotationNode::new(REQ_MAPPINGS_DESC)));
    }
    #[test]
    fn rejects_malformed_values() {
        let node = AnnotationNode::new(CONSTRAINT_DESC).with("platform", vec!["FABRIC"]);
        let error = read(&node).unwrap_err();
        let malformed = error.downcast_ref::<MalformedAnnotation>().unwrap();
        assert_eq!(malformed.key, "platform");
        let node = AnnotationNode::new(CONSTRAINT_DESC)
            .with("deps", vec![AnnotationNode::new(DEPENDENCY_DESC)]);
        assert!(read(&node).is_err());
    }
}
