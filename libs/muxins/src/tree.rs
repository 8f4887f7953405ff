//! A minimal tree model of mixin class metadata.
//!
//! This only carries what the transformer needs to decide on and mutate:
//! names, descriptors and the visible annotations of the class and its members.
use indexmap::IndexMap;
use serde_derive::{Serialize, Deserialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassNode {
    /// The internal name, like `com/example/mixin/ServerMixin`
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<AnnotationNode>,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
    #[serde(default)]
    pub methods: Vec<MethodNode>
}
impl ClassNode {
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> ClassNode {
        ClassNode { name: name.into(), ..ClassNode::default() }
    }
    /// The binary name of the class, like `com.example.mixin.ServerMixin`
    #[inline]
    pub fn class_name(&self) -> String {
        self.name.replace('/', ".")
    }
    pub fn with_annotation(mut self, annotation: AnnotationNode) -> ClassNode {
        self.annotations.push(annotation);
        self
    }
    pub fn with_field(mut self, field: FieldNode) -> ClassNode {
        self.fields.push(field);
        self
    }
    pub fn with_method(mut self, method: MethodNode) -> ClassNode {
        self.methods.push(method);
        self
    }
    pub fn field(&self, name: &str) -> Option<&FieldNode> {
        self.fields.iter().find(|field| field.name == name)
    }
    pub fn method(&self, name: &str) -> Option<&MethodNode> {
        self.methods.iter().find(|method| method.name == name)
    }
}

/// A field or method that constraint annotations can be attached to
pub trait Member {
    /// The kind of member, used in diagnostics
    const KIND: &'static str;
    fn name(&self) -> &str;
    fn annotations(&self) -> &[AnnotationNode];
    fn annotations_mut(&mut self) -> &mut Vec<AnnotationNode>;
    #[inline]
    fn target_name(&self) -> String {
        format!("{} {}", Self::KIND, self.name())
    }
}

macro_rules! member_node {
    ($name:ident, $kind:expr) => {
        #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
        #[serde(deny_unknown_fields)]
        pub struct $name {
            pub name: String,
            #[serde(default)]
            pub desc: String,
            #[serde(default)]
            pub annotations: Vec<AnnotationNode>
        }
        impl $name {
            #[inline]
            pub fn new<N: Into<String>, D: Into<String>>(name: N, desc: D) -> $name {
                $name { name: name.into(), desc: desc.into(), annotations: Vec::new() }
            }
            pub fn with_annotation(mut self, annotation: AnnotationNode) -> $name {
                self.annotations.push(annotation);
                self
            }
        }
        impl Member for $name {
            const KIND: &'static str = $kind;
            #[inline]
            fn name(&self) -> &str {
                &self.name
            }
            #[inline]
            fn annotations(&self) -> &[AnnotationNode] {
                &self.annotations
            }
            #[inline]
            fn annotations_mut(&mut self) -> &mut Vec<AnnotationNode> {
                &mut self.annotations
            }
        }
    };
}
member_node!(FieldNode, "field");
member_node!(MethodNode, "method");

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnnotationNode {
    /// The type descriptor, like `Ldev/neuralnexus/taterapi/meta/anno/AConstraint;`
    pub desc: String,
    #[serde(default)]
    pub values: IndexMap<String, AnnotationValue>
}
impl AnnotationNode {
    #[inline]
    pub fn new<S: Into<String>>(desc: S) -> AnnotationNode {
        AnnotationNode { desc: desc.into(), values: IndexMap::new() }
    }
    pub fn with<K: Into<String>, V: Into<AnnotationValue>>(mut self, key: K, value: V) -> AnnotationNode {
        self.values.insert(key.into(), value.into());
        self
    }
    #[inline]
    pub fn get(&self, key: &str) -> Option<&AnnotationValue> {
        self.values.get(key)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum AnnotationValue {
    Bool(bool),
    String(String),
    /// A reference to an enum constant, like `Platform.FABRIC`
    Enum { desc: String, value: String },
    Annotation(AnnotationNode),
    Array(Vec<AnnotationValue>)
}
impl AnnotationValue {
    pub fn enum_constant<D: Into<String>, V: Into<String>>(desc: D, value: V) -> AnnotationValue {
        AnnotationValue::Enum { desc: desc.into(), value: value.into() }
    }
    /// A short description of the kind of value, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match *self {
            AnnotationValue::Bool(_) => "boolean",
            AnnotationValue::String(_) => "string",
            AnnotationValue::Enum { .. } => "enum",
            AnnotationValue::Annotation(_) => "annotation",
            AnnotationValue::Array(_) => "array",
        }
    }
}
impl From<bool> for AnnotationValue {
    #[inline]
    fn from(value: bool) -> Self {
        AnnotationValue::Bool(value)
    }
}
impl<'a> From<&'a str> for AnnotationValue {
    #[inline]
    fn from(value: &'a str) -> Self {
        AnnotationValue::String(value.into())
    }
}
impl From<String> for AnnotationValue {
    #[inline]
    fn from(value: String) -> Self {
        AnnotationValue::String(value)
    }
}
impl From<AnnotationNode> for AnnotationValue {
    #[inline]
    fn from(value: AnnotationNode) -> Self {
        AnnotationValue::Annotation(value)
    }
}
impl<T: Into<AnnotationValue>> From<Vec<T>> for AnnotationValue {
    #[inline]
    fn from(values: Vec<T>) -> Self {
        AnnotationValue::Array(values.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn class_from_json() {
        let class: ClassNode = ::serde_json::from_str(r#"{
            "name": "com/example/mixin/ServerMixin",
            "annotations": [{
                "desc": "Lorg/spongepowered/asm/mixin/Mixin;",
                "values": { "remap": { "type": "bool", "value": false } }
            }],
            "methods": [{ "name": "onTick", "desc": "()V" }]
        }"#).unwrap();
        assert_eq!(class.class_name(), "com.example.mixin.ServerMixin");
        assert_eq!(class.annotations[0].get("remap"), Some(&AnnotationValue::Bool(false)));
        assert_eq!(class.method("onTick").unwrap().target_name(), "method onTick");
        assert!(class.fields.is_empty());
    }
    #[test]
    fn values_serialize_tagged() {
        let value = AnnotationValue::enum_constant("Ldev/neuralnexus/taterapi/meta/enums/Platform;", "FABRIC");
        assert_eq!(
            ::serde_json::to_value(&value).unwrap(),
            ::serde_json::json!({
                "type": "enum",
                "value": { "desc": "Ldev/neuralnexus/taterapi/meta/enums/Platform;", "value": "FABRIC" }
            })
        );
        let array: AnnotationValue = vec!["a", "b"].into();
        assert_eq!(array.kind(), "array");
    }
}
