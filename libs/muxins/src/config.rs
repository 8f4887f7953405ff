use std::fs::File;
use std::io::Read;
use std::path::Path;

use failure::Error;
use serde_derive::{Serialize, Deserialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct MuxinsConfig {
    /// Log a line for every mixin that is applied or skipped
    pub verbose: bool,
    /// Mixin packages whose members are checked for constraints
    pub mixin_packages: Vec<String>,
    /// Mixins to skip unconditionally, matched against the end of the class name
    pub disabled_mixins: Vec<String>
}
impl MuxinsConfig {
    pub fn load(path: &Path) -> Result<MuxinsConfig, Error> {
        MuxinsConfig::from_reader(File::open(path)?)
    }
    pub fn from_reader<R: Read>(reader: R) -> Result<MuxinsConfig, Error> {
        Ok(::serde_json::from_reader(reader)?)
    }
    /// The entry that disables the specified mixin, if any
    pub fn disabled_by(&self, class_name: &str) -> Option<&str> {
        self.disabled_mixins.iter()
            .map(String::as_str)
            .find(|&disabled| !disabled.is_empty() && class_name.ends_with(disabled))
    }
}
