//! Platform component tags.

use crate::error::SuiteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A buildable feature of the polyglot platform.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub enum ComponentTag {
    /// Base Java runtime.
    Java,

    /// Native function interface.
    Nfi,

    /// Polyglot SDK.
    Sdk,

    /// Truffle language framework.
    Truffle,

    /// Just-in-time compiler.
    Compiler,

    /// Enterprise just-in-time compiler.
    CompilerEe,

    /// Native image (ahead-of-time compiler).
    SubstrateVm,

    /// Enterprise native image.
    SubstrateVmEe,

    /// Truffle macro for native image builds.
    TruffleMacro,
}

impl ComponentTag {
    pub const ALL: [ComponentTag; 9] = [
        ComponentTag::Java,
        ComponentTag::Nfi,
        ComponentTag::Sdk,
        ComponentTag::Truffle,
        ComponentTag::Compiler,
        ComponentTag::CompilerEe,
        ComponentTag::SubstrateVm,
        ComponentTag::SubstrateVmEe,
        ComponentTag::TruffleMacro,
    ];

    /// Short id used by the platform build tooling.
    pub fn id(&self) -> &'static str {
        match self {
            ComponentTag::Java => "java",
            ComponentTag::Nfi => "nfi",
            ComponentTag::Sdk => "sdk",
            ComponentTag::Truffle => "tfl",
            ComponentTag::Compiler => "cmp",
            ComponentTag::CompilerEe => "cmpee",
            ComponentTag::SubstrateVm => "svm",
            ComponentTag::SubstrateVmEe => "svmee",
            ComponentTag::TruffleMacro => "tflm",
        }
    }
}

impl fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ComponentTag {
    type Err = SuiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.id() == s)
            .ok_or_else(|| SuiteError::UnknownComponentTag(s.to_string()))
    }
}

impl TryFrom<String> for ComponentTag {
    type Error = SuiteError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ComponentTag> for String {
    fn from(tag: ComponentTag) -> Self {
        tag.id().to_string()
    }
}

/// Parse a comma-separated tag list, preserving order and duplicates.
pub fn parse_tag_list(s: &str) -> Result<Vec<ComponentTag>, SuiteError> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::parse)
        .collect()
}
