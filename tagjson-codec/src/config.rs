//! Codec output settings.

use crate::error::CodecResult;
use serde::{Deserialize, Serialize};

/// How [`Codec::dumps`](crate::Codec::dumps) lays out its output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Multi-line, indented output instead of compact text.
    #[serde(default)]
    pub pretty: bool,
    /// Spaces per nesting level when `pretty` is set.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_indent() -> usize {
    2
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: default_indent(),
        }
    }
}

impl CodecConfig {
    /// Pretty-printed output with the default indent.
    #[must_use]
    pub fn pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    /// Parses settings from a TOML fragment, e.g. an application config
    /// section. Missing fields take their defaults.
    pub fn from_toml_str(source: &str) -> CodecResult<Self> {
        Ok(toml::from_str(source)?)
    }
}
