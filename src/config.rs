//! Client configuration parser
//!
//! Parses `delve.toml` into named server profiles.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A named server profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// Unique name for this profile
    pub name: String,
    /// Server address as a `host:port` pair
    pub addr: String,
    /// Suppress node property lines when this profile is used
    #[serde(default)]
    pub hide_props: bool,
    /// Suppress node tag lines when this profile is used
    #[serde(default)]
    pub hide_tags: bool,
}

/// Top-level delve configuration parsed from delve.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DelveConfig {
    /// Name of the profile used when none is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Profile definitions
    #[serde(rename = "profile", default)]
    pub profiles: Vec<Profile>,
}

impl DelveConfig {
    /// Parse a delve.toml file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Load from `path`. A missing file is an empty configuration unless
    /// `required` is set, which callers use when the path was given
    /// explicitly on the command line.
    pub fn load<P: AsRef<Path>>(path: P, required: bool) -> Result<Self> {
        let path = path.as_ref();
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    /// Parse delve.toml content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse delve.toml")?;
        config.validate()?;
        Ok(config)
    }

    /// Find a profile by name
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// The profile named by the `default` key, if any
    #[must_use]
    pub fn default_profile(&self) -> Option<&Profile> {
        self.default.as_deref().and_then(|name| self.profile(name))
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for profile in &self.profiles {
            if !seen.insert(&profile.name) {
                bail!("Duplicate profile name: '{}'", profile.name);
            }
        }

        for profile in &self.profiles {
            if profile.name.trim().is_empty() {
                bail!("Profile name cannot be empty");
            }
            if profile.addr.trim().is_empty() {
                bail!("Profile '{}' has an empty addr", profile.name);
            }
        }

        if let Some(name) = &self.default {
            if self.profile(name).is_none() {
                bail!("Default profile '{name}' is not defined");
            }
        }

        Ok(())
    }
}
