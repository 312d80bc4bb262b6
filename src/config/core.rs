use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::packages::PackageSpec;

/// Root configuration structure, read from `.aot-converter.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConverterConfig {
    /// Project properties written into the csproj
    #[serde(default)]
    pub project: ProjectConfig,

    /// Package installation settings
    #[serde(default)]
    pub packages: PackagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// AssemblyName for the converted project. The Lambda custom runtime
    /// launches an executable named `bootstrap`.
    #[serde(default = "default_assembly_name")]
    pub assembly_name: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            assembly_name: default_assembly_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PackagesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds to wait for each `dotnet add package`
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Package ids, each optionally followed by `dotnet add package` flags
    #[serde(default = "default_references")]
    pub references: Vec<String>,
}

impl Default for PackagesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_timeout_secs(),
            references: default_references(),
        }
    }
}

impl PackagesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn specs(&self) -> Vec<PackageSpec> {
        self.references
            .iter()
            .filter_map(|reference| PackageSpec::parse(reference))
            .collect()
    }
}

impl ConverterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.project.assembly_name.trim().is_empty() {
            return Err("project.assembly_name must not be empty".into());
        }
        if self.packages.timeout_secs == 0 {
            return Err("packages.timeout_secs must be greater than zero".into());
        }
        Ok(())
    }
}

fn default_assembly_name() -> String {
    "bootstrap".into()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_references() -> Vec<String> {
    vec![
        "Microsoft.DotNet.ILCompiler --prerelease".into(),
        "Amazon.Lambda.RuntimeSupport".into(),
    ]
}
