//! Optional `.aot-converter.toml` configuration
//!
//! ```toml
//! [project]
//! assembly_name = "bootstrap"
//!
//! [packages]
//! enabled = true
//! timeout_secs = 60
//! references = ["Microsoft.DotNet.ILCompiler --prerelease", "Amazon.Lambda.RuntimeSupport"]
//! ```

mod core;
mod loader;

pub use self::core::{ConverterConfig, PackagesConfig, ProjectConfig};
pub use self::loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
