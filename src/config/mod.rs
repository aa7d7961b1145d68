//! Configuration loading and validation
//!
//! Configuration is supplied as a TOML file and validated before the
//! harvester runs. A SHA-256 hash of the file is computed so runs can be
//! correlated with the exact configuration that produced them.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, FetchConfig, OutputConfig, ProxyConfig, SiteConfig};
pub use validation::validate;
