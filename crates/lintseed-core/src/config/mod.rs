//! Configuration system for lintseed
//!
//! - JSON, YAML and TOML configuration files
//! - Auto-discovery by traversing up directories
//! - Merging a configuration with the one it builds on
//! - Strong typing with serde and JSON Schema generation via schemars
//!
//! ## Configuration Files
//!
//! Looked up in this order: `.lintseedrc.json`, `.lintseedrc.toml`,
//! `.lintseedrc.yaml`, `.lintseedrc.yml`.
//!
//! ## Example Configuration
//!
//! ```json
//! {
//!   "env": { "browser": true },
//!   "rules": {
//!     "semi": ["error", "always"],
//!     "quotes": ["error", "double"],
//!     "no-var": "off"
//!   },
//!   "files": {
//!     "include": ["src/**/*.js"],
//!     "exclude": ["**/node_modules/**"]
//!   }
//! }
//! ```

mod lint_config;
mod loader;
mod merge;

pub use lint_config::{FilesConfiguration, LintConfig, RuleSetting, Severity};
pub use loader::{CONFIG_FILE_NAMES, ConfigFormat, ConfigLoader};

/// JSON Schema describing [`LintConfig`]
pub fn config_json_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(LintConfig)).unwrap_or_default()
}
