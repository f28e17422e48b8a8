//! Configuration loading from TOML files and environment variables.
//!
//! Config is resolved in this order of precedence (highest wins):
//! 1. CLI flags (applied by the caller after loading)
//! 2. Environment variables (`A2A_*`, `SLIM_*`, `CNOE_TRACE_ID`,
//!    `AGENT_CHAT_TIMEOUT_SECS`)
//! 3. TOML file specified via `--config`
//! 4. `./agent-chat.toml` in the current directory
//! 5. `$XDG_CONFIG_HOME/agent-chat/agent-chat.toml` (or
//!    `~/.config/agent-chat/agent-chat.toml`)
//! 6. Built-in defaults

mod defaults;
mod env;
mod loader;
mod sources;
mod types;

pub use loader::{load_config, load_config_with_diagnostics};
pub use sources::{config_root_dir, default_global_config_path};
pub use types::{
    base_url, A2aConfig, ChatConfig, ConfigDiagnostics, DisplayConfig, LoadedConfig,
    NetworkConfig, SlimConfig,
};
