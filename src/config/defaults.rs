//! Default configuration constants.

/// Default request timeout for agent calls, in seconds.
pub(super) const DEFAULT_TIMEOUT_SECS: u64 = 300;
/// Config directory name under the platform config root.
pub(super) const CONFIG_DIR_NAME: &str = "agent-chat";
/// Config file name, both locally and in the global config directory.
pub(super) const CONFIG_FILE_NAME: &str = "agent-chat.toml";
