/// Base name of the optional settings file, resolved by the `config` crate
/// against every supported extension.
pub const CONFIG_FILE: &str = "config/tether";

/// Environment prefix. `TETHER_PROVIDER__BASE_URL` sets `provider.base_url`.
pub const ENV_PREFIX: &str = "TETHER";
pub const ENV_SEPARATOR: &str = "__";

pub mod defaults {
    pub const REQUEST_TIMEOUT_MS: i64 = 10_000;
    pub const REFRESH_THRESHOLD_SECS: i64 = 300;
    pub const STORE_NAME: &str = "session-store";
    pub const STORAGE_DIRECTORY: &str = ".tether";
}
