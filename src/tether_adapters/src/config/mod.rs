pub mod constants;
pub mod settings;

pub use constants::*;
pub use settings::{ProviderSettings, SessionSettings, Settings, StorageSettings};
