// ==========================================
// Campus Administration Platform - Configuration Layer
// ==========================================

pub mod config_manager;

pub use config_manager::{AllocationConfig, ConfigManager};
