/// Utilities module - platform detection and formatting helpers
pub mod platform;
pub mod size;

pub use platform::{detect_platform, Platform};
pub use size::format_size;
