/// Platform-specific utilities
///
/// Detect the operating system family; trash layout and cache hints depend on it
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    MacOS,
    Windows,
    Unknown,
}

/// Detect current platform
pub fn detect_platform() -> Platform {
    #[cfg(target_os = "linux")]
    return Platform::Linux;

    #[cfg(target_os = "macos")]
    return Platform::MacOS;

    #[cfg(target_os = "windows")]
    return Platform::Windows;

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    return Platform::Unknown;
}

impl Platform {
    pub fn name(&self) -> &'static str {
        match self {
            Platform::Linux => "linux",
            Platform::MacOS => "macos",
            Platform::Windows => "windows",
            Platform::Unknown => "unknown",
        }
    }

    /// Whether `--drop-cache` can do anything here
    pub fn supports_cache_drop(&self) -> bool {
        matches!(self, Platform::Linux)
    }
}
