pub mod state;
pub mod timezone;

/// Where the symbol API is expected when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// `KANDLEBOARD_API_BASE`, if set to something non-blank.
pub fn api_base_override() -> Option<String> {
    std::env::var("KANDLEBOARD_API_BASE")
        .ok()
        .map(|base| base.trim().to_string())
        .filter(|base| !base.is_empty())
}
