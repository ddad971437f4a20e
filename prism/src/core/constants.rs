// =============================================================================
// Application Identity
// =============================================================================

/// Application name (binary name, paths and log target)
pub const APP_NAME: &str = "traceprism";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".traceprism";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "traceprism.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "TRACEPRISM_CONFIG";

// =============================================================================
// Environment Variables - Logging
// =============================================================================

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TRACEPRISM_LOG";

/// Log filter when neither `TRACEPRISM_LOG` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "warn,traceprism=info";

// =============================================================================
// Environment Variables - Input / Output
// =============================================================================

/// Environment variable for the input format
pub const ENV_FORMAT: &str = "TRACEPRISM_FORMAT";

// =============================================================================
// Output Defaults
// =============================================================================

/// Pretty-print JSON output
pub const DEFAULT_OUTPUT_PRETTY: bool = true;

/// Keep the `raw` field of every span
pub const DEFAULT_OUTPUT_INCLUDE_RAW: bool = true;

/// Keep the `attributes` field of every span
pub const DEFAULT_OUTPUT_INCLUDE_ATTRIBUTES: bool = true;
