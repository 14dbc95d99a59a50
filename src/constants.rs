//! Common constants used throughout the Strata application.

/// Per-template configuration document.
pub const CONFIG_FILE: &str = ".strata.yml";

/// Per-template default substitution data.
pub const DEFAULTS_FILE: &str = ".strata-defaults.yml";

/// User supplied data, looked up in the current working directory.
pub const USER_DATA_FILE: &str = "strata-data.yml";

/// Environment variable selecting the template root directory.
pub const TEMPLATES_ENV: &str = "STRATA_TEMPLATES";

/// Template root relative to the home directory when nothing else is configured.
pub const DEFAULT_TEMPLATES_DIR: &str = ".strata/templates";

/// Characters that belong to the expansion syntax and may not appear in template paths.
pub const RESERVED_CHARS: [char; 2] = ['{', '}'];
