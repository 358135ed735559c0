/// Application name, used as the environment prefix and config file stem.
pub const APP_NAME: &str = "halaqa";

pub const ENV_PREFIX: &str = "HALAQA";
pub const ENV_SEPARATOR: &str = "__";
pub const CONFIG_FILE: &str = const_str::concat!(APP_NAME, ".toml");

/// Furthest the generator walks past a schedule's start date.
pub const DEFAULT_MAX_AHEAD_DAYS: u32 = 365;
/// Hard cap on instances produced by one generation call.
pub const DEFAULT_MAX_SESSIONS_PER_BATCH: u32 = 100;

pub const DEFAULT_ACADEMY_TIMEZONE: &str = "Asia/Riyadh";
pub const DEFAULT_STORAGE_TIMEZONE: &str = "UTC";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DEFAULT_SESSION_DURATION_MINUTES: u32 = 60;
/// Opening and closing hour used for slot search when none is given.
pub const DEFAULT_WORKING_HOURS: (u32, u32) = (9, 17);
/// Step between candidate starts when listing free slots.
pub const SLOT_STEP_MINUTES: u32 = 30;
