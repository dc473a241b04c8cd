// Defaults for the provider client and limits shared by the handlers.
// Anything operators may want to change is also exposed through `config`.

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-3-sonnet-20240229";
pub const DEFAULT_MAX_TOKENS: u32 = 3015;
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Shortest question (after trimming) the guidance endpoint accepts.
pub const MIN_QUESTION_CHARS: usize = 3;

// Prayer wall posting bounds, counted in characters.
pub const MIN_PRAYER_CHARS: usize = 10;
pub const MAX_PRAYER_CHARS: usize = 500;
