use confique::Config as _;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(confique::Config)]
pub struct Config {
    /// Upper bound for a single schema lookup during completion.
    #[config(env = "TSQ_SCHEMA_TIMEOUT_MS", default = 2000)]
    pub schema_timeout_ms: u64,
    #[config(env = "TSQ_INDENT_SIZE", default = 2)]
    pub indent_size: usize,
    #[config(env = "TSQ_KEYWORD_CASE", default = "upper")]
    pub keyword_case: String,
    #[config(env = "TSQ_MAX_LINE_LENGTH", default = 100)]
    pub max_line_length: usize,
}

impl Config {
    pub fn schema_timeout(&self) -> Duration {
        Duration::from_millis(self.schema_timeout_ms)
    }
}

pub fn config() -> &'static Config {
    static CONFIG: OnceLock<Config> = OnceLock::new();
    CONFIG.get_or_init(|| {
        Config::builder()
            .env()
            .load()
            .expect("Failed to load one or more value configuration from the current environment")
    })
}
