pub mod async_runtime;
pub mod config;
pub mod http;
pub mod path_processing;

pub use async_runtime::block_on_future;
pub use config::{ConfigError, ProviderConfig, default_config_path, load_config, load_config_from_path};
pub use path_processing::expand_tilde;

use once_cell::sync::Lazy;
use regex::Regex;

static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(bearer )([\w\-\.=:/+]+)",
        r"(?i)(authorization: )([\w\-\.=:/+]+)",
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD)=)([^\s&]+)",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("secret pattern should compile"))
    .collect()
});

/// Redacts values that look like credentials in a string.
///
/// Store errors are surfaced verbatim in diagnostics and logs, and transport
/// errors can echo request URLs or headers.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for re in SECRET_PATTERNS.iter() {
        redacted = re
            .replace_all(&redacted, |caps: &regex::Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                format!("{}<redacted>", prefix)
            })
            .to_string();
    }
    redacted
}
