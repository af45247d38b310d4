use std::path::PathBuf;
use std::time::Duration;

pub const SSE_KEEPALIVE_SECS: u64 = 15;
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BROADCAST_BUFFER: usize = 64;
pub const DEFAULT_CAMPAIGNS_FILE: &str = "data/campaigns.json";
pub const DEFAULT_RELOAD_SECS: u64 = 30;
pub const DEFAULT_STATIC_DIR: &str = "client/dist";

pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PORT)
}

pub fn sse_broadcast_buffer() -> usize {
    std::env::var("SSE_BROADCAST_BUFFER")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_BROADCAST_BUFFER)
}

pub fn campaigns_file() -> PathBuf {
    std::env::var("CAMPAIGNS_FILE")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_CAMPAIGNS_FILE), PathBuf::from)
}

/// `None` when reloading is switched off with `CAMPAIGNS_RELOAD_SECS=0`.
pub fn campaigns_reload_interval() -> Option<Duration> {
    let secs = std::env::var("CAMPAIGNS_RELOAD_SECS")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_RELOAD_SECS);
    (secs > 0).then(|| Duration::from_secs(secs))
}

pub fn static_dir() -> PathBuf {
    std::env::var("STATIC_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        temp_env::with_vars_unset(
            [
                "PORT",
                "SSE_BROADCAST_BUFFER",
                "CAMPAIGNS_FILE",
                "CAMPAIGNS_RELOAD_SECS",
                "STATIC_DIR",
            ],
            || {
                assert_eq!(port(), DEFAULT_PORT);
                assert_eq!(sse_broadcast_buffer(), DEFAULT_BROADCAST_BUFFER);
                assert_eq!(campaigns_file(), PathBuf::from(DEFAULT_CAMPAIGNS_FILE));
                assert_eq!(
                    campaigns_reload_interval(),
                    Some(Duration::from_secs(DEFAULT_RELOAD_SECS))
                );
                assert_eq!(static_dir(), PathBuf::from(DEFAULT_STATIC_DIR));
            },
        );
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        temp_env::with_vars(
            [
                ("PORT", Some("0")),
                ("SSE_BROADCAST_BUFFER", Some("lots")),
                ("CAMPAIGNS_RELOAD_SECS", Some("-5")),
            ],
            || {
                assert_eq!(port(), DEFAULT_PORT);
                assert_eq!(sse_broadcast_buffer(), DEFAULT_BROADCAST_BUFFER);
                assert_eq!(
                    campaigns_reload_interval(),
                    Some(Duration::from_secs(DEFAULT_RELOAD_SECS))
                );
            },
        );
    }

    #[test]
    fn overrides_are_read() {
        temp_env::with_vars(
            [
                ("PORT", Some("8080")),
                ("SSE_BROADCAST_BUFFER", Some("16")),
                ("CAMPAIGNS_FILE", Some("/srv/vitrine/list.json")),
                ("CAMPAIGNS_RELOAD_SECS", Some("0")),
                ("STATIC_DIR", Some("/srv/vitrine/dist")),
            ],
            || {
                assert_eq!(port(), 8080);
                assert_eq!(sse_broadcast_buffer(), 16);
                assert_eq!(campaigns_file(), PathBuf::from("/srv/vitrine/list.json"));
                assert_eq!(campaigns_reload_interval(), None);
                assert_eq!(static_dir(), PathBuf::from("/srv/vitrine/dist"));
            },
        );
    }
}
