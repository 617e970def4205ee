use std::{fs, time::Duration};

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    pub draw_delay_ms: u64,
    pub session_idle_ttl_seconds: i64,
    pub sweep_interval_seconds: u64,
    pub max_sessions: usize,
    pub max_body_bytes: usize,
    pub rng_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            draw_delay_ms: 1500,
            session_idle_ttl_seconds: 60 * 60,
            sweep_interval_seconds: 60,
            max_sessions: storage::DEFAULT_MAX_SESSIONS,
            max_body_bytes: 64 * 1024,
            rng_seed: None,
        }
    }
}

impl Settings {
    pub fn draw_delay(&self) -> Duration {
        Duration::from_millis(self.draw_delay_ms)
    }

    pub fn session_idle_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_idle_ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    draw_delay_ms: Option<u64>,
    session_idle_ttl_seconds: Option<i64>,
    sweep_interval_seconds: Option<u64>,
    max_sessions: Option<usize>,
    max_body_bytes: Option<usize>,
    rng_seed: Option<u64>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file(&mut settings, &raw);
    }
    apply_env(&mut settings, |key| std::env::var(key).ok());

    settings
}

fn apply_file(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<FileSettings>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(error) => {
            warn!(%error, "ignoring unreadable server.toml");
            return;
        }
    };

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.draw_delay_ms {
        settings.draw_delay_ms = v;
    }
    if let Some(v) = file_cfg.session_idle_ttl_seconds {
        settings.session_idle_ttl_seconds = v;
    }
    if let Some(v) = file_cfg.sweep_interval_seconds {
        settings.sweep_interval_seconds = v;
    }
    if let Some(v) = file_cfg.max_sessions {
        settings.max_sessions = v;
    }
    if let Some(v) = file_cfg.max_body_bytes {
        settings.max_body_bytes = v;
    }
    if file_cfg.rng_seed.is_some() {
        settings.rng_seed = file_cfg.rng_seed;
    }
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("PICKER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = parsed(&var, "APP__DRAW_DELAY_MS") {
        settings.draw_delay_ms = v;
    }
    if let Some(v) = parsed(&var, "APP__SESSION_IDLE_TTL_SECONDS") {
        settings.session_idle_ttl_seconds = v;
    }
    if let Some(v) = parsed(&var, "APP__SWEEP_INTERVAL_SECONDS") {
        settings.sweep_interval_seconds = v;
    }
    if let Some(v) = parsed(&var, "APP__MAX_SESSIONS") {
        settings.max_sessions = v;
    }
    if let Some(v) = parsed(&var, "APP__MAX_BODY_BYTES") {
        settings.max_body_bytes = v;
    }
    if let Some(v) = parsed(&var, "APP__RNG_SEED") {
        settings.rng_seed = Some(v);
    }
}

fn parsed<T: std::str::FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = var(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable setting");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
