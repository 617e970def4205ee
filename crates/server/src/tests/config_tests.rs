use super::*;

use std::collections::HashMap;

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_match_reference_pacing() {
    let settings = Settings::default();
    assert_eq!(settings.draw_delay(), Duration::from_millis(1500));
    assert_eq!(settings.rng_seed, None);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
        bind_addr = "0.0.0.0:9000"
        draw_delay_ms = 250
        max_sessions = 12
        rng_seed = 7
        "#,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.draw_delay_ms, 250);
    assert_eq!(settings.max_sessions, 12);
    assert_eq!(settings.rng_seed, Some(7));
    assert_eq!(settings.max_body_bytes, Settings::default().max_body_bytes);
}

#[test]
fn malformed_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "draw_delay_ms = \"soon\"");
    assert_eq!(settings, Settings::default());
}

#[test]
fn env_overrides_file_and_prefers_app_prefix() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "bind_addr = \"127.0.0.1:1\"");
    apply_env(
        &mut settings,
        env_from(&[
            ("PICKER_BIND", "127.0.0.1:2"),
            ("APP__BIND_ADDR", "127.0.0.1:3"),
            ("APP__DRAW_DELAY_MS", "0"),
            ("APP__SESSION_IDLE_TTL_SECONDS", "30"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:3");
    assert!(settings.draw_delay().is_zero());
    assert_eq!(settings.session_idle_ttl(), chrono::Duration::seconds(30));
}

#[test]
fn unparsable_env_values_keep_previous_setting() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        env_from(&[("APP__MAX_SESSIONS", "lots"), ("APP__RNG_SEED", " 99 ")]),
    );
    assert_eq!(settings.max_sessions, Settings::default().max_sessions);
    assert_eq!(settings.rng_seed, Some(99));
}
