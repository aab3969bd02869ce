//! Configuration loading from files and the environment.

use std::io::Write;

use trendwire::config::Config;

#[test]
fn load_reads_toml_and_keeps_defaults_for_omitted_sections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[cache]
stable_ttl_secs = 900

[trend]
rising_threshold = 0.2
falling_threshold = -0.2

[jobs]
worker_concurrency = 2
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.cache.stable_ttl_secs, 900);
    assert_eq!(config.cache.realtime_ttl_secs, 300);
    assert!((config.trend.rising_threshold - 0.2).abs() < f64::EPSILON);
    assert_eq!(config.jobs.worker_concurrency, 2);
    assert_eq!(config.text.max_features, 1000);
}

#[test]
fn load_rejects_invalid_values_at_startup() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[text]\nmax_features = 0\n").unwrap();
    assert!(Config::load(file.path()).is_err());
}

#[test]
fn load_rejects_unparsable_toml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not valid toml [[[").unwrap();
    assert!(Config::load(file.path()).is_err());
}

#[test]
fn missing_file_is_a_config_error() {
    assert!(Config::load("/nonexistent/trendwire.toml").is_err());
}

#[test]
fn environment_overrides_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[jobs]\nschedule_interval_secs = 7200\n").unwrap();

    // Env var wins over the file value. No other test in this binary
    // touches this variable, so parallel execution stays safe.
    std::env::set_var("TRENDWIRE_SCHEDULE_INTERVAL_SECS", "600");
    let config = Config::load(file.path()).unwrap();
    std::env::remove_var("TRENDWIRE_SCHEDULE_INTERVAL_SECS");

    assert_eq!(config.jobs.schedule_interval_secs, 600);
}
