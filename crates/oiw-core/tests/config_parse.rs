//! Integration test: configuration file parsing and defaults.
//!
//! Run with: cargo test -p oiw-core --test config_parse

use oiw_core::OiwConfig;

#[test]
fn empty_file_yields_defaults() {
    let config = OiwConfig::parse("").expect("empty config parses");
    assert_eq!(config, OiwConfig::default());
    assert_eq!(config.driver.library, None);
    assert_eq!(config.logging.filter, "warn");
}

#[test]
fn driver_and_logging_sections() {
    let config = OiwConfig::parse(
        r#"
        [driver]
        library = "/opt/vendor/lib/libvendorcl.so"

        [logging]
        filter = "oiw=debug"
        "#,
    )
    .expect("config parses");
    assert_eq!(
        config.driver.library.as_deref(),
        Some("/opt/vendor/lib/libvendorcl.so")
    );
    assert_eq!(config.logging.filter, "oiw=debug");
}

#[test]
fn partial_logging_section_keeps_default_filter() {
    let config = OiwConfig::parse("[logging]\n").expect("config parses");
    assert_eq!(config.logging.filter, "warn");
}

#[test]
fn malformed_file_is_an_error() {
    assert!(OiwConfig::parse("[driver\nlibrary = 3").is_err());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let config = OiwConfig::load_or_default("/nonexistent/oiw/oiw.toml");
    assert_eq!(config, OiwConfig::default());
}

#[test]
fn rendered_toml_parses_back() {
    let mut config = OiwConfig::default();
    config.driver.library = Some("libOpenCL.so.1".to_string());
    let text = config.to_toml().expect("config renders");
    assert!(text.contains("[driver]"));
    assert_eq!(OiwConfig::parse(&text).expect("rendered config parses"), config);
}
