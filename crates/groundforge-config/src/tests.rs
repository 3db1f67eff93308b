use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        generator = "grounded"
        thread_count = "none"

        [termination]
        seconds_spent_limit = 2
        millis_spent_limit = 500
        max_num_states = 1000
    "#;

    let config = ExplorationConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.generator, GeneratorKind::Grounded);
    assert_eq!(config.thread_count, ThreadCount::None);
    assert_eq!(config.time_limit(), Some(Duration::from_millis(2500)));
    assert_eq!(config.max_num_states(), Some(1000));
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        generator: lifted
        thread_count: none
        termination:
          max_num_states: 50
    "#;

    let config = ExplorationConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.generator, GeneratorKind::Lifted);
    assert_eq!(config.thread_count, ThreadCount::None);
    assert_eq!(config.time_limit(), None);
    assert_eq!(config.max_num_states(), Some(50));
}

#[test]
fn test_empty_toml_is_default() {
    let config = ExplorationConfig::from_toml_str("").unwrap();
    assert_eq!(config, ExplorationConfig::default());
    assert_eq!(config.generator, GeneratorKind::Lifted);
    assert_eq!(config.thread_count, ThreadCount::Auto);
    assert!(config.termination.is_none());
}

#[test]
fn test_zero_threads_rejected() {
    let err = ExplorationConfig::from_toml_str("thread_count = { count = 0 }").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_unknown_generator_rejected() {
    let err = ExplorationConfig::from_toml_str(r#"generator = "magic""#).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn test_missing_file() {
    let err = ExplorationConfig::load("/nonexistent/exploration.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_builder() {
    let config = ExplorationConfig::new()
        .with_generator(GeneratorKind::Grounded)
        .with_time_limit_millis(250)
        .with_max_states(10)
        .with_thread_count(ThreadCount::Count(2));

    assert_eq!(config.generator, GeneratorKind::Grounded);
    assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
    assert_eq!(config.max_num_states(), Some(10));
    assert_eq!(config.thread_count, ThreadCount::Count(2));
}

#[test]
fn test_thread_count_resolve() {
    assert_eq!(ThreadCount::None.resolve(8), 1);
    assert_eq!(ThreadCount::Count(4).resolve(2), 2);
    assert_eq!(ThreadCount::Count(4).resolve(10), 4);
    assert_eq!(ThreadCount::Count(4).resolve(0), 1);
    let auto = ThreadCount::Auto.resolve(3);
    assert!((1..=3).contains(&auto));
}
