//! Drives exploration through the facade the way an application would.

use std::sync::Arc;

use groundforge::prelude::*;
use groundforge::{ExplorationStatus, ThreadCount};
use groundforge_test::{corridor, gripper, lights};

#[test]
fn config_from_toml_selects_generator_and_limits() {
    let config = ExplorationConfig::from_toml_str(
        r#"
        generator = "grounded"
        thread_count = "none"

        [termination]
        max_num_states = 3
        "#,
    )
    .unwrap();

    let mut repository =
        StateRepository::from_problem(Arc::new(gripper(2)), config.generator).unwrap();
    let result = explore(&mut repository, &config).unwrap();

    assert_eq!(result.status, ExplorationStatus::StateLimitReached);
    assert!(result.num_states >= 3);
}

#[test]
fn batch_mixes_generators_per_config() {
    let problems = vec![Arc::new(corridor(3)), Arc::new(lights())];
    for kind in [GeneratorKind::Lifted, GeneratorKind::Grounded] {
        let config = ExplorationConfig::default()
            .with_generator(kind)
            .with_thread_count(ThreadCount::Count(2));
        let results = explore_batch(problems.clone(), &config);
        let counts: Vec<usize> = results
            .into_iter()
            .map(|r| r.unwrap().num_states)
            .collect();
        assert_eq!(counts, vec![7, 4]);
    }
}

#[test]
fn both_generators_agree_on_initial_actions() {
    let problem = Arc::new(lights());
    let mut labels = Vec::new();
    for kind in [GeneratorKind::Lifted, GeneratorKind::Grounded] {
        let mut repository = StateRepository::from_problem(Arc::clone(&problem), kind).unwrap();
        let initial = repository.get_or_create_initial_state().unwrap();
        let mut names: Vec<String> = repository
            .generate_applicable_actions(initial)
            .unwrap()
            .into_iter()
            .map(|action| repository.ground_action(action).display(&problem))
            .collect();
        names.sort();
        labels.push(names);
    }
    assert!(!labels[0].is_empty());
    assert_eq!(labels[0], labels[1]);
}
