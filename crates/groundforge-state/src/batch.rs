//! Exploration of independent problems on a worker pool.
//!
//! Each worker builds its own generator and state repository; only the
//! read-only problems are shared.

use std::sync::Arc;

use groundforge_config::{ExplorationConfig, ThreadCount};
use groundforge_core::{Problem, Result};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{info, warn};

use crate::exploration::{explore, ExplorationResult};
use crate::repository::StateRepository;

/// Builds a repository with the configured generator and explores it.
pub fn explore_problem(problem: Arc<Problem>, config: &ExplorationConfig) -> Result<ExplorationResult> {
    let mut repository = StateRepository::from_problem(problem, config.generator)?;
    explore(&mut repository, config)
}

/// Explores every problem, returning one result per problem in input order.
///
/// Uses a pool of [`ThreadCount::resolve`] threads, or the calling thread
/// for [`ThreadCount::None`]. A failing problem does not affect the others.
pub fn explore_batch(problems: Vec<Arc<Problem>>, config: &ExplorationConfig) -> Vec<Result<ExplorationResult>> {
    if problems.is_empty() {
        return Vec::new();
    }
    let threads = config.thread_count.resolve(problems.len());
    info!(
        event = "batch_start",
        problems = problems.len(),
        threads,
    );

    let sequential = |problems: Vec<Arc<Problem>>| -> Vec<Result<ExplorationResult>> {
        problems
            .into_iter()
            .map(|problem| explore_problem(problem, config))
            .collect()
    };

    let results = if config.thread_count == ThreadCount::None {
        sequential(problems)
    } else {
        match ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("groundforge-worker-{}", i))
            .build()
        {
            Ok(pool) => pool.install(|| {
                problems
                    .into_par_iter()
                    .map(|problem| explore_problem(problem, config))
                    .collect()
            }),
            Err(error) => {
                warn!(event = "thread_pool_unavailable", error = %error);
                sequential(problems)
            }
        }
    };

    info!(
        event = "batch_end",
        problems = results.len(),
        failed = results.iter().filter(|r| r.is_err()).count(),
    );
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundforge_core::GroundForgeError;
    use groundforge_test::gripper::{gripper, reachable_state_count};

    fn problems() -> Vec<Arc<Problem>> {
        (1..=3).map(|n| Arc::new(gripper(n))).collect()
    }

    #[test]
    fn test_results_in_input_order() {
        for thread_count in [ThreadCount::None, ThreadCount::Count(2), ThreadCount::Auto] {
            let config = ExplorationConfig::default().with_thread_count(thread_count);
            let results = explore_batch(problems(), &config);
            let counts: Vec<usize> = results
                .into_iter()
                .map(|r| r.unwrap().num_states)
                .collect();
            assert_eq!(
                counts,
                vec![
                    reachable_state_count(1),
                    reachable_state_count(2),
                    reachable_state_count(3),
                ]
            );
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(explore_batch(Vec::new(), &ExplorationConfig::default()).is_empty());
    }

    #[test]
    fn test_failure_is_isolated() {
        let mut broken = gripper(1);
        let first = broken.initial[0].atom.clone();
        broken.initial.push(groundforge_core::GroundLiteral::negative(first));

        let results = explore_batch(
            vec![Arc::new(broken), Arc::new(gripper(1))],
            &ExplorationConfig::default().with_thread_count(ThreadCount::Count(2)),
        );
        assert!(matches!(
            results[0],
            Err(GroundForgeError::NegativeInitialLiteral { .. })
        ));
        assert_eq!(results[1].as_ref().unwrap().num_states, 8);
    }
}
