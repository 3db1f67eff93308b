//! Gripper Example
//!
//! A robot with two grippers carries balls from one room to another. The
//! reachable state space grows exponentially with the number of balls, which
//! makes gripper a good yardstick for comparing the lifted generator, which
//! grounds per state, with the grounded generator, which grounds everything
//! reachable up front.
//!
//! Usage: `gripper-demo [BALLS]` (default 4). Set `RUST_LOG` for more detail.

use std::sync::Arc;

use groundforge::prelude::*;
use groundforge::{explore_problem, ExplorationResult, ThreadCount};
use groundforge_test::gripper;

fn main() {
    groundforge::console::init();

    let balls: usize = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(4);
    let problem = Arc::new(gripper(balls));

    println!("\nGripper with {} balls", balls);
    for kind in [GeneratorKind::Lifted, GeneratorKind::Grounded] {
        let config = ExplorationConfig::default().with_generator(kind);
        match explore_problem(Arc::clone(&problem), &config) {
            Ok(result) => print_summary(kind, &result),
            Err(error) => eprintln!("{:?} exploration failed: {}", kind, error),
        }
    }

    // Smaller instances side by side on the worker pool.
    let problems: Vec<Arc<Problem>> = (1..=balls).map(|n| Arc::new(gripper(n))).collect();
    let config = ExplorationConfig::default().with_thread_count(ThreadCount::Auto);
    println!("\nBatch of {} instances", problems.len());
    for (n, result) in (1..=balls).zip(explore_batch(problems, &config)) {
        match result {
            Ok(result) => println!("  {} balls: {} states", n, result.num_states),
            Err(error) => println!("  {} balls: {}", n, error),
        }
    }
}

fn print_summary(kind: GeneratorKind, result: &ExplorationResult) {
    println!(
        "  {:?}: {} states, {} transitions, {} goal states ({})",
        kind,
        result.num_states,
        result.num_transitions(),
        result.goal_states.len(),
        result.status,
    );
}
