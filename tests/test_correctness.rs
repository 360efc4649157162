//! Integration tests for the cross-strategy correctness invariant: every
//! applicable strategy reduces to the oracle's value on the same dataset.

use parafold::{
    BenchConfig, Dataset, NO_QUALIFYING_ELEMENT, ParafoldError, RunPhase, Strategy, Task,
    avx2_available, run,
};

fn quick_config() -> BenchConfig {
    BenchConfig { seed: 42, warmup: 0, iterations: 1, workers: 4 }
}

#[test]
fn test_every_strategy_matches_oracle_across_sizes() {
    let config = quick_config();
    for size in [0usize, 1, 2, 1000] {
        let dataset = Dataset::<i32>::generate(size, config.seed);
        for task in Task::ALL {
            let expected = task.oracle(&dataset);
            for strategy in task.strategies() {
                let outcome = run(task, strategy, &dataset, &config);
                match outcome.phase {
                    RunPhase::Completed => {
                        assert_eq!(
                            outcome.value,
                            Some(expected),
                            "{task} / {strategy} at size {size}"
                        );
                    }
                    RunPhase::Failed => {
                        // only the AVX2 pair may refuse, and only for want
                        // of hardware support
                        assert_eq!(strategy, Strategy::Avx2, "{task} / {strategy} failed");
                        assert_eq!(outcome.error, Some(ParafoldError::avx2_unsupported()));
                    }
                    other => panic!("non-terminal phase {other} from run"),
                }
            }
        }
    }
}

#[test]
fn test_worker_counts_do_not_change_values() {
    for workers in [1usize, 2, 3, 8, 16] {
        let config = BenchConfig { seed: 7, warmup: 0, iterations: 1, workers };
        let dataset = Dataset::<i32>::generate(1000, config.seed);
        for task in Task::ALL {
            let expected = task.oracle(&dataset);
            for strategy in task.strategies() {
                if strategy == Strategy::Avx2 && !avx2_available() {
                    continue;
                }
                let outcome = run(task, strategy, &dataset, &config);
                assert_eq!(
                    outcome.value,
                    Some(expected),
                    "{task} / {strategy} with {workers} workers"
                );
            }
        }
    }
}

#[test]
fn test_dataset_generation_is_reproducible() {
    let a = Dataset::<i32>::generate(1000, 99);
    let b = Dataset::<i32>::generate(1000, 99);
    assert_eq!(a.as_slice(), b.as_slice());

    let c = Dataset::<i32>::generate(1000, 100);
    assert_ne!(a.as_slice(), c.as_slice());
}

#[test]
fn test_all_extreme_dataset_reports_sentinel_under_every_strategy() {
    let config = quick_config();
    let zigzag: Vec<i32> = (0..256).map(|i| if i % 2 == 0 { 100 } else { 0 }).collect();
    let dataset = Dataset::from_values(&zigzag);
    for strategy in Task::NonExtremeMax.strategies() {
        let outcome = run(Task::NonExtremeMax, strategy, &dataset, &config);
        if outcome.phase == RunPhase::Completed {
            assert_eq!(outcome.value, Some(NO_QUALIFYING_ELEMENT), "{strategy}");
        }
    }
}
