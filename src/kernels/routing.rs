//! # **Routing Module** - *Task And Strategy Dispatch*
//!
//! Maps a `(Task, Strategy)` pair onto the concrete kernel that implements
//! it.
//!
//! ## Behaviour
//! - Every kernel shares the [`KernelFn`] signature, so the harness times
//!   any pair through one code path.
//! - The public surface only ever produces pairs from [`Task::strategies`],
//!   which keeps the frequency task's lane arms unreachable.

use crate::aliases::KernelFn;
use crate::enums::strategy::Strategy;
use crate::enums::task::Task;
use crate::kernels::reduction::{above_mean, divisible, mode_frequency, non_extreme_max, primes};

/// Concrete kernel for a `(Task, Strategy)` pair.
pub(crate) fn kernel_for(task: Task, strategy: Strategy) -> KernelFn {
    match task {
        Task::CountAboveAverage => above_average_kernel(strategy),
        Task::DivisibleBy3And5 => divisible_kernel(strategy),
        Task::FindPrimes => primes_kernel(strategy),
        Task::NonExtremeMax => non_extreme_max_kernel(strategy),
        Task::MaxFrequency => mode_frequency_kernel(strategy),
    }
}

fn above_average_kernel(strategy: Strategy) -> KernelFn {
    match strategy {
        Strategy::Sequential => above_mean::sequential,
        #[cfg(feature = "parallel_proc")]
        Strategy::Declarative => above_mean::declarative,
        Strategy::StaticPool => above_mean::static_pool,
        Strategy::DynamicPool => above_mean::dynamic_pool,
        Strategy::ParallelInvoke => above_mean::parallel_invoke,
        Strategy::FutureFanout => above_mean::future_fanout,
        Strategy::Unrolled => above_mean::unrolled,
        Strategy::PortableSimd => above_mean::portable_simd,
        Strategy::Avx2 => above_mean::avx2,
    }
}

fn divisible_kernel(strategy: Strategy) -> KernelFn {
    match strategy {
        Strategy::Sequential => divisible::sequential,
        #[cfg(feature = "parallel_proc")]
        Strategy::Declarative => divisible::declarative,
        Strategy::StaticPool => divisible::static_pool,
        Strategy::DynamicPool => divisible::dynamic_pool,
        Strategy::ParallelInvoke => divisible::parallel_invoke,
        Strategy::FutureFanout => divisible::future_fanout,
        Strategy::Unrolled => divisible::unrolled,
        Strategy::PortableSimd => divisible::portable_simd,
        Strategy::Avx2 => divisible::avx2,
    }
}

fn primes_kernel(strategy: Strategy) -> KernelFn {
    match strategy {
        Strategy::Sequential => primes::sequential,
        #[cfg(feature = "parallel_proc")]
        Strategy::Declarative => primes::declarative,
        Strategy::StaticPool => primes::static_pool,
        Strategy::DynamicPool => primes::dynamic_pool,
        Strategy::ParallelInvoke => primes::parallel_invoke,
        Strategy::FutureFanout => primes::future_fanout,
        Strategy::Unrolled => primes::unrolled,
        Strategy::PortableSimd => primes::portable_simd,
        Strategy::Avx2 => primes::avx2,
    }
}

fn non_extreme_max_kernel(strategy: Strategy) -> KernelFn {
    match strategy {
        Strategy::Sequential => non_extreme_max::sequential,
        #[cfg(feature = "parallel_proc")]
        Strategy::Declarative => non_extreme_max::declarative,
        Strategy::StaticPool => non_extreme_max::static_pool,
        Strategy::DynamicPool => non_extreme_max::dynamic_pool,
        Strategy::ParallelInvoke => non_extreme_max::parallel_invoke,
        Strategy::FutureFanout => non_extreme_max::future_fanout,
        Strategy::Unrolled => non_extreme_max::unrolled,
        Strategy::PortableSimd => non_extreme_max::portable_simd,
        Strategy::Avx2 => non_extreme_max::avx2,
    }
}

fn mode_frequency_kernel(strategy: Strategy) -> KernelFn {
    match strategy {
        Strategy::Sequential => mode_frequency::sequential,
        #[cfg(feature = "parallel_proc")]
        Strategy::Declarative => mode_frequency::declarative,
        Strategy::StaticPool => mode_frequency::static_pool,
        Strategy::DynamicPool => mode_frequency::dynamic_pool,
        Strategy::ParallelInvoke => mode_frequency::parallel_invoke,
        Strategy::FutureFanout => mode_frequency::future_fanout,
        Strategy::Unrolled | Strategy::PortableSimd | Strategy::Avx2 => {
            unreachable!("hash counting has no lane kernel; catalog excludes these pairs")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::dataset::Dataset;

    #[test]
    fn test_every_catalog_pair_routes() {
        let ds = Dataset::<i32>::generate(64, 42);
        for task in Task::ALL {
            for strategy in task.strategies() {
                let kernel = kernel_for(task, strategy);
                match kernel(&ds, 2) {
                    Ok(value) => assert_eq!(value, task.oracle(&ds)),
                    // the AVX2 pair is allowed to refuse on older hardware
                    Err(e) => {
                        assert_eq!(strategy, Strategy::Avx2);
                        assert_eq!(e, crate::enums::error::ParafoldError::avx2_unsupported());
                    }
                }
            }
        }
    }

    #[test]
    fn test_routed_sequential_is_the_oracle() {
        let ds = Dataset::<i32>::generate(256, 7);
        for task in Task::ALL {
            let kernel = kernel_for(task, Strategy::Sequential);
            assert_eq!(kernel(&ds, 1).unwrap(), task.oracle(&ds));
        }
    }

    #[test]
    #[should_panic]
    fn test_frequency_lane_pair_is_a_caller_bug() {
        let _ = kernel_for(Task::MaxFrequency, Strategy::PortableSimd);
    }
}
