use crate::options::Execution;

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
use rayon::{prelude::*, ThreadPool};
#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
use std::sync::OnceLock;

/// Crate-local Rayon pool for scatter/gather work.
///
/// Global pool initialization can fail under heavy resource pressure (many test binaries on one
/// host), and Rayon then panics on first use. A local pool lets us fall back to sequential
/// execution instead.
#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
static RAYON_POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
fn desired_rayon_threads() -> usize {
    let from_env = std::env::var("RAYON_NUM_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0);
    from_env.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    })
}

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
fn build_rayon_pool() -> Option<ThreadPool> {
    let requested = desired_rayon_threads().max(1);
    let try_build = |n| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .thread_name(|idx| format!("keyjoin-worker-{idx}"))
            .build()
    };

    match try_build(requested) {
        Ok(pool) => Some(pool),
        Err(err) if requested > 1 => {
            log::warn!("failed to build {requested}-thread pool ({err}); retrying with 1 thread");
            try_build(1).ok()
        }
        Err(err) => {
            log::warn!("failed to build worker pool ({err}); running sequentially");
            None
        }
    }
}

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
fn rayon_pool() -> Option<&'static ThreadPool> {
    RAYON_POOL.get_or_init(build_rayon_pool).as_ref()
}

#[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
fn pool_for(execution: Execution, items: usize) -> Option<&'static ThreadPool> {
    if execution == Execution::Parallel && items > 1 {
        rayon_pool()
    } else {
        None
    }
}

/// Applies `f` to every item, on the worker pool when `execution` allows it.
pub(crate) fn map_vec<T, U, F>(items: Vec<T>, execution: Execution, f: F) -> Vec<U>
where
    T: Send,
    U: Send,
    F: Fn(T) -> U + Sync + Send,
{
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    let items = match pool_for(execution, items.len()) {
        Some(pool) => return pool.install(|| items.into_par_iter().map(&f).collect()),
        None => items,
    };
    #[cfg(not(all(feature = "parallel", not(target_arch = "wasm32"))))]
    let _ = execution;

    items.into_iter().map(f).collect()
}

/// Like [`map_vec`], stopping at the first error.
pub(crate) fn try_map_vec<T, U, E, F>(
    items: Vec<T>,
    execution: Execution,
    f: F,
) -> Result<Vec<U>, E>
where
    T: Send,
    U: Send,
    E: Send,
    F: Fn(T) -> Result<U, E> + Sync + Send,
{
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    let items = match pool_for(execution, items.len()) {
        Some(pool) => return pool.install(|| items.into_par_iter().map(&f).collect()),
        None => items,
    };
    #[cfg(not(all(feature = "parallel", not(target_arch = "wasm32"))))]
    let _ = execution;

    items.into_iter().map(f).collect()
}
