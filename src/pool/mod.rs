//! Fixed-size worker pool with positional results
//!
//! Workers pull `(index, item)` pairs from a shared lock-free queue and run
//! the per-item function one item at a time. Each result lands in the slot
//! of its input index, so the output lines up with the input no matter in
//! which order items finish. The pool never retries; that is up to the
//! per-item function.

use crossbeam_queue::SegQueue;
use futures::StreamExt;
use futures::stream::FuturesUnordered;
use log::{debug, error};
use std::future::Future;
use std::sync::Arc;

use crate::errors::{ScrapeError, ScrapeResult};

/// Apply `f` to every item using `workers` concurrent workers
///
/// `workers` is clamped to `1..=items.len()`. Returns once every worker has
/// drained the queue. The output has the same length as `items` and
/// `output[i]` is `f(items[i])`.
///
/// # Errors
///
/// `ScrapeError::Pool` if a worker task panicked; results of the remaining
/// workers are discarded in that case.
pub async fn run_pool<T, R, F, Fut>(items: Vec<T>, workers: usize, f: F) -> ScrapeResult<Vec<R>>
where
    T: Send + 'static,
    R: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
{
    let len = items.len();
    if len == 0 {
        return Ok(Vec::new());
    }
    let workers = workers.clamp(1, len);

    let queue = Arc::new(SegQueue::new());
    for entry in items.into_iter().enumerate() {
        queue.push(entry);
    }

    let f = Arc::new(f);
    let mut tasks = FuturesUnordered::new();
    for worker_id in 0..workers {
        let queue = Arc::clone(&queue);
        let f = Arc::clone(&f);
        tasks.push(tokio::spawn(async move {
            let mut finished = Vec::new();
            while let Some((index, item)) = queue.pop() {
                finished.push((index, (*f)(item).await));
            }
            debug!("Worker {worker_id} finished {} items", finished.len());
            finished
        }));
    }

    let mut slots: Vec<Option<R>> = std::iter::repeat_with(|| None).take(len).collect();
    let mut failure = None;

    while let Some(joined) = tasks.next().await {
        match joined {
            Ok(finished) => {
                for (index, result) in finished {
                    slots[index] = Some(result);
                }
            }
            Err(e) => {
                error!("Worker task panicked: {e}");
                failure.get_or_insert_with(|| e.to_string());
            }
        }
    }

    if let Some(message) = failure {
        return Err(ScrapeError::Pool(message));
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| ScrapeError::Pool(format!("No result recorded for item {index}")))
        })
        .collect()
}
