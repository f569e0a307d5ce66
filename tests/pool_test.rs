//! Worker pool ordering, bounds and failure handling

use pinscrape::{ScrapeError, run_pool};
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_empty_input_returns_empty_output() {
    let out: Vec<u32> = run_pool(Vec::<u32>::new(), 4, |x| async move { x }).await.unwrap();
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_results_keep_input_positions_despite_uneven_latency() {
    let items: Vec<u64> = (0..20).collect();

    let out = run_pool(items, 5, |x| async move {
        // Early items finish last
        tokio::time::sleep(Duration::from_millis(20 - x)).await;
        x * 10
    })
    .await
    .unwrap();

    assert_eq!(out, (0..20).map(|x| x * 10).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_concurrency_never_exceeds_worker_count() {
    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let (in_flight_ref, peak_ref) = (Arc::clone(&in_flight), Arc::clone(&peak));
    let out = run_pool((0..30).collect::<Vec<u32>>(), 3, move |x| {
        let in_flight = Arc::clone(&in_flight_ref);
        let peak = Arc::clone(&peak_ref);
        async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            in_flight.fetch_sub(1, Ordering::SeqCst);
            x
        }
    })
    .await
    .unwrap();

    assert_eq!(out.len(), 30);
    assert!(peak.load(Ordering::SeqCst) <= 3);
    assert_eq!(in_flight.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_zero_workers_clamped_to_one() {
    let out = run_pool(vec!["a", "b", "c"], 0, |s| async move { s.to_uppercase() })
        .await
        .unwrap();
    assert_eq!(out, vec!["A", "B", "C"]);
}

#[tokio::test]
async fn test_panicking_worker_surfaces_pool_error() {
    let result = run_pool(vec![1u32, 2, 3, 4], 2, |x| async move {
        if x == 3 {
            panic!("worker blew up on {x}");
        }
        x
    })
    .await;

    assert!(matches!(result, Err(ScrapeError::Pool(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_output_matches_input_for_any_worker_count(
        items in prop::collection::vec(any::<i32>(), 0..60),
        workers in 1usize..80,
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let expected: Vec<i64> = items.iter().map(|&x| i64::from(x) * 2).collect();
        let out = runtime
            .block_on(run_pool(items, workers, |x| async move {
                tokio::task::yield_now().await;
                i64::from(x) * 2
            }))
            .unwrap();

        prop_assert_eq!(out, expected);
    }
}
