use super::*;
use pretty_assertions::assert_eq;
use std::str::FromStr;
use std::sync::Arc;

fn run(samples: &[(RequestOutcome, f64)]) -> Statistics {
    samples
        .iter()
        .fold(Statistics::default(), |stats, (outcome, elapsed)| {
            stats.begin_request().complete(*outcome, *elapsed)
        })
}

#[test]
fn test_default_is_zero() {
    let stats = Statistics::default();
    assert_eq!(stats.total_requests, 0);
    assert_eq!(stats.successful_requests, 0);
    assert_eq!(stats.failed_requests, 0);
    assert_eq!(stats.average_response_time, 0.0);
}

#[test]
fn test_begin_request_counts_attempt_only() {
    let stats = Statistics::default().begin_request();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_requests + stats.failed_requests, 0);
    assert_eq!(stats.in_flight(), 1);
}

#[test]
fn test_first_sample_replaces_average() {
    let stats = run(&[(RequestOutcome::Success, 120.0)]);
    assert_eq!(stats.average_response_time, 120.0);
    assert_eq!(stats.successful_requests, 1);
    assert_eq!(stats.failed_requests, 0);
}

#[test]
fn test_average_is_arithmetic_mean_pooled_across_outcomes() {
    let samples = [
        (RequestOutcome::Success, 100.0),
        (RequestOutcome::Failure, 250.0),
        (RequestOutcome::Success, 40.0),
        (RequestOutcome::Failure, 10.0),
        (RequestOutcome::Success, 600.0),
    ];
    let stats = run(&samples);

    let mean = samples.iter().map(|(_, e)| e).sum::<f64>() / samples.len() as f64;
    assert!((stats.average_response_time - mean).abs() < 1e-9);
    assert_eq!(stats.total_requests, 5);
    assert_eq!(stats.successful_requests, 3);
    assert_eq!(stats.failed_requests, 2);
    assert_eq!(stats.in_flight(), 0);
}

#[test]
fn test_average_is_independent_of_outcome_order() {
    let a = run(&[
        (RequestOutcome::Failure, 5.0),
        (RequestOutcome::Success, 15.0),
        (RequestOutcome::Success, 25.0),
    ]);
    let b = run(&[
        (RequestOutcome::Success, 5.0),
        (RequestOutcome::Success, 15.0),
        (RequestOutcome::Failure, 25.0),
    ]);
    assert!((a.average_response_time - 15.0).abs() < 1e-9);
    assert!((b.average_response_time - 15.0).abs() < 1e-9);
}

#[test]
fn test_complete_after_reset_takes_sample_as_average() {
    // A request that began before a reset settles into zeroed counters.
    let stats = Statistics::default().complete(RequestOutcome::Success, 42.0);
    assert_eq!(stats.total_requests, 0);
    assert_eq!(stats.successful_requests, 1);
    assert_eq!(stats.average_response_time, 42.0);
    assert_eq!(stats.in_flight(), 0);
}

#[test]
fn test_stat_key_round_trip_names() {
    assert_eq!(StatKey::from_str("totalRequests").unwrap(), StatKey::TotalRequests);
    assert_eq!(
        StatKey::from_str("averageResponseTime").unwrap(),
        StatKey::AverageResponseTime
    );
    assert_eq!(StatKey::FailedRequests.to_string(), "failedRequests");
    let name: &'static str = StatKey::SuccessfulRequests.into();
    assert_eq!(name, "successfulRequests");
    assert!(StatKey::from_str("tokensUsed").is_err());
}

#[test]
fn test_get_by_key() {
    let stats = run(&[(RequestOutcome::Success, 10.0), (RequestOutcome::Failure, 30.0)]);
    assert_eq!(stats.get(StatKey::TotalRequests), 2.0);
    assert_eq!(stats.get(StatKey::SuccessfulRequests), 1.0);
    assert_eq!(stats.get(StatKey::FailedRequests), 1.0);
    assert_eq!(stats.get(StatKey::AverageResponseTime), 20.0);
}

#[test]
fn test_statistics_serialize_camel_case() {
    let value = serde_json::to_value(Statistics::default()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "totalRequests": 0,
            "successfulRequests": 0,
            "failedRequests": 0,
            "averageResponseTime": 0.0
        })
    );
}

#[test]
fn test_tracker_snapshot_is_a_copy() {
    let tracker = StatsTracker::new();
    let mut snapshot = tracker.snapshot();
    snapshot.total_requests = 99;
    snapshot.average_response_time = 1.5;

    assert_eq!(tracker.snapshot(), Statistics::default());
    assert_eq!(tracker.snapshot(), tracker.snapshot());
}

#[test]
fn test_tracker_start_then_succeed() {
    let tracker = StatsTracker::new();
    let request = tracker.start();
    assert_eq!(tracker.snapshot().total_requests, 1);
    assert_eq!(tracker.snapshot().in_flight(), 1);

    request.succeed();
    let stats = tracker.snapshot();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.successful_requests, 1);
    assert_eq!(stats.failed_requests, 0);
    assert!(stats.average_response_time >= 0.0);
}

#[test]
fn test_tracker_drop_counts_as_failure() {
    let tracker = StatsTracker::new();
    {
        let _request = tracker.start();
    }
    let stats = tracker.snapshot();
    assert_eq!(stats.total_requests, 1);
    assert_eq!(stats.failed_requests, 1);
    assert_eq!(stats.successful_requests, 0);
}

#[test]
fn test_mark_response_freezes_elapsed() {
    let tracker = StatsTracker::new();
    let mut request = tracker.start();
    request.mark_response();
    let frozen = request.elapsed_ms();
    std::thread::sleep(Duration::from_millis(5));
    assert_eq!(request.elapsed_ms(), frozen);
    request.mark_response();
    assert_eq!(request.elapsed_ms(), frozen);
    request.fail();

    let stats = tracker.snapshot();
    assert_eq!(stats.average_response_time, frozen);
}

#[test]
fn test_tracker_reset() {
    let tracker = StatsTracker::new();
    tracker.start().succeed();
    tracker.start().fail();
    tracker.reset();
    assert_eq!(tracker.snapshot(), Statistics::default());
}

#[test]
fn test_reset_while_in_flight_is_last_write_wins() {
    let tracker = StatsTracker::new();
    let request = tracker.start();
    tracker.reset();
    request.succeed();

    let stats = tracker.snapshot();
    assert_eq!(stats.total_requests, 0);
    assert_eq!(stats.successful_requests, 1);
}

#[test]
fn test_tracker_concurrent_updates_are_not_lost() {
    let tracker = Arc::new(StatsTracker::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for _ in 0..50 {
                    let request = tracker.start();
                    if i % 2 == 0 {
                        request.succeed();
                    } else {
                        request.fail();
                    }
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = tracker.snapshot();
    assert_eq!(stats.total_requests, 400);
    assert_eq!(stats.successful_requests, 200);
    assert_eq!(stats.failed_requests, 200);
    assert_eq!(stats.in_flight(), 0);
}

#[test]
fn test_overlapping_requests_keep_exact_mean() {
    let stats = Statistics::default()
        .begin_request()
        .begin_request()
        .complete(RequestOutcome::Success, 10.0)
        .complete(RequestOutcome::Success, 20.0);
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.average_response_time, 15.0);

    // A third request still in flight does not dilute the settled mean.
    let stats = stats.begin_request();
    let stats = stats.begin_request().complete(RequestOutcome::Failure, 45.0);
    assert_eq!(stats.total_requests, 4);
    assert_eq!(stats.in_flight(), 1);
    assert!((stats.average_response_time - 25.0).abs() < 1e-9);
}

#[test]
fn test_tracker_overlapping_in_flight_requests() {
    let tracker = StatsTracker::new();
    let mut first = tracker.start();
    let mut second = tracker.start();
    first.mark_response();
    std::thread::sleep(Duration::from_millis(5));
    second.mark_response();
    let expected = (first.elapsed_ms() + second.elapsed_ms()) / 2.0;

    first.succeed();
    second.succeed();

    let stats = tracker.snapshot();
    assert_eq!(stats.total_requests, 2);
    assert_eq!(stats.successful_requests, 2);
    assert!((stats.average_response_time - expected).abs() < 1e-9);
}
