//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Jsont.
//! The Jsont project belongs to the Dunimd project team.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use jsont::{JtBatch, JtBatchProgress, JtError, JtProgressObserver};
use tokio::time::sleep;

#[tokio::test]
async fn test_batch_respects_concurrency_cap() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut batch = JtBatch::new("cap").concurrency(Some(2));
    for index in 0..6usize {
        let active = active.clone();
        let peak = peak.clone();
        batch.push(async move {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            peak.fetch_max(now, Ordering::SeqCst);
            sleep(Duration::from_millis(10)).await;
            active.fetch_sub(1, Ordering::SeqCst);
            Ok::<_, JtError>(index * 10)
        });
    }

    let results = batch.end().await.unwrap();
    assert_eq!(results, vec![0, 10, 20, 30, 40, 50]);
    assert!(peak.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_batch_first_error_wins_without_cancelling_started_tasks() {
    let finished = Arc::new(AtomicUsize::new(0));

    let mut batch = JtBatch::new("abort");
    {
        let finished = finished.clone();
        batch.push(async move {
            sleep(Duration::from_millis(40)).await;
            finished.fetch_add(1, Ordering::SeqCst);
            Ok::<_, JtError>(1)
        });
    }
    batch.push(async { Err::<i32, _>(JtError::validation("fast failure")) });

    let err = batch.end().await.unwrap_err();
    assert!(err.to_string().contains("fast failure"));
    assert_eq!(finished.load(Ordering::SeqCst), 0);

    // the slow task was detached, not cancelled
    sleep(Duration::from_millis(100)).await;
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_batch_abort_skips_unstarted_tasks() {
    let started = Arc::new(AtomicUsize::new(0));

    let mut batch = JtBatch::new("serial").concurrency(Some(1));
    batch.push(async { Err::<usize, _>(JtError::validation("first")) });
    for _ in 0..3 {
        let started = started.clone();
        batch.push(async move {
            started.fetch_add(1, Ordering::SeqCst);
            Ok::<_, JtError>(0usize)
        });
    }

    assert!(batch.end().await.is_err());
    sleep(Duration::from_millis(20)).await;
    assert_eq!(started.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_batch_settle_collects_everything() {
    let mut batch = JtBatch::new("settle");
    for index in 0..5usize {
        batch.push(async move {
            if index == 2 {
                Err(JtError::validation("two"))
            } else {
                Ok(index)
            }
        });
    }

    let settled = batch.settle().await;
    assert_eq!(settled.error_count(), 1);
    assert!(!settled.is_clean());
    assert_eq!(settled.results, vec![Some(0), Some(1), None, Some(3), Some(4)]);
    assert!(settled.errors[2].is_some());
}

#[tokio::test]
async fn test_batch_progress_observer() {
    let records: Arc<Mutex<Vec<JtBatchProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = records.clone();
    let observer: JtProgressObserver = Arc::new(move |progress: &JtBatchProgress| {
        sink.lock().unwrap().push(progress.clone());
    });

    let mut batch = JtBatch::new("observed").on_progress(Some(observer));
    for index in 0..4usize {
        batch.push(async move {
            if index == 1 {
                Err(JtError::validation("odd"))
            } else {
                Ok(index)
            }
        });
    }
    let settled = batch.settle().await;
    assert_eq!(settled.error_count(), 1);

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 4);
    let last = records.last().unwrap();
    assert_eq!(last.complete, 4);
    assert_eq!(last.pending, 0);
    assert_eq!(last.percent, 100);
    assert_eq!(last.label, "observed");
    assert_eq!(records.iter().filter(|record| !record.succeeded).count(), 1);

    let failed = records.iter().find(|record| record.index == 1).unwrap();
    assert!(failed.value.is_none());
    assert!(failed.error.as_deref().unwrap().contains("odd"));

    let passed = records.iter().find(|record| record.index == 3).unwrap();
    assert_eq!(passed.value, Some(serde_json::json!(3)));
    assert!(passed.error.is_none());
}
