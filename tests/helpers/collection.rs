//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Jsont.
//! The Jsont project belongs to the Dunimd project team.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use jsont::{Jsont, JtError, JtRenderConfig};
use serde_json::{json, Value};

fn engine() -> Jsont {
    let mut engine = Jsont::new();
    engine.use_sync("double", |v, _| Ok(json!(v.as_i64().unwrap_or(0) * 2)));
    engine.use_sync("sum", |v, _| {
        let total: i64 = v
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_i64).sum())
            .unwrap_or(0);
        Ok(json!(total))
    });
    engine.use_sync("pick", |v, args| {
        let key = args.first().map(String::as_str).unwrap_or_default();
        Ok(v.get(key).cloned().unwrap_or(Value::Null))
    });
    engine.use_sync("positive", |v, _| {
        let kept: Vec<Value> = v
            .as_array()
            .map(|items| items.iter().filter(|n| n.as_i64().unwrap_or(0) > 0).cloned().collect())
            .unwrap_or_default();
        Ok(Value::Array(kept))
    });
    engine
}

#[tokio::test]
async fn test_map_without_boundary() {
    let template = engine().compile(json!({"v": "`items | map | double`"}), json!({}));
    let out = template.render(json!({"items": [1, 2, 3, 4]})).await.unwrap();
    assert_eq!(out, json!({"v": [2, 4, 6, 8]}));
}

#[tokio::test]
async fn test_map_preserves_order_under_uneven_latency() {
    let mut engine = engine();
    engine.use_fn("slow", |v: Value, _args: Vec<String>| async move {
        let n = v.as_u64().unwrap_or(0);
        tokio::time::sleep(Duration::from_millis(30 - n * 5)).await;
        Ok::<_, JtError>(json!(n))
    });
    let template = engine.compile(json!({"v": "`items | map | slow`"}), json!({}));
    let out = template.render(json!({"items": [0, 1, 2, 3, 4, 5]})).await.unwrap();
    assert_eq!(out, json!({"v": [0, 1, 2, 3, 4, 5]}));
}

#[tokio::test]
async fn test_map_with_reduce_boundary() {
    let template = engine().compile(json!({"total": "`items | map | double | reduce | sum`"}), json!({}));
    let out = template.render(json!({"items": [1, 2, 3]})).await.unwrap();
    assert_eq!(out, json!({"total": 12}));
}

#[tokio::test]
async fn test_map_with_collect_boundary() {
    let template = engine().compile(json!({"v": "`rows | map | pick:n | collect | positive`"}), json!({}));
    let out = template
        .render(json!({"rows": [{"n": 3}, {"n": -1}, {"n": 5}]}))
        .await
        .unwrap();
    assert_eq!(out, json!({"v": [3, 5]}));
}

#[tokio::test]
async fn test_map_over_object() {
    let template = engine().compile(json!({"v": "`prices | map | double`"}), json!({}));
    let out = template.render(json!({"prices": {"tea": 2, "cake": 4}})).await.unwrap();
    assert_eq!(out, json!({"v": {"tea": 4, "cake": 8}}));
}

#[tokio::test]
async fn test_map_rejects_scalars() {
    let template = engine().compile(json!({"v": "`name | map | double`"}), json!({}));
    let err = template.render(json!({"name": "ada"})).await.unwrap_err();
    assert!(err.to_string().contains("Incompatible type for `map`: string"));
}

#[tokio::test]
async fn test_map_element_failure_fails_render() {
    let mut engine = engine();
    engine.use_sync("strict", |v, _| {
        v.as_i64()
            .map(|n| json!(n))
            .ok_or_else(|| JtError::validation("not a number"))
    });
    let template = engine.compile(json!({"v": "`items | map | strict`"}), json!({}));
    let err = template.render(json!({"items": [1, "x", 3]})).await.unwrap_err();
    match err {
        JtError::Helper { helper, path, .. } => {
            assert_eq!(helper, "strict");
            assert_eq!(path, "v");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_map_concurrency_cap() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut engine = engine().with_config(JtRenderConfig::default().map_concurrency(3));
    {
        let active = active.clone();
        let peak = peak.clone();
        engine.use_fn("track", move |v: Value, _args: Vec<String>| {
            let active = active.clone();
            let peak = peak.clone();
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, JtError>(v)
            }
        });
    }

    let template = engine.compile(json!({"v": "`items | map | track | reduce | sum`"}), json!({}));
    let out = template.render(json!({"items": [1, 2, 3, 4, 5, 6, 7, 8]})).await.unwrap();
    assert_eq!(out, json!({"v": 36}));
    assert!(peak.load(Ordering::SeqCst) <= 3);
}

#[tokio::test]
async fn test_reduce_alone_is_identity() {
    let template = engine().compile(json!({"v": "`items | reduce | sum`"}), json!({}));
    let out = template.render(json!({"items": [4, 5]})).await.unwrap();
    assert_eq!(out, json!({"v": 9}));
}
