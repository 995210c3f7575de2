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
    engine.use_fn("double", |v: Value, _args: Vec<String>| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        Ok::<_, JtError>(json!(v.as_i64().unwrap_or(0) * 2))
    });
    engine.use_sync("inc", |v, _| Ok(json!(v.as_i64().unwrap_or(0) + 1)));
    engine
}

#[tokio::test]
async fn test_render_accessor() {
    let template = engine().compile(json!({"v": "`a.b`"}), json!({}));
    assert_eq!(template.render(json!({"a": {"b": 5}})).await.unwrap(), json!({"v": 5}));
    assert_eq!(template.render(json!({"a": {}})).await.unwrap(), json!({"v": null}));
}

#[tokio::test]
async fn test_render_literal() {
    let template = engine().compile(json!({"v": "`'hi'`"}), json!({}));
    assert_eq!(template.render(json!({"anything": 1})).await.unwrap(), json!({"v": "hi"}));
    assert_eq!(template.render(Value::Null).await.unwrap(), json!({"v": "hi"}));
}

#[tokio::test]
async fn test_render_pipeline_order() {
    let template = engine().compile(json!({"v": "`x | double | double`"}), json!({}));
    assert_eq!(template.render(json!({"x": 3})).await.unwrap(), json!({"v": 12}));

    // (3 + 1) * 2 versus 3 * 2 + 1
    let mixed = engine().compile(json!({"a": "`x | inc | double`", "b": "`x | double | inc`"}), json!({}));
    assert_eq!(mixed.render(json!({"x": 3})).await.unwrap(), json!({"a": 8, "b": 7}));
}

#[tokio::test]
async fn test_render_unknown_helper() {
    let template = engine().compile(json!({"v": "`x | nope`"}), json!({}));
    let err = template.render(json!({"x": 1})).await.unwrap_err();
    match &err {
        JtError::InvalidHelper { helper, path } => {
            assert_eq!(helper, "nope");
            assert_eq!(path, "v");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("nope"));
    assert!(message.contains("v"));
}

#[tokio::test]
async fn test_render_nested_paths() {
    let template = engine().compile(
        json!({"user": {"name": "`name`", "ids": ["`ids[1]`", "`ids[0] | double`"]}, "n": 1}),
        json!({}),
    );
    let out = template.render(json!({"name": "ada", "ids": [10, 20]})).await.unwrap();
    assert_eq!(out, json!({"user": {"name": "ada", "ids": [20, 20]}, "n": 1}));
}

#[tokio::test]
async fn test_render_helper_errors_carry_context() {
    let mut engine = engine();
    engine.use_sync("fail", |_, _| Err(JtError::validation("bad input")));
    let template = engine.compile(json!({"a": {"b": "`x | fail`"}}), json!({}));

    match template.render(json!({"x": 1})).await.unwrap_err() {
        JtError::Helper { helper, path, message } => {
            assert_eq!(helper, "fail");
            assert_eq!(path, "a.b");
            assert!(message.contains("bad input"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_render_helper_panic_is_caught() {
    let mut engine = engine();
    engine.use_sync("explode", |_, _| -> jsont::Result<Value> { panic!("helper exploded") });
    let template = engine.compile(json!({"v": "`x | explode`"}), json!({}));

    match template.render(json!({"x": 1})).await.unwrap_err() {
        JtError::Panic { path, message } => {
            assert_eq!(path, "v");
            assert_eq!(message, "helper exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_render_default_policy_fails_whole_render() {
    let mut engine = engine();
    engine.use_sync("fail", |_, _| Err(JtError::validation("boom")));
    let template = engine.compile(
        json!(["`x | double`", "`x | double`", "`x | fail`", "`x | double`", "`x | double`"]),
        json!({}),
    );

    let err = template.render(json!({"x": 1})).await.unwrap_err();
    assert!(matches!(err, JtError::Helper { ref helper, .. } if helper == "fail"));
}

#[tokio::test]
async fn test_render_settled_reports_every_binding() {
    let mut engine = engine();
    engine.use_sync("fail", |_, _| Err(JtError::validation("boom")));
    let template = engine.compile(
        json!(["`x | double`", "`x | double`", "`x | fail`", "`x | double`", "`x | double`"]),
        json!({}),
    );

    let settled = template.render_settled(json!({"x": 1})).await;
    assert_eq!(settled.errors.len(), 5);
    assert_eq!(settled.results.len(), 5);
    assert!(!settled.is_clean());
    for index in [0, 1, 3, 4] {
        assert!(settled.errors[index].is_none());
        assert_eq!(settled.results[index], Some(json!(2)));
    }
    assert!(settled.errors[2].is_some());
    assert!(settled.results[2].is_none());
    assert!(matches!(settled.first_error(), Some(JtError::Helper { .. })));
}

#[tokio::test]
async fn test_render_concurrency_cap() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    let mut engine = Jsont::new().with_config(JtRenderConfig::default().concurrency(2));
    {
        let active = active.clone();
        let peak = peak.clone();
        engine.use_fn("track", move |v: Value, _args: Vec<String>| {
            let active = active.clone();
            let peak = peak.clone();
            async move {
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                active.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, JtError>(v)
            }
        });
    }

    let template = engine.compile(
        json!({"a": "`x | track`", "b": "`x | track`", "c": "`x | track`", "d": "`x | track`", "e": "`x | track`"}),
        json!({}),
    );
    let out = template.render(json!({"x": 7})).await.unwrap();

    assert_eq!(out, json!({"a": 7, "b": 7, "c": 7, "d": 7, "e": 7}));
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert!(peak.load(Ordering::SeqCst) >= 1);
}

#[tokio::test]
async fn test_render_missing_container_is_an_error() {
    let template = engine().compile(json!({"v": "`x`"}), json!({}));
    let rendered = template.render(json!({"x": 1})).await.unwrap();
    assert_eq!(rendered, json!({"v": 1}));

    let mut output = json!({});
    let err = jsont::JtOutputAssembler::set(
        &mut output,
        &jsont::JtPath::root().child("missing").child("v"),
        json!(1),
    )
    .unwrap_err();
    assert!(matches!(err, JtError::Assemble { .. }));
}

#[tokio::test]
async fn test_render_shared_template_concurrently() {
    let template = engine().compile(json!({"v": "`x | double | inc`"}), json!({}));
    let mut handles = Vec::new();
    for x in 0..8i64 {
        let template = template.clone();
        handles.push(tokio::spawn(async move { template.render(json!({"x": x})).await }));
    }
    for (x, handle) in handles.into_iter().enumerate() {
        let out = handle.await.unwrap().unwrap();
        assert_eq!(out, json!({"v": x as i64 * 2 + 1}));
    }
}
