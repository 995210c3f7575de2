//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Jsont.
//! The Jsont project belongs to the Dunimd project team.

use jsont::dsl::*;
use jsont::{Jsont, JtPath, JtPathKey};
use proptest::prelude::*;
use serde_json::{json, Value};

fn leaf_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
        // backticks that do not wrap the whole string stay plain text
        "[a-z]{1,4}`[a-z]{1,4}".prop_map(Value::from),
    ]
}

fn template_value() -> impl Strategy<Value = Value> {
    leaf_value().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map("[a-z]{1,5}", inner, 0..4)
                .prop_map(|map| Value::Object(map.into_iter().collect())),
        ]
    })
}

#[test]
fn test_compile_collects_every_expression() {
    let compiled = JtTemplateCompiler::new().compile(json!({
        "title": "`'Report'`",
        "user": {"name": "`user.name | upper`", "tags": ["`user.tags[0]`", "static"]},
        "count": 3
    }));

    assert_eq!(compiled.bindings.len(), 3);
    let tag = compiled
        .bindings
        .iter()
        .find(|binding| binding.path.to_string() == "user.tags.0")
        .unwrap();
    assert_eq!(
        tag.path.keys(),
        [JtPathKey::from("user"), JtPathKey::from("tags"), JtPathKey::from(0usize)]
    );
    assert_eq!(tag.expression, "user.tags[0]");
}

#[test]
fn test_compile_stage_kinds() {
    let compiled = JtTemplateCompiler::new().compile(json!({"v": "`'hi' | pad:4,'-' | upper`"}));
    let binding = &compiled.bindings[0];

    assert_eq!(binding.stage_count(), 3);
    assert_eq!(binding.stages[0], JtStage::Literal(json!("hi")));
    assert_eq!(
        binding.stages[1],
        JtStage::Helper {
            name: "pad".to_string(),
            args: vec!["4".to_string(), "-".to_string()],
        }
    );
    assert_eq!(binding.stages[2].helper_name(), Some("upper"));
}

#[test]
fn test_compile_keeps_skeleton() {
    let template = json!({"a": ["`x`", {"b": "`y | z`"}]});
    let compiled = JtTemplateCompiler::new().compile(template.clone());
    assert_eq!(compiled.skeleton, template);
}

#[test]
fn test_compile_str_rejects_malformed_json() {
    let err = Jsont::new().compile_str("{\"v\": \"`x`\"", json!({})).unwrap_err();
    assert!(matches!(err, jsont::JtError::Serde(_)));
}

#[test]
fn test_unknown_helpers_do_not_fail_compilation() {
    let template = Jsont::new().compile(json!({"v": "`x | nope | also_nope`"}), json!({}));
    assert_eq!(template.bindings().len(), 1);
    assert_eq!(template.bindings()[0].path, JtPath::root().child("v"));
}

proptest! {
    #[test]
    fn prop_templates_without_expressions_render_unchanged(
        template in template_value(),
        data in template_value()
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let engine = Jsont::new();
        let compiled = engine.compile(template.clone(), json!({}));
        prop_assert!(compiled.bindings().is_empty());

        let out = runtime.block_on(compiled.render(data)).unwrap();
        prop_assert_eq!(out, template);
    }

    #[test]
    fn prop_binding_paths_are_disjoint(keys in prop::collection::btree_set("[a-z]{1,4}", 1..6)) {
        let template: Value = Value::Object(
            keys.iter()
                .map(|key| (key.clone(), json!(["`x`", {"inner": "`y`"}])))
                .collect(),
        );
        let compiled = JtTemplateCompiler::new().compile(template);
        prop_assert_eq!(compiled.bindings.len(), keys.len() * 2);
        for (i, left) in compiled.bindings.iter().enumerate() {
            for right in compiled.bindings.iter().skip(i + 1) {
                prop_assert!(!left.path.overlaps(&right.path));
            }
        }
    }
}
