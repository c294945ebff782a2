// Unit tests for BindingEngine - dirty tracking, signals, two-way updates
use convey_core::error::{ConveyError, Result};
use convey_core::{
    BindingEngine, BindingMode, ConverterRegistry, Expr, Pipeline, PipelineBuilder, ValueConverter,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts evaluations so tests can assert how often a binding recomputed.
struct CountingConverter {
    calls: Arc<AtomicUsize>,
    signal_keys: &'static [&'static str],
}

impl CountingConverter {
    fn new(signal_keys: &'static [&'static str]) -> (Arc<dyn ValueConverter>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let converter = Arc::new(Self {
            calls: Arc::clone(&calls),
            signal_keys,
        });
        (converter, calls)
    }
}

impl ValueConverter for CountingConverter {
    fn to_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(value.clone())
    }

    fn signals(&self) -> &[&str] {
        self.signal_keys
    }
}

/// Halves on the way in, doubles on the way out.
struct HalveConverter;

impl ValueConverter for HalveConverter {
    fn to_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        let n = value
            .as_f64()
            .ok_or_else(|| ConveyError::conversion("halve expects a number"))?;
        Ok(json!(n / 2.0))
    }

    fn from_view(&self, value: &Value, _args: &[Value]) -> Result<Value> {
        let n = value
            .as_f64()
            .ok_or_else(|| ConveyError::conversion("halve expects a number"))?;
        Ok(json!(n * 2.0))
    }

    fn is_invertible(&self) -> bool {
        true
    }
}

fn passthrough_pipeline(
    registry: &Arc<ConverterRegistry>,
    name: &str,
    root: &str,
) -> Pipeline {
    PipelineBuilder::new(Expr::path([root]), Arc::clone(registry))
        .step(name, vec![])
        .unwrap()
        .build()
        .unwrap()
}

#[test]
fn test_bind_evaluates_immediately() {
    let registry = Arc::new(ConverterRegistry::new());
    let (converter, calls) = CountingConverter::new(&[]);
    registry.register("count", converter).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("a", json!(1));

    let id = engine
        .bind(passthrough_pipeline(&registry, "count", "a"), BindingMode::ToView)
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(engine.view_value(id), Some(&json!(1)));
}

#[test]
fn test_bind_fails_fast_on_unresolvable_base() {
    let registry = Arc::new(ConverterRegistry::new());
    let (converter, _calls) = CountingConverter::new(&[]);
    registry.register("count", converter).unwrap();

    // "a" is not in scope, so activation itself fails
    let mut engine = BindingEngine::new();
    let err = engine
        .bind(passthrough_pipeline(&registry, "count", "a"), BindingMode::ToView)
        .unwrap_err();
    assert!(matches!(err, ConveyError::Expr(_)));
}

#[test]
fn test_flush_recomputes_only_dirty_bindings() {
    let registry = Arc::new(ConverterRegistry::new());
    let (conv_a, calls_a) = CountingConverter::new(&[]);
    let (conv_b, calls_b) = CountingConverter::new(&[]);
    registry.register("countA", conv_a).unwrap();
    registry.register("countB", conv_b).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("a", json!(1));
    engine.set("b", json!(2));

    let id_a = engine
        .bind(passthrough_pipeline(&registry, "countA", "a"), BindingMode::ToView)
        .unwrap();
    let _id_b = engine
        .bind(passthrough_pipeline(&registry, "countB", "b"), BindingMode::ToView)
        .unwrap();

    // Nothing changed, nothing recomputes
    assert!(engine.flush().unwrap().is_empty());

    engine.set("a", json!(10));
    let updates = engine.flush().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, id_a);
    assert_eq!(updates[0].value, json!(10));

    // One call at bind time, one for the flush; b stayed at its bind call
    assert_eq!(calls_a.load(Ordering::SeqCst), 2);
    assert_eq!(calls_b.load(Ordering::SeqCst), 1);
}

#[test]
fn test_signal_recomputes_subscribed_bindings_only() {
    let registry = Arc::new(ConverterRegistry::new());
    let (listening, calls_listening) = CountingConverter::new(&["refresh"]);
    let (deaf, calls_deaf) = CountingConverter::new(&[]);
    registry.register("listening", listening).unwrap();
    registry.register("deaf", deaf).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("a", json!(1));
    engine.set("b", json!(2));

    let id = engine
        .bind(passthrough_pipeline(&registry, "listening", "a"), BindingMode::ToView)
        .unwrap();
    engine
        .bind(passthrough_pipeline(&registry, "deaf", "b"), BindingMode::ToView)
        .unwrap();

    assert_eq!(engine.raise_signal("refresh"), 1);

    let updates = engine.flush().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].id, id);

    assert_eq!(calls_listening.load(Ordering::SeqCst), 2);
    assert_eq!(calls_deaf.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unknown_signal_is_a_no_op() {
    let mut engine = BindingEngine::new();
    assert_eq!(engine.raise_signal("nobody-listens"), 0);
    assert!(engine.flush().unwrap().is_empty());
}

#[test]
fn test_coinciding_triggers_coalesce_to_one_recompute() {
    let registry = Arc::new(ConverterRegistry::new());
    let (converter, calls) = CountingConverter::new(&["tick", "tock"]);
    registry.register("count", converter).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("a", json!(1));
    let _id = engine
        .bind(passthrough_pipeline(&registry, "count", "a"), BindingMode::ToView)
        .unwrap();

    // Two signals plus a dependency change, all before one flush
    engine.raise_signal("tick");
    engine.raise_signal("tock");
    engine.set("a", json!(2));

    let updates = engine.flush().unwrap();
    assert_eq!(updates.len(), 1);

    // Exactly one recomputation for the whole batch
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    // The queue was drained; a quiet flush recomputes nothing
    assert!(engine.flush().unwrap().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_update_source_writes_back_through_chain() {
    let registry = Arc::new(ConverterRegistry::new());
    registry.register("halve", Arc::new(HalveConverter)).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("model", json!(8.0));

    let pipeline = PipelineBuilder::new(Expr::path(["model"]), Arc::clone(&registry))
        .step("halve", vec![])
        .unwrap()
        .build()
        .unwrap();
    let id = engine.bind(pipeline, BindingMode::TwoWay).unwrap();
    assert_eq!(engine.view_value(id), Some(&json!(4.0)));

    // User typed 6 in the view; the model receives 12
    let model = engine.update_source(id, &json!(6.0)).unwrap();
    assert_eq!(model, json!(12.0));
    assert_eq!(engine.scope().get("model"), Some(&json!(12.0)));

    // The write-back dirties the binding like any other scope change
    let updates = engine.flush().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].value, json!(6.0));
    assert_eq!(engine.view_value(id), Some(&json!(6.0)));
}

#[test]
fn test_update_source_rejected_for_one_way_binding() {
    let registry = Arc::new(ConverterRegistry::new());
    registry.register("halve", Arc::new(HalveConverter)).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("model", json!(8.0));

    let pipeline = PipelineBuilder::new(Expr::path(["model"]), Arc::clone(&registry))
        .step("halve", vec![])
        .unwrap()
        .build()
        .unwrap();
    let id = engine.bind(pipeline, BindingMode::ToView).unwrap();

    let err = engine.update_source(id, &json!(6.0)).unwrap_err();
    assert!(matches!(err, ConveyError::InvalidConfig(_)));
}

#[test]
fn test_update_source_surfaces_non_invertible() {
    let registry = Arc::new(ConverterRegistry::new());
    let (converter, _calls) = CountingConverter::new(&[]);
    registry.register("oneWay", converter).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("model", json!(1));

    let pipeline = passthrough_pipeline(&registry, "oneWay", "model");
    let id = engine.bind(pipeline, BindingMode::TwoWay).unwrap();

    let err = engine.update_source(id, &json!(2)).unwrap_err();
    assert!(matches!(err, ConveyError::NonInvertible(name) if name == "oneWay"));
}

#[test]
fn test_unbind_stops_updates() {
    let registry = Arc::new(ConverterRegistry::new());
    let (converter, calls) = CountingConverter::new(&["refresh"]);
    registry.register("count", converter).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("a", json!(1));
    let id = engine
        .bind(passthrough_pipeline(&registry, "count", "a"), BindingMode::ToView)
        .unwrap();

    assert!(engine.unbind(id));
    assert!(!engine.unbind(id));
    assert!(engine.is_empty());

    engine.set("a", json!(2));
    engine.raise_signal("refresh");
    assert!(engine.flush().unwrap().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_clear_drops_bindings_and_subscriptions() {
    let registry = Arc::new(ConverterRegistry::new());
    let (converter, _calls) = CountingConverter::new(&["refresh"]);
    registry.register("count", converter).unwrap();

    let mut engine = BindingEngine::new();
    engine.set("a", json!(1));
    engine
        .bind(passthrough_pipeline(&registry, "count", "a"), BindingMode::ToView)
        .unwrap();

    engine.clear();
    assert!(engine.is_empty());
    assert_eq!(engine.raise_signal("refresh"), 0);

    // Scope values survive teardown
    assert_eq!(engine.scope().get("a"), Some(&json!(1)));
}
