// Binding engine - live bindings, dirty tracking and the evaluation pass
use crate::error::{ConveyError, Result};
use crate::expr::Expr;
use crate::pipeline::Pipeline;
use crate::scope::Scope;
use crate::signal::SignalHub;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;

/// Handle identifying a live binding within an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(u64);

impl fmt::Display for BindingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "binding#{}", self.0)
    }
}

/// Direction(s) a binding participates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingMode {
    /// Model to view only
    ToView,
    /// Bidirectional; `update_source` is allowed
    TwoWay,
}

/// A recomputed view value produced by a flush
#[derive(Debug, Clone, PartialEq)]
pub struct BindingUpdate {
    pub id: BindingId,
    pub value: Value,
}

/// A pipeline attached to the engine for its lifetime
struct Binding {
    pipeline: Pipeline,
    mode: BindingMode,
    deps: Vec<String>,
    seen_versions: HashMap<String, u64>,
    view_value: Value,
}

impl Binding {
    fn snapshot_deps(&mut self, scope: &Scope) {
        for dep in &self.deps {
            self.seen_versions.insert(dep.clone(), scope.version(dep));
        }
    }

    fn deps_dirty(&self, scope: &Scope) -> bool {
        self.deps
            .iter()
            .any(|dep| scope.version(dep) != self.seen_versions.get(dep).copied().unwrap_or(0))
    }
}

/// Single-threaded host runtime for live bindings.
///
/// The engine owns the observation scope, the live bindings and the signal
/// hub. Scope writes and raised signals only mark state; recomputation is
/// deferred to `flush`, the cooperative evaluation pass, which recomputes
/// each affected binding at most once no matter how many triggers coincided.
pub struct BindingEngine {
    scope: Scope,
    bindings: IndexMap<BindingId, Binding>,
    signals: SignalHub,
    next_id: u64,
}

impl BindingEngine {
    /// Create an engine with an empty scope
    pub fn new() -> Self {
        Self::with_scope(Scope::new())
    }

    /// Create an engine over an existing scope
    pub fn with_scope(scope: Scope) -> Self {
        Self {
            scope,
            bindings: IndexMap::new(),
            signals: SignalHub::new(),
            next_id: 0,
        }
    }

    /// The engine's observation scope
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Activate a pipeline as a live binding.
    ///
    /// Performs the initial `to_view` evaluation and subscribes the binding
    /// to its converters' signal tokens, so a misconfigured pipeline fails
    /// here rather than on a later pass.
    pub fn bind(&mut self, pipeline: Pipeline, mode: BindingMode) -> Result<BindingId> {
        let signal_keys = pipeline.signal_keys()?;
        let view_value = pipeline.to_view(&self.scope)?;

        let id = BindingId(self.next_id);
        self.next_id += 1;

        let mut binding = Binding {
            deps: pipeline.dependencies(),
            pipeline,
            mode,
            seen_versions: HashMap::new(),
            view_value,
        };
        binding.snapshot_deps(&self.scope);

        for key in &signal_keys {
            self.signals.subscribe(key.clone(), id);
        }

        debug!(
            "Bound {} ({} deps, {} signal keys)",
            id,
            binding.deps.len(),
            signal_keys.len()
        );
        self.bindings.insert(id, binding);
        Ok(id)
    }

    /// Deactivate a binding, dropping its pipeline and signal subscriptions
    pub fn unbind(&mut self, id: BindingId) -> bool {
        self.signals.unsubscribe(id);
        self.bindings.shift_remove(&id).is_some()
    }

    /// Write a scope root, bumping its version
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.scope.set(key, value);
    }

    /// Raise a signal token. Fire-and-forget: affected bindings are queued
    /// for the next flush, nothing is recomputed here.
    pub fn raise_signal(&mut self, token: &str) -> usize {
        self.signals.raise(token)
    }

    /// Run one evaluation pass.
    ///
    /// Recomputes every binding whose observed roots changed since its last
    /// evaluation or that a raised signal marked pending - at most once per
    /// binding per flush. Returns the updated view values in binding order.
    /// A converter failure aborts the pass and propagates.
    pub fn flush(&mut self) -> Result<Vec<BindingUpdate>> {
        let pending = self.signals.take_pending();
        let mut updates = Vec::new();

        for (id, binding) in &mut self.bindings {
            let dirty = pending.contains(id) || binding.deps_dirty(&self.scope);
            if !dirty {
                continue;
            }

            let value = binding.pipeline.to_view(&self.scope)?;
            binding.snapshot_deps(&self.scope);
            binding.view_value = value.clone();
            updates.push(BindingUpdate { id: *id, value });
        }

        debug!("Flush recomputed {} of {} bindings", updates.len(), self.bindings.len());
        Ok(updates)
    }

    /// Push a view-side value back through a two-way binding.
    ///
    /// Runs the chain's `from_view` direction, assigns the result to the
    /// base expression's target path in the scope and returns it. The write
    /// bumps the target's version, so the binding refreshes on the next
    /// flush like any other scope change.
    pub fn update_source(&mut self, id: BindingId, view_value: &Value) -> Result<Value> {
        let binding = self
            .bindings
            .get(&id)
            .ok_or_else(|| ConveyError::invalid_config(format!("no live {id}")))?;

        if binding.mode != BindingMode::TwoWay {
            return Err(ConveyError::invalid_config(format!(
                "{id} is not two-way"
            )));
        }

        let model_value = binding.pipeline.from_view(view_value, &self.scope)?;

        let Expr::Path(segments) = binding.pipeline.base().clone() else {
            return Err(ConveyError::invalid_config(
                "base expression is not an assignable path",
            ));
        };
        self.scope.set_path(&segments, model_value.clone())?;

        Ok(model_value)
    }

    /// Most recent view value of a binding
    pub fn view_value(&self, id: BindingId) -> Option<&Value> {
        self.bindings.get(&id).map(|b| &b.view_value)
    }

    /// Number of live bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the engine has no live bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Drop all bindings and signal subscriptions. Scope values survive.
    ///
    /// Call at host shutdown or test teardown so signal state cannot leak
    /// across lifetimes.
    pub fn clear(&mut self) {
        self.bindings.clear();
        self.signals.clear();
    }
}

impl Default for BindingEngine {
    fn default() -> Self {
        Self::new()
    }
}
