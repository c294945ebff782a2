// Pipeline core - ordered converter chain over a base expression
use crate::convert::ConverterRegistry;
use crate::error::{ConveyError, Result};
use crate::expr::Expr;
use crate::scope::Scope;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// One step of a pipeline: a converter reference plus its argument sources.
///
/// Steps keep the converter's registered name rather than the resolved
/// instance: the name is validated eagerly when the pipeline is built, but
/// re-resolved at every evaluation, so a replacement registration becomes
/// visible to live pipelines and a pipeline never owns a registration.
#[derive(Debug, Clone)]
pub struct PipelineStep {
    name: String,
    args: Vec<Expr>,
}

impl PipelineStep {
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Registered converter name this step references
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argument sources, in declared order
    pub fn args(&self) -> &[Expr] {
        &self.args
    }

    fn eval_args(&self, scope: &Scope) -> Result<Vec<Value>> {
        self.args.iter().map(|arg| arg.eval(scope)).collect()
    }
}

/// An ordered converter chain applied to a base expression.
///
/// `to_view` folds the base value through the steps left to right;
/// `from_view` walks them right to left. Every evaluation recomputes the
/// whole chain; intermediate values are not cached.
pub struct Pipeline {
    base: Expr,
    steps: Vec<PipelineStep>,
    registry: Arc<ConverterRegistry>,
}

impl Pipeline {
    pub(crate) fn new(base: Expr, steps: Vec<PipelineStep>, registry: Arc<ConverterRegistry>) -> Self {
        Self {
            base,
            steps,
            registry,
        }
    }

    /// The base expression producing the pre-conversion value
    pub fn base(&self) -> &Expr {
        &self.base
    }

    /// Steps in application order
    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    /// Evaluate the chain in the model-to-view direction.
    ///
    /// Converter failures propagate unchanged; a failing converter fails the
    /// whole evaluation for this cycle.
    pub fn to_view(&self, scope: &Scope) -> Result<Value> {
        let mut value = self.base.eval(scope)?;

        for step in &self.steps {
            let converter = self.registry.resolve(&step.name)?;
            let args = step.eval_args(scope)?;
            trace!("Applying converter '{}' ({} args)", step.name, args.len());
            value = converter.to_view(&value, &args)?;
        }

        Ok(value)
    }

    /// Evaluate the chain in the view-to-model direction.
    ///
    /// Steps are applied in reverse order. A step whose converter is not
    /// invertible fails with `NonInvertible` at this call, not before.
    /// Argument values are the current ones, the same values `to_view` would
    /// see; arguments are not separately inverted.
    pub fn from_view(&self, view_value: &Value, scope: &Scope) -> Result<Value> {
        let mut value = view_value.clone();

        for step in self.steps.iter().rev() {
            let converter = self.registry.resolve(&step.name)?;
            if !converter.is_invertible() {
                return Err(ConveyError::non_invertible(step.name.clone()));
            }
            let args = step.eval_args(scope)?;
            trace!("Inverting converter '{}' ({} args)", step.name, args.len());
            value = converter.from_view(&value, &args)?;
        }

        Ok(value)
    }

    /// Union of the steps' converters' signal tokens, in step order
    pub fn signal_keys(&self) -> Result<Vec<String>> {
        let mut keys: Vec<String> = Vec::new();

        for step in &self.steps {
            let converter = self.registry.resolve(&step.name)?;
            for key in converter.signals() {
                if !keys.iter().any(|k| k == key) {
                    keys.push((*key).to_string());
                }
            }
        }

        Ok(keys)
    }

    /// Scope roots observed by the base expression and all step arguments
    pub fn dependencies(&self) -> Vec<String> {
        let mut roots: Vec<String> = Vec::new();

        let mut push = |root: Option<&str>| {
            if let Some(root) = root {
                if !roots.iter().any(|r| r == root) {
                    roots.push(root.to_string());
                }
            }
        };

        push(self.base.root());
        for step in &self.steps {
            for arg in &step.args {
                push(arg.root());
            }
        }

        roots
    }
}
