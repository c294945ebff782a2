// Pipeline builder - fail-fast construction from parsed binding expressions
use super::core::{Pipeline, PipelineStep};
use crate::convert::ConverterRegistry;
use crate::error::{ConveyError, Result};
use crate::expr::Expr;
use std::sync::Arc;

/// Builder for constructing pipelines against a converter registry.
///
/// Step names are checked when added so that a misconfigured binding fails
/// at construction time, not at first evaluation.
#[derive(Debug)]
pub struct PipelineBuilder {
    base: Expr,
    registry: Arc<ConverterRegistry>,
    steps: Vec<PipelineStep>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder over a base expression
    pub fn new(base: Expr, registry: Arc<ConverterRegistry>) -> Self {
        Self {
            base,
            registry,
            steps: Vec::new(),
        }
    }

    /// Add a step by converter name
    pub fn step(mut self, name: impl Into<String>, args: Vec<Expr>) -> Result<Self> {
        let name = name.into();
        if !self.registry.contains(&name) {
            return Err(ConveyError::unknown_converter(name));
        }
        self.steps.push(PipelineStep::new(name, args));
        Ok(self)
    }

    /// Add multiple steps from a parsed `(name, args)` list
    pub fn steps<I, S>(mut self, steps: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<Expr>)>,
        S: Into<String>,
    {
        for (name, args) in steps {
            self = self.step(name, args)?;
        }
        Ok(self)
    }

    /// Build the pipeline.
    ///
    /// Every step name is resolved once more so that a registration removed
    /// between `step` and `build` is still caught here rather than at
    /// evaluation time.
    pub fn build(self) -> Result<Pipeline> {
        for step in &self.steps {
            self.registry.resolve(step.name())?;
        }

        Ok(Pipeline::new(self.base, self.steps, self.registry))
    }
}
