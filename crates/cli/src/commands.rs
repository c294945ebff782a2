// Command implementations for the convey CLI
use crate::parse::parse_binding;
use convey_core::error::{ConveyError, Result};
use convey_core::{
    BindingEngine, BindingMode, ConverterRegistry, Pipeline, PipelineBuilder, Scope,
};
use convey_stock::{RateTable, register_converters};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Registry with all stock converters plus the rates supplied on the
/// command line
fn host_registry(rate_args: &[String]) -> Result<(Arc<ConverterRegistry>, RateTable)> {
    let registry = ConverterRegistry::new();
    let rates = RateTable::new();
    register_converters(&registry, &rates)?;

    for rate_arg in rate_args {
        let (code, value) = rate_arg.split_once('=').ok_or_else(|| {
            ConveyError::invalid_config(format!("expected code=value, got '{rate_arg}'"))
        })?;
        let value: f64 = value.trim().parse().map_err(|_| {
            ConveyError::invalid_config(format!("'{value}' is not a valid rate"))
        })?;
        rates.set_rate(code.trim(), value);
    }

    Ok((Arc::new(registry), rates))
}

fn load_scope(context: Option<&Path>) -> Result<Scope> {
    let Some(path) = context else {
        return Ok(Scope::new());
    };

    debug!("Loading context from {}", path.display());
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConveyError::invalid_config(format!("cannot read {}: {e}", path.display())))?;
    let object: Value = serde_json::from_str(&text)?;
    Scope::from_object(object)
}

fn build_pipeline(expression: &str, registry: Arc<ConverterRegistry>) -> Result<Pipeline> {
    let parsed = parse_binding(expression)?;
    PipelineBuilder::new(parsed.base, registry)
        .steps(parsed.steps)?
        .build()
}

/// Evaluate a binding expression and print its view value
pub fn eval_command(
    expression: &str,
    context: Option<PathBuf>,
    rate_args: &[String],
) -> Result<()> {
    let (registry, _rates) = host_registry(rate_args)?;
    let scope = load_scope(context.as_deref())?;
    let pipeline = build_pipeline(expression, registry)?;

    let mut engine = BindingEngine::with_scope(scope);
    let id = engine.bind(pipeline, BindingMode::ToView)?;
    info!("Bound '{}' as {}", expression, id);

    let value = engine
        .view_value(id)
        .ok_or_else(|| ConveyError::other("binding produced no value"))?;
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Run a view value backwards through a binding expression and print the
/// model value
pub fn invert_command(
    expression: &str,
    view_value: &str,
    context: Option<PathBuf>,
    rate_args: &[String],
) -> Result<()> {
    let (registry, _rates) = host_registry(rate_args)?;
    let scope = load_scope(context.as_deref())?;
    let pipeline = build_pipeline(expression, registry)?;

    // Accept raw text as a string value so `--value $1234.50` works unquoted
    let view_value: Value = serde_json::from_str(view_value)
        .unwrap_or_else(|_| Value::String(view_value.to_string()));

    let model = pipeline.from_view(&view_value, &scope)?;
    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

/// List registered converters with their capabilities
pub fn list_command() -> Result<()> {
    let (registry, _rates) = host_registry(&[])?;

    for name in registry.names() {
        let converter = registry.resolve(&name)?;
        let direction = if converter.is_invertible() {
            "two-way"
        } else {
            "to-view"
        };
        let signals = converter.signals();
        if signals.is_empty() {
            println!("{name:<12} {direction}");
        } else {
            println!("{name:<12} {direction}  signals: {}", signals.join(", "));
        }
    }
    Ok(())
}
