//! Embedding and AI model access.
//!
//! `EMBED` and `AI` do not talk to a model themselves; they go through a
//! [`ModelHost`]. The default host answers with fixed placeholder results
//! and announces each request on the program's output.

use rustc_hash::FxHashMap;

use crate::print_handler::PrintHandler;
use crate::{EvalResult, Value};

/// Backend for `EMBED text WITH model` and `AI model(args...)`.
pub trait ModelHost {
    /// Vector representation of `text`.
    fn embed(&self, text: &str, model: &str, out: &PrintHandler) -> EvalResult<Vec<f64>>;

    /// Response of `model` to `args`.
    fn call(&self, model: &str, args: &[Value], out: &PrintHandler) -> EvalResult;
}

/// Handler answering AI calls for one model name.
pub type ModelHandler = Box<dyn Fn(&[Value]) -> EvalResult>;

/// Model host without any real model behind it.
#[derive(Default)]
pub struct PlaceholderModels {
    handlers: FxHashMap<String, ModelHandler>,
}

/// Vector returned for every text by [`PlaceholderModels`].
pub const PLACEHOLDER_EMBEDDING: [f64; 10] = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];

impl PlaceholderModels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer AI calls to `model` with `handler` instead of the placeholder.
    #[must_use]
    pub fn with_handler(
        mut self,
        model: impl Into<String>,
        handler: impl Fn(&[Value]) -> EvalResult + 'static,
    ) -> Self {
        self.handlers.insert(model.into(), Box::new(handler));
        self
    }
}

impl ModelHost for PlaceholderModels {
    fn embed(&self, _text: &str, model: &str, out: &PrintHandler) -> EvalResult<Vec<f64>> {
        out.println(&format!("Embedding text with model: {model}"));
        Ok(PLACEHOLDER_EMBEDDING.to_vec())
    }

    fn call(&self, model: &str, args: &[Value], out: &PrintHandler) -> EvalResult {
        if let Some(handler) = self.handlers.get(model) {
            return handler(args);
        }
        out.println(&format!("Calling AI model: {model}"));
        Ok(Value::text("AI model response"))
    }
}
