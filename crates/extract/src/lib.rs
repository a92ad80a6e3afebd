pub mod llm;
pub mod repair;
pub mod shape;

pub use llm::{ChatClient, CompletionModel};
pub use repair::repair_quotes;
pub use shape::{OutputShape, ShapeField};

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};

/// Tuning parameters for an extraction call.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub model: String,
    pub temperature: f32,
    /// Request/parse cycles allowed per individual prompt before giving up.
    pub max_attempts: usize,
    /// Log composed system messages, user prompts and raw replies.
    pub verbose: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 1.0,
            max_attempts: 3,
            verbose: false,
        }
    }
}

/// One instruction, or an ordered batch of instructions processed
/// independently of each other.
#[derive(Debug, Clone)]
pub enum PromptInput {
    Single(String),
    Batch(Vec<String>),
}

impl From<&str> for PromptInput {
    fn from(prompt: &str) -> Self {
        PromptInput::Single(prompt.to_string())
    }
}

impl From<String> for PromptInput {
    fn from(prompt: String) -> Self {
        PromptInput::Single(prompt)
    }
}

impl From<Vec<String>> for PromptInput {
    fn from(prompts: Vec<String>) -> Self {
        PromptInput::Batch(prompts)
    }
}

/// Result of an extraction call, shaped like its input: a single prompt in
/// yields a single value out, a batch in yields one value per prompt,
/// positionally aligned.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Single(Value),
    Batch(Vec<Value>),
}

impl Extraction {
    pub fn into_single(self) -> Option<Value> {
        match self {
            Extraction::Single(value) => Some(value),
            Extraction::Batch(_) => None,
        }
    }

    pub fn into_batch(self) -> Option<Vec<Value>> {
        match self {
            Extraction::Single(_) => None,
            Extraction::Batch(values) => Some(values),
        }
    }
}

/// True for the in-band sentinel marking a prompt whose extraction
/// permanently failed: an empty array. Callers must filter these out.
pub fn is_failure(value: &Value) -> bool {
    value.as_array().is_some_and(|a| a.is_empty())
}

/// Issues generation requests constrained to a caller-supplied JSON shape,
/// repairs minor formatting deviations in the reply, and retries on parse
/// failure with the previous error fed back into the system message.
pub struct Extractor<C = ChatClient> {
    model: C,
    options: ExtractOptions,
}

impl Extractor<ChatClient> {
    pub fn new(client: ChatClient) -> Self {
        Self::with_model(client, ExtractOptions::default())
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ChatClient::from_env()?))
    }
}

impl<C: CompletionModel> Extractor<C> {
    pub fn with_model(model: C, options: ExtractOptions) -> Self {
        Self { model, options }
    }

    /// Extract one parsed JSON value per user prompt.
    ///
    /// Each prompt gets its own retry budget; a prompt that exhausts it ends
    /// up as the empty-array failure sentinel instead of aborting its
    /// siblings. Transport failures count against the same budget as parse
    /// failures, so this call itself never errors.
    pub async fn extract(
        &self,
        system_prompt: &str,
        user_prompt: impl Into<PromptInput>,
        output_format: &OutputShape,
        is_list: bool,
    ) -> Extraction {
        let (mut prompts, batch_input) = match user_prompt.into() {
            PromptInput::Single(prompt) => (vec![prompt], false),
            PromptInput::Batch(prompts) => (prompts, true),
        };

        let format_instructions = output_format.format_instructions();
        let wrap_bare_object = is_list && output_format.expects_list();

        let mut outputs = Vec::with_capacity(prompts.len());
        for prompt in prompts.drain(..) {
            outputs.push(
                self.extract_prompt(system_prompt, &format_instructions, &prompt, wrap_bare_object)
                    .await,
            );
        }

        if batch_input {
            Extraction::Batch(outputs)
        } else {
            Extraction::Single(outputs.pop().unwrap_or_else(|| Value::Array(Vec::new())))
        }
    }

    async fn extract_prompt(
        &self,
        system_prompt: &str,
        format_instructions: &str,
        prompt: &str,
        wrap_bare_object: bool,
    ) -> Value {
        let mut error_context = String::new();

        for attempt in 1..=self.options.max_attempts {
            let system = format!("{system_prompt}{format_instructions}{error_context}");

            if self.options.verbose {
                info!(attempt, system_message = %system, user_prompt = %prompt, "Sending extraction request");
            }

            let reply = match self
                .model
                .complete(&self.options.model, self.options.temperature, &system, prompt)
                .await
            {
                Ok(reply) => repair_quotes(&reply),
                Err(e) => {
                    // Transport failures share the parse-retry budget
                    warn!(
                        attempt,
                        max_attempts = self.options.max_attempts,
                        error = %e,
                        "Completion request failed"
                    );
                    error_context = format!("\n\nAttempt {attempt} failed with error: {e}");
                    continue;
                }
            };

            if self.options.verbose {
                info!(attempt, reply = %reply, "Received reply");
            }

            match serde_json::from_str::<Value>(&reply) {
                Ok(value) => {
                    if wrap_bare_object && !value.is_array() {
                        return Value::Array(vec![value]);
                    }
                    return value;
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.options.max_attempts,
                        error = %e,
                        "Failed to parse reply as JSON"
                    );
                    error_context =
                        format!("\n\nAttempt {attempt} failed with error: {e}\nResponse: {reply}");
                }
            }
        }

        warn!(user_prompt = %prompt, "All extraction attempts failed");
        Value::Array(Vec::new())
    }
}
