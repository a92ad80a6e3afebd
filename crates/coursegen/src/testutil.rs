use anyhow::Result;
use extract::{CompletionModel, ExtractOptions, Extractor};
use std::sync::Mutex;

/// Completion model that replays a fixed script of replies.
pub struct ScriptedModel {
    replies: Mutex<Vec<String>>,
}

impl CompletionModel for ScriptedModel {
    async fn complete(
        &self,
        _model: &str,
        _temperature: f32,
        _system: &str,
        _user: &str,
    ) -> Result<String> {
        Ok(self.replies.lock().unwrap().remove(0))
    }
}

pub fn scripted(replies: &[&str]) -> Extractor<ScriptedModel> {
    let model = ScriptedModel {
        replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
    };
    Extractor::with_model(model, ExtractOptions::default())
}
