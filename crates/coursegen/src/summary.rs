use extract::{CompletionModel, Extractor, OutputShape};

/// Transcripts are capped at this many words before summarization to keep
/// the prompt inside the model's context window.
pub const TRANSCRIPT_WORD_LIMIT: usize = 600;

/// Cap a text at `limit` space-separated words.
pub fn truncate_words(text: &str, limit: usize) -> String {
    text.split(' ').take(limit).collect::<Vec<_>>().join(" ")
}

/// Summarize a chapter transcript in 250 words or less. Returns None when
/// extraction failed or the reply carried no summary field.
pub async fn summarize_transcript<C: CompletionModel>(
    extractor: &Extractor<C>,
    transcript: &str,
) -> Option<String> {
    let transcript = truncate_words(transcript, TRANSCRIPT_WORD_LIMIT);

    let shape = OutputShape::new().field("summary", "summary of the transcript");

    let value = extractor
        .extract(
            "You are an AI specialized in summarizing educational content",
            format!(
                "Produce a concise summary focusing exclusively on the key educational points discussed \
                 in the transcript. The summary should be 250 words or less. Exclude any mention of \
                 sponsors, advertisements, or any content not directly related to the main educational \
                 topic. Do not preface the summary with an introduction about what it is about; begin \
                 directly with the substantive content.\n Also make sure the generated output is in \
                 valid JSON format{transcript}"
            ),
            &shape,
            false,
        )
        .await
        .into_single()?;

    value
        .get("summary")
        .and_then(|summary| summary.as_str())
        .map(|summary| summary.to_string())
}
