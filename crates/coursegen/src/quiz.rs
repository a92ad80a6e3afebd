use extract::{CompletionModel, Extractor, OutputShape, is_failure};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Questions requested per chapter.
pub const QUESTIONS_PER_CHAPTER: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub answer: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
}

impl QuizQuestion {
    /// The correct answer and the three distractors, in random order.
    pub fn shuffled_options(&self) -> Vec<String> {
        let mut options = vec![
            self.answer.clone(),
            self.option1.clone(),
            self.option2.clone(),
            self.option3.clone(),
        ];
        options.shuffle(&mut rand::thread_rng());
        options
    }
}

/// Generate multiple-choice questions from a chapter transcript. Each
/// question is an independent prompt; slots that failed extraction or came
/// back without all four answers are dropped.
pub async fn generate_quiz<C: CompletionModel>(
    extractor: &Extractor<C>,
    course_title: &str,
    transcript: &str,
) -> Vec<QuizQuestion> {
    let prompt = format!(
        "Generate a medium to hard multiple-choice question focused on the key concepts, facts, or \
         insights from the provided transcript related to '{course_title}'. Each question should be \
         unique, thought-provoking, and designed to assess a deep understanding of the material. \
         Include four answer options, ensuring one correct answer and three plausible distractors to \
         challenge the learner's comprehension. Keep each answer concise, under 25 words, and relevant \
         to the content discussed in the following transcript: {transcript}. The output must be in \
         valid JSON format."
    );
    let prompts = vec![prompt; QUESTIONS_PER_CHAPTER];

    let shape = OutputShape::new()
        .field("question", "question")
        .field("answer", "answer with max length of 25 words")
        .field("option1", "option1 with max length of 25 words")
        .field("option2", "option2 with max length of 25 words")
        .field("option3", "option3 with max length of 25 words");

    let values = extractor
        .extract(
            "As an advanced AI, your primary task is to craft educational multiple-choice questions \
             (MCQs) based on specific content. Each question you generate should be designed to test \
             understanding and retention of the material. For every question, provide four answer \
             choices (A, B, C, and D), ensuring that each answer is succinct and does not exceed 25 \
             words. Your goal is to create questions that are insightful, challenging, directly \
             relevant and reflect the diversity/breadth of the content provided.",
            prompts,
            &shape,
            true,
        )
        .await
        .into_batch()
        .unwrap_or_default();

    values
        .into_iter()
        .filter_map(|value| {
            if is_failure(&value) {
                warn!("Question extraction failed, dropping slot");
                return None;
            }
            match serde_json::from_value::<QuizQuestion>(value) {
                Ok(question) => Some(question),
                Err(e) => {
                    warn!(error = %e, "Question reply did not match the expected shape");
                    None
                }
            }
        })
        .collect()
}
