pub mod course;
pub mod quiz;
pub mod summary;

pub use course::{ChapterOutline, UnitOutline, generate_course_outline, generate_image_search_term};
pub use quiz::{QUESTIONS_PER_CHAPTER, QuizQuestion, generate_quiz};
pub use summary::{TRANSCRIPT_WORD_LIMIT, summarize_transcript, truncate_words};

#[cfg(test)]
pub(crate) mod testutil;
