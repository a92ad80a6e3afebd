use extract::{CompletionModel, Extractor, OutputShape, is_failure};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterOutline {
    pub chapter_title: String,
    pub youtube_search_query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitOutline {
    pub title: String,
    pub chapters: Vec<ChapterOutline>,
}

/// Outline one unit per requested unit name: chapter titles plus a YouTube
/// search query per chapter. Units whose extraction failed or came back in
/// the wrong shape are dropped with a warning, so the result may be shorter
/// than the input.
pub async fn generate_course_outline<C: CompletionModel>(
    extractor: &Extractor<C>,
    course_title: &str,
    units: &[String],
) -> Vec<UnitOutline> {
    let prompts: Vec<String> = units
        .iter()
        .map(|unit| {
            format!(
                "It is your job to create a course about {course_title}, specifically for unit of {unit}. \
                 The user has requested to create chapters for each of the units. Then, for each chapter, \
                 provide a detailed youtube search query that can be used to find an informative educational \
                 video for each chapter. Each query should give an educational informative course on YouTube. \
                 The generated response must be in valid JSON format. The output for each unit should look like this:"
            )
        })
        .collect();

    let shape = OutputShape::new()
        .field("title", "title of the unit")
        .field(
            "chapters",
            "an array of chapters, each chapter should have a youtube_search_query and a chapter_title key in the JSON object",
        );

    let values = extractor
        .extract(
            "You are an AI capable of curating course content, coming up with relevant chapter titles, and finding relevant youtube videos for each chapter",
            prompts,
            &shape,
            true,
        )
        .await
        .into_batch()
        .unwrap_or_default();

    values
        .into_iter()
        .zip(units)
        .filter_map(|(value, unit)| {
            if is_failure(&value) {
                warn!(unit = %unit, "Outline extraction failed, dropping unit");
                return None;
            }
            match serde_json::from_value::<UnitOutline>(value) {
                Ok(outline) => Some(outline),
                Err(e) => {
                    warn!(unit = %unit, error = %e, "Outline reply did not match the expected shape");
                    None
                }
            }
        })
        .collect()
}

/// Come up with an image search term for the course as a whole, suitable for
/// feeding into a stock-photo search API.
pub async fn generate_image_search_term<C: CompletionModel>(
    extractor: &Extractor<C>,
    course_title: &str,
) -> Option<String> {
    let shape = OutputShape::new().field(
        "image_search_term",
        "a good search term for the title of the course",
    );

    let value = extractor
        .extract(
            "you are an AI capable of finding the most relevant image for a course",
            format!(
                "Please provide a good image search term for the title of a course about {course_title}. \
                 This search term will be fed into the unsplash API, so make sure it is a good search term \
                 that will return good results. Ensure the output is in valid JSON format."
            ),
            &shape,
            false,
        )
        .await
        .into_single()?;

    value
        .get("image_search_term")
        .and_then(|term| term.as_str())
        .map(|term| term.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::scripted;

    #[tokio::test]
    async fn test_outline_parses_one_unit_per_prompt() {
        let extractor = scripted(&[
            r#"{"title": "Ownership", "chapters": [{"chapter_title": "Borrowing", "youtube_search_query": "rust borrowing tutorial"}]}"#,
            r#"{"title": "Traits", "chapters": [{"chapter_title": "Trait objects", "youtube_search_query": "rust trait objects"}]}"#,
        ]);

        let units = vec!["Ownership".to_string(), "Traits".to_string()];
        let outline = generate_course_outline(&extractor, "Rust", &units).await;

        assert_eq!(outline.len(), 2);
        assert_eq!(outline[0].title, "Ownership");
        assert_eq!(outline[1].chapters[0].chapter_title, "Trait objects");
    }

    #[tokio::test]
    async fn test_outline_drops_failed_units() {
        // Second unit burns all three attempts and becomes the sentinel
        let extractor = scripted(&[
            r#"{"title": "Ownership", "chapters": []}"#,
            "not json",
            "not json",
            "not json",
        ]);

        let units = vec!["Ownership".to_string(), "Traits".to_string()];
        let outline = generate_course_outline(&extractor, "Rust", &units).await;

        assert_eq!(outline.len(), 1);
        assert_eq!(outline[0].title, "Ownership");
    }

    #[tokio::test]
    async fn test_image_search_term() {
        let extractor = scripted(&[r#"{"image_search_term": "rust programming"}"#]);

        let term = generate_image_search_term(&extractor, "Rust").await;
        assert_eq!(term.as_deref(), Some("rust programming"));
    }

    #[tokio::test]
    async fn test_image_search_term_missing_on_failure() {
        let extractor = scripted(&["not json", "not json", "not json"]);

        let term = generate_image_search_term(&extractor, "Rust").await;
        assert_eq!(term, None);
    }
}
