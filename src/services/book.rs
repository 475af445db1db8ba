//! Drives unit generation across a whole book.

use crate::error::BookError;
use crate::models::{BookManuscript, ChapterResult, GenerationUnit, Language, StoryParameters};
use crate::services::generator::generate_unit;
use crate::services::llm::ContentGenerator;
use crate::services::prompt::build_prompt;
use crate::utils::count_words;

/// Generates every unit of the book in manuscript order and accumulates the
/// results.
///
/// Units are generated strictly one at a time. A failed unit is recorded with
/// a placeholder body and the run continues; one bad chapter never aborts the
/// book. After each unit the progress callback receives
/// `(completed, total)`.
pub async fn assemble(
    generator: &dyn ContentGenerator,
    params: &StoryParameters,
    min_words: usize,
    mut on_progress: impl FnMut(usize, usize),
) -> BookManuscript {
    let roles = params.units();
    let total = roles.len();
    let mut manuscript = BookManuscript::new(params);

    for (index, role) in roles.into_iter().enumerate() {
        let unit = GenerationUnit {
            prompt: build_prompt(params, &role, min_words),
            role,
        };

        let chapter = match generate_unit(generator, &unit, params.language, min_words).await {
            Ok(chapter) => chapter,
            Err(err) => {
                tracing::warn!(unit = %unit.role.label(params.language), error = %err, "unit generation failed");
                placeholder(&unit, params.language, &err)
            }
        };

        manuscript.push(chapter);
        on_progress(index + 1, total);
    }

    manuscript
}

/// Visible stand-in body for a unit whose generation failed. Its words count
/// toward the totals like any other unit's.
fn placeholder(unit: &GenerationUnit, language: Language, err: &BookError) -> ChapterResult {
    let body = format!("[generation failed: {err}]");
    let word_count = count_words(&body);
    ChapterResult {
        label: unit.role.label(language),
        body,
        word_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use async_trait::async_trait;

    struct FixedGenerator(String);

    #[async_trait]
    impl ContentGenerator for FixedGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl ContentGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 500,
                message: "backend down".to_string(),
            })
        }
    }

    fn params() -> StoryParameters {
        StoryParameters {
            title: "Nova".to_string(),
            genre: "Sci-Fi".to_string(),
            audience: "Adults".to_string(),
            chapter_count: 3,
            setup: None,
            conflict: None,
            resolution: None,
            plot: Some("a long voyage".to_string()),
            instructions: None,
            author_name: None,
            author_bio: None,
            language: Language::English,
            include_introduction: true,
            include_conclusion: true,
        }
    }

    #[tokio::test]
    async fn units_arrive_in_manuscript_order() {
        let stub = FixedGenerator("some chapter text".to_string());
        let manuscript = assemble(&stub, &params(), 0, |_, _| {}).await;

        let labels: Vec<&str> = manuscript
            .chapters
            .iter()
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec![
                "Introduction",
                "Chapter 1",
                "Chapter 2",
                "Chapter 3",
                "Conclusion"
            ]
        );
    }

    #[tokio::test]
    async fn progress_is_monotonic_and_complete() {
        let stub = FixedGenerator("text".to_string());
        let mut reports: Vec<(usize, usize)> = Vec::new();
        let manuscript = assemble(&stub, &params(), 0, |done, total| {
            reports.push((done, total));
        })
        .await;

        assert_eq!(reports.len(), manuscript.chapters.len());
        for pair in reports.windows(2) {
            assert!(pair[0].0 < pair[1].0);
        }
        let (last_done, last_total) = *reports.last().unwrap();
        assert_eq!(last_done, last_total);
        assert_eq!(last_total, 5);
    }

    #[tokio::test]
    async fn totals_are_the_sum_of_unit_counts() {
        let stub = FixedGenerator("five words of chapter text".to_string());
        let manuscript = assemble(&stub, &params(), 0, |_, _| {}).await;

        let sum: usize = manuscript.chapters.iter().map(|c| c.word_count).sum();
        assert_eq!(sum, manuscript.total_word_count);
        assert_eq!(manuscript.total_word_count, 25);
    }

    #[tokio::test]
    async fn failed_units_become_placeholders_and_the_run_continues() {
        let manuscript = assemble(&FailingGenerator, &params(), 0, |_, _| {}).await;

        assert_eq!(manuscript.chapters.len(), 5);
        for chapter in &manuscript.chapters {
            assert!(chapter.body.starts_with("[generation failed:"));
            assert!(chapter.body.contains("backend down"));
        }
        let sum: usize = manuscript.chapters.iter().map(|c| c.word_count).sum();
        assert_eq!(sum, manuscript.total_word_count);
    }
}
