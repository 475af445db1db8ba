use crate::error::BookError;
use crate::models::{ChapterResult, GenerationUnit, Language};
use crate::services::llm::ContentGenerator;
use crate::services::normalizer::normalize;
use crate::utils::count_words;

/// Upper bound on capability calls for one unit under the minimum-word-count
/// policy.
pub const MAX_ATTEMPTS: u32 = 10;

/// Generates one unit, looping under the minimum-word-count policy.
///
/// With `min_words == 0` a single capability call is made. Otherwise the same
/// prompt is re-sent and the raw responses are concatenated (single space
/// between them) until the normalized text reaches the threshold, up to
/// [`MAX_ATTEMPTS`] calls.
pub async fn generate_unit(
    generator: &dyn ContentGenerator,
    unit: &GenerationUnit,
    language: Language,
    min_words: usize,
) -> Result<ChapterResult, BookError> {
    let label = unit.role.label(language);
    let mut raw = String::new();
    let mut attempts = 0u32;

    loop {
        if attempts >= MAX_ATTEMPTS {
            return Err(BookError::RetryExhausted {
                unit: label,
                attempts,
            });
        }

        let chunk = generator
            .generate(&unit.prompt)
            .await
            .map_err(|source| BookError::Generation {
                unit: label.clone(),
                source,
            })?;

        if !raw.is_empty() {
            raw.push(' ');
        }
        raw.push_str(&chunk);
        attempts += 1;

        let body = normalize(&raw, language);
        let word_count = count_words(&body);
        if min_words == 0 || word_count >= min_words {
            return Ok(ChapterResult {
                label,
                body,
                word_count,
            });
        }

        tracing::debug!(unit = %label, word_count, min_words, "below minimum length, requesting more text");
    }
}
