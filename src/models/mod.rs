use serde::{Deserialize, Serialize};

use crate::error::BookError;

/// Upper bound on the number of chapters in one book.
pub const MAX_CHAPTERS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    /// Parses a form value; anything unrecognized falls back to English.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "spanish" | "español" | "espanol" => Language::Spanish,
            _ => Language::English,
        }
    }

    pub fn is_spanish(self) -> bool {
        matches!(self, Language::Spanish)
    }

    /// English name of the language, used in prompts.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
        }
    }
}

/// One generation target: the introduction, a numbered chapter, or the
/// conclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRole {
    Introduction,
    Chapter(u32),
    Conclusion,
}

impl UnitRole {
    /// Display label for the unit in the book's language.
    pub fn label(&self, language: Language) -> String {
        match (self, language) {
            (UnitRole::Introduction, Language::English) => "Introduction".to_string(),
            (UnitRole::Introduction, Language::Spanish) => "Introducción".to_string(),
            (UnitRole::Chapter(n), Language::English) => format!("Chapter {n}"),
            (UnitRole::Chapter(n), Language::Spanish) => format!("Capítulo {n}"),
            (UnitRole::Conclusion, Language::English) => "Conclusion".to_string(),
            (UnitRole::Conclusion, Language::Spanish) => "Conclusión".to_string(),
        }
    }
}

/// A unit role paired with the prompt built for it. Consumed immediately by
/// the generator, never persisted.
#[derive(Debug, Clone)]
pub struct GenerationUnit {
    pub role: UnitRole,
    pub prompt: String,
}

/// Story parameters collected from the user before generation starts.
#[derive(Debug, Clone, Deserialize)]
pub struct StoryParameters {
    pub title: String,
    pub genre: String,
    pub audience: String,
    pub chapter_count: u32,
    pub setup: Option<String>,
    pub conflict: Option<String>,
    pub resolution: Option<String>,
    pub plot: Option<String>,
    pub instructions: Option<String>,
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
    pub language: Language,
    pub include_introduction: bool,
    pub include_conclusion: bool,
}

impl StoryParameters {
    pub fn validate(&self) -> Result<(), BookError> {
        if self.title.trim().is_empty() {
            return Err(BookError::Validation("title"));
        }
        if self.genre.trim().is_empty() {
            return Err(BookError::Validation("genre"));
        }
        if self.audience.trim().is_empty() {
            return Err(BookError::Validation("audience"));
        }
        if self.chapter_count == 0 || self.chapter_count > MAX_CHAPTERS {
            return Err(BookError::Validation("chapter_count"));
        }
        Ok(())
    }

    /// Unit roles in generation order: introduction, chapters 1..N,
    /// conclusion. Generation order is also display order.
    pub fn units(&self) -> Vec<UnitRole> {
        let mut units = Vec::with_capacity(self.chapter_count as usize + 2);
        if self.include_introduction {
            units.push(UnitRole::Introduction);
        }
        for n in 1..=self.chapter_count {
            units.push(UnitRole::Chapter(n));
        }
        if self.include_conclusion {
            units.push(UnitRole::Conclusion);
        }
        units
    }
}

/// One generated unit: display label, normalized body, word count.
/// Immutable once appended to the manuscript.
#[derive(Debug, Clone, Serialize)]
pub struct ChapterResult {
    pub label: String,
    pub body: String,
    pub word_count: usize,
}

/// The ordered, accumulated set of generated units plus the metadata needed
/// to render them. Lives in the session until replaced or cleared.
#[derive(Debug, Clone, Serialize)]
pub struct BookManuscript {
    pub id: String,
    pub title: String,
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
    pub language: Language,
    pub chapters: Vec<ChapterResult>,
    pub total_word_count: usize,
}

impl BookManuscript {
    pub fn new(params: &StoryParameters) -> Self {
        BookManuscript {
            id: uuid::Uuid::new_v4().to_string(),
            title: params.title.clone(),
            author_name: params.author_name.clone(),
            author_bio: params.author_bio.clone(),
            language: params.language,
            chapters: Vec::new(),
            total_word_count: 0,
        }
    }

    pub fn push(&mut self, chapter: ChapterResult) {
        self.total_word_count += chapter.word_count;
        self.chapters.push(chapter);
    }
}
