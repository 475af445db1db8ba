//! Cleans generated text before it enters the manuscript.
//!
//! The passes run in a fixed order: markup stripping, dialogue dashes,
//! Spanish quote typography, whitespace trimming. The function is pure and
//! idempotent; the same input and language always produce the same bytes.

use regex::Regex;

use crate::models::Language;

const EM_DASH: char = '—';

pub fn normalize(text: &str, language: Language) -> String {
    let text = strip_markup(text);
    let text = dash_list_lines(&text);
    let text = if language.is_spanish() {
        replace_double_quotes(&text)
    } else {
        text
    };
    trim_lines(&text)
}

/// Deletes markdown-style emphasis characters: `#`, `*`, `_`, backtick.
fn strip_markup(text: &str) -> String {
    match Regex::new(r"[#*_`]+") {
        Ok(re) => re.replace_all(text, "").into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Turns hyphen-led lines (lists, dialogue) into em-dash lines and closes
/// each run of them with a single blank line.
fn dash_list_lines(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_list = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('-') {
            out.push(format!("{EM_DASH}{rest}"));
            in_list = true;
        } else {
            if in_list && !trimmed.trim_end().is_empty() {
                out.push(String::new());
            }
            in_list = false;
            out.push(line.to_string());
        }
    }

    out.join("\n")
}

/// Spanish dialogue uses long dashes, not quotation marks.
fn replace_double_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '"' | '\u{201C}' | '\u{201D}' | '\u{201E}' => EM_DASH,
            c => c,
        })
        .collect()
}

fn trim_lines(text: &str) -> String {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markup_characters() {
        let text = "# Heading\nSome *bold* and _italic_ and `code` text.";
        let clean = normalize(text, Language::English);
        for c in ['#', '*', '_', '`'] {
            assert!(!clean.contains(c), "found {c:?} in {clean:?}");
        }
        assert!(clean.contains("Some bold and italic and code text."));
    }

    #[test]
    fn hyphen_lines_become_dash_lines_closed_by_a_blank() {
        let text = "- he said\n- she answered\nThe night went on.";
        let clean = normalize(text, Language::English);
        assert_eq!(clean, "— he said\n— she answered\n\nThe night went on.");
    }

    #[test]
    fn existing_blank_after_a_list_is_not_doubled() {
        let text = "- he said\n\nThe night went on.";
        let clean = normalize(text, Language::English);
        assert_eq!(clean, "— he said\n\nThe night went on.");
    }

    #[test]
    fn spanish_text_loses_all_double_quotes() {
        let text = "Dijo \u{201C}hola\u{201D} y luego \"adiós\".";
        let clean = normalize(text, Language::Spanish);
        assert!(!clean.contains('"'));
        assert!(!clean.contains('\u{201C}'));
        assert!(!clean.contains('\u{201D}'));
        assert!(clean.contains('—'));
    }

    #[test]
    fn english_text_keeps_double_quotes() {
        let text = "He said \"hello\".";
        assert_eq!(normalize(text, Language::English), text);
    }

    #[test]
    fn trims_lines_and_ends() {
        let text = "  First line.  \n\n   Second line.\t\n";
        assert_eq!(
            normalize(text, Language::English),
            "First line.\n\nSecond line."
        );
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "# Title\n- he said\n- she said\nAnd then.\n",
            "Dijo \"hola\" a todos.\n\n- rayas\ntexto",
            "  plain text with *stars*  ",
        ];
        for sample in samples {
            for language in [Language::English, Language::Spanish] {
                let once = normalize(sample, language);
                let twice = normalize(&once, language);
                assert_eq!(once, twice, "not idempotent for {sample:?}");
            }
        }
    }
}
