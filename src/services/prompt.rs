use crate::models::{StoryParameters, UnitRole};

/// Builds the instruction sent to the content generator for one unit.
///
/// Pure function of its inputs: the same parameters, role and length policy
/// always produce the same prompt.
pub fn build_prompt(params: &StoryParameters, role: &UnitRole, min_words: usize) -> String {
    let framing = match role {
        UnitRole::Introduction => "the introduction of".to_string(),
        UnitRole::Chapter(n) => format!("chapter {n} of"),
        UnitRole::Conclusion => "the concluding chapter of".to_string(),
    };

    let mut prompt = format!(
        "Write {framing} a novel titled '{}'. The genre is {} and it is aimed at {}.",
        params.title, params.genre, params.audience
    );

    match (&params.setup, &params.conflict, &params.resolution) {
        (Some(setup), Some(conflict), Some(resolution)) => {
            prompt.push_str(&format!(
                " The story opens with this setup: {setup}. The central conflict is: {conflict}. The resolution will be: {resolution}."
            ));
        }
        _ => {
            if let Some(plot) = &params.plot {
                prompt.push_str(&format!(" The plot is: {plot}."));
            }
        }
    }

    if let Some(instructions) = &params.instructions {
        prompt.push(' ');
        prompt.push_str(instructions);
    }

    prompt.push_str(" Continue the story coherently with the rest of the novel.");
    if min_words > 0 {
        prompt.push_str(&format!(" The text must be at least {min_words} words long."));
    }
    prompt.push_str(&format!(" Write in {}.", params.language.english_name()));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;

    fn params() -> StoryParameters {
        StoryParameters {
            title: "Nova".to_string(),
            genre: "Sci-Fi".to_string(),
            audience: "Adults".to_string(),
            chapter_count: 3,
            setup: Some("a dying star".to_string()),
            conflict: Some("the crew mutinies".to_string()),
            resolution: Some("a new home is found".to_string()),
            plot: None,
            instructions: None,
            author_name: None,
            author_bio: None,
            language: Language::English,
            include_introduction: false,
            include_conclusion: false,
        }
    }

    #[test]
    fn always_names_title_genre_and_audience() {
        let prompt = build_prompt(&params(), &UnitRole::Chapter(2), 0);
        assert!(prompt.contains("'Nova'"));
        assert!(prompt.contains("Sci-Fi"));
        assert!(prompt.contains("Adults"));
        assert!(prompt.contains("chapter 2"));
        assert!(prompt.contains("Continue the story coherently"));
    }

    #[test]
    fn structured_plot_fields_appear_in_fixed_order() {
        let prompt = build_prompt(&params(), &UnitRole::Chapter(1), 0);
        let setup = prompt.find("a dying star").unwrap();
        let conflict = prompt.find("the crew mutinies").unwrap();
        let resolution = prompt.find("a new home is found").unwrap();
        assert!(setup < conflict && conflict < resolution);
    }

    #[test]
    fn free_form_plot_is_used_when_structure_is_incomplete() {
        let mut p = params();
        p.conflict = None;
        p.plot = Some("a heist on the moon".to_string());
        let prompt = build_prompt(&p, &UnitRole::Chapter(1), 0);
        assert!(prompt.contains("a heist on the moon"));
        assert!(!prompt.contains("a dying star"));
    }

    #[test]
    fn special_instructions_appear_verbatim() {
        let mut p = params();
        p.instructions = Some("Include a mysterious stranger in every chapter.".to_string());
        let prompt = build_prompt(&p, &UnitRole::Chapter(1), 0);
        assert!(prompt.contains("Include a mysterious stranger in every chapter."));
    }

    #[test]
    fn intro_and_conclusion_get_role_framing() {
        let intro = build_prompt(&params(), &UnitRole::Introduction, 0);
        assert!(intro.contains("the introduction of"));
        assert!(!intro.contains("chapter 1"));

        let outro = build_prompt(&params(), &UnitRole::Conclusion, 0);
        assert!(outro.contains("the concluding chapter of"));
    }

    #[test]
    fn length_directive_tracks_the_policy() {
        let without = build_prompt(&params(), &UnitRole::Chapter(1), 0);
        assert!(!without.contains("words long"));

        let with = build_prompt(&params(), &UnitRole::Chapter(1), 1000);
        assert!(with.contains("at least 1000 words"));
    }

    #[test]
    fn prompt_states_the_output_language() {
        let mut p = params();
        p.language = Language::Spanish;
        let prompt = build_prompt(&p, &UnitRole::Chapter(1), 0);
        assert!(prompt.contains("Write in Spanish."));
    }
}
