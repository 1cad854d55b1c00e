// Quiz questions: data model, id lookup and translation merging.
mod candidates;
pub mod loader;

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::waypoints::WaypointRegistry;

pub use candidates::{CandidateFiles, DEFAULT_DATA_FILE};
pub use loader::{BASE_DATA_FILE, LoadedQuestions, load_questions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Answer {
    pub id: String,
    pub text: String,
    /// Optional explanation shown after the answer is picked.
    pub feedback: String,
}

impl Answer {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            feedback: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Question {
    pub id: u32,
    pub prompt: String,
    pub description: String,
    pub answers: Vec<Answer>,
    pub correct_answer: String,
    /// Artwork key for the marker this question belongs to.
    pub image: Option<String>,
}

impl Question {
    /// Case-insensitive check against the correct answer id. An empty id is
    /// never correct.
    pub fn is_correct(&self, answer_id: &str) -> bool {
        !answer_id.is_empty() && answer_id.eq_ignore_ascii_case(&self.correct_answer)
    }
}

/// Top-level shape of every game data file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionSet {
    pub questions: Vec<Question>,
}

impl QuestionSet {
    /// Overlay translated prose from `localized` onto this set.
    ///
    /// Questions pair by id, falling back to the same position in the list.
    /// Only non-empty text is copied; ids, correct answers and artwork stay as
    /// they are here. Answers pair by position.
    pub fn merge_translations(&mut self, localized: &QuestionSet) {
        let by_id: HashMap<u32, &Question> =
            localized.questions.iter().map(|q| (q.id, q)).collect();

        for (index, base) in self.questions.iter_mut().enumerate() {
            let Some(translated) = by_id
                .get(&base.id)
                .copied()
                .or_else(|| localized.questions.get(index))
            else {
                continue;
            };

            overlay(&mut base.prompt, &translated.prompt);
            overlay(&mut base.description, &translated.description);

            for (answer, translated_answer) in base.answers.iter_mut().zip(&translated.answers) {
                overlay(&mut answer.text, &translated_answer.text);
                overlay(&mut answer.feedback, &translated_answer.feedback);
            }
        }
    }
}

fn overlay(target: &mut String, translated: &str) {
    if !translated.is_empty() {
        *target = translated.to_string();
    }
}

/// Questions for the active language, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: HashMap<u32, Question>,
    language: Option<String>,
}

impl QuestionBank {
    /// Later questions with a repeated id replace earlier ones.
    pub fn from_set(set: QuestionSet, language: impl Into<String>) -> Self {
        let mut questions = HashMap::with_capacity(set.questions.len());
        for question in set.questions {
            if questions.insert(question.id, question).is_some() {
                debug!("Duplicate question id in game data; keeping the later entry.");
            }
        }
        Self {
            questions,
            language: Some(language.into()),
        }
    }

    /// False until a load has succeeded at least once.
    pub fn is_loaded(&self) -> bool {
        self.language.is_some()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.get(&id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Warn about every waypoint whose question is missing. Returns the board
    /// indices that failed.
    pub fn validate_links(&self, registry: &WaypointRegistry) -> Vec<usize> {
        let mut dangling = Vec::new();
        for waypoint in registry.iter() {
            if !self.questions.contains_key(&waypoint.question_id) {
                warn!(
                    "Marker '{}' links question {} which is not in the loaded data.",
                    waypoint.marker, waypoint.question_id
                );
                dangling.push(waypoint.board_index);
            }
        }
        dangling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waypoints::WaypointMapping;

    fn question(id: u32, prompt: &str, answers: &[(&str, &str)]) -> Question {
        Question {
            id,
            prompt: prompt.to_string(),
            answers: answers
                .iter()
                .map(|(id, text)| Answer::new(*id, *text))
                .collect(),
            correct_answer: answers.first().map(|(id, _)| id.to_string()).unwrap_or_default(),
            ..default()
        }
    }

    #[test]
    fn merge_keeps_base_text_when_translation_is_empty() {
        let mut base = QuestionSet {
            questions: vec![Question {
                image: Some("casa-3".into()),
                ..question(3, "Pergunta", &[("A", "Sim"), ("B", "Não")])
            }],
        };
        let localized = QuestionSet {
            questions: vec![Question {
                correct_answer: "B".into(),
                image: None,
                ..question(3, "Question", &[("x", ""), ("y", "No")])
            }],
        };

        base.merge_translations(&localized);

        let merged = &base.questions[0];
        assert_eq!(merged.prompt, "Question");
        assert_eq!(merged.answers[0].text, "Sim");
        assert_eq!(merged.answers[1].text, "No");
        assert_eq!(merged.answers[0].id, "A");
        assert_eq!(merged.answers[1].id, "B");
        assert_eq!(merged.correct_answer, "A");
        assert_eq!(merged.image.as_deref(), Some("casa-3"));
    }

    #[test]
    fn merge_matches_by_id_before_position() {
        let mut base = QuestionSet {
            questions: vec![question(1, "um", &[]), question(2, "dois", &[])],
        };
        let localized = QuestionSet {
            questions: vec![question(2, "two", &[]), question(1, "one", &[])],
        };

        base.merge_translations(&localized);

        assert_eq!(base.questions[0].prompt, "one");
        assert_eq!(base.questions[1].prompt, "two");
    }

    #[test]
    fn merge_falls_back_to_position_without_id_match() {
        let mut base = QuestionSet {
            questions: vec![question(1, "um", &[]), question(2, "dois", &[])],
        };
        let localized = QuestionSet {
            questions: vec![question(90, "first", &[]), question(91, "second", &[])],
        };

        base.merge_translations(&localized);

        assert_eq!(base.questions[0].prompt, "first");
        assert_eq!(base.questions[1].prompt, "second");
        assert_eq!(base.questions[1].id, 2);
    }

    #[test]
    fn later_entries_with_same_id_win() {
        let set = QuestionSet {
            questions: vec![question(1, "old", &[]), question(1, "new", &[])],
        };
        let bank = QuestionBank::from_set(set, "pt");
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.get(1).map(|q| q.prompt.as_str()), Some("new"));
    }

    #[test]
    fn validate_links_reports_dangling_waypoints() {
        let registry = WaypointRegistry::from_mappings(&[
            WaypointMapping::new("a", 1),
            WaypointMapping::new("b", 2),
            WaypointMapping::new("c", 3),
        ]);
        let bank = QuestionBank::from_set(
            QuestionSet {
                questions: vec![question(1, "", &[]), question(3, "", &[])],
            },
            "pt",
        );

        assert_eq!(bank.validate_links(&registry), vec![1]);
    }

    #[test]
    fn correct_answer_check_ignores_case_and_rejects_empty() {
        let q = Question {
            correct_answer: "b".into(),
            ..question(1, "", &[("a", ""), ("B", "")])
        };
        assert!(q.is_correct("B"));
        assert!(!q.is_correct("a"));
        assert!(!q.is_correct(""));
    }

    #[test]
    fn default_bank_is_not_loaded() {
        let bank = QuestionBank::default();
        assert!(!bank.is_loaded());
        assert!(bank.get(1).is_none());
    }
}
