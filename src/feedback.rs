// Player-facing wording for quiz outcomes and the tracking prompt.
use crate::sequence::{Outcome, SequenceEngine, StepDelta};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Correct,
    Wrong,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackView {
    pub tone: Tone,
    pub headline: String,
    /// e.g. `["ADVANCE", "3", "SPACES"]`. Empty when nothing moves.
    pub movement: Vec<String>,
}

pub fn is_portuguese(language: &str) -> bool {
    language
        .get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("pt"))
}

fn localized(language: &str, portuguese: &str, english: &str) -> String {
    if is_portuguese(language) {
        portuguese.to_string()
    } else {
        english.to_string()
    }
}

pub fn present(delta: StepDelta, elapsed_secs: f32, language: &str) -> FeedbackView {
    let pt = is_portuguese(language);
    let (tone, headline) = match delta.outcome() {
        Some(Outcome::Wrong) => (
            Tone::Wrong,
            localized(language, "Resposta incorreta!", "Wrong answer!"),
        ),
        Some(Outcome::Inactivity) => (
            Tone::Inactive,
            localized(language, "Tempo esgotado!", "Time's up!"),
        ),
        Some(Outcome::CorrectSlow) => (
            Tone::Correct,
            if pt {
                format!("Acerto no limite ({elapsed_secs:.1}s)!")
            } else {
                format!("Correct at the limit ({elapsed_secs:.1}s)!")
            },
        ),
        Some(Outcome::CorrectFast | Outcome::CorrectMedium) => (
            Tone::Correct,
            if pt {
                format!("Acerto em {elapsed_secs:.1}s!")
            } else {
                format!("Correct in {elapsed_secs:.1}s!")
            },
        ),
        None if delta.steps() < 0 => (Tone::Wrong, String::new()),
        None => (Tone::Correct, String::new()),
    };

    FeedbackView {
        tone,
        headline,
        movement: movement_lines(delta.steps(), language),
    }
}

fn movement_lines(steps: i32, language: &str) -> Vec<String> {
    if steps == 0 {
        return Vec::new();
    }
    let count = steps.unsigned_abs();
    let prefix = if steps > 0 {
        localized(language, "AVANCE", "ADVANCE")
    } else {
        localized(language, "VOLTE", "GO BACK")
    };
    let unit = if count > 1 {
        localized(language, "CASAS", "SPACES")
    } else {
        localized(language, "CASA", "SPACE")
    };
    vec![prefix, count.to_string(), unit]
}

/// What the tracking screen should tell the player to do next.
pub fn tracking_hint(engine: &SequenceEngine, language: &str) -> String {
    if !engine.is_started() {
        return localized(language, "Posicione-se em qualquer casa", "Stand on any tile");
    }
    if !engine.has_answered() {
        return localized(
            language,
            "Aguarde. Responda à pergunta antes de seguir.",
            "Hold on. Answer the question before moving forward.",
        );
    }
    match engine.state().expected_next {
        Some(_) => match engine.expected_waypoint() {
            Some(waypoint) => {
                let tile = waypoint.board_index + 1;
                if is_portuguese(language) {
                    format!("Vá para a casa {tile}")
                } else {
                    format!("Go to tile {tile}")
                }
            }
            None => localized(
                language,
                "Procure a próxima casa indicada.",
                "Look for the indicated next tile.",
            ),
        },
        None => localized(
            language,
            "Você concluiu o percurso!",
            "You have finished the route!",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::{Answer, Question, QuestionBank, QuestionSet};
    use crate::waypoints::{WaypointMapping, WaypointRegistry};

    #[test]
    fn portuguese_detection_uses_prefix() {
        assert!(is_portuguese("pt"));
        assert!(is_portuguese("PT-br"));
        assert!(!is_portuguese("en-US"));
        assert!(!is_portuguese("p"));
    }

    #[test]
    fn correct_fast_in_portuguese() {
        let view = present(StepDelta::correct_fast(), 4.24, "pt-BR");
        assert_eq!(view.tone, Tone::Correct);
        assert_eq!(view.headline, "Acerto em 4.2s!");
        assert_eq!(view.movement, vec!["AVANCE", "3", "CASAS"]);
    }

    #[test]
    fn wrong_in_english_goes_back() {
        let view = present(StepDelta::wrong(), 2.0, "en");
        assert_eq!(view.tone, Tone::Wrong);
        assert_eq!(view.headline, "Wrong answer!");
        assert_eq!(view.movement, vec!["GO BACK", "2", "SPACES"]);
    }

    #[test]
    fn single_space_is_singular() {
        let view = present(StepDelta::inactivity(), 30.0, "pt");
        assert_eq!(view.tone, Tone::Inactive);
        assert_eq!(view.movement, vec!["VOLTE", "1", "CASA"]);

        let slow = present(StepDelta::correct_slow(), 25.0, "en");
        assert_eq!(slow.headline, "Correct at the limit (25.0s)!");
        assert_eq!(slow.movement, vec!["ADVANCE", "1", "SPACE"]);
    }

    #[test]
    fn hint_follows_session_progress() {
        let mappings = [WaypointMapping::new("a", 1), WaypointMapping::new("b", 2)];
        let questions = [1, 2]
            .map(|id| Question {
                id,
                answers: vec![Answer::new("x", "X")],
                correct_answer: "x".into(),
                ..Default::default()
            })
            .to_vec();
        let mut engine = SequenceEngine::new(
            WaypointRegistry::from_mappings(&mappings),
            QuestionBank::from_set(QuestionSet { questions }, "en"),
            true,
        );

        assert_eq!(tracking_hint(&engine, "en"), "Stand on any tile");
        engine.accept_detection("a");
        assert_eq!(
            tracking_hint(&engine, "en"),
            "Hold on. Answer the question before moving forward."
        );
        engine.apply_answer_outcome(StepDelta::correct_slow());
        assert_eq!(tracking_hint(&engine, "en"), "Go to tile 2");
        assert_eq!(tracking_hint(&engine, "pt"), "Vá para a casa 2");
    }
}
