// Reading question files from disk, and the background load that feeds the engine.
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future};
use serde::de::DeserializeOwned;

use super::{CandidateFiles, QuestionBank, QuestionSet};
use crate::config::{DataDir, GameConfig};
use crate::error::{DataError, DataResult};
use crate::sequence::SequenceEngine;

/// Language-neutral question file holding ids, correct answers and artwork.
pub const BASE_DATA_FILE: &str = "gamebase.json";

#[derive(Debug, Clone)]
pub struct LoadedQuestions {
    pub set: QuestionSet,
    pub language: String,
    /// File the prose came from.
    pub source: String,
}

pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> DataResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|err| DataError::io(path, err))?;
    if contents.trim().is_empty() {
        return Err(DataError::Empty {
            path: path.to_path_buf(),
        });
    }
    serde_json::from_str(&contents).map_err(|err| DataError::parse(path, err))
}

/// Load the question set for `language` from `data_dir`.
///
/// The first candidate file that parses supplies the prose. When
/// `gamebase.json` exists the prose is merged onto it, otherwise the candidate
/// is used as is. A base file alone is enough if no candidate loads.
pub fn load_questions(
    data_dir: &Path,
    data_file: &str,
    language: &str,
    fallback_language: &str,
) -> DataResult<LoadedQuestions> {
    let base = match read_json::<QuestionSet>(&data_dir.join(BASE_DATA_FILE)) {
        Ok(base) => Some(base),
        Err(err) if err.is_not_found() => None,
        Err(err) => {
            warn!("Ignoring base game data: {err}");
            None
        }
    };

    let mut tried = Vec::new();
    let mut localized = None;
    for candidate in CandidateFiles::new(data_file, language, fallback_language).iter() {
        tried.push(candidate.to_string());
        match read_json::<QuestionSet>(&data_dir.join(candidate)) {
            Ok(set) => {
                localized = Some((candidate.to_string(), set));
                break;
            }
            Err(err) if err.is_not_found() => {
                debug!("Game data candidate {candidate} not found.");
            }
            Err(err) => warn!("Skipping game data candidate {candidate}: {err}"),
        }
    }

    let (set, source) = match (base, localized) {
        (Some(mut base), Some((source, localized))) => {
            base.merge_translations(&localized);
            (base, source)
        }
        (None, Some((source, localized))) => (localized, source),
        (Some(base), None) => {
            warn!("No localized game data for '{language}'; using {BASE_DATA_FILE} text.");
            (base, BASE_DATA_FILE.to_string())
        }
        (None, None) => {
            return Err(DataError::NoCandidate {
                language: language.to_string(),
                tried,
            });
        }
    };

    Ok(LoadedQuestions {
        set,
        language: language.to_string(),
        source,
    })
}

/// Request a reload of the question data in another language.
#[derive(Message, Debug, Clone)]
pub struct LanguageChanged(pub String);

/// Emitted after a load has been applied to the engine.
#[derive(Message, Debug, Clone)]
pub struct QuestionsLoaded {
    pub language: String,
    pub questions: usize,
}

/// The in-flight load, if any. Replacing the task drops, and so cancels, the
/// previous one.
#[derive(Resource, Default)]
pub struct PendingLoad(Option<Task<DataResult<LoadedQuestions>>>);

impl PendingLoad {
    pub fn is_loading(&self) -> bool {
        self.0.is_some()
    }
}

pub struct QuestionLoadPlugin;

impl Plugin for QuestionLoadPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingLoad>()
            .add_message::<LanguageChanged>()
            .add_message::<QuestionsLoaded>()
            .add_systems(Startup, start_initial_load)
            .add_systems(
                Update,
                (switch_language, apply_finished_load)
                    .chain()
                    .in_set(crate::HuntSet::Load),
            );
    }
}

fn spawn_load(
    data_dir: PathBuf,
    config: &GameConfig,
    language: &str,
) -> Task<DataResult<LoadedQuestions>> {
    let data_file = config.data_file.clone();
    let language = language.to_string();
    let fallback = config.fallback_language.clone();
    AsyncComputeTaskPool::get()
        .spawn(async move { load_questions(&data_dir, &data_file, &language, &fallback) })
}

fn start_initial_load(
    config: Res<GameConfig>,
    data_dir: Res<DataDir>,
    mut pending: ResMut<PendingLoad>,
) {
    info!("Loading game data for '{}'.", config.language);
    pending.0 = Some(spawn_load(data_dir.0.clone(), &config, &config.language));
}

/// The configured language only changes once the new data has loaded.
fn switch_language(
    mut changes: MessageReader<LanguageChanged>,
    config: Res<GameConfig>,
    data_dir: Res<DataDir>,
    mut pending: ResMut<PendingLoad>,
) {
    // Only the latest request in a frame matters.
    let Some(LanguageChanged(language)) = changes.read().last() else {
        return;
    };

    if pending.is_loading() {
        debug!("Superseding in-flight game data load.");
    }
    info!("Language change to '{language}' requested; reloading game data.");
    pending.0 = Some(spawn_load(data_dir.0.clone(), &config, language));
}

fn apply_finished_load(
    mut pending: ResMut<PendingLoad>,
    mut engine: ResMut<SequenceEngine>,
    mut config: ResMut<GameConfig>,
    mut loaded: MessageWriter<QuestionsLoaded>,
) {
    let Some(task) = pending.0.as_mut() else {
        return;
    };
    let Some(result) = block_on(future::poll_once(task)) else {
        return;
    };
    pending.0 = None;

    match result {
        Ok(questions) => {
            info!(
                "Game data loaded from {}. Questions: {}",
                questions.source,
                questions.set.questions.len()
            );
            let bank = QuestionBank::from_set(questions.set, questions.language.clone());
            let count = bank.len();
            engine.replace_questions(bank);
            if config.language != questions.language {
                config.language = questions.language.clone();
            }
            loaded.write(QuestionsLoaded {
                language: questions.language,
                questions: count,
            });
        }
        Err(err) => error!(
            "Failed to load game data; keeping '{}': {err}",
            config.language
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    const PT: &str = r#"{"questions":[{"id":1,"prompt":"Olá?","answers":[{"id":"a","text":"Sim"},{"id":"b","text":"Não"}],"correct_answer":"a"}]}"#;

    #[test]
    fn falls_back_to_pt_file_for_unknown_language() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "gamedata.pt.json", PT);

        let loaded = load_questions(dir.path(), "gamedata.json", "en-US", "pt").unwrap();

        assert_eq!(loaded.source, "gamedata.pt.json");
        assert_eq!(loaded.set.questions[0].prompt, "Olá?");
    }

    #[test]
    fn malformed_candidate_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "gamedata.en.json", "{ not json");
        write(dir.path(), "gamedata.pt.json", PT);

        let loaded = load_questions(dir.path(), "gamedata.json", "en", "pt").unwrap();
        assert_eq!(loaded.source, "gamedata.pt.json");
    }

    #[test]
    fn localized_text_merges_onto_base() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), BASE_DATA_FILE, PT);
        write(
            dir.path(),
            "gamedata.en.json",
            r#"{"questions":[{"id":1,"prompt":"Hello?","answers":[{"id":"z","text":""},{"text":"No"}],"correct_answer":"b"}]}"#,
        );

        let loaded = load_questions(dir.path(), "gamedata.json", "en", "pt").unwrap();
        let question = &loaded.set.questions[0];

        assert_eq!(loaded.source, "gamedata.en.json");
        assert_eq!(question.prompt, "Hello?");
        assert_eq!(question.answers[0].text, "Sim");
        assert_eq!(question.answers[1].text, "No");
        assert_eq!(question.answers[0].id, "a");
        assert_eq!(question.correct_answer, "a");
    }

    #[test]
    fn base_alone_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), BASE_DATA_FILE, PT);

        let loaded = load_questions(dir.path(), "gamedata.json", "en", "pt").unwrap();
        assert_eq!(loaded.source, BASE_DATA_FILE);
        assert_eq!(loaded.set.questions.len(), 1);
    }

    #[test]
    fn nothing_to_load_lists_every_candidate() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_questions(dir.path(), "gamedata.json", "en-US", "pt").unwrap_err();
        match err {
            DataError::NoCandidate { language, tried } => {
                assert_eq!(language, "en-US");
                assert_eq!(
                    &tried[..4],
                    [
                        "gamedata.en-US.json",
                        "gamedata.en.json",
                        "gamedata.US.json",
                        "gamedata.pt.json"
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "gamedata.json", "   ");

        let err = read_json::<QuestionSet>(&dir.path().join("gamedata.json")).unwrap_err();
        assert!(matches!(err, DataError::Empty { .. }));
    }
}
