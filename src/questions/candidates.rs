// Language fallback search order for localized game data files.
use std::path::Path;

pub const DEFAULT_DATA_FILE: &str = "gamedata.json";

const DEFAULT_EXTENSION: &str = "json";
const HARD_DEFAULTS: [&str; 3] = ["gamedata.json", "gamedata.pt.json", "gamedata.en.json"];

/// Ordered, de-duplicated file names to try for one language.
///
/// For base `gamedata.json`, language `en-US` and fallback `pt`:
/// `gamedata.en-US.json`, `gamedata.en.json`, `gamedata.US.json`,
/// `gamedata.pt.json`, `gamedata.json`, then the hard defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFiles(Vec<String>);

impl CandidateFiles {
    pub fn new(data_file: &str, language: &str, fallback_language: &str) -> Self {
        let (stem, extension) = split_file_name(data_file);
        let mut candidates = CandidateFiles(Vec::new());

        let language = language.trim();
        if !language.is_empty() {
            candidates.push(format!("{stem}.{language}{extension}"));
            for token in language
                .split(['-', '_', '.'])
                .filter(|token| !token.is_empty())
            {
                candidates.push(format!("{stem}.{token}{extension}"));
            }
        }

        let fallback_language = fallback_language.trim();
        if !fallback_language.is_empty() {
            candidates.push(format!("{stem}.{fallback_language}{extension}"));
        }

        candidates.push(format!("{stem}{extension}"));
        for name in HARD_DEFAULTS {
            candidates.push(name.to_string());
        }

        candidates
    }

    fn push(&mut self, candidate: String) {
        if !self
            .0
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(&candidate))
        {
            self.0.push(candidate);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// Split a configured file name into stem and dotted extension, ignoring any
/// directory part. Blank names resolve to `gamedata.json`.
fn split_file_name(data_file: &str) -> (String, String) {
    let file_name = Path::new(data_file.trim())
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(DEFAULT_DATA_FILE);
    let path = Path::new(file_name);

    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .unwrap_or("gamedata");
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION);

    (stem.to_string(), format!(".{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(data_file: &str, language: &str, fallback: &str) -> Vec<String> {
        CandidateFiles::new(data_file, language, fallback).into_vec()
    }

    #[test]
    fn full_tag_then_tokens_then_fallback() {
        assert_eq!(
            names("gamedata.json", "en-US", "pt"),
            vec![
                "gamedata.en-US.json",
                "gamedata.en.json",
                "gamedata.US.json",
                "gamedata.pt.json",
                "gamedata.json",
            ]
        );
    }

    #[test]
    fn splits_on_underscore_and_dot() {
        assert_eq!(
            names("gamedata.json", "pt_BR.utf8", "pt"),
            vec![
                "gamedata.pt_BR.utf8.json",
                "gamedata.pt.json",
                "gamedata.BR.json",
                "gamedata.utf8.json",
                "gamedata.json",
                "gamedata.en.json",
            ]
        );
    }

    #[test]
    fn custom_base_name_still_ends_with_hard_defaults() {
        assert_eq!(
            names("quiz.json", "es", "pt"),
            vec![
                "quiz.es.json",
                "quiz.pt.json",
                "quiz.json",
                "gamedata.json",
                "gamedata.pt.json",
                "gamedata.en.json",
            ]
        );
    }

    #[test]
    fn blank_language_skips_to_fallback() {
        assert_eq!(
            names("gamedata.json", "  ", "en"),
            vec!["gamedata.en.json", "gamedata.json", "gamedata.pt.json"]
        );
    }

    #[test]
    fn missing_extension_defaults_to_json() {
        assert_eq!(names("data/quiz", "", "")[0], "quiz.json");
    }

    #[test]
    fn duplicates_are_case_insensitive() {
        let list = names("gamedata.json", "PT", "pt");
        assert_eq!(list[0], "gamedata.PT.json");
        assert!(!list.iter().skip(1).any(|name| name == "gamedata.pt.json"));
    }
}
