//! Locale file loading
//!
//! One `<lang>.json` per language. Nested objects flatten to dotted keys;
//! leaves must be non-empty strings.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{require_dir, CheckError, Result};

/// Shape every translation key must have
static KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_-]+)*$").expect("key pattern compiles"));

pub fn is_valid_key(key: &str) -> bool {
    KEY_PATTERN.is_match(key)
}

/// Why a locale entry is unusable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryProblem {
    /// Key does not match the key pattern
    BadKey,
    /// Leaf is a number, bool, null or array
    NonString(&'static str),
    EmptyValue,
}

impl std::fmt::Display for EntryProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryProblem::BadKey => write!(f, "invalid key format"),
            EntryProblem::NonString(kind) => write!(f, "value is {}, expected string", kind),
            EntryProblem::EmptyValue => write!(f, "empty value"),
        }
    }
}

/// One language's translations
#[derive(Debug, Clone, Default)]
pub struct Locale {
    pub lang: String,
    pub path: PathBuf,
    /// Flattened key -> text, for every leaf (including malformed ones)
    pub entries: BTreeMap<String, String>,
    pub problems: Vec<(String, EntryProblem)>,
}

impl Locale {
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Build a locale from parsed JSON
    pub fn from_value(lang: &str, path: PathBuf, value: &Value) -> Self {
        let mut locale = Locale {
            lang: lang.to_string(),
            path,
            ..Default::default()
        };
        match value {
            Value::Object(_) => locale.flatten("", value),
            other => locale
                .problems
                .push((String::new(), EntryProblem::NonString(json_kind(other)))),
        }
        locale
    }

    fn flatten(&mut self, prefix: &str, value: &Value) {
        match value {
            Value::Object(map) => {
                for (name, child) in map {
                    let key = if prefix.is_empty() {
                        name.clone()
                    } else {
                        format!("{}.{}", prefix, name)
                    };
                    self.flatten(&key, child);
                }
            }
            Value::String(text) => {
                if !is_valid_key(prefix) {
                    self.problems.push((prefix.to_string(), EntryProblem::BadKey));
                }
                if text.trim().is_empty() {
                    self.problems.push((prefix.to_string(), EntryProblem::EmptyValue));
                }
                self.entries.insert(prefix.to_string(), text.clone());
            }
            other => {
                self.problems
                    .push((prefix.to_string(), EntryProblem::NonString(json_kind(other))));
                self.entries.insert(prefix.to_string(), String::new());
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Locale file that could not be read or parsed
#[derive(Debug, Clone)]
pub struct InvalidLocale {
    pub lang: String,
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading a locales directory
#[derive(Debug, Default)]
pub struct LocaleSet {
    /// Sorted by language tag
    pub locales: Vec<Locale>,
    pub invalid: Vec<InvalidLocale>,
}

impl LocaleSet {
    pub fn get(&self, lang: &str) -> Option<&Locale> {
        self.locales.iter().find(|l| l.lang == lang)
    }
}

/// Load every `*.json` file directly inside `dir`
pub fn load_locales(dir: &Path) -> Result<LocaleSet> {
    require_dir(dir)?;

    let entries = std::fs::read_dir(dir).map_err(|source| CheckError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut set = LocaleSet::default();
    for entry in entries {
        let entry = entry.map_err(|source| CheckError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let Some(lang) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            warn!("Skipping locale file with non UTF-8 name: {}", path.display());
            continue;
        };

        match read_locale(&lang, &path) {
            Ok(locale) => {
                debug!("Loaded locale '{}' ({} keys)", lang, locale.entries.len());
                set.locales.push(locale);
            }
            Err(reason) => {
                warn!("Invalid locale file {}: {}", path.display(), reason);
                set.invalid.push(InvalidLocale { lang, path, reason });
            }
        }
    }

    set.locales.sort_by(|a, b| a.lang.cmp(&b.lang));
    set.invalid.sort_by(|a, b| a.lang.cmp(&b.lang));
    Ok(set)
}

fn read_locale(lang: &str, path: &Path) -> std::result::Result<Locale, String> {
    let text = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let value: Value = serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))?;
    Ok(Locale::from_value(lang, path.to_path_buf(), &value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_pattern() {
        assert!(is_valid_key("home"));
        assert!(is_valid_key("home.title"));
        assert!(is_valid_key("quest.clue-list.empty_state"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("home..title"));
        assert!(!is_valid_key("home title"));
        assert!(!is_valid_key("-home.title"));
        assert!(!is_valid_key("home.title."));
    }

    #[test]
    fn test_nested_objects_flatten() {
        let locale = Locale::from_value(
            "fr",
            PathBuf::from("fr.json"),
            &json!({"home": {"title": "Bienvenue", "menu": {"quests": "Quêtes"}}, "ok": "OK"}),
        );
        let keys: Vec<&str> = locale.entries.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["home.menu.quests", "home.title", "ok"]);
        assert!(locale.problems.is_empty());
    }

    #[test]
    fn test_bad_leaves_reported() {
        let locale = Locale::from_value(
            "fr",
            PathBuf::from("fr.json"),
            &json!({"count": 3, "empty": "  ", "bad key": "x", "list": ["a"]}),
        );
        assert_eq!(locale.problems.len(), 4);
        assert!(locale
            .problems
            .contains(&("count".to_string(), EntryProblem::NonString("a number"))));
        assert!(locale
            .problems
            .contains(&("empty".to_string(), EntryProblem::EmptyValue)));
        assert!(locale
            .problems
            .contains(&("bad key".to_string(), EntryProblem::BadKey)));
        assert!(locale.contains("count"));
    }

    #[test]
    fn test_top_level_must_be_object() {
        let locale = Locale::from_value("fr", PathBuf::from("fr.json"), &json!(["a"]));
        assert!(locale.entries.is_empty());
        assert_eq!(locale.problems.len(), 1);
    }
}
