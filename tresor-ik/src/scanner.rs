//! Source scanning for translation key usages
//!
//! Recognized forms: `t("key")`, `t('key')`, `` t(`key`) `` and
//! `i18nKey="key"` (also single quotes). Template literals containing `${`
//! are dynamic and skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

use crate::error::{require_dir, CheckError, Result};

/// File extensions scanned for usages
pub const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Directories never descended into
const SKIPPED_DIRS: [&str; 4] = ["node_modules", ".git", "dist", "build"];

static T_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bt\(\s*(?:"([^"\\\n]*)"|'([^'\\\n]*)'|`([^`\\]*)`)"#).expect("t() pattern compiles")
});

static I18N_KEY_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bi18nKey\s*=\s*(?:"([^"\\\n]*)"|'([^'\\\n]*)')"#).expect("i18nKey pattern compiles")
});

/// Where a key is used
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Usage {
    pub file: PathBuf,
    /// 1-based
    pub line: usize,
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}

/// Used keys with every place they appear
pub type UsageMap = BTreeMap<String, Vec<Usage>>;

/// Static keys used in a piece of source text, with their line numbers
pub fn extract_keys(text: &str) -> Vec<(String, usize)> {
    let mut found = Vec::new();
    for (index, line) in text.lines().enumerate() {
        for regex in [&*T_CALL, &*I18N_KEY_ATTR] {
            for caps in regex.captures_iter(line) {
                let Some(key) = caps.iter().skip(1).flatten().next() else {
                    continue;
                };
                let key = key.as_str();
                if key.is_empty() || key.contains("${") {
                    continue;
                }
                found.push((key.to_string(), index + 1));
            }
        }
    }
    found
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn should_descend(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }
    entry
        .file_name()
        .to_str()
        .map_or(true, |name| !SKIPPED_DIRS.contains(&name))
}

/// Scan source directories recursively and collect key usages
pub fn scan_sources(roots: &[PathBuf]) -> Result<UsageMap> {
    let mut usages = UsageMap::new();
    let mut files_scanned = 0usize;

    for root in roots {
        require_dir(root)?;

        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(should_descend);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Error accessing entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                continue;
            }

            let text = match std::fs::read_to_string(entry.path()) {
                Ok(text) => text,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                    warn!("Skipping non UTF-8 file: {}", entry.path().display());
                    continue;
                }
                Err(source) => {
                    return Err(CheckError::Io {
                        path: entry.path().to_path_buf(),
                        source,
                    })
                }
            };

            files_scanned += 1;
            for (key, line) in extract_keys(&text) {
                usages.entry(key).or_default().push(Usage {
                    file: entry.path().to_path_buf(),
                    line,
                });
            }
        }
    }

    debug!(
        "Scanned {} source files, {} distinct keys",
        files_scanned,
        usages.len()
    );
    Ok(usages)
}
