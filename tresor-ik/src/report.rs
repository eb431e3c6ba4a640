//! Findings and report rendering

use serde::Serialize;
use std::collections::BTreeSet;
use tresor_common::csv::{to_csv, CsvRecord};

use crate::error::Result;
use crate::locales::{is_valid_key, LocaleSet};
use crate::scanner::UsageMap;

/// Kind of problem found
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Locale file unreadable or not JSON
    InvalidLocale,
    /// Used in source, absent from a locale (and from the base locale)
    Missing,
    /// In the base locale, absent from another locale
    Untranslated,
    /// Bad key shape, non-string leaf or empty text
    Malformed,
    /// In the base locale, never used in source
    Unused,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::InvalidLocale => "invalid_locale",
            Status::Missing => "missing",
            Status::Untranslated => "untranslated",
            Status::Malformed => "malformed",
            Status::Unused => "unused",
        }
    }

    /// Whether this finding fails the check without `--strict`
    pub fn is_error(&self) -> bool {
        !matches!(self, Status::Unused)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Finding {
    pub status: Status,
    pub key: String,
    pub locale: String,
    pub detail: String,
}

impl CsvRecord for Finding {
    fn headers() -> &'static [&'static str] {
        &["key", "status", "locale", "detail"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.key.clone(),
            self.status.as_str().to_string(),
            self.locale.clone(),
            self.detail.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub locales: Vec<String>,
    pub base_keys: usize,
    pub used_keys: usize,
    pub missing: usize,
    pub untranslated: usize,
    pub malformed: usize,
    pub unused: usize,
    pub invalid_locales: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub base: String,
    pub summary: Summary,
    /// Sorted by status, key, locale
    pub findings: Vec<Finding>,
}

/// Output format of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    #[default]
    Text,
    Csv,
    Json,
}

/// Compare locales against each other and against source usages
///
/// A key absent from a non-base locale but present in the base locale is
/// reported once, as untranslated, whether or not the source uses it.
pub fn build_report(base: &str, locales: &LocaleSet, usages: &UsageMap) -> Report {
    let mut findings = BTreeSet::new();

    for invalid in &locales.invalid {
        findings.insert(Finding {
            status: Status::InvalidLocale,
            key: String::new(),
            locale: invalid.lang.clone(),
            detail: format!("{}: {}", invalid.path.display(), invalid.reason),
        });
    }

    for locale in &locales.locales {
        for (key, problem) in &locale.problems {
            findings.insert(Finding {
                status: Status::Malformed,
                key: key.clone(),
                locale: locale.lang.clone(),
                detail: problem.to_string(),
            });
        }
    }

    let base_locale = locales.get(base);

    for (key, places) in usages {
        let first_use = places.first().map(|u| u.to_string()).unwrap_or_default();
        if !is_valid_key(key) {
            findings.insert(Finding {
                status: Status::Malformed,
                key: key.clone(),
                locale: String::new(),
                detail: format!("invalid key format, used at {}", first_use),
            });
            continue;
        }
        let in_base = base_locale.is_some_and(|b| b.contains(key));
        for locale in &locales.locales {
            if locale.contains(key) || (in_base && locale.lang != base) {
                continue;
            }
            findings.insert(Finding {
                status: Status::Missing,
                key: key.clone(),
                locale: locale.lang.clone(),
                detail: format!("used at {}", first_use),
            });
        }
    }

    if let Some(base_locale) = base_locale {
        for key in base_locale.entries.keys() {
            for locale in locales.locales.iter().filter(|l| l.lang != base) {
                if !locale.contains(key) {
                    findings.insert(Finding {
                        status: Status::Untranslated,
                        key: key.clone(),
                        locale: locale.lang.clone(),
                        detail: format!("present in '{}'", base),
                    });
                }
            }
            if !usages.contains_key(key) {
                findings.insert(Finding {
                    status: Status::Unused,
                    key: key.clone(),
                    locale: base.to_string(),
                    detail: "never used in source".to_string(),
                });
            }
        }
    }

    let findings: Vec<Finding> = findings.into_iter().collect();
    let count = |status: Status| findings.iter().filter(|f| f.status == status).count();
    let summary = Summary {
        locales: locales.locales.iter().map(|l| l.lang.clone()).collect(),
        base_keys: base_locale.map_or(0, |b| b.entries.len()),
        used_keys: usages.len(),
        missing: count(Status::Missing),
        untranslated: count(Status::Untranslated),
        malformed: count(Status::Malformed),
        unused: count(Status::Unused),
        invalid_locales: count(Status::InvalidLocale),
    };

    Report {
        base: base.to_string(),
        summary,
        findings,
    }
}

impl Report {
    /// Whether the check fails; unused keys only count when strict
    pub fn has_failures(&self, strict: bool) -> bool {
        self.findings
            .iter()
            .any(|f| f.status.is_error() || (strict && f.status == Status::Unused))
    }

    /// Process exit code: 0 pass, 1 findings
    pub fn exit_code(&self, strict: bool) -> u8 {
        u8::from(self.has_failures(strict))
    }

    pub fn render(&self, format: Format) -> Result<String> {
        match format {
            Format::Text => Ok(self.render_text()),
            Format::Csv => Ok(to_csv(&self.findings)),
            Format::Json => Ok(serde_json::to_string_pretty(self)? + "\n"),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        for finding in &self.findings {
            let target = if finding.key.is_empty() {
                finding.locale.clone()
            } else if finding.locale.is_empty() {
                finding.key.clone()
            } else {
                format!("{} [{}]", finding.key, finding.locale)
            };
            out.push_str(&format!(
                "{:<15} {} - {}\n",
                finding.status.as_str(),
                target,
                finding.detail
            ));
        }

        let s = &self.summary;
        out.push_str(&format!(
            "\nLocales: {} (base '{}', {} keys), {} keys used in source\n",
            s.locales.join(", "),
            self.base,
            s.base_keys,
            s.used_keys
        ));
        out.push_str(&format!(
            "{} missing, {} untranslated, {} malformed, {} invalid locale files, {} unused\n",
            s.missing, s.untranslated, s.malformed, s.invalid_locales, s.unused
        ));
        out
    }
}
