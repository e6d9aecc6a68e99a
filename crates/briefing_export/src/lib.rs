//! Markdown export of generated briefings.
//!
//! Renders one briefing, or a numbered report of several, as a Markdown
//! document and derives a file name for it.
//!
//! # Example
//!
//! ```
//! use briefing_export::{BriefingKind, BriefingResult, ExportableBriefing, export_single};
//! use chrono::{TimeZone, Utc};
//!
//! let result = BriefingResult {
//!     title: "Space".into(),
//!     summary: "Rockets went up.".into(),
//!     tweets: vec!["Liftoff! #space".into()],
//!     sources: vec!["NASA".into()],
//! };
//! let generated_at = Utc.with_ymd_and_hms(2025, 1, 2, 8, 0, 0).unwrap();
//! let briefing = ExportableBriefing::from_result(result, BriefingKind::Personal, generated_at);
//!
//! let markdown = export_single(&briefing);
//! assert!(markdown.starts_with("# Space\n"));
//! assert!(markdown.contains("> Liftoff!"));
//! ```

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static HASHTAG: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"#[A-Za-z0-9_]+"));

static NON_SLUG: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"[^a-z0-9]+"));

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // Patterns are literals covered by the tests below.
        Err(err) => panic!("invalid regex pattern `{pattern}`: {err}"),
    }
}

/// A briefing as produced by the content pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingResult {
    /// Topic title.
    pub title: String,
    /// Summary paragraph.
    pub summary: String,
    /// Satirical tweets about the topic.
    pub tweets: Vec<String>,
    /// Source names.
    pub sources: Vec<String>,
}

/// Where a briefing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BriefingKind {
    /// Generated from one of the user's interests.
    Personal,
    /// Generated from a trending topic.
    Trending,
}

impl BriefingKind {
    /// Label used in the metadata block.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            BriefingKind::Personal => "Personal Interest",
            BriefingKind::Trending => "Trending Topic",
        }
    }
}

/// A briefing ready for export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportableBriefing {
    /// Topic title.
    pub title: String,
    /// Summary paragraph.
    pub summary: String,
    /// Satirical tweets.
    pub tweets: Vec<String>,
    /// Source names.
    pub sources: Vec<String>,
    /// When the briefing was generated.
    pub generated_at: DateTime<Utc>,
    /// Where the briefing came from.
    #[serde(rename = "type")]
    pub kind: BriefingKind,
}

impl ExportableBriefing {
    /// Wraps a pipeline result for export.
    #[must_use]
    pub fn from_result(
        result: BriefingResult,
        kind: BriefingKind,
        generated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: result.title,
            summary: result.summary,
            tweets: result.tweets,
            sources: result.sources,
            generated_at,
            kind,
        }
    }
}

/// Errors raised while writing an export to disk.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Renders one briefing.
#[must_use]
pub fn export_single(briefing: &ExportableBriefing) -> String {
    let mut lines = vec![format!("# {}", briefing.title), String::new()];
    push_body(&mut lines, briefing, "##");
    lines.join("\n")
}

/// Renders a numbered report of several briefings.
#[must_use]
pub fn export_multiple(briefings: &[ExportableBriefing], generated_at: DateTime<Utc>) -> String {
    let header = [
        "# Daily Briefing AI Report".to_string(),
        String::new(),
        format!("Generated: {}", timestamp(generated_at)),
        format!("Total Briefings: {}", briefings.len()),
        String::new(),
    ]
    .join("\n");

    let sections: Vec<String> = briefings
        .iter()
        .enumerate()
        .map(|(index, briefing)| {
            let mut lines = vec![
                format!("## {}. {}", index + 1, briefing.title),
                String::new(),
            ];
            push_body(&mut lines, briefing, "###");
            lines.extend([String::new(), "---".to_string(), String::new()]);
            lines.join("\n")
        })
        .collect();

    header + &sections.join("\n")
}

/// File stem for a briefing exported on `date`:
/// `briefing-<slug>-<YYYY-MM-DD>`.
///
/// ```
/// # use briefing_export::{BriefingKind, BriefingResult, ExportableBriefing, filename_for};
/// # use chrono::{NaiveDate, Utc};
/// # let briefing = ExportableBriefing::from_result(
/// #     BriefingResult { title: "AI & Machine Learning: Future Tech!".into(), summary: String::new(), tweets: vec![], sources: vec![] },
/// #     BriefingKind::Personal,
/// #     Utc::now(),
/// # );
/// let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
/// assert_eq!(
///     filename_for(&briefing, date),
///     "briefing-ai-machine-learning-future-tech-2025-03-14"
/// );
/// ```
#[must_use]
pub fn filename_for(briefing: &ExportableBriefing, date: NaiveDate) -> String {
    let lowered = briefing.title.to_lowercase();
    let slug = NON_SLUG.replace_all(&lowered, "-");
    format!(
        "briefing-{}-{}",
        slug.trim_matches('-'),
        date.format("%Y-%m-%d")
    )
}

/// Writes `content` to `<dir>/<stem>.md` and returns the path.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the directory or file cannot be written.
pub fn save_markdown(dir: &Path, stem: &str, content: &str) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{stem}.md"));
    std::fs::create_dir_all(dir)
        .and_then(|()| std::fs::write(&path, content))
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
    tracing::info!(path = %path.display(), bytes = content.len(), "markdown export written");
    Ok(path)
}

fn push_body(lines: &mut Vec<String>, briefing: &ExportableBriefing, heading: &str) {
    lines.extend([
        format!("Generated: {}", timestamp(briefing.generated_at)),
        format!("Type: {}", briefing.kind.label()),
        format!("Sources: {}", briefing.sources.len()),
        String::new(),
        format!("{heading} Summary"),
        String::new(),
        briefing.summary.clone(),
        String::new(),
        format!("{heading} Satirical Tweets"),
        String::new(),
    ]);
    lines.extend(briefing.tweets.iter().map(|tweet| format_tweet(tweet)));
    lines.extend([String::new(), format!("{heading} Sources"), String::new()]);
    lines.push(
        briefing
            .sources
            .iter()
            .map(|source| format!("- {source}"))
            .collect::<Vec<_>>()
            .join("\n"),
    );
}

/// Strips hashtags and quotes the tweet.
fn format_tweet(tweet: &str) -> String {
    format!("> {}", HASHTAG.replace_all(tweet, "").trim())
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap()
    }

    fn ai_briefing(kind: BriefingKind) -> ExportableBriefing {
        ExportableBriefing::from_result(
            BriefingResult {
                title: "Artificial Intelligence".into(),
                summary: "AI is transforming technology.".into(),
                tweets: vec![
                    "🤖 AI is getting smarter every day! #AI #Technology".into(),
                    "The future is here! 🚀 #Innovation".into(),
                ],
                sources: vec![
                    "MIT Technology Review".into(),
                    "Nature".into(),
                    "Science Magazine".into(),
                ],
            },
            kind,
            at(),
        )
    }

    #[test]
    fn regexes_compile() {
        LazyLock::force(&HASHTAG);
        LazyLock::force(&NON_SLUG);
    }

    #[test]
    fn single_layout() {
        let markdown = export_single(&ai_briefing(BriefingKind::Personal));
        let expected = "\
# Artificial Intelligence

Generated: 2025-06-01T09:30:00.000Z
Type: Personal Interest
Sources: 3

## Summary

AI is transforming technology.

## Satirical Tweets

> 🤖 AI is getting smarter every day!
> The future is here! 🚀

## Sources

- MIT Technology Review
- Nature
- Science Magazine";
        assert_eq!(markdown, expected);
    }

    #[test]
    fn multiple_layout() {
        let briefings = [
            ai_briefing(BriefingKind::Personal),
            ai_briefing(BriefingKind::Trending),
        ];
        let markdown = export_multiple(&briefings, at());

        assert!(markdown.starts_with(
            "# Daily Briefing AI Report\n\nGenerated: 2025-06-01T09:30:00.000Z\nTotal Briefings: 2\n## 1. Artificial Intelligence\n"
        ));
        assert!(markdown.contains("## 2. Artificial Intelligence"));
        assert!(markdown.contains("### Satirical Tweets"));
        assert!(markdown.contains("Type: Trending Topic"));
        assert_eq!(markdown.matches("\n---\n").count(), 2);
    }

    #[test]
    fn empty_report_has_header_only() {
        let markdown = export_multiple(&[], at());
        assert!(markdown.ends_with("Total Briefings: 0\n"));
    }

    #[test]
    fn filename_is_sanitized() {
        let mut briefing = ai_briefing(BriefingKind::Personal);
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            filename_for(&briefing, date),
            "briefing-artificial-intelligence-2025-06-01"
        );

        briefing.title = "--Héllo, World!--".into();
        assert_eq!(filename_for(&briefing, date), "briefing-h-llo-world-2025-06-01");
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_value(ai_briefing(BriefingKind::Trending)).unwrap();
        assert_eq!(json["type"], "trending");
        assert_eq!(json["generatedAt"], "2025-06-01T09:30:00Z");
    }

    #[test]
    fn save_writes_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_markdown(&dir.path().join("exports"), "daily-briefings", "# Hi").unwrap();
        assert_eq!(path.file_name().unwrap(), "daily-briefings.md");
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Hi");
    }
}
