//! Response shaping.
//!
//! Raw model answers are cleaned up before they reach the formatter: verbose
//! lead-ins and repeated sentences are removed, bullets are normalised to the
//! `•` glyph the formatter recognises, and the answer is cut down according
//! to the intent of the question.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Lead-in phrases removed up to (and including) the end of their sentence.
const VERBOSE_LEAD_INS: [&str; 9] = [
    "Based on the provided context,",
    "According to the information provided,",
    "The question asks",
    "Therefore, the answer",
    "In conclusion,",
    "To summarize,",
    "Let me explain",
    "I can help you",
    "Here's what",
];

/// Maximum number of bullet lines kept in a technical answer.
const MAX_TECHNICAL_BULLETS: usize = 5;

static VERBOSE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    VERBOSE_LEAD_INS
        .iter()
        .map(|lead| {
            Regex::new(&format!(r"(?is){}.*?[.!?]\s*", regex::escape(lead)))
                .expect("lead-in regex")
        })
        .collect()
});

static SENTENCE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+\s+").expect("sentence regex"));
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("punctuation regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static EXAMPLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(for example:|example:)[^.]*").expect("example regex"));
static FILLER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(Please provide.*?\.\s*)+",
        r"(Answer:.*?\.\s*)+",
        r"(Note:.*?\.\s*)+",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("filler regex"))
    .collect()
});
static EXCESS_BLANK_LINES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n\s*\n+").expect("blank-line regex"));
static SPACE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\S) {2,}").expect("space regex"));
static BULLET_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[*\-•]\s*").expect("bullet regex"));
static NUMBERED_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.").expect("numbered regex"));
static DEF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"def\s+\w+").expect("def regex"));
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?\n(.*?)```").expect("fence regex"));

/// What kind of question an answer responds to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Technical,
    Code,
    DocumentQuery,
    #[default]
    General,
}

impl Intent {
    pub fn as_str(self) -> &'static str {
        match self {
            Intent::Technical => "technical",
            Intent::Code => "code",
            Intent::DocumentQuery => "document_query",
            Intent::General => "general",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown intent names fall back to [`Intent::General`].
impl FromStr for Intent {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "technical" => Intent::Technical,
            "code" => Intent::Code,
            "document_query" | "document" => Intent::DocumentQuery,
            _ => Intent::General,
        })
    }
}

/// Shapes raw answers into formatter-friendly text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFormatter {
    pub max_response_length: usize,
    pub code_max_length: usize,
    pub technical_max_length: usize,
    pub document_max_length: usize,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(800)
    }
}

impl ResponseFormatter {
    pub fn new(max_response_length: usize) -> Self {
        Self {
            max_response_length,
            code_max_length: 1200,
            technical_max_length: 1000,
            document_max_length: 1000,
        }
    }

    /// Length limit for answers of the given intent.
    pub fn limit_for(&self, intent: Intent) -> usize {
        match intent {
            Intent::Technical => self.technical_max_length,
            Intent::Code => self.code_max_length,
            Intent::DocumentQuery => self.document_max_length,
            Intent::General => self.max_response_length,
        }
    }

    /// Clean `response` and apply the intent-specific pass.
    ///
    /// Nothing is truncated here; the chat view decides on previews.
    pub fn format_response(&self, response: &str, intent: Intent) -> String {
        if response.is_empty() {
            return String::new();
        }

        let cleaned = self.clean_response(response);
        log::debug!(
            "cleaned {} -> {} chars for {intent} answer",
            response.chars().count(),
            cleaned.chars().count()
        );

        match intent {
            Intent::Technical => format_technical(&cleaned),
            Intent::Code => format_code(&cleaned),
            Intent::DocumentQuery => first_sentences(&cleaned, 3),
            Intent::General => first_sentences(&cleaned, 2),
        }
    }

    /// Remove lead-ins, repeated sentences, extra examples and filler.
    ///
    /// Runs of spaces inside a line collapse to one; leading indentation is kept.
    pub fn clean_response(&self, response: &str) -> String {
        let mut text = response.to_string();
        for re in VERBOSE_RES.iter() {
            text = re.replace_all(&text, "").into_owned();
        }

        text = remove_duplicate_sentences(&text);
        text = trim_examples(&text);

        for re in FILLER_RES.iter() {
            text = re.replace_all(&text, "").into_owned();
        }

        let text = EXCESS_BLANK_LINES_RE.replace_all(&text, "\n\n");
        let text = SPACE_RUN_RE.replace_all(&text, "${1} ");
        text.trim().to_string()
    }

    /// Cut `response` to `max_length` characters (default: `max_response_length`).
    ///
    /// A sentence end past 60% of the limit is preferred and kept without an
    /// ellipsis; otherwise a space past 80%; otherwise a hard cut.
    pub fn truncate_response(&self, response: &str, max_length: Option<usize>) -> String {
        let max_length = max_length.unwrap_or(self.max_response_length);
        let Some((cut, _)) = response.char_indices().nth(max_length) else {
            return response.to_string();
        };
        let head = &response[..cut];
        let limit = max_length as f64;

        for punct in ['.', '!', '?'] {
            if let Some((char_idx, byte_idx)) = last_char_position(head, |c| c == punct) {
                if char_idx as f64 > limit * 0.6 {
                    return head[..byte_idx + punct.len_utf8()].to_string();
                }
            }
        }

        if let Some((char_idx, byte_idx)) = last_char_position(head, |c| c == ' ') {
            if char_idx as f64 > limit * 0.8 {
                return format!("{}...", &head[..byte_idx]);
            }
        }

        format!("{head}...")
    }
}

/// `(char_index, byte_index)` of the last char matching `pred`.
fn last_char_position(text: &str, pred: impl Fn(char) -> bool) -> Option<(usize, usize)> {
    text.char_indices()
        .enumerate()
        .filter(|(_, (_, c))| pred(*c))
        .last()
        .map(|(char_idx, (byte_idx, _))| (char_idx, byte_idx))
}

// ------------------------------------------------------------------
// Sentence helpers
// ------------------------------------------------------------------

/// Split on sentence terminators followed by whitespace; terminators are dropped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_END_RE
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Lowercase, strip punctuation, collapse whitespace.
fn normalise_sentence(sentence: &str) -> String {
    let lower = sentence.to_lowercase();
    let stripped = PUNCTUATION_RE.replace_all(&lower, "");
    WHITESPACE_RE.replace_all(stripped.trim(), " ").into_owned()
}

/// Drop sentences whose normalised form was already seen.
///
/// Kept sentences retain their original terminator and separator, so line
/// breaks (and the list markers after them) survive.
fn remove_duplicate_sentences(text: &str) -> String {
    let mut seen = HashSet::new();
    let mut out = String::with_capacity(text.len());
    let mut start = 0;

    let mut keep = |segment: &str, out: &mut String| {
        let normalised = normalise_sentence(segment);
        if normalised.is_empty() {
            return;
        }
        // Bare list numbers ("1. ") repeat legitimately.
        let is_list_number = normalised.chars().all(|c| c.is_ascii_digit());
        if is_list_number || seen.insert(normalised) {
            out.push_str(segment);
        }
    };

    for m in SENTENCE_END_RE.find_iter(text) {
        keep(&text[start..m.end()], &mut out);
        start = m.end();
    }
    if start < text.len() {
        keep(&text[start..], &mut out);
    }

    out
}

/// Keep only the first `For example:` passage.
fn trim_examples(text: &str) -> String {
    match EXAMPLE_RE.find_iter(text).nth(1) {
        Some(second) if second.start() > 0 => text[..second.start()].trim().to_string(),
        _ => text.to_string(),
    }
}

/// First `count` sentences joined with `. ` and closed with a period.
fn first_sentences(text: &str, count: usize) -> String {
    let sentences: Vec<&str> = split_sentences(text)
        .into_iter()
        .take(count)
        .map(|s| s.trim_end_matches(['.', '!', '?']))
        .collect();
    if sentences.is_empty() {
        return text.to_string();
    }
    format!("{}.", sentences.join(". "))
}

// ------------------------------------------------------------------
// Intent-specific passes
// ------------------------------------------------------------------

fn format_technical(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut bullets = 0;

    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let is_header = line.len() > 4 && line.starts_with("**") && line.ends_with("**");
        let is_bullet = !line.starts_with("**")
            && (line.starts_with('•') || line.starts_with('*') || line.starts_with('-'));

        if is_header || NUMBERED_PREFIX_RE.is_match(line) {
            lines.push(line.to_string());
        } else if is_bullet {
            if bullets < MAX_TECHNICAL_BULLETS {
                lines.push(BULLET_PREFIX_RE.replace(line, "• ").into_owned());
                bullets += 1;
            }
        } else {
            lines.push(line.to_string());
        }
    }

    EXCESS_BLANK_LINES_RE
        .replace_all(&lines.join("\n"), "\n\n")
        .into_owned()
}

fn format_code(text: &str) -> String {
    if let Some(m) = DEF_RE.find(text) {
        let rest = &text[m.end()..];
        let end = rest.find("\ndef").map_or(text.len(), |i| m.end() + i);
        return text[m.start()..end].trim().to_string();
    }

    if let Some(body) = FENCE_RE.captures(text).and_then(|c| c.get(1)) {
        return body.as_str().trim().to_string();
    }

    text.trim().to_string()
}
