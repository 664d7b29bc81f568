//! Line classification.
//!
//! Every input line is matched against [`RULES`], an ordered table of
//! predicate/handler pairs. The first rule that accepts the line decides its
//! kind, so the table order *is* the precedence contract: blank, header,
//! numbered, bullet, code, paragraph.

use std::sync::LazyLock;

use regex::Regex;

/// The bullet glyph that marks a bulleted list line.
pub const BULLET: char = '•';

/// Substrings that mark a line as code wherever they appear.
pub const CODE_KEYWORDS: [&str; 4] = ["def ", "function ", "const ", "import "];

/// Leading indentation (in spaces) that marks a line as code.
pub const CODE_INDENT: &str = "    ";

static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)\.\s*(.*)$").expect("numbered-item regex"));

static ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*\s*[=:({]").expect("assignment regex")
});

/// What a single line turned out to be.
///
/// Borrowed slices point into the line that was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Header(&'a str),
    Numbered { number: u64, content: &'a str },
    Bullet(&'a str),
    /// Holds the original, untrimmed line.
    Code(&'a str),
    Paragraph(&'a str),
}

impl LineKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            LineKind::Blank => "blank",
            LineKind::Header(_) => "header",
            LineKind::Numbered { .. } => "numbered",
            LineKind::Bullet(_) => "bullet",
            LineKind::Code(_) => "code",
            LineKind::Paragraph(_) => "paragraph",
        }
    }
}

/// Classifier signature: `(raw_line, trimmed_line) -> Some(kind)` on a match.
pub type ClassifyFn = for<'a> fn(&'a str, &'a str) -> Option<LineKind<'a>>;

/// One entry of the precedence table.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub classify: ClassifyFn,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Classification rules, highest priority first. Do not reorder.
pub const RULES: &[Rule] = &[
    Rule {
        name: "blank",
        classify: blank,
    },
    Rule {
        name: "header",
        classify: header,
    },
    Rule {
        name: "numbered",
        classify: numbered,
    },
    Rule {
        name: "bullet",
        classify: bullet,
    },
    Rule {
        name: "code",
        classify: code,
    },
    Rule {
        name: "paragraph",
        classify: paragraph,
    },
];

/// Classify one line (without its trailing newline).
///
/// Total: the paragraph rule accepts anything the earlier rules rejected.
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    RULES
        .iter()
        .find_map(|rule| (rule.classify)(line, trimmed))
        .unwrap_or(LineKind::Paragraph(trimmed))
}

// ------------------------------------------------------------------
// Rules
// ------------------------------------------------------------------

fn blank<'a>(_line: &'a str, trimmed: &'a str) -> Option<LineKind<'a>> {
    trimmed.is_empty().then_some(LineKind::Blank)
}

/// `**content**` with at least one character between the marker pairs.
fn header<'a>(_line: &'a str, trimmed: &'a str) -> Option<LineKind<'a>> {
    if trimmed.len() > 4 && trimmed.starts_with("**") && trimmed.ends_with("**") {
        Some(LineKind::Header(&trimmed[2..trimmed.len() - 2]))
    } else {
        None
    }
}

fn numbered<'a>(_line: &'a str, trimmed: &'a str) -> Option<LineKind<'a>> {
    let caps = NUMBERED_RE.captures(trimmed)?;
    // A digit run too long for u64 is left to the later rules.
    let number = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let content = caps.get(2).map_or("", |m| m.as_str());
    Some(LineKind::Numbered { number, content })
}

fn bullet<'a>(_line: &'a str, trimmed: &'a str) -> Option<LineKind<'a>> {
    trimmed
        .strip_prefix(BULLET)
        .map(|rest| LineKind::Bullet(rest.trim_start()))
}

fn code<'a>(line: &'a str, trimmed: &'a str) -> Option<LineKind<'a>> {
    let is_code = line.starts_with(CODE_INDENT)
        || CODE_KEYWORDS.iter().any(|kw| trimmed.contains(kw))
        || ASSIGNMENT_RE.is_match(trimmed);
    is_code.then_some(LineKind::Code(line))
}

fn paragraph<'a>(_line: &'a str, trimmed: &'a str) -> Option<LineKind<'a>> {
    Some(LineKind::Paragraph(trimmed))
}

/// `true` when a code line was recognised only through keywords or the
/// assignment pattern, not through indentation.
pub fn is_heuristic_code(line: &str) -> bool {
    !line.starts_with(CODE_INDENT) && matches!(code(line, line.trim()), Some(LineKind::Code(_)))
}
