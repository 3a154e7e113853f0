use std::fmt;
use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Atomic unit of comparison. Two tokens are equal only when their text is identical.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Token {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl From<String> for Token {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl PartialEq<&str> for Token {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opcode tag emitted by the aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Equal,
    Insert,
    Delete,
    Replace,
}

/// One contiguous aligned span: original `[i1, i2)` against modified `[j1, j2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOpcode {
    pub kind: OpKind,
    pub i1: usize,
    pub i2: usize,
    pub j1: usize,
    pub j2: usize,
}

impl DiffOpcode {
    /// Both ranges are empty.
    pub fn is_degenerate(&self) -> bool {
        self.i1 == self.i2 && self.j1 == self.j2
    }
}

/// Kind of a reported difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    Insert,
    Delete,
    Replace,
}

impl DiffKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiffKind::Insert => "insert",
            DiffKind::Delete => "delete",
            DiffKind::Replace => "replace",
        }
    }

    /// Human-facing label used in marker tooltips and reports.
    pub fn label(self) -> &'static str {
        match self {
            DiffKind::Insert => "Inserted",
            DiffKind::Delete => "Deleted",
            DiffKind::Replace => "Replaced",
        }
    }
}

/// Which of the two documents a highlight or finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Original,
    Modified,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Original => "original",
            Role::Modified => "modified",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared marker metadata for span and boundary highlights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkInfo {
    pub id: String,
    pub kind: DiffKind,
    pub role: Role,
    pub label: Option<String>,
    pub number: Option<usize>,
}

impl MarkInfo {
    /// Tooltip text composed from label and number, when present.
    pub fn tooltip(&self) -> Option<String> {
        match (&self.label, self.number) {
            (Some(label), Some(number)) => Some(format!("{label} #{number}")),
            (Some(label), None) => Some(label.clone()),
            (None, Some(number)) => Some(format!("#{number}")),
            (None, None) => None,
        }
    }
}

/// A highlight request for one side of the diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "anchor", rename_all = "snake_case")]
pub enum HighlightEntry {
    /// Wrap the half-open token range `[start, end)`.
    Span {
        mark: MarkInfo,
        start: usize,
        end: usize,
    },
    /// Insert a zero-width placeholder before token offset `at`.
    Boundary { mark: MarkInfo, at: usize },
}

impl HighlightEntry {
    pub fn mark(&self) -> &MarkInfo {
        match self {
            HighlightEntry::Span { mark, .. } | HighlightEntry::Boundary { mark, .. } => mark,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, HighlightEntry::Boundary { .. })
    }
}

/// Highlight entries for both sides, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HighlightSet {
    pub original: Vec<HighlightEntry>,
    pub modified: Vec<HighlightEntry>,
}

impl HighlightSet {
    pub fn side(&self, role: Role) -> &[HighlightEntry] {
        match role {
            Role::Original => &self.original,
            Role::Modified => &self.modified,
        }
    }

    pub(crate) fn side_mut(&mut self, role: Role) -> &mut Vec<HighlightEntry> {
        match role {
            Role::Original => &mut self.original,
            Role::Modified => &mut self.modified,
        }
    }
}

/// Human-readable position of a difference.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_summary: Option<String>,
}

/// One reported difference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: DiffKind,
    pub original_text: String,
    pub modified_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_location: Option<DiffLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_location: Option<DiffLocation>,
}

/// Token offsets a [`DiffItem`] starts at on each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAnchor {
    pub original: usize,
    pub modified: usize,
}

/// Aggregate token counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffStats {
    pub inserted_tokens: usize,
    pub deleted_tokens: usize,
    pub replaced_tokens: usize,
}

impl DiffStats {
    pub fn total(&self) -> usize {
        self.inserted_tokens + self.deleted_tokens + self.replaced_tokens
    }
}

/// Warning/info emitted for parse uncertainty or degraded input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub code: String,
    pub level: FindingLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Role>,
}

/// Severity level for a [`Finding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingLevel {
    Warning,
    Info,
}

/// Top-level diff output contract.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Legacy single-document `<ins>`/`<del>` rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_html: Option<String>,
    pub has_changes: bool,
    pub stats: DiffStats,
    pub diff_items: Vec<DiffItem>,
    pub highlighted_original: String,
    pub highlighted_modified: String,
    pub findings: Vec<Finding>,
}

impl DiffResult {
    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Where the modified-side placeholder of a delete at end of document is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteAnchor {
    /// Anchor at `len(modified)`, after the last token.
    #[default]
    EndOfDocument,
    /// Clamp to `len(modified) - 1`, before the last token.
    ClampToLastToken,
}

/// Marker element naming used by the highlight injector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerStyle {
    pub tag: String,
    pub mark_class: String,
    pub placeholder_class: String,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            tag: "span".to_string(),
            mark_class: "diff-mark".to_string(),
            placeholder_class: "diff-placeholder".to_string(),
        }
    }
}

/// Character limits for location excerpts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryLimits {
    pub block_chars: usize,
    pub title_chars: usize,
}

impl Default for SummaryLimits {
    fn default() -> Self {
        Self {
            block_chars: 80,
            title_chars: 60,
        }
    }
}

/// Options controlling classification, location, and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffOptions {
    pub delete_anchor: DeleteAnchor,
    pub inline_view: bool,
    pub markers: MarkerStyle,
    pub summary: SummaryLimits,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            delete_anchor: DeleteAnchor::default(),
            inline_view: true,
            markers: MarkerStyle::default(),
            summary: SummaryLimits::default(),
        }
    }
}

impl DiffOptions {
    pub fn with_delete_anchor(mut self, delete_anchor: DeleteAnchor) -> Self {
        self.delete_anchor = delete_anchor;
        self
    }

    /// Enable or disable the legacy `diffHtml` rendering.
    pub fn with_inline_view(mut self, inline_view: bool) -> Self {
        self.inline_view = inline_view;
        self
    }

    pub fn with_markers(mut self, markers: MarkerStyle) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_summary_limits(mut self, summary: SummaryLimits) -> Self {
        self.summary = summary;
        self
    }
}

/// Sequential `diff-N` id source, threaded through classification.
///
/// A fresh allocator starts at `diff-1`. Reuse one allocator across calls to
/// keep ids unique over several diffs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffIdAllocator {
    next: usize,
}

impl Default for DiffIdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl DiffIdAllocator {
    pub fn starting_at(next: usize) -> Self {
        Self { next }
    }

    pub fn allocate(&mut self) -> String {
        let id = format!("diff-{}", self.next);
        self.next += 1;
        id
    }

    /// Number the next allocation will use.
    pub fn peek(&self) -> usize {
        self.next
    }
}
