//! Dual-document diff and highlight reconciliation for `docdelta_ir::Document`.
//!
//! This crate flattens the text of two HTML documents into token sequences,
//! aligns them with a shortest-edit-script diff, and re-injects highlight
//! markers into both trees so each side can be reviewed on its own.
//!
//! Primary entrypoints:
//! - [`diff_html`]
//! - [`diff_documents`] / [`diff_documents_with_ids`]
//! - [`format_markdown_report`]
//!
//! The pipeline stages are public as well: [`tokenize`], [`flatten`],
//! [`align`], [`classify`], [`locate`], [`apply_highlights`].
//!
//! # Example
//!
//! ```rust
//! use docdelta_diff::{DiffOptions, diff_html};
//!
//! let result = diff_html(
//!     "<p>Hello world</p>",
//!     "<p>Hello brave world</p>",
//!     &DiffOptions::default(),
//! )
//! .unwrap();
//! assert!(result.has_changes);
//! assert_eq!(result.stats.inserted_tokens, 2);
//! assert_eq!(result.diff_items[0].modified_text, "brave ");
//! ```

mod align;
mod classify;
mod engine;
mod error;
mod findings;
mod flatten;
mod highlight;
mod inline;
mod locate;
mod model;
mod normalize;
mod report;
mod tokenize;

pub use align::{align, validate_opcodes};
pub use classify::{Classification, classify};
pub use engine::{diff_documents, diff_documents_with_ids, diff_html};
pub use error::{DiffError, Result};
pub use flatten::{DocumentView, LeafSpan, flatten};
pub use highlight::apply_highlights;
pub use locate::locate;
pub use model::{
    DeleteAnchor, DiffIdAllocator, DiffItem, DiffKind, DiffLocation, DiffOpcode, DiffOptions,
    DiffResult, DiffStats, Finding, FindingLevel, HighlightEntry, HighlightSet, ItemAnchor,
    MarkInfo, MarkerStyle, OpKind, Role, SummaryLimits, Token,
};
pub use report::format_markdown_report;
pub use tokenize::{is_cjk, is_punctuation, tokenize};
