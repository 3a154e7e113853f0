use docdelta_ir::{Document, parse_html};
use tracing::debug;

use crate::Result;
use crate::align::align;
use crate::classify::classify;
use crate::findings::collect_findings;
use crate::flatten::{DocumentView, flatten};
use crate::highlight::apply_highlights;
use crate::inline::render_inline;
use crate::locate::locate;
use crate::model::{DiffIdAllocator, DiffOptions, DiffResult, HighlightEntry, Role};

/// Parse and diff two HTML bodies.
pub fn diff_html(original: &str, modified: &str, options: &DiffOptions) -> Result<DiffResult> {
    diff_documents(parse_html(original), parse_html(modified), options)
}

/// Diff two already parsed documents. Ids start at `diff-1`.
pub fn diff_documents(
    original: Document,
    modified: Document,
    options: &DiffOptions,
) -> Result<DiffResult> {
    diff_documents_with_ids(original, modified, options, &mut DiffIdAllocator::default())
}

/// Diff two documents, drawing ids from a caller-owned allocator.
///
/// Ids stay unique across calls that share `ids`.
pub fn diff_documents_with_ids(
    original: Document,
    modified: Document,
    options: &DiffOptions,
    ids: &mut DiffIdAllocator,
) -> Result<DiffResult> {
    let original = flatten(original);
    let modified = flatten(modified);

    let opcodes = align(original.tokens(), modified.tokens())?;
    let mut classification = classify(
        &opcodes,
        original.tokens(),
        modified.tokens(),
        options,
        ids,
    )?;

    for (item, anchor) in classification
        .items
        .iter_mut()
        .zip(&classification.anchors)
    {
        item.original_location = locate(&original, anchor.original, &options.summary);
        item.modified_location = locate(&modified, anchor.modified, &options.summary);
    }

    let findings = collect_findings(&original, &modified);
    let diff_html = options
        .inline_view
        .then(|| render_inline(&opcodes, original.tokens(), modified.tokens()));

    let highlights = &classification.highlights;
    let highlighted_original = render_side(original, highlights.side(Role::Original), options);
    let highlighted_modified = render_side(modified, highlights.side(Role::Modified), options);

    debug!(
        items = classification.items.len(),
        findings = findings.len(),
        "diff complete"
    );

    Ok(DiffResult {
        diff_html,
        has_changes: !classification.items.is_empty(),
        stats: classification.stats,
        diff_items: classification.items,
        highlighted_original,
        highlighted_modified,
        findings,
    })
}

fn render_side(
    view: DocumentView,
    entries: &[HighlightEntry],
    options: &DiffOptions,
) -> String {
    apply_highlights(view, entries, &options.markers).render()
}
