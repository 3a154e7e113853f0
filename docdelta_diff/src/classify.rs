use tracing::debug;

use crate::error::{DiffError, Result};

use crate::model::{
    DeleteAnchor, DiffIdAllocator, DiffItem, DiffKind, DiffOpcode, DiffOptions, DiffStats,
    HighlightEntry, HighlightSet, ItemAnchor, MarkInfo, OpKind, Role, Token,
};

/// Diff items, per-side highlights, and stats derived from one opcode list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub items: Vec<DiffItem>,
    /// Start offsets of each item, parallel to `items`.
    pub anchors: Vec<ItemAnchor>,
    pub highlights: HighlightSet,
    pub stats: DiffStats,
}

/// Convert opcodes into diff items and highlight entries.
///
/// Ids come from `ids` in opcode order, one per emitted item regardless of
/// kind. Zero-length inserts/deletes and degenerate opcodes are skipped
/// without consuming an id. Ranges outside either sequence are rejected
/// before any id is allocated.
pub fn classify(
    opcodes: &[DiffOpcode],
    original: &[Token],
    modified: &[Token],
    options: &DiffOptions,
    ids: &mut DiffIdAllocator,
) -> Result<Classification> {
    check_ranges(opcodes, original.len(), modified.len())?;
    let mut out = Classification::default();

    for op in opcodes {
        if op.is_degenerate() {
            continue;
        }

        let kind = match op.kind {
            OpKind::Equal => continue,
            OpKind::Insert if op.j1 == op.j2 => continue,
            OpKind::Delete if op.i1 == op.i2 => continue,
            OpKind::Insert => DiffKind::Insert,
            OpKind::Delete => DiffKind::Delete,
            OpKind::Replace => DiffKind::Replace,
        };

        let id = ids.allocate();
        let number = out.items.len() + 1;
        let mark = |role: Role| MarkInfo {
            id: id.clone(),
            kind,
            role,
            label: Some(kind.label().to_string()),
            number: Some(number),
        };

        match kind {
            DiffKind::Insert => {
                out.stats.inserted_tokens += op.j2 - op.j1;
                out.highlights.modified.push(HighlightEntry::Span {
                    mark: mark(Role::Modified),
                    start: op.j1,
                    end: op.j2,
                });
                out.highlights.original.push(HighlightEntry::Boundary {
                    mark: mark(Role::Original),
                    at: op.i1,
                });
            }
            DiffKind::Delete => {
                out.stats.deleted_tokens += op.i2 - op.i1;
                out.highlights.original.push(HighlightEntry::Span {
                    mark: mark(Role::Original),
                    start: op.i1,
                    end: op.i2,
                });
                out.highlights.modified.push(HighlightEntry::Boundary {
                    mark: mark(Role::Modified),
                    at: delete_boundary(op.j1, modified.len(), options.delete_anchor),
                });
            }
            DiffKind::Replace => {
                out.stats.replaced_tokens += (op.i2 - op.i1).max(op.j2 - op.j1);
                for (role, start, end) in [
                    (Role::Original, op.i1, op.i2),
                    (Role::Modified, op.j1, op.j2),
                ] {
                    if start != end {
                        out.highlights.side_mut(role).push(HighlightEntry::Span {
                            mark: mark(role),
                            start,
                            end,
                        });
                    }
                }
            }
        }

        out.items.push(DiffItem {
            id,
            kind,
            original_text: join_tokens(&original[op.i1..op.i2]),
            modified_text: join_tokens(&modified[op.j1..op.j2]),
            original_location: None,
            modified_location: None,
        });
        out.anchors.push(ItemAnchor {
            original: op.i1,
            modified: op.j1,
        });
    }

    debug!(
        items = out.items.len(),
        inserted = out.stats.inserted_tokens,
        deleted = out.stats.deleted_tokens,
        replaced = out.stats.replaced_tokens,
        "classified opcodes"
    );

    Ok(out)
}

fn check_ranges(opcodes: &[DiffOpcode], original_len: usize, modified_len: usize) -> Result<()> {
    for (index, op) in opcodes.iter().enumerate() {
        for (side, lo, hi, len) in [
            (Role::Original, op.i1, op.i2, original_len),
            (Role::Modified, op.j1, op.j2, modified_len),
        ] {
            if lo > hi || hi > len {
                return Err(DiffError::OpcodeOutOfRange { index, side, len });
            }
        }
    }
    Ok(())
}

fn delete_boundary(j1: usize, modified_len: usize, anchor: DeleteAnchor) -> usize {
    match anchor {
        DeleteAnchor::EndOfDocument => j1.min(modified_len),
        DeleteAnchor::ClampToLastToken if j1 >= modified_len => modified_len.saturating_sub(1),
        DeleteAnchor::ClampToLastToken => j1,
    }
}

pub(crate) fn join_tokens(tokens: &[Token]) -> String {
    tokens.iter().map(Token::as_str).collect()
}
