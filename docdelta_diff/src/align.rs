use similar::{Algorithm, DiffTag, capture_diff_slices};
use tracing::debug;

use crate::error::{DiffError, Result};
use crate::model::{DiffOpcode, OpKind, Role, Token};

/// Align two token sequences into contiguous `equal/insert/delete/replace` opcodes.
///
/// A run of edits containing both deletions and insertions is reported as a
/// single `replace`. The returned opcodes are checked to partition both
/// sequences; a violation is an error rather than a partial result.
pub fn align(original: &[Token], modified: &[Token]) -> Result<Vec<DiffOpcode>> {
    let mut opcodes: Vec<DiffOpcode> = Vec::new();
    for op in capture_diff_slices(Algorithm::Myers, original, modified) {
        let (tag, old, new) = op.as_tag_tuple();
        push_opcode(
            &mut opcodes,
            DiffOpcode {
                kind: op_kind(tag),
                i1: old.start,
                i2: old.end,
                j1: new.start,
                j2: new.end,
            },
        );
    }

    validate_opcodes(&opcodes, original.len(), modified.len())?;

    debug!(
        original_tokens = original.len(),
        modified_tokens = modified.len(),
        opcodes = opcodes.len(),
        "aligned token sequences"
    );

    Ok(opcodes)
}

/// Check that opcodes are contiguous, in order, and cover both sequences.
pub fn validate_opcodes(
    opcodes: &[DiffOpcode],
    original_len: usize,
    modified_len: usize,
) -> Result<()> {
    let mut i = 0usize;
    let mut j = 0usize;

    for (index, op) in opcodes.iter().enumerate() {
        if op.i1 != i || op.j1 != j || op.i2 < op.i1 || op.j2 < op.j1 {
            return Err(DiffError::DiscontiguousOpcode { index });
        }
        let consistent = match op.kind {
            OpKind::Equal => op.i2 - op.i1 == op.j2 - op.j1,
            OpKind::Insert => op.i1 == op.i2,
            OpKind::Delete => op.j1 == op.j2,
            OpKind::Replace => true,
        };
        if !consistent {
            return Err(DiffError::DiscontiguousOpcode { index });
        }
        i = op.i2;
        j = op.j2;
    }

    if i != original_len {
        return Err(DiffError::InvalidAlignment {
            side: Role::Original,
            expected: original_len,
            covered: i,
        });
    }
    if j != modified_len {
        return Err(DiffError::InvalidAlignment {
            side: Role::Modified,
            expected: modified_len,
            covered: j,
        });
    }

    Ok(())
}

fn op_kind(tag: DiffTag) -> OpKind {
    match tag {
        DiffTag::Equal => OpKind::Equal,
        DiffTag::Delete => OpKind::Delete,
        DiffTag::Insert => OpKind::Insert,
        DiffTag::Replace => OpKind::Replace,
    }
}

/// Append an opcode, merging it into the previous one when both are equal runs
/// or both are edits. Adjacent edits always collapse into one `replace`.
fn push_opcode(opcodes: &mut Vec<DiffOpcode>, op: DiffOpcode) {
    if op.i1 == op.i2 && op.j1 == op.j2 {
        return;
    }
    if let Some(last) = opcodes.last_mut()
        && (last.kind == OpKind::Equal) == (op.kind == OpKind::Equal)
    {
        last.i2 = op.i2;
        last.j2 = op.j2;
        if last.kind != OpKind::Equal {
            last.kind = match (last.i2 > last.i1, last.j2 > last.j1) {
                (true, true) => OpKind::Replace,
                (true, false) => OpKind::Delete,
                _ => OpKind::Insert,
            };
        }
        return;
    }
    opcodes.push(op);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::tokenize;

    fn kinds(opcodes: &[DiffOpcode]) -> Vec<OpKind> {
        opcodes.iter().map(|op| op.kind).collect()
    }

    #[test]
    fn identical_sequences_are_one_equal_run() {
        let a = tokenize("one two three");
        let opcodes = align(&a, &a).expect("align");
        assert_eq!(
            opcodes,
            vec![DiffOpcode {
                kind: OpKind::Equal,
                i1: 0,
                i2: 5,
                j1: 0,
                j2: 5
            }]
        );
    }

    #[test]
    fn inserted_word_groups_with_trailing_space() {
        let a = tokenize("Hello world");
        let b = tokenize("Hello brave world");
        let opcodes = align(&a, &b).expect("align");

        assert_eq!(
            kinds(&opcodes),
            vec![OpKind::Equal, OpKind::Insert, OpKind::Equal]
        );
        assert_eq!((opcodes[1].i1, opcodes[1].i2), (2, 2));
        assert_eq!((opcodes[1].j1, opcodes[1].j2), (2, 4));
    }

    #[test]
    fn substitution_becomes_replace() {
        let a = tokenize("A B C");
        let b = tokenize("A X C");
        let opcodes = align(&a, &b).expect("align");

        assert_eq!(
            kinds(&opcodes),
            vec![OpKind::Equal, OpKind::Replace, OpKind::Equal]
        );
        assert_eq!(
            (opcodes[1].i1, opcodes[1].i2, opcodes[1].j1, opcodes[1].j2),
            (2, 3, 2, 3)
        );
    }

    #[test]
    fn empty_sides_produce_single_opcode() {
        let b = tokenize("new text");
        assert_eq!(kinds(&align(&[], &b).expect("align")), vec![OpKind::Insert]);
        assert_eq!(kinds(&align(&b, &[]).expect("align")), vec![OpKind::Delete]);
        assert!(align(&[], &[]).expect("align").is_empty());
    }

    #[test]
    fn long_sequences_with_sparse_matches_keep_every_match() {
        let side = |prefix: &str| {
            (0..3000)
                .map(|i| {
                    if i % 100 == 0 {
                        Token::new(format!("keep{i}"))
                    } else {
                        Token::new(format!("{prefix}{i}"))
                    }
                })
                .collect::<Vec<_>>()
        };
        let a = side("a");
        let b = side("b");
        let opcodes = align(&a, &b).expect("align");

        let equal = opcodes
            .iter()
            .filter(|op| op.kind == OpKind::Equal)
            .map(|op| op.i2 - op.i1)
            .sum::<usize>();
        assert_eq!(equal, 30);
        assert!(
            opcodes
                .windows(2)
                .all(|pair| (pair[0].kind == OpKind::Equal) != (pair[1].kind == OpKind::Equal))
        );
        assert!(
            opcodes
                .iter()
                .filter(|op| op.kind != OpKind::Equal)
                .all(|op| op.kind == OpKind::Replace)
        );
    }

    #[test]
    fn adjacent_edits_merge_into_replace() {
        let mut opcodes = Vec::new();
        for op in [
            DiffOpcode {
                kind: OpKind::Insert,
                i1: 0,
                i2: 0,
                j1: 0,
                j2: 2,
            },
            DiffOpcode {
                kind: OpKind::Delete,
                i1: 0,
                i2: 1,
                j1: 2,
                j2: 2,
            },
            DiffOpcode {
                kind: OpKind::Equal,
                i1: 1,
                i2: 1,
                j1: 2,
                j2: 2,
            },
        ] {
            push_opcode(&mut opcodes, op);
        }
        assert_eq!(
            opcodes,
            vec![DiffOpcode {
                kind: OpKind::Replace,
                i1: 0,
                i2: 1,
                j1: 0,
                j2: 2
            }]
        );
    }

    #[test]
    fn validation_rejects_gaps_and_short_coverage() {
        let gap = vec![
            DiffOpcode {
                kind: OpKind::Equal,
                i1: 0,
                i2: 1,
                j1: 0,
                j2: 1,
            },
            DiffOpcode {
                kind: OpKind::Equal,
                i1: 2,
                i2: 3,
                j1: 2,
                j2: 3,
            },
        ];
        assert!(matches!(
            validate_opcodes(&gap, 3, 3),
            Err(DiffError::DiscontiguousOpcode { index: 1 })
        ));

        let short = vec![DiffOpcode {
            kind: OpKind::Delete,
            i1: 0,
            i2: 2,
            j1: 0,
            j2: 0,
        }];
        assert!(matches!(
            validate_opcodes(&short, 3, 0),
            Err(DiffError::InvalidAlignment {
                side: Role::Original,
                expected: 3,
                covered: 2
            })
        ));
    }
}
