use crate::model::Role;

/// Common result type for the crate.
pub type Result<T> = std::result::Result<T, DiffError>;

/// Failures surfaced at the diff engine boundary.
///
/// Diffing is deterministic, so none of these are retryable.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// Aligner output does not partition one of the token sequences.
    #[error(
        "alignment does not cover the {side} sequence: expected {expected} tokens, opcodes cover {covered}"
    )]
    InvalidAlignment {
        side: Role,
        expected: usize,
        covered: usize,
    },
    /// Opcodes are not contiguous or out of order.
    #[error("alignment opcode {index} is not contiguous with its predecessor")]
    DiscontiguousOpcode { index: usize },
    /// An opcode range reaches past the end of its token sequence.
    #[error("alignment opcode {index} reaches past the end of the {side} sequence ({len} tokens)")]
    OpcodeOutOfRange { index: usize, side: Role, len: usize },
    /// Result serialization failed.
    #[error("failed to serialize diff result: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
