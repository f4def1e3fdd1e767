use thiserror::Error;

/// Why a program could not produce its record.
///
/// Field-level parse failures never show up here; they resolve to sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("{program}: markup never reached waypoint `{waypoint}`")]
    StructureMismatch {
        program: &'static str,
        waypoint: &'static str,
    },
    #[error("row has {found} columns, header has {expected}")]
    ShapeMismatch { expected: usize, found: usize },
    #[error("invalid security code {text:?}")]
    InvalidCode { text: String },
    #[error("unrecognised trade description {text:?}")]
    UnknownTradeKind { text: String },
    #[error("required column {column:?} missing from header")]
    MissingColumn { column: &'static str },
    #[error("summed quantity for code {code} does not fit")]
    QuantityOverflow { code: u32 },
}

impl ExtractError {
    pub(crate) fn mismatch(program: &'static str, waypoint: &'static str) -> Self {
        ExtractError::StructureMismatch { program, waypoint }
    }
}
