use std::num::ParseIntError;

#[derive(Debug, thiserror::Error)]
pub(crate) enum Error {
    #[error("invalid configuration: {mines} mines on a {rows}x{columns} board")]
    InvalidConfiguration {
        rows: usize,
        columns: usize,
        mines: usize,
    },

    #[error("failed to parse number from `{1}`")]
    ParseNum(#[source] ParseIntError, String),

    #[error("value must be non-zero")]
    GetNonZeroValue,
}
