use keyjoin_dataset::GroupingError;

pub type JoinOutcome<T> = Result<T, JoinError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    /// A collection or default value was missing. Raised before any grouping work starts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The grouping stage failed; the underlying error is passed through as-is.
    #[error(transparent)]
    Grouping(#[from] GroupingError),
}
