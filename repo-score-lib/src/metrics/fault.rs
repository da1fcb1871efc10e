use crate::facts::hosting::QueryError;
use core::fmt::{Display, Formatter};

/// Why a calculator could not produce a score.
///
/// The pipeline turns every fault into a zero result; faults never reach the process exit code.
#[derive(Debug)]
pub enum Fault {
    /// The metadata query failed or was rejected.
    Query(QueryError),

    /// The repository could not be checked out.
    Checkout(ohno::AppError),
}

impl From<QueryError> for Fault {
    fn from(e: QueryError) -> Self {
        Self::Query(e)
    }
}

impl Display for Fault {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Query(e) => write!(f, "{e}"),
            Self::Checkout(e) => write!(f, "checkout failed: {e:#}"),
        }
    }
}

impl core::error::Error for Fault {}
