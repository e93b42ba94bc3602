use thiserror::Error;

use crate::feed::FeedFailure;

/// Rejections at the query boundary. Messages carry the value the user supplied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("unknown statistic '{0}'")]
    UnknownParameter(String),

    #[error("unknown competition '{0}'")]
    UnknownCompetition(String),

    #[error("unknown season '{0}'")]
    UnknownSeason(String),
}

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("no feeds loaded ({} attempted)", .failures.len())]
    NoFeeds { failures: Vec<FeedFailure> },
}
