//! Engine-level error type.

use crate::model::year::YearParseError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LayoutResult<T> = Result<T, LayoutError>;

/// Failure that blocks a recompute or a detail lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A record carries a year label outside the grammar.
    Year(YearParseError),
    /// No rendering surface is mounted to receive the frame.
    SurfaceUnavailable,
    /// A reveal or visibility request named a year not in the current layout.
    UnknownYear(String),
}

impl Display for LayoutError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Year(err) => write!(f, "{err}"),
            Self::SurfaceUnavailable => {
                write!(f, "rendering surface unavailable; reload to retry")
            }
            Self::UnknownYear(label) => write!(f, "year `{label}` is not part of the current layout"),
        }
    }
}

impl Error for LayoutError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Year(err) => Some(err),
            Self::SurfaceUnavailable => None,
            Self::UnknownYear(_) => None,
        }
    }
}

impl From<YearParseError> for LayoutError {
    fn from(value: YearParseError) -> Self {
        Self::Year(value)
    }
}
