use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::{color::Color, lan::ParseLanError, piece::PieceKind, square::Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveError {
    Malformed(ParseLanError),
    NoPieceAtSource { square: Square, side: Color },
    IllegalDestination { from: Square, to: Square },
    InvalidPromotion { kind: PieceKind },
}
impl From<ParseLanError> for MoveError {
    fn from(value: ParseLanError) -> Self {
        MoveError::Malformed(value)
    }
}
impl Display for MoveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MoveError::Malformed(err) => write!(f, "malformed move: {err}")?,
            MoveError::NoPieceAtSource { square, side } => {
                write!(f, "no {side} piece on {square}")?;
            }
            MoveError::IllegalDestination { from, to } => {
                write!(f, "{from}{to} is not a legal move")?;
            }
            MoveError::InvalidPromotion { kind } => {
                write!(f, "cannot promote to a {kind}")?;
            }
        }
        Ok(())
    }
}
impl Error for MoveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            MoveError::Malformed(err) => Some(err),
            _ => None,
        }
    }
}
