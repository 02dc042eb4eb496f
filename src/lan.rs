use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    piece::PieceKind,
    square::{ParseSquareError, Square},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseLanError {
    InvalidLength(usize),
    ParseSquareError(ParseSquareError),
    InvalidPromotion(char),
}
impl From<ParseSquareError> for ParseLanError {
    fn from(value: ParseSquareError) -> Self {
        ParseLanError::ParseSquareError(value)
    }
}
impl Display for ParseLanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseLanError::InvalidLength(len) => {
                write!(f, "expected 4 or 5 characters, found {len}")?;
            }
            ParseLanError::ParseSquareError(err) => write!(f, "{err}")?,
            ParseLanError::InvalidPromotion(c) => {
                write!(f, "found `{c}`, expected one of `q`, `r`, `b`, or `n`")?;
            }
        }
        Ok(())
    }
}
impl Error for ParseLanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseLanError::ParseSquareError(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lan {
    pub origin: Square,
    pub destination: Square,
    pub promotion: Option<PieceKind>,
}
impl Lan {
    pub fn new(origin: Square, destination: Square) -> Self {
        Lan {
            origin,
            destination,
            promotion: None,
        }
    }
}
impl Display for Lan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.destination)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.lowercase())?;
        }
        Ok(())
    }
}
impl FromStr for Lan {
    type Err = ParseLanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.chars().count();
        if !(4..=5).contains(&len) {
            return Err(ParseLanError::InvalidLength(len));
        }
        let mut chars = s.chars();
        let mut next = || chars.next().ok_or(ParseLanError::InvalidLength(len));
        let origin = Square::from_chars(next()?, next()?)?;
        let destination = Square::from_chars(next()?, next()?)?;
        let promotion = chars
            .next()
            .map(|c| match c {
                'q' => Ok(PieceKind::Queen),
                'r' => Ok(PieceKind::Rook),
                'b' => Ok(PieceKind::Bishop),
                'n' => Ok(PieceKind::Knight),
                c => Err(ParseLanError::InvalidPromotion(c)),
            })
            .transpose()?;
        Ok(Lan {
            origin,
            destination,
            promotion,
        })
    }
}
#[cfg(test)]
mod test {
    use crate::{
        lan::{Lan, ParseLanError},
        piece::PieceKind,
        square::ParseSquareError,
    };

    #[test]
    fn parse_plain_and_promotion() {
        assert_eq!("e2e4".parse(), Ok(Lan::new(square!("e2"), square!("e4"))));
        assert_eq!(
            "a7a8n".parse(),
            Ok(Lan {
                origin: square!("a7"),
                destination: square!("a8"),
                promotion: Some(PieceKind::Knight),
            })
        );
    }
    #[test]
    fn rejects_bad_input() {
        assert_eq!("e2e".parse::<Lan>(), Err(ParseLanError::InvalidLength(3)));
        assert_eq!(
            "e2e4qq".parse::<Lan>(),
            Err(ParseLanError::InvalidLength(6))
        );
        assert_eq!(
            "e2e4k".parse::<Lan>(),
            Err(ParseLanError::InvalidPromotion('k'))
        );
        assert_eq!(
            "e2e4Q".parse::<Lan>(),
            Err(ParseLanError::InvalidPromotion('Q'))
        );
        assert_eq!(
            "i2e4".parse::<Lan>(),
            Err(ParseLanError::ParseSquareError(ParseSquareError::InvalidFile('i')))
        );
        assert_eq!(
            "e9e4".parse::<Lan>(),
            Err(ParseLanError::ParseSquareError(ParseSquareError::InvalidRank('9')))
        );
    }
    #[test]
    fn display_uses_lowercase_promotion() {
        let lan = Lan {
            origin: square!("b2"),
            destination: square!("b1"),
            promotion: Some(PieceKind::Rook),
        };
        assert_eq!(lan.to_string(), "b2b1r");
    }
}
