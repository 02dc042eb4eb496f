use std::fmt::{self, Display, Formatter};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndState {
    Win(Color),
    Draw,
}
impl Display for EndState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EndState::Win(color) => write!(f, "{color} wins")?,
            EndState::Draw => write!(f, "draw")?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Ongoing,
    Check,
    Checkmate,
    Stalemate,
}
impl Status {
    pub fn is_over(self) -> bool {
        matches!(self, Status::Checkmate | Status::Stalemate)
    }
    pub fn end_state(self, side_to_move: Color) -> Option<EndState> {
        match self {
            Status::Ongoing | Status::Check => None,
            Status::Checkmate => Some(EndState::Win(!side_to_move)),
            Status::Stalemate => Some(EndState::Draw),
        }
    }
}
impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ongoing => write!(f, "ongoing")?,
            Status::Check => write!(f, "check")?,
            Status::Checkmate => write!(f, "checkmate")?,
            Status::Stalemate => write!(f, "stalemate")?,
        }
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use crate::{
        color::Color,
        end_state::{EndState, Status},
    };

    #[test]
    fn checkmated_side_loses() {
        assert_eq!(
            Status::Checkmate.end_state(Color::Black),
            Some(EndState::Win(Color::White))
        );
        assert_eq!(Status::Stalemate.end_state(Color::White), Some(EndState::Draw));
        assert_eq!(Status::Check.end_state(Color::White), None);
    }
}
