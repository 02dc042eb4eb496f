use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    board::Board,
    color::Color,
    piece::PieceKind,
    square::{Square, home_rank},
};

pub const KING_FILE: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Kingside,
    Queenside,
}
impl CastlingSide {
    pub const ALL: [Self; 2] = [CastlingSide::Kingside, CastlingSide::Queenside];

    pub fn rook_origin_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 7,
            CastlingSide::Queenside => 0,
        }
    }
    pub fn king_destination_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 6,
            CastlingSide::Queenside => 2,
        }
    }
    pub fn rook_destination_file(self) -> u8 {
        match self {
            CastlingSide::Kingside => 5,
            CastlingSide::Queenside => 3,
        }
    }
    pub fn files_between(self) -> impl Iterator<Item = u8> {
        match self {
            CastlingSide::Kingside => 5..7,
            CastlingSide::Queenside => 1..4,
        }
    }
    pub fn from_king_move(origin: Square, destination: Square) -> Option<Self> {
        if origin.rank() != destination.rank() {
            return None;
        }
        match destination.file().checked_sub(origin.file()) {
            Some(2) => Some(CastlingSide::Kingside),
            _ if origin.file().checked_sub(destination.file()) == Some(2) => {
                Some(CastlingSide::Queenside)
            }
            _ => None,
        }
    }
    pub fn uppercase(self) -> char {
        match self {
            CastlingSide::Kingside => 'K',
            CastlingSide::Queenside => 'Q',
        }
    }
    pub fn lowercase(self) -> char {
        match self {
            CastlingSide::Kingside => 'k',
            CastlingSide::Queenside => 'q',
        }
    }
}
impl Display for CastlingSide {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CastlingSide::Kingside => write!(f, "kingside")?,
            CastlingSide::Queenside => write!(f, "queenside")?,
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InvalidCastlingCharacter(pub char);

impl Display for InvalidCastlingCharacter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found {}, expected one of `K`, `Q`, `k`, `q`, or `-`",
            self.0
        )?;
        Ok(())
    }
}
impl Error for InvalidCastlingCharacter {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRight {
    white: u8,
    black: u8,
}
impl CastlingRight {
    pub fn none() -> Self {
        CastlingRight { white: 0, black: 0 }
    }
    pub fn from_board(board: &Board) -> Self {
        let mut castling_right = CastlingRight::none();
        for color in Color::ALL {
            let rank = home_rank(color);
            let king_unmoved = board
                .piece_at(Square::new(KING_FILE, rank))
                .is_some_and(|king| {
                    king.kind == PieceKind::King && king.color == color && !king.has_moved
                });
            if !king_unmoved {
                continue;
            }
            for side in CastlingSide::ALL {
                let rook_unmoved = board
                    .piece_at(Square::new(side.rook_origin_file(), rank))
                    .is_some_and(|rook| {
                        rook.kind == PieceKind::Rook && rook.color == color && !rook.has_moved
                    });
                if rook_unmoved {
                    castling_right.add(color, side);
                }
            }
        }
        castling_right
    }
    fn bit(side: CastlingSide) -> u8 {
        match side {
            CastlingSide::Kingside => 0b_01,
            CastlingSide::Queenside => 0b_10,
        }
    }
    fn byte(self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }
    fn byte_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        }
    }
    pub fn get(self, color: Color, side: CastlingSide) -> bool {
        self.byte(color) & Self::bit(side) != 0
    }
    pub fn any(self, color: Color) -> bool {
        self.byte(color) != 0
    }
    pub fn add(&mut self, color: Color, side: CastlingSide) {
        *self.byte_mut(color) |= Self::bit(side);
    }
}
impl Display for CastlingRight {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut written = false;
        for color in Color::ALL {
            for side in CastlingSide::ALL {
                if self.get(color, side) {
                    written = true;
                    let c = match color {
                        Color::White => side.uppercase(),
                        Color::Black => side.lowercase(),
                    };
                    write!(f, "{c}")?;
                }
            }
        }
        if !written {
            write!(f, "-")?;
        }
        Ok(())
    }
}
impl FromStr for CastlingRight {
    type Err = InvalidCastlingCharacter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut castling_right = CastlingRight::none();
        for c in s.chars() {
            match c {
                'K' => castling_right.add(Color::White, CastlingSide::Kingside),
                'Q' => castling_right.add(Color::White, CastlingSide::Queenside),
                'k' => castling_right.add(Color::Black, CastlingSide::Kingside),
                'q' => castling_right.add(Color::Black, CastlingSide::Queenside),
                '-' => (),
                c => return Err(InvalidCastlingCharacter(c)),
            }
        }
        Ok(castling_right)
    }
}
