use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    iter::FusedIterator,
    ops::{Mul, Sub},
    str::FromStr,
};

use crate::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseSquareError {
    InvalidFile(char),
    InvalidRank(char),
    NotEnoughCharacter(u8),
    Unexpected(char),
}
impl Display for ParseSquareError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseSquareError::InvalidFile(file) => write!(
                f,
                "found `{file}`, characters from `a` to `h` were expected instead"
            )?,
            ParseSquareError::InvalidRank(rank) => write!(
                f,
                "found `{rank}`, characters from `1` to `8` were expected instead"
            )?,
            ParseSquareError::NotEnoughCharacter(len) => write!(
                f,
                "provided string have length of {len} characters, 2 were expected"
            )?,
            ParseSquareError::Unexpected(c) => write!(f, "unexpected `{c}`")?,
        }
        Ok(())
    }
}
impl Error for ParseSquareError {}

#[macro_export]
macro_rules! square {
    ($name:literal) => {
        const { $crate::square::Square::from_algebraic($name) }
    };
}

/// A square on the board, stored as `rank * 8 + file` with rank 0 being
/// white's back rank.
///
/// Off-board is not a `Square`: it is represented as `Option::<Square>::None`,
/// and as the raw index `-1` at the integer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    pub const OFF_BOARD: i8 = -1;

    pub const fn new(file: u8, rank: u8) -> Self {
        debug_assert!(file < 8);
        debug_assert!(rank < 8);
        Square(rank * 8 + file)
    }
    pub fn new_checked(file: u8, rank: u8) -> Option<Self> {
        if file >= 8 || rank >= 8 {
            None
        } else {
            Some(Self::new(file, rank))
        }
    }
    pub const fn from_index(index: i8) -> Option<Self> {
        if index >= 0 && index < 64 {
            Some(Square(index.unsigned_abs()))
        } else {
            None
        }
    }
    pub const fn index(self) -> u8 {
        self.0
    }
    pub fn raw_index(square: Option<Self>) -> i8 {
        square.map_or(Square::OFF_BOARD, |square| {
            i8::try_from(square.0).unwrap_or(Square::OFF_BOARD)
        })
    }
    pub const fn file(self) -> u8 {
        self.0 % 8
    }
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }
    /// # Panics
    ///
    /// Panics when `name` is not a valid algebraic square. Meant for constants; see [`square!`].
    pub const fn from_algebraic(name: &str) -> Self {
        let bytes = name.as_bytes();
        assert!(bytes.len() == 2, "a square name has exactly 2 characters");
        assert!(
            bytes[0] >= b'a' && bytes[0] <= b'h',
            "file must be from `a` to `h`"
        );
        assert!(
            bytes[1] >= b'1' && bytes[1] <= b'8',
            "rank must be from `1` to `8`"
        );
        Square::new(bytes[0] - b'a', bytes[1] - b'1')
    }
    pub fn from_chars(file: char, rank: char) -> Result<Self, ParseSquareError> {
        let file = match file {
            'a'..='h' => file as u8 - b'a',
            _ => return Err(ParseSquareError::InvalidFile(file)),
        };
        let rank = match rank {
            '1'..='8' => rank as u8 - b'1',
            _ => return Err(ParseSquareError::InvalidRank(rank)),
        };
        Ok(Square::new(file, rank))
    }
    pub fn move_by(self, movement: Vector) -> Option<Self> {
        Self::new_checked(
            self.file().checked_add_signed(movement.x)?,
            self.rank().checked_add_signed(movement.y)?,
        )
    }
    pub fn line(self, direction: Vector, start: i8) -> impl Iterator<Item = Self> {
        debug_assert_ne!(direction, Vector::ZERO);
        debug_assert_eq!(direction, direction.as_unit());
        (start..).map_while(move |distance| self.move_by(direction * distance))
    }
    pub fn line_inclusive(self, direction: Vector) -> impl Iterator<Item = Self> {
        self.line(direction, 0)
    }
    pub fn line_exclusive(self, direction: Vector) -> impl Iterator<Item = Self> {
        self.line(direction, 1)
    }
    pub fn line_inclusive_exclusive(
        self,
        end: Square,
        direction: Vector,
    ) -> impl Iterator<Item = Self> {
        self.line_inclusive(direction)
            .take_while(move |square| *square != end)
    }
    pub fn line_exclusive_exclusive(
        self,
        end: Square,
        direction: Vector,
    ) -> impl Iterator<Item = Self> {
        self.line_inclusive_exclusive(end, direction).skip(1)
    }
    pub fn is_aligned(
        self,
        other: Self,
        directions: &[Vector],
    ) -> Option<impl Iterator<Item = Self>> {
        directions.iter().copied().find_map(|direction| {
            if direction.is_aligned(other - self) {
                Some(self.line_exclusive_exclusive(other, direction))
            } else {
                None
            }
        })
    }
    pub fn is_aligned_with_bishop(self, other: Self) -> Option<impl Iterator<Item = Self>> {
        self.is_aligned(other, &Vector::BISHOP_DIRECTIONS)
    }
    pub fn is_aligned_with_rook(self, other: Self) -> Option<impl Iterator<Item = Self>> {
        self.is_aligned(other, &Vector::ROOK_DIRECTIONS)
    }
    pub fn is_aligned_with_queen(self, other: Self) -> Option<impl Iterator<Item = Self>> {
        self.is_aligned(other, &Vector::QUEEN_DIRECTIONS)
    }
    pub fn shade(self) -> Color {
        match (self.file() + self.rank()) % 2 {
            0 => Color::Black,
            1 => Color::White,
            _ => unreachable!(),
        }
    }
}
pub fn square_to_algebraic(index: i8) -> Option<String> {
    Square::from_index(index).map(|square| square.to_string())
}
pub fn home_rank(color: Color) -> u8 {
    match color {
        Color::White => 0,
        Color::Black => 7,
    }
}
pub fn pawn_home_rank(color: Color) -> u8 {
    match color {
        Color::White => 1,
        Color::Black => 6,
    }
}
pub fn pawn_promotion_rank(color: Color) -> u8 {
    match color {
        Color::White => 7,
        Color::Black => 0,
    }
}
pub fn pawn_direction(color: Color) -> i8 {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}
impl Display for Square {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let file = (self.file() + b'a') as char;
        let rank = (self.rank() + b'1') as char;
        write!(f, "{file}{rank}")?;
        Ok(())
    }
}
impl FromStr for Square {
    type Err = ParseSquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let Some(file) = chars.next() else {
            return Err(ParseSquareError::NotEnoughCharacter(0));
        };
        let Some(rank) = chars.next() else {
            return Err(ParseSquareError::NotEnoughCharacter(1));
        };
        if let Some(c) = chars.next() {
            return Err(ParseSquareError::Unexpected(c));
        }
        Square::from_chars(file, rank)
    }
}
impl Sub<Self> for Square {
    type Output = Vector;

    #[allow(clippy::cast_possible_wrap, reason = "files and ranks are below 8")]
    fn sub(self, rhs: Self) -> Self::Output {
        Vector {
            x: self.file() as i8 - rhs.file() as i8,
            y: self.rank() as i8 - rhs.rank() as i8,
        }
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vector {
    pub x: i8,
    pub y: i8,
}
impl Vector {
    pub const ZERO: Self = Vector { x: 0, y: 0 };

    pub const KNIGHT_MOVES: [Self; 8] = [
        Vector { x: -1, y: -2 },
        Vector { x: 1, y: -2 },
        Vector { x: -1, y: 2 },
        Vector { x: 1, y: 2 },
        Vector { x: -2, y: -1 },
        Vector { x: 2, y: -1 },
        Vector { x: -2, y: 1 },
        Vector { x: 2, y: 1 },
    ];
    pub const KING_MOVES: [Self; 8] = [
        Vector { x: -1, y: -1 },
        Vector { x: 0, y: -1 },
        Vector { x: 1, y: -1 },
        Vector { x: -1, y: 0 },
        Vector { x: 1, y: 0 },
        Vector { x: -1, y: 1 },
        Vector { x: 0, y: 1 },
        Vector { x: 1, y: 1 },
    ];
    pub const ROOK_DIRECTIONS: [Self; 4] = [
        Vector { x: -1, y: 0 },
        Vector { x: 1, y: 0 },
        Vector { x: 0, y: -1 },
        Vector { x: 0, y: 1 },
    ];
    pub const BISHOP_DIRECTIONS: [Self; 4] = [
        Vector { x: -1, y: -1 },
        Vector { x: 1, y: -1 },
        Vector { x: -1, y: 1 },
        Vector { x: 1, y: 1 },
    ];
    pub const QUEEN_DIRECTIONS: [Self; 8] = Vector::KING_MOVES;

    pub fn pawn_single_move(color: Color) -> Self {
        Vector {
            x: 0,
            y: pawn_direction(color),
        }
    }
    pub fn pawn_attacks(color: Color) -> [Self; 2] {
        [-1, 1].map(|x| Vector {
            x,
            y: pawn_direction(color),
        })
    }
    pub fn is_aligned(self, other: Self) -> bool {
        self.as_unit() == other.as_unit() && self.x * other.y == other.x * self.y
    }
    pub fn is_king_move(self) -> bool {
        (-1..=1).contains(&self.x) && (-1..=1).contains(&self.y) && !(self.x == 0 && self.y == 0)
    }
    pub fn is_knight_move(self) -> bool {
        let x = self.x.unsigned_abs();
        let y = self.y.unsigned_abs();
        (x == 1 && y == 2) || (x == 2 && y == 1)
    }
    pub fn is_pawn_attack(self, color: Color) -> bool {
        self.x.unsigned_abs() == 1 && self.y == pawn_direction(color)
    }
    pub fn as_unit(self) -> Self {
        Vector {
            x: self.x.signum(),
            y: self.y.signum(),
        }
    }
}
impl Mul<i8> for Vector {
    type Output = Vector;

    fn mul(self, rhs: i8) -> Self::Output {
        Vector {
            x: self.x * rhs,
            y: self.y * rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SquareSet(u64);

impl SquareSet {
    pub const EMPTY: Self = SquareSet(0);

    pub fn insert(&mut self, square: Square) {
        self.0 |= 1 << square.index();
    }
    pub fn contains(self, square: Square) -> bool {
        (self.0 >> square.index()) & 1 == 1
    }
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
    pub fn iter(self) -> SquareSetIter {
        SquareSetIter(self.0)
    }
}
impl FromIterator<Square> for SquareSet {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        let mut set = SquareSet::EMPTY;
        set.extend(iter);
        set
    }
}
impl Extend<Square> for SquareSet {
    fn extend<T: IntoIterator<Item = Square>>(&mut self, iter: T) {
        for square in iter {
            self.insert(square);
        }
    }
}
impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
impl Display for SquareSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, square) in self.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{square}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SquareSetIter(u64);

impl Iterator for SquareSetIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            #[allow(clippy::cast_possible_truncation, reason = "at most 63")]
            let index = self.0.trailing_zeros() as u8;
            self.0 &= self.0 - 1;
            Some(Square(index))
        }
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}
impl ExactSizeIterator for SquareSetIter {}
impl FusedIterator for SquareSetIter {}
