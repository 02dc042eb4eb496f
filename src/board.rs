use std::{
    cell::OnceCell,
    error::Error,
    fmt::{self, Display, Formatter},
    ops::Index,
};

use arrayvec::ArrayVec;

use crate::{
    color::Color,
    piece::{Piece, PieceKind},
    square::{Square, home_rank, pawn_home_rank},
};

pub const MAX_PIECES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExceededPieces;

impl Display for ExceededPieces {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "found more than {MAX_PIECES} pieces")?;
        Ok(())
    }
}
impl Error for ExceededPieces {}

/// Stable handle of a piece. Stays valid for the lifetime of the board:
/// pieces are never removed from the arena, captured ones only lose their
/// square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceIndex(u8);

impl From<PieceIndex> for usize {
    fn from(value: PieceIndex) -> Self {
        value.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    pieces: ArrayVec<Piece, MAX_PIECES>,
    indices: OnceCell<[Option<PieceIndex>; 64]>,
}
impl Board {
    pub fn empty() -> Self {
        Board {
            pieces: ArrayVec::new(),
            indices: OnceCell::new(),
        }
    }
    pub fn starting_position() -> Self {
        let mut pieces = ArrayVec::new();
        for color in Color::ALL {
            for (file, kind) in (0..8).zip(PieceKind::STARTING_CONFIGURATION) {
                pieces.push(Piece::new(kind, color, Square::new(file, home_rank(color))));
            }
            for file in 0..8 {
                pieces.push(Piece::new(
                    PieceKind::Pawn,
                    color,
                    Square::new(file, pawn_home_rank(color)),
                ));
            }
        }
        Board {
            pieces,
            indices: OnceCell::new(),
        }
    }
    pub fn push(&mut self, piece: Piece) -> Result<PieceIndex, ExceededPieces> {
        #[allow(clippy::cast_possible_truncation, reason = "at most 32")]
        let index = PieceIndex(self.pieces.len() as u8);
        self.pieces.try_push(piece).map_err(|_| ExceededPieces)?;
        self.indices = OnceCell::new();
        Ok(index)
    }
    pub fn all_pieces(&self) -> impl Iterator<Item = Piece> {
        self.pieces.iter().copied()
    }
    pub fn all_pieces_indexed(&self) -> impl Iterator<Item = (PieceIndex, Piece)> {
        self.pieces.iter().copied().enumerate().map(|(i, piece)| {
            #[allow(clippy::cast_possible_truncation, reason = "at most 32")]
            let index = PieceIndex(i as u8);
            (index, piece)
        })
    }
    pub fn on_board(&self) -> impl Iterator<Item = Piece> {
        self.all_pieces().filter(|piece| piece.is_on_board())
    }
    pub fn pieces_indexed(&self, color: Color) -> impl Iterator<Item = (PieceIndex, Piece)> {
        self.all_pieces_indexed()
            .filter(move |(_, piece)| piece.is_on_board() && piece.color == color)
    }
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = Piece> {
        self.pieces_indexed(color).map(|(_, piece)| piece)
    }
    pub fn king(&self, color: Color) -> Option<Piece> {
        self.pieces(color)
            .find(|piece| piece.kind == PieceKind::King)
    }
    fn indices(&self) -> &[Option<PieceIndex>; 64] {
        self.indices.get_or_init(|| {
            let mut board = [None; 64];
            for (i, piece) in self.all_pieces_indexed() {
                if let Some(square) = piece.square {
                    board[square.index() as usize] = Some(i);
                }
            }
            board
        })
    }
    pub fn index_at(&self, square: Square) -> Option<PieceIndex> {
        self.indices()[square.index() as usize]
    }
    pub fn get(&self, square: Square) -> Option<(PieceIndex, Piece)> {
        self.index_at(square).map(|index| (index, self[index]))
    }
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.index_at(square).map(|index| self[index])
    }
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color)
    }
    pub fn occupancy(&self) -> Occupancy {
        let mut occupancy = [None; 64];
        for piece in self.on_board() {
            if let Some(square) = piece.square {
                occupancy[square.index() as usize] = Some(piece.color);
            }
        }
        Occupancy(occupancy)
    }
    pub(crate) fn piece_mut(&mut self, index: PieceIndex) -> &mut Piece {
        self.indices = OnceCell::new();
        &mut self.pieces[usize::from(index)]
    }
}
impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
    }
}
impl Eq for Board {}

impl Index<PieceIndex> for Board {
    type Output = Piece;

    fn index(&self, index: PieceIndex) -> &Self::Output {
        &self.pieces[usize::from(index)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Occupancy([Option<Color>; 64]);

impl Occupancy {
    pub fn get(&self, square: Square) -> Option<Color> {
        self.0[square.index() as usize]
    }
    pub fn value(&self, square: Square) -> i8 {
        self.get(square).map_or(0, Color::sign)
    }
    pub fn values(&self) -> [i8; 64] {
        self.0.map(|color| color.map_or(0, Color::sign))
    }
    pub fn count(&self, color: Color) -> usize {
        self.0.iter().filter(|c| **c == Some(color)).count()
    }
}
impl Display for Occupancy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for rank in (0..8).rev() {
            for file in 0..8 {
                let c = match self.get(Square::new(file, rank)) {
                    Some(Color::White) => '+',
                    Some(Color::Black) => '-',
                    None => '.',
                };
                write!(f, "{c}")?;
            }
            if rank > 0 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use crate::{
        board::{Board, ExceededPieces},
        color::Color,
        piece::{Piece, PieceKind},
    };

    #[test]
    fn starting_position_occupancy() {
        let occupancy = Board::starting_position().occupancy();
        assert_eq!(occupancy.count(Color::White), 16);
        assert_eq!(occupancy.count(Color::Black), 16);
        assert_eq!(occupancy.value(square!("e2")), 1);
        assert_eq!(occupancy.value(square!("e7")), -1);
        assert_eq!(occupancy.value(square!("e4")), 0);
        assert_eq!(occupancy.values().iter().map(|value| i32::from(*value)).sum::<i32>(), 0);
        assert_eq!(
            occupancy.to_string(),
            "--------\n--------\n........\n........\n........\n........\n++++++++\n++++++++"
        );
    }
    #[test]
    fn kings_are_found() {
        let board = Board::starting_position();
        assert_eq!(
            board.king(Color::White).and_then(|king| king.square),
            Some(square!("e1"))
        );
        assert_eq!(
            board.king(Color::Black).and_then(|king| king.square),
            Some(square!("e8"))
        );
    }
    #[test]
    fn relocation_refreshes_lookup() {
        let mut board = Board::starting_position();
        let (index, _) = board.get(square!("g1")).unwrap();
        assert_eq!(board.piece_at(square!("f3")), None);
        board.piece_mut(index).square = Some(square!("f3"));
        assert_eq!(board.piece_at(square!("g1")), None);
        assert_eq!(
            board.piece_at(square!("f3")).map(|piece| piece.kind),
            Some(PieceKind::Knight)
        );
    }
    #[test]
    fn captured_piece_keeps_its_slot() {
        let mut board = Board::starting_position();
        let (index, _) = board.get(square!("d7")).unwrap();
        board.piece_mut(index).square = None;
        assert_eq!(board.all_pieces().count(), 32);
        assert_eq!(board.on_board().count(), 31);
        assert_eq!(board[index].kind, PieceKind::Pawn);
        assert_eq!(board.pieces(Color::Black).count(), 15);
    }
    #[test]
    fn arena_is_bounded() {
        let mut board = Board::starting_position();
        assert_eq!(
            board.push(Piece::new(PieceKind::Queen, Color::White, square!("e4"))),
            Err(ExceededPieces)
        );
    }
}
