use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    board::{Board, ExceededPieces},
    castling::{CastlingRight, CastlingSide, InvalidCastlingCharacter, KING_FILE},
    check::is_in_check,
    color::{Color, ParseColorError},
    piece::{Piece, PieceKind},
    square::{ParseSquareError, Square, home_rank, pawn_home_rank},
    state::GameState,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidPosition {
    ExceededPieces(ExceededPieces),
    NoKing(Color),
    MultipleKings(Color),
    NonPlayerInCheck(Color),
    PawnOnBackRank(Square),
    InvalidEnPassantTarget(Square),
}
impl From<ExceededPieces> for InvalidPosition {
    fn from(value: ExceededPieces) -> Self {
        InvalidPosition::ExceededPieces(value)
    }
}
impl Display for InvalidPosition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPosition::ExceededPieces(err) => write!(f, "{err}")?,
            InvalidPosition::NoKing(color) => write!(f, "no {color} king found")?,
            InvalidPosition::MultipleKings(color) => {
                write!(f, "found more than 1 {color} king")?;
            }
            InvalidPosition::NonPlayerInCheck(color) => {
                write!(f, "{color} is in check but it's not their turn")?;
            }
            InvalidPosition::PawnOnBackRank(square) => write!(f, "found pawn on {square}")?,
            InvalidPosition::InvalidEnPassantTarget(square) => {
                write!(f, "{square} is not a valid en passant target")?;
            }
        }
        Ok(())
    }
}
impl Error for InvalidPosition {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            InvalidPosition::ExceededPieces(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseFenError {
    NotEnoughSquaresOnRow,
    ExceedingSquaresOnRow,
    UnexpectedChar(char),
    UnexpectedEol,
    ParseColorError(ParseColorError),
    InvalidCastlingCharacter(InvalidCastlingCharacter),
    ParseSquareError(ParseSquareError),
    InvalidPosition(InvalidPosition),
}
impl From<ParseColorError> for ParseFenError {
    fn from(value: ParseColorError) -> Self {
        ParseFenError::ParseColorError(value)
    }
}
impl From<InvalidCastlingCharacter> for ParseFenError {
    fn from(value: InvalidCastlingCharacter) -> Self {
        ParseFenError::InvalidCastlingCharacter(value)
    }
}
impl From<ParseSquareError> for ParseFenError {
    fn from(value: ParseSquareError) -> Self {
        ParseFenError::ParseSquareError(value)
    }
}
impl From<InvalidPosition> for ParseFenError {
    fn from(value: InvalidPosition) -> Self {
        ParseFenError::InvalidPosition(value)
    }
}
impl From<ExceededPieces> for ParseFenError {
    fn from(value: ExceededPieces) -> Self {
        ParseFenError::InvalidPosition(value.into())
    }
}
impl Display for ParseFenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseFenError::NotEnoughSquaresOnRow => write!(f, "not enough squares on a row")?,
            ParseFenError::ExceedingSquaresOnRow => write!(f, "exceeding squares on a row")?,
            ParseFenError::UnexpectedChar(c) => write!(f, "unexpected `{c}`")?,
            ParseFenError::UnexpectedEol => write!(f, "unexpected end of line")?,
            ParseFenError::ParseColorError(err) => write!(f, "{err}")?,
            ParseFenError::InvalidCastlingCharacter(err) => write!(f, "{err}")?,
            ParseFenError::ParseSquareError(err) => write!(f, "{err}")?,
            ParseFenError::InvalidPosition(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for ParseFenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseFenError::ParseColorError(err) => Some(err),
            ParseFenError::InvalidCastlingCharacter(err) => Some(err),
            ParseFenError::ParseSquareError(err) => Some(err),
            ParseFenError::InvalidPosition(err) => Some(err),
            _ => None,
        }
    }
}

/// A [`GameState`] read from or written as Forsyth-Edwards Notation.
///
/// Move counters are accepted and ignored on input, and always written as
/// `0 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen(pub GameState);

fn has_moved(
    kind: PieceKind,
    color: Color,
    square: Square,
    castling_right: CastlingRight,
) -> bool {
    let rank = home_rank(color);
    match kind {
        PieceKind::Pawn => square.rank() != pawn_home_rank(color),
        PieceKind::King => !(square == Square::new(KING_FILE, rank) && castling_right.any(color)),
        PieceKind::Rook => !CastlingSide::ALL.into_iter().any(|side| {
            castling_right.get(color, side)
                && square == Square::new(side.rook_origin_file(), rank)
        }),
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => false,
    }
}
fn validate(state: &GameState) -> Result<(), InvalidPosition> {
    let board = state.board();
    for color in Color::ALL {
        match board
            .pieces(color)
            .filter(|piece| piece.kind == PieceKind::King)
            .count()
        {
            0 => return Err(InvalidPosition::NoKing(color)),
            1 => (),
            _ => return Err(InvalidPosition::MultipleKings(color)),
        }
    }
    let waiting = !state.side_to_move();
    if is_in_check(state, waiting) {
        return Err(InvalidPosition::NonPlayerInCheck(waiting));
    }
    if let Some(square) = board
        .on_board()
        .filter(|piece| piece.kind == PieceKind::Pawn)
        .filter_map(|piece| piece.square)
        .find(|square| matches!(square.rank(), 0 | 7))
    {
        return Err(InvalidPosition::PawnOnBackRank(square));
    }
    if let Some(target) = state.en_passant_target() {
        let expected_rank = match state.side_to_move() {
            Color::White => 5,
            Color::Black => 2,
        };
        if target.rank() != expected_rank {
            return Err(InvalidPosition::InvalidEnPassantTarget(target));
        }
    }
    Ok(())
}
impl FromStr for Fen {
    type Err = ParseFenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut characters = s.trim_start().chars();
        let mut placement = Vec::new();

        let mut x: u8 = 0;
        let mut y: u8 = 0;
        while x < 8 || y < 7 {
            let c = characters.next().ok_or(ParseFenError::UnexpectedEol)?;
            if c == '/' {
                if x == 8 {
                    x = 0;
                    y += 1;
                } else {
                    return Err(ParseFenError::NotEnoughSquaresOnRow);
                }
            } else if c.is_whitespace() {
                return Err(ParseFenError::NotEnoughSquaresOnRow);
            } else if matches!(c, '1'..='8') {
                x = x
                    .checked_add(c as u8 - b'0')
                    .ok_or(ParseFenError::ExceedingSquaresOnRow)?;
                if x > 8 {
                    return Err(ParseFenError::ExceedingSquaresOnRow);
                }
            } else {
                if x >= 8 {
                    return Err(ParseFenError::ExceedingSquaresOnRow);
                }
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let kind =
                    PieceKind::try_from(c).map_err(|_| ParseFenError::UnexpectedChar(c))?;
                placement.push((kind, color, Square::new(x, 7 - y)));
                x += 1;
            }
        }
        let mut fields = characters.as_str().split_whitespace();
        let side_to_move = fields.next().ok_or(ParseFenError::UnexpectedEol)?.parse()?;
        let castling_right: CastlingRight = fields.next().unwrap_or("-").parse()?;
        let en_passant_target = match fields.next().unwrap_or("-") {
            "-" => None,
            square => Some(square.parse()?),
        };

        let mut board = Board::empty();
        for (kind, color, square) in placement {
            board.push(Piece {
                kind,
                color,
                square: Some(square),
                has_moved: has_moved(kind, color, square, castling_right),
            })?;
        }
        let state = GameState::from_parts(board, side_to_move, en_passant_target);
        validate(&state)?;
        Ok(Fen(state))
    }
}
impl Display for Fen {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let board = self.0.board();
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match board.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.fen())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                write!(f, "/")?;
            }
        }
        write!(f, " {}", self.0.side_to_move().lowercase())?;
        write!(f, " {}", CastlingRight::from_board(board))?;
        if let Some(square) = self.0.en_passant_target() {
            write!(f, " {square}")?;
        } else {
            write!(f, " -")?;
        }
        write!(f, " 0 1")?;
        Ok(())
    }
}
