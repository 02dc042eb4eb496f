use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use crate::{
    board::Board,
    castling::{CastlingSide, KING_FILE},
    color::Color,
    square::{Square, SquareSet, Vector, pawn_direction, pawn_home_rank},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    pub const PROMOTION_CHOICES: [Self; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];
    pub const STARTING_CONFIGURATION: [Self; 8] = [
        PieceKind::Rook,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Queen,
        PieceKind::King,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Rook,
    ];
    pub fn uppercase(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
    pub fn lowercase(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
    pub fn is_promotion_choice(self) -> bool {
        PieceKind::PROMOTION_CHOICES.contains(&self)
    }
    pub fn directions(self) -> &'static [Vector] {
        match self {
            PieceKind::Bishop => &Vector::BISHOP_DIRECTIONS,
            PieceKind::Rook => &Vector::ROOK_DIRECTIONS,
            PieceKind::Queen => &Vector::QUEEN_DIRECTIONS,
            PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
        }
    }
}
impl Display for PieceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::Pawn => write!(f, "pawn")?,
            PieceKind::Knight => write!(f, "knight")?,
            PieceKind::Bishop => write!(f, "bishop")?,
            PieceKind::Rook => write!(f, "rook")?,
            PieceKind::Queen => write!(f, "queen")?,
            PieceKind::King => write!(f, "king")?,
        }
        Ok(())
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParsePieceKindError {
    Empty,
    UnknownSymbol(char),
    UnexpectedSymbol(char),
}
impl Display for ParsePieceKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParsePieceKindError::Empty => write!(f, "expected one character, found none instead")?,
            ParsePieceKindError::UnknownSymbol(c) => write!(
                f,
                "found `{c}`, expected one of `p`, `n`, `b`, `r`, `q`, `k`, or uppercase forms of these letters"
            )?,
            ParsePieceKindError::UnexpectedSymbol(c) => {
                write!(f, "unexpected `{c}`, only one character is expected")?;
            }
        }
        Ok(())
    }
}
impl Error for ParsePieceKindError {}

impl TryFrom<char> for PieceKind {
    type Error = ParsePieceKindError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        let piece = match value {
            'p' | 'P' => PieceKind::Pawn,
            'n' | 'N' => PieceKind::Knight,
            'b' | 'B' => PieceKind::Bishop,
            'r' | 'R' => PieceKind::Rook,
            'q' | 'Q' => PieceKind::Queen,
            'k' | 'K' => PieceKind::King,
            c => return Err(ParsePieceKindError::UnknownSymbol(c)),
        };
        Ok(piece)
    }
}
impl FromStr for PieceKind {
    type Err = ParsePieceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut characters = s.chars();
        let piece = characters
            .next()
            .ok_or(ParsePieceKindError::Empty)?
            .try_into()?;

        if let Some(c) = characters.next() {
            return Err(ParsePieceKindError::UnexpectedSymbol(c));
        }
        Ok(piece)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Option<Square>,
    pub has_moved: bool,
}
impl Piece {
    pub fn new(kind: PieceKind, color: Color, square: Square) -> Self {
        Piece {
            kind,
            color,
            square: Some(square),
            has_moved: false,
        }
    }
    pub fn is_on_board(self) -> bool {
        self.square.is_some()
    }
    pub fn fen(self) -> char {
        match self.color {
            Color::White => self.kind.uppercase(),
            Color::Black => self.kind.lowercase(),
        }
    }
    pub fn figurine(self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
    /// Pseudo-legal destinations: movement, blocking and capture rules are
    /// respected, but whether the move leaves the own king attacked is not
    /// looked at. Castling landing squares are candidates only; attacks on
    /// the king's path are the caller's concern.
    ///
    /// Off-board pieces have no moves.
    pub fn possible_moves(self, board: &Board, en_passant_target: Option<Square>) -> SquareSet {
        let Some(origin) = self.square else {
            return SquareSet::EMPTY;
        };
        match self.kind {
            PieceKind::Pawn => self.pawn_moves(origin, board, en_passant_target),
            PieceKind::Knight => self.step_moves(origin, board, &Vector::KNIGHT_MOVES),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                self.all_directional_moves(origin, board, self.kind.directions())
            }
            PieceKind::King => {
                let mut moves = self.step_moves(origin, board, &Vector::KING_MOVES);
                moves.extend(self.castling_moves(origin, board));
                moves
            }
        }
    }
    fn can_land_on(self, board: &Board, destination: Square) -> bool {
        board
            .color_at(destination)
            .is_none_or(|color| color != self.color)
    }
    fn step_moves(self, origin: Square, board: &Board, moves: &[Vector]) -> SquareSet {
        moves
            .iter()
            .copied()
            .filter_map(|movement| origin.move_by(movement))
            .filter(|destination| self.can_land_on(board, *destination))
            .collect()
    }
    fn directional_moves(
        self,
        origin: Square,
        board: &Board,
        direction: Vector,
    ) -> impl Iterator<Item = Square> {
        let mut resume = true;
        origin.line_exclusive(direction).map_while(move |destination| {
            if !resume {
                return None;
            }
            match board.color_at(destination) {
                None => Some(destination),
                Some(color) => {
                    resume = false;
                    (color != self.color).then_some(destination)
                }
            }
        })
    }
    fn all_directional_moves(
        self,
        origin: Square,
        board: &Board,
        directions: &[Vector],
    ) -> SquareSet {
        directions
            .iter()
            .copied()
            .flat_map(|direction| self.directional_moves(origin, board, direction))
            .collect()
    }
    fn pawn_moves(
        self,
        origin: Square,
        board: &Board,
        en_passant_target: Option<Square>,
    ) -> SquareSet {
        let forward_jumps = if origin.rank() == pawn_home_rank(self.color) {
            2
        } else {
            1
        };
        let mut moves: SquareSet = origin
            .line_exclusive(Vector::pawn_single_move(self.color))
            .take(forward_jumps)
            .take_while(|destination| board.color_at(*destination).is_none())
            .collect();
        moves.extend(
            Vector::pawn_attacks(self.color)
                .into_iter()
                .filter_map(|movement| origin.move_by(movement))
                .filter(|destination| match board.color_at(*destination) {
                    Some(color) => color != self.color,
                    None => {
                        Some(*destination) == en_passant_target
                            && self.en_passant_victim(*destination, board).is_some()
                    }
                }),
        );
        moves
    }
    pub fn en_passant_victim(self, destination: Square, board: &Board) -> Option<Square> {
        let victim = destination.move_by(Vector {
            x: 0,
            y: -pawn_direction(self.color),
        })?;
        board
            .piece_at(victim)
            .is_some_and(|piece| piece.kind == PieceKind::Pawn && piece.color != self.color)
            .then_some(victim)
    }
    fn castling_moves(self, origin: Square, board: &Board) -> impl Iterator<Item = Square> {
        let eligible = !self.has_moved && origin.file() == KING_FILE;
        CastlingSide::ALL
            .into_iter()
            .filter(move |_| eligible)
            .filter(move |side| {
                let rank = origin.rank();
                board
                    .piece_at(Square::new(side.rook_origin_file(), rank))
                    .is_some_and(|rook| {
                        rook.kind == PieceKind::Rook && rook.color == self.color && !rook.has_moved
                    })
                    && side
                        .files_between()
                        .all(|file| board.color_at(Square::new(file, rank)).is_none())
            })
            .map(move |side| Square::new(side.king_destination_file(), origin.rank()))
    }
}
impl Display for Piece {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.square {
            Some(square) => write!(f, "{} {} on {square}", self.color, self.kind)?,
            None => write!(f, "captured {} {}", self.color, self.kind)?,
        }
        Ok(())
    }
}
#[cfg(test)]
mod test {
    use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};

    use crate::{
        fen::Fen,
        piece::PieceKind,
        square::{Square, SquareSet},
        state::GameState,
    };

    fn state(fen: &str) -> GameState {
        fen.parse::<Fen>().unwrap().0
    }
    fn moves_of(state: &GameState, square: Square) -> SquareSet {
        state
            .board()
            .piece_at(square)
            .unwrap()
            .possible_moves(state.board(), state.en_passant_target())
    }
    fn set(squares: &[Square]) -> SquareSet {
        squares.iter().copied().collect()
    }

    #[test]
    fn knight_in_corner_has_two_moves() {
        let state = state("4k3/8/8/8/8/8/8/N3K3 w - - 0 1");
        assert_eq!(
            moves_of(&state, square!("a1")),
            set(&[square!("b3"), square!("c2")])
        );
    }
    #[test]
    fn knight_does_not_land_on_friends() {
        let state = GameState::starting_position();
        assert_eq!(
            moves_of(&state, square!("g1")),
            set(&[square!("f3"), square!("h3")])
        );
    }
    #[test]
    fn rook_stops_at_first_blocker_and_captures_enemy_only() {
        let state = state("4k3/8/8/8/R2p4/8/8/R3K3 w - - 0 1");
        let moves = moves_of(&state, square!("a4"));
        assert!(moves.contains(square!("d4")));
        assert!(!moves.contains(square!("e4")));
        assert!(moves.contains(square!("a2")));
        assert!(!moves.contains(square!("a1")));
        assert!(moves.contains(square!("a8")));
    }
    #[test]
    fn bishop_on_edge_does_not_wrap() {
        let state = state("4k3/8/8/8/7B/8/8/4K3 w - - 0 1");
        assert_eq!(
            moves_of(&state, square!("h4")),
            set(&[
                square!("g5"),
                square!("f6"),
                square!("e7"),
                square!("d8"),
                square!("g3"),
                square!("f2"),
            ])
        );
    }
    #[test]
    fn queen_is_union_of_rook_and_bishop() {
        let state = state("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1");
        let queen = moves_of(&state, square!("d4"));
        let rook = state.board().piece_at(square!("d4")).map(|mut piece| {
            piece.kind = PieceKind::Rook;
            piece.possible_moves(state.board(), None)
        });
        let bishop = state.board().piece_at(square!("d4")).map(|mut piece| {
            piece.kind = PieceKind::Bishop;
            piece.possible_moves(state.board(), None)
        });
        let union: SquareSet = rook.unwrap().iter().chain(bishop.unwrap()).collect();
        assert_eq!(queen, union);
        assert_eq!(queen.len(), 27);
    }
    #[test]
    fn pawn_single_and_double_step() {
        let state = GameState::starting_position();
        assert_eq!(
            moves_of(&state, square!("e2")),
            set(&[square!("e3"), square!("e4")])
        );
        assert_eq!(
            moves_of(&state, square!("d7")),
            set(&[square!("d6"), square!("d5")])
        );
    }
    #[test]
    fn pawn_double_step_needs_both_squares_empty() {
        let blocked_far = state("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        assert_eq!(moves_of(&blocked_far, square!("e2")), set(&[square!("e3")]));
        let blocked_near = state("4k3/8/8/8/8/4n3/4P3/4K3 w - - 0 1");
        assert!(moves_of(&blocked_near, square!("e2")).is_empty());
    }
    #[test]
    fn pawn_captures_diagonally_only_onto_enemies() {
        let state = state("4k3/8/8/3p1P2/4P3/8/8/4K3 w - - 0 1");
        assert_eq!(
            moves_of(&state, square!("e4")),
            set(&[square!("d5"), square!("e5")])
        );
    }
    #[test]
    fn pawn_may_take_en_passant_target() {
        let state = state("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        assert_eq!(
            moves_of(&state, square!("e5")),
            set(&[square!("d6"), square!("e6")])
        );
    }
    #[test]
    fn king_castling_candidates_ignore_attacks() {
        let state = state("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = moves_of(&state, square!("e1"));
        assert!(moves.contains(square!("g1")));
        assert!(moves.contains(square!("c1")));

        let attacked = state_with_rook_on_f8();
        assert!(moves_of(&attacked, square!("e1")).contains(square!("g1")));
    }
    fn state_with_rook_on_f8() -> GameState {
        state("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1")
    }
    #[test]
    fn castling_needs_empty_squares_between_king_and_rook() {
        let state = state("4k3/8/8/8/8/8/8/RN2K1NR w KQ - 0 1");
        let moves = moves_of(&state, square!("e1"));
        assert!(!moves.contains(square!("g1")));
        assert!(!moves.contains(square!("c1")));
    }
    #[test]
    fn moved_rook_gives_no_castling_candidate() {
        let state = state("4k3/8/8/8/8/8/8/R3K2R w K - 0 1");
        let moves = moves_of(&state, square!("e1"));
        assert!(moves.contains(square!("g1")));
        assert!(!moves.contains(square!("c1")));
    }
    #[test]
    fn parse_piece_kind() {
        assert_eq!("q".parse(), Ok(PieceKind::Queen));
        assert_eq!("N".parse(), Ok(PieceKind::Knight));
        assert!("x".parse::<PieceKind>().is_err());
        assert!("qq".parse::<PieceKind>().is_err());
    }
    #[test]
    fn moves_never_land_on_friends_nor_jump_blockers() {
        let mut rng = SmallRng::seed_from_u64(0xb10c);
        for _ in 0..6 {
            let mut state = GameState::starting_position();
            for _ in 0..120 {
                let board = state.board();
                for piece in board.on_board() {
                    let Some(origin) = piece.square else {
                        continue;
                    };
                    for destination in piece.possible_moves(board, state.en_passant_target()) {
                        assert_ne!(board.color_at(destination), Some(piece.color));
                        let inside = match piece.kind {
                            PieceKind::Bishop => origin
                                .is_aligned_with_bishop(destination)
                                .map(|it| Box::new(it) as Box<dyn Iterator<Item = _>>),
                            PieceKind::Rook => origin
                                .is_aligned_with_rook(destination)
                                .map(|it| Box::new(it) as Box<dyn Iterator<Item = _>>),
                            PieceKind::Queen => origin
                                .is_aligned_with_queen(destination)
                                .map(|it| Box::new(it) as Box<dyn Iterator<Item = _>>),
                            _ => None,
                        };
                        if let Some(mut inside) = inside {
                            assert!(inside.all(|square| board.color_at(square).is_none()));
                        }
                    }
                }
                let moves = state.legal_moves();
                let Some(&(from, to)) = moves.choose(&mut rng) else {
                    break;
                };
                state.apply_move(from, to, None).unwrap();
            }
        }
    }
}
