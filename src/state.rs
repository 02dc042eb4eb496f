use tracing::{debug, trace};

use crate::{
    board::{Board, Occupancy, PieceIndex},
    castling::CastlingSide,
    check,
    color::Color,
    end_state::Status,
    error::MoveError,
    lan::Lan,
    piece::PieceKind,
    square::{Square, SquareSet, pawn_promotion_rank},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
struct Effects {
    captured: Option<(PieceKind, Square)>,
    castling: Option<CastlingSide>,
    promotion: Option<PieceKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveOutcome {
    pub lan: Lan,
    pub piece: PieceKind,
    pub captured: Option<(PieceKind, Square)>,
    pub castling: Option<CastlingSide>,
    pub promotion: Option<PieceKind>,
    pub status: Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    side_to_move: Color,
    en_passant_target: Option<Square>,
}
impl GameState {
    pub fn starting_position() -> Self {
        GameState {
            board: Board::starting_position(),
            side_to_move: Color::White,
            en_passant_target: None,
        }
    }
    pub fn from_parts(board: Board, side_to_move: Color, en_passant_target: Option<Square>) -> Self {
        GameState {
            board,
            side_to_move,
            en_passant_target,
        }
    }
    pub fn board(&self) -> &Board {
        &self.board
    }
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }
    pub fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }
    pub fn occupancy(&self) -> Occupancy {
        self.board.occupancy()
    }
    pub fn is_in_check(&self, side: Color) -> bool {
        check::is_in_check(self, side)
    }
    pub fn status(&self) -> Status {
        let side = self.side_to_move;
        let in_check = check::is_in_check(self, side);
        match (in_check, check::has_legal_move(self, side)) {
            (true, true) => Status::Check,
            (true, false) => Status::Checkmate,
            (false, true) => Status::Ongoing,
            (false, false) => Status::Stalemate,
        }
    }
    pub fn checked_king(&self) -> Option<Square> {
        self.board
            .king(self.side_to_move)
            .and_then(|king| king.square)
            .filter(|_| check::is_in_check(self, self.side_to_move))
    }
    pub fn legal_destinations(&self, from: Square) -> SquareSet {
        match self.board.get(from) {
            Some((index, piece)) if piece.color == self.side_to_move => {
                self.legal_destinations_of(index)
            }
            _ => SquareSet::EMPTY,
        }
    }
    pub fn legal_moves(&self) -> Vec<(Square, Square)> {
        check::escape_moves(self, self.side_to_move)
    }
    pub fn is_promotion(&self, from: Square, to: Square) -> bool {
        self.board.piece_at(from).is_some_and(|piece| {
            piece.kind == PieceKind::Pawn && to.rank() == pawn_promotion_rank(piece.color)
        })
    }
    pub(crate) fn legal_destinations_of(&self, index: PieceIndex) -> SquareSet {
        let piece = self.board[index];
        let Some(origin) = piece.square else {
            return SquareSet::EMPTY;
        };
        piece
            .possible_moves(&self.board, self.en_passant_target)
            .into_iter()
            .filter(|destination| {
                match CastlingSide::from_king_move(origin, *destination)
                    .filter(|_| piece.kind == PieceKind::King)
                {
                    Some(side) => self.can_castle_through(index, origin, side, piece.color),
                    None => true,
                }
            })
            .filter(|destination| {
                !check::is_in_check(
                    &self.after_move(index, *destination, PieceKind::Queen),
                    piece.color,
                )
            })
            .collect()
    }
    fn can_castle_through(
        &self,
        index: PieceIndex,
        origin: Square,
        side: CastlingSide,
        color: Color,
    ) -> bool {
        if check::is_in_check(self, color) {
            return false;
        }
        let mut transit = self.clone();
        transit.board.piece_mut(index).square =
            Some(Square::new(side.rook_destination_file(), origin.rank()));
        !check::is_in_check(&transit, color)
    }
    fn after_move(&self, index: PieceIndex, destination: Square, promotion: PieceKind) -> Self {
        let mut state = self.clone();
        state.play(index, destination, promotion);
        state
    }
    fn play(&mut self, index: PieceIndex, destination: Square, promotion: PieceKind) -> Effects {
        let piece = self.board[index];
        let Some(origin) = piece.square else {
            return Effects::default();
        };
        let en_passant_target = self.en_passant_target.take();

        let captured_square = if self.board.index_at(destination).is_some() {
            Some(destination)
        } else if piece.kind == PieceKind::Pawn
            && Some(destination) == en_passant_target
            && origin.file() != destination.file()
        {
            piece.en_passant_victim(destination, &self.board)
        } else {
            None
        };
        let captured = captured_square.and_then(|square| {
            let (victim, captured) = self.board.get(square)?;
            self.board.piece_mut(victim).square = None;
            Some((captured.kind, square))
        });

        let castling = CastlingSide::from_king_move(origin, destination)
            .filter(|_| piece.kind == PieceKind::King);
        if let Some(side) = castling
            && let Some((rook, _)) = self
                .board
                .get(Square::new(side.rook_origin_file(), origin.rank()))
        {
            let rook = self.board.piece_mut(rook);
            rook.square = Some(Square::new(side.rook_destination_file(), origin.rank()));
            rook.has_moved = true;
        }

        let mover = self.board.piece_mut(index);
        mover.square = Some(destination);
        mover.has_moved = true;

        if piece.kind == PieceKind::Pawn
            && origin.file() == destination.file()
            && origin.rank().abs_diff(destination.rank()) == 2
        {
            self.en_passant_target = Some(Square::new(
                origin.file(),
                u8::midpoint(origin.rank(), destination.rank()),
            ));
        }
        let promotion = (piece.kind == PieceKind::Pawn
            && destination.rank() == pawn_promotion_rank(piece.color))
        .then(|| {
            self.board.piece_mut(index).kind = promotion;
            promotion
        });
        self.side_to_move = !piece.color;

        Effects {
            captured,
            castling,
            promotion,
        }
    }
    /// Validates and applies a move of the side to move. A missing promotion
    /// choice promotes to a queen, and a choice is refused on a move that does
    /// not promote. On error nothing changes.
    pub fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> Result<MoveOutcome, MoveError> {
        let side = self.side_to_move;
        let Some((index, piece)) = self
            .board
            .get(from)
            .filter(|(_, piece)| piece.color == side)
        else {
            debug!(%from, %to, %side, "rejected move without a piece to move");
            return Err(MoveError::NoPieceAtSource { square: from, side });
        };
        if !self.legal_destinations_of(index).contains(to) {
            debug!(%from, %to, %side, "rejected illegal move");
            return Err(MoveError::IllegalDestination { from, to });
        }
        let promotion = match promotion {
            Some(kind) if !kind.is_promotion_choice() || !self.is_promotion(from, to) => {
                debug!(%from, %to, %kind, "rejected promotion");
                return Err(MoveError::InvalidPromotion { kind });
            }
            promotion => promotion.unwrap_or(PieceKind::Queen),
        };
        let effects = self.play(index, to, promotion);
        let status = self.status();
        let lan = Lan {
            origin: from,
            destination: to,
            promotion: effects.promotion,
        };
        trace!(%lan, %side, %status, "applied move");
        if let Some(end_state) = status.end_state(self.side_to_move) {
            debug!(%lan, %end_state, "game over");
        }
        Ok(MoveOutcome {
            lan,
            piece: piece.kind,
            captured: effects.captured,
            castling: effects.castling,
            promotion: effects.promotion,
            status,
        })
    }
    pub fn apply_lan(&mut self, lan: &str) -> Result<MoveOutcome, MoveError> {
        let lan = lan.parse::<Lan>().inspect_err(|err| {
            debug!(%lan, %err, "rejected malformed move");
        })?;
        self.apply_move(lan.origin, lan.destination, lan.promotion)
    }
}
impl Default for GameState {
    fn default() -> Self {
        GameState::starting_position()
    }
}
