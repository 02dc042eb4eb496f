use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use rand::{Rng, seq::IndexedRandom};
use rustc_hash::FxHashSet;
use tracing::{debug, trace};

use crate::{
    end_state::Status,
    error::MoveError,
    fen::Fen,
    lan::Lan,
    piece::PieceKind,
    square::Square,
    state::GameState,
};

const MAX_GAME_LENGTH: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FuzzMismatch {
    Unexpected { fen: String, lan: Lan },
    Missing { fen: String, lan: Lan },
    Status { fen: String, status: Status },
    Unreadable { fen: String },
    Rejected { fen: String, error: MoveError },
    Diverged {
        lan: Lan,
        fen: String,
        reference: String,
    },
}
impl Display for FuzzMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FuzzMismatch::Unexpected { fen, lan } => {
                write!(f, "found {lan} but it's not a legal move\n{fen}")?;
            }
            FuzzMismatch::Missing { fen, lan } => write!(f, "{lan} not found\n{fen}")?,
            FuzzMismatch::Status { fen, status } => {
                write!(f, "reported {status} but the reference disagrees\n{fen}")?;
            }
            FuzzMismatch::Unreadable { fen } => {
                write!(f, "reference could not read the position\n{fen}")?;
            }
            FuzzMismatch::Rejected { fen, error } => write!(f, "{error}\n{fen}")?,
            FuzzMismatch::Diverged {
                lan,
                fen,
                reference,
            } => write!(f, "positions differ after {lan}\n{fen}\n{reference}")?,
        }
        Ok(())
    }
}
impl Error for FuzzMismatch {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FuzzMismatch::Rejected { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<chess::Piece> for PieceKind {
    fn from(value: chess::Piece) -> Self {
        match value {
            chess::Piece::Pawn => PieceKind::Pawn,
            chess::Piece::Knight => PieceKind::Knight,
            chess::Piece::Bishop => PieceKind::Bishop,
            chess::Piece::Rook => PieceKind::Rook,
            chess::Piece::Queen => PieceKind::Queen,
            chess::Piece::King => PieceKind::King,
        }
    }
}
impl From<PieceKind> for chess::Piece {
    fn from(value: PieceKind) -> Self {
        match value {
            PieceKind::Pawn => chess::Piece::Pawn,
            PieceKind::Knight => chess::Piece::Knight,
            PieceKind::Bishop => chess::Piece::Bishop,
            PieceKind::Rook => chess::Piece::Rook,
            PieceKind::Queen => chess::Piece::Queen,
            PieceKind::King => chess::Piece::King,
        }
    }
}
impl From<chess::Square> for Square {
    #[allow(clippy::cast_possible_truncation, reason = "files and ranks are below 8")]
    fn from(value: chess::Square) -> Self {
        Square::new(
            value.get_file().to_index() as u8,
            value.get_rank().to_index() as u8,
        )
    }
}
impl From<Square> for chess::Square {
    fn from(value: Square) -> Self {
        chess::Square::make_square(
            chess::Rank::from_index(value.rank() as usize),
            chess::File::from_index(value.file() as usize),
        )
    }
}
impl From<chess::ChessMove> for Lan {
    fn from(value: chess::ChessMove) -> Self {
        Lan {
            origin: value.get_source().into(),
            destination: value.get_dest().into(),
            promotion: value.get_promotion().map(Into::into),
        }
    }
}
impl From<Lan> for chess::ChessMove {
    fn from(value: Lan) -> Self {
        chess::ChessMove::new(
            value.origin.into(),
            value.destination.into(),
            value.promotion.map(Into::into),
        )
    }
}
fn position(fen: &str) -> String {
    fen.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}
pub fn fuzz(plies: usize, rng: &mut impl Rng) -> Result<(), FuzzMismatch> {
    let mut state = GameState::starting_position();
    let mut game_length = 0;
    for _ in 0..plies {
        let fen = Fen(state.clone()).to_string();
        let Ok(reference) = fen.parse::<chess::Board>() else {
            return Err(FuzzMismatch::Unreadable { fen });
        };
        let moves: FxHashSet<Lan> = state
            .legal_moves()
            .into_iter()
            .map(|(origin, destination)| Lan::new(origin, destination))
            .collect();
        let reference_moves: FxHashSet<Lan> = chess::MoveGen::new_legal(&reference)
            .map(|movement| Lan::new(movement.get_source().into(), movement.get_dest().into()))
            .collect();
        if let Some(&lan) = moves.difference(&reference_moves).next() {
            return Err(FuzzMismatch::Unexpected { fen, lan });
        }
        if let Some(&lan) = reference_moves.difference(&moves).next() {
            return Err(FuzzMismatch::Missing { fen, lan });
        }
        let moves: Vec<Lan> = moves.into_iter().collect();
        let Some(&lan) = moves.choose(rng) else {
            let status = state.status();
            let agrees = matches!(
                (status, reference.status()),
                (Status::Checkmate, chess::BoardStatus::Checkmate)
                    | (Status::Stalemate, chess::BoardStatus::Stalemate)
            );
            if !agrees {
                return Err(FuzzMismatch::Status { fen, status });
            }
            debug!(%fen, %status, "game finished, restarting");
            state = GameState::starting_position();
            game_length = 0;
            continue;
        };
        let lan = Lan {
            promotion: state
                .is_promotion(lan.origin, lan.destination)
                .then(|| *PieceKind::PROMOTION_CHOICES.choose(rng).unwrap_or(&PieceKind::Queen)),
            ..lan
        };
        trace!(%fen, %lan, "fuzz move");
        if let Err(error) = state.apply_move(lan.origin, lan.destination, lan.promotion) {
            return Err(FuzzMismatch::Rejected { fen, error });
        }
        let reference = reference.make_move_new(lan.into());
        let ours = position(&Fen(state.clone()).to_string());
        let theirs = position(&reference.to_string());
        if ours != theirs {
            return Err(FuzzMismatch::Diverged {
                lan,
                fen: ours,
                reference: theirs,
            });
        }
        game_length += 1;
        if game_length >= MAX_GAME_LENGTH {
            state = GameState::starting_position();
            game_length = 0;
        }
    }
    Ok(())
}
#[cfg(test)]
mod test {
    use rand::{SeedableRng, rngs::SmallRng};

    use crate::fuzz::fuzz;

    #[test]
    fn agrees_with_reference() {
        let mut rng = SmallRng::seed_from_u64(2024);
        if let Err(mismatch) = fuzz(400, &mut rng) {
            panic!("{mismatch}");
        }
    }
}
