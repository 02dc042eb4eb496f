use crate::{
    board::Board,
    color::Color,
    piece::{Piece, PieceKind},
    square::Square,
};

pub fn attackers(target: Square, by: Color, board: &Board) -> impl Iterator<Item = Piece> {
    let is_empty = |square: Square| board.color_at(square).is_none();
    board.pieces(by).filter(move |piece| {
        let Some(origin) = piece.square else {
            return false;
        };
        match piece.kind {
            PieceKind::Pawn => (target - origin).is_pawn_attack(by),
            PieceKind::Knight => (target - origin).is_knight_move(),
            PieceKind::Bishop => origin
                .is_aligned_with_bishop(target)
                .is_some_and(|mut inside| inside.all(is_empty)),
            PieceKind::Rook => origin
                .is_aligned_with_rook(target)
                .is_some_and(|mut inside| inside.all(is_empty)),
            PieceKind::Queen => origin
                .is_aligned_with_queen(target)
                .is_some_and(|mut inside| inside.all(is_empty)),
            PieceKind::King => (target - origin).is_king_move(),
        }
    })
}
pub fn is_square_attacked(target: Square, by: Color, board: &Board) -> bool {
    attackers(target, by, board).next().is_some()
}
#[cfg(test)]
mod test {
    use rand::{SeedableRng, rngs::SmallRng, seq::IndexedRandom};

    use crate::{
        attack::{attackers, is_square_attacked},
        board::Board,
        castling::CastlingSide,
        color::Color,
        fen::Fen,
        piece::PieceKind,
        square::Vector,
        state::GameState,
    };

    fn board(fen: &str) -> Board {
        fen.parse::<Fen>().unwrap().0.board().clone()
    }

    #[test]
    fn starting_position_third_rank_is_covered() {
        let board = Board::starting_position();
        for file in ["a3", "b3", "c3", "d3", "e3", "f3", "g3", "h3"] {
            assert!(is_square_attacked(file.parse().unwrap(), Color::White, &board));
        }
        assert!(!is_square_attacked(square!("e4"), Color::White, &board));
        assert!(!is_square_attacked(square!("e5"), Color::Black, &board));
    }
    #[test]
    fn pawn_attacks_forward_diagonals_only() {
        let board = board("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1");
        assert!(is_square_attacked(square!("d5"), Color::White, &board));
        assert!(is_square_attacked(square!("f5"), Color::White, &board));
        assert!(!is_square_attacked(square!("e5"), Color::White, &board));
        assert!(!is_square_attacked(square!("d3"), Color::White, &board));
    }
    #[test]
    fn black_pawn_attacks_downwards() {
        let board = board("4k3/8/8/4p3/8/8/8/4K3 w - - 0 1");
        assert!(is_square_attacked(square!("d4"), Color::Black, &board));
        assert!(!is_square_attacked(square!("d6"), Color::Black, &board));
    }
    #[test]
    fn sliders_are_blocked() {
        let board = board("4k3/8/8/8/8/8/4P3/R3K2B w - - 0 1");
        assert!(is_square_attacked(square!("a8"), Color::White, &board));
        assert!(is_square_attacked(square!("d1"), Color::White, &board));
        assert!(!is_square_attacked(square!("a3"), Color::Black, &board));
        assert!(is_square_attacked(square!("g2"), Color::White, &board));
        assert!(!is_square_attacked(square!("a8"), Color::Black, &board));
        assert!(!is_square_attacked(square!("e3"), Color::White, &board));
        assert!(!is_square_attacked(square!("g1"), Color::White, &board));
    }
    #[test]
    fn defended_own_piece_counts_as_attacked() {
        let board = Board::starting_position();
        assert!(is_square_attacked(square!("e2"), Color::White, &board));
    }
    #[test]
    fn lists_every_attacker() {
        let board = board("4k3/8/8/3q4/8/5n2/8/4K3 w - - 0 1");
        let kinds: Vec<_> = attackers(square!("e1"), Color::Black, &board)
            .map(|piece| piece.kind)
            .collect();
        assert_eq!(kinds, [PieceKind::Knight]);
        let kinds: Vec<_> = attackers(square!("d1"), Color::Black, &board)
            .map(|piece| piece.kind)
            .collect();
        assert_eq!(kinds, [PieceKind::Queen]);
    }
    #[test]
    fn every_reachable_square_is_attacked() {
        let mut rng = SmallRng::seed_from_u64(0xa77ac);
        for _ in 0..6 {
            let mut state = GameState::starting_position();
            for _ in 0..120 {
                let board = state.board();
                for piece in board.on_board() {
                    let Some(origin) = piece.square else {
                        continue;
                    };
                    if piece.kind == PieceKind::Pawn {
                        for target in Vector::pawn_attacks(piece.color)
                            .into_iter()
                            .filter_map(|movement| origin.move_by(movement))
                        {
                            assert!(is_square_attacked(target, piece.color, board));
                        }
                        continue;
                    }
                    for target in piece
                        .possible_moves(board, state.en_passant_target())
                        .into_iter()
                        .filter(|target| {
                            piece.kind != PieceKind::King
                                || CastlingSide::from_king_move(origin, *target).is_none()
                        })
                    {
                        assert!(is_square_attacked(target, piece.color, board));
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
