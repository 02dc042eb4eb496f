use crate::{attack::is_square_attacked, color::Color, square::Square, state::GameState};

/// Whether the king of `side` is attacked. A side without a king is never in
/// check.
pub fn is_in_check(state: &GameState, side: Color) -> bool {
    state
        .board()
        .king(side)
        .and_then(|king| king.square)
        .is_some_and(|square| is_square_attacked(square, !side, state.board()))
}
pub fn escape_moves(state: &GameState, side: Color) -> Vec<(Square, Square)> {
    state
        .board()
        .pieces_indexed(side)
        .filter_map(|(index, piece)| piece.square.map(|origin| (index, origin)))
        .flat_map(|(index, origin)| {
            state
                .legal_destinations_of(index)
                .into_iter()
                .map(move |destination| (origin, destination))
        })
        .collect()
}
pub fn has_legal_move(state: &GameState, side: Color) -> bool {
    state
        .board()
        .pieces_indexed(side)
        .any(|(index, _)| !state.legal_destinations_of(index).is_empty())
}
pub fn is_checkmate(state: &GameState, side: Color) -> bool {
    is_in_check(state, side) && !has_legal_move(state, side)
}
pub fn is_stalemate(state: &GameState, side: Color) -> bool {
    !is_in_check(state, side) && !has_legal_move(state, side)
}
#[cfg(test)]
mod test {
    use crate::{
        board::Board,
        check::{escape_moves, is_checkmate, is_in_check, is_stalemate},
        color::Color,
        fen::Fen,
        state::GameState,
    };

    fn state(fen: &str) -> GameState {
        fen.parse::<Fen>().unwrap().0
    }

    #[test]
    fn starting_position_is_quiet() {
        let state = GameState::starting_position();
        for color in Color::ALL {
            assert!(!is_in_check(&state, color));
            assert!(!is_checkmate(&state, color));
            assert!(!is_stalemate(&state, color));
            assert_eq!(escape_moves(&state, color).len(), 20);
        }
    }
    #[test]
    fn back_rank_mate() {
        let state = state("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(is_in_check(&state, Color::Black));
        assert!(is_checkmate(&state, Color::Black));
        assert!(escape_moves(&state, Color::Black).is_empty());
        assert!(!is_checkmate(&state, Color::White));
    }
    #[test]
    fn fools_mate() {
        let state = state("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(is_checkmate(&state, Color::White));
    }
    #[test]
    fn check_with_escapes_is_not_mate() {
        let state = state("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        assert!(is_in_check(&state, Color::White));
        assert!(!is_checkmate(&state, Color::White));
        let moves = escape_moves(&state, Color::White);
        assert!(moves.contains(&(square!("e1"), square!("e2"))));
        assert!(moves.contains(&(square!("e1"), square!("d2"))));
        assert!(!moves.contains(&(square!("e1"), square!("d1"))));
        assert!(!moves.contains(&(square!("e1"), square!("f1"))));
    }
    #[test]
    fn block_and_capture_resolve_check() {
        let state = state("4k3/8/8/8/8/8/1R6/r3K3 w - - 0 1");
        let moves = escape_moves(&state, Color::White);
        assert!(moves.contains(&(square!("b2"), square!("b1"))));
        assert!(!moves.contains(&(square!("b2"), square!("b3"))));
        let state = state_after_rook_on_a2();
        let moves = escape_moves(&state, Color::White);
        assert!(moves.contains(&(square!("a2"), square!("a1"))));
    }
    fn state_after_rook_on_a2() -> GameState {
        state("4k3/8/8/8/8/8/R7/r3K3 w - - 0 1")
    }
    #[test]
    fn stalemate_is_not_check() {
        let state = state("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!is_in_check(&state, Color::Black));
        assert!(is_stalemate(&state, Color::Black));
        assert!(!is_checkmate(&state, Color::Black));
    }
    #[test]
    fn missing_king_is_never_in_check() {
        let state = GameState::from_parts(Board::empty(), Color::White, None);
        assert!(!is_in_check(&state, Color::White));
        assert!(escape_moves(&state, Color::White).is_empty());
    }
}
