use rand::{Rng, seq::IndexedRandom};

use crate::{lan::Lan, piece::PieceKind, state::GameState};

pub fn random_move(state: &GameState, rng: &mut impl Rng) -> Option<Lan> {
    let moves = state.legal_moves();
    let &(origin, destination) = moves.choose(rng)?;
    Some(Lan {
        origin,
        destination,
        promotion: state
            .is_promotion(origin, destination)
            .then_some(PieceKind::Queen),
    })
}
#[cfg(test)]
mod test {
    use rand::{SeedableRng, rngs::SmallRng};

    use crate::{bot::random_move, fen::Fen, piece::PieceKind, state::GameState};

    #[test]
    fn plays_only_legal_moves() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut state = GameState::starting_position();
        for _ in 0..100 {
            let Some(lan) = random_move(&state, &mut rng) else {
                assert!(state.status().is_over());
                break;
            };
            assert!(state.legal_destinations(lan.origin).contains(lan.destination));
            state.apply_move(lan.origin, lan.destination, lan.promotion).unwrap();
        }
    }
    #[test]
    fn promotes_to_queen() {
        let mut rng = SmallRng::seed_from_u64(1);
        let Fen(state) = "k7/7P/8/8/8/8/8/K7 w - - 0 1".parse().unwrap();
        let promotions = (0..50)
            .filter_map(|_| random_move(&state, &mut rng))
            .filter(|lan| lan.origin == square!("h7"));
        for lan in promotions {
            assert_eq!(lan.promotion, Some(PieceKind::Queen));
        }
    }
    #[test]
    fn no_move_when_mated() {
        let mut rng = SmallRng::seed_from_u64(3);
        let Fen(state) = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1".parse().unwrap();
        assert_eq!(random_move(&state, &mut rng), None);
    }
}
