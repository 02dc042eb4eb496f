//! Rules of standard chess: move generation, check detection, and move
//! application with castling, en passant, and promotion.
//!
//! ```
//! use chess_rules::{GameState, Status};
//!
//! let mut state = GameState::starting_position();
//! for lan in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     state.apply_lan(lan).unwrap();
//! }
//! assert_eq!(state.status(), Status::Checkmate);
//! ```
#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

#[macro_use]
pub mod square;

pub mod attack;
pub mod board;
pub mod bot;
pub mod castling;
pub mod check;
pub mod color;
pub mod end_state;
pub mod error;
pub mod fen;
pub mod fuzz;
pub mod lan;
pub mod piece;
pub mod state;

pub use crate::{
    board::{Board, Occupancy, PieceIndex},
    castling::CastlingSide,
    color::Color,
    end_state::{EndState, Status},
    error::MoveError,
    fen::{Fen, InvalidPosition, ParseFenError},
    lan::{Lan, ParseLanError},
    piece::{Piece, PieceKind},
    square::{ParseSquareError, Square, SquareSet},
    state::{GameState, MoveOutcome},
};
