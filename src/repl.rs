use std::{
    error::Error,
    fmt::{self, Display, Formatter, Write as _},
    io::{self, BufRead, Write, stderr, stdin, stdout},
    num::ParseIntError,
    str::FromStr,
};

use chess_rules::{
    Color, Fen, GameState, Lan, ParseFenError, ParseLanError, Square, SquareSet, bot, fuzz,
};
use rand::{SeedableRng, rngs::SmallRng};
use tracing::info;

use crate::board_display::BoardDisplay;

fn strip_prefix_token<'a>(src: &'a str, search: &str) -> Option<&'a str> {
    src.strip_prefix(search)
        .filter(|src| src.chars().next().is_none_or(<char>::is_whitespace))
        .map(<str>::trim_start)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Help,
    Flip,
    Restart,
    Quit,
    Import(Fen),
    ExportFen,
    Square(Square),
    Move(Lan),
    Bot,
    Fuzz(usize),
}
impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Input::Help => write!(f, "help")?,
            Input::Flip => write!(f, "flip")?,
            Input::Restart => write!(f, "restart")?,
            Input::Quit => write!(f, "quit")?,
            Input::Import(fen) => write!(f, "import {fen}")?,
            Input::ExportFen => write!(f, "fen")?,
            Input::Square(square) => write!(f, "{square}")?,
            Input::Move(movement) => write!(f, "{movement}")?,
            Input::Bot => write!(f, "bot")?,
            Input::Fuzz(plies) => write!(f, "fuzz {plies}")?,
        }
        Ok(())
    }
}
impl FromStr for Input {
    type Err = ParseInputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "help" => Ok(Input::Help),
            "flip" => Ok(Input::Flip),
            "restart" => Ok(Input::Restart),
            "quit" => Ok(Input::Quit),
            "fen" => Ok(Input::ExportFen),
            "bot" => Ok(Input::Bot),
            s => {
                if let Some(s) = strip_prefix_token(s, "import") {
                    Ok(Input::Import(s.parse()?))
                } else if let Some(s) = strip_prefix_token(s, "fuzz") {
                    Ok(Input::Fuzz(s.parse()?))
                } else if let Ok(square) = s.parse() {
                    Ok(Input::Square(square))
                } else {
                    Ok(Input::Move(s.parse()?))
                }
            }
        }
    }
}
#[allow(
    clippy::too_many_lines,
    reason = "further decomposition could potentially hurt readability"
)]
pub fn repl() -> io::Result<()> {
    let input = stdin().lock();
    let mut output = stdout().lock();
    let mut error = stderr().lock();

    let mut lines = input.lines();

    let mut state = GameState::starting_position();
    let mut info = String::new();
    let mut highlighted = SquareSet::EMPTY;
    let mut update = true;
    let mut view = Color::White;
    let mut first_time = true;
    let mut rng = SmallRng::from_os_rng();
    loop {
        if update {
            info.clear();
            let status = state.status();
            match status.end_state(state.side_to_move()) {
                Some(end_state) => writeln!(&mut info, "{end_state} by {status}").unwrap(),
                None => writeln!(&mut info, "{} plays", state.side_to_move()).unwrap(),
            }
        }
        if first_time {
            writeln!(&mut info, "type `help` for instructions").unwrap();
            first_time = false;
        }
        update = false;
        writeln!(
            output,
            "{}",
            BoardDisplay {
                board: state.board(),
                view,
                highlighted,
                checked: state.checked_king(),
                info: &info,
            },
        )?;
        loop {
            write!(output, "> ")?;
            output.flush()?;
            let Some(text) = lines.next() else {
                return Ok(());
            };
            let input = match text?.trim().parse() {
                Ok(input) => input,
                Err(err) => {
                    writeln!(error, "Error: {err}")?;
                    writeln!(error, "for available command, enter `help`")?;
                    continue;
                }
            };
            match input {
                Input::Help => {
                    writeln!(output, "flip           - flip the board")?;
                    writeln!(output, "restart        - reset to starting position")?;
                    writeln!(output, "quit           - quit the game")?;
                    writeln!(output, "import <fen>   - import a position")?;
                    writeln!(output, "fen            - export the position as fen")?;
                    writeln!(output, "e2             - view valid moves")?;
                    writeln!(output, "e2e4           - play the move")?;
                    writeln!(output, "e7e8n          - move and promote")?;
                    writeln!(output, "e1g1           - perform castling")?;
                    writeln!(output, "bot            - let a bot play a random move")?;
                    writeln!(output, "fuzz <plies>   - test move generation")?;
                }
                Input::Flip => {
                    view = !view;
                }
                Input::Restart => {
                    state = GameState::starting_position();
                    update = true;
                    highlighted = SquareSet::EMPTY;
                }
                Input::Quit => return Ok(()),
                Input::Import(Fen(imported)) => {
                    state = imported;
                    update = true;
                    highlighted = SquareSet::EMPTY;
                }
                Input::ExportFen => {
                    writeln!(output, "{}", Fen(state.clone()))?;
                }
                Input::Square(square) => {
                    let Some(piece) = state.board().piece_at(square) else {
                        writeln!(error, "Error: No piece found on {square}")?;
                        continue;
                    };
                    if piece.color != state.side_to_move() {
                        writeln!(error, "Error: It is {}'s turn", state.side_to_move())?;
                        continue;
                    }
                    highlighted = state.legal_destinations(square);
                }
                Input::Move(lan) => {
                    if let Err(err) = state.apply_move(lan.origin, lan.destination, lan.promotion)
                    {
                        writeln!(error, "Error: {err}")?;
                        continue;
                    }
                    highlighted = [lan.origin, lan.destination].into_iter().collect();
                    update = true;
                }
                Input::Bot => {
                    let Some(lan) = bot::random_move(&state, &mut rng) else {
                        writeln!(error, "Error: The game is over")?;
                        continue;
                    };
                    if let Err(err) = state.apply_move(lan.origin, lan.destination, lan.promotion)
                    {
                        writeln!(error, "Error: {err}")?;
                        continue;
                    }
                    writeln!(output, "bot plays {lan}")?;
                    highlighted = [lan.origin, lan.destination].into_iter().collect();
                    update = true;
                }
                Input::Fuzz(plies) => {
                    match fuzz::fuzz(plies, &mut rng) {
                        Ok(()) => {
                            info!(plies, "fuzzing found no mismatch");
                            writeln!(output, "no mismatch found in {plies} plies")?;
                        }
                        Err(mismatch) => writeln!(error, "Error: {mismatch}")?,
                    }
                    continue;
                }
            }
            break;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseInputError {
    Fen(ParseFenError),
    Move(ParseLanError),
    Int(ParseIntError),
}
impl From<ParseFenError> for ParseInputError {
    fn from(value: ParseFenError) -> Self {
        ParseInputError::Fen(value)
    }
}
impl From<ParseLanError> for ParseInputError {
    fn from(value: ParseLanError) -> Self {
        ParseInputError::Move(value)
    }
}
impl From<ParseIntError> for ParseInputError {
    fn from(value: ParseIntError) -> Self {
        ParseInputError::Int(value)
    }
}
impl Display for ParseInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ParseInputError::Fen(err) => write!(f, "{err}")?,
            ParseInputError::Move(err) => write!(f, "{err}")?,
            ParseInputError::Int(err) => write!(f, "{err}")?,
        }
        Ok(())
    }
}
impl Error for ParseInputError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ParseInputError::Fen(err) => Some(err),
            ParseInputError::Move(err) => Some(err),
            ParseInputError::Int(err) => Some(err),
        }
    }
}
#[cfg(test)]
mod test {
    use chess_rules::{Lan, Square};

    use crate::repl::{Input, strip_prefix_token};

    #[test]
    fn prefix_token_needs_whitespace() {
        assert_eq!(strip_prefix_token("import  8/8", "import"), Some("8/8"));
        assert_eq!(strip_prefix_token("imported", "import"), None);
        assert_eq!(strip_prefix_token("fuzz", "fuzz"), Some(""));
    }
    #[test]
    fn parse_commands() {
        assert_eq!("fuzz 20".parse(), Ok(Input::Fuzz(20)));
        assert_eq!("e2".parse(), Ok(Input::Square(Square::new(4, 1))));
        assert_eq!(
            "e2e4".parse(),
            Ok(Input::Move(Lan::new(Square::new(4, 1), Square::new(4, 3))))
        );
        assert!("fuzz many".parse::<Input>().is_err());
        assert!("import 8/8 w".parse::<Input>().is_err());
    }
}
