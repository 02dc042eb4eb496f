use std::fmt::{self, Display, Formatter};

use chess_rules::{Board, Color, Piece, Square, SquareSet};

const WHITE: &str = "\x1b[30;107m";
const BLACK: &str = "\x1b[30;47m";
const HIGHLIGHTED: &str = "\x1b[30;103m";
const CHECKED: &str = "\x1b[30;101m";
const RESET: &str = "\x1b[0m";

pub struct BoardDisplay<'a, 'b> {
    pub board: &'a Board,
    pub view: Color,
    pub highlighted: SquareSet,
    pub checked: Option<Square>,
    pub info: &'b str,
}
impl Display for BoardDisplay<'_, '_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut lines = self.info.lines().fuse();
        for row in 0..8 {
            let rank = match self.view {
                Color::White => 7 - row,
                Color::Black => row,
            };
            for column in 0..8 {
                let file = match self.view {
                    Color::White => column,
                    Color::Black => 7 - column,
                };
                let square = Square::new(file, rank);
                let color = if Some(square) == self.checked {
                    CHECKED
                } else if self.highlighted.contains(square) {
                    HIGHLIGHTED
                } else {
                    match square.shade() {
                        Color::White => WHITE,
                        Color::Black => BLACK,
                    }
                };
                let figurine = self
                    .board
                    .piece_at(square)
                    .map_or(' ', Piece::figurine);
                write!(f, "{color}{figurine} {RESET}")?;
            }
            write!(f, "{}", rank + 1)?;
            if let Some(line) = lines.next() {
                write!(f, " {line}")?;
            }
            writeln!(f)?;
        }
        match self.view {
            Color::White => write!(f, "a b c d e f g h")?,
            Color::Black => write!(f, "h g f e d c b a")?,
        }
        if let Some(line) = lines.next() {
            write!(f, "   {line}")?;
        }
        writeln!(f)?;
        for line in lines {
            writeln!(f, "                  {line}")?;
        }
        Ok(())
    }
}
