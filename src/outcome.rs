// This file is part of the rochade library.
// Copyright (C) 2024 The rochade developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

use std::{error::Error, fmt, str::FromStr};

use crate::color::Color;

/// Outcome of a finished game.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Outcome {
    Decisive { winner: Color },
    Draw,
}

impl Outcome {
    pub const fn winner(self) -> Option<Color> {
        match self {
            Outcome::Decisive { winner } => Some(winner),
            Outcome::Draw => None,
        }
    }

    pub const fn from_winner(winner: Option<Color>) -> Outcome {
        match winner {
            Some(winner) => Outcome::Decisive { winner },
            None => Outcome::Draw,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Outcome::Decisive {
                winner: Color::White,
            } => "1-0",
            Outcome::Decisive {
                winner: Color::Black,
            } => "0-1",
            Outcome::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an [`Outcome`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseOutcomeError {
    /// The game is still in progress (`*`).
    Unknown,
    Invalid,
}

impl fmt::Display for ParseOutcomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseOutcomeError::Unknown => "unknown outcome: *",
            ParseOutcomeError::Invalid => "invalid outcome",
        })
    }
}

impl Error for ParseOutcomeError {}

impl FromStr for Outcome {
    type Err = ParseOutcomeError;

    fn from_str(s: &str) -> Result<Outcome, ParseOutcomeError> {
        match s {
            "1-0" => Ok(Outcome::Decisive {
                winner: Color::White,
            }),
            "0-1" => Ok(Outcome::Decisive {
                winner: Color::Black,
            }),
            "1/2-1/2" => Ok(Outcome::Draw),
            "*" => Err(ParseOutcomeError::Unknown),
            _ => Err(ParseOutcomeError::Invalid),
        }
    }
}

/// How a game ended, or may be claimed to end.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Method {
    Checkmate,
    Resignation,
    DrawOffer,
    Stalemate,
    ThreefoldRepetition,
    FivefoldRepetition,
    FiftyMoveRule,
    SeventyFiveMoveRule,
    InsufficientMaterial,
}

impl Method {
    /// Tests if the method always ends the game in a draw.
    pub const fn is_draw(self) -> bool {
        !matches!(self, Method::Checkmate | Method::Resignation)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Checkmate => "checkmate",
            Method::Resignation => "resignation",
            Method::DrawOffer => "draw offer",
            Method::Stalemate => "stalemate",
            Method::ThreefoldRepetition => "threefold repetition",
            Method::FivefoldRepetition => "fivefold repetition",
            Method::FiftyMoveRule => "fifty-move rule",
            Method::SeventyFiveMoveRule => "seventy-five-move rule",
            Method::InsufficientMaterial => "insufficient material",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_text() {
        for outcome in [
            Outcome::Decisive {
                winner: Color::White,
            },
            Outcome::Decisive {
                winner: Color::Black,
            },
            Outcome::Draw,
        ] {
            assert_eq!(outcome.to_string().parse::<Outcome>(), Ok(outcome));
        }
        assert_eq!("*".parse::<Outcome>(), Err(ParseOutcomeError::Unknown));
        assert_eq!("2-0".parse::<Outcome>(), Err(ParseOutcomeError::Invalid));
    }

    #[test]
    fn test_method_is_draw() {
        assert!(!Method::Checkmate.is_draw());
        assert!(Method::Stalemate.is_draw());
        assert!(Method::DrawOffer.is_draw());
    }
}
