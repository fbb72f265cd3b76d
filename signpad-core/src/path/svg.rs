//! SVG path data for frozen paths. Only absolute `M` and `L` are understood, which is all a stroke can hold.

use super::{FrozenPath, PathCommand};
use crate::util::Point;

impl std::fmt::Display for FrozenPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for command in self.commands() {
            let (letter, point) = match command {
                PathCommand::MoveTo(p) => ('M', p),
                PathCommand::LineTo(p) => ('L', p),
            };
            write!(f, "{letter}{} {}", point.x(), point.y())?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathParseError {
    #[error("path data is empty")]
    Empty,
    #[error("path must begin with a move-to")]
    MissingMoveTo,
    #[error("a stroke path holds exactly one move-to")]
    MultipleMoveTo,
    #[error("unsupported path command {0:?}")]
    UnsupportedCommand(char),
    #[error("malformed number {0:?}")]
    BadNumber(String),
    #[error("coordinate is not finite")]
    NotFinite,
    #[error("command is missing a coordinate")]
    MissingCoordinate,
}

enum Token<'a> {
    Command(char),
    Number(&'a str),
}

/// Split SVG path data into command letters and number literals.
fn tokenize(data: &str) -> impl Iterator<Item = Token<'_>> {
    let bytes = data.as_bytes();
    let mut idx = 0;
    std::iter::from_fn(move || {
        while idx < bytes.len() && (bytes[idx].is_ascii_whitespace() || bytes[idx] == b',') {
            idx += 1;
        }
        let start = idx;
        let first = *bytes.get(idx)?;
        if !first.is_ascii() {
            // Never part of path data. Hand the whole character back so slicing stays on char boundaries.
            let letter = data[idx..].chars().next()?;
            idx += letter.len_utf8();
            return Some(Token::Command(letter));
        }
        if first.is_ascii_alphabetic() && first != b'e' && first != b'E' {
            idx += 1;
            return Some(Token::Command(char::from(first)));
        }
        idx += 1;
        while let Some(&b) = bytes.get(idx) {
            let is_sign = b == b'-' || b == b'+';
            let after_exponent = matches!(bytes[idx - 1], b'e' | b'E');
            // A sign starts a new number unless it belongs to an exponent.
            if b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E' || (is_sign && after_exponent)
            {
                idx += 1;
            } else {
                break;
            }
        }
        Some(Token::Number(&data[start..idx]))
    })
}

impl std::str::FromStr for FrozenPath {
    type Err = PathParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut commands = Vec::new();
        // Command whose coordinates are being read. Extra pairs after an `M` are implicit line-tos.
        let mut current: Option<char> = None;
        let mut pending_x: Option<f32> = None;

        for token in tokenize(s) {
            match token {
                Token::Command(letter) => {
                    if pending_x.is_some() {
                        return Err(PathParseError::MissingCoordinate);
                    }
                    match letter {
                        'M' if commands.is_empty() => current = Some('M'),
                        'M' => return Err(PathParseError::MultipleMoveTo),
                        'L' if commands.is_empty() => return Err(PathParseError::MissingMoveTo),
                        'L' => current = Some('L'),
                        other => return Err(PathParseError::UnsupportedCommand(other)),
                    }
                }
                Token::Number(literal) => {
                    let value: f32 = literal
                        .parse()
                        .map_err(|_| PathParseError::BadNumber(literal.to_owned()))?;
                    let Some(x) = pending_x.take() else {
                        if current.is_none() {
                            return Err(PathParseError::MissingMoveTo);
                        }
                        pending_x = Some(value);
                        continue;
                    };
                    let point = Point::new(x, value).map_err(|_| PathParseError::NotFinite)?;
                    if current == Some('M') {
                        commands.push(PathCommand::MoveTo(point));
                        current = Some('L');
                    } else {
                        commands.push(PathCommand::LineTo(point));
                    }
                }
            }
        }
        if pending_x.is_some() {
            return Err(PathParseError::MissingCoordinate);
        }
        if commands.is_empty() {
            return Err(if current.is_some() {
                PathParseError::MissingCoordinate
            } else {
                PathParseError::Empty
            });
        }
        // The loop only ever emits a single leading move-to.
        FrozenPath::from_commands(&commands).ok_or(PathParseError::MissingMoveTo)
    }
}
