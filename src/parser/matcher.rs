//! Move Matcher
//!
//! Recognizes `G0`/`G1` moves and `G28` homing at the start of a line,
//! together with any X/Y/Z parameters interleaved with them.

use crate::geometry::Coord;
use crate::parser::number::parse_number;

/// Which command a line matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    /// `G0`
    Rapid,
    /// `G1`
    Linear,
    /// `G28`
    Home,
}

impl MoveKind {
    /// Canonical upper-case code used when re-emitting a line
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::Rapid => "G0",
            MoveKind::Linear => "G1",
            MoveKind::Home => "G28",
        }
    }
}

/// Stateful matcher: each call to [`MoveMatcher::match_line`] replaces the
/// code and axis values from the previous call.
#[derive(Debug, Clone)]
pub struct MoveMatcher {
    code: String,
    kind: Option<MoveKind>,
    coord: Coord,
}

impl Default for MoveMatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveMatcher {
    pub fn new() -> Self {
        Self {
            code: String::new(),
            kind: None,
            coord: Coord::INVALID,
        }
    }

    /// Code exactly as it appeared in the last matched line (e.g. `"g0"`)
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn kind(&self) -> Option<MoveKind> {
        self.kind
    }

    /// Axis values from the last line; axes that were absent hold the sentinel
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Match the start of `line` and return the number of bytes that make up
    /// the command, or 0 if the line holds no move or home command.
    ///
    /// Spaces and tabs between tokens are consumed. Matching stops at the
    /// first byte that does not begin an axis token or the command code.
    pub fn match_line(&mut self, line: &str) -> usize {
        self.code.clear();
        self.kind = None;
        self.coord = Coord::INVALID;

        let bytes = line.as_bytes();
        let mut axes = [f64::INFINITY; 3];
        let mut pos = 0;

        while pos < bytes.len() {
            match bytes[pos] {
                b' ' | b'\t' => pos += 1,
                letter @ (b'x' | b'X' | b'y' | b'Y' | b'z' | b'Z') => {
                    let rest = &line[pos + 1..];
                    if rest.starts_with([' ', '\t']) {
                        break;
                    }
                    let Some((value, len)) = parse_number(rest) else {
                        break;
                    };
                    let axis = match letter.to_ascii_uppercase() {
                        b'X' => 0,
                        b'Y' => 1,
                        _ => 2,
                    };
                    axes[axis] = value;
                    pos += 1 + len;
                }
                b'g' | b'G' => {
                    if self.kind.is_some() {
                        break;
                    }
                    let Some((kind, len)) = match_code(&bytes[pos + 1..]) else {
                        break;
                    };
                    self.code.push_str(&line[pos..pos + 1 + len]);
                    self.kind = Some(kind);
                    pos += 1 + len;
                }
                _ => break,
            }
        }

        if self.kind.is_none() {
            self.code.clear();
            return 0;
        }

        self.coord = Coord::new(axes[0], axes[1], axes[2]);
        pos
    }
}

/// Recognize the digits after a `G`: exactly `0`, `1` or `28`.
fn match_code(digits: &[u8]) -> Option<(MoveKind, usize)> {
    let is_digit_at = |i: usize| digits.get(i).is_some_and(u8::is_ascii_digit);

    match digits.first().copied()? {
        b'0' if !is_digit_at(1) => Some((MoveKind::Rapid, 1)),
        b'1' if !is_digit_at(1) => Some((MoveKind::Linear, 1)),
        b'2' if digits.get(1) == Some(&b'8') && !is_digit_at(2) => Some((MoveKind::Home, 2)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_codes() {
        let mut matcher = MoveMatcher::new();

        assert_eq!(matcher.match_line("abc"), 0);
        assert_eq!(matcher.match_line("g0"), 2);
        assert_eq!(matcher.code(), "g0");
        assert_eq!(matcher.kind(), Some(MoveKind::Rapid));
        assert_eq!(matcher.match_line("g1"), 2);
        assert_eq!(matcher.kind(), Some(MoveKind::Linear));
        assert_eq!(matcher.match_line("g2"), 0);
        assert_eq!(matcher.match_line("g00"), 0);
        assert_eq!(matcher.match_line("g10"), 0);
        assert_eq!(matcher.code(), "");
        assert_eq!(matcher.kind(), None);
    }

    #[test]
    fn test_match_axes_any_order() {
        let mut matcher = MoveMatcher::new();

        assert_eq!(matcher.match_line("g1z1y2x3"), 8);
        assert_eq!(matcher.code(), "g1");
        assert_eq!(matcher.coord(), Coord::new(3.0, 2.0, 1.0));
    }

    #[test]
    fn test_match_signed_values() {
        let mut matcher = MoveMatcher::new();

        assert_eq!(matcher.match_line("g0x-12.345y+6.78"), 16);
        assert_eq!(matcher.code(), "g0");
        let coord = matcher.coord();
        assert_eq!(coord.x(), -12.345);
        assert_eq!(coord.y(), 6.78);
        assert_eq!(coord.z(), f64::INFINITY);
    }

    #[test]
    fn test_match_home() {
        let mut matcher = MoveMatcher::new();

        assert_eq!(matcher.match_line("g28X0"), 5);
        assert_eq!(matcher.kind(), Some(MoveKind::Home));
        assert_eq!(matcher.code(), "g28");
        assert_eq!(matcher.match_line("g281X0"), 0);
        assert_eq!(matcher.match_line("G28"), 3);
    }

    #[test]
    fn test_match_stops_at_unknown_token() {
        let mut matcher = MoveMatcher::new();

        let line = "G0X0Y0Z1 E3F4";
        let n = matcher.match_line(line);
        assert_eq!(n, 9);
        assert_eq!(&line[n..], "E3F4");

        let line = "G28 Z1 Y0";
        assert_eq!(matcher.match_line(line), line.len());
        assert_eq!(matcher.coord().x(), f64::INFINITY);
    }

    #[test]
    fn test_match_whitespace() {
        let mut matcher = MoveMatcher::new();

        assert_eq!(matcher.match_line(" \tG1\tX5 ; comment"), 8);
        assert_eq!(matcher.coord().x(), 5.0);
    }

    #[test]
    fn test_axes_without_code_do_not_match() {
        let mut matcher = MoveMatcher::new();

        assert_eq!(matcher.match_line("X10 Y20"), 0);
        assert!(!matcher.coord().is_valid());
    }

    #[test]
    fn test_axis_without_number_stops_match() {
        let mut matcher = MoveMatcher::new();

        let line = "G1 X Y2";
        assert_eq!(matcher.match_line(line), 3);
        assert!(!matcher.coord().is_valid());
    }

    #[test]
    fn test_second_code_stops_match() {
        let mut matcher = MoveMatcher::new();

        assert_eq!(matcher.match_line("G1 X1 G0 X2"), 6);
        assert_eq!(matcher.code(), "G1");
        assert_eq!(matcher.coord().x(), 1.0);
    }

    #[test]
    fn test_move_kind_str() {
        assert_eq!(MoveKind::Rapid.as_str(), "G0");
        assert_eq!(MoveKind::Linear.as_str(), "G1");
        assert_eq!(MoveKind::Home.as_str(), "G28");
    }
}
