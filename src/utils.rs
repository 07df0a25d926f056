use crate::error::{ParseError, Result};
use crate::types::{Position, Quaternion, Rotation};
use cgmath::InnerSpace;

/// Line cursor shared by the parsers: trims every line, skips blank and ignored lines,
/// and remembers 1-based line numbers for error reporting.
pub(crate) struct Lines<'a> {
    inner: std::iter::Enumerate<std::str::Lines<'a>>,
    is_ignored: fn(&str) -> bool,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(text: &'a str, is_ignored: fn(&str) -> bool) -> Self {
        Lines {
            inner: text.lines().enumerate(),
            is_ignored,
        }
    }

    /// Next meaningful line, or an error naming what the caller was waiting for.
    pub(crate) fn expect_line(&mut self, expected: &'static str) -> Result<(usize, &'a str)> {
        self.next().ok_or(ParseError::UnexpectedEof { expected })
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        for (index, line) in self.inner.by_ref() {
            let line = line.trim();
            if line.is_empty() || (self.is_ignored)(line) {
                continue;
            }
            return Some((index + 1, line));
        }
        None
    }
}

pub(crate) fn no_comments(_line: &str) -> bool {
    false
}

pub(crate) fn hash_comments(line: &str) -> bool {
    line.starts_with('#')
}

/////////////////////////////////////////////////////////////////////////////////////////////////

pub(crate) fn parse_float(token: &str, line: usize) -> Result<f64> {
    token.parse::<f64>().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

pub(crate) fn parse_index(token: &str, line: usize) -> Result<usize> {
    token.parse::<usize>().map_err(|_| ParseError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

/// Read exactly three coordinates from `tokens`. Extra tokens are a syntax error.
pub(crate) fn parse_vector3<'a>(
    mut tokens: impl Iterator<Item = &'a str>,
    line: usize,
) -> Result<Position> {
    let mut coords = [0.0; 3];
    for coord in coords.iter_mut() {
        let token = tokens.next().ok_or_else(|| ParseError::Syntax {
            line,
            expected: "three coordinates",
            found: String::new(),
        })?;
        *coord = parse_float(token, line)?;
    }
    if let Some(extra) = tokens.next() {
        return Err(ParseError::Syntax {
            line,
            expected: "three coordinates",
            found: extra.to_string(),
        });
    }
    Ok(Position::new(coords[0], coords[1], coords[2]))
}

/////////////////////////////////////////////////////////////////////////////////////////////////

/// Convert an accumulated rotation matrix into a unit quaternion.
pub(crate) fn quaternion_from_rotation(rotation: Rotation) -> Quaternion {
    Quaternion::from(rotation).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Deg, Matrix3, Rotation3};

    #[test]
    fn test_lines_skip_blank_and_ignored() {
        let text = "# header\n\n  first  \n# note\nsecond\n";
        let mut lines = Lines::new(text, hash_comments);
        assert_eq!(lines.next(), Some((3, "first")));
        assert_eq!(lines.next(), Some((5, "second")));
        assert_eq!(lines.next(), None);
        assert!(matches!(
            lines.expect_line("more"),
            Err(ParseError::UnexpectedEof { expected: "more" })
        ));
    }

    #[test]
    fn test_parse_float_accepts_scientific_notation() {
        assert_eq!(parse_float("1.5e-3", 1).unwrap(), 0.0015);
        assert_eq!(parse_float("-2", 1).unwrap(), -2.0);
        match parse_float("1.0.0", 7) {
            Err(ParseError::InvalidNumber { line, token }) => {
                assert_eq!(line, 7);
                assert_eq!(token, "1.0.0");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_vector3() {
        let v = parse_vector3("1 2 3".split_whitespace(), 1).unwrap();
        assert_eq!(v, Position::new(1.0, 2.0, 3.0));
        assert!(parse_vector3("1 2".split_whitespace(), 1).is_err());
        assert!(parse_vector3("1 2 3 4".split_whitespace(), 1).is_err());
        assert!(parse_vector3("1 x 3".split_whitespace(), 1).is_err());
    }

    #[test]
    fn test_quaternion_from_rotation_is_unit() {
        let m = Matrix3::from_angle_z(Deg(90.0)) * Matrix3::from_angle_x(Deg(30.0));
        let q = quaternion_from_rotation(m);
        assert!((q.magnitude() - 1.0).abs() < 1e-12);
        let expected = Quaternion::from_angle_z(Deg(90.0)) * Quaternion::from_angle_x(Deg(30.0));
        assert!(q.dot(expected).abs() > 1.0 - 1e-9);
    }
}
