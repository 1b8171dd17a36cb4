//! Puzzle layout records
//!
//! A layout is plain whitespace-separated text:
//! `<nbRods> (<length> <x> <y>)*`
//!
//! Rod order is identity: saving and reloading keeps every rod at the same
//! index. Coordinates are written in shortest round-trip form so a reload
//! reproduces them exactly.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::consts::NB_ROD_LENGTHS;
use crate::sim::{Rod, RodGroup};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("failed to access layout file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("layout ends early: expected {expected}")]
    UnexpectedEnd { expected: &'static str },
    #[error("invalid {field} {token:?}")]
    InvalidToken { field: &'static str, token: String },
    #[error("rod {index} has length {length}, expected 1..={max}")]
    InvalidLength { index: usize, length: i64, max: usize },
    #[error("unexpected trailing data {0:?}")]
    TrailingData(String),
    #[error("rods {0} and {1} overlap")]
    Overlapping(usize, usize),
}

/// Pulls typed fields off a whitespace-separated record
struct Fields<'a> {
    tokens: std::str::SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            tokens: text.split_whitespace(),
        }
    }

    fn next<T: FromStr>(&mut self, field: &'static str) -> Result<T, LayoutError> {
        let token = self
            .tokens
            .next()
            .ok_or(LayoutError::UnexpectedEnd { expected: field })?;
        token.parse().map_err(|_| LayoutError::InvalidToken {
            field,
            token: token.to_string(),
        })
    }

    fn finish(mut self) -> Result<(), LayoutError> {
        match self.tokens.next() {
            Some(token) => Err(LayoutError::TrailingData(token.to_string())),
            None => Ok(()),
        }
    }
}

/// Parse a layout record into a rod group.
///
/// Rejects anything that would not make a valid puzzle, including rods that
/// already overlap, so no partially built group ever escapes.
pub fn parse_layout(text: &str) -> Result<RodGroup, LayoutError> {
    let mut fields = Fields::new(text);
    let count: usize = fields.next("rod count")?;

    // A record takes at least 6 bytes ("L X Y "), which bounds the allocation by the input
    let mut rods = Vec::with_capacity(count.min(text.len() / 6));
    for index in 0..count {
        let length: i64 = fields.next("rod length")?;
        let x: f32 = fields.next("x coordinate")?;
        let y: f32 = fields.next("y coordinate")?;

        if !(1..=NB_ROD_LENGTHS as i64).contains(&length) {
            return Err(LayoutError::InvalidLength {
                index,
                length,
                max: NB_ROD_LENGTHS,
            });
        }
        if !x.is_finite() || !y.is_finite() {
            return Err(LayoutError::InvalidToken {
                field: "coordinate",
                token: format!("{} {}", x, y),
            });
        }
        rods.push(Rod::new(length as u8, x, y));
    }
    fields.finish()?;

    let group = RodGroup::new(rods);
    if let Some((a, b)) = group.find_overlap() {
        return Err(LayoutError::Overlapping(a, b));
    }
    Ok(group)
}

/// Render a rod group in the layout record format
pub fn format_layout(group: &RodGroup) -> String {
    let mut out = format!("{} ", group.len());
    for rod in group.iter() {
        // Writing to a String cannot fail
        let _ = write!(out, "{} {} {} ", rod.length(), rod.left(), rod.top());
    }
    out
}

pub fn load_layout(path: &Path) -> Result<RodGroup, LayoutError> {
    let text = fs::read_to_string(path).map_err(|source| LayoutError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let group = parse_layout(&text)?;
    log::info!("Loaded {} rods from {}", group.len(), path.display());
    Ok(group)
}

pub fn save_layout(group: &RodGroup, path: &Path) -> Result<(), LayoutError> {
    fs::write(path, format_layout(group)).map_err(|source| LayoutError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Saved {} rods to {}", group.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout() {
        let group = parse_layout("2 3 10 20.5\n1 200 0 ").unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.rods()[0], Rod::new(3, 10.0, 20.5));
        assert_eq!(group.rods()[1], Rod::new(1, 200.0, 0.0));
    }

    #[test]
    fn test_save_then_reload_is_exact() {
        let group = RodGroup::new(vec![
            Rod::new(7, 0.1, 1.0 / 3.0),
            Rod::new(10, -12.625, 400.0),
            Rod::new(1, 1234.567, 89.01),
        ]);
        let reloaded = parse_layout(&format_layout(&group)).unwrap();
        assert_eq!(reloaded, group);
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir()
            .join(format!("haptic-rods-layout-{}.txt", std::process::id()));
        let group = RodGroup::new(vec![Rod::new(2, 5.0, 5.0), Rod::new(4, 5.0, 100.0)]);

        save_layout(&group, &path).unwrap();
        let loaded = load_layout(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, group);
    }

    #[test]
    fn test_rejects_malformed_records() {
        assert!(matches!(
            parse_layout("2 1 0 0"),
            Err(LayoutError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse_layout("1 1 zero 0"),
            Err(LayoutError::InvalidToken { .. })
        ));
        assert!(matches!(
            parse_layout("1 11 0 0"),
            Err(LayoutError::InvalidLength { length: 11, .. })
        ));
        assert!(matches!(
            parse_layout("1 0 0 0"),
            Err(LayoutError::InvalidLength { length: 0, .. })
        ));
        assert!(matches!(
            parse_layout("1 1 0 0 extra"),
            Err(LayoutError::TrailingData(_))
        ));
        assert!(matches!(
            parse_layout("2 2 0 0 2 40 20"),
            Err(LayoutError::Overlapping(0, 1))
        ));
        assert!(matches!(parse_layout(""), Err(LayoutError::UnexpectedEnd { .. })));
    }

    #[test]
    fn test_oversized_count_is_an_error() {
        assert!(matches!(
            parse_layout("18446744073709551615 1 0 0"),
            Err(LayoutError::UnexpectedEnd { .. })
        ));
        assert!(matches!(
            parse_layout("4000000000 2 0 0 2 100 0"),
            Err(LayoutError::UnexpectedEnd { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(matches!(
            load_layout(Path::new("/nonexistent/puzzle.txt")),
            Err(LayoutError::Io { .. })
        ));
    }
}
