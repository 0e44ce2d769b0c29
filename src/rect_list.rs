//! Rectangle list reader
//!
//! Reads the plain-text rectangle lists produced by upstream detectors:
//! one `x,y,w,h` per line. Lines with fewer than four fields are ignored and
//! anything after the fourth field is discarded.

use serde::Serialize;
use std::path::Path;

use crate::crop::{CropError, Rect, Result};

/// Minimum number of comma-separated fields in a usable line
const RECT_FIELDS: usize = 4;

/// One rectangle from a list, with its 1-based source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RectEntry {
    pub line: usize,
    pub rect: Rect,
}

/// Parse rectangle list text
pub fn parse_rect_list(text: &str) -> Result<Vec<RectEntry>> {
    let mut entries = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let fields: Vec<&str> = raw.trim().split(',').map(str::trim).collect();
        if fields.len() < RECT_FIELDS {
            if !raw.trim().is_empty() {
                tracing::debug!(line, content = raw, "skipping short rectangle line");
            }
            continue;
        }

        let mut values = [0i32; RECT_FIELDS];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| CropError::InvalidRectLine {
                line,
                content: raw.to_string(),
            })?;
        }

        entries.push(RectEntry {
            line,
            rect: Rect::new(values[0], values[1], values[2], values[3]),
        });
    }

    Ok(entries)
}

/// Read and parse a rectangle list file
pub fn read_rect_list(path: &Path) -> Result<Vec<RectEntry>> {
    if !path.exists() {
        return Err(CropError::RectListNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    let entries = parse_rect_list(&text)?;
    tracing::debug!(path = %path.display(), count = entries.len(), "read rectangle list");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_basic() {
        let entries = parse_rect_list("190,125,172,31\n10,20,30,40\n").unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].rect, Rect::new(190, 125, 172, 31));
        assert_eq!(entries[0].line, 1);
        assert_eq!(entries[1].rect, Rect::new(10, 20, 30, 40));
        assert_eq!(entries[1].line, 2);
    }

    #[test]
    fn test_short_and_blank_lines_skipped() {
        let text = "\n1,2,3\nheader\n5,6,7,8\n   \n";
        let entries = parse_rect_list(text).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line, 4);
        assert_eq!(entries[0].rect, Rect::new(5, 6, 7, 8));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let entries = parse_rect_list("1,2,3,4,0.98,text\r\n").unwrap();
        assert_eq!(entries[0].rect, Rect::new(1, 2, 3, 4));
    }

    #[test]
    fn test_whitespace_and_negatives() {
        let entries = parse_rect_list("  -4 , 2 , 10 , 0  ").unwrap();
        assert_eq!(entries[0].rect, Rect::new(-4, 2, 10, 0));
    }

    #[test]
    fn test_invalid_number() {
        let result = parse_rect_list("1,2,3,4\n1,two,3,4\n");
        match result {
            Err(CropError::InvalidRectLine { line, content }) => {
                assert_eq!(line, 2);
                assert_eq!(content, "1,two,3,4");
            }
            other => panic!("Unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_rect_list("").unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        let result = read_rect_list(&PathBuf::from("/nonexistent/rects.txt"));
        assert!(matches!(result, Err(CropError::RectListNotFound(_))));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rects.txt");
        std::fs::write(&path, "0,0,10,10\n5,5,20,20\n").unwrap();

        let entries = read_rect_list(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].rect, Rect::new(5, 5, 20, 20));
    }
}
