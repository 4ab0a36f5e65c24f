//! Level-data encoding and validation errors
//!
//! Levels are authored as rectangular character rows. A packed numeric form
//! (`[width, height, cell…]`) also exists for compact shipping; it decodes
//! back to character rows here.

use thiserror::Error;

/// Character each packed cell code maps to
///
/// Codes 2-5 and 7 are all wall variants in the packed data; they collapse
/// to a single wall tile.
const CELL_CHARS: &[char] = &[' ', '@', 'x', 'x', 'x', 'x', 'o', 'x', '!', 'v', '|', '='];

/// Level plan rejection reasons
///
/// A malformed plan is a construction-time contract violation, not a
/// runtime fault; construction fails fast instead of producing an
/// inconsistent level.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    #[error("level plan is empty")]
    Empty,
    #[error("row {row} is {len} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("level plan has no player start")]
    MissingPlayer,
    #[error("level plan has more than one player start")]
    MultiplePlayers,
    #[error("packed level data is truncated")]
    Truncated,
    #[error("unknown packed cell code {code} at index {index}")]
    UnknownCellCode { code: u16, index: usize },
}

/// Decode a packed numeric level into character rows
///
/// Layout: `[width, height]` followed by `width * height` row-major cell
/// codes indexing into the cell character table.
pub fn decode_packed(data: &[u16]) -> Result<Vec<String>, PlanError> {
    let [width, height, cells @ ..] = data else {
        return Err(PlanError::Truncated);
    };
    let (width, height) = (*width as usize, *height as usize);
    if cells.len() != width * height {
        return Err(PlanError::Truncated);
    }

    let mut rows = Vec::with_capacity(height);
    for y in 0..height {
        let mut row = String::with_capacity(width);
        for x in 0..width {
            let index = y * width + x;
            let code = cells[index];
            let ch = CELL_CHARS
                .get(code as usize)
                .ok_or(PlanError::UnknownCellCode { code, index })?;
            row.push(*ch);
        }
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_packed() {
        // 4x2: walls along the bottom, player and coin in the top row
        let data = [4, 2, 0, 1, 6, 0, 2, 2, 2, 2];
        let rows = decode_packed(&data).unwrap();
        assert_eq!(rows, vec![" @o ".to_string(), "xxxx".to_string()]);
    }

    #[test]
    fn test_decode_packed_wall_variants_collapse() {
        let data = [5, 1, 2, 3, 4, 5, 7];
        assert_eq!(decode_packed(&data).unwrap(), vec!["xxxxx".to_string()]);
    }

    #[test]
    fn test_decode_packed_truncated() {
        assert_eq!(decode_packed(&[]), Err(PlanError::Truncated));
        assert_eq!(decode_packed(&[3]), Err(PlanError::Truncated));
        assert_eq!(decode_packed(&[2, 2, 0, 0, 0]), Err(PlanError::Truncated));
    }

    #[test]
    fn test_decode_packed_unknown_code() {
        assert_eq!(
            decode_packed(&[2, 1, 0, 99]),
            Err(PlanError::UnknownCellCode { code: 99, index: 1 })
        );
    }
}
