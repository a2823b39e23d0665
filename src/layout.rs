//! The tracked keyboard layout.
//!
//! Persisted key statistics are positionally coupled to [`ROWS`]: counters are
//! stored in row-major order of this table. Reordering or resizing it requires
//! bumping [`LAYOUT_VERSION`] and migrating existing `wrong_key_data.txt` files.

use itertools::Itertools;

pub const LAYOUT_VERSION: u32 = 1;

pub const SPACE: char = ' ';

/// Number of synthetic heatmap columns the space bar is stretched across
pub const SPACE_WIDTH: usize = 6;

/// Upper-case physical layout, traversed row-major
pub const ROWS: &[&[char]] = &[
    &['`', '1', '2', '3', '4', '5', '6', '7', '8', '9', '0', '-', '+'],
    &['Q', 'W', 'E', 'R', 'T', 'Y', 'U', 'I', 'O', 'P', '(', ')', '\\'],
    &['A', 'S', 'D', 'F', 'G', 'H', 'J', 'K', 'L', ':', '\''],
    &['Z', 'X', 'C', 'V', 'B', 'N', 'M', ',', '.', '?'],
    &[SPACE],
];

/// Flattened size of [`ROWS`]
pub const KEY_COUNT: usize = 48;

/// All tracked keys in persistence order
pub fn keys() -> impl Iterator<Item = char> {
    ROWS.iter().flat_map(|row| row.iter().copied())
}

/// Maps raw input onto the layout's upper-case convention.
/// Returns `None` when the symbol has no single-character upper-case form.
pub fn normalize(symbol: char) -> Option<char> {
    symbol.to_uppercase().exactly_one().ok()
}

/// Position of an already-normalized key in persistence order
pub fn index_of(key: char) -> Option<usize> {
    keys().position(|k| k == key)
}

/// Counter slot for a raw symbol: normalized, then looked up in the layout.
/// `None` means the symbol is outside the tracked domain.
pub fn slot(symbol: char) -> Option<usize> {
    normalize(symbol).and_then(index_of)
}

pub fn is_in_domain(symbol: char) -> bool {
    slot(symbol).is_some()
}

pub fn max_row_len(rows: &[&[char]]) -> usize {
    rows.iter().map(|row| row.len()).max().unwrap_or(0)
}

/// Zero columns placed on each side of the space block
pub fn space_padding(max_row_len: usize, space_width: usize) -> usize {
    max_row_len.saturating_sub(space_width) / 2
}

/// Builds the rectangular heatmap matrix for `rows`.
///
/// Each key contributes its count; the space key contributes `space_width`
/// copies of its count, centered with zero padding. Every row is then
/// right-padded with zeros to the longest row's length.
pub fn heatmap_matrix<F>(rows: &[&[char]], count: F, space_width: usize) -> Vec<Vec<u32>>
where
    F: Fn(char) -> u32,
{
    let max_len = max_row_len(rows);
    let padding = space_padding(max_len, space_width);

    rows.iter()
        .map(|row| {
            let mut cells = Vec::with_capacity(max_len);
            for &key in row.iter() {
                if key == SPACE {
                    cells.extend(std::iter::repeat(0).take(padding));
                    cells.extend(std::iter::repeat(count(key)).take(space_width));
                    cells.extend(std::iter::repeat(0).take(padding));
                } else {
                    cells.push(count(key));
                }
            }
            if cells.len() < max_len {
                cells.resize(max_len, 0);
            }
            cells
        })
        .collect()
}

/// Where a key's label sits on the heatmap grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLabel {
    pub key: char,
    pub label: String,
    pub row: usize,
    pub col: usize,
    /// Number of matrix columns covered by the key
    pub span: usize,
}

/// Labels for every key of [`ROWS`], aligned with [`heatmap_matrix`] columns
pub fn heatmap_labels() -> Vec<KeyLabel> {
    let padding = space_padding(max_row_len(ROWS), SPACE_WIDTH);

    ROWS.iter()
        .enumerate()
        .flat_map(|(row, keys)| {
            keys.iter().enumerate().map(move |(col, &key)| {
                if key == SPACE {
                    KeyLabel {
                        key,
                        label: "SPACE".to_string(),
                        row,
                        col: col + padding,
                        span: SPACE_WIDTH,
                    }
                } else {
                    KeyLabel {
                        key,
                        label: key.to_string(),
                        row,
                        col,
                        span: 1,
                    }
                }
            })
        })
        .collect()
}
