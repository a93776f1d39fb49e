// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The fixed seven-row penguin drawn to the left of every report.

/// Width in columns of every banner row.
pub const BANNER_WIDTH: usize = 19;

/// Banner rows, each exactly [`BANNER_WIDTH`] columns.
pub const BANNER: [&str; 7] = [
    r"        .-.        ",
    r"       (.. |       ",
    r"       <>  |       ",
    r"      / --- \      ",
    r"     ( |   | |     ",
    r"   |\\_)___/\)/\   ",
    r"  <__)------(__/   ",
];

/// Left column used once the banner is exhausted, and on the header row.
///
/// Exactly [`BANNER_WIDTH`] columns. Older front ends padded overflow rows
/// to 20 columns, which shifted their metric lines one column right.
pub const BLANK_ROW: &str = "                   ";

/// Returns banner row `i`, or [`BLANK_ROW`] past the last row.
pub fn banner_row(i: usize) -> &'static str {
    BANNER.get(i).copied().unwrap_or(BLANK_ROW)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_have_uniform_width() {
        for row in BANNER {
            assert_eq!(row.chars().count(), BANNER_WIDTH, "row {row:?}");
        }
        assert_eq!(BLANK_ROW.len(), BANNER_WIDTH);
    }

    #[test]
    fn test_banner_row_padding() {
        assert_eq!(banner_row(0), BANNER[0]);
        assert_eq!(banner_row(6), BANNER[6]);
        assert_eq!(banner_row(7), BLANK_ROW);
        assert_eq!(banner_row(100), BLANK_ROW);
    }

    #[test]
    fn test_overflow_rows_keep_right_column_aligned() {
        let gap = "  ";
        let inside = format!("{}{gap}Procs: 1", banner_row(6));
        let past = format!("{}{gap}Uptime: 2 mins", banner_row(7));
        assert_eq!(inside.find("Procs"), past.find("Uptime"));
    }

    #[test]
    fn test_ascii_only() {
        assert!(BANNER.iter().all(|row| row.is_ascii()));
    }
}
