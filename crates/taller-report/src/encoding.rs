// SPDX-License-Identifier: Apache-2.0

/// Maps text to single-byte WinAnsi codes for the standard Type1 fonts.
/// Printable ASCII and Latin-1 map directly; everything else becomes `?`.
#[must_use]
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match u32::from(c) {
        code @ (0x20..=0x7E | 0xA0..=0xFF) => code as u8,
        _ => b'?',
    }
}

/// The character the viewer will show for `c`.
#[must_use]
pub fn displayed_char(c: char) -> char {
    char::from(win_ansi_byte(c))
}
