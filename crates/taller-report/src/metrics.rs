// SPDX-License-Identifier: Apache-2.0

use crate::layout::Font;

/// Advance widths in 1/1000 em for WinAnsi codes 32..=126.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 48-63
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 80-95
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // 96-111
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 112-126
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 32-47
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 48-63
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 64-79
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 80-95
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 96-111
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 112-126
];

const FALLBACK_WIDTH: u16 = 556;

fn table(font: Font) -> &'static [u16; 95] {
    match font {
        Font::Regular => &HELVETICA,
        Font::Bold => &HELVETICA_BOLD,
    }
}

/// Latin-1 letters with diacritics take the width of their base letter.
fn base_letter(c: char) -> Option<char> {
    let base = match c {
        'À'..='Å' => 'A',
        'Ç' => 'C',
        'È'..='Ë' => 'E',
        'Ì'..='Ï' => 'I',
        'Ñ' => 'N',
        'Ò'..='Ö' | 'Ø' => 'O',
        'Ù'..='Ü' => 'U',
        'Ý' => 'Y',
        'à'..='å' => 'a',
        'ç' => 'c',
        'è'..='ë' => 'e',
        'ñ' => 'n',
        'ò'..='ö' | 'ø' => 'o',
        'ù'..='ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

#[must_use]
pub fn char_width(font: Font, c: char) -> u16 {
    let widths = table(font);
    match c {
        ' '..='~' => widths[c as usize - 32],
        // Accented i is wider than the dotted base glyph.
        'ì'..='ï' => 278,
        _ => base_letter(c).map_or(FALLBACK_WIDTH, |b| widths[b as usize - 32]),
    }
}

/// Rendered width in points of `text` at `size`.
#[must_use]
pub fn text_width(font: Font, size: f64, text: &str) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(font, c))).sum();
    f64::from(units) * size / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_glyph_widths() {
        assert_eq!(char_width(Font::Regular, ' '), 278);
        assert_eq!(char_width(Font::Regular, 'W'), 944);
        assert_eq!(char_width(Font::Regular, 'i'), 222);
        assert_eq!(char_width(Font::Bold, 'm'), 889);
        assert_eq!(char_width(Font::Bold, '~'), 584);
    }

    #[test]
    fn accented_letters_use_base_width() {
        assert_eq!(char_width(Font::Regular, 'é'), char_width(Font::Regular, 'e'));
        assert_eq!(char_width(Font::Bold, 'Ñ'), char_width(Font::Bold, 'N'));
        assert_eq!(char_width(Font::Regular, '€'), FALLBACK_WIDTH);
    }

    #[test]
    fn width_scales_with_size() {
        let w12 = text_width(Font::Bold, 12.0, "Firma");
        let w24 = text_width(Font::Bold, 24.0, "Firma");
        assert!((w24 - 2.0 * w12).abs() < 1e-9);
        assert!((text_width(Font::Regular, 10.0, "aaa") - 16.68).abs() < 1e-9);
    }
}
