//! Metrics and text encoding for the standard Times-Roman font.
//!
//! Reports are drawn with the base-14 Times-Roman font, which every PDF viewer ships, so nothing
//! has to be embedded.  The advance widths below are the published Adobe font metrics for that
//! font in thousandths of an em, indexed by WinAnsi code.  Measuring and drawing both go through
//! [`encode_win_ansi`], so the width reported for a string always matches the glyphs shown.

/// PostScript name of the font used for every report.
pub const DEFAULT_FONT_NAME: &str = "Times-Roman";

/// Resource name under which the font is registered on each page.
pub const FONT_RESOURCE_NAME: &str = "F1";

/// Name of the single-byte encoding the font is registered with.
pub const FONT_ENCODING: &str = "WinAnsiEncoding";

const REPLACEMENT_CODE: u8 = b'?';

/// Advance widths for WinAnsi codes 32..=126.
const ASCII_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278, // 32..47
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444, // 48..63
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, // 64..79
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500, // 80..95
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, // 96..111
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541, // 112..126
];

/// Advance widths for WinAnsi codes 160..=255, which coincide with Latin-1.
const LATIN1_WIDTHS: [u16; 96] = [
    250, 333, 500, 500, 500, 500, 200, 500, 333, 760, 276, 500, 564, 333, 760, 333, // 160..175
    400, 564, 300, 300, 333, 500, 453, 250, 333, 300, 310, 500, 750, 750, 750, 444, // 176..191
    722, 722, 722, 722, 722, 722, 889, 667, 611, 611, 611, 611, 333, 333, 333, 333, // 192..207
    722, 722, 722, 722, 722, 722, 722, 564, 722, 722, 722, 722, 722, 722, 556, 500, // 208..223
    444, 444, 444, 444, 444, 444, 667, 444, 444, 444, 444, 444, 278, 278, 278, 278, // 224..239
    500, 500, 500, 500, 500, 500, 500, 564, 500, 500, 500, 500, 500, 500, 500, 500, // 240..255
];

/// Characters that WinAnsi places in the 128..=159 block, with their codes and widths.
const WIN_ANSI_EXTRAS: [(char, u8, u16); 27] = [
    ('\u{20AC}', 128, 500),
    ('\u{201A}', 130, 333),
    ('\u{0192}', 131, 500),
    ('\u{201E}', 132, 444),
    ('\u{2026}', 133, 1000),
    ('\u{2020}', 134, 500),
    ('\u{2021}', 135, 500),
    ('\u{02C6}', 136, 333),
    ('\u{2030}', 137, 1000),
    ('\u{0160}', 138, 556),
    ('\u{2039}', 139, 333),
    ('\u{0152}', 140, 889),
    ('\u{017D}', 142, 611),
    ('\u{2018}', 145, 333),
    ('\u{2019}', 146, 333),
    ('\u{201C}', 147, 444),
    ('\u{201D}', 148, 444),
    ('\u{2022}', 149, 350),
    ('\u{2013}', 150, 500),
    ('\u{2014}', 151, 1000),
    ('\u{02DC}', 152, 333),
    ('\u{2122}', 153, 980),
    ('\u{0161}', 154, 389),
    ('\u{203A}', 155, 333),
    ('\u{0153}', 156, 722),
    ('\u{017E}', 158, 444),
    ('\u{0178}', 159, 722),
];

/// Encodes `text` as WinAnsi bytes, replacing characters the encoding cannot represent with `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_code).collect()
}

fn win_ansi_code(ch: char) -> u8 {
    match u32::from(ch) {
        code @ 32..=126 | code @ 160..=255 => code as u8,
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|(extra, _, _)| *extra == ch)
            .map(|(_, code, _)| *code)
            .unwrap_or(REPLACEMENT_CODE),
    }
}

/// The standard Times-Roman font together with its glyph metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimesRoman;

impl TimesRoman {
    /// Returns the PostScript name of the font.
    pub fn name(&self) -> &'static str {
        DEFAULT_FONT_NAME
    }

    /// Returns the advance width of the glyph at WinAnsi `code`, in thousandths of an em.
    pub fn glyph_width(&self, code: u8) -> u16 {
        match code {
            32..=126 => ASCII_WIDTHS[usize::from(code - 32)],
            160..=255 => LATIN1_WIDTHS[usize::from(code - 160)],
            _ => WIN_ANSI_EXTRAS
                .iter()
                .find(|(_, extra, _)| *extra == code)
                .map(|(_, _, width)| *width)
                .unwrap_or_else(|| self.glyph_width(REPLACEMENT_CODE)),
        }
    }

    /// Width in points of `text` drawn at `size` points.
    pub fn width_of_text_at_size(&self, text: &str, size: f32) -> f32 {
        let units: u32 = encode_win_ansi(text)
            .into_iter()
            .map(|code| u32::from(self.glyph_width(code)))
            .sum();
        units as f32 * size / 1000.0
    }
}
