//! Form page geometry and text measurement.
//!
//! The layout is computed from the [`FieldSet`] rather than hardcoded:
//! fields flow top-down in schema order, each reserving one label line
//! plus `rows` value lines, and the signature rectangles sit in a fixed
//! band above the bottom margin. All positions are in PDF points with the
//! origin at the bottom-left of an A4 page.

use crate::schema::FieldSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A4 page width in points.
pub const PAGE_WIDTH: f32 = 595.0;
/// A4 page height in points.
pub const PAGE_HEIGHT: f32 = 842.0;
/// Page margin on all sides.
pub const MARGIN: f32 = 50.0;

/// Title font size (Helvetica-Bold).
pub const TITLE_SIZE: f32 = 16.0;
/// Subtitle font size.
pub const SUBTITLE_SIZE: f32 = 9.0;
/// Field label font size (Helvetica-Bold).
pub const LABEL_SIZE: f32 = 8.0;
/// Field value font size (Helvetica).
pub const VALUE_SIZE: f32 = 11.0;
/// Baseline-to-baseline distance for value lines.
pub const LINE_HEIGHT: f32 = 14.0;

const LABEL_TO_VALUE: f32 = 13.0;
const FIELD_GAP: f32 = 10.0;
const FIELDS_TOP: f32 = PAGE_HEIGHT - 92.0;

const SIGNATURE_BAND_Y: f32 = 130.0;
const SIGNATURE_HEIGHT: f32 = 70.0;
const SIGNATURE_LABEL_GAP: f32 = 12.0;

/// Axis-aligned rectangle, origin at bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Scale content of the given intrinsic size to fit inside this
    /// rectangle preserving aspect ratio. Returns the scaled size.
    pub fn fit(&self, content_width: f32, content_height: f32) -> (f32, f32) {
        if content_width <= 0.0 || content_height <= 0.0 {
            return (0.0, 0.0);
        }
        let scale = (self.width / content_width).min(self.height / content_height);
        (content_width * scale, content_height * scale)
    }

    /// Position that centers content of the given size in this rectangle.
    pub fn center_origin(&self, content_width: f32, content_height: f32) -> (f32, f32) {
        (
            self.x + (self.width - content_width) / 2.0,
            self.y + (self.height - content_height) / 2.0,
        )
    }
}

/// Placement of one text field on the page.
#[derive(Debug, Clone)]
pub struct FieldBox {
    pub id: String,
    pub label: String,
    pub x: f32,
    /// Baseline of the label line.
    pub label_y: f32,
    /// Baseline of the first value line.
    pub value_y: f32,
    pub width: f32,
    /// Value lines available before truncation.
    pub max_lines: usize,
}

/// Placement of one signature slot.
#[derive(Debug, Clone)]
pub struct SignatureBox {
    pub slot_id: String,
    pub label: String,
    pub rect: Rect,
    /// Baseline of the label under the rectangle.
    pub label_y: f32,
}

/// Complete page layout derived from a field set.
#[derive(Debug, Clone)]
pub struct PageLayout {
    pub title_y: f32,
    pub subtitle_y: f32,
    pub fields: Vec<FieldBox>,
    pub signatures: Vec<SignatureBox>,
}

impl PageLayout {
    /// Compute the layout for a field set.
    pub fn for_schema(schema: &FieldSet) -> Self {
        let width = PAGE_WIDTH - 2.0 * MARGIN;
        let mut y = FIELDS_TOP;
        let mut fields = Vec::with_capacity(schema.fields.len());

        for field in &schema.fields {
            let rows = if field.multiline {
                field.rows.max(1) as usize
            } else {
                1
            };
            let label_y = y;
            let value_y = y - LABEL_TO_VALUE;
            fields.push(FieldBox {
                id: field.id.clone(),
                label: field.label.clone(),
                x: MARGIN,
                label_y,
                value_y,
                width,
                max_lines: rows,
            });
            y -= LABEL_TO_VALUE + rows as f32 * LINE_HEIGHT + FIELD_GAP;
        }

        let signatures = Self::signature_boxes(schema);

        Self {
            title_y: PAGE_HEIGHT - 54.0,
            subtitle_y: PAGE_HEIGHT - 70.0,
            fields,
            signatures,
        }
    }

    fn signature_boxes(schema: &FieldSet) -> Vec<SignatureBox> {
        let count = schema.signatures.len();
        if count == 0 {
            return Vec::new();
        }
        let gap = 25.0;
        let total = PAGE_WIDTH - 2.0 * MARGIN;
        let slot_width = (total - gap * (count as f32 - 1.0)) / count as f32;

        schema
            .signatures
            .iter()
            .enumerate()
            .map(|(i, slot)| SignatureBox {
                slot_id: slot.id.clone(),
                label: slot.label.clone(),
                rect: Rect::new(
                    MARGIN + i as f32 * (slot_width + gap),
                    SIGNATURE_BAND_Y,
                    slot_width,
                    SIGNATURE_HEIGHT,
                ),
                label_y: SIGNATURE_BAND_Y - SIGNATURE_LABEL_GAP,
            })
            .collect()
    }
}

/// Estimated advance width of a string at the given font size.
///
/// Helvetica metrics approximated by character class. The estimate only
/// drives line wrapping, so it errs on the wide side: a line may wrap a
/// word early but never overflows its box.
pub fn text_width(text: &str, size: f32) -> f32 {
    text.chars().map(char_factor).sum::<f32>() * size
}

fn char_factor(c: char) -> f32 {
    match c {
        'i' | 'j' | 'l' | 't' | 'f' | 'I' | '.' | ',' | ';' | ':' | '\'' | '|' | '!' | '('
        | ')' | '[' | ']' => 0.34,
        'r' => 0.4,
        'm' | 'w' | 'M' | 'W' | '@' => 0.92,
        ' ' => 0.3,
        c if c.is_ascii_uppercase() || c.is_ascii_digit() => 0.68,
        _ => 0.55,
    }
}

/// Greedy word wrap of a value into at most `max_lines` lines of at most
/// `max_width` points. Explicit newlines are honored; words longer than a
/// line are split; overflow past the last line is dropped.
pub fn wrap_text(text: &str, size: f32, max_width: f32, max_lines: usize) -> Vec<String> {
    let mut lines = Vec::new();

    'outer: for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word.to_string();
            // Hard-split words that alone exceed the line.
            while text_width(&word, size) > max_width {
                if !current.is_empty() && push_line(&mut lines, &mut current, max_lines) {
                    break 'outer;
                }
                let split_at = split_index(&word, size, max_width);
                let rest = word.split_off(split_at);
                current = word;
                if push_line(&mut lines, &mut current, max_lines) {
                    break 'outer;
                }
                word = rest;
            }

            let candidate = if current.is_empty() {
                word.clone()
            } else {
                format!("{} {}", current, word)
            };
            if text_width(&candidate, size) <= max_width {
                current = candidate;
            } else {
                if push_line(&mut lines, &mut current, max_lines) {
                    break 'outer;
                }
                current = word;
            }
        }
        if !current.is_empty() && push_line(&mut lines, &mut current, max_lines) {
            break;
        }
        if lines.len() >= max_lines {
            break;
        }
    }

    if lines.len() > max_lines {
        log::debug!("Value truncated to {} lines", max_lines);
        lines.truncate(max_lines);
    }
    lines
}

/// Push `current` as a finished line; true when the line budget is spent.
fn push_line(lines: &mut Vec<String>, current: &mut String, max_lines: usize) -> bool {
    lines.push(std::mem::take(current));
    lines.len() >= max_lines
}

/// Largest char boundary such that the prefix fits in `max_width`.
fn split_index(word: &str, size: f32, max_width: f32) -> usize {
    let mut width = 0.0;
    for (i, c) in word.char_indices() {
        width += char_factor(c) * size;
        if width > max_width && i > 0 {
            return i;
        }
    }
    word.len()
}

/// Encode text for a WinAnsi-encoded base-14 font.
///
/// Diacritics are folded first (NFD + combining-mark strip, plus the
/// Polish letters that do not decompose); remaining characters outside
/// the encoding become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    fold_diacritics(text)
        .chars()
        .map(|c| match u32::from(c) {
            0x00..=0x7F => c as u8,
            0xA0..=0xFF => c as u8,
            _ => match c {
                '€' => 0x80,
                '„' => 0x84,
                '…' => 0x85,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '–' => 0x96,
                '—' => 0x97,
                _ => b'?',
            },
        })
        .collect()
}

/// Strip combining marks and map the non-decomposable Slavic letters to
/// their ASCII base forms.
pub fn fold_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'ł' => 'l',
            'Ł' => 'L',
            'đ' => 'd',
            'Đ' => 'D',
            'ø' => 'o',
            'Ø' => 'O',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_flows_top_down() {
        let layout = PageLayout::for_schema(&FieldSet::payout_voucher());
        assert_eq!(layout.fields.len(), 8);
        for pair in layout.fields.windows(2) {
            assert!(pair[1].label_y < pair[0].label_y);
        }
        // Multiline fields reserve their row count.
        let based_on = layout.fields.iter().find(|f| f.id == "based_on").unwrap();
        assert_eq!(based_on.max_lines, 3);
    }

    #[test]
    fn test_fields_stay_above_signature_band() {
        let layout = PageLayout::for_schema(&FieldSet::payout_voucher());
        let last = layout.fields.last().unwrap();
        let lowest = last.value_y - (last.max_lines as f32 - 1.0) * LINE_HEIGHT;
        let band_top = SIGNATURE_BAND_Y + SIGNATURE_HEIGHT;
        assert!(lowest > band_top, "{} <= {}", lowest, band_top);
    }

    #[test]
    fn test_signature_slots_share_the_band() {
        let two = PageLayout::for_schema(&FieldSet::payout_voucher());
        assert_eq!(two.signatures.len(), 2);
        assert!(two.signatures[0].rect.x < two.signatures[1].rect.x);
        assert_eq!(two.signatures[0].rect.y, two.signatures[1].rect.y);

        let one = PageLayout::for_schema(&FieldSet::payout_voucher().single_signature());
        assert_eq!(one.signatures.len(), 1);
        assert!(one.signatures[0].rect.width > two.signatures[0].rect.width);
    }

    #[test]
    fn test_rect_fit_preserves_aspect() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0);
        // Wider than tall: width-bound.
        let (w, h) = rect.fit(400.0, 100.0);
        assert_eq!((w, h), (100.0, 25.0));
        // Taller than wide: height-bound.
        let (w, h) = rect.fit(100.0, 400.0);
        assert_eq!((w, h), (12.5, 50.0));
    }

    #[test]
    fn test_rect_center() {
        let rect = Rect::new(10.0, 20.0, 100.0, 100.0);
        assert_eq!(rect.center_origin(50.0, 80.0), (35.0, 30.0));
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap_text("one two three four five six seven", 11.0, 90.0, 10);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 11.0) <= 90.0, "line too wide: {}", line);
        }
    }

    #[test]
    fn test_wrap_honors_newlines_and_truncates() {
        let lines = wrap_text("a\nb\nc\nd", 11.0, 200.0, 3);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_wrap_splits_oversized_word() {
        let lines = wrap_text("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", 11.0, 60.0, 5);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, 11.0) <= 60.0);
        }
    }

    #[test]
    fn test_fold_polish() {
        assert_eq!(fold_diacritics("Kwota słownie"), "Kwota slownie");
        assert_eq!(fold_diacritics("Nazwa działu"), "Nazwa dzialu");
        assert_eq!(fold_diacritics("Dowód wypłaty"), "Dowod wyplaty");
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        // Guillemets are in the encoding.
        assert_eq!(encode_win_ansi("«x»"), vec![0xAB, b'x', 0xBB]);
        // Cyrillic has no WinAnsi form.
        assert_eq!(encode_win_ansi("Дата"), vec![b'?', b'?', b'?', b'?']);
    }
}
