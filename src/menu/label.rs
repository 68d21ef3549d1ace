use unicode_width::UnicodeWidthStr;

/// Character that marks the hotkey in a raw label: `"Drive #_8:"`.
pub const HOTKEY_MARKER: char = '_';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLabel {
    /// Label with the marker removed.
    pub text: String,
    /// Upper-cased hotkey character.
    pub hotkey: Option<char>,
    /// Character position of the hotkey within `text`.
    pub hotkey_offset: Option<usize>,
}

impl ParsedLabel {
    /// Display width in terminal columns.
    pub fn width(&self) -> usize {
        self.text.width()
    }
}

/// Splits a raw label into display text and hotkey.
///
/// Only the first marker counts. A marker with nothing after it is dropped
/// and yields no hotkey.
pub fn parse_label(raw: &str) -> ParsedLabel {
    let Some((before, after)) = raw.split_once(HOTKEY_MARKER) else {
        return ParsedLabel {
            text: raw.to_string(),
            hotkey: None,
            hotkey_offset: None,
        };
    };

    let mut text = String::with_capacity(raw.len());
    text.push_str(before);
    text.push_str(after);

    match after.chars().next() {
        Some(c) => ParsedLabel {
            text,
            hotkey: Some(c.to_ascii_uppercase()),
            hotkey_offset: Some(before.chars().count()),
        },
        None => ParsedLabel {
            text,
            hotkey: None,
            hotkey_offset: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_selects_following_character() {
        let parsed = parse_label("Drive #_8:");
        assert_eq!(parsed.text, "Drive #8:");
        assert_eq!(parsed.hotkey, Some('8'));
        assert_eq!(parsed.hotkey_offset, Some(7));
    }

    #[test]
    fn hotkey_is_upper_cased() {
        let parsed = parse_label("_attach image...");
        assert_eq!(parsed.text, "attach image...");
        assert_eq!(parsed.hotkey, Some('A'));
        assert_eq!(parsed.hotkey_offset, Some(0));
    }

    #[test]
    fn no_marker_keeps_label() {
        let parsed = parse_label("Border mode:");
        assert_eq!(parsed.text, "Border mode:");
        assert_eq!(parsed.hotkey, None);
        assert_eq!(parsed.hotkey_offset, None);
        assert_eq!(parsed.width(), 12);
    }

    #[test]
    fn trailing_marker_means_no_hotkey() {
        let parsed = parse_label("Reset_");
        assert_eq!(parsed.text, "Reset");
        assert_eq!(parsed.hotkey, None);
        assert_eq!(parsed.hotkey_offset, None);
    }

    #[test]
    fn later_markers_stay_literal() {
        let parsed = parse_label("_Load snap_shot");
        assert_eq!(parsed.text, "Load snap_shot");
        assert_eq!(parsed.hotkey, Some('L'));
    }

    #[test]
    fn offset_counts_characters_not_bytes() {
        let parsed = parse_label("Ä_b");
        assert_eq!(parsed.hotkey_offset, Some(1));
        assert_eq!(parsed.hotkey, Some('B'));
    }
}
