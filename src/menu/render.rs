use crate::platform::{Color, Terminal};

use super::model::{Entry, Menu};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fore: Color,
    pub back: Color,
    pub highlight: Color,
    pub hotkey: Color,
    pub border: Color,
    pub status_fore: Color,
    pub status_back: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            fore: Color::Black,
            back: Color::LightGray,
            highlight: Color::Cyan,
            hotkey: Color::Red,
            border: Color::Black,
            status_fore: Color::Black,
            status_back: Color::Cyan,
        }
    }
}

/// Screen placement of a menu window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub spacing: u16,
}

impl Geometry {
    /// Centres the menu on a `cols` x `rows` screen.
    pub fn new(menu: &Menu, cols: u16, rows: u16) -> Self {
        let max_width = usize::from(cols.saturating_sub(2));
        let width = (menu.width() + 4).min(max_width) as u16;

        let spacing = menu.spacing().max(1);
        let items = u16::try_from(menu.len()).unwrap_or(u16::MAX);
        let mut height = spacing.saturating_mul(items).saturating_add(2);
        if spacing > 1 {
            height = height.saturating_sub(spacing - 1);
        }

        Self {
            x: cols.saturating_sub(width) / 2,
            y: rows.saturating_sub(height) / 2,
            width,
            height,
            spacing,
        }
    }

    /// Screen row of item `index`.
    pub fn row(&self, index: usize) -> u16 {
        let index = u16::try_from(index).unwrap_or(u16::MAX);
        self.y
            .saturating_add(1)
            .saturating_add(self.spacing.saturating_mul(index))
    }
}

/// Paints one item row inside the window frame.
pub fn draw_entry<T: Terminal + ?Sized>(
    term: &mut T,
    entry: &Entry,
    geometry: &Geometry,
    y: u16,
    highlight: bool,
    palette: &Palette,
) {
    if geometry.width < 3 {
        return;
    }
    let x = geometry.x + 1;
    let x_stop = x + (geometry.width - 2) - 1;
    let back = if highlight {
        palette.highlight
    } else {
        palette.back
    };

    term.set_attr(palette.fore, back, false);
    term.put_char(x, y, ' ');

    let mut cx = x + 1;
    for (i, ch) in entry.label().chars().enumerate() {
        if cx >= x_stop {
            break;
        }
        if entry.hotkey_offset() == Some(i) {
            term.set_attr(palette.hotkey, back, false);
            term.put_char(cx, y, ch);
            term.set_attr(palette.fore, back, false);
        } else {
            term.put_char(cx, y, ch);
        }
        cx += 1;
    }

    let param = entry.display().filter(|_| entry.max_param_width() > 0);
    let Some(param) = param else {
        if cx <= x_stop {
            term.hline(cx, y, ' ', x_stop - cx + 1);
        }
        return;
    };

    let (shown, truncated) = fit_param(param, entry.max_param_width());
    let len = u16::try_from(shown.chars().count())
        .unwrap_or(u16::MAX)
        .min(x_stop - x);
    let start = x_stop - len;
    term.put_str(start, y, &shown);
    term.put_char(x_stop, y, ' ');
    if truncated {
        term.put_str(start, y, "..");
    }
    if start > cx {
        term.hline(cx, y, ' ', start - cx);
    }
}

/// Keeps the tail of an over-long parameter string.
fn fit_param(param: &str, max: usize) -> (String, bool) {
    let len = param.chars().count();
    if len <= max {
        return (param.to_string(), false);
    }
    (param.chars().skip(len - max).collect(), true)
}

/// Writes the help text across the bottom screen row.
pub fn draw_status<T: Terminal + ?Sized>(term: &mut T, help: Option<&str>, palette: &Palette) {
    let cols = term.num_cols();
    let y = term.num_rows().saturating_sub(1);
    term.set_attr(palette.status_fore, palette.status_back, false);

    let text: String = help.unwrap_or("").chars().take(usize::from(cols)).collect();
    let len = text.chars().count() as u16;
    term.put_str(0, y, &text);
    term.hline(len, y, ' ', cols - len);
}
