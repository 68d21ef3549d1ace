use super::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
    pub blink: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::LightGray,
            bg: Color::Black,
            blink: false,
        }
    }
}

/// Saved rectangle of screen cells (the backing store of a window).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Area {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Area {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(usize::from(y) * usize::from(self.width) + usize::from(x))
    }
}

/// Shadow copy of the console contents, plus the current drawing attribute.
#[derive(Debug, Clone)]
pub struct ScreenBuffer {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
    dirty: Vec<bool>,
    attr: Cell,
}

impl ScreenBuffer {
    pub fn new(cols: u16, rows: u16) -> Self {
        let len = usize::from(cols) * usize::from(rows);
        Self {
            cols,
            rows,
            cells: vec![Cell::default(); len],
            dirty: vec![true; len],
            attr: Cell::default(),
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.cols || y >= self.rows {
            return None;
        }
        Some(usize::from(y) * usize::from(self.cols) + usize::from(x))
    }

    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).and_then(|i| self.cells.get(i))
    }

    /// Text of one screen row, trailing blanks included.
    pub fn row_text(&self, y: u16) -> String {
        (0..self.cols)
            .filter_map(|x| self.cell(x, y).map(|c| c.ch))
            .collect()
    }

    /// Whole screen as text, one line per row with trailing blanks trimmed.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for y in 0..self.rows {
            out.push_str(self.row_text(y).trim_end());
            out.push('\n');
        }
        out
    }

    pub fn set_attr(&mut self, fg: Color, bg: Color, blink: bool) {
        self.attr = Cell {
            ch: ' ',
            fg,
            bg,
            blink,
        };
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        self.write(i, Cell { ch, ..self.attr });
    }

    fn write(&mut self, i: usize, cell: Cell) {
        if self.cells[i] != cell {
            self.cells[i] = cell;
            self.dirty[i] = true;
        }
    }

    /// Copies a rectangle out of the screen. Cells outside the screen are
    /// stored blank and skipped again on restore.
    pub fn snapshot(&self, x: u16, y: u16, width: u16, height: u16) -> Area {
        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height));
        for dy in 0..height {
            for dx in 0..width {
                let cell = self
                    .cell(x.saturating_add(dx), y.saturating_add(dy))
                    .copied()
                    .unwrap_or_default();
                cells.push(cell);
            }
        }
        Area {
            width,
            height,
            cells,
        }
    }

    pub fn restore(&mut self, area: &Area, x: u16, y: u16) {
        for dy in 0..area.height {
            for dx in 0..area.width {
                let (Some(i), Some(cell)) = (
                    self.index(x.saturating_add(dx), y.saturating_add(dy)),
                    area.cell(dx, dy).copied(),
                ) else {
                    continue;
                };
                self.write(i, cell);
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn draw_window(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        border: Color,
        fill: Color,
        title: Option<&str>,
    ) -> Area {
        let saved = self.snapshot(x, y, width, height);
        if width < 2 || height < 2 {
            return saved;
        }

        let saved_attr = self.attr;
        self.set_attr(border, fill, false);

        let right = x + width - 1;
        let bottom = y + height - 1;
        for cx in x..=right {
            let (top_ch, bottom_ch) = match cx {
                _ if cx == x => ('┌', '└'),
                _ if cx == right => ('┐', '┘'),
                _ => ('─', '─'),
            };
            self.put_char(cx, y, top_ch);
            self.put_char(cx, bottom, bottom_ch);
        }
        for cy in y + 1..bottom {
            self.put_char(x, cy, '│');
            for cx in x + 1..right {
                self.put_char(cx, cy, ' ');
            }
            self.put_char(right, cy, '│');
        }

        if let Some(title) = title.filter(|t| !t.is_empty()) {
            let label = format!(" {title} ");
            let inner = usize::from(width - 2);
            let label: String = label.chars().take(inner).collect();
            let len = label.chars().count() as u16;
            let start = x + 1 + (width - 2 - len) / 2;
            for (i, ch) in label.chars().enumerate() {
                self.put_char(start + i as u16, y, ch);
            }
        }

        self.attr = saved_attr;
        saved
    }

    /// Marks every cell for repaint.
    pub fn invalidate(&mut self) {
        self.dirty.fill(true);
    }

    /// Returns the cells changed since the last call, in row-major order.
    pub fn take_dirty(&mut self) -> Vec<(u16, u16, Cell)> {
        let mut out = Vec::new();
        for (i, dirty) in self.dirty.iter_mut().enumerate() {
            if !*dirty {
                continue;
            }
            *dirty = false;
            let x = (i % usize::from(self.cols)) as u16;
            let y = (i / usize::from(self.cols)) as u16;
            out.push((x, y, self.cells[i]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_char_clips_outside_screen() {
        let mut buf = ScreenBuffer::new(4, 2);
        buf.put_char(3, 1, 'x');
        buf.put_char(4, 1, 'y');
        buf.put_char(0, 2, 'z');
        assert_eq!(buf.row_text(1), "   x");
        assert_eq!(buf.dump(), "\n   x\n");
    }

    #[test]
    fn window_is_framed_and_titled() {
        let mut buf = ScreenBuffer::new(12, 4);
        buf.draw_window(0, 0, 12, 4, Color::White, Color::Blue, Some("Drive"));
        assert_eq!(buf.row_text(0), "┌─ Drive ──┐");
        assert_eq!(buf.row_text(1), "│          │");
        assert_eq!(buf.row_text(3), "└──────────┘");
        assert_eq!(buf.cell(1, 1).map(|c| c.bg), Some(Color::Blue));
    }

    #[test]
    fn restore_puts_back_what_the_window_covered() {
        let mut buf = ScreenBuffer::new(8, 4);
        buf.put_str_for_test(0, 1, "abcdefgh");
        let before = buf.dump();

        let saved = buf.draw_window(2, 0, 4, 3, Color::White, Color::Blue, None);
        assert_ne!(buf.dump(), before);

        buf.restore(&saved, 2, 0);
        assert_eq!(buf.dump(), before);
    }

    #[test]
    fn snapshot_past_the_edge_restores_only_visible_cells() {
        let mut buf = ScreenBuffer::new(4, 2);
        let saved = buf.draw_window(2, 0, 4, 2, Color::White, Color::Blue, None);
        assert_eq!(saved.width(), 4);
        buf.restore(&saved, 2, 0);
        assert_eq!(buf.dump(), "\n\n");
    }

    #[test]
    fn dirty_cells_are_reported_once() {
        let mut buf = ScreenBuffer::new(2, 1);
        assert_eq!(buf.take_dirty().len(), 2);
        buf.put_char(1, 0, 'q');
        buf.put_char(1, 0, 'q');
        let dirty = buf.take_dirty();
        assert_eq!(dirty.len(), 1);
        assert_eq!((dirty[0].0, dirty[0].1, dirty[0].2.ch), (1, 0, 'q'));
        assert!(buf.take_dirty().is_empty());
    }

    impl ScreenBuffer {
        fn put_str_for_test(&mut self, x: u16, y: u16, s: &str) {
            for (i, ch) in s.chars().enumerate() {
                self.put_char(x + i as u16, y, ch);
            }
        }
    }
}
