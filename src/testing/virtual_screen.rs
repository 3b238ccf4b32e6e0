//! A minimal terminal emulator for the crate's own output.
//!
//! [`VirtualScreen`] replays captured output into a character grid so tests
//! can assert on what a user would see. It understands exactly the sequences
//! the screen buffer emits: cursor moves, save/restore, full and line clears,
//! and the private modes for the cursor, alternate screen and mouse. SGR
//! sequences are accepted and ignored.

use unicode_width::UnicodeWidthChar;

/// Marks the second cell of a double-width character.
const WIDE_TAIL: char = '\0';

/// Character grid plus the terminal modes switched by the replayed output.
#[derive(Debug, Clone)]
pub struct VirtualScreen {
    width: usize,
    height: usize,
    cells: Vec<Vec<char>>,
    cursor: (usize, usize),
    saved: (usize, usize),
    cursor_visible: bool,
    alternate_screen: bool,
    mouse_reporting: bool,
}

impl VirtualScreen {
    /// A blank screen of `width` x `height` cells.
    pub fn new(width: u16, height: u16) -> Self {
        let (width, height) = (usize::from(width.max(1)), usize::from(height.max(1)));
        Self {
            width,
            height,
            cells: vec![vec![' '; width]; height],
            cursor: (0, 0),
            saved: (0, 0),
            cursor_visible: true,
            alternate_screen: false,
            mouse_reporting: false,
        }
    }

    /// Replay captured output onto the screen.
    pub fn feed(&mut self, output: &str) {
        let mut chars = output.chars();
        while let Some(ch) = chars.next() {
            match ch {
                '\x1b' => match chars.next() {
                    Some('[') => {
                        let mut params = String::new();
                        let mut fin = None;
                        for c in chars.by_ref() {
                            if ('\x40'..='\x7e').contains(&c) {
                                fin = Some(c);
                                break;
                            }
                            params.push(c);
                        }
                        if let Some(fin) = fin {
                            self.csi(&params, fin);
                        }
                    }
                    // Two-byte escapes carry nothing we model.
                    Some(_) | None => {}
                },
                '\r' => self.cursor.0 = 0,
                '\n' => self.cursor.1 = (self.cursor.1 + 1).min(self.height - 1),
                c => self.put(c),
            }
        }
    }

    fn put(&mut self, c: char) {
        let w = c.width().unwrap_or(0);
        if w == 0 {
            return;
        }
        let (x, y) = self.cursor;
        if x < self.width && y < self.height {
            self.cells[y][x] = c;
            if w == 2 && x + 1 < self.width {
                self.cells[y][x + 1] = WIDE_TAIL;
            }
        }
        self.cursor.0 = (x + w).min(self.width);
    }

    fn csi(&mut self, params: &str, fin: char) {
        let numbers: Vec<usize> = params
            .trim_start_matches('?')
            .split(';')
            .map(|p| p.parse().unwrap_or(0))
            .collect();
        let first = numbers.first().copied().unwrap_or(0);

        match fin {
            'H' => {
                let row = first.max(1) - 1;
                let col = numbers.get(1).copied().unwrap_or(1).max(1) - 1;
                self.cursor = (col.min(self.width - 1), row.min(self.height - 1));
            }
            'J' if first == 2 => {
                for row in &mut self.cells {
                    row.fill(' ');
                }
            }
            'K' if first == 2 => self.cells[self.cursor.1].fill(' '),
            's' => self.saved = self.cursor,
            'u' => self.cursor = self.saved,
            'h' | 'l' if params.starts_with('?') => {
                let on = fin == 'h';
                match first {
                    25 => self.cursor_visible = on,
                    1049 => self.alternate_screen = on,
                    1000 => self.mouse_reporting = on,
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// One row as text with trailing spaces trimmed.
    pub fn row(&self, y: usize) -> String {
        self.cells
            .get(y)
            .map(|row| {
                let text: String = row.iter().filter(|&&c| c != WIDE_TAIL).collect();
                text.trim_end().to_owned()
            })
            .unwrap_or_default()
    }

    /// The whole screen, rows right-trimmed and joined with `\n`.
    pub fn text(&self) -> String {
        (0..self.height)
            .map(|y| self.row(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        self.cells.get(y).and_then(|row| row.get(x)).copied()
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn alternate_screen(&self) -> bool {
        self.alternate_screen
    }

    pub fn mouse_reporting(&self) -> bool {
        self.mouse_reporting
    }
}
