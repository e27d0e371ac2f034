use alloc::{string::String, vec::Vec};

use volatile::Volatile;

use crate::boundary::Console;

const WIDTH: usize = 80;
const HEIGHT: usize = 25;
const VGA_ADDR: usize = 0xb8000;
const COLOR: u8 = 0x0f; // white on black

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
struct ScreenChar {
    ascii_character: u8,
    color_code: u8,
}

const BLANK: ScreenChar = cell(b' ');

#[repr(transparent)]
struct Buffer {
    chars: [[Volatile<ScreenChar>; WIDTH]; HEIGHT],
}

/// VGA text-mode console with one editable input line.
///
/// Output goes through [`Console`]. The input line starts wherever the
/// cursor was when [`Terminal::begin_input`] was called, which is right
/// after the prompt the kernel printed.
pub struct Terminal {
    cursor_x: usize,
    cursor_y: usize,
    input_x: usize,      // column where the input line starts
    input: String,       // complete text input content
    input_cursor: usize, // input cursor pos (bytes, NOT screen pos)
    history: Vec<String>,
    hist_pos: Option<usize>,
    buffer: &'static mut Buffer,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            cursor_x: 0,
            cursor_y: 0,
            input_x: 0,
            input: String::new(),
            input_cursor: 0,
            history: Vec::new(),
            hist_pos: None,
            buffer: unsafe { &mut *(VGA_ADDR as *mut Buffer) },
        }
    }

    pub(crate) fn move_cursor(&self) {
        use x86_64::instructions::port::Port;

        let pos = (self.cursor_y * WIDTH + self.cursor_x) as u16;
        let mut index: Port<u8> = Port::new(0x3d4);
        let mut data: Port<u8> = Port::new(0x3d5);
        unsafe {
            index.write(0x0f);
            data.write((pos & 0xff) as u8);
            index.write(0x0e);
            data.write((pos >> 8) as u8);
        }
    }

    fn new_line(&mut self) {
        self.cursor_x = 0;
        self.cursor_y += 1;
        if self.cursor_y >= HEIGHT {
            self.scroll_up();
            self.cursor_y = HEIGHT - 1;
        }
    }

    fn scroll_up(&mut self) {
        for row in 1..HEIGHT {
            for col in 0..WIDTH {
                let c = self.buffer.chars[row][col].read();
                self.buffer.chars[row - 1][col].write(c);
            }
        }
        for col in 0..WIDTH {
            self.buffer.chars[HEIGHT - 1][col].write(BLANK);
        }
        self.input_x = 0;
    }

    /// Start a fresh input line at the current cursor position.
    pub(crate) fn begin_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
        self.hist_pos = None;
        self.input_x = self.cursor_x;
        self.redraw_input();
    }

    /// Hand over the typed line and move below it.
    pub(crate) fn finish_input(&mut self) -> String {
        self.new_line();
        self.move_cursor();
        self.input_cursor = 0;
        core::mem::take(&mut self.input)
    }

    /// Redraw the input, with the cursor placed at `input_cursor`.
    pub(crate) fn redraw_input(&mut self) {
        let row = self.cursor_y;
        let mut chars = self.input.chars();
        for col in self.input_x..WIDTH {
            let byte = chars.next().map_or(b' ', printable);
            self.buffer.chars[row][col].write(cell(byte));
        }
        let before_cursor = self.input[..self.input_cursor].chars().count();
        self.cursor_x = (self.input_x + before_cursor).min(WIDTH - 1);
        self.move_cursor();
    }

    /// Insert a char at `input_cursor`.
    pub(crate) fn push(&mut self, c: char) {
        if c == '\n' || c == '\r' {
            return;
        }
        if self.input_x + self.input.chars().count() >= WIDTH - 1 {
            return; // the line is full
        }
        self.input.insert(self.input_cursor, c);
        self.input_cursor += c.len_utf8();
        self.redraw_input();
    }

    /// Delete the char before `input_cursor` (backspace).
    pub(crate) fn pop(&mut self) {
        if let Some((idx, _)) = self.input[..self.input_cursor].char_indices().next_back() {
            self.input.drain(idx..self.input_cursor);
            self.input_cursor = idx;
            self.redraw_input();
        }
    }

    /// Delete the char at `input_cursor` (Delete key).
    pub(crate) fn del_forward(&mut self) {
        if let Some(ch) = self.input[self.input_cursor..].chars().next() {
            let end = self.input_cursor + ch.len_utf8();
            self.input.drain(self.input_cursor..end);
            self.redraw_input();
        }
    }

    pub(crate) fn move_input_cursor_left(&mut self) {
        if let Some((idx, _)) = self.input[..self.input_cursor].char_indices().next_back() {
            self.input_cursor = idx;
            self.redraw_input();
        }
    }

    pub(crate) fn move_input_cursor_right(&mut self) {
        if let Some(ch) = self.input[self.input_cursor..].chars().next() {
            self.input_cursor += ch.len_utf8();
            self.redraw_input();
        }
    }

    pub(crate) fn move_input_cursor_home(&mut self) {
        self.input_cursor = 0;
        self.redraw_input();
    }

    pub(crate) fn move_input_cursor_end(&mut self) {
        self.input_cursor = self.input.len();
        self.redraw_input();
    }

    pub(crate) fn get_input(&self) -> &str {
        &self.input
    }

    pub(crate) fn set_input(&mut self, s: &str) {
        self.input.clear();
        self.input.push_str(s);
        self.input_cursor = self.input.len();
        self.redraw_input();
    }

    pub(crate) fn history_push(&mut self, s: &str) {
        if !s.is_empty() {
            self.history.push(String::from(s));
        }
        self.hist_pos = None;
    }

    pub(crate) fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.hist_pos {
            Some(i) => i.saturating_sub(1),
            None => self.history.len() - 1,
        };
        let line = self.history[idx].clone();
        self.hist_pos = Some(idx);
        self.set_input(&line);
    }

    pub(crate) fn history_next(&mut self) {
        let Some(i) = self.hist_pos else { return };
        if i + 1 < self.history.len() {
            let line = self.history[i + 1].clone();
            self.hist_pos = Some(i + 1);
            self.set_input(&line);
        } else {
            self.hist_pos = None;
            self.set_input("");
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for Terminal {
    fn write_str(&mut self, s: &str) {
        for c in s.chars() {
            self.write_char(c);
        }
    }

    fn write_char(&mut self, c: char) {
        match c {
            '\n' => self.new_line(),
            _ => {
                if self.cursor_x >= WIDTH {
                    self.new_line();
                }
                let (row, col) = (self.cursor_y, self.cursor_x);
                self.buffer.chars[row][col].write(cell(printable(c)));
                self.cursor_x += 1;
            }
        }
        self.move_cursor();
    }

    fn clear_screen(&mut self) {
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                self.buffer.chars[row][col].write(BLANK);
            }
        }
        self.cursor_x = 0;
        self.cursor_y = 0;
        self.input_x = 0;
        self.move_cursor();
    }
}

const fn cell(byte: u8) -> ScreenChar {
    ScreenChar {
        ascii_character: byte,
        color_code: COLOR,
    }
}

/// Code page 437 covers printable ASCII; everything else shows as a block.
fn printable(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        _ => 0xfe,
    }
}
