use alloc::{format, string::String, vec::Vec};

use futures_util::stream::StreamExt;
use pc_keyboard::{DecodedKey, HandleControl, KeyCode, Keyboard, ScancodeSet1, layouts};

use crate::kernel::{Flow, Kernel};
use crate::memory::HeapPageAllocator;
use crate::task::keyboard::ScancodeStream;
use crate::terminal::Terminal;

const COMMANDS: [&str; 7] = ["END", "PAGE", "LIST", "CREATE", "READ", "WRITE", "LOCK"];

/// Main REPL: keyboard in, kernel session out.
pub async fn arclight_repl(mut kernel: Kernel, mut pages: HeapPageAllocator) {
    let mut scancodes = ScancodeStream::new();
    let mut keyboard = Keyboard::new(ScancodeSet1::new(), layouts::Us104Key, HandleControl::Ignore);

    let mut term = Terminal::new();
    kernel.boot(&mut term);

    loop {
        term.begin_input();

        // Read one line
        while let Some(scancode) = scancodes.next().await {
            let Ok(Some(key_event)) = keyboard.add_byte(scancode) else {
                continue;
            };
            let Some(key) = keyboard.process_keyevent(key_event) else {
                continue;
            };
            match key {
                DecodedKey::Unicode(c) => match c {
                    '\n' | '\r' => break,
                    '\t' => {
                        if kernel.session().is_unlocked() {
                            autocomplete(&mut term, &kernel);
                        }
                    }
                    '\x08' => term.pop(),
                    // Control chars are ignored, eg. delete handled as RawKey
                    c if c.is_control() => {}
                    c => term.push(c),
                },
                DecodedKey::RawKey(code) => match code {
                    // no history recall at the password prompt
                    KeyCode::ArrowUp if kernel.session().is_unlocked() => term.history_prev(),
                    KeyCode::ArrowDown if kernel.session().is_unlocked() => term.history_next(),
                    KeyCode::ArrowLeft => term.move_input_cursor_left(),
                    KeyCode::ArrowRight => term.move_input_cursor_right(),
                    KeyCode::Delete => term.del_forward(),
                    KeyCode::Home => term.move_input_cursor_home(),
                    KeyCode::End => term.move_input_cursor_end(),
                    _ => {}
                },
            }
        }

        let line = term.finish_input();
        // passwords stay out of the history
        if kernel.session().is_unlocked() {
            term.history_push(&line);
        }

        if kernel.handle_line(&line, &mut term, &mut pages) == Flow::Halt {
            crate::sys::halt();
        }
    }
}

// Complete the last token from command names and file names
fn autocomplete(term: &mut Terminal, kernel: &Kernel) {
    let input = String::from(term.get_input());
    let (prefix, token) = match input.rfind(' ') {
        Some(at) => input.split_at(at + 1),
        None => ("", input.as_str()),
    };

    let mut candidates: Vec<&str> = Vec::new();
    if prefix.is_empty() {
        candidates.extend(COMMANDS.iter().copied().filter(|c| c.starts_with(token)));
    } else {
        candidates.extend(kernel.files().names().filter(|n| n.starts_with(token)));
        candidates.sort_unstable();
        candidates.dedup();
    }

    if let [completed] = candidates.as_slice() {
        term.set_input(&format!("{}{} ", prefix, completed));
    }
}
