//! Cosmetic terminal operations.

use std::io::{self, Write};

use is_terminal::IsTerminal;

/// Clears the screen before the terminal is handed to the session client.
///
/// Only acts when stdout is a terminal; failures are ignored, the clear is
/// purely cosmetic.
pub(crate) fn clear_screen() {
    let mut stdout = io::stdout();
    if !stdout.is_terminal() {
        return;
    }

    let _ = stdout.write_all(b"\x1b[2J\x1b[H");
    let _ = stdout.flush();
}
