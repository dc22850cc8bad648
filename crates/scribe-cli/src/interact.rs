//! Console-backed prompts and notices.

use std::cell::RefCell;
use std::io::{self, Write};

use scribe_toolchain::Interaction;

/// An [`Interaction`] surface writing notices and prompts to the CLI's
/// stderr stream.
///
/// Prompts read one line from stdin and accept `y` or `yes`; with
/// `assume_yes` set, every prompt is answered affirmatively without
/// reading input.
pub(crate) struct ConsoleInteraction<'a, E: Write> {
    stderr: RefCell<&'a mut E>,
    assume_yes: bool,
}

impl<'a, E: Write> ConsoleInteraction<'a, E> {
    pub(crate) const fn new(stderr: &'a mut E, assume_yes: bool) -> Self {
        Self {
            stderr: RefCell::new(stderr),
            assume_yes,
        }
    }
}

impl<E: Write> Interaction for ConsoleInteraction<'_, E> {
    fn confirm(&self, message: &str) -> bool {
        let mut stderr = self.stderr.borrow_mut();
        if self.assume_yes {
            let _ = writeln!(stderr, "{message} [assumed yes]");
            return true;
        }
        let _ = write!(stderr, "{message} [y/N] ");
        let _ = stderr.flush();
        drop(stderr);

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }

    fn notify(&self, message: &str) {
        let _ = writeln!(self.stderr.borrow_mut(), "{message}");
    }
}
