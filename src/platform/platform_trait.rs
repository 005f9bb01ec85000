// src/platform/platform_trait.rs
//
// Defines the `Platform` trait, which abstracts over the handful of terminal
// capabilities the controller depends on.

use anyhow::Result;

use crate::keys::KeyInput;

/// A trait that defines the interface for a platform implementation.
///
/// Page text itself is written by the caller to its own output stream; the
/// platform only owns the side effects that differ between terminals.
pub trait Platform {
    /// Clears the screen and moves the cursor to the top-left corner.
    fn clear_screen(&mut self) -> Result<()>;

    /// Sets the terminal window title.
    fn set_title(&mut self, title: &str) -> Result<()>;

    /// Current terminal width in columns, or `None` if it can't be determined.
    fn columns(&self) -> Option<u16>;

    /// Blocks until a single key is pressed. No echo, no line buffering.
    ///
    /// An interrupted wait is reported as a key for which
    /// `KeyInput::is_interrupt` holds, never as an error.
    fn read_key(&mut self) -> Result<KeyInput>;
}
