// src/platform/actions.rs
//
// Defines the terminal side effects a platform can be asked to perform.

/// Commands that can be sent to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformAction {
    /// Clear the whole screen and home the cursor.
    ClearScreen,
    /// Set the title of the terminal window.
    SetTitle(String),
}
