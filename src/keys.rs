// src/keys.rs

//! Key input as the command loop sees it, and decoding of the bytes a
//! raw-mode terminal sends for a keypress.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Represents a keyboard modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
    }
}

/// Represents a key symbol.
///
/// Only the keys the command loop cares about get their own variant. Arrow
/// keys, function keys and the like all arrive as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    Char(char),
    Escape,
    Enter,
    Backspace,
    Tab,
    /// A key that produced an escape sequence (arrows, F-keys, ...).
    Other,
    /// The read was interrupted, either by a signal or by Ctrl+C.
    Interrupt,
    #[default]
    Unknown,
}

/// One keypress as delivered by a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct KeyInput {
    pub symbol: KeySymbol,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(symbol: KeySymbol, modifiers: Modifiers) -> Self {
        Self { symbol, modifiers }
    }

    pub fn char(c: char) -> Self {
        Self::new(KeySymbol::Char(c), Modifiers::empty())
    }

    pub fn interrupt() -> Self {
        Self::new(KeySymbol::Interrupt, Modifiers::empty())
    }

    pub fn escape() -> Self {
        Self::new(KeySymbol::Escape, Modifiers::empty())
    }

    /// Ctrl+C counts as an interrupt just like a signal does.
    pub fn is_interrupt(&self) -> bool {
        match self.symbol {
            KeySymbol::Interrupt => true,
            KeySymbol::Char(c) => {
                self.modifiers.contains(Modifiers::CONTROL) && c.eq_ignore_ascii_case(&'c')
            }
            _ => false,
        }
    }

    /// The character for command matching, lowercased. `None` for
    /// non-character keys and for Control chords.
    pub fn command_char(&self) -> Option<char> {
        match self.symbol {
            KeySymbol::Char(c) if !self.modifiers.contains(Modifiers::CONTROL) => {
                c.to_lowercase().next()
            }
            _ => None,
        }
    }

    pub fn is_escape(&self) -> bool {
        self.symbol == KeySymbol::Escape
    }
}

/// Decodes the first byte of a keypress read from a raw-mode terminal.
///
/// `continued` says whether more bytes of the same keypress were already
/// waiting, which separates a lone Escape from an escape sequence.
pub fn key_from_byte(byte: u8, continued: bool) -> KeyInput {
    match byte {
        0x1b if continued => KeyInput::new(KeySymbol::Other, Modifiers::empty()),
        0x1b => KeyInput::escape(),
        b'\r' | b'\n' => KeyInput::new(KeySymbol::Enter, Modifiers::empty()),
        b'\t' => KeyInput::new(KeySymbol::Tab, Modifiers::empty()),
        0x7f | 0x08 => KeyInput::new(KeySymbol::Backspace, Modifiers::empty()),
        // Ctrl+A ..= Ctrl+Z
        0x01..=0x1a => KeyInput::new(
            KeySymbol::Char((b'a' + byte - 1) as char),
            Modifiers::CONTROL,
        ),
        b'A'..=b'Z' => KeyInput::new(KeySymbol::Char(byte as char), Modifiers::SHIFT),
        0x20..=0x7e => KeyInput::char(byte as char),
        _ => KeyInput::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ctrl_c_is_an_interrupt() {
        let key = key_from_byte(0x03, false);
        assert_eq!(key.symbol, KeySymbol::Char('c'));
        assert!(key.modifiers.contains(Modifiers::CONTROL));
        assert!(key.is_interrupt());
        assert_eq!(key.command_char(), None);
        assert!(!KeyInput::char('c').is_interrupt());
    }

    #[test]
    fn command_chars_are_lowercased() {
        assert_eq!(key_from_byte(b'X', false).command_char(), Some('x'));
        assert_eq!(key_from_byte(b'y', false).command_char(), Some('y'));
        assert_eq!(KeyInput::escape().command_char(), None);
    }

    #[test]
    fn shift_does_not_block_command_chars() {
        let key = key_from_byte(b'R', false);
        assert_eq!(key.modifiers, Modifiers::SHIFT);
        assert_eq!(key.command_char(), Some('r'));
        assert_eq!(key_from_byte(0x12, false).command_char(), None);
    }

    #[test]
    fn escape_alone_versus_sequence() {
        assert!(key_from_byte(0x1b, false).is_escape());
        let arrow = key_from_byte(0x1b, true);
        assert_eq!(arrow.symbol, KeySymbol::Other);
        assert!(!arrow.is_escape());
    }

    #[test]
    fn control_bytes_map_to_named_keys() {
        assert_eq!(key_from_byte(b'\r', false).symbol, KeySymbol::Enter);
        assert_eq!(key_from_byte(b'\t', false).symbol, KeySymbol::Tab);
        assert_eq!(key_from_byte(0x7f, false).symbol, KeySymbol::Backspace);
        assert_eq!(key_from_byte(0xc3, false).symbol, KeySymbol::Unknown);
    }
}
