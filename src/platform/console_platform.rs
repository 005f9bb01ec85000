// src/platform/console_platform.rs
//
// Console platform implementation.

use std::io::{self, stdout, Write};
use std::mem;
use std::os::fd::{AsFd, BorrowedFd};

use anyhow::{bail, Context, Result};
use libc::{winsize, STDIN_FILENO, STDOUT_FILENO, TIOCGWINSZ};
use log::{debug, error, info, trace, warn};
use nix::errno::Errno;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use nix::unistd::read;
use termios::{tcsetattr, Termios, ECHO, ICANON, ISIG, TCSANOW, VMIN, VTIME};

use crate::keys::{key_from_byte, KeyInput};
use crate::platform::actions::PlatformAction;
use crate::platform::platform_trait::Platform;

const CLEAR_SCREEN_AND_HOME: &str = "\x1b[2J\x1b[H";
const OSC_SET_TITLE_PREFIX: &str = "\x1b]0;";
const OSC_TERMINATOR: char = '\x07';
const ESC: u8 = 0x1b;

// How long to wait for the rest of an escape sequence after ESC.
const ESCAPE_SEQUENCE_TIMEOUT_MS: u8 = 25;
const DRAIN_BUFFER_SIZE: usize = 32;

/// Terminal platform for unix consoles.
///
/// Puts stdin in non-canonical, no-echo mode with signal generation off, so
/// Ctrl+C arrives as an ordinary key. Output processing stays on so `\n`
/// still returns the carriage. The original attributes come back on drop.
pub struct ConsolePlatform {
    original_termios: Option<Termios>,
}

impl ConsolePlatform {
    pub fn new() -> Result<Self> {
        info!("Creating new ConsolePlatform.");
        let original_termios = match Termios::from_fd(STDIN_FILENO) {
            Ok(ts) => Some(ts),
            Err(e) => {
                warn!(
                    "Failed to get initial termios: {}. Proceeding without raw mode.",
                    e
                );
                None
            }
        };

        if let Some(ref ots) = original_termios {
            let mut raw_termios = *ots;
            raw_termios.c_lflag &= !(ECHO | ICANON | ISIG);
            raw_termios.c_iflag &= !(libc::IXON | libc::ICRNL);
            raw_termios.c_cc[VMIN] = 1;
            raw_termios.c_cc[VTIME] = 0;
            tcsetattr(STDIN_FILENO, TCSANOW, &raw_termios)
                .context("ConsolePlatform: Failed to set raw terminal attributes")?;
            debug!("ConsolePlatform: Terminal set to raw mode.");
        }

        Ok(Self { original_termios })
    }

    fn dispatch_action(&mut self, action: PlatformAction) -> Result<()> {
        trace!("ConsolePlatform: Dispatching action: {:?}", action);
        let mut out = stdout().lock();
        match action {
            PlatformAction::ClearScreen => {
                out.write_all(CLEAR_SCREEN_AND_HOME.as_bytes())
                    .context("ConsolePlatform: Failed to clear screen")?;
            }
            PlatformAction::SetTitle(title) => {
                write!(out, "{}{}{}", OSC_SET_TITLE_PREFIX, title, OSC_TERMINATOR)
                    .context("ConsolePlatform: Failed to set title")?;
            }
        }
        out.flush().context("ConsolePlatform: Failed to flush stdout")
    }

    fn restore(&mut self) -> Result<()> {
        if let Some(original_termios) = self.original_termios.take() {
            debug!("ConsolePlatform: Restoring original terminal attributes.");
            tcsetattr(STDIN_FILENO, TCSANOW, &original_termios)
                .context("ConsolePlatform: Failed to restore original terminal attributes")?;
        }
        Ok(())
    }
}

impl Platform for ConsolePlatform {
    fn clear_screen(&mut self) -> Result<()> {
        self.dispatch_action(PlatformAction::ClearScreen)
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.dispatch_action(PlatformAction::SetTitle(title.to_string()))
    }

    fn columns(&self) -> Option<u16> {
        match get_terminal_columns(STDOUT_FILENO) {
            Ok(0) => None,
            Ok(cols) => Some(cols),
            Err(e) => {
                warn!("ConsolePlatform: Failed to get terminal size: {:#}", e);
                None
            }
        }
    }

    fn read_key(&mut self) -> Result<KeyInput> {
        read_key_from(io::stdin().as_fd())
    }
}

/// Blocks for one keypress on `fd`.
///
/// Only an ESC pulls in the bytes queued behind it, to tell a lone Escape from
/// an arrow or function key sequence. Any other byte is a key on its own, so
/// keys typed ahead or piped in are read one per call.
pub(crate) fn read_key_from<Fd: AsFd>(fd: Fd) -> Result<KeyInput> {
    let fd = fd.as_fd();
    let mut byte = [0u8; 1];
    match read(fd, &mut byte) {
        Ok(0) => bail!("ConsolePlatform: EOF on stdin"),
        Ok(_) => {}
        Err(Errno::EINTR) => {
            trace!("ConsolePlatform: stdin read Interrupted.");
            return Ok(KeyInput::interrupt());
        }
        Err(e) => return Err(e).context("ConsolePlatform: Error reading from stdin"),
    }
    let continued = byte[0] == ESC && drain_escape_sequence(fd)?;
    let key = key_from_byte(byte[0], continued);
    trace!("ConsolePlatform: Read byte {:#04x} as {:?}", byte[0], key);
    Ok(key)
}

/// Swallows the rest of an escape sequence. Returns whether anything followed
/// the ESC.
fn drain_escape_sequence(fd: BorrowedFd<'_>) -> Result<bool> {
    let mut drained = false;
    loop {
        let mut fds = [PollFd::new(fd, PollFlags::POLLIN)];
        match poll(&mut fds, PollTimeout::from(ESCAPE_SEQUENCE_TIMEOUT_MS)) {
            Ok(0) => return Ok(drained),
            Ok(_) => {
                let mut buf = [0u8; DRAIN_BUFFER_SIZE];
                match read(fd, &mut buf) {
                    Ok(0) => return Ok(drained),
                    Ok(count) => {
                        trace!("ConsolePlatform: Drained {} escape sequence bytes.", count);
                        drained = true;
                    }
                    Err(Errno::EINTR) => return Ok(drained),
                    Err(e) => return Err(e).context("ConsolePlatform: Error draining stdin"),
                }
            }
            Err(Errno::EINTR) => return Ok(drained),
            Err(e) => return Err(e).context("ConsolePlatform: Failed to poll stdin"),
        }
    }
}

fn get_terminal_columns(fd: libc::c_int) -> Result<u16> {
    unsafe {
        let mut winsz: winsize = mem::zeroed();
        if libc::ioctl(fd, TIOCGWINSZ, &mut winsz) == -1 {
            return Err(anyhow::Error::from(io::Error::last_os_error())
                .context("ConsolePlatform: ioctl(TIOCGWINSZ) failed"));
        }
        Ok(winsz.ws_col)
    }
}

impl Drop for ConsolePlatform {
    fn drop(&mut self) {
        info!("ConsolePlatform: Dropping instance, restoring terminal.");
        if let Err(e) = self.restore() {
            error!("ConsolePlatform: Error during cleanup in drop: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeySymbol;
    use std::fs::File;
    use std::os::fd::OwnedFd;

    fn pipe_with(bytes: &[u8]) -> OwnedFd {
        let (reader, writer) = nix::unistd::pipe().unwrap();
        let mut writer = File::from(writer);
        writer.write_all(bytes).unwrap();
        // Dropping the writer closes it, so reads past the data hit EOF.
        reader
    }

    #[test_log::test]
    fn it_should_read_keys_typed_ahead_one_at_a_time() {
        let reader = pipe_with(b"xy");

        assert_eq!(read_key_from(&reader).unwrap().symbol, KeySymbol::Char('x'));
        assert_eq!(read_key_from(&reader).unwrap().symbol, KeySymbol::Char('y'));
        assert!(read_key_from(&reader).is_err());
    }

    #[test_log::test]
    fn it_should_report_a_lone_escape() {
        let reader = pipe_with(&[ESC]);
        assert!(read_key_from(&reader).unwrap().is_escape());
    }

    #[test_log::test]
    fn it_should_swallow_an_escape_sequence_as_one_key() {
        // Up arrow.
        let reader = pipe_with(b"\x1b[A");
        let arrow = read_key_from(&reader).unwrap();
        assert_eq!(arrow.symbol, KeySymbol::Other);
        assert!(read_key_from(&reader).is_err());
    }

    #[test_log::test]
    fn it_should_decode_ctrl_c_as_an_interrupt() {
        let reader = pipe_with(&[0x03, b'n']);
        assert!(read_key_from(&reader).unwrap().is_interrupt());
        assert_eq!(read_key_from(&reader).unwrap().command_char(), Some('n'));
    }
}
