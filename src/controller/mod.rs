// src/controller/mod.rs
//! Drives the viewer: loads a document, shows it, and runs the single-key
//! command loop with its confirmation prompts.
//!
//! The controller is an explicit state machine. A reload goes back to
//! `Loading` and builds a fresh `Page`; nothing recurses, so any number of
//! reloads runs in constant stack. All terminal access goes through the
//! injected `Platform`, and page text is written to the injected output, so
//! the whole loop can run against `MockPlatform` and a byte buffer.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info, trace, warn};

use crate::config::Config;
use crate::document::{load_page_with_default_title, Page};
use crate::element::RenderContext;
use crate::error::LoadError;
use crate::keys::KeyInput;
use crate::platform::platform_trait::Platform;
use crate::registry::Registry;

/// A destructive action waiting for confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Exit,
    Reload,
}

impl PendingAction {
    pub fn name(&self) -> &'static str {
        match self {
            PendingAction::Exit => "exit",
            PendingAction::Reload => "reload",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// About to read and render a document.
    Loading,
    /// A requested document failed to load; the recovery menu is showing.
    ErrorRecovery,
    /// A page is on screen, waiting for a command key.
    Rendered,
    /// A confirmation prompt is showing.
    Confirming(PendingAction),
    /// The viewer is done.
    Terminated,
}

/// Where the document to show comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// A path given on the command line. Load failures are recoverable.
    Requested(PathBuf),
    /// The configured default document. Load failures are fatal.
    Default,
}

pub struct Controller<P: Platform, W: Write> {
    platform: P,
    out: W,
    registry: Registry,
    config: Config,
    entry: DocumentSource,
    // Set by the recovery menu's "main page" choice; cleared by "retry".
    use_default: bool,
    state: ControllerState,
    page: Option<Page>,
    last_error: Option<LoadError>,
}

impl<P: Platform, W: Write> Controller<P, W> {
    pub fn new(
        platform: P,
        out: W,
        registry: Registry,
        config: Config,
        document: Option<PathBuf>,
    ) -> Self {
        let entry = match document {
            Some(path) => DocumentSource::Requested(path),
            None => DocumentSource::Default,
        };
        Controller {
            platform,
            out,
            registry,
            config,
            entry,
            use_default: false,
            state: ControllerState::Loading,
            page: None,
            last_error: None,
        }
    }

    /// Runs until the user confirms exit. Only a failure to load the default
    /// document, or a broken terminal, ends the loop with an error.
    pub fn run(&mut self) -> Result<()> {
        info!("Controller: starting with {:?}", self.entry);
        while self.state != ControllerState::Terminated {
            self.step()?;
        }
        info!("Controller: terminated.");
        Ok(())
    }

    /// Performs the work of the current state and moves to the next one.
    pub fn step(&mut self) -> Result<ControllerState> {
        let next = match self.state {
            ControllerState::Loading => self.load()?,
            ControllerState::ErrorRecovery => self.recover()?,
            ControllerState::Rendered => self.command()?,
            ControllerState::Confirming(action) => self.confirm(action)?,
            ControllerState::Terminated => ControllerState::Terminated,
        };
        if next != self.state {
            debug!("Controller: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
        Ok(next)
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_parts(self) -> (P, W) {
        (self.platform, self.out)
    }

    /// The path the next load reads from.
    pub fn current_path(&self) -> &Path {
        match (&self.entry, self.use_default) {
            (DocumentSource::Requested(path), false) => path,
            _ => &self.config.document.default_path,
        }
    }

    fn load_is_recoverable(&self) -> bool {
        matches!(self.entry, DocumentSource::Requested(_)) && !self.use_default
    }

    fn load(&mut self) -> Result<ControllerState> {
        // Whatever was on screen belongs to the previous document.
        self.page = None;
        let path = self.current_path().to_path_buf();
        match load_page_with_default_title(
            &path,
            &self.registry,
            &self.config.document.default_title,
        ) {
            Ok(page) => {
                self.last_error = None;
                self.page = Some(page);
                self.show_page()?;
                Ok(ControllerState::Rendered)
            }
            Err(e) if self.load_is_recoverable() => {
                warn!("Controller: {}", describe(&e));
                self.last_error = Some(e);
                self.show_recovery_menu()?;
                Ok(ControllerState::ErrorRecovery)
            }
            Err(e) => Err(anyhow::Error::new(e).context("Failed to load the default document")),
        }
    }

    fn recover(&mut self) -> Result<ControllerState> {
        let key = self.next_key()?;
        if key.is_escape() {
            return self.exit_now();
        }
        match key.command_char() {
            Some('x') => self.exit_now(),
            Some('m') => {
                info!("Controller: falling back to the default document.");
                self.use_default = true;
                Ok(ControllerState::Loading)
            }
            Some('r') => {
                info!("Controller: retrying the requested document.");
                self.use_default = false;
                Ok(ControllerState::Loading)
            }
            _ => Ok(ControllerState::ErrorRecovery),
        }
    }

    fn command(&mut self) -> Result<ControllerState> {
        let key = self.next_key()?;
        let action = if key.is_escape() {
            Some(PendingAction::Exit)
        } else {
            match key.command_char() {
                Some('x') => Some(PendingAction::Exit),
                Some('r') => Some(PendingAction::Reload),
                _ => None,
            }
        };

        match action {
            Some(action) => {
                self.show_prompt(action)?;
                Ok(ControllerState::Confirming(action))
            }
            None => Ok(ControllerState::Rendered),
        }
    }

    fn confirm(&mut self, action: PendingAction) -> Result<ControllerState> {
        let key = self.next_key()?;
        if key.command_char() != Some('y') {
            debug!("Controller: {} cancelled.", action.name());
            self.redisplay()?;
            return Ok(ControllerState::Rendered);
        }

        self.platform.clear_screen()?;
        match action {
            PendingAction::Exit => {
                self.print_exit_message()?;
                Ok(ControllerState::Terminated)
            }
            PendingAction::Reload => {
                info!("Controller: reloading {}", self.current_path().display());
                Ok(ControllerState::Loading)
            }
        }
    }

    /// Blocks for the next key, swallowing interrupts.
    fn next_key(&mut self) -> Result<KeyInput> {
        loop {
            let key = self.platform.read_key()?;
            if key.is_interrupt() {
                debug!("Controller: ignoring interrupt while waiting for a key.");
                continue;
            }
            trace!("Controller: key {:?} in {:?}", key, self.state);
            return Ok(key);
        }
    }

    fn render_context(&self) -> RenderContext {
        let columns = self
            .platform
            .columns()
            .unwrap_or(self.config.terminal.fallback_columns);
        RenderContext::new(columns)
    }

    fn show_page(&mut self) -> Result<()> {
        let ctx = self.render_context();
        self.platform.clear_screen()?;
        if let Some(page) = self.page.as_mut() {
            let text = page.render(&ctx);
            writeln!(self.out, "{}", text).context("Failed to write page")?;
            self.out.flush().context("Failed to flush page")?;
            page.publish_title(&mut self.platform)?;
        }
        Ok(())
    }

    /// Shows the last rendered text again without rendering.
    fn redisplay(&mut self) -> Result<()> {
        self.platform.clear_screen()?;
        if let Some(text) = self.page.as_ref().and_then(Page::rendered) {
            writeln!(self.out, "{}", text).context("Failed to write page")?;
        }
        self.out.flush().context("Failed to flush page")
    }

    fn show_prompt(&mut self, action: PendingAction) -> Result<()> {
        self.platform.clear_screen()?;
        let prompt = self.config.messages.confirm_prompt(action.name());
        writeln!(self.out, "{}", prompt).context("Failed to write prompt")?;
        self.out.flush().context("Failed to flush prompt")
    }

    fn show_recovery_menu(&mut self) -> Result<()> {
        self.platform.clear_screen()?;
        let messages = &self.config.messages;
        writeln!(self.out, "{}", messages.load_failed).context("Failed to write menu")?;
        if let Some(e) = &self.last_error {
            writeln!(self.out, "{}", describe(e)).context("Failed to write menu")?;
        }
        writeln!(self.out, "{}", messages.recovery_menu).context("Failed to write menu")?;
        self.out.flush().context("Failed to flush menu")
    }

    fn exit_now(&mut self) -> Result<ControllerState> {
        self.print_exit_message()?;
        Ok(ControllerState::Terminated)
    }

    fn print_exit_message(&mut self) -> Result<()> {
        writeln!(self.out, "{}", self.config.messages.exit).context("Failed to write exit message")?;
        self.out.flush().context("Failed to flush exit message")
    }
}

/// The error and its causes on one line.
fn describe(error: &LoadError) -> String {
    let mut text = error.to_string();
    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = std::error::Error::source(cause);
    }
    text
}
