// src/platform/mock.rs

use std::collections::VecDeque;

use anyhow::{bail, Result};

use crate::keys::KeyInput;
use crate::platform::actions::PlatformAction;
use crate::platform::platform_trait::Platform;

/// Width reported by a fresh `MockPlatform`.
pub const MOCK_COLUMNS: u16 = 40;

/// A scripted platform for tests.
///
/// Keys are handed out in the order they were pushed. Reading past the end of
/// the script is an error, so a test whose controller never terminates fails
/// instead of hanging.
#[derive(Debug, Default)]
pub struct MockPlatform {
    keys: VecDeque<KeyInput>,
    dispatched_actions: Vec<PlatformAction>,
    columns: Option<u16>,
    keys_read: usize,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            columns: Some(MOCK_COLUMNS),
            ..Self::default()
        }
    }

    pub fn with_keys(keys: impl IntoIterator<Item = KeyInput>) -> Self {
        let mut platform = Self::new();
        platform.keys.extend(keys);
        platform
    }

    pub fn push_key(&mut self, key: KeyInput) {
        self.keys.push_back(key);
    }

    pub fn set_columns(&mut self, columns: Option<u16>) {
        self.columns = columns;
    }

    pub fn dispatched_actions(&self) -> &[PlatformAction] {
        &self.dispatched_actions
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }

    pub fn keys_read(&self) -> usize {
        self.keys_read
    }
}

impl Platform for MockPlatform {
    fn clear_screen(&mut self) -> Result<()> {
        self.dispatched_actions.push(PlatformAction::ClearScreen);
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        self.dispatched_actions
            .push(PlatformAction::SetTitle(title.to_string()));
        Ok(())
    }

    fn columns(&self) -> Option<u16> {
        self.columns
    }

    fn read_key(&mut self) -> Result<KeyInput> {
        match self.keys.pop_front() {
            Some(key) => {
                self.keys_read += 1;
                Ok(key)
            }
            None => bail!("MockPlatform: key script exhausted"),
        }
    }
}
