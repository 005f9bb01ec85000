// src/platform/mod.rs
//
// Terminal capabilities behind the `Platform` trait, plus the console and
// mock implementations.

pub mod actions;
#[cfg(unix)]
pub mod console_platform;
pub mod mock;
pub mod platform_trait;

pub use actions::PlatformAction;
#[cfg(unix)]
pub use console_platform::ConsolePlatform;
pub use mock::MockPlatform;
pub use platform_trait::Platform;
