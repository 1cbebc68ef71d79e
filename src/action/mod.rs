//! One handler per user-facing verb.
//!
//! Handlers never read process-wide state: the Lima directory, settings
//! and template all arrive through `ActionContext`, and every child
//! process goes through a `Runner`.

pub mod down;
pub mod environment;
pub mod status;
pub mod up;

use std::path::Path;

use crate::config::Settings;

/// Startup state shared by the handlers of a single invocation.
pub struct ActionContext<'a> {
    pub lima_dir: &'a Path,
    pub settings: &'a Settings,
    pub template: &'a [u8],
}
