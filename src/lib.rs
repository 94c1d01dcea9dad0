//! Monitor for running Claude CLI sessions: finds them in the process table,
//! attributes subtree CPU and memory to each, and can kill, pause or resume a
//! session together with everything it spawned.

pub mod action;
pub mod app;
pub mod config;
pub mod event;
pub mod format;
pub mod logging;
pub mod system;
pub mod ui;
