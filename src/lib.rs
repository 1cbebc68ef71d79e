#![allow(unused_assignments)] // thiserror/miette proc macros trigger false positives

pub mod action;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod paths;
pub mod runner;
pub mod template;
