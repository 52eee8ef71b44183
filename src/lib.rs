//! Sessioncraft - Wellness Session Authoring Service
//!
//! Authenticated authors write sessions (title, content, tags, optional
//! URL reference) with a draft/published lifecycle and background autosave.
//! Anonymous visitors can read published sessions only.

pub mod adapters;
pub mod application;
pub mod autosave;
pub mod config;
pub mod domain;
pub mod ports;
