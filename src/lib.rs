//! Keyboard-driven quick menu over an admin navigation snapshot, rendered in
//! the terminal.
//!
//! The engines (`normalize`, `classify`, `filter`, `nav`) are pure and
//! infallible; `menu::QuickMenu` ties them to per-session state and
//! `runner::HelmApp` hosts it on a ratatui surface.

pub mod classify;
pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod event_loop;
pub mod filter;
pub mod keybindings;
pub mod links;
pub mod menu;
pub mod model;
pub mod nav;
pub mod navigator;
pub mod normalize;
pub mod presentation;
pub mod runner;
pub mod snapshot;
pub mod source;
pub mod state;
pub mod theme;
pub mod tracing_sub;
pub mod tree;
pub mod ui;
pub mod view_state;
