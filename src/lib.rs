//! Jurisprudence Timeline - terminal history of legal philosophy
//!
//! A full-screen terminal app that asks a generative provider for a
//! chronological set of legal-philosophy figures and renders them as an
//! interactive vertical timeline with a per-figure detail overlay.
//!
//! # Architecture
//!
//! - **provider**: schema-validated acquisition behind an injectable trait
//! - **state**: the idle/loading/success/error machine plus selection
//! - **fetch**: one spawned task per attempt, settled over a channel
//! - **ui**: pure projections from state to the frame
//! - **export**: Markdown print/export of a successful view

pub mod app;
pub mod export;
pub mod fetch;
pub mod model;
pub mod provider;
pub mod state;
pub mod theme;
pub mod ui;

pub use app::App;
