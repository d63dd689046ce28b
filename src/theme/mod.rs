//! Theme and Colors
//!
//! Parchment-and-ink palette for the timeline. Accent tones mark years and
//! interactive hints; stone grays carry secondary text.

use ratatui::style::Color;

// ============================================================================
// Parchment Palette
// ============================================================================

/// Primary text
pub const INK: Color = Color::Rgb(235, 228, 215);

/// Accent - warm bronze, used for years, nodes, and hints
pub const ACCENT: Color = Color::Rgb(201, 151, 96);

/// Secondary text - stone gray
pub const STONE: Color = Color::Rgb(150, 145, 135);

/// Dim chrome (separators, status line)
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// School-of-thought tag
pub const SCHOOL_TAG: Color = Color::Rgb(170, 170, 190);

// ============================================================================
// State Colors
// ============================================================================

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 100, 100);

/// Loading spinner / progress
pub const SPINNER: Color = Color::Rgb(201, 151, 96);

/// Timeline center line
pub const TIMELINE_LINE: Color = Color::Rgb(120, 115, 105);
