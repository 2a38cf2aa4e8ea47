//! UI preferences shared by the engine and the renderer.
//!
//! Pure data types with no IO, no ratatui dependency.

/// UI configuration options derived from config/environment/flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiOptions {
    pub ascii_only: bool,
    pub high_contrast: bool,
    /// Keep the cursor solid instead of blinking.
    pub reduced_motion: bool,
}
