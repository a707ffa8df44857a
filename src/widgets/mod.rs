//! Presentation view-models driven by the core.
//!
//! Widgets compute *what* to show — chart domains and points, control
//! specs, the alert list — and leave pixels and layout to the host's
//! rendering layer. The chart and configuration panel live inside the POI
//! details dialog and share the attach/detach lifecycle of
//! [`DialogModule`]; the dashboard lives in the sidebar and is refreshed
//! wholesale on a timer.

pub mod chart;
pub mod config_panel;
pub mod dashboard;

/// A modular extension of the POI details dialog.
pub trait DialogModule {
    /// Remove the module from the dialog.
    fn detach(&mut self);

    /// Whether the module currently has content to show.
    fn is_attached(&self) -> bool;
}
