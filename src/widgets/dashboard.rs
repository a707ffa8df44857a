//! Sidebar alert dashboard view-model.
//!
//! Lists every tracked POI whose last reading crossed its threshold, and
//! carries the wide-mode toggle: when the user flips it, the engine adopts
//! the requested scope on the next refresh tick and re-derives the nearby
//! set site-wide (or back to the camera radius).

use crate::poi::{Poi, PoiId};

/// Menu title shown in the host sidebar.
pub const DASHBOARD_TITLE: &str = "Sensor Alert Dashboard";

/// One dashboard row; clicking it opens the POI.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardItem {
    pub poi_id: PoiId,
    pub title: String,
}

/// The sidebar dashboard.
#[derive(Debug, Default)]
pub struct DashboardModel {
    items: Vec<DashboardItem>,
    wide_mode_requested: bool,
}

impl DashboardModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the alert list wholesale.
    pub fn refresh_items<'a>(&mut self, pois: impl Iterator<Item = &'a Poi>) {
        self.items = pois
            .map(|poi| DashboardItem {
                poi_id: poi.id,
                title: poi.title.clone(),
            })
            .collect();
    }

    pub fn items(&self) -> &[DashboardItem] {
        &self.items
    }

    /// UI-side wide-mode toggle. The engine reconciles this against its own
    /// scope on the refresh tick.
    pub fn request_wide_mode(&mut self, wide: bool) {
        self.wide_mode_requested = wide;
    }

    pub fn wide_mode_requested(&self) -> bool {
        self.wide_mode_requested
    }
}
