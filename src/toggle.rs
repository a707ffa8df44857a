//! Alert-state toggling of POI types.
//!
//! On the host, a sensor class is a POI type *group* ("Temperature") and
//! each alert state is a POI *type* under it ("Temperature Alert",
//! "Temperature Normal"). Toggling a POI rewrites its type reference to
//! the pre-resolved host object for (group, state) and asks the view to
//! re-render.
//!
//! The index is built once from the host's full type list, matching the
//! configured titles per sensor class. Readiness is an explicit
//! precondition: toggling before `build` ran yields
//! [`ToggleError::NotReady`] rather than touching the POI.

use std::collections::HashMap;

use log::info;

use crate::app::ports::ViewPort;
use crate::config::{SensorState, SensorTypeTable};
use crate::error::ToggleError;
use crate::poi::{Poi, PoiType};

#[derive(Debug, Default)]
struct GroupStates {
    alert: Option<PoiType>,
    normal: Option<PoiType>,
}

/// Lookup from (POI group, alert state) to the host's concrete type object.
#[derive(Debug, Default)]
pub struct StateTypeIndex {
    groups: HashMap<String, GroupStates>,
    ready: bool,
}

impl StateTypeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve host type objects against the configured state titles.
    ///
    /// Types whose title matches a configured alert title become the ALERT
    /// entry of their group; normal titles likewise. Unrelated types are
    /// ignored.
    pub fn build(&mut self, poi_types: &[PoiType], table: &SensorTypeTable) {
        self.groups.clear();

        for poi_type in poi_types {
            let Some(sensor) = table.get(&poi_type.group) else {
                continue;
            };
            let entry = self.groups.entry(poi_type.group.clone()).or_default();
            if sensor.title_for(SensorState::Alert) == Some(poi_type.title.as_str()) {
                entry.alert = Some(poi_type.clone());
            } else if sensor.title_for(SensorState::Normal) == Some(poi_type.title.as_str()) {
                entry.normal = Some(poi_type.clone());
            }
        }

        self.ready = true;
        info!(
            "state-type index built: {} group(s) resolved",
            self.groups.len()
        );
    }

    /// Whether `build` has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Rewrite `poi`'s type to the `state` variant of its group and request
    /// a host re-render. The POI is untouched on error.
    pub fn toggle(
        &self,
        poi: &mut Poi,
        state: SensorState,
        view: &mut impl ViewPort,
    ) -> Result<(), ToggleError> {
        if !self.ready {
            return Err(ToggleError::NotReady);
        }
        let target = self
            .groups
            .get(poi.group())
            .and_then(|g| match state {
                SensorState::Alert => g.alert.as_ref(),
                SensorState::Normal => g.normal.as_ref(),
            })
            .ok_or(ToggleError::UnknownGroup)?;

        if poi.poi_type != *target {
            poi.poi_type = target.clone();
            view.refresh_pois();
        }
        Ok(())
    }
}
