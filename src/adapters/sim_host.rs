//! In-memory host platform adapter.
//!
//! Implements [`PoiRepository`] and [`ViewPort`] over a plain in-memory
//! store, simulates the camera and the local→global transform, and exposes
//! the host lifecycle as [`HookRegistry`] channels. Driver methods
//! (`move_camera`, `open_poi`, …) mutate the store the way a user working
//! in the real viewer would, emitting the matching lifecycle hook.

use std::collections::{BTreeSet, HashMap};

use crate::app::ports::{HostError, PoiRepository, ViewPort};
use crate::hooks::HookRegistry;
use crate::poi::{Poi, PoiFilter, PoiId, PoiType, PoiTypeId, Point3};

/// Scriptable stand-in for the viewer platform.
pub struct SimHost {
    pois: HashMap<PoiId, Poi>,
    types: Vec<PoiType>,
    groups: Vec<String>,
    next_poi_id: PoiId,
    next_type_id: PoiTypeId,
    camera_local: Point3,
    /// Fixed local→global translation, standing in for the host's
    /// transform service.
    transform_offset: Point3,
    highlighted: BTreeSet<PoiId>,
    navigations: Vec<PoiId>,
    refreshes: u32,

    // ── Lifecycle hook channels ───────────────────────────────
    pub on_site_activated: HookRegistry<()>,
    pub on_transition_end: HookRegistry<()>,
    pub on_poi_open: HookRegistry<Poi>,
    pub on_poi_close: HookRegistry<Poi>,
    pub on_poi_save: HookRegistry<(Poi, bool)>,
    pub on_poi_delete: HookRegistry<Poi>,
}

impl SimHost {
    pub fn new() -> Self {
        Self::with_transform([0.0; 3])
    }

    /// A host whose global space is `offset` away from view space.
    pub fn with_transform(offset: Point3) -> Self {
        Self {
            pois: HashMap::new(),
            types: Vec::new(),
            groups: Vec::new(),
            next_poi_id: 0,
            next_type_id: 0,
            camera_local: [0.0; 3],
            transform_offset: offset,
            highlighted: BTreeSet::new(),
            navigations: Vec::new(),
            refreshes: 0,
            on_site_activated: HookRegistry::new(),
            on_transition_end: HookRegistry::new(),
            on_poi_open: HookRegistry::new(),
            on_poi_close: HookRegistry::new(),
            on_poi_save: HookRegistry::new(),
            on_poi_delete: HookRegistry::new(),
        }
    }

    // ── Scenario drivers ──────────────────────────────────────

    /// The site finished loading.
    pub fn activate_site(&mut self) {
        self.on_site_activated.emit(&());
    }

    /// Fly the camera to a new local position; the transition-end hook
    /// fires once the move completes.
    pub fn move_camera(&mut self, local: Point3) {
        self.camera_local = local;
        self.on_transition_end.emit(&());
    }

    /// Create a POI of an existing type at a global position.
    /// Returns `None` when no type carries `type_title`.
    pub fn add_poi(
        &mut self,
        title: &str,
        type_title: &str,
        custom_data: &str,
        position: Point3,
    ) -> Option<PoiId> {
        let poi_type = self.type_by_title(type_title)?;
        self.next_poi_id += 1;
        let id = self.next_poi_id;
        self.pois.insert(
            id,
            Poi {
                id,
                title: title.to_string(),
                poi_type,
                custom_data: custom_data.to_string(),
                position,
            },
        );
        Some(id)
    }

    /// A user opened the POI's details dialog.
    pub fn open_poi(&mut self, id: PoiId) {
        if let Some(poi) = self.pois.get(&id).cloned() {
            self.on_poi_open.emit(&poi);
        }
    }

    /// A user closed the POI's details dialog.
    pub fn close_poi(&mut self, id: PoiId) {
        if let Some(poi) = self.pois.get(&id).cloned() {
            self.on_poi_close.emit(&poi);
        }
    }

    /// A user hit save in the POI dialog.
    pub fn save_poi_dialog(&mut self, poi: Poi, created: bool) {
        self.pois.insert(poi.id, poi.clone());
        self.on_poi_save.emit(&(poi, created));
    }

    /// A user deleted the POI.
    pub fn delete_poi(&mut self, id: PoiId) {
        if let Some(poi) = self.pois.remove(&id) {
            self.on_poi_delete.emit(&poi);
        }
    }

    // ── Queries for assertions and seeding ────────────────────

    pub fn type_by_title(&self, title: &str) -> Option<PoiType> {
        self.types.iter().find(|t| t.title == title).cloned()
    }

    pub fn poi(&self, id: PoiId) -> Option<&Poi> {
        self.pois.get(&id)
    }

    pub fn highlighted(&self) -> Vec<PoiId> {
        self.highlighted.iter().copied().collect()
    }

    pub fn navigations(&self) -> &[PoiId] {
        &self.navigations
    }

    pub fn refresh_count(&self) -> u32 {
        self.refreshes
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Port implementations
// ───────────────────────────────────────────────────────────────

impl PoiRepository for SimHost {
    fn filter(&mut self, filter: &PoiFilter) -> Result<Vec<Poi>, HostError> {
        Ok(self
            .pois
            .values()
            .filter(|poi| filter.matches(poi.position))
            .cloned()
            .collect())
    }

    fn find_one(&mut self, id: PoiId) -> Result<Poi, HostError> {
        self.pois.get(&id).cloned().ok_or(HostError::NotFound)
    }

    fn save(&mut self, poi: &Poi) -> Result<Poi, HostError> {
        self.pois.insert(poi.id, poi.clone());
        Ok(poi.clone())
    }

    fn save_many(&mut self, pois: &[Poi]) -> Result<Vec<Poi>, HostError> {
        pois.iter().map(|poi| self.save(poi)).collect()
    }

    fn find_all_types(&mut self) -> Result<Vec<PoiType>, HostError> {
        Ok(self.types.clone())
    }

    fn find_all_type_groups(&mut self) -> Result<Vec<String>, HostError> {
        Ok(self.groups.clone())
    }

    fn create_type_group(&mut self, name: &str) -> Result<(), HostError> {
        if !self.groups.iter().any(|g| g == name) {
            self.groups.push(name.to_string());
        }
        Ok(())
    }

    fn create_types(&mut self, group: &str, titles: &[&str]) -> Result<(), HostError> {
        if !self.groups.iter().any(|g| g == group) {
            return Err(HostError::NotFound);
        }
        for title in titles {
            self.next_type_id += 1;
            self.types.push(PoiType {
                id: self.next_type_id,
                title: (*title).to_string(),
                group: group.to_string(),
            });
        }
        Ok(())
    }
}

impl ViewPort for SimHost {
    fn camera_position(&self) -> Point3 {
        self.camera_local
    }

    fn local_to_global(&self, point: Point3) -> Point3 {
        [
            point[0] + self.transform_offset[0],
            point[1] + self.transform_offset[1],
            point[2] + self.transform_offset[2],
        ]
    }

    fn highlight(&mut self, ids: &[PoiId]) {
        self.highlighted.extend(ids.iter().copied());
    }

    fn unhighlight(&mut self, ids: &[PoiId]) {
        for id in ids {
            self.highlighted.remove(id);
        }
    }

    fn navigate_to(&mut self, id: PoiId) -> Result<(), HostError> {
        if !self.pois.contains_key(&id) {
            return Err(HostError::NotFound);
        }
        self.navigations.push(id);
        Ok(())
    }

    fn refresh_pois(&mut self) {
        self.refreshes += 1;
    }
}
