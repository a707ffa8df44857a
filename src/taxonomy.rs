//! POI taxonomy helpers.
//!
//! Wraps the repository port for the write patterns the overlay needs:
//! the idempotent bootstrap that makes sure every configured sensor class
//! exists as a type group with its alert/normal types, the custom-data
//! update (fetch, rewrite, save), and the bulk flush used before the
//! nearby set is abandoned.

use log::{info, warn};

use crate::app::ports::{PoiRepository, ViewPort};
use crate::config::SensorTypeTable;
use crate::error::Result;
use crate::poi::{Poi, PoiId};

/// Ensure every configured sensor group and its state types exist on the
/// host. Groups that already exist are left alone, so running this on
/// every startup is safe.
pub fn ensure_taxonomy(repo: &mut impl PoiRepository, table: &SensorTypeTable) -> Result<()> {
    let existing = repo.find_all_type_groups()?;

    for (group, sensor) in table.iter() {
        if existing.iter().any(|g| g == group) {
            info!("POI group '{group}' already exists, moving on");
            continue;
        }

        repo.create_type_group(group)?;
        let titles: Vec<&str> = sensor.types.iter().map(|t| t.title.as_str()).collect();
        repo.create_types(group, &titles)?;
        info!("POI group '{group}' created with {} type(s)", titles.len());
    }
    Ok(())
}

/// Replace the custom-data blob of one POI and persist it.
pub fn update_custom_data(repo: &mut impl PoiRepository, id: PoiId, blob: &str) -> Result<Poi> {
    let mut poi = repo.find_one(id)?;
    poi.custom_data = blob.to_string();
    Ok(repo.save(&poi)?)
}

/// Persist a batch of POIs and ask the host to re-render them.
///
/// The `host` parameter satisfies **both** [`PoiRepository`] and
/// [`ViewPort`] — this avoids a double mutable borrow while keeping the
/// port boundary explicit.
pub fn save_all(host: &mut (impl PoiRepository + ViewPort), pois: &[Poi]) -> Result<Vec<Poi>> {
    if pois.is_empty() {
        return Ok(Vec::new());
    }
    match host.save_many(pois) {
        Ok(saved) => {
            host.refresh_pois();
            Ok(saved)
        }
        Err(e) => {
            warn!("bulk save of {} POI(s) failed: {e}", pois.len());
            Err(e.into())
        }
    }
}
