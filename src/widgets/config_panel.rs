//! POI configuration panel view-model.
//!
//! Describes the input controls of the dialog's configuration module: a
//! threshold slider bounded by the sensor class display range and a
//! sensor-id dropdown fed from the backend's id list. User edits come back
//! into the engine as `ThresholdEdited` / `SensorIdEdited` events.

use crate::config::SensorType;
use crate::custom_data::PoiCustomData;
use crate::sensor::SensorId;

use super::DialogModule;

/// One input control in the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    Slider {
        label: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    Dropdown {
        label: &'static str,
        options: Vec<SensorId>,
        value: SensorId,
    },
}

/// The configuration module of the POI dialog.
#[derive(Debug, Default)]
pub struct ConfigPanel {
    controls: Vec<Control>,
}

impl ConfigPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the panel for a sensor POI: threshold slider over the class
    /// range (defaulting to the class threshold when the POI carries none)
    /// and a sensor-id dropdown (0 = unassigned).
    pub fn build(&mut self, sensor: &SensorType, data: &PoiCustomData, sensor_ids: &[SensorId]) {
        self.controls = vec![
            Control::Slider {
                label: "Threshold",
                min: sensor.range[0],
                max: sensor.range[1],
                value: data.threshold_or(sensor.threshold),
            },
            Control::Dropdown {
                label: "Sensor ID",
                options: sensor_ids.to_vec(),
                value: data.sensor_id,
            },
        ];
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    /// The slider's current value, if the panel is built.
    pub fn threshold_value(&self) -> Option<f64> {
        self.controls.iter().find_map(|c| match c {
            Control::Slider { value, .. } => Some(*value),
            Control::Dropdown { .. } => None,
        })
    }

    /// The dropdown's current selection, if the panel is built.
    pub fn sensor_id_value(&self) -> Option<SensorId> {
        self.controls.iter().find_map(|c| match c {
            Control::Dropdown { value, .. } => Some(*value),
            Control::Slider { .. } => None,
        })
    }
}

impl DialogModule for ConfigPanel {
    fn detach(&mut self) {
        self.controls.clear();
    }

    fn is_attached(&self) -> bool {
        !self.controls.is_empty()
    }
}
