//! Trend chart view-model.
//!
//! Computes the data a line chart needs — ordered points, the time domain,
//! the configured value domain, and the threshold line — from the history
//! buffer. Rendering is the host's concern.

use chrono::{DateTime, Utc};

use crate::sensor::SensorSample;

use super::DialogModule;

/// Everything a renderer needs to draw the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartView {
    /// Samples, oldest first.
    pub points: Vec<SensorSample>,
    /// Extent of the time axis; `None` when there are no points.
    pub x_domain: Option<(DateTime<Utc>, DateTime<Utc>)>,
    /// Fixed value axis from the sensor class, `[min, max]`.
    pub y_domain: [f64; 2],
    /// Horizontal threshold line.
    pub threshold: f64,
}

/// The chart module of the POI dialog.
#[derive(Debug, Default)]
pub struct ChartModel {
    view: Option<ChartView>,
}

impl ChartModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the chart from the given samples. An existing chart is
    /// replaced wholesale.
    pub fn draw<'a>(
        &mut self,
        samples: impl Iterator<Item = &'a SensorSample>,
        threshold: f64,
        y_domain: [f64; 2],
    ) {
        let points: Vec<SensorSample> = samples.copied().collect();
        let x_domain = match (points.first(), points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        };
        self.view = Some(ChartView {
            points,
            x_domain,
            y_domain,
            threshold,
        });
    }

    pub fn view(&self) -> Option<&ChartView> {
        self.view.as_ref()
    }
}

impl DialogModule for ChartModel {
    fn detach(&mut self) {
        self.view = None;
    }

    fn is_attached(&self) -> bool {
        self.view.is_some()
    }
}
