use bevy::prelude::*;

use crate::config::{SENSOR_COUNT, SENSOR_SPACING, WAVE_LENGTH, WAVE_SEGMENTS};

use super::sampling::WaveFieldGenerator;
use super::types::SeismicParameters;

/// Mesh-line vertex positions: `(i / segments) * length - length / 2` for
/// `i` in `0..=segments`.
pub fn mesh_positions(segments: usize, length: f32) -> Vec<f32> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| (i as f32 / segments as f32) * length - length / 2.0)
        .collect()
}

/// Sensor positions centred on the origin: `(i - (count - 1) / 2) * spacing`.
pub fn sensor_positions(count: usize, spacing: f32) -> Vec<f32> {
    let centre = (count.saturating_sub(1)) as f32 / 2.0;
    (0..count).map(|i| (i as f32 - centre) * spacing).collect()
}

/// Latest displacement profile read by the presentation layer each frame.
///
/// Buffers are allocated once and refilled in place.
#[derive(Resource, Debug, Clone)]
pub struct WaveSurface {
    pub positions: Vec<f32>,
    pub displacements: Vec<f32>,
    pub sensor_positions: Vec<f32>,
    pub sensor_readings: Vec<f32>,
}

impl Default for WaveSurface {
    fn default() -> Self {
        Self::new(WAVE_SEGMENTS, WAVE_LENGTH, SENSOR_COUNT, SENSOR_SPACING)
    }
}

impl WaveSurface {
    pub fn new(segments: usize, length: f32, sensors: usize, spacing: f32) -> Self {
        let positions = mesh_positions(segments, length);
        let sensor_positions = sensor_positions(sensors, spacing);
        Self {
            displacements: vec![0.0; positions.len()],
            sensor_readings: vec![0.0; sensor_positions.len()],
            positions,
            sensor_positions,
        }
    }

    pub fn refill(&mut self, generator: &WaveFieldGenerator, params: &SeismicParameters) {
        generator.fill(&self.positions, params, &mut self.displacements);
        generator.fill(&self.sensor_positions, params, &mut self.sensor_readings);
    }

    /// Largest absolute displacement on the mesh line.
    pub fn peak(&self) -> f32 {
        self.displacements
            .iter()
            .fold(0.0_f32, |acc, d| acc.max(d.abs()))
    }

    pub fn is_flat(&self) -> bool {
        self.displacements.iter().all(|d| *d == 0.0)
    }
}
