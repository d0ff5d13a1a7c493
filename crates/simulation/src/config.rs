/// Number of structures on the skyline. Fixed for the lifetime of a round.
pub const ROSTER_SIZE: usize = 8;
/// Inclusive storey range for randomly generated structures.
pub const MIN_STRUCTURE_HEIGHT: u32 = 3;
pub const MAX_STRUCTURE_HEIGHT: u32 = 10;
/// Integrity of an undamaged structure. Integrity is always clamped to [0, MAX_INTEGRITY].
pub const MAX_INTEGRITY: f32 = 100.0;

/// Length of one `FixedUpdate` tick in seconds (10 Hz).
pub const SECONDS_PER_TICK: f32 = 0.1;
pub const FIXED_TICK_HZ: f64 = 10.0;

/// Mesh line sampled each frame: WAVE_SEGMENTS + 1 vertices spread over WAVE_LENGTH,
/// centred on the origin.
pub const WAVE_SEGMENTS: usize = 50;
pub const WAVE_LENGTH: f32 = 20.0;

/// Seismograph sensors placed along the same axis, centred on the origin.
pub const SENSOR_COUNT: usize = 5;
pub const SENSOR_SPACING: f32 = 4.0;
