// Distances are playfield units, speeds are units per second.

// Timing
pub const STEP_SECONDS: f64 = 1.0 / 60.0;
pub const MAX_MATCH_MINUTES: u64 = 40;
/// 40 minutes of simulated time at 60 Hz.
pub const MAX_TICKS: u64 = MAX_MATCH_MINUTES * 60 * 60;

// Playfield
/// Spawn positions are drawn from [-SPAWN_SPAN / 2, SPAWN_SPAN / 2).
pub const SPAWN_SPAN: f64 = 80.0;
pub const PLAYFIELD_HALF_EXTENT: f64 = 49.0;
/// Entities are 2x2 boxes on the ground plane.
pub const ENTITY_HALF_SIZE: f64 = 1.0;

// Velocity scales
pub const PARTICIPANT_SPEED: f64 = 7.0;
pub const HOSTILE_SPEED: f64 = 7.0;
pub const RESOURCE_SPEED: f64 = 4.0;

// Population
pub const MIN_HOSTILES: usize = 4;
pub const MIN_RESOURCES: usize = 4;
pub const RESOURCE_RATIO: f64 = 0.8;

// Health / interaction rules
pub const INITIAL_HEALTH: i32 = 3;
pub const HOSTILE_DAMAGE: i32 = 2;
pub const RESOURCE_HEAL: i32 = 1;
pub const BUMP_DAMAGE: i32 = 1;

// Event log
/// Decimal places kept for logged positions and velocities.
pub const LOG_PRECISION: i32 = 3;

// Seed tags
pub const PARTICIPANT_TAG: &str = "user";
pub const HOSTILE_TAG: &str = "foe";
pub const RESOURCE_TAG: &str = "food";

// Session
pub const START_DEBOUNCE_SECONDS: f64 = 0.5;
