/// Planck time in seconds. Used only as the accumulation scale for tick counts.
pub const PLANCK_TIME: f64 = 5.39e-44;

/// Numerical epsilon for near-zero comparisons
pub const EPSILON: f64 = 1e-10;

/// Tolerance for Hermitian and unit-trace checks on state matrices
pub const STATE_TOLERANCE: f64 = 1e-9;

/// Default observer mass
pub const DEFAULT_MASS: f64 = 70.0;

/// Default vacuum index (negative = acceleration branch)
pub const DEFAULT_VACUUM_INDEX: f64 = -1.0;

/// Divisor for the acceleration branch of the dilation factor (vacuum < 0)
pub const ACCELERATION_SCALE: f64 = 1000.0;

/// Divisor for the slowing branch of the dilation factor (vacuum >= 0)
pub const SLOWING_SCALE: f64 = 100_000.0;

/// Per-tick entropy draw range, multiplied by mass
pub const ENTROPY_DRAW_LOW: f64 = 0.001;
pub const ENTROPY_DRAW_HIGH: f64 = 0.005;

/// Probability of a solar flare interrupt on a single tick
pub const FLARE_PROBABILITY: f64 = 0.05;

/// Fixed reference event checked against the light cone on every tick
pub const REFERENCE_EVENT_DISTANCE: f64 = 640.0;
pub const REFERENCE_EVENT_DELTA: f64 = 640.0;

/// Bridge shortcut: effective distance and elapsed time through the tunnel
pub const BRIDGE_DISTANCE: f64 = 1e-7;
pub const BRIDGE_DELTA: f64 = 1.0;

/// Purity strictly above this marks a coherence lock
pub const LOCK_THRESHOLD: f64 = 0.88;

/// Peak purity strictly above this in the trailing window certifies the receipt
pub const RECEIPT_THRESHOLD: f64 = 0.90;

/// Number of trailing history records inspected by the receipt
pub const RECEIPT_WINDOW: usize = 5;

/// Noise level strictly above this triggers a correction pulse
pub const CORRECTION_TRIGGER: f64 = 0.10;

/// Purity below this selects the strong correction gain
pub const CORRECTION_SWITCH: f64 = 0.85;
pub const STRONG_CORRECTION_GAIN: f64 = 0.5;
pub const WEAK_CORRECTION_GAIN: f64 = 0.2;

/// Lexical variance gate: outside [floor, ceiling] the input is penalized
pub const VARIANCE_FLOOR: f64 = 0.35;
pub const VARIANCE_CEILING: f64 = 0.85;

pub const GATED_PENALTY: f64 = 0.5;
pub const PASSING_PENALTY: f64 = 0.02;

/// Codepoint sum modulus and scale for the entropy tilt
pub const TILT_MODULUS: u64 = 50;
pub const TILT_SCALE: f64 = 100.0;

/// Baseline noise added to every audit
pub const NOISE_FLOOR: f64 = 0.05;

/// Noise contributed by each interrupt in a tick
pub const INTERRUPT_PENALTY: f64 = 0.02;

/// Default ring-buffer capacity for session history
pub const DEFAULT_HISTORY_CAPACITY: usize = 1024;
