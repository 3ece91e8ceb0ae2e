use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    ACCELERATION_SCALE, BRIDGE_DELTA, BRIDGE_DISTANCE, DEFAULT_MASS, DEFAULT_VACUUM_INDEX,
    ENTROPY_DRAW_HIGH, ENTROPY_DRAW_LOW, FLARE_PROBABILITY, PLANCK_TIME, REFERENCE_EVENT_DELTA,
    REFERENCE_EVENT_DISTANCE, SLOWING_SCALE,
};
use crate::entropy::EntropySource;
use crate::error::{CoreError, Result};

/// Mass and vacuum parameters of the simulated environment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub mass: f64,
    pub vacuum_index: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            mass: DEFAULT_MASS,
            vacuum_index: DEFAULT_VACUUM_INDEX,
        }
    }
}

impl EnvironmentConfig {
    pub fn new(mass: f64, vacuum_index: f64) -> Result<Self> {
        let cfg = Self { mass, vacuum_index };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "mass must be finite and positive, got {}",
                self.mass
            )));
        }
        if !self.vacuum_index.is_finite() {
            return Err(CoreError::InvalidConfig(format!(
                "vacuum_index must be finite, got {}",
                self.vacuum_index
            )));
        }
        Ok(())
    }

    /// Time multiplier for this environment.
    ///
    /// Negative vacuum accelerates (`> 1`), non-negative vacuum slows (`< 1`).
    /// Not clamped.
    pub fn dilation_factor(&self) -> f64 {
        let load = self.mass * (1.0 + self.vacuum_index.abs());
        if self.vacuum_index < 0.0 {
            1.0 + load / ACCELERATION_SCALE
        } else {
            1.0 - load / SLOWING_SCALE
        }
    }
}

/// Mutable accumulators owned by the clock. Only `tick()` advances them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EnvironmentState {
    pub entropy_accumulator: f64,
    /// Experienced time in units of `PLANCK_TIME`.
    pub tick_count: f64,
    pub solar_flare_active: bool,
    pub ticks: u64,
}

/// Light-cone region of an event relative to the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LightConeRegion {
    Elsewhere,
    CausalLink,
}

impl LightConeRegion {
    pub fn as_str(&self) -> &'static str {
        match self {
            LightConeRegion::Elsewhere => "ELSEWHERE",
            LightConeRegion::CausalLink => "CAUSAL_LINK",
        }
    }
}

impl std::fmt::Display for LightConeRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct CausalityCheck {
    pub region: LightConeRegion,
    pub visible: bool,
    pub lag: f64,
}

/// Event raised by a clock tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Interrupt {
    SolarFlare,
    PacketReceived,
    PacketPending { lag: f64 },
}

impl std::fmt::Display for Interrupt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interrupt::SolarFlare => write!(f, "SOLAR_CME_DETECTED: resonance shift"),
            Interrupt::PacketReceived => write!(f, "SUPERNOVA_PACKET_RECEIVED"),
            Interrupt::PacketPending { lag } => write!(f, "SUPERNOVA_PENDING: packet lag {lag}"),
        }
    }
}

/// Result of a single clock tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TickReport {
    pub duration: f64,
    pub experienced_time: f64,
    pub dilation_factor: f64,
    pub interrupts: Vec<Interrupt>,
}

/// Light-cone gate: visible iff the signal has had time to arrive.
pub fn check_causality(distance: f64, time_delta: f64) -> CausalityCheck {
    if distance > time_delta {
        CausalityCheck {
            region: LightConeRegion::Elsewhere,
            visible: false,
            lag: distance - time_delta,
        }
    } else {
        CausalityCheck {
            region: LightConeRegion::CausalLink,
            visible: true,
            lag: 0.0,
        }
    }
}

/// Shortcut through the light cone: effectively zero distance, always visible.
pub fn bridged_causality() -> CausalityCheck {
    check_causality(BRIDGE_DISTANCE, BRIDGE_DELTA)
}

/// Simulated environment clock.
pub struct EnvironmentClock<S = SmallRng> {
    config: EnvironmentConfig,
    state: EnvironmentState,
    source: S,
}

impl EnvironmentClock<SmallRng> {
    /// Clock with a reproducible `SmallRng`.
    pub fn seeded(config: EnvironmentConfig, seed: u64) -> Self {
        Self::with_source(config, SmallRng::seed_from_u64(seed))
    }
}

impl<S: EntropySource> EnvironmentClock<S> {
    pub fn with_source(config: EnvironmentConfig, source: S) -> Self {
        Self {
            config,
            state: EnvironmentState::default(),
            source,
        }
    }

    pub fn config(&self) -> &EnvironmentConfig {
        &self.config
    }

    pub fn state(&self) -> &EnvironmentState {
        &self.state
    }

    pub fn dilation_factor(&self) -> f64 {
        self.config.dilation_factor()
    }

    /// Advance the clock by `duration` units.
    ///
    /// Draw order per tick: entropy increment, then the flare trial.
    pub fn tick(&mut self, duration: f64) -> TickReport {
        let dilation_factor = self.dilation_factor();
        let experienced_time = duration * dilation_factor;

        self.state.entropy_accumulator +=
            self.source.uniform(ENTROPY_DRAW_LOW, ENTROPY_DRAW_HIGH) * self.config.mass;
        self.state.tick_count += experienced_time / PLANCK_TIME;
        self.state.ticks += 1;

        let interrupts = self.poll_interrupts();

        TickReport {
            duration,
            experienced_time,
            dilation_factor,
            interrupts,
        }
    }

    fn poll_interrupts(&mut self) -> Vec<Interrupt> {
        let mut interrupts = Vec::with_capacity(2);

        if self.source.chance(FLARE_PROBABILITY) {
            self.state.solar_flare_active = true;
            tracing::info!(tick = self.state.ticks, "solar flare interrupt");
            interrupts.push(Interrupt::SolarFlare);
        }

        let reference = check_causality(REFERENCE_EVENT_DISTANCE, REFERENCE_EVENT_DELTA);
        if reference.visible {
            interrupts.push(Interrupt::PacketReceived);
        } else {
            interrupts.push(Interrupt::PacketPending { lag: reference.lag });
        }

        interrupts
    }
}
