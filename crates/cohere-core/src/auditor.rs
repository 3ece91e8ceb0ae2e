use std::collections::HashSet;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{EnvironmentClock, EnvironmentConfig, EnvironmentState};
use crate::constants::{
    CORRECTION_TRIGGER, DEFAULT_HISTORY_CAPACITY, GATED_PENALTY, INTERRUPT_PENALTY,
    LOCK_THRESHOLD, NOISE_FLOOR, PASSING_PENALTY, RECEIPT_THRESHOLD, RECEIPT_WINDOW,
    TILT_MODULUS, TILT_SCALE, VARIANCE_CEILING, VARIANCE_FLOOR,
};
use crate::entropy::EntropySource;
use crate::error::{CoreError, Result};
use crate::history::{History, HistoryRecord};
use crate::tracker::CoherenceTracker;

/// Session configuration.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditorConfig {
    #[serde(flatten)]
    pub environment: EnvironmentConfig,
    /// Ring-buffer bound on retained history records.
    pub history_capacity: usize,
}

impl Default for AuditorConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentConfig::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl AuditorConfig {
    pub fn validate(&self) -> Result<()> {
        self.environment.validate()?;
        if self.history_capacity == 0 {
            return Err(CoreError::InvalidConfig(
                "history_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lexical measurements of one intent string.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LexicalProfile {
    /// distinct chars / total chars, 0 for empty input
    pub char_variance: f64,
    pub spirit_penalty: f64,
    pub entropy_tilt: f64,
}

impl LexicalProfile {
    /// True when the variance falls outside the accepted band.
    pub fn gated(&self) -> bool {
        self.spirit_penalty == GATED_PENALTY
    }
}

/// Measure an intent string. Operates on Unicode scalar values.
pub fn lexical_profile(text: &str) -> LexicalProfile {
    let mut distinct = HashSet::new();
    let mut total = 0usize;
    let mut codepoint_sum = 0u64;
    for c in text.chars() {
        distinct.insert(c);
        total += 1;
        codepoint_sum += u64::from(c as u32);
    }

    let char_variance = if total > 0 {
        distinct.len() as f64 / total as f64
    } else {
        0.0
    };

    let spirit_penalty = if !(VARIANCE_FLOOR..=VARIANCE_CEILING).contains(&char_variance) {
        GATED_PENALTY
    } else {
        PASSING_PENALTY
    };

    let entropy_tilt = (codepoint_sum % TILT_MODULUS) as f64 / TILT_SCALE + spirit_penalty;

    LexicalProfile {
        char_variance,
        spirit_penalty,
        entropy_tilt,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CausalStatus {
    Synchronized,
    Decohered,
}

impl CausalStatus {
    pub fn from_purity(purity: f64) -> Self {
        if purity > LOCK_THRESHOLD {
            CausalStatus::Synchronized
        } else {
            CausalStatus::Decohered
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CausalStatus::Synchronized => "SYNCHRONIZED",
            CausalStatus::Decohered => "DECOHERED",
        }
    }
}

impl fmt::Display for CausalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct IntentOutcome {
    pub purity_score: f64,
    pub causal_status: CausalStatus,
}

/// Verdict over the trailing history window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Receipt {
    NoData,
    MetricFold,
    InsufficientCoherence,
}

impl Receipt {
    pub fn as_str(&self) -> &'static str {
        match self {
            Receipt::NoData => "NO_DATA",
            Receipt::MetricFold => "RECEIPT: Metric Fold Successful. Information Tunnel Open.",
            Receipt::InsufficientCoherence => {
                "RECEIPT: Insufficient Coherence. Signal limited to Light Cone."
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Receipt::MetricFold)
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One monitoring session: clock, tracker and history.
///
/// `process_intent` takes `&mut self`, so calls on one session are
/// sequential by construction. Sessions share nothing with each other.
pub struct AuditorSession<S = SmallRng> {
    id: Uuid,
    config: AuditorConfig,
    clock: EnvironmentClock<S>,
    tracker: CoherenceTracker,
    history: History,
}

impl AuditorSession<SmallRng> {
    /// Session seeded from the OS entropy pool.
    pub fn new(config: AuditorConfig) -> Result<Self> {
        Self::with_source(config, SmallRng::from_os_rng())
    }

    /// Reproducible session.
    pub fn seeded(config: AuditorConfig, seed: u64) -> Result<Self> {
        Self::with_source(config, SmallRng::seed_from_u64(seed))
    }
}

impl<S: EntropySource> AuditorSession<S> {
    pub fn with_source(config: AuditorConfig, source: S) -> Result<Self> {
        config.validate()?;
        let id = Uuid::new_v4();
        tracing::debug!(
            session = %id,
            mass = config.environment.mass,
            vacuum_index = config.environment.vacuum_index,
            capacity = config.history_capacity,
            "auditor session created"
        );
        Ok(Self {
            id,
            config,
            clock: EnvironmentClock::with_source(config.environment, source),
            tracker: CoherenceTracker::ground(),
            history: History::with_capacity(config.history_capacity),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &AuditorConfig {
        &self.config
    }

    pub fn clock(&self) -> &EnvironmentClock<S> {
        &self.clock
    }

    pub fn tracker(&self) -> &CoherenceTracker {
        &self.tracker
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// One clock tick: `(dilation, interference_penalty)`.
    pub fn audit_environment(&mut self) -> (f64, f64) {
        let report = self.clock.tick(1.0);
        let penalty = report.interrupts.len() as f64 * INTERRUPT_PENALTY;
        (report.dilation_factor, penalty)
    }

    /// Feed one intent through the environment and tracker. Total over all input.
    pub fn process_intent(&mut self, text: &str) -> IntentOutcome {
        let profile = lexical_profile(text);
        let (dilation, interference_penalty) = self.audit_environment();
        let noise = NOISE_FLOOR + interference_penalty + profile.entropy_tilt;

        self.tracker.mix_noise(noise);
        let corrected = noise > CORRECTION_TRIGGER;
        if corrected {
            self.tracker.correct();
        }

        let purity = self.tracker.purity();
        let record = HistoryRecord::new(purity, dilation);
        self.history.push(record);

        let causal_status = CausalStatus::from_purity(purity);
        tracing::debug!(
            session = %self.id,
            variance = profile.char_variance,
            gated = profile.gated(),
            noise,
            corrected,
            purity,
            status = %causal_status,
            "intent audited"
        );
        if record.locked() {
            tracing::info!(session = %self.id, purity, "coherence lock");
        }

        IntentOutcome {
            purity_score: purity,
            causal_status,
        }
    }

    /// Peak purity of the last `RECEIPT_WINDOW` records against `RECEIPT_THRESHOLD`.
    pub fn generate_receipt(&self) -> Receipt {
        match self.history.peak_purity(RECEIPT_WINDOW) {
            None => Receipt::NoData,
            Some(peak) if peak > RECEIPT_THRESHOLD => Receipt::MetricFold,
            Some(_) => Receipt::InsufficientCoherence,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            config: self.config,
            environment: self.clock.state().clone(),
            purity: self.tracker.purity(),
            total_recorded: self.history.total_recorded(),
            records: self.history.iter().copied().collect(),
            receipt: self.generate_receipt(),
        }
    }
}

/// Serializable view of a session for reporting tools.
#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub config: AuditorConfig,
    pub environment: EnvironmentState,
    pub purity: f64,
    pub total_recorded: u64,
    pub records: Vec<HistoryRecord>,
    pub receipt: Receipt,
}

/// Pretty-printed JSON snapshot of a session.
pub fn export_json<S: EntropySource>(session: &AuditorSession<S>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&session.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Never fires a flare; uniform draws return `low`.
    struct Calm;

    impl EntropySource for Calm {
        fn uniform(&mut self, low: f64, _high: f64) -> f64 {
            low
        }

        fn chance(&mut self, _probability: f64) -> bool {
            false
        }
    }

    /// Fires a flare on every tick.
    struct Stormy;

    impl EntropySource for Stormy {
        fn uniform(&mut self, low: f64, _high: f64) -> f64 {
            low
        }

        fn chance(&mut self, _probability: f64) -> bool {
            true
        }
    }

    const PURE_INTENT: &str = "Synchronizing Universal Frequency";
    const JUMBLED_INTENT: &str = "jumbled_data_without_spirit_or_direction_12345";

    fn calm() -> AuditorSession<Calm> {
        AuditorSession::with_source(AuditorConfig::default(), Calm).unwrap()
    }

    fn stormy() -> AuditorSession<Stormy> {
        AuditorSession::with_source(AuditorConfig::default(), Stormy).unwrap()
    }

    #[test]
    fn test_lexical_profile_empty() {
        let p = lexical_profile("");
        assert_eq!(p.char_variance, 0.0);
        assert!(p.gated());
        assert_abs_diff_eq!(p.entropy_tilt, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_lexical_profile_pure_intent() {
        let p = lexical_profile(PURE_INTENT);
        // 20 distinct of 33, codepoint sum ≡ 10 (mod 50)
        assert_abs_diff_eq!(p.char_variance, 20.0 / 33.0, epsilon = 1e-12);
        assert!(!p.gated());
        assert_abs_diff_eq!(p.entropy_tilt, 0.12, epsilon = 1e-12);
    }

    #[test]
    fn test_lexical_profile_jumbled_sits_inside_gate() {
        let p = lexical_profile(JUMBLED_INTENT);
        // 24 distinct of 46
        assert_abs_diff_eq!(p.char_variance, 24.0 / 46.0, epsilon = 1e-12);
        assert!(!p.gated());
        assert_abs_diff_eq!(p.entropy_tilt, 0.17, epsilon = 1e-12);
    }

    #[test]
    fn test_lexical_profile_repetitive_is_gated() {
        let p = lexical_profile("zzzzzzzzzz");
        assert_abs_diff_eq!(p.char_variance, 0.1, epsilon = 1e-12);
        assert!(p.gated());
    }

    #[test]
    fn test_lexical_profile_all_distinct_is_gated() {
        let p = lexical_profile("abc");
        assert_eq!(p.char_variance, 1.0);
        assert_eq!(p.spirit_penalty, GATED_PENALTY);
    }

    #[test]
    fn test_lexical_profile_counts_chars_not_bytes() {
        // four chars, two distinct, multi-byte in UTF-8
        let p = lexical_profile("éééü");
        assert_abs_diff_eq!(p.char_variance, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_fresh_session_has_no_data() {
        assert_eq!(calm().generate_receipt(), Receipt::NoData);
        assert_eq!(calm().generate_receipt().as_str(), "NO_DATA");
    }

    #[test]
    fn test_audit_environment_penalty() {
        let (dilation, penalty) = calm().audit_environment();
        assert_abs_diff_eq!(dilation, 1.14, epsilon = 1e-12);
        assert_abs_diff_eq!(penalty, 0.02, epsilon = 1e-12);

        let (_, penalty) = stormy().audit_environment();
        assert_abs_diff_eq!(penalty, 0.04, epsilon = 1e-12);
    }

    #[test]
    fn test_pure_intent_first_call_calm() {
        // noise 0.19 → diag 0.905, purity 0.82805 → strong gain → diag 0.9525
        let out = calm().process_intent(PURE_INTENT);
        assert_abs_diff_eq!(out.purity_score, 0.909_512_5, epsilon = 1e-9);
        assert_eq!(out.causal_status, CausalStatus::Synchronized);
    }

    #[test]
    fn test_pure_intent_first_call_stormy() {
        let out = stormy().process_intent(PURE_INTENT);
        assert_abs_diff_eq!(out.purity_score, 0.900_512_5, epsilon = 1e-9);
        assert_eq!(out.causal_status, CausalStatus::Synchronized);
    }

    #[test]
    fn test_pure_intent_sequence_certifies() {
        let mut session = calm();
        for _ in 0..5 {
            session.process_intent(PURE_INTENT);
        }
        let receipt = session.generate_receipt();
        assert!(receipt.is_success());
        assert!(receipt.to_string().contains("Metric Fold Successful"));
    }

    #[test]
    fn test_jumbled_intent_calm_stays_locked() {
        let out = calm().process_intent(JUMBLED_INTENT);
        assert_abs_diff_eq!(out.purity_score, 0.8872, epsilon = 1e-9);
        assert_eq!(out.causal_status, CausalStatus::Synchronized);
    }

    #[test]
    fn test_jumbled_intent_with_flare_decoheres() {
        let out = stormy().process_intent(JUMBLED_INTENT);
        assert_abs_diff_eq!(out.purity_score, 0.878_45, epsilon = 1e-9);
        assert_eq!(out.causal_status, CausalStatus::Decohered);
    }

    #[test]
    fn test_gated_input_decoheres() {
        let out = calm().process_intent("zzzzzzzzzz");
        assert_abs_diff_eq!(out.purity_score, 0.689_112_5, epsilon = 1e-9);
        assert_eq!(out.causal_status, CausalStatus::Decohered);
    }

    #[test]
    fn test_empty_input_is_accepted() {
        let mut session = calm();
        let out = session.process_intent("");
        assert!((0.0..=1.0).contains(&out.purity_score));
        assert_eq!(out.causal_status, CausalStatus::Decohered);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_status_threshold_is_exclusive() {
        assert_eq!(CausalStatus::from_purity(0.88), CausalStatus::Decohered);
        assert_eq!(CausalStatus::from_purity(0.8800001), CausalStatus::Synchronized);
    }

    #[test]
    fn test_receipt_uses_peak_not_average() {
        let mut session = calm();
        session.process_intent(PURE_INTENT);
        for _ in 0..4 {
            session.process_intent("zzzzzzzzzz");
        }
        let records: Vec<f64> = session.history().iter().map(|r| r.purity).collect();
        let mean = records.iter().sum::<f64>() / records.len() as f64;
        assert!(mean < RECEIPT_THRESHOLD);
        assert_eq!(session.generate_receipt(), Receipt::MetricFold);
    }

    #[test]
    fn test_receipt_window_forgets_old_peak() {
        let mut session = calm();
        session.process_intent(PURE_INTENT);
        for _ in 0..5 {
            session.process_intent("zzzzzzzzzz");
        }
        assert_eq!(session.generate_receipt(), Receipt::InsufficientCoherence);
        assert!(
            session
                .generate_receipt()
                .as_str()
                .contains("Insufficient Coherence")
        );
    }

    #[test]
    fn test_history_records_track_outcomes() {
        let mut session = calm();
        let a = session.process_intent(PURE_INTENT);
        let b = session.process_intent("zzzzzzzzzz");
        let records: Vec<HistoryRecord> = session.history().iter().copied().collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].purity, a.purity_score);
        assert_eq!(records[1].purity, b.purity_score);
        assert!(records[0].locked());
        assert!(!records[1].locked());
        assert_abs_diff_eq!(records[0].dilation, 1.14, epsilon = 1e-12);
    }

    #[test]
    fn test_history_capacity_bounds_retention() {
        let config = AuditorConfig {
            history_capacity: 3,
            ..AuditorConfig::default()
        };
        let mut session = AuditorSession::with_source(config, Calm).unwrap();
        for _ in 0..10 {
            session.process_intent("hello world");
        }
        assert_eq!(session.history().len(), 3);
        assert_eq!(session.history().total_recorded(), 10);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AuditorConfig {
            history_capacity: 0,
            ..AuditorConfig::default()
        };
        assert!(AuditorSession::with_source(config, Calm).is_err());

        let config = AuditorConfig {
            environment: EnvironmentConfig {
                mass: -1.0,
                vacuum_index: -1.0,
            },
            ..AuditorConfig::default()
        };
        assert!(matches!(
            AuditorSession::seeded(config, 1),
            Err(CoreError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_trace_stays_unit_through_audits() {
        let mut session = calm();
        for text in ["", "a", "zzzz", PURE_INTENT, JUMBLED_INTENT, "The quick brown fox"] {
            session.process_intent(text);
            assert_abs_diff_eq!(session.tracker().trace(), 1.0, epsilon = 1e-9);
            assert!(session.tracker().rho().is_hermitian(1e-9));
        }
    }

    #[test]
    fn test_snapshot_json() {
        let mut session = calm();
        session.process_intent(PURE_INTENT);
        let json: serde_json::Value = serde_json::from_str(&export_json(&session).unwrap()).unwrap();
        assert_eq!(json["total_recorded"], 1);
        assert_eq!(json["records"][0]["locked"], true);
        assert_eq!(json["receipt"], "metric_fold");
        assert_eq!(json["config"]["mass"], 70.0);
        assert_eq!(json["environment"]["ticks"], 1);
        assert_eq!(json["id"], session.id().to_string());
    }

    #[test]
    fn test_config_from_partial_json() {
        let cfg: AuditorConfig = serde_json::from_str(r#"{"mass": 80.0}"#).unwrap();
        assert_eq!(cfg.environment.mass, 80.0);
        assert_eq!(cfg.environment.vacuum_index, -1.0);
        assert_eq!(cfg.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }
}
