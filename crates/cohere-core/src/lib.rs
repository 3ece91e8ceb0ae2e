//! State-coherence monitor engine.
//!
//! Text intents are turned into a noise level from their lexical profile and
//! a simulated environment clock. The noise is mixed into a Hermitian state
//! matrix, a correction pulse pulls it back toward a reference projector, and
//! the resulting purity history decides whether a session is certified.
//!
//! Zero I/O — pure math engine with no opinions about transport or persistence.

pub mod auditor;
pub mod clock;
pub mod complex;
pub mod constants;
pub mod entropy;
pub mod error;
pub mod history;
pub mod matrix;
pub mod tracker;

pub use auditor::{
    AuditorConfig, AuditorSession, CausalStatus, IntentOutcome, LexicalProfile, Receipt,
    SessionSnapshot, export_json, lexical_profile,
};
pub use clock::{
    CausalityCheck, EnvironmentClock, EnvironmentConfig, EnvironmentState, Interrupt,
    LightConeRegion, TickReport, bridged_causality, check_causality,
};
pub use complex::Complex;
pub use constants::{
    CORRECTION_TRIGGER, LOCK_THRESHOLD, PLANCK_TIME, RECEIPT_THRESHOLD, RECEIPT_WINDOW,
    VARIANCE_CEILING, VARIANCE_FLOOR,
};
pub use entropy::EntropySource;
pub use error::{CoreError, Result};
pub use history::{History, HistoryRecord};
pub use matrix::ComplexMatrix;
pub use tracker::CoherenceTracker;
