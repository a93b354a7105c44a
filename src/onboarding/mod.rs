//! Onboarding form — company profile auto-fill and editing.
//!
//! A form session holds the company profile and theme colors in memory.
//! The user can auto-fill it from a website (via an `Extractor`), edit any
//! field, and submit. Every publish goes through a `SubmissionSink`; the
//! `ProgressTracker` is the sink used by the HTTP front end.

pub mod controller;
pub mod model;
pub mod progress;
pub mod routes;
pub mod state;

pub use controller::{AutofillOutcome, FormController, SubmissionSink};
pub use model::{
    ColorSlot, CompanyField, CompanyInfo, PartialThemeColors, PricingTier, ThemeColors, TierEdit,
};
pub use progress::{ProgressTracker, ProgressView};
pub use routes::{OnboardingRouteState, onboarding_routes};
pub use state::{FormPhase, FormSnapshot, FormState};
