//! Brand Onboard — company onboarding form with website auto-fill.

pub mod config;
pub mod error;
pub mod extraction;
pub mod onboarding;
