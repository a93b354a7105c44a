//! Read-only progress view fed by the form's submission callback.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::controller::SubmissionSink;
use super::model::{CompanyInfo, ThemeColors};

/// Step labels shown above the form.
pub const STEPS: [&str; 3] = ["Company Info", "Branding", "Review"];

/// Highlight color used before any theme has been published.
pub const FALLBACK_HIGHLIGHT: &str = "#2563EB";

#[derive(Debug, Clone)]
struct Latest {
    company_info: CompanyInfo,
    theme_colors: ThemeColors,
    received_at: DateTime<Utc>,
}

/// One entry in the step indicator.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProgressStep {
    pub label: String,
    pub active: bool,
}

/// What the hosting page renders.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub steps: Vec<ProgressStep>,
    pub active_step: usize,
    /// Color for the active step and the progress bar.
    pub highlight_color: String,
    pub updates_received: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_info: Option<CompanyInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme_colors: Option<ThemeColors>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Remembers the most recent payload published by the form.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    inner: Mutex<(Option<Latest>, u64)>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the view from the latest payload.
    ///
    /// The onboarding flow has a single page, so the first step is always
    /// the active one.
    pub fn view(&self) -> ProgressView {
        let guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let (latest, count) = &*guard;
        let active_step = 0;

        let highlight_color = latest
            .as_ref()
            .map(|l| l.theme_colors.primary.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(FALLBACK_HIGHLIGHT)
            .to_string();

        ProgressView {
            steps: STEPS
                .iter()
                .enumerate()
                .map(|(i, label)| ProgressStep {
                    label: label.to_string(),
                    active: i == active_step,
                })
                .collect(),
            active_step,
            highlight_color,
            updates_received: *count,
            company_info: latest.as_ref().map(|l| l.company_info.clone()),
            theme_colors: latest.as_ref().map(|l| l.theme_colors.clone()),
            updated_at: latest.as_ref().map(|l| l.received_at),
        }
    }
}

impl SubmissionSink for ProgressTracker {
    fn on_submit(&self, company_info: &CompanyInfo, theme_colors: &ThemeColors) {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        guard.0 = Some(Latest {
            company_info: company_info.clone(),
            theme_colors: theme_colors.clone(),
            received_at: Utc::now(),
        });
        guard.1 += 1;
    }
}
