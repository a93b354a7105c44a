//! Form session state machine.

use serde::{Deserialize, Serialize};

use super::model::{CompanyInfo, ThemeColors};

/// Phases of a form session.
///
/// `Idle → Extracting → Idle` for auto-fill. Edits do not change the phase.
/// There is no terminal phase; the session lives until it is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FormPhase {
    #[default]
    Idle,
    Extracting,
}

impl FormPhase {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Extracting)
    }
}

impl std::fmt::Display for FormPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
        };
        write!(f, "{s}")
    }
}

/// The data owned by one form session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormState {
    /// Last URL typed into the form. Only validated when auto-fill runs.
    pub url: String,
    pub company_info: CompanyInfo,
    pub theme_colors: ThemeColors,
}

impl FormState {
    pub fn new(company_info: CompanyInfo, theme_colors: ThemeColors) -> Self {
        Self {
            url: String::new(),
            company_info,
            theme_colors,
        }
    }
}

/// Read-only view of a session, as served to the UI.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FormSnapshot {
    pub phase: FormPhase,
    pub loading: bool,
    pub url: String,
    pub company_info: CompanyInfo,
    pub theme_colors: ThemeColors,
}
