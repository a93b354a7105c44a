//! FormController — owns one form session's state, runs auto-fill, and
//! forwards state to the submission callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;

use crate::config::{FormConfig, NotifyPolicy};
use crate::error::{ExtractionError, FormError};
use crate::extraction::Extractor;

use super::model::{ColorSlot, CompanyField, CompanyInfo, PricingTier, ThemeColors, TierEdit};
use super::state::{FormPhase, FormSnapshot, FormState};

/// Receives the form's data whenever the controller publishes it.
pub trait SubmissionSink: Send + Sync {
    fn on_submit(&self, company_info: &CompanyInfo, theme_colors: &ThemeColors);
}

impl<F> SubmissionSink for F
where
    F: Fn(&CompanyInfo, &ThemeColors) + Send + Sync,
{
    fn on_submit(&self, company_info: &CompanyInfo, theme_colors: &ThemeColors) {
        self(company_info, theme_colors)
    }
}

/// Result of an auto-fill trigger.
#[derive(Debug)]
pub enum AutofillOutcome {
    /// Both extractions succeeded and the merged data was committed.
    Completed {
        company_info: CompanyInfo,
        theme_colors: ThemeColors,
    },
    /// Another auto-fill is in flight; this trigger did nothing.
    AlreadyRunning,
    /// An extraction failed; form state is unchanged.
    Failed(ExtractionError),
}

/// Clears the loading flag however the auto-fill future ends, including
/// when it is dropped mid-flight.
struct LoadingGuard<'a>(&'a AtomicBool);

impl<'a> LoadingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Coordinates a single onboarding form session.
pub struct FormController {
    extractor: Arc<dyn Extractor>,
    sink: Arc<dyn SubmissionSink>,
    config: FormConfig,
    state: RwLock<FormState>,
    loading: AtomicBool,
}

impl FormController {
    /// Start a session with empty company info and the default theme.
    pub fn new(
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn SubmissionSink>,
        config: FormConfig,
    ) -> Self {
        Self::with_initial(
            extractor,
            sink,
            config,
            CompanyInfo::default(),
            ThemeColors::default(),
        )
    }

    /// Start a session pre-populated with existing data.
    pub fn with_initial(
        extractor: Arc<dyn Extractor>,
        sink: Arc<dyn SubmissionSink>,
        config: FormConfig,
        company_info: CompanyInfo,
        theme_colors: ThemeColors,
    ) -> Self {
        Self {
            extractor,
            sink,
            config,
            state: RwLock::new(FormState::new(company_info, theme_colors)),
            loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> FormPhase {
        if self.is_loading() {
            FormPhase::Extracting
        } else {
            FormPhase::Idle
        }
    }

    pub async fn snapshot(&self) -> FormSnapshot {
        let state = self.state.read().await;
        let phase = self.phase();
        FormSnapshot {
            phase,
            loading: phase.is_loading(),
            url: state.url.clone(),
            company_info: state.company_info.clone(),
            theme_colors: state.theme_colors.clone(),
        }
    }

    /// Record the URL the user typed. Validation happens at auto-fill time.
    pub async fn set_url(&self, url: impl Into<String>) {
        self.state.write().await.url = url.into();
    }

    /// Fill the form from the website.
    ///
    /// 1. Refuse if an auto-fill is already running.
    /// 2. Extract the company profile, then the brand colors, in sequence.
    /// 3. Replace company info wholesale; overlay non-empty colors.
    /// 4. Notify the sink once with the merged data.
    ///
    /// Any extraction error is logged and leaves the form untouched.
    pub async fn auto_fill(
        &self,
        url: Option<String>,
        cancel: &CancellationToken,
    ) -> AutofillOutcome {
        let Some(guard) = LoadingGuard::acquire(&self.loading) else {
            tracing::debug!("Auto-fill already running, ignoring trigger");
            return AutofillOutcome::AlreadyRunning;
        };

        let url = {
            let mut state = self.state.write().await;
            if let Some(url) = url {
                state.url = url;
            }
            state.url.clone()
        };

        tracing::info!(url = %url, provider = self.extractor.provider_name(), "Auto-fill started");

        let extracted = async {
            let company = self.extractor.extract_company(&url, cancel).await?;
            let colors = self.extractor.extract_colors(&url, cancel).await?;
            Ok::<_, ExtractionError>((company, colors))
        }
        .await;

        let (company_info, theme_colors) = match extracted {
            Ok((company, colors)) => {
                let mut state = self.state.write().await;
                let merged = state.theme_colors.merged_with(&colors);
                state.company_info = company;
                state.theme_colors = merged;
                tracing::info!(
                    url = %url,
                    company = %state.company_info.company_name,
                    tiers = state.company_info.pricing_tiers.len(),
                    "Auto-fill completed"
                );
                // Published under the write lock so a later edit cannot
                // notify ahead of this payload.
                self.sink.on_submit(&state.company_info, &state.theme_colors);
                (state.company_info.clone(), state.theme_colors.clone())
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Auto-fill failed; keeping current form data");
                return AutofillOutcome::Failed(e);
            }
        };
        drop(guard);

        AutofillOutcome::Completed {
            company_info,
            theme_colors,
        }
    }

    /// Replace one free-text company field.
    pub async fn edit_company_field(&self, field: CompanyField, value: impl Into<String>) {
        let mut state = self.state.write().await;
        *state.company_info.field_mut(field) = value.into();
        tracing::debug!(%field, "Company field edited");
        self.notify_edit(&state);
    }

    /// Append an empty pricing tier and return its index.
    pub async fn add_tier(&self) -> usize {
        let mut state = self.state.write().await;
        state.company_info.pricing_tiers.push(PricingTier::default());
        let index = state.company_info.pricing_tiers.len() - 1;
        tracing::debug!(index, "Pricing tier added");
        self.notify_edit(&state);
        index
    }

    /// Edit one field of the tier at `index`.
    pub async fn edit_tier(&self, index: usize, edit: TierEdit) -> Result<(), FormError> {
        let mut state = self.state.write().await;
        let len = state.company_info.pricing_tiers.len();
        let tier = state
            .company_info
            .pricing_tiers
            .get_mut(index)
            .ok_or(FormError::TierNotFound { index, len })?;
        edit.apply(tier);
        tracing::debug!(index, "Pricing tier edited");
        self.notify_edit(&state);
        Ok(())
    }

    /// Replace one theme color, keeping the other two.
    pub async fn set_color(&self, slot: ColorSlot, value: impl Into<String>) {
        let mut state = self.state.write().await;
        state.theme_colors.set(slot, value.into());
        tracing::debug!(%slot, value = state.theme_colors.get(slot), "Theme color changed");
        self.notify_edit(&state);
    }

    /// Forward the current data to the sink. No validation is performed.
    pub async fn submit(&self) -> (CompanyInfo, ThemeColors) {
        let state = self.state.read().await;
        tracing::info!(company = %state.company_info.company_name, "Onboarding form submitted");
        self.sink.on_submit(&state.company_info, &state.theme_colors);
        (state.company_info.clone(), state.theme_colors.clone())
    }

    /// Called with the state lock held, so sink calls arrive in commit order.
    fn notify_edit(&self, state: &FormState) {
        match self.config.notify_policy {
            NotifyPolicy::Immediate => self.sink.on_submit(&state.company_info, &state.theme_colors),
            NotifyPolicy::OnSubmit => {}
        }
    }
}
