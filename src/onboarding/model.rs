//! Company profile and theme data models.

use serde::{Deserialize, Serialize};

/// Default primary color (blue).
pub const DEFAULT_PRIMARY: &str = "#3B82F6";
/// Default secondary color (gray).
pub const DEFAULT_SECONDARY: &str = "#E5E7EB";
/// Default accent color (light blue).
pub const DEFAULT_ACCENT: &str = "#60A5FA";

/// One pricing plan offered by the company.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingTier {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// Company metadata collected by the onboarding form.
///
/// `pricing_tiers` keeps insertion order; tiers are addressed by index.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CompanyInfo {
    pub company_name: String,
    pub product_description: String,
    pub pricing_tiers: Vec<PricingTier>,
    pub company_mission: String,
    pub target_audience: String,
}

impl CompanyInfo {
    /// Mutable access to one of the free-text fields.
    pub fn field_mut(&mut self, field: CompanyField) -> &mut String {
        match field {
            CompanyField::CompanyName => &mut self.company_name,
            CompanyField::ProductDescription => &mut self.product_description,
            CompanyField::CompanyMission => &mut self.company_mission,
            CompanyField::TargetAudience => &mut self.target_audience,
        }
    }
}

/// The editable text fields of [`CompanyInfo`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompanyField {
    CompanyName,
    ProductDescription,
    CompanyMission,
    TargetAudience,
}

impl std::fmt::Display for CompanyField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::CompanyName => "company_name",
            Self::ProductDescription => "product_description",
            Self::CompanyMission => "company_mission",
            Self::TargetAudience => "target_audience",
        };
        write!(f, "{s}")
    }
}

/// An edit to a single field of a pricing tier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TierEdit {
    Name(String),
    Price(String),
    Features(Vec<String>),
}

impl TierEdit {
    pub fn apply(self, tier: &mut PricingTier) {
        match self {
            Self::Name(name) => tier.name = name,
            Self::Price(price) => tier.price = price,
            Self::Features(features) => tier.features = features,
        }
    }
}

/// Brand colors. Values are expected to be hex strings but are not checked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY.to_string(),
            secondary: DEFAULT_SECONDARY.to_string(),
            accent: DEFAULT_ACCENT.to_string(),
        }
    }
}

impl ThemeColors {
    pub fn get(&self, slot: ColorSlot) -> &str {
        match slot {
            ColorSlot::Primary => &self.primary,
            ColorSlot::Secondary => &self.secondary,
            ColorSlot::Accent => &self.accent,
        }
    }

    pub fn set(&mut self, slot: ColorSlot, value: String) {
        match slot {
            ColorSlot::Primary => self.primary = value,
            ColorSlot::Secondary => self.secondary = value,
            ColorSlot::Accent => self.accent = value,
        }
    }

    /// Overlay extracted colors, keeping the current value wherever the
    /// extraction came back empty or missing.
    pub fn merged_with(&self, extracted: &PartialThemeColors) -> ThemeColors {
        fn pick(new: Option<&String>, old: &str) -> String {
            match new {
                Some(v) if !v.is_empty() => v.clone(),
                _ => old.to_string(),
            }
        }

        ThemeColors {
            primary: pick(extracted.primary.as_ref(), &self.primary),
            secondary: pick(extracted.secondary.as_ref(), &self.secondary),
            accent: pick(extracted.accent.as_ref(), &self.accent),
        }
    }
}

/// Colors as returned by extraction: any of them may be absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialThemeColors {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
}

/// One of the three theme color slots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ColorSlot {
    Primary,
    Secondary,
    Accent,
}

impl std::fmt::Display for ColorSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_company_info_is_empty() {
        let info = CompanyInfo::default();
        assert!(info.company_name.is_empty());
        assert!(info.product_description.is_empty());
        assert!(info.company_mission.is_empty());
        assert!(info.target_audience.is_empty());
        assert!(info.pricing_tiers.is_empty());
    }

    #[test]
    fn default_theme_colors() {
        let colors = ThemeColors::default();
        assert_eq!(colors.primary, "#3B82F6");
        assert_eq!(colors.secondary, "#E5E7EB");
        assert_eq!(colors.accent, "#60A5FA");
    }

    #[test]
    fn empty_extracted_color_keeps_prior() {
        let prior = ThemeColors {
            primary: "#111111".to_string(),
            ..Default::default()
        };
        let extracted = PartialThemeColors {
            primary: Some(String::new()),
            ..Default::default()
        };
        let merged = prior.merged_with(&extracted);
        assert_eq!(merged.primary, "#111111");
        assert_eq!(merged.secondary, prior.secondary);
        assert_eq!(merged.accent, prior.accent);
    }

    #[test]
    fn present_extracted_color_overwrites() {
        let prior = ThemeColors::default();
        let extracted = PartialThemeColors {
            accent: Some("#ABCDEF".to_string()),
            ..Default::default()
        };
        let merged = prior.merged_with(&extracted);
        assert_eq!(merged.accent, "#ABCDEF");
        assert_eq!(merged.primary, "#3B82F6");
    }

    #[test]
    fn set_color_touches_one_slot() {
        let mut colors = ThemeColors::default();
        colors.set(ColorSlot::Secondary, "#000000".to_string());
        assert_eq!(colors.get(ColorSlot::Secondary), "#000000");
        assert_eq!(colors.get(ColorSlot::Primary), DEFAULT_PRIMARY);
        assert_eq!(colors.get(ColorSlot::Accent), DEFAULT_ACCENT);
    }

    #[test]
    fn tier_edit_serde_shape() {
        let edit: TierEdit =
            serde_json::from_str(r#"{"field": "price", "value": "$49/mo"}"#).unwrap();
        assert_eq!(edit, TierEdit::Price("$49/mo".to_string()));

        let edit: TierEdit =
            serde_json::from_str(r#"{"field": "features", "value": ["SSO", "Audit log"]}"#)
                .unwrap();
        let mut tier = PricingTier::default();
        edit.apply(&mut tier);
        assert_eq!(tier.features, vec!["SSO", "Audit log"]);
    }

    #[test]
    fn field_names_match_serde() {
        let fields = [
            CompanyField::CompanyName,
            CompanyField::ProductDescription,
            CompanyField::CompanyMission,
            CompanyField::TargetAudience,
        ];
        for field in fields {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(format!("\"{field}\""), json);
        }
    }

    #[test]
    fn tier_features_default_when_missing() {
        let tier: PricingTier =
            serde_json::from_str(r#"{"name": "Free", "price": "$0"}"#).unwrap();
        assert!(tier.features.is_empty());
    }
}
