//! Campaign parameters and analysis requests.

pub mod model;

use serde::{Deserialize, Serialize};

pub use model::{
    Audience, CampaignDuration, CampaignParameters, Goal, Language, PipelineFlags, Sector, Style,
};

/// Default model offered first in the selector.
pub const DEFAULT_MODEL: &str = "models/gemini-2.5-flash-image-preview";

/// Models offered in the selector.
pub const AVAILABLE_MODELS: [&str; 3] = [
    DEFAULT_MODEL,
    "gemini-pro",
    "gemini-1.5-pro-latest",
];

/// Everything one submission of the form carries into the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub sector: Sector,
    /// Free-text domain, only read when `sector` is `Other`.
    pub custom_domain: String,
    pub budget: u32,
    pub audience: Audience,
    pub duration: CampaignDuration,
    pub goal: Goal,
    pub style: Style,
    pub language: Language,
    pub model: String,
    pub report_filename: String,
    pub flags: PipelineFlags,
}

impl AnalysisRequest {
    /// Resolve the sector choice and build the immutable parameter record.
    ///
    /// Fails with a validation error when `Other` is chosen without a domain;
    /// callers must block the submission in that case.
    pub fn parameters(&self) -> crate::CampaignResult<CampaignParameters> {
        let domain = self.sector.resolve_domain(&self.custom_domain)?;
        CampaignParameters::new(self.budget, self.audience, self.duration, self.goal, domain)
    }
}

/// Default PDF file name for a domain: `rapport_<domain>.pdf`.
pub fn default_report_filename(domain: &str) -> String {
    safe_file_name(&format!("rapport_{}", domain.trim().to_lowercase()))
}

/// Single-component PDF file name made of ASCII letters, digits, `.`, `-`
/// and `_`. Anything else, path separators included, becomes `_`.
pub fn safe_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "rapport.pdf".to_string()
    } else if cleaned.to_ascii_lowercase().ends_with(".pdf") {
        cleaned
    } else {
        format!("{}.pdf", cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sector: Sector, custom: &str) -> AnalysisRequest {
        AnalysisRequest {
            sector,
            custom_domain: custom.to_string(),
            budget: 15_000,
            audience: Audience::Age25To34,
            duration: CampaignDuration::OneMonth,
            goal: Goal::Conversion,
            style: Style::Formal,
            language: Language::French,
            model: DEFAULT_MODEL.to_string(),
            report_filename: "rapport.pdf".to_string(),
            flags: PipelineFlags::default(),
        }
    }

    #[test]
    fn test_sector_label_becomes_domain() {
        let params = request(Sector::Technology, "ignored").parameters().unwrap();
        assert_eq!(params.domain, "Technologie");
    }

    #[test]
    fn test_other_sector_uses_custom_domain() {
        let params = request(Sector::Other, "  Aéronautique ").parameters().unwrap();
        assert_eq!(params.domain, "Aéronautique");
    }

    #[test]
    fn test_other_sector_with_blank_domain_is_rejected() {
        let err = request(Sector::Other, "   ").parameters().unwrap_err();
        assert!(matches!(err, crate::CampaignError::ValidationError(_)));
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let mut req = request(Sector::Finance, "");
        req.budget = 0;
        assert!(req.parameters().is_err());
    }

    #[test]
    fn test_duration_only_accepts_offered_values() {
        assert_eq!(CampaignDuration::try_from(60).unwrap(), CampaignDuration::TwoMonths);
        assert!(CampaignDuration::try_from(45).is_err());
    }

    #[test]
    fn test_labels_round_trip_through_lookup() {
        for audience in Audience::ALL {
            assert_eq!(Audience::from_label(audience.label()), Some(audience));
        }
        for sector in Sector::ALL {
            assert_eq!(Sector::from_label(sector.label()), Some(sector));
        }
        assert_eq!(Goal::from_label("Notoriété"), Some(Goal::Awareness));
        assert_eq!(Style::from_label("Humour"), Some(Style::Humor));
        assert_eq!(Language::from_label("Anglais"), Some(Language::English));
        assert_eq!(Goal::from_label("Inconnu"), None);
    }

    #[test]
    fn test_params_serialize_with_display_labels() {
        let params = request(Sector::Fashion, "").parameters().unwrap();
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["audience"], "25-34 ans");
        assert_eq!(json["duration"], 30);
        assert_eq!(json["goal"], "Conversion");
    }

    #[test]
    fn test_default_report_filename() {
        assert_eq!(default_report_filename("Finance"), "rapport_finance.pdf");
        assert_eq!(default_report_filename(" B2B/SaaS "), "rapport_b2b_saas.pdf");
        assert_eq!(default_report_filename("../etc"), "rapport_.._etc.pdf");
    }
}
