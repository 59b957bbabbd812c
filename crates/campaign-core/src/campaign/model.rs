//! Campaign domain models.

use serde::{Deserialize, Serialize};

use crate::error::{CampaignError, CampaignResult};

/// Lowest budget offered by the form, in euros.
pub const BUDGET_MIN: u32 = 1_000;
/// Highest budget offered by the form, in euros.
pub const BUDGET_MAX: u32 = 50_000;
/// Budget slider increment.
pub const BUDGET_STEP: u32 = 500;
/// Budget preselected in the form.
pub const BUDGET_DEFAULT: u32 = 15_000;

/// Parameters of one campaign analysis request.
///
/// Built once per submission and never mutated afterwards; the history entry
/// recorded for an analysis holds an identical copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignParameters {
    pub budget: u32,
    pub audience: Audience,
    pub duration: CampaignDuration,
    pub goal: Goal,
    pub domain: String,
}

impl CampaignParameters {
    /// Build a parameter record, rejecting a zero budget or an empty domain.
    pub fn new(
        budget: u32,
        audience: Audience,
        duration: CampaignDuration,
        goal: Goal,
        domain: impl Into<String>,
    ) -> CampaignResult<Self> {
        if budget == 0 {
            return Err(CampaignError::validation("Le budget doit être positif"));
        }
        let domain = domain.into().trim().to_string();
        if domain.is_empty() {
            return Err(CampaignError::validation(
                "Veuillez préciser votre secteur d'activité",
            ));
        }
        Ok(Self {
            budget,
            audience,
            duration,
            goal,
            domain,
        })
    }
}

/// Target audience age bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    #[serde(rename = "18-24 ans")]
    Age18To24,
    #[serde(rename = "25-34 ans")]
    Age25To34,
    #[serde(rename = "35-44 ans")]
    Age35To44,
    #[serde(rename = "45+ ans")]
    Age45Plus,
}

impl Audience {
    pub const ALL: [Audience; 4] = [
        Self::Age18To24,
        Self::Age25To34,
        Self::Age35To44,
        Self::Age45Plus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Age18To24 => "18-24 ans",
            Self::Age25To34 => "25-34 ans",
            Self::Age35To44 => "35-44 ans",
            Self::Age45Plus => "45+ ans",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == s.trim())
    }
}

/// Campaign length. Only the durations offered by the form are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum CampaignDuration {
    OneWeek,
    TwoWeeks,
    OneMonth,
    TwoMonths,
    Quarter,
}

impl CampaignDuration {
    pub const ALL: [CampaignDuration; 5] = [
        Self::OneWeek,
        Self::TwoWeeks,
        Self::OneMonth,
        Self::TwoMonths,
        Self::Quarter,
    ];

    pub fn days(&self) -> u32 {
        match self {
            Self::OneWeek => 7,
            Self::TwoWeeks => 14,
            Self::OneMonth => 30,
            Self::TwoMonths => 60,
            Self::Quarter => 90,
        }
    }
}

impl TryFrom<u32> for CampaignDuration {
    type Error = CampaignError;

    fn try_from(days: u32) -> CampaignResult<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.days() == days)
            .ok_or_else(|| {
                CampaignError::validation(format!(
                    "Durée invalide: {} jours (7, 14, 30, 60 ou 90)",
                    days
                ))
            })
    }
}

impl From<CampaignDuration> for u32 {
    fn from(d: CampaignDuration) -> u32 {
        d.days()
    }
}

/// Main campaign objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    Acquisition,
    Conversion,
    #[serde(rename = "Rétention")]
    Retention,
    #[serde(rename = "Notoriété")]
    Awareness,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Self::Acquisition,
        Self::Conversion,
        Self::Retention,
        Self::Awareness,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Acquisition => "Acquisition",
            Self::Conversion => "Conversion",
            Self::Retention => "Rétention",
            Self::Awareness => "Notoriété",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.label() == s.trim())
    }
}

/// Business sector offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sector {
    General,
    ECommerce,
    Health,
    Education,
    RealEstate,
    Finance,
    Technology,
    Fashion,
    Restaurant,
    Tourism,
    Entertainment,
    Other,
}

impl Sector {
    pub const ALL: [Sector; 12] = [
        Self::General,
        Self::ECommerce,
        Self::Health,
        Self::Education,
        Self::RealEstate,
        Self::Finance,
        Self::Technology,
        Self::Fashion,
        Self::Restaurant,
        Self::Tourism,
        Self::Entertainment,
        Self::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::General => "Général",
            Self::ECommerce => "E-commerce",
            Self::Health => "Santé & Bien-être",
            Self::Education => "Éducation",
            Self::RealEstate => "Immobilier",
            Self::Finance => "Finance",
            Self::Technology => "Technologie",
            Self::Fashion => "Mode",
            Self::Restaurant => "Restauration",
            Self::Tourism => "Tourisme",
            Self::Entertainment => "Divertissement",
            Self::Other => "Autre",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.label() == s.trim())
    }

    /// Resolve the domain string sent to the model.
    ///
    /// `Other` takes the free-text value, which must not be blank.
    pub fn resolve_domain(&self, custom: &str) -> CampaignResult<String> {
        match self {
            Self::Other => {
                let custom = custom.trim();
                if custom.is_empty() {
                    Err(CampaignError::validation(
                        "Veuillez préciser votre secteur d'activité",
                    ))
                } else {
                    Ok(custom.to_string())
                }
            }
            sector => Ok(sector.label().to_string()),
        }
    }
}

/// Writing tone requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Style {
    #[default]
    #[serde(rename = "Formel")]
    Formal,
    #[serde(rename = "Dynamique")]
    Dynamic,
    #[serde(rename = "Humour")]
    Humor,
}

impl Style {
    pub const ALL: [Style; 3] = [Self::Formal, Self::Dynamic, Self::Humor];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Formal => "Formel",
            Self::Dynamic => "Dynamique",
            Self::Humor => "Humour",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.label() == s.trim())
    }

    /// Tone instruction inserted in the `[STYLE]` section.
    pub fn instruction(&self) -> &'static str {
        match self {
            Self::Formal => "Ton professionnel et technique avec des termes marketing précis.",
            Self::Dynamic => "Ton énergique avec des verbes d'action et des phrases courtes.",
            Self::Humor => {
                "Ton décontracté avec des touches d'humour adapté au monde professionnel."
            }
        }
    }
}

/// Response language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "Français")]
    French,
    #[serde(rename = "Anglais")]
    English,
}

impl Language {
    pub const ALL: [Language; 2] = [Self::French, Self::English];

    pub fn label(&self) -> &'static str {
        match self {
            Self::French => "Français",
            Self::English => "Anglais",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|x| x.label() == s.trim())
    }
}

/// Optional generation steps toggled by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineFlags {
    pub generate_premium_insights: bool,
    pub generate_visual_asset: bool,
    pub generate_summary_banner: bool,
}

impl Default for PipelineFlags {
    fn default() -> Self {
        Self {
            generate_premium_insights: true,
            generate_visual_asset: true,
            generate_summary_banner: true,
        }
    }
}

impl PipelineFlags {
    /// Only the main analysis, no optional generation.
    pub fn minimal() -> Self {
        Self {
            generate_premium_insights: false,
            generate_visual_asset: false,
            generate_summary_banner: false,
        }
    }
}
