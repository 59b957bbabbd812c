//! Session-scoped state: the last analysis and the append-only history.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::campaign::{CampaignParameters, Language, Style};
use crate::quality::QualityLabel;

/// Files written to the artifact directory. Names are fixed and each
/// generation overwrites the previous file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Celebration,
    VisualAsset,
    SummaryBanner,
    Logo,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        Self::Celebration,
        Self::VisualAsset,
        Self::SummaryBanner,
        Self::Logo,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Celebration => "celebration.png",
            Self::VisualAsset => "generated_asset.png",
            Self::SummaryBanner => "summary_banner.png",
            Self::Logo => "logo.png",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.file_name() == name)
    }
}

/// Output of one successful analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub params: CampaignParameters,
    pub style: Style,
    pub language: Language,
    pub model: String,
    pub generated_text: String,
    pub quality: QualityLabel,
    pub premium_text: Option<String>,
    /// Model-generated images, at most the visual asset and the summary banner.
    pub images: Vec<ArtifactKind>,
    pub celebration: Option<ArtifactKind>,
    pub report_filename: String,
    pub created_at: DateTime<Local>,
}

/// One line of the session history.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub params: CampaignParameters,
    pub domain: String,
    pub quality: QualityLabel,
    pub premium: bool,
    pub image: Option<ArtifactKind>,
}

impl HistoryEntry {
    fn from_result(result: &AnalysisResult) -> Self {
        Self {
            timestamp: result.created_at,
            params: result.params.clone(),
            domain: result.params.domain.clone(),
            quality: result.quality,
            premium: result.premium_text.is_some(),
            image: result
                .images
                .iter()
                .copied()
                .find(|k| *k == ArtifactKind::VisualAsset),
        }
    }
}

/// State owned by one user session. Nothing here outlives the process.
#[derive(Debug, Default)]
pub struct Session {
    history: Vec<HistoryEntry>,
    last: Option<AnalysisResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a finished analysis and append its history entry.
    pub fn record(&mut self, result: AnalysisResult) {
        self.history.push(HistoryEntry::from_result(&result));
        self.last = Some(result);
    }

    pub fn last(&self) -> Option<&AnalysisResult> {
        self.last.as_ref()
    }

    /// Drop the displayed result. History is kept.
    pub fn clear_last(&mut self) {
        self.last = None;
    }

    /// Entries in submission order.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Entries newest first, paired with their 1-based submission number.
    pub fn history_newest_first(&self) -> impl Iterator<Item = (usize, &HistoryEntry)> {
        self.history.iter().enumerate().rev().map(|(i, e)| (i + 1, e))
    }
}
