//! Campaign Core Library
//!
//! Domain models and business logic for the smart campaign advisor: campaign
//! parameters, prompts, the quality heuristic, simulated charts and the
//! session context.

pub mod campaign;
pub mod charts;
pub mod error;
pub mod generation;
pub mod outcome;
pub mod prompt;
pub mod quality;
pub mod session;

pub use error::{CampaignError, CampaignResult};
pub use generation::{GenerationOptions, GenerationRequest, GenerativeModel, ImageBlob, ModelResponse};
pub use outcome::{Notice, NoticeLevel, StageOutcome};
pub use quality::QualityLabel;
pub use session::{AnalysisResult, ArtifactKind, HistoryEntry, Session};
