//! One analysis run over an explicit session.
//!
//! Stages are awaited one after the other. Only domain validation, a missing
//! credential and a failed main generation stop the run; every other stage
//! degrades into a notice.

use std::sync::Arc;

use campaign_core::campaign::{default_report_filename, AnalysisRequest, CampaignParameters};
use campaign_core::generation::{generate_image, generate_text, missing_credential_error};
use campaign_core::{
    prompt, quality, AnalysisResult, ArtifactKind, CampaignError, GenerationOptions,
    GenerationRequest, GenerativeModel, Notice, QualityLabel, Session, StageOutcome,
};
use campaign_render::{draw_celebration, ArtifactStore};
use chrono::Local;
use tracing::{debug, info, warn};

const NO_VISUAL_ASSET: &str = "Aucune image n'a été générée pour le visuel publicitaire.";
const NO_SUMMARY_BANNER: &str = "Aucune image n'a été générée pour la bannière de synthèse.";

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Rejected before any model call.
    Blocked,
    /// Stopped by a hard failure; the session is unchanged.
    Failed,
    /// An analysis was recorded, possibly with warnings.
    Completed,
}

/// Status and user-facing notices of one run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub status: RunStatus,
    pub notices: Vec<Notice>,
}

impl PipelineReport {
    fn new() -> Self {
        Self {
            status: RunStatus::Completed,
            notices: Vec::new(),
        }
    }

    fn stop(mut self, status: RunStatus, notice: Notice) -> Self {
        self.status = status;
        self.notices.push(notice);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

/// Runs analyses against one model and one artifact directory.
#[derive(Clone)]
pub struct AnalysisPipeline {
    model: Option<Arc<dyn GenerativeModel>>,
    artifacts: ArtifactStore,
    options: GenerationOptions,
}

impl AnalysisPipeline {
    /// `model` is `None` when no API key is configured; runs then fail with
    /// a credential notice instead of calling anything.
    pub fn new(model: Option<Arc<dyn GenerativeModel>>, artifacts: ArtifactStore) -> Self {
        Self {
            model,
            artifacts,
            options: GenerationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Run every stage for `request` and record the result in `session`.
    pub async fn run(&self, session: &mut Session, request: &AnalysisRequest) -> PipelineReport {
        let mut report = PipelineReport::new();

        let params = match request.parameters() {
            Ok(params) => params,
            Err(e) => {
                warn!(sector = ?request.sector, error = %e, "Submission blocked");
                return report.stop(RunStatus::Blocked, Notice::warning(validation_message(e)));
            }
        };

        let Some(model) = self.model.as_deref() else {
            warn!("Analysis requested without an API key");
            return report.stop(
                RunStatus::Failed,
                Notice::error(missing_credential_error().to_string()),
            );
        };

        info!(
            domain = %params.domain,
            budget = params.budget,
            model = %request.model,
            "Starting analysis"
        );

        let main = self.request(
            request,
            prompt::analysis_prompt(&params, request.style, request.language),
        );
        let generated_text = match generate_text(model, &main).await {
            StageOutcome::Success(text) => text,
            outcome => {
                let (_, notice) = outcome.into_parts();
                if let Some(notice) = notice {
                    report.notices.push(notice);
                }
                report.status = RunStatus::Failed;
                return report;
            }
        };

        let premium_text = if request.flags.generate_premium_insights {
            self.premium_insights(model, request, &params, &mut report).await
        } else {
            None
        };

        let quality = quality::evaluate(&generated_text, params.budget);
        debug!(quality = %quality, "Analysis scored");
        let celebration = keep(self.celebrate(quality), &mut report.notices);

        let mut images = Vec::new();
        if request.flags.generate_visual_asset {
            let req = self.request(
                request,
                prompt::visual_asset_prompt(&generated_text, &params.domain),
            );
            images.extend(
                self.image_stage(model, &req, ArtifactKind::VisualAsset, NO_VISUAL_ASSET, &mut report)
                    .await,
            );
        }
        if request.flags.generate_summary_banner {
            let req = self.request(
                request,
                prompt::summary_banner_prompt(&generated_text, &params.domain),
            );
            images.extend(
                self.image_stage(model, &req, ArtifactKind::SummaryBanner, NO_SUMMARY_BANNER, &mut report)
                    .await,
            );
        }

        let report_filename = if request.report_filename.trim().is_empty() {
            default_report_filename(&params.domain)
        } else {
            request.report_filename.trim().to_string()
        };

        session.record(AnalysisResult {
            params,
            style: request.style,
            language: request.language,
            model: request.model.clone(),
            generated_text,
            quality,
            premium_text,
            images,
            celebration,
            report_filename,
            created_at: Local::now(),
        });
        info!(
            quality = %quality,
            history = session.history().len(),
            warnings = report.notices.len(),
            "Analysis recorded"
        );

        report
    }

    fn request(&self, request: &AnalysisRequest, prompt: String) -> GenerationRequest {
        GenerationRequest::new(request.model.clone(), prompt).with_options(self.options)
    }

    async fn premium_insights(
        &self,
        model: &dyn GenerativeModel,
        request: &AnalysisRequest,
        params: &CampaignParameters,
        report: &mut PipelineReport,
    ) -> Option<String> {
        let req = self.request(request, prompt::premium_insights_prompt(params));
        match generate_text(model, &req).await {
            StageOutcome::Success(text) => Some(text),
            StageOutcome::Degraded { warning: message } | StageOutcome::Failed { error: message } => {
                report.notices.push(Notice::warning(format!(
                    "Insights premium indisponibles : {}",
                    message
                )));
                None
            }
        }
    }

    /// Draw and store the celebration banner. Runs synchronously so the
    /// thread-local RNG never lives across an await point.
    fn celebrate(&self, quality: QualityLabel) -> StageOutcome<ArtifactKind> {
        let banner = draw_celebration(quality, &mut rand::thread_rng());
        match self.artifacts.save_png(ArtifactKind::Celebration, &banner) {
            Ok(_) => StageOutcome::Success(ArtifactKind::Celebration),
            Err(e) => {
                warn!(error = %e, "Celebration banner not saved");
                StageOutcome::degraded(format!("Bannière de célébration indisponible : {}", e))
            }
        }
    }

    async fn image_stage(
        &self,
        model: &dyn GenerativeModel,
        req: &GenerationRequest,
        kind: ArtifactKind,
        missing_warning: &str,
        report: &mut PipelineReport,
    ) -> Option<ArtifactKind> {
        let stored = match generate_image(model, req, missing_warning).await {
            StageOutcome::Success(blob) => match self.artifacts.save_generated(kind, &blob) {
                Ok(path) => {
                    debug!(path = %path.display(), "Generated image stored");
                    StageOutcome::Success(kind)
                }
                Err(e) => {
                    warn!(artifact = kind.file_name(), error = %e, "Generated image not stored");
                    StageOutcome::degraded(format!("Image {} illisible : {}", kind.file_name(), e))
                }
            },
            StageOutcome::Degraded { warning } => StageOutcome::Degraded { warning },
            StageOutcome::Failed { error } => StageOutcome::Failed { error },
        };
        keep(stored, &mut report.notices)
    }
}

/// Keep the value of a soft stage, collecting its notice otherwise.
fn keep<T>(outcome: StageOutcome<T>, notices: &mut Vec<Notice>) -> Option<T> {
    let (value, notice) = outcome.into_parts();
    notices.extend(notice);
    value
}

fn validation_message(e: CampaignError) -> String {
    match e {
        CampaignError::ValidationError(msg) => msg,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Cursor;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use campaign_core::campaign::{
        Audience, CampaignDuration, Goal, Language, PipelineFlags, Sector, Style, DEFAULT_MODEL,
    };
    use campaign_core::generation::{ImageBlob, ResponsePart};
    use campaign_core::{CampaignResult, ModelResponse, NoticeLevel};

    /// Answers calls from a script and records every prompt it receives.
    struct ScriptedModel {
        replies: Mutex<VecDeque<CampaignResult<ModelResponse>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<CampaignResult<ModelResponse>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.into()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        async fn generate(&self, request: &GenerationRequest) -> CampaignResult<ModelResponse> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CampaignError::Transport("script exhausted".to_string())))
        }
    }

    fn png_response() -> CampaignResult<ModelResponse> {
        let img = image::RgbImage::from_pixel(16, 8, image::Rgb([200, 229, 70]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        Ok(ModelResponse {
            parts: vec![ResponsePart::Image(ImageBlob {
                mime_type: "image/png".to_string(),
                data: out.into_inner(),
            })],
        })
    }

    fn request(sector: Sector, custom: &str, flags: PipelineFlags) -> AnalysisRequest {
        AnalysisRequest {
            sector,
            custom_domain: custom.to_string(),
            budget: 15_000,
            audience: Audience::Age25To34,
            duration: CampaignDuration::OneMonth,
            goal: Goal::Conversion,
            style: Style::Dynamic,
            language: Language::French,
            model: DEFAULT_MODEL.to_string(),
            report_filename: String::new(),
            flags,
        }
    }

    fn pipeline(model: Arc<ScriptedModel>, dir: &tempfile::TempDir) -> AnalysisPipeline {
        let model: Arc<dyn GenerativeModel> = model;
        AnalysisPipeline::new(Some(model), ArtifactStore::new(dir.path()))
    }

    #[tokio::test]
    async fn test_blank_custom_domain_blocks_without_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new(vec![]);
        let mut session = Session::new();

        let report = pipeline(model.clone(), &dir)
            .run(&mut session, &request(Sector::Other, "  ", PipelineFlags::default()))
            .await;

        assert_eq!(report.status, RunStatus::Blocked);
        assert_eq!(report.notices[0].level, NoticeLevel::Warning);
        assert_eq!(report.notices[0].message, "Veuillez préciser votre secteur d'activité");
        assert_eq!(model.calls(), 0);
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credential_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = AnalysisPipeline::new(None, ArtifactStore::new(dir.path()));
        let mut session = Session::new();

        let report = pipeline
            .run(&mut session, &request(Sector::Finance, "", PipelineFlags::default()))
            .await;

        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.notices[0].level, NoticeLevel::Error);
        assert!(report.notices[0].message.contains("GEMINI_API_KEY"));
        assert!(session.last().is_none());
    }

    #[tokio::test]
    async fn test_full_run_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new(vec![
            Ok(ModelResponse::text("Un ROI élevé et un CPA optimisé.")),
            Ok(ModelResponse::text("Tendances du secteur")),
            png_response(),
            png_response(),
        ]);
        let mut session = Session::new();
        let req = request(Sector::Fashion, "", PipelineFlags::default());

        let report = pipeline(model.clone(), &dir).run(&mut session, &req).await;

        assert!(report.is_completed());
        assert!(report.notices.is_empty(), "{:?}", report.notices);
        assert_eq!(model.calls(), 4);

        let last = session.last().unwrap();
        assert_eq!(last.quality, QualityLabel::Good);
        assert_eq!(last.premium_text.as_deref(), Some("Tendances du secteur"));
        assert_eq!(
            last.images,
            vec![ArtifactKind::VisualAsset, ArtifactKind::SummaryBanner]
        );
        assert_eq!(last.celebration, Some(ArtifactKind::Celebration));
        assert_eq!(last.report_filename, "rapport_mode.pdf");

        let entry = &session.history()[0];
        assert_eq!(entry.params, req.parameters().unwrap());
        assert!(entry.premium);
        assert!(dir.path().join("celebration.png").is_file());
        assert!(dir.path().join("generated_asset.png").is_file());
        assert!(dir.path().join("summary_banner.png").is_file());
    }

    #[tokio::test]
    async fn test_prompt_carries_parameters() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new(vec![Ok(ModelResponse::text("Analyse"))]);
        let mut session = Session::new();

        pipeline(model.clone(), &dir)
            .run(&mut session, &request(Sector::Other, "Aéronautique", PipelineFlags::minimal()))
            .await;

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Aéronautique"));
        assert!(prompts[0].contains("15000"));
        assert!(prompts[0].contains("25-34 ans"));
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_session_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new(vec![Err(CampaignError::Transport(
            "connection refused".to_string(),
        ))]);
        let mut session = Session::new();

        let report = pipeline(model.clone(), &dir)
            .run(&mut session, &request(Sector::Finance, "", PipelineFlags::default()))
            .await;

        assert_eq!(report.status, RunStatus::Failed);
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].level, NoticeLevel::Error);
        assert!(report.notices[0].message.contains("connection refused"));
        assert_eq!(model.calls(), 1);
        assert!(session.last().is_none());
        assert!(session.history().is_empty());
    }

    #[tokio::test]
    async fn test_missing_image_degrades_but_records() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new(vec![
            Ok(ModelResponse::text("Campagne rentable")),
            Ok(ModelResponse::text("Je ne peux pas dessiner")),
        ]);
        let mut session = Session::new();
        let flags = PipelineFlags {
            generate_premium_insights: false,
            generate_visual_asset: true,
            generate_summary_banner: false,
        };

        let report = pipeline(model.clone(), &dir)
            .run(&mut session, &request(Sector::Tourism, "", flags))
            .await;

        assert!(report.is_completed());
        assert_eq!(report.notices, vec![Notice::warning(NO_VISUAL_ASSET)]);
        let last = session.last().unwrap();
        assert!(last.images.is_empty());
        assert!(session.history()[0].image.is_none());
    }

    #[tokio::test]
    async fn test_premium_failure_is_a_warning() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new(vec![
            Ok(ModelResponse::text("Analyse")),
            Err(CampaignError::Api {
                status: 429,
                body: "quota".to_string(),
            }),
        ]);
        let mut session = Session::new();
        let flags = PipelineFlags {
            generate_premium_insights: true,
            generate_visual_asset: false,
            generate_summary_banner: false,
        };

        let report = pipeline(model, &dir)
            .run(&mut session, &request(Sector::Finance, "", flags))
            .await;

        assert!(report.is_completed());
        assert_eq!(report.notices.len(), 1);
        assert_eq!(report.notices[0].level, NoticeLevel::Warning);
        assert!(session.last().unwrap().premium_text.is_none());
        assert!(!session.history()[0].premium);
    }

    #[tokio::test]
    async fn test_custom_report_filename_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let model = ScriptedModel::new(vec![Ok(ModelResponse::text("Analyse"))]);
        let mut session = Session::new();
        let mut req = request(Sector::Finance, "", PipelineFlags::minimal());
        req.report_filename = " bilan.pdf ".to_string();

        pipeline(model, &dir).run(&mut session, &req).await;
        assert_eq!(session.last().unwrap().report_filename, "bilan.pdf");
    }
}
