//! The analysis page: form, results, charts and history.

use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use campaign_core::campaign::model::{BUDGET_DEFAULT, BUDGET_MAX, BUDGET_MIN, BUDGET_STEP};
use campaign_core::campaign::{
    AnalysisRequest, Audience, CampaignDuration, Goal, Language, PipelineFlags, Sector, Style,
    AVAILABLE_MODELS,
};
use campaign_core::charts::{generate_charts, MonthRange, MONTHS};
use campaign_core::generation::missing_credential_error;
use campaign_core::{AnalysisResult, ArtifactKind, CampaignError, Notice, NoticeLevel, Session};
use serde::Deserialize;
use tracing::{debug, info};

use crate::markdown::render_markdown;
use crate::state::AppState;

// ============================================================
// TEMPLATES
// ============================================================

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    has_api_key: bool,
    notices: Vec<NoticeView>,
    form: FormView,
    has_result: bool,
    result: ResultView,
    months: Vec<MonthOption>,
    charts: Vec<ChartView>,
    history: Vec<HistoryView>,
}

struct NoticeView {
    css: &'static str,
    message: String,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        let css = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        Self {
            css,
            message: notice.message.clone(),
        }
    }
}

struct SelectOption {
    value: String,
    label: String,
    selected: bool,
}

impl SelectOption {
    fn new(value: impl ToString, label: impl ToString, selected: bool) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
            selected,
        }
    }
}

/// Form values, prefilled from the last submission.
struct FormView {
    budget: u32,
    budget_min: u32,
    budget_max: u32,
    budget_step: u32,
    sectors: Vec<SelectOption>,
    custom_domain: String,
    audiences: Vec<SelectOption>,
    durations: Vec<SelectOption>,
    goals: Vec<SelectOption>,
    styles: Vec<SelectOption>,
    languages: Vec<SelectOption>,
    models: Vec<SelectOption>,
    report_filename: String,
    premium: bool,
    visual_asset: bool,
    summary_banner: bool,
}

impl FormView {
    fn from_request(req: &AnalysisRequest) -> Self {
        let mut models: Vec<SelectOption> = AVAILABLE_MODELS
            .iter()
            .map(|m| SelectOption::new(m, m, *m == req.model))
            .collect();
        if !AVAILABLE_MODELS.contains(&req.model.as_str()) {
            models.insert(0, SelectOption::new(&req.model, &req.model, true));
        }

        Self {
            budget: req.budget,
            budget_min: BUDGET_MIN,
            budget_max: BUDGET_MAX,
            budget_step: BUDGET_STEP,
            sectors: Sector::ALL
                .iter()
                .map(|s| SelectOption::new(s.label(), s.label(), *s == req.sector))
                .collect(),
            custom_domain: req.custom_domain.clone(),
            audiences: Audience::ALL
                .iter()
                .map(|a| SelectOption::new(a.label(), a.label(), *a == req.audience))
                .collect(),
            durations: CampaignDuration::ALL
                .iter()
                .map(|d| SelectOption::new(d.days(), format!("{} jours", d.days()), *d == req.duration))
                .collect(),
            goals: Goal::ALL
                .iter()
                .map(|g| SelectOption::new(g.label(), g.label(), *g == req.goal))
                .collect(),
            styles: Style::ALL
                .iter()
                .map(|s| SelectOption::new(s.label(), s.label(), *s == req.style))
                .collect(),
            languages: Language::ALL
                .iter()
                .map(|l| SelectOption::new(l.label(), l.label(), *l == req.language))
                .collect(),
            models,
            report_filename: req.report_filename.clone(),
            premium: req.flags.generate_premium_insights,
            visual_asset: req.flags.generate_visual_asset,
            summary_banner: req.flags.generate_summary_banner,
        }
    }
}

struct ImageView {
    url: String,
    caption: &'static str,
}

#[derive(Default)]
struct ResultView {
    quality: String,
    headline: String,
    badge: String,
    domain: String,
    budget: u32,
    model: String,
    analysis_html: String,
    has_premium: bool,
    premium_html: String,
    has_celebration: bool,
    celebration_url: String,
    images: Vec<ImageView>,
    report_filename: String,
}

impl ResultView {
    fn from_result(result: &AnalysisResult) -> Self {
        let version = result.created_at.timestamp_millis();
        let url = |kind: ArtifactKind| format!("/artifacts/{}?v={}", kind.file_name(), version);

        Self {
            quality: result.quality.as_str().to_string(),
            headline: result.quality.headline().to_string(),
            badge: result.quality.badge().to_string(),
            domain: result.params.domain.clone(),
            budget: result.params.budget,
            model: result.model.clone(),
            analysis_html: render_markdown(&result.generated_text),
            has_premium: result.premium_text.is_some(),
            premium_html: result
                .premium_text
                .as_deref()
                .map(render_markdown)
                .unwrap_or_default(),
            has_celebration: result.celebration.is_some(),
            celebration_url: result.celebration.map(url).unwrap_or_default(),
            images: result
                .images
                .iter()
                .map(|kind| ImageView {
                    url: url(*kind),
                    caption: match kind {
                        ArtifactKind::SummaryBanner => "Bannière de synthèse",
                        _ => "Visuel publicitaire",
                    },
                })
                .collect(),
            report_filename: result.report_filename.clone(),
        }
    }
}

struct MonthOption {
    value: usize,
    is_start: bool,
    is_end: bool,
}

struct ChartView {
    id: &'static str,
    figure: String,
}

struct HistoryView {
    number: usize,
    timestamp: String,
    domain: String,
    budget: u32,
    audience: &'static str,
    duration: u32,
    goal: &'static str,
    quality: &'static str,
    premium: &'static str,
    image: &'static str,
}

// ============================================================
// REQUEST TYPES
// ============================================================

/// Optional month window for the charts.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl MonthQuery {
    /// `Ok(None)` when no window was asked for.
    pub fn range(&self) -> Result<Option<MonthRange>, String> {
        match (self.start, self.end) {
            (None, None) => Ok(None),
            (start, end) => MonthRange::new(start.unwrap_or(1), end.unwrap_or(MONTHS))
                .map(Some)
                .map_err(|e| match e {
                    CampaignError::ValidationError(message) => message,
                    other => other.to_string(),
                }),
        }
    }
}

/// Fields posted by the analysis form. Choice fields carry display labels.
#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub sector: String,
    #[serde(default)]
    pub custom_domain: String,
    pub budget: u32,
    pub audience: String,
    pub duration: u32,
    pub goal: String,
    pub style: String,
    pub language: String,
    pub model: String,
    #[serde(default)]
    pub report_filename: String,
    pub premium: Option<String>,
    pub visual_asset: Option<String>,
    pub summary_banner: Option<String>,
}

impl AnalyzeForm {
    pub fn into_request(self) -> Result<AnalysisRequest, String> {
        fn choice<T>(value: Option<T>, field: &str, raw: &str) -> Result<T, String> {
            value.ok_or_else(|| format!("Valeur inconnue pour {} : {}", field, raw))
        }

        let duration = CampaignDuration::try_from(self.duration).map_err(|e| e.to_string())?;
        let model = if self.model.trim().is_empty() {
            return Err("Aucun modèle sélectionné".to_string());
        } else {
            self.model.trim().to_string()
        };

        Ok(AnalysisRequest {
            sector: choice(Sector::from_label(&self.sector), "secteur", &self.sector)?,
            custom_domain: self.custom_domain,
            budget: self.budget,
            audience: choice(Audience::from_label(&self.audience), "audience", &self.audience)?,
            duration,
            goal: choice(Goal::from_label(&self.goal), "objectif", &self.goal)?,
            style: choice(Style::from_label(&self.style), "style", &self.style)?,
            language: choice(Language::from_label(&self.language), "langue", &self.language)?,
            model,
            report_filename: self.report_filename,
            flags: PipelineFlags {
                generate_premium_insights: self.premium.is_some(),
                generate_visual_asset: self.visual_asset.is_some(),
                generate_summary_banner: self.summary_banner.is_some(),
            },
        })
    }
}

// ============================================================
// HANDLERS
// ============================================================

/// GET / - Render the page for the current session.
pub async fn index(State(state): State<AppState>, Query(query): Query<MonthQuery>) -> Response {
    let session = state.session.lock().await;
    render_page(&state, &session, None, Vec::new(), &query)
}

/// POST /analyze - Run the pipeline and render the outcome.
pub async fn analyze(State(state): State<AppState>, Form(form): Form<AnalyzeForm>) -> Response {
    let request = match form.into_request() {
        Ok(r) => r,
        Err(message) => {
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(format!("Error: {}", message)))
                .into_response()
        }
    };

    let mut session = state.session.lock().await;
    let report = state.pipeline.run(&mut session, &request).await;
    info!(status = ?report.status, notices = report.notices.len(), "Analysis request handled");

    render_page(&state, &session, Some(&request), report.notices, &MonthQuery::default())
}

/// POST /reset - Start a new analysis; history is kept.
pub async fn reset(State(state): State<AppState>) -> Redirect {
    state.session.lock().await.clear_last();
    debug!("Last analysis cleared");
    Redirect::to("/")
}

// ============================================================
// HELPERS
// ============================================================

fn default_request(state: &AppState, session: &Session) -> AnalysisRequest {
    let mut req = AnalysisRequest {
        sector: Sector::General,
        custom_domain: String::new(),
        budget: BUDGET_DEFAULT,
        audience: Audience::Age25To34,
        duration: CampaignDuration::OneMonth,
        goal: Goal::Acquisition,
        style: Style::Formal,
        language: Language::French,
        model: state.default_model.to_string(),
        report_filename: String::new(),
        flags: PipelineFlags::default(),
    };
    if let Some(last) = session.last() {
        req.budget = last.params.budget;
        req.audience = last.params.audience;
        req.duration = last.params.duration;
        req.goal = last.params.goal;
        req.style = last.style;
        req.language = last.language;
        req.model = last.model.clone();
        match Sector::ALL.into_iter().find(|s| s.label() == last.params.domain) {
            Some(sector) => req.sector = sector,
            None => {
                req.sector = Sector::Other;
                req.custom_domain = last.params.domain.clone();
            }
        }
        req.report_filename = last.report_filename.clone();
    }
    req
}

fn render_page(
    state: &AppState,
    session: &Session,
    submitted: Option<&AnalysisRequest>,
    mut notices: Vec<Notice>,
    query: &MonthQuery,
) -> Response {
    let has_api_key = state.pipeline.has_model();
    if !has_api_key {
        notices.insert(0, Notice::error(missing_credential_error().to_string()));
    }

    let range = match query.range() {
        Ok(range) => range,
        Err(message) => {
            notices.push(Notice::warning(message));
            None
        }
    };
    let shown = range.unwrap_or_else(MonthRange::full);

    let request = match submitted {
        Some(req) => req.clone(),
        None => default_request(state, session),
    };

    let last = session.last();
    let charts = last
        .map(|r| {
            generate_charts(r.params.budget, r.params.duration, r.params.goal, range)
                .iter()
                .map(|chart| ChartView {
                    id: chart.id,
                    figure: chart.to_plotly().to_string(),
                })
                .collect()
        })
        .unwrap_or_default();

    let history = session
        .history_newest_first()
        .map(|(number, entry)| HistoryView {
            number,
            timestamp: entry.timestamp.format("%d/%m/%Y %H:%M").to_string(),
            domain: entry.domain.clone(),
            budget: entry.params.budget,
            audience: entry.params.audience.label(),
            duration: entry.params.duration.days(),
            goal: entry.params.goal.label(),
            quality: entry.quality.as_str(),
            premium: if entry.premium { "Oui" } else { "Non" },
            image: if entry.image.is_some() { "Oui" } else { "Non" },
        })
        .collect();

    let template = IndexTemplate {
        has_api_key,
        notices: notices.iter().map(NoticeView::from).collect(),
        form: FormView::from_request(&request),
        has_result: last.is_some(),
        result: last.map(ResultView::from_result).unwrap_or_default(),
        months: (1..=MONTHS)
            .map(|value| MonthOption {
                value,
                is_start: value == shown.start(),
                is_end: value == shown.end(),
            })
            .collect(),
        charts,
        history,
    };

    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("Template error: {}", e))).into_response()
        }
    }
}
