//! Axum route handlers for the analysis API.

use anyhow::Context;
use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::ats::catalogue::RoleKeywordSet;
use crate::ats::scorer::ScoringResult;
use crate::errors::AppError;
use crate::extract::{extract_document, ExtractError};
use crate::state::AppState;

/// Trimmed text shorter than this is rejected without scoring.
pub const MIN_TEXT_CHARS: usize = 5;

pub const TEXT_TOO_SHORT: &str = "Resume text too short";
pub const NO_READABLE_TEXT: &str = "No readable text found in file";

const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AnalyzeResponse {
    pub ats_score: u32,
    pub recommended_role: String,
    pub matched_keywords: Vec<String>,
    pub explanation: String,
}

impl From<ScoringResult> for AnalyzeResponse {
    fn from(result: ScoringResult) -> Self {
        Self {
            ats_score: result.score,
            recommended_role: result.role,
            matched_keywords: result.matched.into_iter().collect(),
            explanation: result.explanation,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<RoleKeywordSet>,
    pub total_keywords: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Scores raw resume text. Text under five characters (after trimming) is
/// answered with an "Unknown" result instead of being scored.
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Json<AnalyzeResponse> {
    if request.text.trim().chars().count() < MIN_TEXT_CHARS {
        info!("Rejected short resume text");
        return Json(ScoringResult::unknown(TEXT_TOO_SHORT).into());
    }

    let result = state.scorer.score(&request.text);
    info!(score = result.score, role = %result.role, "Analyzed resume text");
    Json(result.into())
}

/// POST /analyze-file
///
/// Multipart upload with a single `file` field (pdf, docx, txt or md).
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn handle_analyze_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;
    info!(filename = %filename, size = bytes.len(), "Received resume upload");

    let max_bytes = state.config.max_extracted_bytes;
    let extracted =
        tokio::task::spawn_blocking(move || extract_document(&filename, &bytes, max_bytes))
            .await
            .context("document extraction task failed")?;

    let result = match extracted {
        Ok(text) => state.scorer.score(&text),
        Err(ExtractError::EmptyDocument) => ScoringResult::unknown(NO_READABLE_TEXT),
        Err(e) => return Err(e.into()),
    };

    info!(score = result.score, role = %result.role, "Analyzed resume file");
    Ok(Json(result.into()))
}

/// GET /roles
///
/// Lists the catalogue the service scores against, in tie-break order.
pub async fn handle_list_roles(State(state): State<AppState>) -> Json<RolesResponse> {
    Json(RolesResponse {
        roles: state.catalogue.roles().to_vec(),
        total_keywords: state.catalogue.total_keyword_count(),
    })
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("uploaded file has no filename".to_string()))?;
        let bytes = field.bytes().await?;
        return Ok((filename, bytes));
    }
    Err(AppError::Validation(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}
