//! ATS Scoring — keyword coverage of a resume against the role catalogue.
//!
//! Default: `KeywordAtsScorer` (exact lower-case substring containment).
//! `AppState` holds an `Arc<dyn AtsScorer>` so handlers never depend on the backend.
//!
//! Algorithm:
//! 1. Lower-case the whole text (the token list is only reported in logs).
//! 2. For each role, in catalogue order, count keywords that occur as substrings.
//! 3. matched = deduplicated set of every keyword found, across all roles
//! 4. score = min(100, round_half_even(|matched| / total_keyword_count × 100))
//! 5. recommended role = highest count, earliest role on ties

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::ats::catalogue::RoleCatalogue;
use crate::ats::explanation::format_explanation;
use crate::ats::normalizer::normalize;

/// Role reported when no analysis could run.
pub const UNKNOWN_ROLE: &str = "Unknown";

/// Number of the role's keywords found in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleScore {
    pub role: String,
    pub count: usize,
}

/// Outcome of scoring one resume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringResult {
    pub score: u32, // 0 – 100
    pub role: String,
    pub matched: BTreeSet<String>,
    pub explanation: String,
    pub role_scores: Vec<RoleScore>, // catalogue order
}

impl ScoringResult {
    /// Zero-score result for input that never reached the scorer.
    pub fn unknown(explanation: impl Into<String>) -> Self {
        Self {
            score: 0,
            role: UNKNOWN_ROLE.to_string(),
            matched: BTreeSet::new(),
            explanation: explanation.into(),
            role_scores: Vec::new(),
        }
    }
}

pub trait AtsScorer: Send + Sync {
    fn score(&self, text: &str) -> ScoringResult;
}

pub struct KeywordAtsScorer {
    catalogue: Arc<RoleCatalogue>,
}

impl KeywordAtsScorer {
    pub fn new(catalogue: Arc<RoleCatalogue>) -> Self {
        Self { catalogue }
    }
}

impl AtsScorer for KeywordAtsScorer {
    fn score(&self, text: &str) -> ScoringResult {
        score_text(text, &self.catalogue)
    }
}

/// Scores `text` against `catalogue`. Total over every input, including "".
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn score_text(text: &str, catalogue: &RoleCatalogue) -> ScoringResult {
    let normalized = normalize(text);
    let (matched, role_scores) = match_keywords(&normalized.lowered, catalogue);
    let score = compute_ats_score(matched.len(), catalogue.total_keyword_count());
    let role = recommend_role(&role_scores)
        .unwrap_or(UNKNOWN_ROLE)
        .to_string();
    let explanation = format_explanation(&matched, &role_scores);

    debug!(
        tokens = normalized.tokens.len(),
        matched = matched.len(),
        score,
        role = %role,
        "Scored resume text"
    );

    ScoringResult {
        score,
        role,
        matched,
        explanation,
        role_scores,
    }
}

/// Substring scan of the lower-cased text. Returns the global matched set and
/// per-role counts in catalogue order.
pub fn match_keywords(
    lowered: &str,
    catalogue: &RoleCatalogue,
) -> (BTreeSet<String>, Vec<RoleScore>) {
    let mut matched = BTreeSet::new();
    let mut role_scores = Vec::with_capacity(catalogue.roles().len());

    for set in catalogue.roles() {
        let mut count = 0;
        for keyword in &set.keywords {
            if lowered.contains(keyword.as_str()) {
                count += 1;
                matched.insert(keyword.clone());
            }
        }
        role_scores.push(RoleScore {
            role: set.role.clone(),
            count,
        });
    }

    (matched, role_scores)
}

/// Percentage of catalogue coverage, rounded half-to-even and capped at 100.
pub fn compute_ats_score(matched: usize, total_keywords: usize) -> u32 {
    if total_keywords == 0 {
        return 0;
    }
    let pct = (matched as f64 / total_keywords as f64 * 100.0).round_ties_even();
    pct.clamp(0.0, 100.0) as u32
}

/// Highest-scoring role; the first one in catalogue order wins a tie.
///
/// `Iterator::max_by_key` keeps the *last* maximum, so this folds explicitly.
pub fn recommend_role(role_scores: &[RoleScore]) -> Option<&str> {
    let mut best: Option<&RoleScore> = None;
    for rs in role_scores {
        match best {
            Some(b) if rs.count <= b.count => {}
            _ => best = Some(rs),
        }
    }
    best.map(|rs| rs.role.as_str())
}
