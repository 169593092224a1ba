use std::collections::BTreeSet;

use crate::ats::scorer::RoleScore;

/// Renders the matched keywords (sorted) and the per-role breakdown (catalogue order).
pub fn format_explanation(matched: &BTreeSet<String>, role_scores: &[RoleScore]) -> String {
    let keywords: Vec<&str> = matched.iter().map(String::as_str).collect();
    let breakdown: Vec<String> = role_scores
        .iter()
        .map(|rs| format!("{}:{}", rs.role, rs.count))
        .collect();

    format!(
        "Matched keywords: {}. Role score breakdown: {}",
        keywords.join(", "),
        breakdown.join(", ")
    )
}
