//! Role Keyword Catalogue — the ordered role → keyword table every analysis scores against.
//!
//! Built once at startup (built-in table or a JSON file) and shared read-only
//! behind an `Arc`. Role order matters: it drives tie-breaks and the order of
//! the explanation breakdown.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error("failed to read catalogue file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalogue JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalogue must contain at least one role")]
    Empty,

    #[error("catalogue contains a role with a blank name")]
    BlankRole,

    #[error("role '{0}' appears more than once")]
    DuplicateRole(String),

    #[error("role '{0}' has no keywords")]
    NoKeywords(String),

    #[error("role '{0}' has a blank keyword")]
    BlankKeyword(String),
}

/// A role and the keywords that signal it, in catalogue order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleKeywordSet {
    pub role: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalogue {
    roles: Vec<RoleKeywordSet>,
}

const BUILTIN_ROLES: &[(&str, &[&str])] = &[
    (
        "Software Engineer",
        &[
            "python", "java", "c++", "javascript", "typescript", "spring boot", "node.js",
            "react", "angular", "vue", "api", "rest", "microservices", "oop", "docker",
            "kubernetes", "git", "ci/cd", "sql",
        ],
    ),
    (
        "Data Scientist",
        &[
            "python", "r", "sql", "pandas", "numpy", "matplotlib", "seaborn", "scikit-learn",
            "tensorflow", "keras", "machine learning", "deep learning", "statistics",
            "data analysis", "nlp",
        ],
    ),
    (
        "DevOps Engineer",
        &[
            "docker", "kubernetes", "jenkins", "terraform", "ansible", "ci/cd", "aws", "azure",
            "gcp", "monitoring", "prometheus", "grafana", "logging", "linux", "bash",
        ],
    ),
    (
        "Frontend Developer",
        &[
            "html", "css", "javascript", "typescript", "react", "angular", "vue", "next.js",
            "responsive design", "redux", "state management", "axios", "graphql", "testing",
        ],
    ),
    (
        "Backend Developer",
        &[
            "python", "java", "node.js", "spring boot", "django", "flask", "rest api", "graphql",
            "sql", "mysql", "postgresql", "mongodb", "docker", "ci/cd", "git",
        ],
    ),
    (
        "Machine Learning Engineer",
        &[
            "python", "numpy", "pandas", "scikit-learn", "tensorflow", "keras", "pytorch",
            "deep learning", "machine learning", "nlp", "model training", "feature engineering",
        ],
    ),
    (
        "QA Engineer",
        &[
            "manual testing", "automation testing", "selenium", "cypress", "jest", "unit testing",
            "integration testing", "regression testing", "api testing", "performance testing",
            "jira", "test planning", "test scripts",
        ],
    ),
    (
        "Cybersecurity Engineer",
        &[
            "network security", "firewall", "vpn", "ssl", "tls", "encryption",
            "penetration testing", "ethical hacking", "incident response", "siem",
            "cloud security", "secure coding", "owasp", "vulnerability assessment",
        ],
    ),
];

impl RoleCatalogue {
    /// The built-in eight-role catalogue.
    pub fn builtin() -> Self {
        let roles = BUILTIN_ROLES
            .iter()
            .map(|(role, keywords)| RoleKeywordSet {
                role: role.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();
        Self { roles }
    }

    /// Validates role sets and lower-cases every keyword.
    pub fn new(roles: Vec<RoleKeywordSet>) -> Result<Self, CatalogueError> {
        if roles.is_empty() {
            return Err(CatalogueError::Empty);
        }

        let mut seen = HashSet::new();
        let mut normalized = Vec::with_capacity(roles.len());
        for set in roles {
            let role = set.role.trim().to_string();
            if role.is_empty() {
                return Err(CatalogueError::BlankRole);
            }
            if !seen.insert(role.clone()) {
                return Err(CatalogueError::DuplicateRole(role));
            }
            if set.keywords.is_empty() {
                return Err(CatalogueError::NoKeywords(role));
            }
            if set.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(CatalogueError::BlankKeyword(role));
            }
            let keywords = set.keywords.iter().map(|k| k.to_lowercase()).collect();
            normalized.push(RoleKeywordSet { role, keywords });
        }

        Ok(Self { roles: normalized })
    }

    /// Parses `[{"role": .., "keywords": [..]}, ..]`, preserving array order.
    pub fn from_json(json: &str) -> Result<Self, CatalogueError> {
        let roles: Vec<RoleKeywordSet> = serde_json::from_str(json)?;
        Self::new(roles)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogueError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn roles(&self) -> &[RoleKeywordSet] {
        &self.roles
    }

    /// Sum of every role's keyword count; keywords shared by several roles count once per role.
    pub fn total_keyword_count(&self) -> usize {
        self.roles.iter().map(|r| r.keywords.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_role_order() {
        let catalogue = RoleCatalogue::builtin();
        let names: Vec<&str> = catalogue.roles().iter().map(|r| r.role.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Software Engineer",
                "Data Scientist",
                "DevOps Engineer",
                "Frontend Developer",
                "Backend Developer",
                "Machine Learning Engineer",
                "QA Engineer",
                "Cybersecurity Engineer",
            ]
        );
    }

    #[test]
    fn test_builtin_total_counts_shared_keywords_per_role() {
        assert_eq!(RoleCatalogue::builtin().total_keyword_count(), 117);
    }

    #[test]
    fn test_builtin_keywords_are_lowercase() {
        let catalogue = RoleCatalogue::builtin();
        for set in catalogue.roles() {
            for kw in &set.keywords {
                assert_eq!(kw, &kw.to_lowercase(), "{kw} in {}", set.role);
            }
        }
    }

    #[test]
    fn test_from_json_preserves_order_and_lowercases() {
        let json = r#"[
            {"role": "Zeta", "keywords": ["Rust", "Tokio"]},
            {"role": "Alpha", "keywords": ["Go"]}
        ]"#;
        let catalogue = RoleCatalogue::from_json(json).unwrap();
        assert_eq!(catalogue.roles()[0].role, "Zeta");
        assert_eq!(catalogue.roles()[0].keywords, vec!["rust", "tokio"]);
        assert_eq!(catalogue.roles()[1].role, "Alpha");
        assert_eq!(catalogue.total_keyword_count(), 3);
    }

    #[test]
    fn test_empty_catalogue_rejected() {
        assert!(matches!(
            RoleCatalogue::from_json("[]"),
            Err(CatalogueError::Empty)
        ));
    }

    #[test]
    fn test_duplicate_role_rejected() {
        let json = r#"[
            {"role": "Dev", "keywords": ["rust"]},
            {"role": "Dev", "keywords": ["go"]}
        ]"#;
        assert!(matches!(
            RoleCatalogue::from_json(json),
            Err(CatalogueError::DuplicateRole(r)) if r == "Dev"
        ));
    }

    #[test]
    fn test_role_without_keywords_rejected() {
        let json = r#"[{"role": "Dev", "keywords": []}]"#;
        assert!(matches!(
            RoleCatalogue::from_json(json),
            Err(CatalogueError::NoKeywords(_))
        ));
    }

    #[test]
    fn test_blank_keyword_rejected() {
        let json = r#"[{"role": "Dev", "keywords": ["rust", "  "]}]"#;
        assert!(matches!(
            RoleCatalogue::from_json(json),
            Err(CatalogueError::BlankKeyword(_))
        ));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            RoleCatalogue::from_json("{not json"),
            Err(CatalogueError::Parse(_))
        ));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"role": "Dev", "keywords": ["rust"]}}]"#).unwrap();
        let catalogue = RoleCatalogue::from_json_file(file.path()).unwrap();
        assert_eq!(catalogue.roles().len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = RoleCatalogue::from_json_file(Path::new("/nonexistent/roles.json"));
        assert!(matches!(result, Err(CatalogueError::Io(_))));
    }
}
