//! Role relevance matching: decides whether a posting title denotes an
//! engineering or finance role worth tracking.

/// Keywords used to determine if a posting is related to engineering or
/// finance roles. Matching is case-insensitive substring containment.
pub const DEFAULT_ROLE_KEYWORDS: &[&str] = &[
    "software engineer",
    "software developer",
    "frontend engineer",
    "backend engineer",
    "data engineer",
    "platform engineer",
    "devops",
    "financial analyst",
    "investment analyst",
    "quantitative analyst",
];

/// Pure, deterministic title matcher. No tokenization, no stemming: a title
/// is relevant iff it contains one of the keyword phrases.
#[derive(Debug, Clone)]
pub struct RoleMatcher {
    keywords: Vec<String>,
}

impl Default for RoleMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_ROLE_KEYWORDS.iter().map(|k| k.to_string()))
    }
}

impl RoleMatcher {
    pub fn new(keywords: impl IntoIterator<Item = String>) -> Self {
        Self {
            keywords: keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn matches(&self, title: &str) -> bool {
        let title_lower = title.to_lowercase();
        self.keywords.iter().any(|k| title_lower.contains(k))
    }
}
