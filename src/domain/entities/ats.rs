use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, Result};

/// Keyword coverage of a resume, as an applicant tracking system would see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsReport {
    /// 0 – 100
    pub score: u32,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Scores `resume_text` against `keywords`.
///
/// Matching is case-insensitive and token based: a keyword matches when its
/// tokens appear contiguously in the resume. Duplicate keywords count once,
/// keeping the first spelling.
pub fn score_keywords(resume_text: &str, keywords: &[String]) -> Result<AtsReport> {
    let mut seen: Vec<String> = Vec::new();
    let mut unique: Vec<&str> = Vec::new();
    for keyword in keywords.iter().map(|k| k.trim()).filter(|k| !k.is_empty()) {
        let folded = keyword.to_lowercase();
        if !seen.contains(&folded) {
            seen.push(folded);
            unique.push(keyword);
        }
    }

    if unique.is_empty() {
        return Err(DomainError::unsupported("no keywords to score against"));
    }

    let resume_tokens = tokenize(resume_text);
    let (matched, missing): (Vec<&str>, Vec<&str>) = unique
        .into_iter()
        .partition(|keyword| contains_sequence(&resume_tokens, &tokenize(keyword)));

    let total = matched.len() + missing.len();
    let score = ((matched.len() as f64 / total as f64) * 100.0).round() as u32;

    Ok(AtsReport {
        score,
        matched: matched.into_iter().map(String::from).collect(),
        missing: missing.into_iter().map(String::from).collect(),
    })
}

// `+`, `#` and inner dots stay in tokens so "C++", "C#" and "Node.js" survive.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn contains_sequence(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
