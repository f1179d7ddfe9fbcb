use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

use crate::domain::{ports::GenerationService, DomainError, Message};
use crate::infrastructure::config::{render, AdvisorPrompts};

/// Headings the feedback prompt asks for, in order.
pub const FEEDBACK_SECTIONS: [&str; 6] = [
    "Summary",
    "Work Experience",
    "Skills",
    "Education",
    "Formatting",
    "Overall Suggestions",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    pub description: String,
    pub faqs: Vec<Faq>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeFeedback {
    pub feedback: String,
    pub sections: Vec<FeedbackSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackSection {
    pub title: String,
    pub points: Vec<String>,
}

/// Career-advice prompts over the generation oracle. Unlike the RAG answer
/// path, failures here are returned as errors.
pub struct AdvisorService {
    llm: Arc<dyn GenerationService>,
    prompts: AdvisorPrompts,
    temperature: f32,
}

impl AdvisorService {
    pub fn new(llm: Arc<dyn GenerationService>, prompts: AdvisorPrompts, temperature: f32) -> Self {
        Self {
            llm,
            prompts,
            temperature,
        }
    }

    /// 3-5 Markdown bullets of job roles matching the user's skills.
    #[instrument(skip(self, user_input), fields(input_len = user_input.len()))]
    pub async fn suggest_roles(&self, user_input: &str) -> Result<String, DomainError> {
        let user_input = non_empty(user_input, "skills or resume text")?;

        let messages = [
            Message::system(&self.prompts.suggest_system),
            Message::user(&self.prompts.suggest_example),
            Message::user(render(&self.prompts.suggest_user, &[("input", user_input)])),
        ];
        let text = self.llm.chat(&messages, self.temperature).await?;
        Ok(text.trim().to_string())
    }

    #[instrument(skip(self, skills))]
    pub async fn role_info(&self, role: &str, skills: &str) -> Result<RoleInfo, DomainError> {
        let role = non_empty(role, "role")?;
        let skills = non_empty(skills, "skills")?;

        let messages = [
            Message::system(&self.prompts.role_info_system),
            Message::user(render(
                &self.prompts.role_info_user,
                &[("role", role), ("skills", skills)],
            )),
        ];
        let text = self.llm.chat(&messages, self.temperature).await?;

        serde_json::from_str(strip_json_fences(&text))
            .map_err(|e| DomainError::generation(format!("role info was not valid JSON: {e}")))
    }

    #[instrument(skip(self, resume_text), fields(input_len = resume_text.len()))]
    pub async fn resume_feedback(&self, resume_text: &str) -> Result<ResumeFeedback, DomainError> {
        let resume_text = non_empty(resume_text, "resume text")?;

        let messages = [
            Message::system(&self.prompts.feedback_system),
            Message::user(render(&self.prompts.feedback_user, &[("resume", resume_text)])),
        ];
        let feedback = self.llm.chat(&messages, self.temperature).await?.trim().to_string();
        let sections = group_feedback(&feedback);

        Ok(ResumeFeedback { feedback, sections })
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::unsupported(format!("no {what} provided")));
    }
    Ok(trimmed)
}

/// Strips ```json ... ``` or ``` ... ``` fences the model may wrap JSON in.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let inner = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"));
    match inner {
        Some(inner) => inner.trim().strip_suffix("```").unwrap_or(inner).trim(),
        None => text,
    }
}

/// Groups feedback lines under the known headings. Lines before the first
/// heading are dropped.
pub fn group_feedback(feedback: &str) -> Vec<FeedbackSection> {
    let mut sections: Vec<FeedbackSection> = Vec::new();

    for line in feedback.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some((title, rest)) = parse_heading(line) {
            let mut points = Vec::new();
            if !rest.is_empty() {
                points.push(rest.to_string());
            }
            sections.push(FeedbackSection {
                title: title.to_string(),
                points,
            });
        } else if let Some(current) = sections.last_mut() {
            let point = line.trim_start_matches(['-', '*', '•']).trim_start();
            current.points.push(point.to_string());
        }
    }

    sections
}

// "2. **Work Experience**:" -> ("Work Experience", "")
fn parse_heading(line: &str) -> Option<(&'static str, &str)> {
    let body = line
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches('.')
        .trim_start_matches(['#', '*', ' '])
        .trim_start();

    FEEDBACK_SECTIONS.iter().find_map(|title| {
        let head = body.get(..title.len())?;
        if !head.eq_ignore_ascii_case(title) {
            return None;
        }
        let rest = &body[title.len()..];
        let after_marks = rest.trim_start_matches(['*', '#']);
        match after_marks.chars().next() {
            None => Some((*title, "")),
            Some(':') => Some((*title, after_marks[1..].trim_start_matches('*').trim())),
            _ => None,
        }
    })
}
