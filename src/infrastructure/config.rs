use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_APP_CONFIG: &str = "config/app.yaml";
pub const DEFAULT_PROMPTS_CONFIG: &str = "config/prompts.yaml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid value for {key}: {value}")]
    InvalidEnv { key: String, value: String },
}

/// Runtime settings plus prompt copy, loaded together at startup.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: PromptsConfig,
}

impl AppConfig {
    /// Reads `APP_CONFIG` / `PROMPTS_CONFIG` (or the default paths), falling back
    /// to built-in defaults for files that do not exist, then applies
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let app_path = std::env::var("APP_CONFIG").unwrap_or_else(|_| DEFAULT_APP_CONFIG.into());
        let prompts_path =
            std::env::var("PROMPTS_CONFIG").unwrap_or_else(|_| DEFAULT_PROMPTS_CONFIG.into());

        let mut app = Self {
            config: read_yaml_or_default(Path::new(&app_path))?,
            prompts: read_yaml_or_default(Path::new(&prompts_path))?,
        };
        app.config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(app)
    }
}

fn read_yaml_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if !path.exists() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(T::default());
    }
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub embedding: EmbeddingConfig,
    pub llm: LlmConfig,
    pub rag: RagConfig,
}

impl Config {
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SERVER_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                key: "SERVER_PORT".into(),
                value: port,
            })?;
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.llm.endpoint = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }
        if let Some(url) = lookup("OLLAMA_EMBEDDINGS_URL") {
            self.embedding.endpoint = url;
        }
        if let Some(model) = lookup("EMBEDDING_MODEL") {
            self.embedding.model = model;
        }
        if let Some(dir) = lookup("INDEX_DIR") {
            self.rag.index_dir = dir.into();
        }
        if let Some(path) = lookup("CORPUS_PATH") {
            self.rag.corpus_path = Some(path.into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub endpoint: String,
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/embeddings".to_string(),
            model: "nomic-embed-text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Shown in error text returned to clients.
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub stream: bool,
    /// No timeout when unset.
    pub timeout_seconds: Option<u64>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "Ollama".to_string(),
            endpoint: "http://localhost:11434/api/chat".to_string(),
            model: "llama3:8b".to_string(),
            temperature: 0.7,
            stream: true,
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub top_k: usize,
    pub index_dir: PathBuf,
    pub index_file: String,
    pub metadata_file: String,
    pub corpus_path: Option<PathBuf>,
    /// Texts per embedding request during builds; one at a time when unset.
    pub batch_size: Option<usize>,
}

impl RagConfig {
    pub fn index_path(&self) -> PathBuf {
        self.index_dir.join(&self.index_file)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.index_dir.join(&self.metadata_file)
    }
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            index_dir: PathBuf::from("vector_store"),
            index_file: "index.bin".to_string(),
            metadata_file: "metadata.json".to_string(),
            corpus_path: None,
            batch_size: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub rag: RagPrompts,
    pub advisor: AdvisorPrompts,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    /// Placeholders: `{context}`, `{question}`.
    pub answer: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            answer: "You are ResumeBot. You are given context from candidate resumes below.\n\n\
                     Context:\n{context}\n\n\
                     Answer the following question using only the information above:\n\n\
                     Question: {question}\n"
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvisorPrompts {
    pub suggest_system: String,
    pub suggest_example: String,
    /// Placeholder: `{input}`.
    pub suggest_user: String,
    pub role_info_system: String,
    /// Placeholders: `{role}`, `{skills}`.
    pub role_info_user: String,
    pub feedback_system: String,
    /// Placeholder: `{resume}`.
    pub feedback_user: String,
}

impl Default for AdvisorPrompts {
    fn default() -> Self {
        Self {
            suggest_system: "You are CareerBot, an expert career advisor. \
                Translate a user's skills and experiences into personalized job role suggestions. \
                Always reference specific user skills or experiences. \
                For each role, emit a Markdown bullet like:\n\n\
                \x20 **Role Title**: short explanation  \n\
                \x20 Required Skills: comma-separated list of the most important skills  \n\n\
                Respond with 3-5 such bullets, no extra conclusion."
                .to_string(),
            suggest_example: "**Example 1:**\n\
                **Data Analyst**: Your experience with Excel and SQL showcases strong analytical capabilities. \
                This role leverages those skills to derive actionable insights.  \n\
                Required Skills: Excel, SQL, Python\n\n\
                **Example 2:**\n\
                **Technical Writer**: Your clear documentation during past projects highlights your ability \
                to translate complex concepts. In this role, you'd produce precise technical guides.  \n\
                Required Skills: Writing, Attention to Detail, Markdown\n\n---"
                .to_string(),
            suggest_user: "Here is the user's skills and experiences:\n{input}\n\n\
                Based on this, suggest 3 to 5 career roles as bullet points following the format above."
                .to_string(),
            role_info_system: "You are CareerBot. \
                Given a job role and a user's skills, output ONLY valid JSON with two keys:\n\
                1) description: a 2-3 sentence overview of the role\n\
                2) faqs: an array of exactly 3 {question, answer} pairs about the role\n"
                .to_string(),
            role_info_user: "Role: {role}\nUser skills: {skills}\n\nRespond ONLY with JSON."
                .to_string(),
            feedback_system: "You are CareerBot, a resume reviewer. \
                Give concise, actionable feedback under these numbered headings, in this order: \
                1. Summary, 2. Work Experience, 3. Skills, 4. Education, 5. Formatting, \
                6. Overall Suggestions. Put each point on its own line."
                .to_string(),
            feedback_user: "Here is the resume:\n{resume}\n\nReview it using the headings above."
                .to_string(),
        }
    }
}

/// Substitutes `{name}` placeholders in one pass, so substituted values are
/// never rescanned. Unknown placeholders are left as written.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match vars.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_render_substitutes_once() {
        let out = render(
            "Context:\n{context}\nQuestion: {question}",
            &[("context", "literal {question} here"), ("question", "why?")],
        );
        assert_eq!(out, "Context:\nliteral {question} here\nQuestion: why?");
    }

    #[test]
    fn test_render_keeps_unknown_placeholders() {
        let out = render("pairs of {question, answer} and {", &[("question", "x")]);
        assert_eq!(out, "pairs of {question, answer} and {");
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SERVER_PORT", "9000"),
            ("OLLAMA_URL", "http://127.0.0.1:11434/v1/chat/completions"),
            ("INDEX_DIR", "/tmp/idx"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.llm.endpoint, "http://127.0.0.1:11434/v1/chat/completions");
        assert_eq!(config.rag.index_path(), PathBuf::from("/tmp/idx/index.bin"));
        assert_eq!(config.embedding.model, "nomic-embed-text");
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(|k| (k == "SERVER_PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: Config = serde_yaml::from_str("rag:\n  top_k: 3\nllm:\n  stream: false\n").unwrap();
        assert_eq!(config.rag.top_k, 3);
        assert_eq!(config.rag.metadata_file, "metadata.json");
        assert!(!config.llm.stream);
        assert_eq!(config.llm.model, "llama3:8b");
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let prompts: PromptsConfig =
            read_yaml_or_default(Path::new("/nonexistent/prompts.yaml")).unwrap();
        assert!(prompts.rag.answer.contains("{context}"));
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_APP_CONFIG);
        let config: Config = read_yaml_or_default(&path).unwrap();
        let defaults = Config::default();

        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.cors.allowed_origins, defaults.cors.allowed_origins);
        assert_eq!(config.llm.endpoint, defaults.llm.endpoint);
        assert_eq!(config.rag.index_path(), defaults.rag.index_path());
        assert!(config.rag.corpus_path.is_none());
    }
}
