// src/models.rs
use crate::errors::{Result, SolverError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| SolverError::UnknownDifficulty(s.to_string()))
    }
}

/// Target languages offered by the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    JavaScript,
    Python,
    #[serde(rename = "C++")]
    Cpp,
    Java,
    TypeScript,
    Go,
    Rust,
}

impl Language {
    /// The fixed catalog, in the order the form lists it.
    pub const CATALOG: [Language; 7] = [
        Language::JavaScript,
        Language::Python,
        Language::Cpp,
        Language::Java,
        Language::TypeScript,
        Language::Go,
        Language::Rust,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::Python => "Python",
            Language::Cpp => "C++",
            Language::Java => "Java",
            Language::TypeScript => "TypeScript",
            Language::Go => "Go",
            Language::Rust => "Rust",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self> {
        Language::CATALOG
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| SolverError::UnknownLanguage(s.to_string()))
    }
}

/// Source file extension shown on the result tab for a language name.
///
/// Works on the echoed string from a payload, so anything outside the
/// catalog falls back to `ts` like the rest of the unknowns.
pub fn file_extension(language: &str) -> &'static str {
    match language {
        "Python" => "py",
        "C++" => "cpp",
        "Java" => "java",
        "Go" => "go",
        "Rust" => "rs",
        _ => "ts",
    }
}

/// A validated problem submission. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionRequest {
    title: String,
    difficulty: Difficulty,
    language: Language,
    problem: String,
}

impl SubmissionRequest {
    /// Builds a request, rejecting a blank title or problem.
    pub fn new(
        title: impl Into<String>,
        difficulty: Difficulty,
        language: Language,
        problem: impl Into<String>,
    ) -> Result<Self> {
        let title = title.into();
        let problem = problem.into();

        if title.trim().is_empty() {
            return Err(SolverError::InvalidSubmission("title must not be empty".to_string()));
        }
        if problem.trim().is_empty() {
            return Err(SolverError::InvalidSubmission("problem must not be empty".to_string()));
        }

        Ok(Self { title, difficulty, language, problem })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn problem(&self) -> &str {
        &self.problem
    }
}

/// Raw form fields as posted by a client, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionForm {
    pub title: String,
    pub difficulty: String,
    pub language: String,
    pub problem: String,
}

impl TryFrom<SubmissionForm> for SubmissionRequest {
    type Error = SolverError;

    fn try_from(form: SubmissionForm) -> Result<Self> {
        let difficulty = form.difficulty.parse()?;
        let language = form.language.parse()?;
        SubmissionRequest::new(form.title, difficulty, language, form.problem)
    }
}

/// What the solve endpoint returns, or what the controller synthesizes on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPayload {
    pub success: bool,
    #[serde(default, alias = "solution", skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

impl ResultPayload {
    /// The markdown body, if there is anything to render.
    pub fn body(&self) -> Option<&str> {
        self.response.as_deref().filter(|r| !r.is_empty())
    }

    /// Message shown as a banner above a successful body.
    pub fn annotation(&self) -> Option<&str> {
        if self.success { self.message.as_deref() } else { None }
    }

    /// Message describing a failed submission.
    pub fn failure(&self) -> Option<&str> {
        if self.success { None } else { self.message.as_deref() }
    }
}
