//! Supporting documents generated alongside a mindmap.
//!
//! The generator itself lives behind [`DocumentGenerator`]; this module only
//! knows the document kinds, their titles and how a batch reports per-document
//! outcomes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::warn;

const TITLE_IDEA_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Prd,
    TechSpec,
    UserFlows,
    Roadmap,
    Other(String),
}

impl DocumentKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "prd" => Self::Prd,
            "techspec" => Self::TechSpec,
            "userflows" => Self::UserFlows,
            "roadmap" => Self::Roadmap,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Prd => "prd",
            Self::TechSpec => "techspec",
            Self::UserFlows => "userflows",
            Self::Roadmap => "roadmap",
            Self::Other(tag) => tag,
        }
    }

    pub fn standard() -> [DocumentKind; 4] {
        [Self::Prd, Self::TechSpec, Self::UserFlows, Self::Roadmap]
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Title for a document about `app_idea`, e.g. `Todo app - Technical Specification`.
pub fn document_title(kind: &DocumentKind, app_idea: &str) -> String {
    let app_name = if app_idea.chars().count() > TITLE_IDEA_MAX_CHARS {
        let head: String = app_idea.chars().take(TITLE_IDEA_MAX_CHARS).collect();
        format!("{head}...")
    } else {
        app_idea.to_string()
    };
    let suffix = match kind {
        DocumentKind::Prd => "Product Requirements Document".to_string(),
        DocumentKind::TechSpec => "Technical Specification".to_string(),
        DocumentKind::UserFlows => "User Flow Descriptions".to_string(),
        DocumentKind::Roadmap => "Implementation Roadmap".to_string(),
        DocumentKind::Other(tag) => capitalize(tag),
    };
    format!("{app_name} - {suffix}")
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRequest {
    pub kind: DocumentKind,
    pub app_idea: String,
    pub answers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("app idea is required")]
    MissingIdea,
    #[error("invalid {0} data received")]
    EmptyContent(DocumentKind),
    #[error("failed to generate {kind}: {message}")]
    Generation { kind: DocumentKind, message: String },
}

/// The service that writes a document, typically a chat-completion call.
pub trait DocumentGenerator {
    fn generate(&self, request: &DocumentRequest) -> Result<GeneratedDocument, DocumentError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentStatus {
    Ready(GeneratedDocument),
    Failed(String),
}

impl DocumentStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// Generates one document, validating the request and the reply.
pub fn generate_document(
    generator: &dyn DocumentGenerator,
    request: &DocumentRequest,
) -> Result<GeneratedDocument, DocumentError> {
    if request.app_idea.trim().is_empty() {
        return Err(DocumentError::MissingIdea);
    }
    let mut document = generator.generate(request)?;
    if document.content.trim().is_empty() {
        return Err(DocumentError::EmptyContent(request.kind.clone()));
    }
    if document.title.trim().is_empty() {
        document.title = format!("Generated {}", request.kind.tag().to_uppercase());
    }
    Ok(document)
}

/// Generates every requested kind. A failure is recorded for that document
/// only and the rest of the batch still runs.
pub fn generate_documents(
    generator: &dyn DocumentGenerator,
    kinds: &[DocumentKind],
    app_idea: &str,
    answers: Option<&BTreeMap<String, String>>,
) -> Vec<(DocumentKind, DocumentStatus)> {
    kinds
        .iter()
        .map(|kind| {
            let request = DocumentRequest {
                kind: kind.clone(),
                app_idea: app_idea.to_string(),
                answers: answers.cloned(),
            };
            let status = match generate_document(generator, &request) {
                Ok(document) => DocumentStatus::Ready(document),
                Err(err) => {
                    warn!(kind = %kind, error = %err, "document generation failed");
                    DocumentStatus::Failed(err.to_string())
                }
            };
            (kind.clone(), status)
        })
        .collect()
}
