//! Content resolution
//!
//! Decides the final plain-text and HTML bodies from the caller's inputs.
//! A Markdown source, when present, always replaces the HTML body but only
//! replaces the text body when the caller left it at the default placeholder.
//! That asymmetry is a compatibility requirement.

use std::{fs, io, path::PathBuf};

use thiserror::Error;

/// Placeholder text body used when the caller provides none
pub const DEFAULT_TEXT_BODY: &str = "This is a test email.";

/// An error that can occur while resolving message content
#[derive(Debug, Error)]
pub enum ContentError {
    /// The Markdown source file does not exist
    #[error("Markdown file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The Markdown source file exists but could not be read
    #[error("Markdown file {} could not be read: {source}", .path.display())]
    SourceUnreadable {
        /// The path that failed to read
        path: PathBuf,
        /// The underlying I/O error
        source: io::Error,
    },
}

/// The caller's raw content inputs
#[derive(Clone, Debug, Default)]
pub struct ContentSpec {
    /// Explicit plain text body
    pub text: Option<String>,

    /// Explicit HTML body
    pub html: Option<String>,

    /// Path of a Markdown file to render as the HTML body
    pub markdown_file: Option<PathBuf>,
}

/// The final body pair used identically for every recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedContent {
    /// The plain text body
    pub text: String,

    /// The HTML body, when one was supplied or rendered
    pub html: Option<String>,
}

/// Resolve the final bodies from `spec`.
///
/// `render` is the Markdown-to-HTML capability; it is only invoked when a
/// Markdown source is present.
///
/// # Errors
/// A missing or unreadable Markdown source fails the whole request.
pub fn resolve(
    spec: &ContentSpec,
    render: impl Fn(&str) -> String,
) -> Result<ResolvedContent, ContentError> {
    let Some(path) = &spec.markdown_file else {
        return Ok(ResolvedContent {
            text: spec
                .text
                .clone()
                .unwrap_or_else(|| DEFAULT_TEXT_BODY.to_string()),
            html: spec.html.clone(),
        });
    };

    let source = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ContentError::SourceNotFound(path.clone()),
        _ => ContentError::SourceUnreadable {
            path: path.clone(),
            source: err,
        },
    })?;

    let text = match &spec.text {
        Some(text) if text != DEFAULT_TEXT_BODY => text.clone(),
        _ => source.clone(),
    };

    Ok(ResolvedContent {
        html: Some(render(&source)),
        text,
    })
}
