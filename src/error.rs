//! Error types raised while rendering reports and serving requests.

use crate::catalog::UpstreamError;

/// Errors that can occur while building a report document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// `lopdf` rejected an object or content stream while assembling the document.
    #[error("failed to assemble PDF document")]
    Document(#[from] lopdf::Error),
    /// The finished document could not be written into the output buffer.
    #[error("failed to serialize PDF document")]
    Io(#[from] std::io::Error),
    /// The poster bytes could not be decoded.
    #[error("failed to decode poster image")]
    Image(#[from] image::ImageError),
    /// The poster bytes are a valid image but not in a format the report can embed.
    #[error("unsupported poster image: {0}")]
    UnsupportedImage(String),
    /// The report layout options are unusable.
    #[error("invalid report layout: {0}")]
    Layout(String),
}

/// Any failure that aborts a report request.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("catalog request failed")]
    Upstream(#[from] UpstreamError),
    #[error("report rendering failed")]
    Render(#[from] RenderError),
    #[error("report rendering task did not complete")]
    Task(#[from] tokio::task::JoinError),
}

/// Formats `error` followed by every source in its chain.
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
