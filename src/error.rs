//! Error types for the fallible edges of the crate.
//!
//! Color math and color state never fail; invalid input there is a silent
//! no-op. Errors only come from the host: terminal setup, the event channel,
//! and startup configuration.

use miette::{Diagnostic, SourceSpan};
use std::{
    error::Error,
    fmt::{Display, Formatter, Result},
};

#[derive(Debug, Diagnostic)]
pub enum ChromaError {
    #[diagnostic(code(chromasync::terminal), url(docsrs))]
    Terminal {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        err_span: SourceSpan,
        msg: String,
    },

    #[diagnostic(code(chromasync::io), url(docsrs))]
    Io {
        #[source_code]
        src: String,
        #[label("io error occurred here")]
        err_span: SourceSpan,
        msg: String,
    },

    #[diagnostic(
        code(chromasync::config),
        url(docsrs),
        help("colors are written as #rrggbb, themes as `light` or `dark`")
    )]
    Config {
        key: String,
        #[source_code]
        src: String,
        #[label("invalid value")]
        err_span: SourceSpan,
        msg: String,
    },

    #[diagnostic(code(chromasync::event), url(docsrs))]
    Event {
        #[source_code]
        src: String,
        #[label("event error occurred here")]
        err_span: SourceSpan,
        msg: String,
    },

    #[diagnostic(code(chromasync::channel), url(docsrs))]
    ChannelClosed {
        #[source_code]
        src: String,
        #[label("channel closed")]
        err_span: SourceSpan,
    },
}

pub type ChromaResult<T> = miette::Result<T>;

impl Display for ChromaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            ChromaError::Terminal { msg, .. } => write!(f, "Terminal error: {}", msg),
            ChromaError::Io { msg, .. } => write!(f, "IO error: {}", msg),
            ChromaError::Config { key, msg, .. } => {
                write!(f, "Configuration error in {}: {}", key, msg)
            }
            ChromaError::Event { msg, .. } => write!(f, "Event error: {}", msg),
            ChromaError::ChannelClosed { .. } => write!(f, "Channel closed"),
        }
    }
}

impl Error for ChromaError {}

impl ChromaError {
    pub fn terminal(
        src: impl Into<String>,
        err_span: impl Into<SourceSpan>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Terminal {
            src: src.into(),
            err_span: err_span.into(),
            msg: msg.into(),
        }
    }

    pub fn io(
        src: impl Into<String>,
        err_span: impl Into<SourceSpan>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Io {
            src: src.into(),
            err_span: err_span.into(),
            msg: msg.into(),
        }
    }

    /// Configuration error spanning the whole offending value
    pub fn config(key: impl Into<String>, value: impl Into<String>, msg: impl Into<String>) -> Self {
        let src = value.into();
        let err_span = (0, src.len()).into();
        Self::Config {
            key: key.into(),
            src,
            err_span,
            msg: msg.into(),
        }
    }

    pub fn event(
        src: impl Into<String>,
        err_span: impl Into<SourceSpan>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Event {
            src: src.into(),
            err_span: err_span.into(),
            msg: msg.into(),
        }
    }

    pub fn channel_closed(src: impl Into<String>, err_span: impl Into<SourceSpan>) -> Self {
        Self::ChannelClosed {
            src: src.into(),
            err_span: err_span.into(),
        }
    }
}
