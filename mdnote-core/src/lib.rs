//! Core of the markdown annotator: rendering with a line map back to the
//! source, the selection reducer, the annotation store and citation export.
//!
//! Nothing in this crate talks to a terminal. The `mdnote` binary feeds it
//! decoded key actions and draws what it returns.

pub mod ast;
pub mod citation;
pub mod error;
pub mod line_index;
pub mod parse;
pub mod render;
pub mod selection;
pub mod store;
pub mod style;
pub mod types;
pub mod wrap;

pub use error::{ParseError, StoreError};
pub use line_index::{LineIndex, SourceDocument};
pub use render::{render, RenderedDocument, RenderedLine, Renderer};
pub use selection::{Action, Controller, Effect, Env, Mode, Pane};
pub use store::AnnotationStore;
pub use types::{AnnotationFile, Comment, SourceRange};
