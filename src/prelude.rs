//! Convenience re-exports of commonly used types.
//!
//! `use betterselect::prelude::*;` brings in everything needed to describe,
//! configure and run a control.

pub use crate::options::{SelectOptions, SelectOptionsBuilder};
pub use crate::query::{FetchFuture, QueryEngine, QueryError, RemoteConfig, Transport};
pub use crate::render::{DefaultRenderer, Renderer, TemplateRenderer, View};
pub use crate::runtime::Session;
pub use crate::template::{Template, TemplateNode};
pub use crate::theme::{ColorTheme, register_theme};
#[cfg(feature = "http")]
pub use crate::transport::HttpTransport;
pub use crate::tui::{Event, Tui};
pub use crate::*;
pub use std::sync::Arc;
