// src/core/mod.rs

pub mod cancel;
pub mod clock;
pub mod html;
pub mod humanize;
pub mod net;
pub mod sanitize;

pub use cancel::CancelToken;
pub use html::{Document, Element};
