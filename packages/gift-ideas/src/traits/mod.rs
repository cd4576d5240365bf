//! Seams to the external providers.
//!
//! - [`completion::CompletionProvider`] - generative text model
//! - [`search::SearchProvider`] - product search API
//!
//! Real implementations wrap `gemini-client` and `paapi-client`; mocks live
//! in [`crate::testing`].

pub mod completion;
pub mod search;
