//! consult-lens: document-aware sentiment and relevance analysis for
//! public consultation comments.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
