#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Outgoing email dispatch: validated recipients, templated bodies and an
//! optional attachment, delivered through a pluggable transport.

pub mod domain;
pub mod infrastructure;
