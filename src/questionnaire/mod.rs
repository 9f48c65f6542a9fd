//! Questionnaire operations and store layout.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                   QuestionnaireService                       │
//! │   list / get / get_published / create / create_with_id /     │
//! │   update / delete / publish / unpublish                      │
//! │                                                              │
//! │  ┌─────────────────────┐      ┌──────────────────────────┐   │
//! │  │       paths         │      │     DocumentStore        │   │
//! │  │ (uid-scoped layout) │ ───▶ │ (one call per operation) │   │
//! │  └─────────────────────┘      └──────────────────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clients store documents shaped like
//! `{"uuid", "name", "sections": [{"name", "questions": [{"type", "question", "answer"}]}]}`,
//! but nothing here depends on that shape. Bodies are not validated and
//! reads return whatever the store holds.

pub mod paths;
mod service;

pub use service::{QuestionnaireService, ID_FIELD};
