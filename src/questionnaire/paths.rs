//! Store layout.
//!
//! ```text
//! /questionnaires/{uid}        one user's questionnaires, keyed by id
//! /questionnaires/{uid}/{id}   a single private questionnaire
//! /published/{id}              public copies, no owner reference
//! ```

use crate::store::StorePath;

const QUESTIONNAIRES: &str = "questionnaires";
const PUBLISHED: &str = "published";

/// Namespace holding all questionnaires of `uid`.
pub fn user_questionnaires(uid: &str) -> StorePath {
    StorePath::root().child(QUESTIONNAIRES).child(uid)
}

/// A single private questionnaire of `uid`.
pub fn user_questionnaire(uid: &str, id: &str) -> StorePath {
    user_questionnaires(uid).child(id)
}

/// A published questionnaire.
pub fn published_questionnaire(id: &str) -> StorePath {
    StorePath::root().child(PUBLISHED).child(id)
}
