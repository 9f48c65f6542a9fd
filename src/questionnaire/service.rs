//! Questionnaire operations.
//!
//! Each operation issues exactly one store call. Authentication happens before
//! these functions are reached; they only receive the verified [`Identity`]
//! to scope private paths.
//!
//! Documents are opaque JSON. Bodies are written as received and reads are
//! returned as stored, whatever their shape.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use super::paths::{published_questionnaire, user_questionnaire, user_questionnaires};
use crate::error::QuestionnaireError;
use crate::identity::Identity;
use crate::store::DocumentStore;

/// Field the explicit-id create path writes the generated id into.
pub const ID_FIELD: &str = "uuid";

/// Service implementing the questionnaire operations on top of a
/// [`DocumentStore`].
pub struct QuestionnaireService<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> QuestionnaireService<S> {
    /// Create a new service over the given store.
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Create a new service sharing an existing store handle.
    pub fn from_shared(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All questionnaires owned by `identity` keyed by id, or `None` if they
    /// have none.
    pub async fn list(&self, identity: &Identity) -> Result<Option<Value>, QuestionnaireError> {
        let path = user_questionnaires(&identity.uid);
        Ok(self.store.read(&path).await?)
    }

    /// One of `identity`'s questionnaires.
    pub async fn get(
        &self,
        identity: &Identity,
        id: &str,
    ) -> Result<Option<Value>, QuestionnaireError> {
        let path = user_questionnaire(&identity.uid, id);
        Ok(self.store.read(&path).await?)
    }

    /// A published questionnaire. Requires no identity.
    pub async fn get_published(&self, id: &str) -> Result<Option<Value>, QuestionnaireError> {
        let path = published_questionnaire(id);
        Ok(self.store.read(&path).await?)
    }

    /// Append a questionnaire under a store-generated key and return the key.
    ///
    /// The key is not written back into the document.
    pub async fn create(
        &self,
        identity: &Identity,
        questionnaire: Value,
    ) -> Result<String, QuestionnaireError> {
        let path = user_questionnaires(&identity.uid);
        let key = self.store.push(&path, questionnaire).await?;
        debug!(uid = %identity.uid, key = %key, "questionnaire appended");
        Ok(key)
    }

    /// Store a questionnaire under a freshly generated id and return the id.
    ///
    /// When the body is an object the id is also written into its
    /// [`ID_FIELD`], overriding any value the client sent. Other bodies are
    /// stored unchanged.
    pub async fn create_with_id(
        &self,
        identity: &Identity,
        mut questionnaire: Value,
    ) -> Result<String, QuestionnaireError> {
        let id = Uuid::new_v4().to_string();
        if let Value::Object(fields) = &mut questionnaire {
            fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        }

        let path = user_questionnaire(&identity.uid, &id);
        self.store.set(&path, questionnaire).await?;
        debug!(uid = %identity.uid, id = %id, "questionnaire created");
        Ok(id)
    }

    /// Overwrite one of `identity`'s questionnaires.
    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        questionnaire: Value,
    ) -> Result<(), QuestionnaireError> {
        let path = user_questionnaire(&identity.uid, id);
        self.store.set(&path, questionnaire).await?;
        Ok(())
    }

    /// Delete one of `identity`'s questionnaires.
    ///
    /// A published copy with the same id is left in place.
    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<(), QuestionnaireError> {
        let path = user_questionnaire(&identity.uid, id);
        self.store.remove(&path).await?;
        Ok(())
    }

    /// Copy a questionnaire into the published namespace.
    ///
    /// Not owner-checked: any authenticated caller may publish any id.
    pub async fn publish(&self, id: &str, questionnaire: Value) -> Result<(), QuestionnaireError> {
        let path = published_questionnaire(id);
        self.store.set(&path, questionnaire).await?;
        debug!(id = %id, "questionnaire published");
        Ok(())
    }

    /// Remove a published questionnaire. The private copy is untouched.
    ///
    /// Not owner-checked, like [`publish`](Self::publish).
    pub async fn unpublish(&self, id: &str) -> Result<(), QuestionnaireError> {
        let path = published_questionnaire(id);
        self.store.remove(&path).await?;
        debug!(id = %id, "questionnaire unpublished");
        Ok(())
    }
}

impl<S: DocumentStore> Clone for QuestionnaireService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}
