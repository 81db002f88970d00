use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::Entity;
use crate::services::dispatcher::DispatchError;

/// Origen que sirvió la operación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    Remote,
    Local,
}

/// Respuesta uniforme: el llamador no distingue si respondió el backend
/// o el almacén local
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub ok: bool,
    pub status: u16,
    pub source: ResponseSource,
    pub body: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NormalizedResponse {
    pub fn remote(status: u16, body: Value) -> Self {
        Self {
            ok: true,
            status,
            source: ResponseSource::Remote,
            body,
            error: None,
        }
    }

    pub fn local(body: Value) -> Self {
        Self {
            ok: true,
            status: 200,
            source: ResponseSource::Local,
            body,
            error: None,
        }
    }

    /// Fallo terminal (NotFound / Unroutable / ...) en la misma forma
    pub fn failure(error: &DispatchError) -> Self {
        Self {
            ok: false,
            status: error.status(),
            source: error.origin(),
            body: Value::Null,
            error: Some(error.to_string()),
        }
    }

    pub fn body_as<T: Entity>(&self) -> Result<T, serde_json::Error> {
        T::from_record(self.body.clone())
    }

    pub fn body_as_list<T: Entity>(&self) -> Result<Vec<T>, serde_json::Error> {
        serde_json::from_value(self.body.clone())
    }
}
