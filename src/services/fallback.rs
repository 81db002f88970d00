// ============================================================================
// FALLBACK - Clasificación del resultado remoto
// ============================================================================
// Decide si una respuesta del backend se sirve tal cual o si debe
// re-ejecutarse contra el almacén local. Los límites son configurables:
// algunos hostings devuelven la página HTML de la SPA con 200 en lugar de
// un error de la API.
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::api_client::{RemoteError, RemoteResponse};
use crate::utils::constants::DEFAULT_STRUCTURED_CONTENT_TYPE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackPolicy {
    /// Content-Types (sin parámetros) aceptados como datos estructurados
    pub structured_content_types: Vec<String>,
    /// Aceptar también `application/*+json`
    pub accept_json_suffix: bool,
    /// Un status fuera de 2xx activa el fallback
    pub fallback_on_error_status: bool,
    /// Un error de red o timeout activa el fallback
    pub fallback_on_transport_error: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            structured_content_types: vec![DEFAULT_STRUCTURED_CONTENT_TYPE.to_string()],
            accept_json_suffix: true,
            fallback_on_error_status: true,
            fallback_on_transport_error: true,
        }
    }
}

/// Por qué falló (o no sirve) la llamada remota. Se conserva íntegra para
/// devolverla sin cambios cuando no existe ruta local.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteFailure {
    Transport(RemoteError),
    Status { status: u16, body: String },
    ContentType { status: u16, content_type: Option<String> },
    MalformedBody { status: u16, reason: String },
}

impl RemoteFailure {
    /// Status HTTP a reportar al llamador
    pub fn status(&self) -> u16 {
        match self {
            RemoteFailure::Transport(_) => 0,
            RemoteFailure::Status { status, .. }
            | RemoteFailure::ContentType { status, .. }
            | RemoteFailure::MalformedBody { status, .. } => *status,
        }
    }
}

impl fmt::Display for RemoteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteFailure::Transport(e) => write!(f, "{}", e),
            RemoteFailure::Status { status, body } if body.is_empty() => write!(f, "HTTP {}", status),
            RemoteFailure::Status { status, body } => write!(f, "HTTP {}: {}", status, body),
            RemoteFailure::ContentType { status, content_type } => write!(
                f,
                "HTTP {}: unexpected content type {}",
                status,
                content_type.as_deref().unwrap_or("(none)")
            ),
            RemoteFailure::MalformedBody { status, reason } => {
                write!(f, "HTTP {}: parse error: {}", status, reason)
            }
        }
    }
}

/// Resultado de clasificar la llamada remota
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    /// Respuesta válida: se devuelve tal cual
    Served { status: u16, body: Value },
    /// Debe re-ejecutarse en el almacén local
    Fallback(RemoteFailure),
    /// Fallo que la política no permite enmascarar
    Failed(RemoteFailure),
}

impl FallbackPolicy {
    pub fn is_structured(&self, content_type: Option<&str>) -> bool {
        let Some(raw) = content_type else {
            return false;
        };
        // "application/json; charset=utf-8" -> "application/json"
        let essence = raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        if self.structured_content_types.iter().any(|t| t.eq_ignore_ascii_case(&essence)) {
            return true;
        }
        self.accept_json_suffix && essence.starts_with("application/") && essence.ends_with("+json")
    }

    pub fn classify(&self, result: Result<RemoteResponse, RemoteError>) -> RemoteOutcome {
        let response = match result {
            Ok(response) => response,
            Err(e) => return self.on_failure(self.fallback_on_transport_error, RemoteFailure::Transport(e)),
        };

        if !response.is_success() {
            let failure = RemoteFailure::Status {
                status: response.status,
                body: response.body,
            };
            return self.on_failure(self.fallback_on_error_status, failure);
        }

        // 204: éxito sin contenido ni Content-Type
        if response.status == 204 && response.body.trim().is_empty() {
            return RemoteOutcome::Served {
                status: response.status,
                body: Value::Null,
            };
        }

        if !self.is_structured(response.content_type.as_deref()) {
            return RemoteOutcome::Fallback(RemoteFailure::ContentType {
                status: response.status,
                content_type: response.content_type,
            });
        }

        if response.body.trim().is_empty() {
            return RemoteOutcome::Served {
                status: response.status,
                body: Value::Null,
            };
        }

        match serde_json::from_str::<Value>(&response.body) {
            Ok(body) => RemoteOutcome::Served {
                status: response.status,
                body,
            },
            Err(e) => RemoteOutcome::Fallback(RemoteFailure::MalformedBody {
                status: response.status,
                reason: e.to_string(),
            }),
        }
    }

    fn on_failure(&self, enabled: bool, failure: RemoteFailure) -> RemoteOutcome {
        if enabled {
            RemoteOutcome::Fallback(failure)
        } else {
            RemoteOutcome::Failed(failure)
        }
    }
}
