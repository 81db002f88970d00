// ============================================================================
// DISPATCHER - Backend primero, almacenamiento local como respaldo
// ============================================================================
// 1. Envía la operación al backend
// 2. Clasifica el resultado (FallbackPolicy)
// 3. Si califica para fallback, la enruta (RouteTable) al LocalStore
// 4. Sin ruta local -> se devuelve el fallo remoto original
// No guarda estado propio: todo lo persistido pertenece al LocalStore.
// ============================================================================

use serde_json::{json, Value};
use thiserror::Error;

use super::api_client::{ApiRequest, HttpMethod, RemoteEndpoint};
use super::fallback::{FallbackPolicy, RemoteFailure, RemoteOutcome};
use super::local_store::{LocalStore, StoreError};
use super::routes::{LocalAction, ResolvedRoute, RouteTable};
use crate::config::CONFIG;
use crate::models::{Collection, NormalizedResponse, ResponseSource};
use crate::utils::storage::StorageBackend;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    /// Update / get-by-id sobre un id inexistente en el almacén local
    #[error(transparent)]
    NotFound(StoreError),
    /// Fallo remoto sin ruta local equivalente: el error original, intacto
    #[error("{failure}")]
    Unroutable {
        method: HttpMethod,
        path: String,
        failure: RemoteFailure,
    },
    /// Fallo remoto que la política no permite enmascarar
    #[error("{0}")]
    Remote(RemoteFailure),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Store(StoreError),
}

impl DispatchError {
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::NotFound(_) => 404,
            DispatchError::Unroutable { failure, .. } | DispatchError::Remote(failure) => failure.status(),
            DispatchError::InvalidRequest(_) => 400,
            DispatchError::Store(StoreError::InvalidPayload { .. }) => 400,
            DispatchError::Store(_) => 500,
        }
    }

    pub fn origin(&self) -> ResponseSource {
        match self {
            DispatchError::Unroutable { .. } | DispatchError::Remote(_) => ResponseSource::Remote,
            _ => ResponseSource::Local,
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { .. } => DispatchError::NotFound(error),
            other => DispatchError::Store(other),
        }
    }
}

pub struct Dispatcher<R: RemoteEndpoint, S: StorageBackend> {
    remote: R,
    store: LocalStore<S>,
    routes: RouteTable,
    policy: FallbackPolicy,
}

impl<R: RemoteEndpoint, S: StorageBackend> Dispatcher<R, S> {
    pub fn new(remote: R, store: LocalStore<S>) -> Self {
        Self {
            remote,
            store,
            routes: RouteTable::default_routes(&CONFIG.api_prefix),
            policy: CONFIG.fallback.clone(),
        }
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn store(&self) -> &LocalStore<S> {
        &self.store
    }

    /// Ejecuta la operación lógica y devuelve siempre la misma forma de respuesta
    pub async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        payload: Option<Value>,
    ) -> Result<NormalizedResponse, DispatchError> {
        let request = ApiRequest::new(method, path, payload.filter(|_| method.has_body()));
        let result = self.remote.send(&request).await;

        let failure = match self.policy.classify(result) {
            RemoteOutcome::Served { status, body } => {
                log::info!("✅ {} {} servido por el backend ({})", method, path, status);
                return Ok(NormalizedResponse::remote(status, body));
            }
            RemoteOutcome::Failed(failure) => {
                log::error!("❌ {} {}: {}", method, path, failure);
                return Err(DispatchError::Remote(failure));
            }
            RemoteOutcome::Fallback(failure) => failure,
        };

        let Some(route) = self.routes.resolve(method, path) else {
            log::error!("❌ {} {} falló y no tiene ruta local: {}", method, path, failure);
            return Err(DispatchError::Unroutable {
                method,
                path: path.to_string(),
                failure,
            });
        };

        log::warn!("⚠️ Backend no disponible para {} {} ({}), usando almacenamiento local", method, path, failure);
        let body = self.run_local(&route, request.payload)?;
        Ok(NormalizedResponse::local(body))
    }

    /// Lista de una colección del propietario (`GET /users/{owner}/{colección}`)
    pub async fn list_by_owner(
        &self,
        collection: Collection,
        owner_id: &str,
    ) -> Result<NormalizedResponse, DispatchError> {
        if collection.owner_field().is_none() {
            return Err(DispatchError::InvalidRequest(format!("{} cannot be listed by owner", collection)));
        }
        // El id va tal cual en la ruta: no puede cambiar de segmento ni añadir query
        if owner_id.is_empty() || owner_id.contains(['/', '?', '#']) {
            log::warn!("⚠️ Id de propietario no válido: '{}'", owner_id);
            return Err(DispatchError::InvalidRequest(format!("invalid owner id '{}'", owner_id)));
        }
        let path = format!("{}/users/{}/{}", self.routes.prefix(), owner_id, collection.name());
        self.execute(HttpMethod::Get, &path, None).await
    }

    fn run_local(&self, route: &ResolvedRoute, payload: Option<Value>) -> Result<Value, DispatchError> {
        let param = |name: &str| {
            route
                .param(name)
                .map(str::to_string)
                .ok_or_else(|| DispatchError::InvalidRequest(format!("missing path parameter '{}'", name)))
        };
        let body = |payload: Option<Value>| {
            payload.ok_or_else(|| DispatchError::InvalidRequest("missing JSON payload".to_string()))
        };

        let value = match route.action {
            LocalAction::Insert(collection) => self.store.insert(collection, body(payload)?)?,
            LocalAction::Update(collection) => self.store.update(collection, &param("id")?, body(payload)?)?,
            LocalAction::Delete(collection) => {
                let id = param("id")?;
                let existed = self.store.delete(collection, &id)?;
                json!({ "id": id, "deleted": existed })
            }
            LocalAction::GetById(collection) => self.store.get_by_id(collection, &param("id")?)?,
            LocalAction::ListByOwner(collection) => {
                Value::Array(self.store.list_by_owner(collection, &param("owner")?)?)
            }
        };

        if route.action.is_write() {
            log::info!("💾 Operación {:?} aplicada en almacenamiento local", route.action);
        }
        Ok(value)
    }
}
