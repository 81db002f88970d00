// ============================================================================
// EVENT PLANNER - NÚCLEO DE ACCESO A DATOS (RUST PURO + WASM)
// ============================================================================
// - Models: Contratos de las entidades (perfil, gastos, proveedores, ...)
// - Services: Cliente API, fallback, rutas, almacenamiento local, dispatcher
// - Utils: Sustrato de almacenamiento (localStorage / memoria)
// La UI (JavaScript) solo ve `PlannerApi` y respuestas normalizadas.
// ============================================================================

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_logger::Config;

use crate::config::CONFIG;
use crate::models::{Collection, Expense, NormalizedResponse, Profile};
use crate::services::{
    ApiClient, BudgetSummary, DispatchError, Dispatcher, HttpMethod, LocalStore, MonthGrid,
};
use crate::utils::storage::BrowserStorage;

type BrowserDispatcher = Dispatcher<ApiClient, BrowserStorage>;

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() {
        log::Level::Info
    } else {
        log::Level::Warn
    };
    wasm_logger::init(Config::new(level));
    log::info!("🚀 Event Planner - backend: {} ({})", CONFIG.backend_url(), CONFIG.environment);

    Ok(())
}

/// Punto de entrada para la UI: backend primero, localStorage como respaldo
#[wasm_bindgen]
pub struct PlannerApi {
    dispatcher: Rc<BrowserDispatcher>,
}

#[wasm_bindgen]
impl PlannerApi {
    #[wasm_bindgen(constructor)]
    pub fn new() -> PlannerApi {
        let store = LocalStore::new(BrowserStorage);
        PlannerApi {
            dispatcher: Rc::new(Dispatcher::new(ApiClient::new(), store)),
        }
    }

    /// `execute("POST", "/api/expenses", "{...}")` -> Promise<string> con la respuesta normalizada
    pub fn execute(&self, method: String, path: String, payload_json: Option<String>) -> js_sys::Promise {
        let dispatcher = Rc::clone(&self.dispatcher);
        wasm_bindgen_futures::future_to_promise(async move {
            let result = match parse_request(&method, payload_json.as_deref()) {
                Ok((method, payload)) => dispatcher.execute(method, &path, payload).await,
                Err(e) => Err(e),
            };
            Ok(JsValue::from_str(&to_json(result)))
        })
    }

    /// `listByOwner("guests", userId)` -> Promise<string>
    #[wasm_bindgen(js_name = listByOwner)]
    pub fn list_by_owner(&self, collection: String, owner_id: String) -> js_sys::Promise {
        let dispatcher = Rc::clone(&self.dispatcher);
        wasm_bindgen_futures::future_to_promise(async move {
            let result = match Collection::from_name(&collection) {
                Some(collection) => dispatcher.list_by_owner(collection, &owner_id).await,
                None => Err(DispatchError::InvalidRequest(format!("unknown collection '{}'", collection))),
            };
            Ok(JsValue::from_str(&to_json(result)))
        })
    }
}

impl Default for PlannerApi {
    fn default() -> Self {
        Self::new()
    }
}

/// Resumen de presupuesto a partir del perfil y sus gastos (JSON)
#[wasm_bindgen(js_name = budgetSummary)]
pub fn budget_summary(profile_json: &str, expenses_json: &str) -> Result<String, JsValue> {
    let profile: Profile = serde_json::from_str(profile_json)
        .map_err(|e| JsValue::from_str(&format!("Perfil inválido: {}", e)))?;
    let expenses: Vec<Expense> = serde_json::from_str(expenses_json)
        .map_err(|e| JsValue::from_str(&format!("Gastos inválidos: {}", e)))?;
    let summary = BudgetSummary::compute(&profile, &expenses);
    serde_json::to_string(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Cuadrícula del mes que contiene `date` (YYYY-MM-DD o RFC 3339)
#[wasm_bindgen(js_name = calendarGrid)]
pub fn calendar_grid(date: &str) -> Result<String, JsValue> {
    let date = services::parse_event_date(date)
        .ok_or_else(|| JsValue::from_str(&format!("Fecha inválida: {}", date)))?;
    serde_json::to_string(&MonthGrid::for_date(date)).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn parse_request(
    method: &str,
    payload_json: Option<&str>,
) -> Result<(HttpMethod, Option<serde_json::Value>), DispatchError> {
    let method: HttpMethod = method.parse().map_err(DispatchError::InvalidRequest)?;
    let payload = payload_json
        .filter(|raw| !raw.trim().is_empty())
        .map(|raw| serde_json::from_str::<serde_json::Value>(raw))
        .transpose()
        .map_err(|e| DispatchError::InvalidRequest(format!("invalid JSON payload: {}", e)))?;
    Ok((method, payload))
}

/// Éxito o fallo terminal, siempre como `NormalizedResponse` serializada
fn to_json(result: Result<NormalizedResponse, DispatchError>) -> String {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            log::error!("❌ {}", e);
            NormalizedResponse::failure(&e)
        }
    };
    serde_json::to_string(&response).unwrap_or_else(|e| serialization_failure(&e.to_string()))
}

fn serialization_failure(error: &str) -> String {
    serde_json::json!({
        "ok": false,
        "status": 500,
        "source": "local",
        "body": null,
        "error": error,
    })
    .to_string()
}
