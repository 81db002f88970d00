// ============================================================================
// STORAGE - Sustrato clave/valor síncrono (localStorage o memoria)
// ============================================================================

use serde::{de::DeserializeOwned, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::{window, Storage};

/// Primitivas síncronas de `window.localStorage`
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), String>;
    fn remove_item(&self, key: &str) -> Result<(), String>;
}

/// localStorage del navegador
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn local_storage() -> Result<Storage, String> {
        window()
            .ok_or_else(|| "No hay window (¿fuera del navegador?)".to_string())?
            .local_storage()
            .map_err(|e| {
                log::error!("❌ localStorage bloqueado: {:?}", e);
                "No se pudo acceder a localStorage".to_string()
            })?
            .ok_or_else(|| "No se pudo acceder a localStorage".to_string())
    }
}

impl StorageBackend for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Self::local_storage()?.get_item(key).map_err(|e| {
            log::error!("❌ Error leyendo '{}' de localStorage: {:?}", key, e);
            "Error leyendo localStorage".to_string()
        })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        Self::local_storage()?.set_item(key, value).map_err(|e| {
            // QuotaExceededError u otro DOMException
            log::error!("❌ Error guardando '{}' ({} bytes): {:?}", key, value.len(), e);
            format!("Error guardando en localStorage: {:?}", e)
        })
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        Self::local_storage()?.remove_item(key).map_err(|e| {
            log::error!("❌ Error eliminando '{}' de localStorage: {:?}", key, e);
            "Error eliminando de localStorage".to_string()
        })
    }
}

/// Almacenamiento en memoria; los clones comparten el mismo mapa
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Lee y deserializa. Un fallo de lectura es un error; un valor ausente o
/// corrupto se trata como `None`
pub fn load_json<T: DeserializeOwned>(storage: &impl StorageBackend, key: &str) -> Result<Option<T>, String> {
    let Some(json) = storage.get_item(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&json) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            log::warn!("⚠️ Datos corruptos en '{}', se ignoran: {}", key, e);
            Ok(None)
        }
    }
}

pub fn save_json<T: Serialize>(storage: &impl StorageBackend, key: &str, value: &T) -> Result<(), String> {
    let json = serde_json::to_string(value)
        .map_err(|e| format!("Error serializando datos: {}", e))?;
    storage.set_item(key, &json)
}
