// ============================================================================
// LOCAL STORE - Persistencia por colección sobre localStorage
// ============================================================================
// Cada colección es un único blob JSON bajo `<prefijo><colección>`.
// Ciclo: leer colección completa -> mutar -> escribir colección completa.
// Un blob ausente o corrupto se trata como colección vacía; un fallo de
// lectura aborta la operación sin escribir nada.
// ============================================================================

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::config::CONFIG;
use crate::models::collection::key_of;
use crate::models::{Collection, Entity, Profile, ID_FIELD};
use crate::utils::storage::{load_json, save_json, StorageBackend};

type Record = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{collection} record '{id}' not found")]
    NotFound { collection: Collection, id: String },
    #[error("invalid {collection} payload: {reason}")]
    InvalidPayload { collection: Collection, reason: String },
    #[error("{0} records have no owner")]
    NoOwner(Collection),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("cannot decode {collection} record: {reason}")]
    Decode { collection: Collection, reason: String },
}

/// Almacén local: dueño exclusivo de las colecciones persistidas
#[derive(Clone)]
pub struct LocalStore<S: StorageBackend> {
    storage: S,
    prefix: String,
}

impl<S: StorageBackend> LocalStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_prefix(storage, &CONFIG.storage_prefix)
    }

    pub fn with_prefix(storage: S, prefix: &str) -> Self {
        Self {
            storage,
            prefix: prefix.to_string(),
        }
    }

    pub fn storage_key(&self, collection: Collection) -> String {
        format!("{}{}", self.prefix, collection.name())
    }

    /// Colección completa. Un fallo de lectura se propaga: reescribir a partir
    /// de una colección vacía borraría los registros existentes
    fn load(&self, collection: Collection) -> Result<Vec<Record>, StoreError> {
        let key = self.storage_key(collection);
        let values = load_json::<Vec<Value>>(&self.storage, &key).map_err(|e| {
            log::error!("❌ Error leyendo {}: {}", collection, e);
            StoreError::Storage(e)
        })?;
        Ok(values
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match value {
                Value::Object(record) => Some(record),
                _ => None,
            })
            .collect())
    }

    fn persist(&self, collection: Collection, records: &[Record]) -> Result<(), StoreError> {
        save_json(&self.storage, &self.storage_key(collection), &records).map_err(|e| {
            log::error!("❌ Error persistiendo {}: {}", collection, e);
            StoreError::Storage(e)
        })
    }

    fn position(records: &[Record], id: &str) -> Option<usize> {
        records
            .iter()
            .position(|r| r.get(ID_FIELD).and_then(key_of).as_deref() == Some(id))
    }

    fn into_record(collection: Collection, data: Value) -> Result<Record, StoreError> {
        match data {
            Value::Object(record) => Ok(record),
            other => Err(StoreError::InvalidPayload {
                collection,
                reason: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
        }
    }

    /// Inserta con id y marca temporal generados
    pub fn insert(&self, collection: Collection, data: Value) -> Result<Value, StoreError> {
        let mut record = Self::into_record(collection, data)?;

        if let Some(owner_field) = collection.owner_field() {
            if record.get(owner_field).and_then(key_of).is_none() {
                return Err(StoreError::InvalidPayload {
                    collection,
                    reason: format!("missing '{}'", owner_field),
                });
            }
        }

        record.insert(ID_FIELD.to_string(), Value::from(Uuid::new_v4().to_string()));
        if let Some(field) = collection.timestamp_field() {
            record.insert(field.to_string(), Value::from(Utc::now().to_rfc3339()));
        }
        collection.apply_defaults(&mut record);

        let mut records = self.load(collection)?;
        records.push(record.clone());
        self.persist(collection, &records)?;

        log::info!("💾 {} insertado localmente ({} registros)", collection, records.len());
        Ok(Value::Object(record))
    }

    /// Merge superficial; `id` y propietario nunca se sobrescriben
    pub fn update(&self, collection: Collection, id: &str, partial: Value) -> Result<Value, StoreError> {
        let partial = Self::into_record(collection, partial)?;
        let mut records = self.load(collection)?;
        let index = Self::position(&records, id).ok_or_else(|| StoreError::NotFound {
            collection,
            id: id.to_string(),
        })?;

        let record = &mut records[index];
        for (field, value) in partial {
            if field == ID_FIELD || Some(field.as_str()) == collection.owner_field() {
                continue;
            }
            record.insert(field, value);
        }
        let merged = record.clone();

        self.persist(collection, &records)?;
        log::info!("💾 {} '{}' actualizado localmente", collection, id);
        Ok(Value::Object(merged))
    }

    /// Idempotente; devuelve si el registro existía
    pub fn delete(&self, collection: Collection, id: &str) -> Result<bool, StoreError> {
        let mut records = self.load(collection)?;
        let before = records.len();
        records.retain(|r| r.get(ID_FIELD).and_then(key_of).as_deref() != Some(id));

        if records.len() == before {
            log::info!("ℹ️ {} '{}' no existe localmente, nada que eliminar", collection, id);
            return Ok(false);
        }

        self.persist(collection, &records)?;
        log::info!("🗑️ {} '{}' eliminado localmente", collection, id);
        Ok(true)
    }

    /// Registros del propietario en orden de almacenamiento
    pub fn list_by_owner(&self, collection: Collection, owner_id: &str) -> Result<Vec<Value>, StoreError> {
        let owner_field = collection.owner_field().ok_or(StoreError::NoOwner(collection))?;
        Ok(self
            .load(collection)?
            .into_iter()
            .filter(|r| r.get(owner_field).and_then(key_of).as_deref() == Some(owner_id))
            .map(Value::Object)
            .collect())
    }

    pub fn get_by_id(&self, collection: Collection, id: &str) -> Result<Value, StoreError> {
        let records = self.load(collection)?;
        Self::position(&records, id)
            .map(|index| Value::Object(records[index].clone()))
            .ok_or_else(|| StoreError::NotFound {
                collection,
                id: id.to_string(),
            })
    }

    pub fn list_as<T: Entity>(&self, owner_id: &str) -> Result<Vec<T>, StoreError> {
        self.list_by_owner(T::COLLECTION, owner_id)?
            .into_iter()
            .map(|record| {
                T::from_record(record).map_err(|e| StoreError::Decode {
                    collection: T::COLLECTION,
                    reason: e.to_string(),
                })
            })
            .collect()
    }

    pub fn get_profile(&self, id: &str) -> Result<Profile, StoreError> {
        let record = self.get_by_id(Collection::Users, id)?;
        Profile::from_record(record).map_err(|e| StoreError::Decode {
            collection: Collection::Users,
            reason: e.to_string(),
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Expense, Guest, Task};
    use crate::utils::storage::MemoryStorage;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Lecturas que pueden fallar a demanda (localStorage bloqueado)
    #[derive(Clone, Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_reads: Rc<Cell<bool>>,
    }

    impl StorageBackend for FlakyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, String> {
            if self.fail_reads.get() {
                return Err("SecurityError: access denied".to_string());
            }
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), String> {
            self.inner.remove_item(key)
        }
    }

    fn store() -> (LocalStore<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (LocalStore::with_prefix(storage.clone(), "test_"), storage)
    }

    fn id_of(record: &Value) -> String {
        record["id"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_insert_generates_unique_ids_and_timestamps() {
        let (store, _) = store();
        let a = store
            .insert(Collection::Expenses, json!({"userId": "u1", "name": "Flores", "amount": "120.50"}))
            .unwrap();
        let b = store
            .insert(Collection::Expenses, json!({"userId": "u1", "name": "Pastel", "amount": "80"}))
            .unwrap();

        assert_ne!(id_of(&a), id_of(&b));
        assert!(a["date"].is_string());

        let profile = store
            .insert(Collection::Users, json!({"name": "Ana", "id": "forzado"}))
            .unwrap();
        assert_ne!(profile["id"], json!("forzado"));
        assert!(profile["createdAt"].is_string());
    }

    #[test]
    fn test_insert_applies_entity_defaults() {
        let (store, _) = store();
        let guest = store
            .insert(Collection::Guests, json!({"userId": "u1", "name": "Familia Ruiz"}))
            .unwrap();
        let guest = Guest::from_record(guest).unwrap();
        assert_eq!(guest.count, 1);

        let task = store
            .insert(Collection::Tasks, json!({"userId": "u1", "description": "Invitaciones"}))
            .unwrap();
        let task = Task::from_record(task).unwrap();
        assert!(!task.completed);
        assert_eq!(task.priority.as_deref(), Some("medium"));
    }

    #[test]
    fn test_insert_rejects_orphans_and_non_objects() {
        let (store, storage) = store();
        assert!(matches!(
            store.insert(Collection::Vendors, json!({"name": "DJ"})),
            Err(StoreError::InvalidPayload { .. })
        ));
        assert!(matches!(
            store.insert(Collection::Vendors, json!(["DJ"])),
            Err(StoreError::InvalidPayload { .. })
        ));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_update_merges_and_protects_identity() {
        let (store, _) = store();
        let original = store
            .insert(
                Collection::Vendors,
                json!({"userId": "u1", "name": "Catering Sol", "contact": "555-0101", "notes": "vegano"}),
            )
            .unwrap();
        let id = id_of(&original);

        let merged = store
            .update(
                Collection::Vendors,
                &id,
                json!({"id": "otro", "userId": "intruso", "contact": "555-0199", "serviceType": "catering"}),
            )
            .unwrap();

        assert_eq!(merged["id"], json!(id));
        assert_eq!(merged["userId"], json!("u1"));
        assert_eq!(merged["contact"], json!("555-0199"));
        assert_eq!(merged["serviceType"], json!("catering"));
        assert_eq!(merged["name"], json!("Catering Sol"));
        assert_eq!(merged["notes"], json!("vegano"));
    }

    #[test]
    fn test_update_missing_id_leaves_collection_untouched() {
        let (store, storage) = store();
        store
            .insert(Collection::Tasks, json!({"userId": "u1", "description": "Música"}))
            .unwrap();
        let before = storage.get_item("test_tasks").unwrap();

        let err = store
            .update(Collection::Tasks, "no-existe", json!({"completed": true}))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                collection: Collection::Tasks,
                id: "no-existe".to_string()
            }
        );
        assert_eq!(storage.get_item("test_tasks").unwrap(), before);
        assert!(storage.get_item("test_users").unwrap().is_none());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, _) = store();
        let record = store
            .insert(Collection::Inspirations, json!({"userId": "u1", "title": "Mesa rústica"}))
            .unwrap();
        let id = id_of(&record);

        assert_eq!(store.delete(Collection::Inspirations, &id), Ok(true));
        assert_eq!(store.delete(Collection::Inspirations, &id), Ok(false));
        assert!(store.list_by_owner(Collection::Inspirations, "u1").unwrap().is_empty());
    }

    #[test]
    fn test_list_by_owner_filters_and_keeps_order() {
        let (store, _) = store();
        for (owner, name) in [("u1", "a"), ("u2", "b"), ("u1", "c"), ("u3", "d"), ("u1", "e")] {
            store
                .insert(Collection::Guests, json!({"userId": owner, "name": name}))
                .unwrap();
        }

        let names: Vec<String> = store
            .list_as::<Guest>("u1")
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["a", "c", "e"]);
        assert!(store.list_by_owner(Collection::Guests, "u9").unwrap().is_empty());
        assert_eq!(
            store.list_by_owner(Collection::Users, "u1"),
            Err(StoreError::NoOwner(Collection::Users))
        );
    }

    #[test]
    fn test_numeric_owner_ids_match_textually() {
        let (store, _) = store();
        store
            .insert(Collection::Expenses, json!({"userId": 7, "name": "Fotos", "amount": "300"}))
            .unwrap();
        assert_eq!(store.list_by_owner(Collection::Expenses, "7").unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_blob_reads_as_empty_and_heals() {
        let (store, storage) = store();
        storage.set_item("test_expenses", "<html>not json").unwrap();
        assert!(store.list_by_owner(Collection::Expenses, "u1").unwrap().is_empty());

        store
            .insert(Collection::Expenses, json!({"userId": "u1", "name": "Velas", "amount": "15"}))
            .unwrap();
        let expenses = store.list_as::<Expense>("u1").unwrap();
        assert_eq!(expenses.len(), 1);
        assert_eq!(expenses[0].amount, "15");
    }

    #[test]
    fn test_round_trip_changes_only_updated_fields() {
        let (store, _) = store();
        let original = store
            .insert(
                Collection::Tasks,
                json!({"userId": "u1", "description": "Elegir menú", "dueDate": "2026-05-01"}),
            )
            .unwrap();
        let id = id_of(&original);

        store
            .update(Collection::Tasks, &id, json!({"completed": true, "priority": "high"}))
            .unwrap();

        let listed = store.list_by_owner(Collection::Tasks, "u1").unwrap();
        let mut expected = original.clone();
        expected["completed"] = json!(true);
        expected["priority"] = json!("high");
        assert_eq!(listed, vec![expected]);
    }

    #[test]
    fn test_get_profile() {
        let (store, _) = store();
        let profile = store
            .insert(
                Collection::Users,
                json!({
                    "name": "Ana", "email": "ana@example.com", "eventName": "Boda",
                    "eventType": "wedding", "eventDate": "2026-06-20", "budget": "15000"
                }),
            )
            .unwrap();
        let loaded = store.get_profile(&id_of(&profile)).unwrap();
        assert_eq!(loaded.event_name, "Boda");
        assert!(matches!(store.get_profile("nadie"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn test_read_failure_never_overwrites_collection() {
        let storage = FlakyStorage::default();
        let store = LocalStore::with_prefix(storage.clone(), "test_");
        for name in ["a", "b", "c"] {
            store
                .insert(Collection::Guests, json!({"userId": "u1", "name": name}))
                .unwrap();
        }

        storage.fail_reads.set(true);
        assert!(matches!(
            store.insert(Collection::Guests, json!({"userId": "u1", "name": "d"})),
            Err(StoreError::Storage(_))
        ));
        assert!(matches!(store.delete(Collection::Guests, "x"), Err(StoreError::Storage(_))));
        assert!(matches!(
            store.list_by_owner(Collection::Guests, "u1"),
            Err(StoreError::Storage(_))
        ));

        storage.fail_reads.set(false);
        assert_eq!(store.list_by_owner(Collection::Guests, "u1").unwrap().len(), 3);
    }
}
