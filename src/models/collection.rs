// ============================================================================
// COLECCIONES - Las seis colecciones planas del planificador
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Campo de identificador común a todas las entidades
pub const ID_FIELD: &str = "id";

/// Campo de propietario (perfil) en las entidades dependientes
pub const OWNER_FIELD: &str = "userId";

/// Colección de registros de un mismo tipo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Perfiles (raíz, sin propietario)
    Users,
    Expenses,
    Vendors,
    Guests,
    Tasks,
    Inspirations,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Users,
        Collection::Expenses,
        Collection::Vendors,
        Collection::Guests,
        Collection::Tasks,
        Collection::Inspirations,
    ];

    /// Segmento usado en las rutas REST y en la clave de almacenamiento
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Expenses => "expenses",
            Collection::Vendors => "vendors",
            Collection::Guests => "guests",
            Collection::Tasks => "tasks",
            Collection::Inspirations => "inspirations",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Campo que referencia al perfil propietario (`None` para perfiles)
    pub fn owner_field(&self) -> Option<&'static str> {
        match self {
            Collection::Users => None,
            _ => Some(OWNER_FIELD),
        }
    }

    /// Marca temporal asignada por el almacén al insertar
    pub fn timestamp_field(&self) -> Option<&'static str> {
        match self {
            Collection::Users => Some("createdAt"),
            Collection::Expenses => Some("date"),
            _ => None,
        }
    }

    /// Valores por defecto del contrato de la entidad para campos omitidos
    pub fn apply_defaults(&self, record: &mut Map<String, Value>) {
        match self {
            Collection::Guests => {
                record.entry("count").or_insert(Value::from(1));
            }
            Collection::Tasks => {
                record.entry("completed").or_insert(Value::Bool(false));
                record.entry("priority").or_insert(Value::from("medium"));
            }
            _ => {}
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Representación textual de un identificador JSON (string o número)
pub fn key_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
