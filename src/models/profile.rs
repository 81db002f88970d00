use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::entity::{deserialize_id, Entity};

/// Perfil del organizador (raíz de todas las demás colecciones)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub event_name: String,
    pub event_type: String,
    #[serde(default)]
    pub custom_event_type: Option<String>,
    pub event_date: String,
    #[serde(default)]
    pub partner_name: Option<String>,
    pub budget: String, // Decimal como texto
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Profile {
    /// Tipo de evento a mostrar: el personalizado si se eligió "other"
    pub fn display_event_type(&self) -> &str {
        match self.custom_event_type.as_deref() {
            Some(custom) if self.event_type == "other" && !custom.is_empty() => custom,
            _ => &self.event_type,
        }
    }
}

impl Entity for Profile {
    const COLLECTION: Collection = Collection::Users;

    fn id(&self) -> &str {
        &self.id
    }
}
