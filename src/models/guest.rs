use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::entity::{deserialize_id, Entity};

fn default_count() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub name: String,
    #[serde(default = "default_count")]
    pub count: u32, // Personas en el grupo (>= 1)
    #[serde(default)]
    pub relationship: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Entity for Guest {
    const COLLECTION: Collection = Collection::Guests;

    fn id(&self) -> &str {
        &self.id
    }
}

