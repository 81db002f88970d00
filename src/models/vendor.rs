use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::entity::{deserialize_id, Entity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub name: String,
    pub contact: String,
    #[serde(default)]
    pub service_type: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Entity for Vendor {
    const COLLECTION: Collection = Collection::Vendors;

    fn id(&self) -> &str {
        &self.id
    }
}
