use serde::{Deserialize, Serialize};

use super::collection::Collection;
use super::entity::{deserialize_id, Entity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspiration {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl Entity for Inspiration {
    const COLLECTION: Collection = Collection::Inspirations;

    fn id(&self) -> &str {
        &self.id
    }
}
