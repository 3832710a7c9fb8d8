use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    #[schema(example = "bgl-sprint")]
    pub id: String,
    #[schema(example = "BGL - Sprint 12")]
    pub name: String,
    #[schema(example = "BGL BNP Paribas")]
    pub client: String,
}

impl Project {
    pub fn new(id: &str, name: &str, client: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            client: client.to_string(),
        }
    }
}
