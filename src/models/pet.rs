use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Pet as exposed by the pet directory. Only the fields needed to decide
/// ownership are read.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Uuid,
    pub responsible_id: Uuid,
}

impl Pet {
    pub fn is_responsible(&self, user_id: Uuid) -> bool {
        self.responsible_id == user_id
    }
}
