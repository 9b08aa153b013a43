use serde::Deserialize;

use crate::users::repo::User;

/// A user payload that already passed the validation gate. `age` and
/// `active` are `None` when the key was absent from the request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPayload {
    pub name: String,
    pub email: String,
    pub age: Option<i32>,
    pub active: Option<bool>,
}

impl UserPayload {
    /// Merge semantics: a field overwrites the stored value iff its key was
    /// present in the payload. `0` and `false` still overwrite; absent keys
    /// preserve the stored value. `id` and timestamps are never touched.
    pub fn apply_to(&self, user: &mut User) {
        user.name = self.name.clone();
        user.email = self.email.clone();
        if let Some(age) = self.age {
            user.age = Some(age);
        }
        if let Some(active) = self.active {
            user.active = active;
        }
    }
}

/// Query-string filters for listing users. Bounds are inclusive and
/// independently optional; present filters combine with AND.
#[derive(Debug, Default, Deserialize)]
pub struct UserFilter {
    pub name: Option<String>,
    #[serde(rename = "ageMin")]
    pub age_min: Option<i32>,
    #[serde(rename = "ageMax")]
    pub age_max: Option<i32>,
}
