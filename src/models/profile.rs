/// A local user profile. There is no authentication layer; the profile id
/// only scopes records so the store stays per-user.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: Option<i64>,
    pub name: String,
    pub created_at: String,
}

impl Profile {
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
