use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// Session role supplied by the auth collaborator. Notifications are
/// scoped to a role, not to a single user.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize, Display,
    EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Consultant,
    Manager,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_lowercase_names() {
        assert_eq!(Role::from_str("manager").unwrap(), Role::Manager);
        assert_eq!(Role::from_str("consultant").unwrap(), Role::Consultant);
        assert!(Role::from_str("hr").is_err());
        assert_eq!(Role::Manager.to_string(), "manager");
    }
}
