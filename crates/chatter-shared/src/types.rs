use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// First eight hex characters, for log output.
            pub fn short(&self) -> String {
                self.0.simple().to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Stable identifier of a registered user. Immutable once created.
    UserId
);
id_type!(
    /// Identifier of a chat (conversation).
    ChatId
);
id_type!(
    /// Identifier of a single message within a chat.
    MessageId
);
id_type!(
    /// Identifier of an invitation.
    InviteId
);
id_type!(
    /// Identifier of a call history record.
    CallId
);
id_type!(
    /// Identifier of a walkie-talkie session.
    WalkieId
);

/// Interface language of a user profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Cantonese.
    Yue,
}

impl Default for Language {
    fn default() -> Self {
        Self::En
    }
}

/// Color scheme of a user profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    Light,
    Dark,
}

impl Default for Appearance {
    fn default() -> Self {
        Self::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn short_is_eight_chars() {
        assert_eq!(ChatId::new().short().len(), 8);
    }

    #[test]
    fn language_serde_uses_lowercase_tags() {
        assert_eq!(serde_json::to_string(&Language::Yue).unwrap(), "\"yue\"");
        assert_eq!(
            serde_json::from_str::<Appearance>("\"dark\"").unwrap(),
            Appearance::Dark
        );
    }
}
