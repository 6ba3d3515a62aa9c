/// Application name
pub const APP_NAME: &str = "Chatter";

/// Default country on a freshly registered profile
pub const DEFAULT_COUNTRY: &str = "Hong Kong";

/// Base URL used to generate a default avatar from a username
pub const AVATAR_SERVICE_URL: &str = "https://ui-avatars.com/api/";

/// Storage key for the user collection
pub const USERS_KEY: &str = "chatter_users";

/// Storage key for the chat collection
pub const CHATS_KEY: &str = "chatter_chats";

/// Storage key for the invitation collection
pub const INVITES_KEY: &str = "chatter_invites";

/// Storage key for the call history collection
pub const CALLS_KEY: &str = "chatter_calls";

/// Storage key for the walkie session collection
pub const WALKIE_KEY: &str = "chatter_walkie";

/// Storage key for the logged-in user id
pub const SESSION_KEY: &str = "chatter_session";
