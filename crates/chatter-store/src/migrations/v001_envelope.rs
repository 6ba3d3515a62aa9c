//! v001: wrap bare legacy records in the versioned envelope.
//!
//! The first storage layout wrote each collection as a bare JSON array (and
//! the session as a bare string).  The payload itself is unchanged; this
//! migration only establishes the envelope.

use serde_json::Value;

pub fn up(legacy: Value) -> Value {
    legacy
}
