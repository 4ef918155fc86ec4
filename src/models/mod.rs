pub mod enums;
pub mod filters;
pub mod monitoring;
pub mod notification;
pub mod patient;
pub mod prediction_factor;
pub mod transplant;
pub mod user;

pub use filters::*;
pub use monitoring::*;
pub use notification::*;
pub use patient::*;
pub use prediction_factor::*;
pub use transplant::*;
pub use user::*;

use chrono::{NaiveDateTime, SecondsFormat};

/// Render a stored UTC timestamp as RFC 3339 with milliseconds (`...T00:00:00.000Z`).
pub fn to_rfc3339(ts: &NaiveDateTime) -> String {
    ts.and_utc().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for timestamps exposed over the API.
pub mod rfc3339 {
    use chrono::NaiveDateTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::to_rfc3339(ts))
    }
}
