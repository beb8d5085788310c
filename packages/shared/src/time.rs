use chrono::{DateTime, FixedOffset, Offset, Utc};

/// JST is UTC+9
const JST_OFFSET_SECONDS: i32 = 9 * 3600;

fn jst() -> FixedOffset {
    FixedOffset::east_opt(JST_OFFSET_SECONDS).unwrap_or_else(|| Utc.fix())
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as an RFC 3339 string in JST
pub fn timestamp_to_jst_rfc3339(timestamp_millis: i64) -> String {
    DateTime::from_timestamp_millis(timestamp_millis)
        .map(|dt| dt.with_timezone(&jst()).to_rfc3339())
        .unwrap_or_else(|| timestamp_millis.to_string())
}
