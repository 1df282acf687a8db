/// Current wall-clock time in epoch milliseconds, the unit every giveaway
/// timestamp is stored in.
pub fn now_ms() -> i64 {
    (time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
