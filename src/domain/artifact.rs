use chrono::{DateTime, Datelike, Utc};

/// Docker tags may not contain `+`; swap the first one for `_`.
pub fn docker_tag(version: &str) -> String {
    version.replacen('+', "_", 1)
}

/// Everything before the first `-` of a docker tag, e.g. `v1.1.0`.
pub fn bare_semver(docker_tag: &str) -> &str {
    docker_tag.split('-').next().unwrap_or(docker_tag)
}

/// Unix seconds, rounded to the nearest second from milliseconds.
pub fn seconds_since_epoch(now: DateTime<Utc>) -> i64 {
    let millis = now.timestamp_millis();
    (millis + 500).div_euclid(1000)
}

/// Render the build stamp, e.g. `23-04-26tApr:04:1682515664z`.
///
/// The epoch value is authoritative; the calendar fields ahead of it are
/// cosmetic and rendered in UTC.
pub fn build_date(now: DateTime<Utc>) -> String {
    format!(
        "{}t{}:{:02}:{}z",
        now.format("%y-%m-%d"),
        now.format("%b"),
        now.month(),
        seconds_since_epoch(now)
    )
}
