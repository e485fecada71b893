//! Column conversions shared by the table modules.
//!
//! UUIDs and timestamps are stored as TEXT. Timestamps always use the same
//! fixed-width RFC 3339 form so that lexical order equals time order.

use chrono::{DateTime, NaiveTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::Connection;
use uuid::Uuid;

/// Current time at the precision the store keeps.
pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub(crate) fn fmt_ts(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn fmt_time(t: &NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

pub(crate) fn uuid_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn opt_uuid_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let s: Option<String> = row.get(idx)?;
    s.map(|s| {
        Uuid::parse_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

pub(crate) fn ts_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn time_at(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<NaiveTime> {
    let s: String = row.get(idx)?;
    NaiveTime::parse_from_str(&s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Name of the Unicode lowercasing SQL function installed on every
/// connection. SQLite's own `lower()` and `LIKE` fold ASCII only.
pub(crate) const FOLD_CASE: &str = "fold_case";

pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        FOLD_CASE,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|v| v.to_lowercase()))
        },
    )
}

/// Wraps `term` for a `fold_case(col) LIKE ... ESCAPE '\'` substring match.
/// The term is lowercased here so both sides fold the same way.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

pub(crate) fn collect<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> rusqlite::Result<Vec<T>> {
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("love"), "%love%");
        assert_eq!(like_pattern("100%_sure"), "%100\\%\\_sure%");
        assert_eq!(like_pattern("ÉLAN"), "%élan%");
    }

    #[test]
    fn timestamps_are_fixed_width() {
        let a = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 5).unwrap();
        let b = a + chrono::Duration::milliseconds(500);
        assert_eq!(fmt_ts(&a).len(), fmt_ts(&b).len());
        assert!(fmt_ts(&a) < fmt_ts(&b));
    }
}
