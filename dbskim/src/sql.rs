//! SQL identifier quoting.
//!
//! Table and column names come from catalog metadata, not from hardcoded
//! strings, so every name interpolated into generated SQL goes through
//! [`quote_ident`] first. Quoting doubles any embedded double quote and
//! wraps the identifier once, which is sufficient for PostgreSQL delimited
//! identifiers.

/// Quotes a single identifier for safe interpolation into SQL.
///
/// Embedded `"` characters are doubled and the whole identifier is wrapped
/// in double quotes. Pure and infallible.
///
/// # Examples
/// ```
/// use dbskim::sql::quote_ident;
///
/// assert_eq!(quote_ident("customer_id"), "\"customer_id\"");
/// assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
/// ```
pub fn quote_ident(raw: &str) -> String {
    let escaped = raw.replace('"', "\"\"");
    format!("\"{escaped}\"")
}

/// Quotes a schema-qualified relation name.
pub fn quote_qualified(schema: &str, name: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(name))
}
