//! Rendering of table views.
//!
//! Two renderers produce the same content: [`PlainRenderer`] writes bare
//! text, [`DecoratedRenderer`] adds ANSI colors and heavier separators for
//! terminals. Per table, the column rows are aligned into fixed-width
//! (name, type, range, values) columns whose widths come from that table's
//! own column set.

use std::collections::HashMap;
use std::fmt::Write;

use chrono::{NaiveDate, NaiveTime};
use once_cell::sync::Lazy;

use crate::stats::{classify, is_time_of_day, ColumnKind};
use crate::view::{ColumnDescriptor, ColumnStats, RowCount, TableView};

/// Message emitted when the catalog enumeration is empty.
pub const NO_TABLES_MESSAGE: &str = "No tables found.";

/// Marker for a failed exact count or failed statistics query.
const UNAVAILABLE: &str = "?";

/// Maximum width of a humanized type label.
const TYPE_WIDTH: usize = 8;

const COLUMN_HEADERS: [&str; 4] = ["column", "type", "range", "values"];

static TYPE_ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("smallint", "int2"),
        ("integer", "int"),
        ("bigint", "bigint"),
        ("real", "float4"),
        ("double precision", "float8"),
        ("numeric", "numeric"),
        ("decimal", "decimal"),
        ("money", "money"),
        ("boolean", "bool"),
        ("character varying", "varchar"),
        ("character", "char"),
        ("text", "text"),
        ("date", "date"),
        ("timestamp without time zone", "ts"),
        ("timestamp with time zone", "tstz"),
        ("time without time zone", "time"),
        ("time with time zone", "timetz"),
        ("interval", "interval"),
        ("uuid", "uuid"),
        ("json", "json"),
        ("jsonb", "jsonb"),
        ("bytea", "bytea"),
        ("ARRAY", "array"),
        ("USER-DEFINED", "udt"),
    ])
});

/// Humanizes a declared type name to a fixed abbreviation of at most eight
/// characters. Unrecognized types pass through truncated.
pub fn humanize_type(raw: &str) -> String {
    if let Some(abbr) = TYPE_ABBREVIATIONS.get(raw) {
        return (*abbr).to_string();
    }
    raw.chars().take(TYPE_WIDTH).collect()
}

/// Formats `count` as a percentage of `total`, rounded to one decimal place
/// as `round(count * 1000 / total) / 10`. A zero total renders `0.0%`.
pub fn percent(count: i64, total: i64) -> String {
    if total <= 0 {
        return "0.0%".to_string();
    }
    let tenths = (count as f64 * 1000.0 / total as f64).round() / 10.0;
    format!("{tenths:.1}%")
}

/// Renders table views into human-readable text.
pub trait Renderer {
    fn render(&self, views: &[TableView]) -> String;
}

/// Bare text output, suitable for pipes and files.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainRenderer;

impl Renderer for PlainRenderer {
    fn render(&self, views: &[TableView]) -> String {
        render_views(views, false)
    }
}

/// Colorized terminal output. Content-equivalent to [`PlainRenderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DecoratedRenderer;

impl Renderer for DecoratedRenderer {
    fn render(&self, views: &[TableView]) -> String {
        render_views(views, true)
    }
}

fn render_views(views: &[TableView], decorated: bool) -> String {
    let mut output = String::new();

    if views.is_empty() {
        if decorated {
            writeln!(output, "\x1b[33m{NO_TABLES_MESSAGE}\x1b[0m").unwrap();
        } else {
            writeln!(output, "{NO_TABLES_MESSAGE}").unwrap();
        }
        return output;
    }

    for (i, view) in views.iter().enumerate() {
        if i > 0 {
            writeln!(output).unwrap();
        }
        render_table(&mut output, view, decorated);
    }

    output
}

fn render_table(output: &mut String, view: &TableView, decorated: bool) {
    let qualified = format!("{}.{}", view.table.schema, view.table.name);
    let rows = row_count_cell(view.rows);
    let cols = view.table.column_count;

    if decorated {
        writeln!(
            output,
            "\x1b[1m\x1b[36m{qualified}\x1b[0m  rows: {rows}  ({cols} cols)"
        )
        .unwrap();
    } else {
        writeln!(output, "{qualified}  rows: {rows}  ({cols} cols)").unwrap();
    }

    if view.columns.is_empty() {
        return;
    }

    let cells: Vec<[String; 4]> = view.columns.iter().map(column_cells).collect();
    let widths = column_widths(&cells);

    let header = aligned_row(
        &[
            COLUMN_HEADERS[0].to_string(),
            COLUMN_HEADERS[1].to_string(),
            COLUMN_HEADERS[2].to_string(),
            COLUMN_HEADERS[3].to_string(),
        ],
        &widths,
    );
    if decorated {
        writeln!(output, "  \x1b[4m{header}\x1b[0m").unwrap();
    } else {
        writeln!(output, "  {header}").unwrap();
    }

    for row in &cells {
        writeln!(output, "  {}", aligned_row(row, &widths)).unwrap();
    }
}

/// Formats one column into its (name, type, range, values) cells.
fn column_cells(col: &ColumnDescriptor) -> [String; 4] {
    [
        col.name.clone(),
        humanize_type(&col.declared_type),
        range_cell(col),
        values_cell(col),
    ]
}

fn range_cell(col: &ColumnDescriptor) -> String {
    match classify(&col.declared_type) {
        ColumnKind::Numeric => match &col.stats {
            ColumnStats::Range {
                min: Some(min),
                max: Some(max),
            } => format!("{min}-{max}"),
            ColumnStats::Unavailable => UNAVAILABLE.to_string(),
            _ => String::new(),
        },
        ColumnKind::Temporal => match &col.stats {
            ColumnStats::Range {
                min: Some(min),
                max: Some(max),
            } => temporal_range(&col.declared_type, min, max),
            ColumnStats::Unavailable => UNAVAILABLE.to_string(),
            _ => String::new(),
        },
        _ => String::new(),
    }
}

fn values_cell(col: &ColumnDescriptor) -> String {
    if classify(&col.declared_type) != ColumnKind::Boolean {
        return String::new();
    }
    match &col.stats {
        ColumnStats::Bools {
            true_count,
            false_count,
        } => {
            let total = true_count + false_count;
            format!(
                "Yes {true_count} ({}) | No {false_count} ({})",
                percent(*true_count, total),
                percent(*false_count, total)
            )
        }
        ColumnStats::Unavailable => UNAVAILABLE.to_string(),
        _ => String::new(),
    }
}

/// Renders a temporal min/max pair as a calendar-month range for dates and
/// timestamps, or an `HH:MM-HH:MM` range for time-of-day types. Malformed
/// bounds yield an empty range.
fn temporal_range(declared_type: &str, min: &str, max: &str) -> String {
    if is_time_of_day(declared_type) {
        match (minutes(min), minutes(max)) {
            (Some(lo), Some(hi)) => format!("{lo}-{hi}"),
            _ => String::new(),
        }
    } else {
        match (calendar_month(min), calendar_month(max)) {
            (Some(lo), Some(hi)) => format!("{lo}-{hi}"),
            _ => String::new(),
        }
    }
}

/// Parses the leading `YYYY-MM-DD` of a date or timestamp bound and formats
/// it as `Mon YYYY`.
fn calendar_month(bound: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(bound.get(..10)?, "%Y-%m-%d").ok()?;
    Some(date.format("%b %Y").to_string())
}

/// Parses the leading `HH:MM` of a time bound.
fn minutes(bound: &str) -> Option<String> {
    let time = NaiveTime::parse_from_str(bound.get(..5)?, "%H:%M").ok()?;
    Some(time.format("%H:%M").to_string())
}

fn row_count_cell(rows: RowCount) -> String {
    match rows {
        RowCount::Estimated(n) => format!("~{n}"),
        RowCount::Exact(n) => n.to_string(),
        RowCount::Unknown => UNAVAILABLE.to_string(),
    }
}

fn column_widths(cells: &[[String; 4]]) -> [usize; 4] {
    let mut widths = [
        COLUMN_HEADERS[0].len(),
        COLUMN_HEADERS[1].len(),
        COLUMN_HEADERS[2].len(),
        COLUMN_HEADERS[3].len(),
    ];
    for row in cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }
    widths
}

fn aligned_row(cells: &[String; 4], widths: &[usize; 4]) -> String {
    let mut line = String::new();
    for (cell, &width) in cells.iter().zip(widths.iter()) {
        write!(line, "{cell:<width$}  ").unwrap();
    }
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ColumnDescriptor, ColumnStats, TableDescriptor};

    fn column(name: &str, declared_type: &str, stats: ColumnStats) -> ColumnDescriptor {
        ColumnDescriptor {
            name: name.to_string(),
            declared_type: declared_type.to_string(),
            stats,
        }
    }

    fn table_view(columns: Vec<ColumnDescriptor>, rows: RowCount) -> TableView {
        TableView {
            table: TableDescriptor::new(
                "public".to_string(),
                "orders".to_string(),
                columns.len() as i64,
                0,
            ),
            columns,
            rows,
        }
    }

    #[test]
    fn test_humanized_labels_fit_eight_chars() {
        for (raw, abbr) in TYPE_ABBREVIATIONS.iter() {
            assert!(abbr.len() <= TYPE_WIDTH, "{raw} -> {abbr}");
        }
        assert!(humanize_type("some exotic user defined thing").chars().count() <= TYPE_WIDTH);
    }

    #[test]
    fn test_humanize_known_types() {
        assert_eq!(humanize_type("boolean"), "bool");
        assert_eq!(humanize_type("character varying"), "varchar");
        assert_eq!(humanize_type("timestamp without time zone"), "ts");
        assert_eq!(humanize_type("integer"), "int");
    }

    #[test]
    fn test_humanize_unknown_type_is_truncated() {
        assert_eq!(humanize_type("tsvector_special"), "tsvector");
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(28000, 42000), "66.7%");
        assert_eq!(percent(14000, 42000), "33.3%");
        assert_eq!(percent(1, 3), "33.3%");
    }

    #[test]
    fn test_percent_zero_total() {
        assert_eq!(percent(0, 0), "0.0%");
    }

    #[test]
    fn test_date_range_renders_calendar_months() {
        let rendered = temporal_range(
            "date",
            "2020-01-15",
            "2025-10-03",
        );
        assert_eq!(rendered, "Jan 2020-Oct 2025");
    }

    #[test]
    fn test_timestamp_range_uses_leading_date() {
        let rendered = temporal_range(
            "timestamp without time zone",
            "2021-06-01 08:30:00",
            "2021-12-24 23:59:59.999",
        );
        assert_eq!(rendered, "Jun 2021-Dec 2021");
    }

    #[test]
    fn test_time_range_renders_minutes() {
        let rendered = temporal_range("time without time zone", "08:30:15", "17:45:00");
        assert_eq!(rendered, "08:30-17:45");
    }

    #[test]
    fn test_malformed_bounds_render_empty() {
        assert_eq!(temporal_range("date", "not-a-date", "2025-10-03"), "");
        assert_eq!(temporal_range("date", "2020-01-15", "garbage"), "");
        assert_eq!(temporal_range("time without time zone", "xx:yy", "17:45"), "");
    }

    #[test]
    fn test_boolean_values_string() {
        let cell = values_cell(&column(
            "active",
            "boolean",
            ColumnStats::Bools {
                true_count: 28000,
                false_count: 14000,
            },
        ));
        assert_eq!(cell, "Yes 28000 (66.7%) | No 14000 (33.3%)");
    }

    #[test]
    fn test_numeric_range_cell() {
        let cell = range_cell(&column(
            "total",
            "numeric",
            ColumnStats::Range {
                min: Some("1".to_string()),
                max: Some("99999".to_string()),
            },
        ));
        assert_eq!(cell, "1-99999");
    }

    #[test]
    fn test_unavailable_stats_render_marker() {
        let cell = range_cell(&column("total", "numeric", ColumnStats::Unavailable));
        assert_eq!(cell, UNAVAILABLE);
        let cell = values_cell(&column("active", "boolean", ColumnStats::Unavailable));
        assert_eq!(cell, UNAVAILABLE);
    }

    #[test]
    fn test_empty_table_range_is_blank() {
        let cell = range_cell(&column(
            "total",
            "numeric",
            ColumnStats::Range {
                min: None,
                max: None,
            },
        ));
        assert_eq!(cell, "");
    }

    #[test]
    fn test_no_tables_message() {
        let plain = PlainRenderer.render(&[]);
        assert_eq!(plain, format!("{NO_TABLES_MESSAGE}\n"));
        let decorated = DecoratedRenderer.render(&[]);
        assert!(decorated.contains(NO_TABLES_MESSAGE));
        assert_eq!(decorated.lines().count(), 1);
    }

    #[test]
    fn test_unknown_count_distinct_from_zero() {
        let unknown = PlainRenderer.render(&[table_view(vec![], RowCount::Unknown)]);
        assert!(unknown.contains("rows: ?"));
        let zero = PlainRenderer.render(&[table_view(vec![], RowCount::Exact(0))]);
        assert!(zero.contains("rows: 0"));
    }

    #[test]
    fn test_header_shows_column_count() {
        let view = table_view(
            vec![
                column("id", "integer", ColumnStats::None),
                column("note", "text", ColumnStats::None),
            ],
            RowCount::Exact(5),
        );
        let out = PlainRenderer.render(&[view]);
        assert!(out.contains("public.orders  rows: 5  (2 cols)"));
    }

    #[test]
    fn test_estimated_count_marker() {
        let out = PlainRenderer.render(&[table_view(vec![], RowCount::Estimated(1234))]);
        assert!(out.contains("rows: ~1234"));
    }

    #[test]
    fn test_columns_align_within_a_table() {
        let view = table_view(
            vec![
                column("id", "integer", ColumnStats::Range {
                    min: Some("1".to_string()),
                    max: Some("9".to_string()),
                }),
                column("long_column_name", "text", ColumnStats::None),
            ],
            RowCount::Estimated(2),
        );
        let out = PlainRenderer.render(&[view]);
        let lines: Vec<&str> = out.lines().collect();
        // Header, column header, two column rows.
        assert_eq!(lines.len(), 4);
        let type_offset = lines[2].find("int").unwrap();
        assert_eq!(lines[3].find("text").unwrap(), type_offset);
    }

    #[test]
    fn test_renderers_are_content_equivalent() {
        let view = table_view(
            vec![column(
                "active",
                "boolean",
                ColumnStats::Bools {
                    true_count: 3,
                    false_count: 1,
                },
            )],
            RowCount::Exact(4),
        );
        let plain = PlainRenderer.render(std::slice::from_ref(&view));
        let decorated = DecoratedRenderer.render(std::slice::from_ref(&view));

        let strip_ansi = |s: &str| {
            let mut out = String::new();
            let mut chars = s.chars();
            while let Some(c) = chars.next() {
                if c == '\x1b' {
                    for c in chars.by_ref() {
                        if c == 'm' {
                            break;
                        }
                    }
                } else {
                    out.push(c);
                }
            }
            out
        };
        assert_eq!(strip_ansi(&decorated), plain);
    }
}
