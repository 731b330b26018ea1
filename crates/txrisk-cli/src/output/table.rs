#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    pub name: &'a str,
    pub align: Align,
    /// Truncatable columns give up width first when the table is too wide.
    pub truncatable: bool,
}

impl<'a> Column<'a> {
    pub fn fixed(name: &'a str, align: Align) -> Self {
        Self {
            name,
            align,
            truncatable: false,
        }
    }

    pub fn truncatable(name: &'a str) -> Self {
        Self {
            name,
            align: Align::Left,
            truncatable: true,
        }
    }
}

const INDENT: &str = "  ";
const GAP: &str = "  ";
const MIN_TRUNCATED_WIDTH: usize = 6;
const ELLIPSIS: &str = "...";
const DEFAULT_WIDTH: usize = 100;
const NARROWEST_WIDTH: usize = 40;

pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_WIDTH)
        .max(NARROWEST_WIDTH)
}

/// Aligned `label  value` lines.
pub fn label_rows<L: AsRef<str>>(entries: &[(L, String)]) -> Vec<String> {
    let label_width = entries
        .iter()
        .map(|(label, _)| label.as_ref().chars().count())
        .max()
        .unwrap_or(0);
    entries
        .iter()
        .map(|(label, value)| format!("{INDENT}{:<label_width$}  {value}", label.as_ref()))
        .collect()
}

/// Renders a table no wider than `max_width`. Truncatable columns are cut
/// with an ellipsis; when even that does not fit, each row becomes a block
/// of `name: value` lines headed by `block_label N`.
pub fn render(
    columns: &[Column<'_>],
    rows: &[Vec<String>],
    max_width: usize,
    block_label: &str,
) -> Vec<String> {
    if columns.is_empty() {
        return Vec::new();
    }

    match fit_widths(columns, rows, max_width) {
        Some(widths) => render_table(columns, rows, &widths),
        None => render_blocks(columns, rows, block_label),
    }
}

fn fit_widths(columns: &[Column<'_>], rows: &[Vec<String>], max_width: usize) -> Option<Vec<usize>> {
    let mut widths = columns
        .iter()
        .map(|column| column.name.chars().count())
        .collect::<Vec<usize>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let fixed_overhead = INDENT.len() + GAP.len() * columns.len().saturating_sub(1);
    let budget = max_width.checked_sub(fixed_overhead)?;

    loop {
        let total = widths.iter().sum::<usize>();
        if total <= budget {
            return Some(widths);
        }
        let excess = total - budget;

        // Shrink the widest truncatable column that still has room.
        let candidate = columns
            .iter()
            .zip(widths.iter())
            .enumerate()
            .filter(|(_, (column, width))| {
                column.truncatable && **width > column_floor(column)
            })
            .max_by_key(|(_, (_, width))| **width)
            .map(|(index, _)| index)?;

        let floor = column_floor(&columns[candidate]);
        let shrinkable = widths[candidate] - floor;
        widths[candidate] -= shrinkable.min(excess);
    }
}

fn column_floor(column: &Column<'_>) -> usize {
    column.name.chars().count().max(MIN_TRUNCATED_WIDTH)
}

fn render_table(columns: &[Column<'_>], rows: &[Vec<String>], widths: &[usize]) -> Vec<String> {
    let header = columns
        .iter()
        .map(|column| column.name.to_string())
        .collect::<Vec<String>>();
    let rule = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<String>>();

    let mut lines = vec![
        format_line(columns, &header, widths),
        format_line(columns, &rule, widths),
    ];
    lines.extend(rows.iter().map(|row| format_line(columns, row, widths)));
    lines
}

fn format_line(columns: &[Column<'_>], cells: &[String], widths: &[usize]) -> String {
    let rendered = columns
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(index, (column, &width))| {
            let cell = cells.get(index).map(String::as_str).unwrap_or("");
            let cell = truncate(cell, width);
            match column.align {
                Align::Left => format!("{cell:<width$}"),
                Align::Right => format!("{cell:>width$}"),
            }
        })
        .collect::<Vec<String>>()
        .join(GAP);
    format!("{INDENT}{}", rendered.trim_end())
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= ELLIPSIS.len() {
        return value.chars().take(width).collect();
    }
    let kept = value.chars().take(width - ELLIPSIS.len()).collect::<String>();
    format!("{kept}{ELLIPSIS}")
}

fn render_blocks(columns: &[Column<'_>], rows: &[Vec<String>], block_label: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for (index, row) in rows.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.push(format!("{INDENT}{block_label} {}", index + 1));
        let entries = columns
            .iter()
            .enumerate()
            .map(|(column_index, column)| {
                (
                    column.name,
                    row.get(column_index).cloned().unwrap_or_default(),
                )
            })
            .collect::<Vec<(&str, String)>>();
        lines.extend(
            label_rows(&entries)
                .into_iter()
                .map(|line| format!("{INDENT}{line}")),
        );
    }
    lines
}
