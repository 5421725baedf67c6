use comodo_core::ScanReport;

const TABLE_TITLE: &str = "#### Comodo";
const TABLE_HEADERS: [&str; 4] = ["Infected", "Result", "Engine", "Updated"];

/// Compact JSON in the Malice wire shape.
pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    report.envelope().to_json()
}

/// Markdown table titled `#### Comodo`, columns padded to equal width.
pub fn render_markdown_table(report: &ScanReport) -> String {
    let row = [
        report.infected().to_string(),
        report.label().to_string(),
        report.engine_version().to_string(),
        report.updated_at().trim().to_string(),
    ];
    let widths: Vec<usize> = TABLE_HEADERS
        .iter()
        .zip(row.iter())
        .map(|(header, value)| header.chars().count().max(value.chars().count()))
        .collect();

    let format_row = |cells: &[&str]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!(" {:<width$} ", cell, width = width))
            .collect();
        format!("|{}|", padded.join("|"))
    };

    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    let values: Vec<&str> = row.iter().map(String::as_str).collect();

    format!(
        "{}\n{}\n|{}|\n{}\n",
        TABLE_TITLE,
        format_row(&TABLE_HEADERS[..]),
        separator.join("|"),
        format_row(&values[..])
    )
}
