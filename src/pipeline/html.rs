//! HTML generation for sheet tables.
//!
//! Builds the document handed to the PDF renderer: one `<table>` per sheet
//! (with an optional `<caption>` in combined layout) inside a minimal UTF-8
//! shell. All text originating from the workbook goes through
//! [`escape_html`]; nothing is ever interpolated raw.

use crate::pipeline::read::SheetTable;
use std::fmt::Write;

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render one sheet as an HTML `<table>`.
///
/// `caption` is placed in a `<caption>` element when given; the combined
/// layout passes `Sheet: {name}`.
pub fn render_table(table: &SheetTable, caption: Option<&str>) -> String {
    let mut html = String::with_capacity(64 + table.rows.len() * table.headers.len() * 16);

    html.push_str("<table>\n");
    if let Some(caption) = caption {
        let _ = writeln!(html, "<caption>{}</caption>", escape_html(caption));
    }

    html.push_str("<thead>\n<tr>");
    for header in &table.headers {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape_html(&cell.to_string()));
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

/// Caption text used for each table in a combined workbook document.
pub fn sheet_caption(sheet_name: &str) -> String {
    format!("Sheet: {sheet_name}")
}

/// Wrap rendered tables in the document shell.
pub fn wrap_document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{}</title>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// Full document for a single sheet.
pub fn sheet_document(table: &SheetTable) -> String {
    wrap_document(&table.name, &render_table(table, None))
}

/// Full document for several sheets of one workbook, each under its caption.
pub fn combined_document<'a>(title: &str, tables: impl IntoIterator<Item = &'a SheetTable>) -> String {
    let body: String = tables
        .into_iter()
        .map(|t| render_table(t, Some(&sheet_caption(&t.name))))
        .collect::<Vec<_>>()
        .join("<br>\n");
    wrap_document(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::read::CellValue;

    fn table(name: &str, headers: &[&str], rows: Vec<Vec<CellValue>>) -> SheetTable {
        SheetTable {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            escape_html(r#"<b>&"x"</b>"#),
            "&lt;b&gt;&amp;&quot;x&quot;&lt;/b&gt;"
        );
        assert_eq!(escape_html("it's"), "it&#39;s");
        assert_eq!(escape_html("plain text"), "plain text");
    }

    #[test]
    fn entities_in_input_are_escaped_again() {
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }

    #[test]
    fn table_has_head_and_body() {
        let t = table(
            "Data",
            &["Name", "Qty"],
            vec![vec![CellValue::Text("apple".into()), CellValue::Float(3.0)]],
        );
        let html = render_table(&t, None);
        assert!(html.contains("<thead>\n<tr><th>Name</th><th>Qty</th></tr>\n</thead>"));
        assert!(html.contains("<tbody>\n<tr><td>apple</td><td>3</td></tr>\n</tbody>"));
        assert!(!html.contains("<caption>"));
    }

    #[test]
    fn cell_and_header_text_is_escaped() {
        let t = table(
            "S",
            &["<h>"],
            vec![vec![CellValue::Text(r#"<b>&"x"</b>"#.into())]],
        );
        let html = render_table(&t, None);
        assert!(html.contains("<th>&lt;h&gt;</th>"));
        assert!(html.contains("<td>&lt;b&gt;&amp;&quot;x&quot;&lt;/b&gt;</td>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn empty_cells_render_as_empty_td() {
        let t = table("S", &["A", "B"], vec![vec![CellValue::Empty, CellValue::Int(1)]]);
        assert!(render_table(&t, None).contains("<tr><td></td><td>1</td></tr>"));
    }

    #[test]
    fn caption_is_escaped() {
        let t = table("R&D", &["A"], vec![vec![CellValue::Int(1)]]);
        let html = render_table(&t, Some(&sheet_caption(&t.name)));
        assert!(html.contains("<caption>Sheet: R&amp;D</caption>"));
    }

    #[test]
    fn document_shell_declares_utf8() {
        let doc = sheet_document(&table("Übersicht", &["A"], vec![]));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<meta charset=\"UTF-8\">"));
        assert!(doc.contains("<title>Übersicht</title>"));
        assert!(doc.trim_end().ends_with("</html>"));
    }

    #[test]
    fn combined_document_has_one_caption_per_table() {
        let a = table("Q1", &["A"], vec![vec![CellValue::Int(1)]]);
        let b = table("Q2", &["A"], vec![vec![CellValue::Int(2)]]);
        let doc = combined_document("report", [&a, &b]);
        assert_eq!(doc.matches("<caption>").count(), 2);
        assert!(doc.find("Sheet: Q1").unwrap() < doc.find("Sheet: Q2").unwrap());
        assert_eq!(doc.matches("<html>").count(), 1);
    }
}
