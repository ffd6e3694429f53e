/// HTML painting of a snapshot for the generator view
use super::{Control, Shade, Snapshot, SnapshotCell};

const STYLE: &str = "table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #999;padding:4px;vertical-align:top;font:13px sans-serif}\
.header{background:#f3f4f6}.group{background:#e5e7eb;font-weight:bold}\
.filled{background:#fde68a}.empty{background:#f9fafb}.break{background:#d1d5db}\
.room{font-size:11px}.controls{margin-top:4px}";

/// Renders the snapshot as a standalone HTML document.
pub fn to_html(snapshot: &Snapshot) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>");
    out.push_str(&escape(&snapshot.title));
    out.push_str("</title><style>");
    out.push_str(STYLE);
    out.push_str("</style></head><body>");

    out.push_str(&format!(
        "<h2>{}</h2><p>{}</p><table><thead><tr>",
        escape(&snapshot.title),
        escape(&snapshot.caption)
    ));
    for cell in &snapshot.header {
        out.push_str(&format!(
            "<th class=\"{}\">{}</th>",
            shade_class(cell.shade),
            escape(&cell.lines.join(" "))
        ));
    }
    out.push_str("</tr></thead><tbody>");

    for row in &snapshot.body {
        out.push_str("<tr>");
        for cell in row.iter().filter(|c| !c.is_covered()) {
            push_cell(&mut out, cell);
        }
        out.push_str("</tr>");
    }

    out.push_str("</tbody></table></body></html>");
    out
}

fn push_cell(out: &mut String, cell: &SnapshotCell) {
    out.push_str(&format!("<td class=\"{}\"", shade_class(cell.shade)));
    if cell.row_span > 1 {
        out.push_str(&format!(" rowspan=\"{}\"", cell.row_span));
    }
    out.push('>');

    for (i, line) in cell.lines.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("<div><strong>{}</strong></div>", escape(line)));
        } else {
            out.push_str(&format!("<div class=\"room\">{}</div>", escape(line)));
        }
    }

    if !cell.controls.is_empty() {
        out.push_str("<div class=\"controls\">");
        for control in &cell.controls {
            let target = cell.entry_id.as_deref().unwrap_or("");
            let (action, label) = match control {
                Control::Add => ("add", "+"),
                Control::Edit => ("edit", "Edit"),
                Control::Delete => ("delete", "Delete"),
            };
            out.push_str(&format!(
                "<button type=\"button\" data-action=\"{}\" data-entry=\"{}\">{}</button>",
                action,
                escape(target),
                label
            ));
        }
        out.push_str("</div>");
    }

    out.push_str("</td>");
}

fn shade_class(shade: Shade) -> &'static str {
    match shade {
        Shade::Header => "header",
        Shade::Group => "group",
        Shade::Filled => "filled",
        Shade::Empty => "empty",
        Shade::Break => "break",
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
