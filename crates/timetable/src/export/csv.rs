/// CSV serialization of a built grid
use crate::grid::{ClassScope, DayScope, Grid, RowHeader, View};

const RECORD_SEPARATOR: &str = "\r\n";

/// Serializes `grid` into the generator's CSV layout.
///
/// Every field is double-quoted and records end with CRLF. Filled cells read
/// `<subject> (<room>)`, empty and break cells are `""`.
pub fn export_csv(grid: &Grid) -> Vec<u8> {
    to_csv_string(grid).into_bytes()
}

pub fn to_csv_string(grid: &Grid) -> String {
    let mut out = String::new();

    let mut header: Vec<String> = match grid.view() {
        View::Day(DayScope::Single(_)) => vec!["Time".to_string()],
        View::Day(DayScope::All) => vec!["Day".to_string(), "Class".to_string()],
        View::Class(ClassScope::Single(_) | ClassScope::All) => vec!["Class\\Time".to_string()],
    };
    header.extend(grid.columns().iter().map(|c| c.label().to_string()));
    push_record(&mut out, &header);

    for (r, row) in grid.rows().iter().enumerate() {
        let mut fields = match row {
            RowHeader::Slot { time, .. } => vec![time.clone()],
            RowHeader::DayClass { day, class } => vec![day.to_string(), class.clone()],
            RowHeader::ClassDay { .. } => vec![row.label()],
        };
        fields.extend((0..grid.column_count()).map(|c| {
            grid.cell(r, c)
                .map(|entry| entry.cell_text())
                .unwrap_or_default()
        }));
        push_record(&mut out, &fields);
    }

    out
}

fn push_record(out: &mut String, fields: &[String]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&quote(field));
    }
    out.push_str(RECORD_SEPARATOR);
}

/// Wraps a field in double quotes, doubling any embedded quote.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{build_grid, Axes, Day, TimetableEntry};

    fn entry(day: Day, class: &str, time: &str, subject: &str, room: &str) -> TimetableEntry {
        TimetableEntry {
            id: format!("{day}-{class}-{time}"),
            day,
            class: class.to_string(),
            time: time.to_string(),
            subject: subject.to_string(),
            room: room.to_string(),
            teacher: None,
            teacher_name: None,
        }
    }

    #[test]
    fn test_empty_monday_layout() {
        let axes = Axes::default();
        let grid = build_grid(&[], &axes, &View::Day(DayScope::Single(Day::Monday)));
        let csv = to_csv_string(&grid);

        let expected = concat!(
            "\"Time\",\"MCA I\",\"MCA II\",\"BCA I\",\"BCA II\"\r\n",
            "\"9:00 to 10:00\",\"\",\"\",\"\",\"\"\r\n",
            "\"10:00 to 11:00\",\"\",\"\",\"\",\"\"\r\n",
            "\"11:15 to 12:15\",\"\",\"\",\"\",\"\"\r\n",
            "\"12:15 to 1:15\",\"\",\"\",\"\",\"\"\r\n",
            "\"1:15 to 2:00\",\"\",\"\",\"\",\"\"\r\n",
            "\"2:00 to 3:00\",\"\",\"\",\"\",\"\"\r\n",
            "\"3:00 to 4:00\",\"\",\"\",\"\",\"\"\r\n",
        );
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_single_entry_lands_in_its_class_column() {
        let axes = Axes::default();
        let entries = vec![entry(Day::Monday, "MCA I", "9:00 to 10:00", "OOM (NGM)", "110")];
        let grid = build_grid(&entries, &axes, &View::Day(DayScope::Single(Day::Monday)));
        let csv = to_csv_string(&grid);

        let row = csv.split("\r\n").nth(1).unwrap();
        assert_eq!(row, "\"9:00 to 10:00\",\"OOM (NGM) (110)\",\"\",\"\",\"\"");
    }

    #[test]
    fn test_all_days_layout() {
        let axes = Axes::default();
        let entries = vec![entry(Day::Tuesday, "MCA II", "3:00 to 4:00", "Dot net (RMH)", "110")];
        let grid = build_grid(&entries, &axes, &View::Day(DayScope::All));
        let csv = to_csv_string(&grid);
        let lines: Vec<&str> = csv.split_terminator("\r\n").collect();

        assert_eq!(
            lines[0],
            "\"Day\",\"Class\",\"9:00 to 10:00\",\"10:00 to 11:00\",\"11:15 to 12:15\",\"12:15 to 1:15\",\"1:15 to 2:00\",\"2:00 to 3:00\",\"3:00 to 4:00\""
        );
        assert_eq!(lines.len(), 1 + 5 * 4);
        assert!(lines[1].starts_with("\"Monday\",\"MCA I\","));
        assert!(lines[4].starts_with("\"Monday\",\"BCA II\","));
        assert_eq!(
            lines[6],
            "\"Tuesday\",\"MCA II\",\"\",\"\",\"\",\"\",\"\",\"\",\"Dot net (RMH) (110)\""
        );
    }

    #[test]
    fn test_class_view_layout() {
        let axes = Axes::default();
        let entries = vec![entry(Day::Friday, "BCA I", "9:00 to 10:00", "Lab on Linux", "110")];
        let grid = build_grid(
            &entries,
            &axes,
            &View::Class(ClassScope::Single("BCA I".to_string())),
        );
        let csv = to_csv_string(&grid);
        let lines: Vec<&str> = csv.split_terminator("\r\n").collect();

        assert!(lines[0].starts_with("\"Class\\Time\",\"9:00 to 10:00\","));
        assert_eq!(lines.len(), 6);
        assert!(lines[1].starts_with("\"BCA I - Monday\","));
        assert!(lines[5].starts_with("\"BCA I - Friday\",\"Lab on Linux (110)\","));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote(""), "\"\"");
    }
}
