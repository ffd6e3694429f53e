use tracing::{info, warn};

use super::{EntryInput, StoreError, TimetableDb};
use crate::grid::Day;

/// The department's sample week: (day, class, time, subject, room).
const SAMPLE_WEEK: [(Day, &str, &str, &str, &str); 16] = [
    (Day::Monday, "MCA I", "9:00 to 10:00", "OOM (NGM)", "110"),
    (Day::Monday, "MCA II", "9:00 to 10:00", "DS (VIP)", "109"),
    (Day::Monday, "BCA I", "9:00 to 10:00", "Lab DBMS (B1) - DK", "110"),
    (Day::Monday, "BCA II", "9:00 to 10:00", "Training", "105"),
    (Day::Monday, "MCA I", "10:00 to 11:00", "DWDM (SSS)", "110"),
    (Day::Monday, "MCA II", "10:00 to 11:00", "DS (VIP)", "109"),
    (Day::Monday, "BCA I", "10:00 to 11:00", "Lab DBMS (B2) - RMH", "110"),
    (Day::Monday, "BCA II", "10:00 to 11:00", "OOM (NGM)", "105"),
    (Day::Tuesday, "MCA I", "9:00 to 10:00", "Python (VIP)", "110"),
    (Day::Tuesday, "MCA II", "9:00 to 10:00", "Dot net (RMH)", "110"),
    (Day::Wednesday, "MCA I", "9:00 to 10:00", "OS (SSG)", "110"),
    (Day::Wednesday, "MCA II", "9:00 to 10:00", "STQA (DSS)", "109"),
    (Day::Thursday, "MCA I", "9:00 to 10:00", "CN (MP)", "110"),
    (Day::Thursday, "MCA II", "9:00 to 10:00", "OT (SSG)", "109"),
    (Day::Friday, "MCA I", "9:00 to 10:00", "Lab on Linux (B1 & B2) - MP", "110"),
    (Day::Friday, "MCA II", "9:00 to 10:00", "STQA (DSS)", "109"),
];

impl TimetableDb {
    /// Inserts the sample week if there are no entries yet. Returns how many
    /// entries were added.
    ///
    /// Sample rows that do not fit the configured axes are skipped.
    pub fn seed_sample_week(&self) -> Result<usize, StoreError> {
        if self.count_entries()? > 0 {
            info!("Timetable already has entries, skipping sample data");
            return Ok(0);
        }

        let mut inserted = 0;
        for (day, class, time, subject, room) in SAMPLE_WEEK {
            let input = EntryInput {
                day,
                class: class.to_string(),
                time: time.to_string(),
                subject: subject.to_string(),
                room: room.to_string(),
                teacher: None,
            };
            match self.create_entry(&input) {
                Ok(_) => inserted += 1,
                Err(StoreError::Invalid { message, .. }) => {
                    warn!("Skipping sample entry {} {} {}: {}", day, class, time, message);
                }
                Err(e) => return Err(e),
            }
        }

        info!("Seeded {} sample timetable entries", inserted);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::csv::to_csv_string;
    use crate::grid::{build_grid, Axes, DayScope, View};

    #[test]
    fn test_seed_once() {
        let db = TimetableDb::open_in_memory(Axes::default()).unwrap();
        assert_eq!(db.seed_sample_week().unwrap(), SAMPLE_WEEK.len());
        assert_eq!(db.seed_sample_week().unwrap(), 0);
        assert_eq!(db.count_entries().unwrap(), SAMPLE_WEEK.len());
    }

    #[test]
    fn test_seeded_monday_csv() {
        let db = TimetableDb::open_in_memory(Axes::default()).unwrap();
        db.seed_sample_week().unwrap();

        let entries = db.list_entries().unwrap();
        let grid = build_grid(
            &entries,
            db.axes(),
            &View::Day(DayScope::Single(Day::Monday)),
        );
        let csv = to_csv_string(&grid);
        let lines: Vec<&str> = csv.split_terminator("\r\n").collect();

        assert_eq!(
            lines[1],
            "\"9:00 to 10:00\",\"OOM (NGM) (110)\",\"DS (VIP) (109)\",\"Lab DBMS (B1) - DK (110)\",\"Training (105)\""
        );
        assert_eq!(grid.shadowed_entries(), 0);
    }

    #[test]
    fn test_seed_skips_rows_outside_axes() {
        // The first period doubles as the break here, so only the four
        // Monday 10:00 entries fit
        let axes = Axes {
            break_slot: Some("9:00 to 10:00".to_string()),
            ..Axes::default()
        };
        let db = TimetableDb::open_in_memory(axes).unwrap();
        assert_eq!(db.seed_sample_week().unwrap(), 4);
    }
}
