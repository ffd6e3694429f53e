/// Pre-index of entries by (day, class, time) position
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::axes::Axes;
use super::types::{Day, TimetableEntry};

/// Positions of a cell along the day, class and time-slot axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub day: usize,
    pub class: usize,
    pub slot: usize,
}

/// Maps every cell to the first entry (in input order) that claims it.
///
/// Later entries for an occupied cell are kept as shadowed so callers can
/// report them. Entries whose day, class or time is not part of the axes
/// cannot be placed and are only counted.
pub struct EntryIndex<'a> {
    cells: HashMap<CellKey, &'a TimetableEntry>,
    shadowed: Vec<(CellKey, &'a TimetableEntry)>,
    unplaced: usize,
}

impl<'a> EntryIndex<'a> {
    pub fn build(entries: &'a [TimetableEntry], axes: &Axes) -> Self {
        let mut cells = HashMap::with_capacity(entries.len());
        let mut shadowed = Vec::new();
        let mut unplaced = 0;

        for entry in entries {
            let Some(key) = key_for(axes, entry.day, &entry.class, &entry.time) else {
                unplaced += 1;
                continue;
            };

            match cells.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(_) => shadowed.push((key, entry)),
            }
        }

        Self {
            cells,
            shadowed,
            unplaced,
        }
    }

    pub fn get(&self, key: CellKey) -> Option<&'a TimetableEntry> {
        self.cells.get(&key).copied()
    }

    /// Entries that lost the first-wins tie-break, in input order.
    pub fn shadowed(&self) -> &[(CellKey, &'a TimetableEntry)] {
        &self.shadowed
    }

    pub fn unplaced(&self) -> usize {
        self.unplaced
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Resolves labels to axis positions.
pub fn key_for(axes: &Axes, day: Day, class: &str, time: &str) -> Option<CellKey> {
    Some(CellKey {
        day: axes.day_position(day)?,
        class: axes.class_position(class)?,
        slot: axes.slot_position(time)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, day: Day, class: &str, time: &str, subject: &str) -> TimetableEntry {
        TimetableEntry {
            id: id.to_string(),
            day,
            class: class.to_string(),
            time: time.to_string(),
            subject: subject.to_string(),
            room: "110".to_string(),
            teacher: None,
            teacher_name: None,
        }
    }

    #[test]
    fn test_first_entry_wins() {
        let axes = Axes::default();
        let entries = vec![
            entry("a", Day::Monday, "MCA I", "9:00 to 10:00", "OOM (NGM)"),
            entry("b", Day::Monday, "MCA I", "9:00 to 10:00", "DS (VIP)"),
        ];
        let index = EntryIndex::build(&entries, &axes);

        let key = key_for(&axes, Day::Monday, "MCA I", "9:00 to 10:00").unwrap();
        assert_eq!(index.get(key).map(|e| e.id.as_str()), Some("a"));
        assert_eq!(index.shadowed().len(), 1);
        assert_eq!(index.shadowed()[0].1.id, "b");
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_unknown_labels_are_unplaced() {
        let axes = Axes::default();
        let entries = vec![
            entry("a", Day::Monday, "PhD I", "9:00 to 10:00", "Thesis"),
            entry("b", Day::Monday, "MCA I", "8:00 to 9:00", "Yoga"),
        ];
        let index = EntryIndex::build(&entries, &axes);

        assert!(index.is_empty());
        assert_eq!(index.unplaced(), 2);
        assert!(index.shadowed().is_empty());
    }
}
