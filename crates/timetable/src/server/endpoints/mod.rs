pub mod departments;
pub mod entries;
pub mod lectures;
pub mod status;
pub mod subjects;
pub mod teachers;
pub mod timetable;
