//! Plain-text timetable grid.
//!
//! Renders a [`Timetable`] as a day-by-slot table and parses it back.
//!
//! ```text
//! Division 1 (Classroom: Classroom_1)
//! Time | Monday | Tuesday | Wednesday | Thursday | Friday | Saturday
//! 8:00 AM | Math (A) | Physics (B) | ...
//! 9:00 AM | ...
//! 10:00 AM | ...
//! Breakfast Break(11:00-11:15)
//! 11:15 AM | ...
//! 12:15 PM | ...
//! Lunch Break(1:15-2:00)
//! 2:00 PM | ... | ... | ... | ... | ... |
//! ```
//!
//! A cell is `subject (faculty)`; an empty cell is blank. Saturday has no
//! `2:00 PM` slot, so its last cell is always blank. Only the first
//! assignment of an over-booked slot is rendered.

use crate::error::{Result, TimetableError};
use crate::models::calendar::{teaching_days, BREAKS, DAY_NAMES, SLOT_LABELS};
use crate::models::{Assignment, Schedule, TimeSlot, Timetable};

const SEPARATOR: &str = " | ";

/// Renders one division's week.
pub fn render_timetable(timetable: &Timetable) -> String {
    let mut lines = Vec::with_capacity(SLOT_LABELS.len() + BREAKS.len() + 2);
    lines.push(format!(
        "Division {} (Classroom: {})",
        timetable.division, timetable.classroom
    ));

    let mut header = vec!["Time"];
    header.extend(teaching_days().map(|d| DAY_NAMES[d as usize]));
    lines.push(header.join(SEPARATOR));

    for (index, label) in SLOT_LABELS.iter().enumerate() {
        for marker in BREAKS.iter().filter(|b| b.before_slot == index) {
            lines.push(marker.banner.to_string());
        }

        let mut row = vec![label.to_string()];
        for day in teaching_days() {
            let cell = TimeSlot::new(day, index as u8)
                .ok()
                .and_then(|slot| timetable.assignment_at(slot))
                .map(|a| format!("{} ({})", a.subject, a.faculty))
                .unwrap_or_default();
            row.push(cell);
        }
        lines.push(row.join(SEPARATOR).trim_end().to_string());
    }

    lines.join("\n")
}

/// Renders every division, separated by a blank line.
pub fn render_schedule(schedule: &Schedule) -> String {
    schedule
        .timetables()
        .map(render_timetable)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Parses a grid produced by [`render_timetable`].
pub fn parse_timetable(text: &str) -> Result<Timetable> {
    let lines: Vec<(usize, &str)> = text.lines().enumerate().map(|(i, l)| (i + 1, l)).collect();
    parse_block(&lines)
}

/// Parses a grid produced by [`render_schedule`].
pub fn parse_schedule(text: &str) -> Result<Schedule> {
    let mut schedule = Schedule::new();
    let mut block: Vec<(usize, &str)> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        if line.starts_with("Division ") && !block.is_empty() {
            schedule.add_timetable(parse_block(&block)?);
            block.clear();
        }
        block.push((i + 1, line));
    }
    if !block.is_empty() {
        schedule.add_timetable(parse_block(&block)?);
    }

    Ok(schedule)
}

fn parse_block(lines: &[(usize, &str)]) -> Result<Timetable> {
    let mut rows = lines.iter().filter(|(_, l)| !l.trim().is_empty());

    let &(line, title) = rows.next().ok_or_else(|| parse_error(1, "empty grid"))?;
    let (division, classroom) = parse_title(title).ok_or_else(|| {
        parse_error(line, "expected 'Division <n> (Classroom: <name>)'")
    })?;
    let mut timetable = Timetable::new(division, classroom);

    let &(line, header) = rows
        .next()
        .ok_or_else(|| parse_error(line, "missing header row"))?;
    if header.split('|').next().map(str::trim) != Some("Time") {
        return Err(parse_error(line, "header row must start with 'Time'"));
    }

    for &(line, text) in rows {
        let text = text.trim();
        if BREAKS.iter().any(|b| b.banner == text) {
            continue;
        }

        let mut cells = text.split('|').map(str::trim);
        let label = cells.next().unwrap_or_default();
        let index = SLOT_LABELS
            .iter()
            .position(|l| *l == label)
            .ok_or_else(|| parse_error(line, format!("unknown slot label '{label}'")))?;

        for (day, cell) in teaching_days().zip(cells) {
            if cell.is_empty() {
                continue;
            }
            let (subject, faculty) = parse_cell(cell)
                .ok_or_else(|| parse_error(line, format!("malformed cell '{cell}'")))?;
            let slot = TimeSlot::new(day, index as u8)
                .map_err(|e| parse_error(line, e.to_string()))?;
            timetable.push(Assignment::new(
                division,
                slot,
                faculty,
                subject,
                classroom,
            ))?;
        }
    }

    for day in teaching_days() {
        let mut sorted = timetable.day(day).to_vec();
        sorted.sort_by_key(|a| a.slot);
        timetable.replace_day(day, sorted);
    }

    Ok(timetable)
}

fn parse_title(title: &str) -> Option<(u32, &str)> {
    let rest = title.trim().strip_prefix("Division ")?;
    let (id, room) = rest.split_once(" (Classroom: ")?;
    Some((id.trim().parse().ok()?, room.strip_suffix(')')?))
}

fn parse_cell(cell: &str) -> Option<(&str, &str)> {
    let (subject, faculty) = cell.strip_suffix(')')?.rsplit_once(" (")?;
    if subject.is_empty() || faculty.is_empty() {
        return None;
    }
    Some((subject, faculty))
}

fn parse_error(line: usize, message: impl Into<String>) -> TimetableError {
    TimetableError::GridParse {
        line,
        message: message.into(),
    }
}
