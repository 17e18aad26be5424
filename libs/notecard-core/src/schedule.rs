//! Recovery of persisted scheduling state from block text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ScheduleRecord;

/// `!<due>,<interval>,<ease>` where `<due>` is digits and hyphens.
static INLINE_SCHEDULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!([\d-]+),(\d+),(\d+)").expect("inline schedule pattern"));

/// `<!--SR:<due>,<interval>,<ease>-->`
static COMMENT_SCHEDULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--SR:([\d-]+),(\d+),(\d+)-->").expect("comment schedule pattern"));

/// Recover one schedule record per pair position from a block's text.
///
/// Inline markers take precedence; the comment form is only consulted when no
/// inline marker is present. Matches are assigned to pair positions in
/// textual order. Positions beyond the number of matches get the base ease
/// with no interval or due date; excess matches are dropped.
pub fn extract_schedules(block_text: &str, pair_count: usize, base_ease: u32) -> Vec<ScheduleRecord> {
    let mut records: Vec<ScheduleRecord> = INLINE_SCHEDULE
        .captures_iter(block_text)
        .filter_map(|caps| record_from_captures(&caps, base_ease))
        .collect();
    if records.is_empty() {
        records = COMMENT_SCHEDULE
            .captures_iter(block_text)
            .filter_map(|caps| record_from_captures(&caps, base_ease))
            .collect();
    }

    records.truncate(pair_count);
    while records.len() < pair_count {
        records.push(ScheduleRecord::unscheduled(base_ease));
    }
    records
}

fn record_from_captures(caps: &regex::Captures<'_>, base_ease: u32) -> Option<ScheduleRecord> {
    let due = caps.get(1)?.as_str().to_string();
    let interval = caps.get(2)?.as_str().parse().ok();
    let ease = caps.get(3)?.as_str().parse().unwrap_or(base_ease);
    Some(ScheduleRecord {
        due: Some(due),
        interval,
        ease,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comment_marker_is_recovered() {
        let records = extract_schedules("<!--SR:2024-01-01,4,230-->", 1, 250);
        assert_eq!(
            records,
            vec![ScheduleRecord {
                due: Some("2024-01-01".to_string()),
                interval: Some(4),
                ease: 230,
            }]
        );
    }

    #[test]
    fn missing_markers_fall_back_to_base_ease() {
        let records = extract_schedules("no markers here", 2, 250);
        assert_eq!(
            records,
            vec![
                ScheduleRecord::unscheduled(250),
                ScheduleRecord::unscheduled(250)
            ]
        );
    }

    #[test]
    fn inline_markers_take_precedence_over_the_comment_form() {
        // Sibling entries persisted inside one comment.
        let text = "Q:::A\n<!--SR:!2023-09-02,4,270!2023-09-10,5,290-->";
        let records = extract_schedules(text, 2, 250);
        assert_eq!(records[0].due.as_deref(), Some("2023-09-02"));
        assert_eq!(records[0].interval, Some(4));
        assert_eq!(records[0].ease, 270);
        assert_eq!(records[1].due.as_deref(), Some("2023-09-10"));
        assert_eq!(records[1].interval, Some(5));
        assert_eq!(records[1].ease, 290);
    }

    #[test]
    fn excess_matches_are_dropped() {
        let text = "!2024-01-01,1,210!2024-01-02,2,220!2024-01-03,3,230";
        let records = extract_schedules(text, 1, 250);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].due.as_deref(), Some("2024-01-01"));
    }

    #[test]
    fn short_match_lists_are_padded_positionally() {
        let records = extract_schedules("!2024-05-05,7,240", 3, 250);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].ease, 240);
        assert_eq!(records[1], ScheduleRecord::unscheduled(250));
        assert_eq!(records[2], ScheduleRecord::unscheduled(250));
    }

    #[test]
    fn malformed_markers_do_not_match() {
        let records = extract_schedules("<!--SR:someday,4,230-->", 1, 250);
        assert_eq!(records, vec![ScheduleRecord::unscheduled(250)]);
    }
}
