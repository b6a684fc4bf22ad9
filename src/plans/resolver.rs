use time::Date;

use super::types::{Assignment, Template};

/// Days from Sunday, matching the stored assignment day_of_week (0 = Sunday).
pub fn day_of_week(date: Date) -> i32 {
    i32::from(date.weekday().number_days_from_sunday())
}

/// The date range a materialization run walks: never before the caller's
/// `request_date` (past dates are never regenerated), never after the
/// template end (defaulted to one year from the stored start when open-ended).
pub fn effective_window(template: &Template, request_date: Date) -> Option<(Date, Date)> {
    let start = template.start_date.max(request_date);
    let end = template.end_date.unwrap_or_else(|| {
        template
            .start_date
            .replace_year(template.start_date.year() + 1)
            .unwrap_or(template.start_date + time::Duration::days(365))
    });
    if start > end {
        return None;
    }
    Some((start, end))
}

/// Lazy day-by-day walk over the effective window, yielding each assignment
/// whose day_of_week matches the date. Pure and restartable: building the
/// walk has no side effects and walking it twice yields the same sequence.
pub fn walk<'a>(
    template: &Template,
    assignments: &'a [Assignment],
    request_date: Date,
) -> PlanWalk<'a> {
    match effective_window(template, request_date) {
        Some((start, end)) => PlanWalk {
            assignments,
            cursor: Some(start),
            end,
            idx: 0,
        },
        None => PlanWalk {
            assignments,
            cursor: None,
            end: request_date,
            idx: 0,
        },
    }
}

pub struct PlanWalk<'a> {
    assignments: &'a [Assignment],
    cursor: Option<Date>,
    end: Date,
    idx: usize,
}

impl<'a> Iterator for PlanWalk<'a> {
    type Item = (Date, &'a Assignment);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let date = self.cursor?;
            if date > self.end {
                self.cursor = None;
                return None;
            }
            let dow = day_of_week(date);
            while self.idx < self.assignments.len() {
                let assignment = &self.assignments[self.idx];
                self.idx += 1;
                if assignment.day_of_week == dow {
                    return Some((date, assignment));
                }
            }
            self.idx = 0;
            self.cursor = date.next_day();
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::*;
    use crate::plans::types::{AssignmentTarget, PlanKind};

    fn template(start: Date, end: Option<Date>) -> Template {
        Template {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_kind: PlanKind::Workout,
            name: "push/pull".into(),
            description: String::new(),
            start_date: start,
            end_date: end,
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }

    fn assignment(day_of_week: i32) -> Assignment {
        Assignment {
            id: Uuid::new_v4(),
            day_of_week,
            meal_type: None,
            quantity: None,
            unit: None,
            target: AssignmentTarget::Exercise {
                exercise_id: Uuid::new_v4(),
            },
            sets: Vec::new(),
        }
    }

    #[test]
    fn monday_only_assignment_over_two_weeks_yields_two_dates() {
        // 2025-06-02 is a Monday; a 14-day window holds exactly two Mondays.
        let t = template(date!(2025 - 06 - 02), Some(date!(2025 - 06 - 15)));
        let assignments = vec![assignment(1)];
        let pairs: Vec<_> = walk(&t, &assignments, date!(2025 - 06 - 02)).collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, date!(2025 - 06 - 02));
        assert_eq!(pairs[1].0, date!(2025 - 06 - 09));
    }

    #[test]
    fn past_dates_are_clamped_to_request_date() {
        let t = template(date!(2025 - 06 - 02), Some(date!(2025 - 06 - 15)));
        let assignments = vec![assignment(1)];
        // Requesting mid-window skips the first Monday.
        let pairs: Vec<_> = walk(&t, &assignments, date!(2025 - 06 - 05)).collect();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, date!(2025 - 06 - 09));
    }

    #[test]
    fn open_ended_template_defaults_to_one_year() {
        let t = template(date!(2025 - 06 - 02), None);
        let (start, end) = effective_window(&t, date!(2025 - 06 - 02)).unwrap();
        assert_eq!(start, date!(2025 - 06 - 02));
        assert_eq!(end, date!(2026 - 06 - 02));
    }

    #[test]
    fn window_entirely_in_the_past_is_empty() {
        let t = template(date!(2025 - 01 - 01), Some(date!(2025 - 01 - 31)));
        let assignments = vec![assignment(1)];
        assert!(effective_window(&t, date!(2025 - 03 - 01)).is_none());
        assert_eq!(walk(&t, &assignments, date!(2025 - 03 - 01)).count(), 0);
    }

    #[test]
    fn walk_is_restartable() {
        let t = template(date!(2025 - 06 - 02), Some(date!(2025 - 06 - 15)));
        let assignments = vec![assignment(1), assignment(3)];
        let first: Vec<_> = walk(&t, &assignments, date!(2025 - 06 - 02))
            .map(|(d, a)| (d, a.id))
            .collect();
        let second: Vec<_> = walk(&t, &assignments, date!(2025 - 06 - 02))
            .map(|(d, a)| (d, a.id))
            .collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn multiple_assignments_on_one_day_keep_order() {
        let t = template(date!(2025 - 06 - 02), Some(date!(2025 - 06 - 02)));
        let a1 = assignment(1);
        let a2 = assignment(1);
        let assignments = vec![a1.clone(), a2.clone()];
        let pairs: Vec<_> = walk(&t, &assignments, date!(2025 - 06 - 02)).collect();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].1.id, a1.id);
        assert_eq!(pairs[1].1.id, a2.id);
    }
}
