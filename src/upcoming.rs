use chrono::NaiveDate;

use crate::models::Event;

pub const NOTHING_UPCOMING: &str = "Get started";
pub const NOTHING_UPCOMING_PROMPT: &str = "Register for events on the Home page";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Countdown {
    Nothing,
    Today { title: String },
    InDays { days: i64, title: String },
}

impl Countdown {
    /// Countdown text and the title line shown next to it.
    pub fn labels(&self) -> (String, String) {
        match self {
            Countdown::Nothing => (
                NOTHING_UPCOMING.to_string(),
                NOTHING_UPCOMING_PROMPT.to_string(),
            ),
            Countdown::Today { title } => ("less than 24 hours".to_string(), title.clone()),
            Countdown::InDays { days, title } => (days_label(*days), title.clone()),
        }
    }

    pub fn short_label(&self) -> String {
        match self {
            Countdown::Nothing => "Stay tuned".to_string(),
            Countdown::Today { .. } => "Today".to_string(),
            Countdown::InDays { days, .. } => days_label(*days),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Countdown::Nothing => None,
            Countdown::Today { title } | Countdown::InDays { title, .. } => Some(title),
        }
    }
}

fn days_label(days: i64) -> String {
    if days == 1 {
        "1 day".to_string()
    } else {
        format!("{days} days")
    }
}

/// Finds the soonest event dated today or later. Earlier entries win ties.
pub fn upcoming_event(events: &[Event], today: NaiveDate) -> Countdown {
    let mut next: Option<(NaiveDate, &Event)> = None;
    for event in events {
        let Some(date) = event.calendar_date() else {
            tracing::debug!(id = %event.id, date = %event.date, "skipping event with unparseable date");
            continue;
        };
        if date < today {
            continue;
        }
        match next {
            Some((best, _)) if best <= date => {}
            _ => next = Some((date, event)),
        }
    }

    let Some((date, event)) = next else {
        return Countdown::Nothing;
    };
    if date == today {
        return Countdown::Today {
            title: event.title.clone(),
        };
    }
    Countdown::InDays {
        days: (date - today).num_days(),
        title: event.title.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventId;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
    }

    fn event_on(id: i64, title: &str, date: NaiveDate) -> Event {
        Event {
            id: EventId::Num(id),
            title: title.to_string(),
            category: "Tech".to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            time: String::new(),
            location: String::new(),
            spots_left: 5,
        }
    }

    #[test]
    fn empty_list_is_sentinel() {
        let countdown = upcoming_event(&[], today());
        assert_eq!(countdown, Countdown::Nothing);
        assert_eq!(
            countdown.labels(),
            (
                "Get started".to_string(),
                "Register for events on the Home page".to_string()
            )
        );
        assert_eq!(countdown.short_label(), "Stay tuned");
    }

    #[test]
    fn event_today() {
        let countdown = upcoming_event(&[event_on(1, "Standup", today())], today());
        assert_eq!(countdown.labels().0, "less than 24 hours");
        assert_eq!(countdown.short_label(), "Today");
        assert_eq!(countdown.title(), Some("Standup"));
    }

    #[test]
    fn singular_and_plural_days() {
        let tomorrow = upcoming_event(&[event_on(1, "A", today() + Duration::days(1))], today());
        assert_eq!(tomorrow.labels().0, "1 day");

        let later = upcoming_event(&[event_on(1, "B", today() + Duration::days(12))], today());
        assert_eq!(later.labels(), ("12 days".to_string(), "B".to_string()));
    }

    #[test]
    fn past_and_undated_events_are_ignored() {
        let mut undated = event_on(3, "Undated", today());
        undated.date = "tbd".to_string();
        let events = vec![
            event_on(1, "Past", today() - Duration::days(2)),
            undated,
            event_on(2, "Soon", today() + Duration::days(3)),
        ];
        assert_eq!(
            upcoming_event(&events, today()),
            Countdown::InDays {
                days: 3,
                title: "Soon".to_string()
            }
        );
    }

    #[test]
    fn picks_earliest_and_keeps_first_on_ties() {
        let day = today() + Duration::days(4);
        let events = vec![
            event_on(1, "Far", today() + Duration::days(30)),
            event_on(2, "First", day),
            event_on(3, "Second", day),
        ];
        assert_eq!(upcoming_event(&events, today()).title(), Some("First"));
    }

    #[test]
    fn only_past_events_is_sentinel() {
        let events = vec![event_on(1, "Gone", today() - Duration::days(1))];
        assert_eq!(upcoming_event(&events, today()), Countdown::Nothing);
    }
}
