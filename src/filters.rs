use crate::models::Event;

pub const ALL_CATEGORIES: &str = "all";

/// Events whose category equals `category` ignoring case. `"all"` keeps everything.
pub fn filter_by_category(events: &[Event], category: &str) -> Vec<Event> {
    if category == ALL_CATEGORIES {
        return events.to_vec();
    }
    let wanted = category.to_lowercase();
    events
        .iter()
        .filter(|event| event.category.to_lowercase() == wanted)
        .cloned()
        .collect()
}

/// Events whose title contains `term` ignoring case. An empty term keeps everything.
pub fn filter_by_title(events: &[Event], term: &str) -> Vec<Event> {
    if term.is_empty() {
        return events.to_vec();
    }
    let needle = term.to_lowercase();
    events
        .iter()
        .filter(|event| event.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventId;
    use pretty_assertions::assert_eq;

    fn event(id: i64, title: &str, category: &str) -> Event {
        Event {
            id: EventId::Num(id),
            title: title.to_string(),
            category: category.to_string(),
            date: "2030-01-01".to_string(),
            time: String::new(),
            location: String::new(),
            spots_left: 10,
        }
    }

    fn catalog() -> Vec<Event> {
        vec![
            event(1, "Conference A", "Tech"),
            event(2, "Meetup", "social"),
            event(3, "ConfRoom", "TECH"),
            event(4, "Yoga", "Sports"),
        ]
    }

    fn ids(events: &[Event]) -> Vec<EventId> {
        events.iter().map(|e| e.id.clone()).collect()
    }

    #[test]
    fn all_is_identity() {
        assert_eq!(filter_by_category(&catalog(), "all"), catalog());
        assert!(filter_by_category(&[], "all").is_empty());
    }

    #[test]
    fn category_match_ignores_case() {
        let tech = filter_by_category(&catalog(), "tech");
        assert_eq!(ids(&tech), vec![EventId::Num(1), EventId::Num(3)]);
        assert!(tech
            .iter()
            .all(|e| e.category.to_lowercase() == "tech"));

        let social = filter_by_category(&catalog(), "Social");
        assert_eq!(ids(&social), vec![EventId::Num(2)]);
    }

    #[test]
    fn unknown_category_is_empty() {
        assert!(filter_by_category(&catalog(), "music").is_empty());
    }

    #[test]
    fn empty_term_is_identity() {
        assert_eq!(filter_by_title(&catalog(), ""), catalog());
    }

    #[test]
    fn title_substring_keeps_order() {
        let found = filter_by_title(&catalog(), "conf");
        assert_eq!(ids(&found), vec![EventId::Num(1), EventId::Num(3)]);

        let found = filter_by_title(&catalog(), "ETU");
        assert_eq!(ids(&found), vec![EventId::Num(2)]);
    }

    #[test]
    fn term_is_not_tokenized() {
        assert!(filter_by_title(&catalog(), "conference meetup").is_empty());
    }

    #[test]
    fn input_is_not_mutated() {
        let events = catalog();
        let _ = filter_by_title(&events, "yoga");
        let _ = filter_by_category(&events, "sports");
        assert_eq!(events, catalog());
    }

    mod laws {
        use super::*;
        use proptest::prelude::*;

        fn arb_event() -> impl Strategy<Value = Event> {
            (
                0i64..1000,
                "[a-cA-C ]{0,10}",
                prop::sample::select(vec!["Tech", "tech", "Music", "SOCIAL", "social", "Sports"]),
                0i64..50,
            )
                .prop_map(|(id, title, category, spots_left)| Event {
                    id: EventId::Num(id),
                    title,
                    category: category.to_string(),
                    date: "2030-01-01".to_string(),
                    time: String::new(),
                    location: String::new(),
                    spots_left,
                })
        }

        fn arb_catalog() -> impl Strategy<Value = Vec<Event>> {
            prop::collection::vec(arb_event(), 0..20)
        }

        /// True when `sub` appears in `full` in the same relative order.
        fn is_subsequence(sub: &[Event], full: &[Event]) -> bool {
            let mut rest = full.iter();
            sub.iter().all(|wanted| rest.any(|candidate| candidate == wanted))
        }

        proptest! {
            #[test]
            fn all_category_is_identity(events in arb_catalog()) {
                prop_assert_eq!(filter_by_category(&events, ALL_CATEGORIES), events);
            }

            #[test]
            fn category_filter_is_sound_and_maximal(
                events in arb_catalog(),
                category in prop::sample::select(vec!["tech", "TECH", "Music", "social", "film"]),
            ) {
                let found = filter_by_category(&events, category);
                let wanted = category.to_lowercase();
                prop_assert!(found.iter().all(|e| e.category.to_lowercase() == wanted));
                let qualifying = events
                    .iter()
                    .filter(|e| e.category.to_lowercase() == wanted)
                    .count();
                prop_assert_eq!(found.len(), qualifying);
                prop_assert!(is_subsequence(&found, &events));
            }

            #[test]
            fn empty_title_term_is_identity(events in arb_catalog()) {
                prop_assert_eq!(filter_by_title(&events, ""), events);
            }

            #[test]
            fn title_filter_is_sound_and_maximal(
                events in arb_catalog(),
                term in "[a-cA-C]{1,2}",
            ) {
                let found = filter_by_title(&events, &term);
                let needle = term.to_lowercase();
                prop_assert!(found.iter().all(|e| e.title.to_lowercase().contains(&needle)));
                let qualifying = events
                    .iter()
                    .filter(|e| e.title.to_lowercase().contains(&needle))
                    .count();
                prop_assert_eq!(found.len(), qualifying);
                prop_assert!(is_subsequence(&found, &events));
            }
        }
    }
}
