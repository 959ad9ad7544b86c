use chrono::{Local, NaiveDate};

use crate::filters::{filter_by_category, filter_by_title, ALL_CATEGORIES};
use crate::kv::KeyValueStore;
use crate::models::{Event, EventId};
use crate::notify::{NotificationPresenter, ToastKind};
use crate::registrations::RegistrationStore;
use crate::source::EventSource;
use crate::upcoming::{upcoming_event, Countdown};
use crate::view::{EventCard, Renderer, Stats};

pub const REGISTERED_MESSAGE: &str = "You're registered! See you there!";
pub const FULLY_BOOKED_MESSAGE: &str = "Sorry, this event is fully booked!";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed. Please try again.";
pub const UNREGISTERED_MESSAGE: &str = "Unregistered successfully";
pub const CANCEL_FAILED_MESSAGE: &str = "Cancellation failed. Please try again.";
pub const SERVICE_PROBLEM_HINT: &str = "Sorry, we're currently experiencing a problem.";
pub const NOTHING_REGISTERED_HINT: &str = "You did not register to any events yet.";

pub fn no_match_hint(text: &str) -> String {
    format!(
        "No events found matching \"{text}\". Try a different search term or browse all events."
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterState {
    pub category: String,
    pub search: String,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORIES.to_string(),
            search: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Registered,
    Unregistered,
    FullyBooked,
    RegisterFailed,
    CancelFailed,
    NotFound,
    NotReady,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn show_cards<R: Renderer>(
    renderer: &mut R,
    notifications: &mut NotificationPresenter,
    cards: &[EventCard],
) {
    notifications.clear_hint();
    renderer.render_cards(cards);
}

fn show_hint<R: Renderer>(
    renderer: &mut R,
    notifications: &mut NotificationPresenter,
    message: &str,
) {
    notifications.show_hint(message);
    renderer.render_hint(message);
}

fn notify<R: Renderer>(
    renderer: &mut R,
    notifications: &mut NotificationPresenter,
    message: &str,
    kind: ToastKind,
) {
    let toast = notifications.toast(message, kind).clone();
    renderer.render_toast(&toast);
}

/// Home page: the whole catalog with search, category chips and
/// register/unregister buttons.
pub struct EventListController<S, K, R> {
    source: S,
    registrations: RegistrationStore<K>,
    renderer: R,
    notifications: NotificationPresenter,
    events: Vec<Event>,
    filter: FilterState,
    state: LoadState,
    today: fn() -> NaiveDate,
}

impl<S, K, R> EventListController<S, K, R>
where
    S: EventSource,
    K: KeyValueStore,
    R: Renderer,
{
    pub fn new(source: S, registrations: RegistrationStore<K>, renderer: R) -> Self {
        Self {
            source,
            registrations,
            renderer,
            notifications: NotificationPresenter::new(),
            events: Vec::new(),
            filter: FilterState::default(),
            state: LoadState::Loading,
            today: local_today,
        }
    }

    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn init(&mut self) {
        if self.state == LoadState::Ready {
            return;
        }
        self.events = self.source.fetch_all().await;
        self.state = LoadState::Ready;
        self.render_view();
        self.refresh_stats();
    }

    pub fn on_search_input(&mut self, text: &str) {
        if !self.is_ready("search") {
            return;
        }
        self.filter.search = text.to_string();
        self.render_view();
    }

    pub fn on_category_select(&mut self, category: &str) {
        if !self.is_ready("category select") {
            return;
        }
        self.filter.category = category.to_string();
        self.renderer.set_active_filter(category);
        self.render_view();
    }

    pub fn on_toggle_registration(&mut self, id: &EventId) -> ToggleOutcome {
        if !self.is_ready("toggle registration") {
            return ToggleOutcome::NotReady;
        }
        let Some(index) = self.position_of(id) else {
            tracing::warn!(%id, "event not found");
            return ToggleOutcome::NotFound;
        };

        let outcome = if self.registrations.is_registered(&self.events[index].id) {
            self.unregister_at(index)
        } else {
            self.register_at(index)
        };
        self.refresh_stats();
        outcome
    }

    /// Forgets every registration and redraws the grid and statistics.
    pub fn on_clear_registrations(&mut self) {
        self.registrations.clear_all();
        if self.state == LoadState::Ready {
            self.render_view();
            self.refresh_stats();
        }
    }

    fn register_at(&mut self, index: usize) -> ToggleOutcome {
        if self.events[index].is_full() {
            self.notify(FULLY_BOOKED_MESSAGE, ToastKind::Error);
            return ToggleOutcome::FullyBooked;
        }
        if !self.registrations.register(&self.events[index].id) {
            self.notify(REGISTER_FAILED_MESSAGE, ToastKind::Error);
            return ToggleOutcome::RegisterFailed;
        }
        self.events[index].spots_left -= 1;
        let card = EventCard::new(&self.events[index], true);
        self.renderer.update_card(&card);
        self.notify(REGISTERED_MESSAGE, ToastKind::Success);
        ToggleOutcome::Registered
    }

    fn unregister_at(&mut self, index: usize) -> ToggleOutcome {
        if !self.registrations.cancel(&self.events[index].id) {
            self.notify(CANCEL_FAILED_MESSAGE, ToastKind::Error);
            return ToggleOutcome::CancelFailed;
        }
        self.events[index].spots_left += 1;
        let card = EventCard::new(&self.events[index], false);
        self.renderer.update_card(&card);
        self.notify(UNREGISTERED_MESSAGE, ToastKind::Success);
        ToggleOutcome::Unregistered
    }

    /// Looks an id up in the loaded catalog, accepting `3` for `"3"`.
    pub fn find_event(&self, id: &EventId) -> Option<&Event> {
        self.position_of(id).map(|index| &self.events[index])
    }

    fn position_of(&self, id: &EventId) -> Option<usize> {
        self.events
            .iter()
            .position(|event| &event.id == id)
            .or_else(|| self.events.iter().position(|event| event.id.matches(id)))
    }

    /// Catalog narrowed by the active category, then by the search text.
    pub fn current_view(&self) -> Vec<Event> {
        let by_category = filter_by_category(&self.events, &self.filter.category);
        filter_by_title(&by_category, &self.filter.search)
    }

    pub fn stats(&self) -> Stats {
        Stats {
            event_count: Some(self.events.len()),
            registration_count: Some(self.registrations.list_registered_ids().len()),
            countdown: self.countdown().labels().0,
            upcoming_title: None,
        }
    }

    pub fn countdown(&self) -> Countdown {
        upcoming_event(&self.events, (self.today)())
    }

    fn render_view(&mut self) {
        let view = self.current_view();
        if view.is_empty() {
            let message = if self.filter.search.is_empty() {
                SERVICE_PROBLEM_HINT.to_string()
            } else {
                no_match_hint(&self.filter.search)
            };
            show_hint(&mut self.renderer, &mut self.notifications, &message);
            return;
        }

        let cards = view
            .iter()
            .map(|event| EventCard::new(event, self.registrations.is_registered(&event.id)))
            .collect::<Vec<_>>();
        show_cards(&mut self.renderer, &mut self.notifications, &cards);
    }

    fn refresh_stats(&mut self) {
        let stats = self.stats();
        self.renderer.render_stats(&stats);
    }

    fn notify(&mut self, message: &str, kind: ToastKind) {
        notify(&mut self.renderer, &mut self.notifications, message, kind);
    }

    fn is_ready(&self, action: &str) -> bool {
        if self.state == LoadState::Loading {
            tracing::debug!(action, "ignored while events are loading");
            return false;
        }
        true
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn registrations(&self) -> &RegistrationStore<K> {
        &self.registrations
    }

    pub fn notifications(&self) -> &NotificationPresenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationPresenter {
        &mut self.notifications
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

/// "My events" page: only the events the user registered for, each with an
/// unregister button, plus the countdown to the next one.
pub struct MyEventsController<S, K, R> {
    source: S,
    registrations: RegistrationStore<K>,
    renderer: R,
    notifications: NotificationPresenter,
    events: Vec<Event>,
    state: LoadState,
    today: fn() -> NaiveDate,
}

impl<S, K, R> MyEventsController<S, K, R>
where
    S: EventSource,
    K: KeyValueStore,
    R: Renderer,
{
    pub fn new(source: S, registrations: RegistrationStore<K>, renderer: R) -> Self {
        Self {
            source,
            registrations,
            renderer,
            notifications: NotificationPresenter::new(),
            events: Vec::new(),
            state: LoadState::Loading,
            today: local_today,
        }
    }

    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn init(&mut self) {
        if self.state == LoadState::Ready {
            return;
        }
        let registered = self.registrations.list_registered_ids();
        let all = self.source.fetch_all().await;
        self.events = all
            .into_iter()
            .filter(|event| registered.contains(&event.id))
            .collect();
        self.state = LoadState::Ready;

        if self.events.is_empty() {
            show_hint(&mut self.renderer, &mut self.notifications, NOTHING_REGISTERED_HINT);
        } else {
            let cards = self
                .events
                .iter()
                .map(|event| EventCard::new(event, true))
                .collect::<Vec<_>>();
            show_cards(&mut self.renderer, &mut self.notifications, &cards);
        }
        self.refresh_stats();
    }

    pub fn on_unregister(&mut self, id: &EventId) -> ToggleOutcome {
        if self.state == LoadState::Loading {
            tracing::debug!("unregister ignored while events are loading");
            return ToggleOutcome::NotReady;
        }
        let Some(index) = self
            .events
            .iter()
            .position(|event| &event.id == id)
            .or_else(|| self.events.iter().position(|event| event.id.matches(id)))
        else {
            tracing::warn!(%id, "registered event not found");
            return ToggleOutcome::NotFound;
        };
        let id = self.events[index].id.clone();

        if !self.registrations.cancel(&id) {
            notify(
                &mut self.renderer,
                &mut self.notifications,
                CANCEL_FAILED_MESSAGE,
                ToastKind::Error,
            );
            return ToggleOutcome::CancelFailed;
        }

        self.events.remove(index);
        self.renderer.remove_card(&id);
        self.refresh_stats();
        if self.events.is_empty() {
            show_hint(&mut self.renderer, &mut self.notifications, NOTHING_REGISTERED_HINT);
        }
        notify(
            &mut self.renderer,
            &mut self.notifications,
            UNREGISTERED_MESSAGE,
            ToastKind::Success,
        );
        ToggleOutcome::Unregistered
    }

    pub fn stats(&self) -> Stats {
        let (countdown, title) = self.countdown().labels();
        Stats {
            event_count: None,
            registration_count: None,
            countdown,
            upcoming_title: Some(title),
        }
    }

    pub fn countdown(&self) -> Countdown {
        upcoming_event(&self.events, (self.today)())
    }

    fn refresh_stats(&mut self) {
        let stats = self.stats();
        self.renderer.render_stats(&stats);
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn registrations(&self) -> &RegistrationStore<K> {
        &self.registrations
    }

    pub fn notifications(&self) -> &NotificationPresenter {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationPresenter {
        &mut self.notifications
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
