//! Render contract between the controllers and whatever draws the page.

use std::io::Write;

use crate::models::{Event, EventId, SpotsInfo};
use crate::notify::Toast;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventCard {
    pub id: EventId,
    pub title: String,
    pub category: String,
    pub badge_class: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub spots: SpotsInfo,
    pub registered: bool,
}

impl EventCard {
    pub fn new(event: &Event, registered: bool) -> Self {
        Self {
            id: event.id.clone(),
            title: event.title.clone(),
            category: event.category.clone(),
            badge_class: format!("badge-{}", event.category.to_lowercase()),
            date: event.date.clone(),
            time: event.time.clone(),
            location: event.location.clone(),
            spots: SpotsInfo::for_spots(event.spots_left),
            registered,
        }
    }

    pub fn button_label(&self) -> &'static str {
        if self.registered {
            "Unregister"
        } else {
            "Register"
        }
    }

    pub fn button_class(&self) -> &'static str {
        if self.registered {
            "btn-register registered"
        } else {
            "btn-register"
        }
    }
}

/// Statistic slots. Pages fill only the slots they display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub event_count: Option<usize>,
    pub registration_count: Option<usize>,
    pub countdown: String,
    pub upcoming_title: Option<String>,
}

pub trait Renderer {
    /// Replaces the whole grid. Any hint on screen goes away.
    fn render_cards(&mut self, cards: &[EventCard]);
    /// Replaces the grid with a single message.
    fn render_hint(&mut self, message: &str);
    fn update_card(&mut self, card: &EventCard);
    fn remove_card(&mut self, id: &EventId);
    fn set_active_filter(&mut self, category: &str);
    fn render_stats(&mut self, stats: &Stats);
    fn render_toast(&mut self, toast: &Toast);
}

/// Plain text page for terminals.
pub struct TextRenderer<W: Write> {
    out: W,
    cards: Vec<EventCard>,
    active_filter: String,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cards: Vec::new(),
            active_filter: crate::filters::ALL_CATEGORIES.to_string(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn cards(&self) -> &[EventCard] {
        &self.cards
    }

    fn emit(&mut self, text: &str) {
        if let Err(err) = writeln!(self.out, "{text}").and_then(|_| self.out.flush()) {
            tracing::error!("failed to write to terminal: {err}");
        }
    }
}

fn format_card(card: &EventCard) -> String {
    let mut meta = card.date.clone();
    if !card.time.is_empty() {
        meta.push(' ');
        meta.push_str(&card.time);
    }
    if !card.location.is_empty() {
        meta.push_str(" @ ");
        meta.push_str(&card.location);
    }
    format!(
        "[#{}] {}  <{}>\n      {}\n      {}  [{}]",
        card.id,
        card.title,
        card.category,
        meta,
        card.spots.text,
        card.button_label()
    )
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render_cards(&mut self, cards: &[EventCard]) {
        self.cards = cards.to_vec();
        let body = cards.iter().map(format_card).collect::<Vec<_>>().join("\n");
        let header = format!("--- events ({}) [{}] ---", cards.len(), self.active_filter);
        self.emit(&header);
        if !body.is_empty() {
            self.emit(&body);
        }
    }

    fn render_hint(&mut self, message: &str) {
        self.cards.clear();
        self.emit(&format!("--- {message} ---"));
    }

    fn update_card(&mut self, card: &EventCard) {
        if let Some(existing) = self.cards.iter_mut().find(|c| c.id == card.id) {
            *existing = card.clone();
        }
        let line = format_card(card);
        self.emit(&line);
    }

    fn remove_card(&mut self, id: &EventId) {
        self.cards.retain(|card| &card.id != id);
        self.emit(&format!("(removed #{id})"));
    }

    fn set_active_filter(&mut self, category: &str) {
        self.active_filter = category.to_string();
    }

    fn render_stats(&mut self, stats: &Stats) {
        let mut parts = Vec::new();
        if let Some(count) = stats.event_count {
            parts.push(format!("events: {count}"));
        }
        if let Some(count) = stats.registration_count {
            parts.push(format!("registered: {count}"));
        }
        parts.push(format!("next: {}", stats.countdown));
        if let Some(title) = &stats.upcoming_title {
            parts.push(title.clone());
        }
        let line = parts.join(" | ");
        self.emit(&line);
    }

    fn render_toast(&mut self, toast: &Toast) {
        let marker = match toast.kind {
            crate::notify::ToastKind::Success => "ok",
            crate::notify::ToastKind::Error => "!!",
        };
        self.emit(&format!("[{marker}] {}", toast.message));
    }
}
