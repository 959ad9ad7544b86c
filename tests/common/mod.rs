#![allow(dead_code)]

use std::cell::Cell;
use std::io;

use chrono::NaiveDate;

use redivent_lib::kv::{KeyValueStore, KvError, MemoryKv};
use redivent_lib::models::{Event, EventId};
use redivent_lib::notify::{Toast, ToastKind};
use redivent_lib::view::{EventCard, Renderer, Stats};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
}

pub fn event(id: i64, title: &str, category: &str, date: &str, spots_left: i64) -> Event {
    Event {
        id: EventId::Num(id),
        title: title.to_string(),
        category: category.to_string(),
        date: date.to_string(),
        time: "18:00".to_string(),
        location: "Community Hall".to_string(),
        spots_left,
    }
}

/// Memory backing whose writes can be switched off, like a full or
/// read-only disk.
#[derive(Default)]
pub struct FailingWritesKv {
    inner: MemoryKv,
    failing: Cell<bool>,
}

impl FailingWritesKv {
    pub fn fail_writes(&self) {
        self.failing.set(true);
    }

    fn check(&self) -> Result<(), KvError> {
        if self.failing.get() {
            Err(KvError::Io(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is read-only",
            )))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FailingWritesKv {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.check()?;
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.check()?;
        self.inner.remove(key)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Drawn {
    Cards(Vec<EventCard>),
    Hint(String),
    Update(EventCard),
    Remove(EventId),
    Filter(String),
    Stats(Stats),
    Toast(String, ToastKind),
}

/// Keeps every render call so tests can assert on what the page showed.
#[derive(Default)]
pub struct RecordingRenderer {
    pub log: Vec<Drawn>,
}

impl RecordingRenderer {
    pub fn last_cards(&self) -> Option<&[EventCard]> {
        self.log.iter().rev().find_map(|entry| match entry {
            Drawn::Cards(cards) => Some(cards.as_slice()),
            _ => None,
        })
    }

    /// What the grid area currently shows: `Ok(cards)` or `Err(hint)`.
    pub fn grid(&self) -> Result<Vec<EventCard>, String> {
        let mut grid: Result<Vec<EventCard>, String> = Ok(Vec::new());
        for entry in &self.log {
            match entry {
                Drawn::Cards(cards) => grid = Ok(cards.clone()),
                Drawn::Hint(message) => grid = Err(message.clone()),
                Drawn::Update(card) => {
                    if let Ok(cards) = grid.as_mut() {
                        if let Some(existing) = cards.iter_mut().find(|c| c.id == card.id) {
                            *existing = card.clone();
                        }
                    }
                }
                Drawn::Remove(id) => {
                    if let Ok(cards) = grid.as_mut() {
                        cards.retain(|c| &c.id != id);
                    }
                }
                _ => {}
            }
        }
        grid
    }

    pub fn last_stats(&self) -> Option<&Stats> {
        self.log.iter().rev().find_map(|entry| match entry {
            Drawn::Stats(stats) => Some(stats),
            _ => None,
        })
    }

    pub fn toasts(&self) -> Vec<(String, ToastKind)> {
        self.log
            .iter()
            .filter_map(|entry| match entry {
                Drawn::Toast(message, kind) => Some((message.clone(), *kind)),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn render_cards(&mut self, cards: &[EventCard]) {
        self.log.push(Drawn::Cards(cards.to_vec()));
    }

    fn render_hint(&mut self, message: &str) {
        self.log.push(Drawn::Hint(message.to_string()));
    }

    fn update_card(&mut self, card: &EventCard) {
        self.log.push(Drawn::Update(card.clone()));
    }

    fn remove_card(&mut self, id: &EventId) {
        self.log.push(Drawn::Remove(id.clone()));
    }

    fn set_active_filter(&mut self, category: &str) {
        self.log.push(Drawn::Filter(category.to_string()));
    }

    fn render_stats(&mut self, stats: &Stats) {
        self.log.push(Drawn::Stats(stats.clone()));
    }

    fn render_toast(&mut self, toast: &Toast) {
        self.log.push(Drawn::Toast(toast.message.clone(), toast.kind));
    }
}
