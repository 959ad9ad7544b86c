use std::time::{Duration, Instant};

pub const TOAST_DISPLAY: Duration = Duration::from_millis(3000);
pub const TOAST_FADE: Duration = Duration::from_millis(400);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn class_name(self) -> &'static str {
        match self {
            ToastKind::Success => "toast success",
            ToastKind::Error => "toast error",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

impl Toast {
    pub fn phase(&self, now: Instant) -> Option<ToastPhase> {
        let age = now.saturating_duration_since(self.created_at);
        if age < TOAST_DISPLAY {
            Some(ToastPhase::Visible)
        } else if age < TOAST_DISPLAY + TOAST_FADE {
            Some(ToastPhase::Fading)
        } else {
            None
        }
    }
}

/// Transient toasts plus the single inline hint that replaces the card grid.
/// Toasts stack without limit.
#[derive(Default)]
pub struct NotificationPresenter {
    toasts: Vec<Toast>,
    history: Vec<(String, ToastKind)>,
    hint: Option<String>,
    next_id: u64,
}

impl NotificationPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toast(&mut self, message: impl Into<String>, kind: ToastKind) -> &Toast {
        self.toast_at(message, kind, Instant::now())
    }

    pub fn toast_at(&mut self, message: impl Into<String>, kind: ToastKind, at: Instant) -> &Toast {
        let message = message.into();
        self.next_id += 1;
        self.history.push((message.clone(), kind));
        self.toasts.push(Toast {
            id: self.next_id,
            message,
            kind,
            created_at: at,
        });
        &self.toasts[self.toasts.len() - 1]
    }

    /// Drops toasts whose fade-out has finished.
    pub fn tick(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.phase(now).is_some());
    }

    pub fn visible(&self, now: Instant) -> Vec<(&Toast, ToastPhase)> {
        self.toasts
            .iter()
            .filter_map(|toast| toast.phase(now).map(|phase| (toast, phase)))
            .collect()
    }

    /// Every toast raised so far, oldest first, including dismissed ones.
    pub fn history(&self) -> &[(String, ToastKind)] {
        &self.history
    }

    pub fn show_hint(&mut self, message: impl Into<String>) {
        self.hint = Some(message.into());
    }

    pub fn clear_hint(&mut self) {
        self.hint = None;
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
}
