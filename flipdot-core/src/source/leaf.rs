//! Leaf sources
//!
//! A leaf owns its pixels. State changes only mark the leaf invalid; the
//! bitmap is redrawn on the next `ensure_valid` pass, so a render pass never
//! sees half-drawn text.

use core::fmt::Write;

use embedded_graphics::mono_font::ascii::{FONT_4X6, FONT_5X7};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::Point;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Drawable;
use heapless::String;

use super::bitmap::Bitmap;
use super::SourceId;
use crate::config::MAX_LABEL_LEN;
use crate::input::{InputEvent, InputResponse};

/// Seconds in a day
const DAY_S: u32 = 24 * 3600;

/// Largest countdown shown as HH:MM:SS
pub const MAX_COUNTDOWN_S: u32 = 99 * 3600 + 59 * 60 + 59;

/// Countdown adjustment per Up/Down press
pub const COUNTDOWN_STEP_S: u32 = 60;

/// Column where the AM/PM suffix of the clock face starts
const MERIDIEM_X: i32 = 27;

/// Time of day shown by a clock leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockTime {
    /// 0-23
    pub hour: u8,
    /// 0-59
    pub minute: u8,
}

impl ClockTime {
    /// Time of day for a number of seconds since midnight (wraps every day)
    pub fn from_seconds(seconds: u32) -> Self {
        let s = seconds % DAY_S;
        Self {
            hour: (s / 3600) as u8,
            minute: ((s / 60) % 60) as u8,
        }
    }

    /// Hour on a 12-hour dial (1-12)
    pub fn hour12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    pub fn is_pm(&self) -> bool {
        self.hour >= 12
    }
}

/// Lifecycle hook observed by a probe leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeHook {
    EnterVisibility,
    ExitVisibility,
    EnterFocus,
    ExitFocus,
}

impl ProbeHook {
    fn label(self) -> &'static str {
        match self {
            ProbeHook::EnterVisibility => "Visible",
            ProbeHook::ExitVisibility => "Invisible",
            ProbeHook::EnterFocus => "Focused",
            ProbeHook::ExitFocus => "Unfocused",
        }
    }
}

/// How many times each hook fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProbeCounts {
    pub enter_visibility: u16,
    pub exit_visibility: u16,
    pub enter_focus: u16,
    pub exit_focus: u16,
}

/// Lifecycle probe state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeState {
    pub last: Option<ProbeHook>,
    pub counts: ProbeCounts,
}

/// What a leaf draws
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafKind {
    /// Nothing at all
    Blank,
    /// Static text
    Label(String<MAX_LABEL_LEN>),
    /// Decimal counter, Center resets it
    Counter(u32),
    /// 12-hour clock face, `None` while the time is unknown
    Clock(Option<ClockTime>),
    /// Countdown timer
    Countdown { remaining_s: u32, running: bool },
    /// Shows the last lifecycle hook it received
    Probe(ProbeState),
    /// Text that launches an activity on Center
    Shortcut {
        label: String<MAX_LABEL_LEN>,
        activity: SourceId,
    },
}

impl LeafKind {
    /// Label kind from a string, truncated to the label capacity
    pub fn label(text: &str) -> Self {
        LeafKind::Label(truncated(text))
    }

    pub fn shortcut(text: &str, activity: SourceId) -> Self {
        LeafKind::Shortcut {
            label: truncated(text),
            activity,
        }
    }

    pub fn countdown(remaining_s: u32) -> Self {
        LeafKind::Countdown {
            remaining_s: remaining_s.min(MAX_COUNTDOWN_S),
            running: false,
        }
    }

    pub fn probe() -> Self {
        LeafKind::Probe(ProbeState::default())
    }
}

pub(crate) fn truncated(text: &str) -> String<MAX_LABEL_LEN> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct Leaf {
    pub(crate) kind: LeafKind,
    pub(crate) bitmap: Bitmap,
}

impl Leaf {
    pub fn new(kind: LeafKind, width: u8, height: u8) -> Self {
        Self {
            kind,
            bitmap: Bitmap::new(width, height),
        }
    }

    pub fn kind(&self) -> &LeafKind {
        &self.kind
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }

    pub fn has_content(&self) -> bool {
        !matches!(self.kind, LeafKind::Blank)
    }

    /// Redraw the cached bitmap from the current state
    pub(crate) fn redraw(&mut self) {
        self.bitmap.clear();
        let mut text: String<MAX_LABEL_LEN> = String::new();

        match &self.kind {
            LeafKind::Blank => {}
            LeafKind::Label(label) | LeafKind::Shortcut { label, .. } => {
                draw_text(&mut self.bitmap, label, 0, 0, &FONT_4X6);
            }
            LeafKind::Counter(value) => {
                let _ = write!(text, "{}", value);
                draw_text(&mut self.bitmap, &text, 0, 0, &FONT_4X6);
            }
            LeafKind::Clock(time) => {
                let (digits, meridiem) = match time {
                    Some(t) => {
                        let _ = write!(text, "{:02}:{:02}", t.hour12(), t.minute);
                        (text.as_str(), if t.is_pm() { "PM" } else { "AM" })
                    }
                    None => ("--:--", "-M"),
                };
                draw_text(&mut self.bitmap, digits, 0, 0, &FONT_5X7);
                draw_text(&mut self.bitmap, meridiem, MERIDIEM_X, 1, &FONT_4X6);
            }
            LeafKind::Countdown { remaining_s, .. } => {
                let _ = write!(
                    text,
                    "{:02}:{:02}:{:02}",
                    remaining_s / 3600,
                    (remaining_s / 60) % 60,
                    remaining_s % 60
                );
                draw_text(&mut self.bitmap, &text, 0, 0, &FONT_4X6);
            }
            LeafKind::Probe(state) => {
                let label = state.last.map(ProbeHook::label).unwrap_or("Probe");
                draw_text(&mut self.bitmap, label, 0, 0, &FONT_4X6);
            }
        }
    }

    /// React to a button press; the caller invalidates on `Handled`
    pub(crate) fn handle_input(&mut self, event: InputEvent) -> InputResponse {
        match (&mut self.kind, event) {
            (LeafKind::Counter(value), InputEvent::Center) => {
                *value = 0;
                InputResponse::Handled
            }
            (LeafKind::Shortcut { activity, .. }, InputEvent::Center) => {
                InputResponse::Launch(*activity)
            }
            (LeafKind::Countdown { running, remaining_s }, InputEvent::Center) => {
                if *running || *remaining_s > 0 {
                    *running = !*running;
                }
                InputResponse::Handled
            }
            (LeafKind::Countdown { running: false, remaining_s }, InputEvent::Up) => {
                *remaining_s = (*remaining_s + COUNTDOWN_STEP_S).min(MAX_COUNTDOWN_S);
                InputResponse::Handled
            }
            (LeafKind::Countdown { running: false, remaining_s }, InputEvent::Down) => {
                *remaining_s = remaining_s.saturating_sub(COUNTDOWN_STEP_S);
                InputResponse::Handled
            }
            _ => InputResponse::Ignored,
        }
    }

    /// Record a lifecycle hook; returns true if the leaf's pixels changed
    pub(crate) fn on_hook(&mut self, hook: ProbeHook) -> bool {
        let LeafKind::Probe(state) = &mut self.kind else {
            return false;
        };
        let counter = match hook {
            ProbeHook::EnterVisibility => &mut state.counts.enter_visibility,
            ProbeHook::ExitVisibility => &mut state.counts.exit_visibility,
            ProbeHook::EnterFocus => &mut state.counts.enter_focus,
            ProbeHook::ExitFocus => &mut state.counts.exit_focus,
        };
        *counter = counter.saturating_add(1);
        state.last = Some(hook);
        true
    }

    /// One second of countdown; returns true if the display changed
    pub(crate) fn tick_countdown(&mut self) -> bool {
        let LeafKind::Countdown { remaining_s, running } = &mut self.kind else {
            return false;
        };
        if !*running {
            return false;
        }
        *remaining_s = remaining_s.saturating_sub(1);
        if *remaining_s == 0 {
            *running = false;
        }
        true
    }
}

fn draw_text(bitmap: &mut Bitmap, text: &str, x: i32, y: i32, font: &MonoFont<'_>) {
    let style = MonoTextStyle::new(font, BinaryColor::On);
    let _ = Text::with_baseline(text, Point::new(x, y), style, Baseline::Top).draw(bitmap);
}
