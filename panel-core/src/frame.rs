//! Frames and button bindings
//!
//! A [`Frame`] is one interaction context on the navigation stack: what the
//! display shows while it is on top, and what each of the sixteen buttons
//! does. Bindings are plain [`Action`] values, so a frame can be inspected,
//! compared and rewired without capturing any state.

use core::sync::atomic::{AtomicU32, Ordering};

use panel_protocol::{ButtonLabel, Message, BUTTON_COUNT};

static NEXT_KEY: AtomicU32 = AtomicU32::new(1);

/// Opaque identity of a frame, unique for the life of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameKey(u32);

impl FrameKey {
    fn next() -> Self {
        Self(NEXT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

/// What a button press does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Show "`<label>` unmapped" briefly
    Unmapped,
    /// Previous carousel page
    Previous,
    /// Next carousel page
    Next,
    /// Pop the top frame
    Back,
    /// Start numeric entry for the monitor volume
    SetVolume,
    /// Start numeric entry for the monitor brightness
    SetBrightness,
    /// Switch the monitor to the previous input source
    PreviousInput,
    /// Switch the monitor to the next input source
    NextInput,
    /// Append a digit to the numeric entry buffer
    Digit(u8),
    /// Commit the numeric entry buffer
    Commit,
}

/// Action for each of the sixteen buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bindings {
    actions: [Action; BUTTON_COUNT],
}

impl Default for Bindings {
    fn default() -> Self {
        Self::submenu()
    }
}

impl Bindings {
    /// Every button unmapped
    pub const fn unmapped() -> Self {
        Self {
            actions: [Action::Unmapped; BUTTON_COUNT],
        }
    }

    /// `2` previous, `8` next, `*` back, everything else unmapped
    pub fn submenu() -> Self {
        Self::unmapped()
            .with(ButtonLabel::PREVIOUS, Action::Previous)
            .with(ButtonLabel::NEXT, Action::Next)
            .with(ButtonLabel::BACK, Action::Back)
    }

    /// Rebind one button
    pub fn with(mut self, label: ButtonLabel, action: Action) -> Self {
        self.set(label, action);
        self
    }

    pub fn set(&mut self, label: ButtonLabel, action: Action) {
        self.actions[label.index()] = action;
    }

    /// Action bound to `label`
    pub fn get(&self, label: ButtonLabel) -> Action {
        self.actions[label.index()]
    }

    /// (label, action) pairs in matrix order
    pub fn iter(&self) -> impl Iterator<Item = (ButtonLabel, Action)> + '_ {
        ButtonLabel::all().map(move |label| (label, self.get(label)))
    }
}

/// One interaction context on the navigation stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    key: FrameKey,
    /// Content shown while this frame is on top
    pub message: Message,
    /// Button table installed while this frame is on top
    pub bindings: Bindings,
    active: bool,
}

impl Frame {
    /// Frame with explicit bindings and a fresh key
    pub fn new(message: Message, bindings: Bindings) -> Self {
        Self {
            key: FrameKey::next(),
            message,
            bindings,
            active: false,
        }
    }

    /// Frame with the default submenu bindings
    pub fn submenu(message: Message) -> Self {
        Self::new(message, Bindings::submenu())
    }

    /// The main menu carousel page
    pub fn main_menu() -> Self {
        let bindings = Bindings::submenu()
            .with(ButtonLabel::A, Action::SetVolume)
            .with(ButtonLabel::B, Action::SetBrightness)
            .with(ButtonLabel::C, Action::PreviousInput)
            .with(ButtonLabel::D, Action::NextInput);
        Self::new(Message::text("Main Menu", "").with_arrows(), bindings)
    }

    /// Numeric entry: digits append, `#` commits, `*` cancels
    pub fn numeric_entry(title: &str) -> Self {
        let mut bindings = Bindings::submenu().with(ButtonLabel::CONFIRM, Action::Commit);
        for label in ButtonLabel::all() {
            if let Some(digit) = label.digit() {
                bindings.set(label, Action::Digit(digit));
            }
        }
        Self::new(Message::text(title, ""), bindings)
    }

    pub fn key(&self) -> FrameKey {
        self.key
    }

    /// Whether this frame is the one receiving input
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }
}
