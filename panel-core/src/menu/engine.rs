//! Navigation stack and button dispatch
//!
//! The stack is a carousel page at the bottom (the root, never popped) with
//! up to [`MAX_OVERLAYS`] frames pushed above it. Only the top frame is
//! active and the live button table is always a copy of its bindings.
//!
//! Time never comes from inside the engine. Callers pass a monotonic
//! millisecond clock for overlay deadlines and Unix seconds for the weather
//! page, which keeps the engine deterministic under test.

use core::fmt::Write;

use heapless::Vec;
use panel_display::{DisplayBackend, DisplayError, Surface};
use panel_protocol::{validate_inbound, ButtonLabel, InboundError, KeyEvent, Line, Message};
use tracing::{debug, info, warn};

use crate::config::{OverlayConfig, PanelConfig};
use crate::frame::{Action, Bindings, Frame, FrameKey};
use crate::menu::numeric::{NumericEntry, NumericTarget};
use crate::traits::{InputStep, Monitor};
use crate::weather::{MinuteAction, RefreshReason, WeatherError, WeatherReading, WeatherView};

/// Frames allowed above the root
pub const MAX_OVERLAYS: usize = 15;

/// Carousel pages
pub const MAX_PAGES: usize = 4;

/// Carousel position of the weather page
const WEATHER_PAGE: usize = 0;

/// Handle to an auto-dismissing overlay
///
/// Dropping the handle leaves the overlay to expire on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHandle {
    key: FrameKey,
}

impl OverlayHandle {
    pub fn key(&self) -> FrameKey {
        self.key
    }

    /// Dismiss the overlay now; a no-op if it is already gone
    pub fn cancel<D: DisplayBackend, M: Monitor>(self, engine: &mut MenuEngine<D, M>) {
        engine.pop(Some(self.key));
    }
}

/// Session state machine
pub struct MenuEngine<D: DisplayBackend, M: Monitor> {
    surface: Surface<D>,
    monitor: M,
    overlay: OverlayConfig,
    carousel: Vec<Frame, MAX_PAGES>,
    current: usize,
    overlays: Vec<Frame, MAX_OVERLAYS>,
    live: Bindings,
    dismissals: Vec<(FrameKey, u64), MAX_OVERLAYS>,
    numeric: Option<NumericEntry>,
    weather: WeatherView,
    refresh_requested: Option<RefreshReason>,
}

impl<D: DisplayBackend, M: Monitor> MenuEngine<D, M> {
    /// Build the carousel (weather page, main menu), show the weather page
    /// and request its first refresh
    pub fn new(
        backend: D,
        monitor: M,
        config: &PanelConfig,
        now_unix: i64,
    ) -> Result<Self, DisplayError> {
        let surface = Surface::new(backend)?;
        let weather = WeatherView::new(
            config.weather.units,
            config.clock.utc_offset_minutes,
            config.weather.is_configured(),
            now_unix,
        );

        let mut carousel = Vec::new();
        let _ = carousel.push(Frame::submenu(weather.message().clone()));
        let _ = carousel.push(Frame::main_menu());

        let mut engine = Self {
            surface,
            monitor,
            overlay: config.overlay,
            carousel,
            current: WEATHER_PAGE,
            overlays: Vec::new(),
            live: Bindings::unmapped(),
            dismissals: Vec::new(),
            numeric: None,
            weather,
            refresh_requested: None,
        };
        engine.carousel[WEATHER_PAGE].activate();
        engine.apply();
        info!("menu engine ready with {} pages", engine.carousel.len());
        Ok(engine)
    }

    /// Frames on the stack, root included
    pub fn depth(&self) -> usize {
        1 + self.overlays.len()
    }

    /// Frame currently receiving input
    pub fn top(&self) -> &Frame {
        match self.overlays.last() {
            Some(frame) => frame,
            None => &self.carousel[self.current],
        }
    }

    /// All frames bottom to top
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        core::iter::once(&self.carousel[self.current]).chain(self.overlays.iter())
    }

    /// Button table currently wired to the keypad
    pub fn live_bindings(&self) -> &Bindings {
        &self.live
    }

    /// Selected carousel page
    pub fn current_page(&self) -> usize {
        self.current
    }

    pub fn weather(&self) -> &WeatherView {
        &self.weather
    }

    pub fn numeric_entry(&self) -> Option<&NumericEntry> {
        self.numeric.as_ref()
    }

    pub fn surface(&self) -> &Surface<D> {
        &self.surface
    }

    pub fn monitor(&self) -> &M {
        &self.monitor
    }

    /// Push `frame` on top and show it
    ///
    /// A full stack first discards the oldest overlay.
    pub fn push(&mut self, mut frame: Frame) -> FrameKey {
        if self.overlays.is_full() {
            let dropped = self.overlays.remove(0);
            warn!(
                "overlay stack full, dropping oldest frame {}",
                dropped.key().id()
            );
            self.forget(dropped.key());
        }

        self.top_mut().deactivate();
        frame.activate();
        let key = frame.key();
        // Room was made above
        let _ = self.overlays.push(frame);
        debug!("push frame {} (depth {})", key.id(), self.depth());
        self.apply();
        key
    }

    /// Pop the top frame, or the frame with `key` wherever it is
    ///
    /// The root is never popped. Removing a frame below the top changes
    /// nothing visible. Unknown keys are ignored.
    pub fn pop(&mut self, key: Option<FrameKey>) {
        let index = match key {
            None => match self.overlays.len() {
                0 => {
                    debug!("pop at root ignored");
                    return;
                }
                len => len - 1,
            },
            Some(key) => match self.overlays.iter().position(|f| f.key() == key) {
                Some(index) => index,
                None => {
                    debug!("pop of unknown frame {} ignored", key.id());
                    return;
                }
            },
        };

        let was_top = index + 1 == self.overlays.len();
        let mut frame = self.overlays.remove(index);
        frame.deactivate();
        self.forget(frame.key());
        debug!("pop frame {} (depth {})", frame.key().id(), self.depth());

        if was_top {
            self.top_mut().activate();
            self.apply();
        }
    }

    /// Push a dismissible message
    pub fn show(&mut self, message: Message) -> FrameKey {
        self.push(Frame::submenu(message))
    }

    /// Push a message that dismisses itself after `duration_ms`
    pub fn show_ephemeral(
        &mut self,
        message: Message,
        duration_ms: u32,
        now_ms: u64,
    ) -> OverlayHandle {
        let key = self.show(message);
        let deadline = now_ms + u64::from(duration_ms);
        // One dismissal per overlay, and the frame was just pushed
        let _ = self.dismissals.push((key, deadline));
        OverlayHandle { key }
    }

    /// Earliest pending overlay deadline
    pub fn next_deadline(&self) -> Option<u64> {
        self.dismissals.iter().map(|(_, deadline)| *deadline).min()
    }

    /// Dismiss every overlay whose deadline has passed
    pub fn expire_overlays(&mut self, now_ms: u64) {
        let expired: Vec<FrameKey, MAX_OVERLAYS> = self
            .dismissals
            .iter()
            .filter(|(_, deadline)| *deadline <= now_ms)
            .map(|(key, _)| *key)
            .collect();
        for key in expired {
            self.pop(Some(key));
        }
    }

    /// Start numeric entry for `target`
    pub fn numeric_input(&mut self, title: &str, target: NumericTarget, as_percent: bool) {
        let key = self.push(Frame::numeric_entry(title));
        self.numeric = Some(NumericEntry::new(key, target, as_percent));
    }

    /// Select the next carousel page
    pub fn next(&mut self) {
        let len = self.carousel.len();
        self.select((self.current + 1) % len);
    }

    /// Select the previous carousel page
    pub fn previous(&mut self) {
        let len = self.carousel.len();
        self.select((self.current + len - 1) % len);
    }

    /// Dispatch a key edge; releases are ignored
    pub fn handle_key(&mut self, event: KeyEvent, now_ms: u64) {
        if !event.pressed {
            return;
        }
        let action = self.live.get(event.label);
        debug!("key {} -> {:?}", event.label.as_char(), action);
        self.execute(event.label, action, now_ms);
    }

    /// Show a validated inbound message for the default overlay duration
    pub fn post_ephemeral_message(
        &mut self,
        line_one: &str,
        line_two: &str,
        now_ms: u64,
    ) -> Result<OverlayHandle, InboundError> {
        let message = validate_inbound(line_one, line_two)?;
        info!("inbound message: {}", message);
        Ok(self.show_ephemeral(message, self.overlay.duration_ms, now_ms))
    }

    /// Minute boundary: refresh the clock, or ask for new weather on the
    /// quarter hour while the weather page is visible
    pub fn on_minute(&mut self, now_unix: i64) {
        match self.weather.on_minute(now_unix) {
            MinuteAction::ClockUpdated => self.sync_weather_page(),
            MinuteAction::Refresh => {
                if self.weather_visible() {
                    self.request_refresh(RefreshReason::Schedule);
                }
            }
            MinuteAction::Idle => {}
        }
    }

    /// Apply a weather fetch outcome
    pub fn apply_weather(&mut self, result: Result<WeatherReading, WeatherError>, now_unix: i64) {
        if let Err(e) = &result {
            warn!("weather unavailable: {}", e);
        }
        self.weather.apply(result, now_unix);
        self.sync_weather_page();
    }

    /// Weather refresh requested since the last call, if any
    ///
    /// Several requests collapse into one; a scheduled refresh wins over an
    /// activation.
    pub fn take_refresh_request(&mut self) -> Option<RefreshReason> {
        self.refresh_requested.take()
    }

    fn execute(&mut self, label: ButtonLabel, action: Action, now_ms: u64) {
        match action {
            Action::Unmapped => {
                let mut line = Line::new();
                let _ = write!(line, "{} unmapped", label.as_char());
                let message = Message::new(line, Line::new());
                self.show_ephemeral(message, self.overlay.unmapped_ms, now_ms);
            }
            Action::Previous => self.previous(),
            Action::Next => self.next(),
            Action::Back => self.pop(None),
            Action::SetVolume => {
                let target = NumericTarget::Volume;
                self.numeric_input(target.title(), target, true);
            }
            Action::SetBrightness => {
                let target = NumericTarget::Brightness;
                self.numeric_input(target.title(), target, true);
            }
            Action::PreviousInput => self.cycle_input(InputStep::Previous, now_ms),
            Action::NextInput => self.cycle_input(InputStep::Next, now_ms),
            Action::Digit(digit) => self.enter_digit(digit),
            Action::Commit => self.commit(),
        }
    }

    fn cycle_input(&mut self, step: InputStep, now_ms: u64) {
        match self.monitor.cycle_input(step) {
            Ok(label) => {
                let message = Message::text("DISPLAY:", &label);
                self.show_ephemeral(message, self.overlay.duration_ms, now_ms);
            }
            Err(e) => warn!("input switch failed: {}", e),
        }
    }

    fn enter_digit(&mut self, digit: u8) {
        let top_key = self.top().key();
        let Some(entry) = self.numeric.as_mut().filter(|e| e.key() == top_key) else {
            debug!("digit {} with no numeric entry on top", digit);
            return;
        };
        if !entry.push_digit(digit) {
            return;
        }
        let line = entry.display_line();
        self.top_mut().message.line_two = line;
        self.render_top();
    }

    fn commit(&mut self) {
        let top_key = self.top().key();
        if !self.numeric.as_ref().is_some_and(|e| e.key() == top_key) {
            debug!("commit with no numeric entry on top");
            return;
        }
        let Some(entry) = self.numeric.take() else {
            return;
        };
        let value = entry.percent();
        info!("commit {:?} = {}", entry.target(), value);
        let result = match entry.target() {
            NumericTarget::Volume => self.monitor.set_volume(value),
            NumericTarget::Brightness => self.monitor.set_brightness(value),
        };
        if let Err(e) = result {
            warn!("{:?} update failed: {}", entry.target(), e);
        }
        self.pop(Some(entry.key()));
    }

    fn select(&mut self, page: usize) {
        if !self.overlays.is_empty() {
            debug!("dismissing {} overlays for page change", self.overlays.len());
            self.overlays.clear();
            self.dismissals.clear();
            self.numeric = None;
        }
        self.carousel[self.current].deactivate();
        self.current = page;
        self.carousel[self.current].activate();
        debug!("carousel page {}", page);
        self.apply();
    }

    /// Rewire the buttons to the top frame and render it
    fn apply(&mut self) {
        self.live = self.top().bindings;
        self.render_top();
        if self.weather_visible() && self.weather.is_configured() {
            self.request_refresh(RefreshReason::Activation);
        }
    }

    fn request_refresh(&mut self, reason: RefreshReason) {
        self.refresh_requested = self.refresh_requested.max(Some(reason));
    }

    fn render_top(&mut self) {
        let message = match self.overlays.last() {
            Some(frame) => &frame.message,
            None => &self.carousel[self.current].message,
        };
        if let Err(e) = self.surface.render(message) {
            warn!("render failed: {}", e);
        }
    }

    fn top_mut(&mut self) -> &mut Frame {
        match self.overlays.last_mut() {
            Some(frame) => frame,
            None => &mut self.carousel[self.current],
        }
    }

    fn weather_visible(&self) -> bool {
        self.overlays.is_empty() && self.current == WEATHER_PAGE
    }

    fn sync_weather_page(&mut self) {
        self.carousel[WEATHER_PAGE].message = self.weather.message().clone();
        if self.weather_visible() {
            self.render_top();
        }
    }

    /// Drop timers and entry state belonging to a removed frame
    fn forget(&mut self, key: FrameKey) {
        self.dismissals.retain(|(k, _)| *k != key);
        if self.numeric.as_ref().is_some_and(|e| e.key() == key) {
            self.numeric = None;
        }
    }
}
