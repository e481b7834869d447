//! Countdown controller
//!
//! Owns the countdown engine, the celebration and the toggles, and reacts to
//! a fixed set of input events plus the tick and frame callbacks. The
//! platform entry points only forward events here.

use crate::celebration::Celebration;
use crate::consts::TICK_PERIOD_MS;
use crate::countdown::{CountdownEngine, CountdownPhase, EventTarget, TickOutcome};
use crate::error::SetError;
use crate::persistence::{self, KeyValueStore, SavedState};
use crate::platform::{Canvas, Clock, FrameScheduler, IntervalTimer};
use crate::settings::Settings;
use crate::theme::{Background, Theme};
use crate::ui::Presenter;

/// Inputs the controller subscribes to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Set button activated
    SetClicked,
    /// Key pressed in the event name field (Enter acts as Set)
    NameKeyPressed { key: String },
    ThemeToggled,
    BackgroundToggled,
    Resized { width: u32, height: u32 },
}

/// Platform services handed to the controller
pub struct Services {
    pub store: Box<dyn KeyValueStore>,
    pub clock: Box<dyn Clock>,
    pub timer: Box<dyn IntervalTimer>,
    pub frames: Box<dyn FrameScheduler>,
    pub canvas: Box<dyn Canvas>,
    pub presenter: Box<dyn Presenter>,
}

pub struct CountdownApp {
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    presenter: Box<dyn Presenter>,
    engine: CountdownEngine,
    celebration: Celebration,
    settings: Settings,
    theme: Theme,
    background: Background,
}

impl CountdownApp {
    /// Build the controller. Settings are read from the store right away;
    /// the saved event is restored by `load`.
    pub fn new(services: Services) -> Self {
        let Services {
            store,
            clock,
            timer,
            frames,
            canvas,
            presenter,
        } = services;
        let settings = Settings::load(store.as_ref());
        let seed = clock.now_ms() as u64;
        Self {
            engine: CountdownEngine::new(timer, TICK_PERIOD_MS),
            celebration: Celebration::new(frames, canvas, seed),
            store,
            clock,
            presenter,
            settings,
            theme: Theme::default(),
            background: Background::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> CountdownPhase {
        self.engine.phase()
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn celebration(&self) -> &Celebration {
        &self.celebration
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn background(&self) -> Background {
        self.background
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Restore the saved event and theme; resume the countdown if a date was saved
    pub fn load(&mut self) {
        let saved = SavedState::load(self.store.as_ref());

        if let Some(name) = &saved.name {
            self.presenter.set_name_input(name);
            self.presenter.set_title(&crate::title_for(name));
        }
        if let Some(date) = &saved.date {
            self.presenter.set_date_input(date);
        }
        if let Some(theme) = saved.theme {
            self.theme = theme;
            self.presenter.set_dark_mode(theme.is_dark());
        }

        log::info!(
            "Loaded: name={:?} date={:?} theme={}",
            saved.name,
            saved.date,
            self.theme.as_str()
        );

        if saved.date.is_some() {
            self.start_countdown();
        }
    }

    /// Route an input event
    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::SetClicked => {
                let _ = self.set();
            }
            InputEvent::NameKeyPressed { key } => {
                if key == "Enter" {
                    let _ = self.set();
                }
            }
            InputEvent::ThemeToggled => self.toggle_theme(),
            InputEvent::BackgroundToggled => self.toggle_background(),
            InputEvent::Resized { width, height } => self.celebration.resize(width, height),
        }
    }

    /// Validate the form, persist it and restart the countdown. On missing
    /// input the user is alerted and nothing changes.
    pub fn set(&mut self) -> Result<(), SetError> {
        let name = self.presenter.name_input();
        let date = self.presenter.date_input();
        let target = match EventTarget::validated(&name, &date) {
            Ok(target) => target,
            Err(e) => {
                log::info!("Set rejected: {}", e);
                self.presenter.alert(&e.to_string());
                return Err(e);
            }
        };

        persistence::save_event(self.store.as_mut(), &target);
        self.presenter.set_title(&crate::title_for(&target.name));
        self.celebration.stop();
        self.start_countdown();
        Ok(())
    }

    /// Repeating tick callback
    pub fn on_tick(&mut self) {
        let target = self.current_target();
        let outcome = self.engine.tick(&target, self.clock.now_ms());
        self.apply(outcome);
    }

    /// Animation frame callback
    pub fn on_frame(&mut self) {
        self.celebration.frame();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.presenter.set_dark_mode(self.theme.is_dark());
        persistence::save_theme(self.store.as_mut(), self.theme);
    }

    pub fn toggle_background(&mut self) {
        let css = self.background.advance();
        self.presenter.set_background(css);
    }

    // ── Internals ────────────────────────────────────────────────────

    fn start_countdown(&mut self) {
        let target = self.current_target();
        let outcome = self.engine.start(&target, self.clock.now_ms());
        self.apply(outcome);
    }

    /// The event as the form shows it right now
    fn current_target(&self) -> EventTarget {
        EventTarget::new(self.presenter.name_input(), self.presenter.date_input())
    }

    fn apply(&mut self, outcome: TickOutcome) {
        match outcome {
            TickOutcome::Skipped => {}
            TickOutcome::Updated(display) => {
                self.presenter.show_countdown(&display);
                self.celebration.stop();
            }
            TickOutcome::Arrived { message } => {
                self.presenter.show_message(&message);
                if self.settings.particles {
                    self.celebration.start(self.presenter.viewport());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::MemoryStore;
    use crate::platform::manual::{ManualClock, ManualFrames, ManualTimer, RecordingCanvas};
    use crate::ui::HeadlessPresenter;
    use std::cell::RefCell;
    use std::rc::Rc;

    const NOW: i64 = 1_800_000_000_000;

    /// Store that can be inspected after the app takes ownership
    #[derive(Clone, Default)]
    struct SharedStore {
        inner: Rc<RefCell<MemoryStore>>,
        writes: Rc<RefCell<usize>>,
    }

    impl KeyValueStore for SharedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &str) {
            *self.writes.borrow_mut() += 1;
            self.inner.borrow_mut().set(key, value);
        }

        fn remove(&mut self, key: &str) {
            self.inner.borrow_mut().remove(key);
        }
    }

    struct Harness {
        app: CountdownApp,
        store: SharedStore,
        clock: ManualClock,
        timer: ManualTimer,
        frames: ManualFrames,
        view: HeadlessPresenter,
    }

    impl Harness {
        fn new() -> Self {
            Self::with_store(SharedStore::default())
        }

        fn with_store(store: SharedStore) -> Self {
            let clock = ManualClock::new(NOW);
            let timer = ManualTimer::new();
            let frames = ManualFrames::new();
            let view = HeadlessPresenter::new((800, 600));
            let app = CountdownApp::new(Services {
                store: Box::new(store.clone()),
                clock: Box::new(clock.clone()),
                timer: Box::new(timer.clone()),
                frames: Box::new(frames.clone()),
                canvas: Box::new(RecordingCanvas::new()),
                presenter: Box::new(view.clone()),
            });
            Self {
                app,
                store,
                clock,
                timer,
                frames,
                view,
            }
        }

        /// Advance one tick period and fire the tick if one is installed
        fn tick(&mut self) {
            self.clock.advance(TICK_PERIOD_MS as i64);
            if self.timer.is_active() {
                self.app.on_tick();
            }
        }

        fn frame(&mut self) {
            if self.frames.deliver() > 0 {
                self.app.on_frame();
            }
        }

        fn writes(&self) -> usize {
            *self.store.writes.borrow()
        }
    }

    fn date_at(offset_ms: i64) -> String {
        chrono::DateTime::from_timestamp_millis(NOW + offset_ms)
            .unwrap()
            .to_rfc3339()
    }

    #[test]
    fn test_set_graduation_shows_decomposition() {
        let mut h = Harness::new();
        h.view.fill("Graduation", &date_at(90_061_000));
        h.app.dispatch(InputEvent::SetClicked);

        let view = h.view.view();
        let display = view.countdown.as_ref().unwrap();
        assert_eq!(display.days, "1");
        assert_eq!(display.hours, "01");
        assert_eq!(display.minutes, "01");
        assert_eq!(display.seconds, "01");
        assert_eq!(view.title, "Graduation D-Day");
        assert!(view.countdown_visible);
        assert!(!view.message_visible);
        drop(view);

        assert_eq!(h.app.phase(), CountdownPhase::Running);
        assert_eq!(h.timer.active_count(), 1);
        let stored = h.store.inner.borrow();
        assert_eq!(stored.get(KEY_EVENT_NAME).as_deref(), Some("Graduation"));
        assert_eq!(stored.get(KEY_TARGET_DATE), Some(date_at(90_061_000)));
    }

    #[test]
    fn test_set_trims_name() {
        let mut h = Harness::new();
        h.view.fill("  Graduation  ", &date_at(60_000));
        assert_eq!(h.app.set(), Ok(()));
        assert_eq!(
            h.store.inner.borrow().get(KEY_EVENT_NAME).as_deref(),
            Some("Graduation")
        );
    }

    #[test]
    fn test_set_with_missing_name_alerts_without_writing() {
        let mut h = Harness::new();
        h.view.fill("", &date_at(60_000));

        assert_eq!(h.app.set(), Err(SetError::MissingInput));
        assert_eq!(h.view.view().alerts, vec![MISSING_INPUT_ALERT.to_string()]);
        assert_eq!(h.writes(), 0);
        assert_eq!(h.app.phase(), CountdownPhase::Idle);
        assert_eq!(h.timer.active_count(), 0);
    }

    #[test]
    fn test_set_with_missing_date_alerts() {
        let mut h = Harness::new();
        h.view.fill("Graduation", "");
        h.app.dispatch(InputEvent::NameKeyPressed {
            key: "Enter".to_string(),
        });
        assert_eq!(h.view.view().alerts.len(), 1);
        assert_eq!(h.writes(), 0);
    }

    #[test]
    fn test_only_enter_key_sets() {
        let mut h = Harness::new();
        h.view.fill("Graduation", &date_at(60_000));
        h.app.dispatch(InputEvent::NameKeyPressed {
            key: "a".to_string(),
        });
        assert_eq!(h.app.phase(), CountdownPhase::Idle);

        h.app.dispatch(InputEvent::NameKeyPressed {
            key: "Enter".to_string(),
        });
        assert_eq!(h.app.phase(), CountdownPhase::Running);
    }

    #[test]
    fn test_ticks_count_down_then_arrive() {
        let mut h = Harness::new();
        h.view.fill("Launch", &date_at(2_500));
        h.app.set().unwrap();
        assert_eq!(h.view.view().countdown.as_ref().unwrap().seconds, "02");

        h.tick();
        assert_eq!(h.view.view().countdown.as_ref().unwrap().seconds, "01");
        h.tick();
        assert_eq!(h.view.view().countdown.as_ref().unwrap().seconds, "00");
        h.tick();

        let view = h.view.view();
        assert!(view.message_visible);
        assert_eq!(view.message, "🎉 Launch 도착! 🎉");
        drop(view);
        assert_eq!(h.app.phase(), CountdownPhase::Expired);
        assert_eq!(h.timer.active_count(), 0);
        assert!(h.app.celebration().is_running());
        assert_eq!(h.frames.pending_count(), 1);
    }

    #[test]
    fn test_past_date_arrives_with_one_celebration() {
        let mut h = Harness::new();
        h.view.fill("Graduation", &date_at(-5_000));
        h.app.set().unwrap();

        assert_eq!(h.app.phase(), CountdownPhase::Expired);
        assert_eq!(h.timer.active_count(), 0);
        assert!(h.app.celebration().is_running());
        assert_eq!(h.app.celebration().particles().len(), 100);
        assert_eq!(h.frames.pending_count(), 1);

        for _ in 0..5 {
            h.tick();
            h.frame();
        }
        assert_eq!(h.frames.pending_count(), 1);
        assert_eq!(h.app.celebration().particles().len(), 100);
    }

    #[test]
    fn test_arrival_message_uses_default_label_for_empty_field() {
        let mut h = Harness::new();
        h.view.fill("Graduation", &date_at(1_000));
        h.app.set().unwrap();
        // Name field cleared after setting
        h.view.fill("", &date_at(1_000));
        h.tick();
        h.tick();
        assert_eq!(h.view.view().message, "🎉 D-Day 도착! 🎉");
    }

    #[test]
    fn test_setting_twice_keeps_one_tick() {
        let mut h = Harness::new();
        h.view.fill("A", &date_at(60_000));
        h.app.set().unwrap();
        h.view.fill("B", &date_at(120_000));
        h.app.set().unwrap();
        assert_eq!(h.timer.active_count(), 1);

        let before = h.view.view().countdown_updates;
        for _ in 0..10 {
            h.tick();
        }
        assert_eq!(h.view.view().countdown_updates - before, 10);
    }

    #[test]
    fn test_set_future_stops_celebration() {
        let mut h = Harness::new();
        h.view.fill("Past", &date_at(-1));
        h.app.set().unwrap();
        assert!(h.app.celebration().is_running());

        h.view.fill("Future", &date_at(60_000));
        h.app.set().unwrap();
        assert!(!h.app.celebration().is_running());
        assert!(h.app.celebration().particles().is_empty());
        assert_eq!(h.frames.pending_count(), 0);
        assert!(!h.view.view().message_visible);
        assert_eq!(h.app.phase(), CountdownPhase::Running);
    }

    #[test]
    fn test_cleared_date_freezes_display() {
        let mut h = Harness::new();
        h.view.fill("Graduation", &date_at(90_061_000));
        h.app.set().unwrap();
        h.tick();
        let frozen = h.view.view().countdown.clone();
        let updates = h.view.view().countdown_updates;

        h.view.fill("Graduation", "");
        for _ in 0..3 {
            h.tick();
        }
        assert_eq!(h.view.view().countdown, frozen);
        assert_eq!(h.view.view().countdown_updates, updates);
        assert_eq!(h.app.phase(), CountdownPhase::Running);
        assert_eq!(h.timer.active_count(), 1);
    }

    #[test]
    fn test_load_restores_and_resumes() {
        let store = SharedStore::default();
        {
            let mut inner = store.inner.borrow_mut();
            inner.set(KEY_EVENT_NAME, "Graduation");
            inner.set(KEY_TARGET_DATE, &date_at(90_061_000));
            inner.set(KEY_THEME, "dark");
        }
        let mut h = Harness::with_store(store);
        h.app.load();

        let view = h.view.view();
        assert_eq!(view.name_input, "Graduation");
        assert_eq!(view.title, "Graduation D-Day");
        assert_eq!(view.date_input, date_at(90_061_000));
        assert!(view.dark_mode);
        assert_eq!(view.countdown.as_ref().unwrap().days, "1");
        drop(view);
        assert_eq!(h.app.theme(), Theme::Dark);
        assert_eq!(h.app.phase(), CountdownPhase::Running);
        assert_eq!(h.writes(), 0);
    }

    #[test]
    fn test_load_with_nothing_saved_stays_idle() {
        let mut h = Harness::new();
        h.app.load();
        assert_eq!(h.app.phase(), CountdownPhase::Idle);
        assert_eq!(h.timer.started(), 0);
        assert_eq!(h.view.view().title, "");
    }

    #[test]
    fn test_load_with_unparseable_date_is_inert() {
        let store = SharedStore::default();
        store.inner.borrow_mut().set(KEY_TARGET_DATE, "garbage");
        let mut h = Harness::with_store(store);
        h.app.load();
        h.tick();
        assert!(h.view.view().countdown.is_none());
        assert!(!h.view.view().message_visible);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut h = Harness::new();
        h.app.dispatch(InputEvent::ThemeToggled);
        assert!(h.view.view().dark_mode);
        assert_eq!(h.store.inner.borrow().get(KEY_THEME).as_deref(), Some("dark"));

        h.app.dispatch(InputEvent::ThemeToggled);
        assert!(!h.view.view().dark_mode);
        assert_eq!(h.store.inner.borrow().get(KEY_THEME).as_deref(), Some("light"));
    }

    #[test]
    fn test_background_toggle_cycles_without_persisting() {
        let mut h = Harness::new();
        h.app.dispatch(InputEvent::BackgroundToggled);
        assert_eq!(h.view.view().background, crate::theme::BACKGROUNDS[1]);
        for _ in 0..3 {
            h.app.dispatch(InputEvent::BackgroundToggled);
        }
        assert_eq!(h.app.background().index(), 0);
        assert_eq!(h.writes(), 0);
    }

    #[test]
    fn test_resize_reaches_running_celebration() {
        let mut h = Harness::new();
        h.view.fill("Past", &date_at(-1));
        h.app.set().unwrap();
        h.app.dispatch(InputEvent::Resized {
            width: 1024,
            height: 768,
        });
        assert!(h.app.celebration().is_running());
    }

    #[test]
    fn test_particles_disabled_in_settings() {
        let store = SharedStore::default();
        store
            .inner
            .borrow_mut()
            .set(KEY_SETTINGS, r#"{"particles":false}"#);
        let mut h = Harness::with_store(store);
        h.view.fill("Past", &date_at(-1));
        h.app.set().unwrap();
        assert!(h.view.view().message_visible);
        assert!(!h.app.celebration().is_running());
    }

    #[test]
    fn test_stored_settings_cannot_change_particles_or_tick() {
        for json in [
            r#"{"particle_count":0,"tick_period_ms":0}"#,
            r#"{"particle_count":18446744073709551615,"tick_period_ms":4294967295}"#,
        ] {
            let store = SharedStore::default();
            store.inner.borrow_mut().set(KEY_SETTINGS, json);
            let mut h = Harness::with_store(store);

            h.view.fill("Soon", &date_at(5_000));
            h.app.set().unwrap();
            assert_eq!(h.timer.period_ms(), Some(TICK_PERIOD_MS));

            h.view.fill("Past", &date_at(-1));
            h.app.set().unwrap();
            assert!(h.app.celebration().is_running());
            assert_eq!(h.app.celebration().particles().len(), PARTICLE_COUNT);
        }
    }
}
