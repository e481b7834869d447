//! D-Day Countdown entry point
//!
//! In the browser: wires the DOM to the controller. Natively: a small CLI
//! that runs the same countdown in the terminal against a JSON file store.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, Window};

    use dday_countdown::persistence::LocalStore;
    use dday_countdown::platform::web::{WebCanvas, WebClock, WebFrames, WebIntervalTimer};
    use dday_countdown::ui::Presenter;
    use dday_countdown::{CountdownApp, CountdownDisplay, InputEvent, Services};

    /// Presenter over the widget's DOM
    struct DomPresenter {
        window: Window,
        document: Document,
        name_input: Option<HtmlInputElement>,
        date_input: Option<HtmlInputElement>,
    }

    impl DomPresenter {
        fn new(window: &Window, document: &Document) -> Self {
            let input = |id: &str| {
                document
                    .get_element_by_id(id)
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            };
            Self {
                window: window.clone(),
                document: document.clone(),
                name_input: input("event-name"),
                date_input: input("target-date"),
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }
    }

    impl Presenter for DomPresenter {
        fn name_input(&self) -> String {
            self.name_input.as_ref().map(|i| i.value()).unwrap_or_default()
        }

        fn date_input(&self) -> String {
            self.date_input.as_ref().map(|i| i.value()).unwrap_or_default()
        }

        fn set_name_input(&mut self, value: &str) {
            if let Some(input) = &self.name_input {
                input.set_value(value);
            }
        }

        fn set_date_input(&mut self, value: &str) {
            if let Some(input) = &self.date_input {
                input.set_value(value);
            }
        }

        fn set_title(&mut self, title: &str) {
            self.set_text("main-title", title);
        }

        fn show_countdown(&mut self, display: &CountdownDisplay) {
            self.set_hidden("countdown", false);
            self.set_hidden("message", true);
            self.set_text("days", &display.days);
            self.set_text("hours", &display.hours);
            self.set_text("minutes", &display.minutes);
            self.set_text("seconds", &display.seconds);
        }

        fn show_message(&mut self, message: &str) {
            self.set_text("message", message);
            self.set_hidden("message", false);
        }

        fn alert(&mut self, message: &str) {
            let _ = self.window.alert_with_message(message);
        }

        fn set_dark_mode(&mut self, dark: bool) {
            if let Some(body) = self.document.body() {
                let _ = body.class_list().toggle_with_force("dark-mode", dark);
            }
        }

        fn set_background(&mut self, css: &str) {
            if let Some(body) = self.document.body() {
                let _ = body.style().set_property("background", css);
            }
        }

        fn viewport(&self) -> (u32, u32) {
            viewport_of(&self.window)
        }
    }

    fn viewport_of(window: &Window) -> (u32, u32) {
        let dim = |v: Result<JsValue, JsValue>| {
            v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
        };
        (dim(window.inner_width()), dim(window.inner_height()))
    }

    /// Forward a DOM event to the controller when `map` recognizes it
    fn subscribe(
        target: &web_sys::EventTarget,
        kind: &str,
        app: &Rc<RefCell<CountdownApp>>,
        map: impl Fn(&web_sys::Event) -> Option<InputEvent> + 'static,
    ) {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            if let Some(input) = map(&event) {
                app.borrow_mut().dispatch(input);
            }
        });
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn subscribe_by_id(
        document: &Document,
        id: &str,
        kind: &str,
        app: &Rc<RefCell<CountdownApp>>,
        map: impl Fn(&web_sys::Event) -> Option<InputEvent> + 'static,
    ) {
        match document.get_element_by_id(id) {
            Some(el) => subscribe(&el, kind, app, map),
            None => log::warn!("#{} not found - {} ignored", id, kind),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("D-Day Countdown starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("confetti")
            .ok_or("no confetti canvas")?
            .dyn_into()?;
        let canvas = WebCanvas::new(canvas).ok_or("canvas has no 2d context")?;

        let app = Rc::new_cyclic(|weak: &Weak<RefCell<CountdownApp>>| {
            let on_tick = {
                let weak = weak.clone();
                move || {
                    if let Some(app) = weak.upgrade() {
                        app.borrow_mut().on_tick();
                    }
                }
            };
            let on_frame = {
                let weak = weak.clone();
                move |_time: f64| {
                    if let Some(app) = weak.upgrade() {
                        app.borrow_mut().on_frame();
                    }
                }
            };
            RefCell::new(CountdownApp::new(Services {
                store: Box::new(LocalStore::new()),
                clock: Box::new(WebClock),
                timer: Box::new(WebIntervalTimer::new(window.clone(), on_tick)),
                frames: Box::new(WebFrames::new(window.clone(), on_frame)),
                canvas: Box::new(canvas),
                presenter: Box::new(DomPresenter::new(&window, &document)),
            }))
        });

        subscribe_by_id(&document, "set-btn", "click", &app, |_| {
            Some(InputEvent::SetClicked)
        });
        subscribe_by_id(&document, "theme-toggle", "click", &app, |_| {
            Some(InputEvent::ThemeToggled)
        });
        subscribe_by_id(&document, "bg-toggle", "click", &app, |_| {
            Some(InputEvent::BackgroundToggled)
        });
        subscribe_by_id(&document, "event-name", "keypress", &app, |event| {
            event
                .dyn_ref::<KeyboardEvent>()
                .map(|k| InputEvent::NameKeyPressed { key: k.key() })
        });
        {
            let window_clone = window.clone();
            subscribe(&window, "resize", &app, move |_| {
                let (width, height) = viewport_of(&window_clone);
                Some(InputEvent::Resized { width, height })
            });
        }

        app.borrow_mut().load();

        log::info!("D-Day Countdown running!");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use std::io::Write;
    use std::path::PathBuf;
    use std::process::ExitCode;
    use std::thread;
    use std::time::Duration;

    use clap::{Parser, Subcommand};

    use dday_countdown::persistence::{self, FileStore, KeyValueStore, SavedState};
    use dday_countdown::platform::SystemClock;
    use dday_countdown::platform::manual::{ManualFrames, ManualTimer, RecordingCanvas};
    use dday_countdown::ui::HeadlessPresenter;
    use dday_countdown::{CountdownApp, Services};

    #[derive(Parser)]
    #[command(name = "dday-countdown", version, about = "D-Day countdown in the terminal")]
    struct Cli {
        /// Store file (defaults to the user config directory)
        #[arg(long, global = true)]
        store: Option<PathBuf>,
        /// Print the countdown once instead of following it
        #[arg(long, global = true)]
        once: bool,
        #[command(subcommand)]
        command: Command,
    }

    #[derive(Subcommand)]
    enum Command {
        /// Save an event and count down to it
        Set {
            name: String,
            /// YYYY-MM-DD, YYYY-MM-DDTHH:MM or RFC 3339
            date: String,
        },
        /// Resume the saved countdown
        Show,
        /// Toggle between dark and light theme
        Theme,
        /// Forget the saved event and theme
        Clear,
    }

    fn default_store_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dday-countdown")
            .join("store.json")
    }

    /// Terminal width/height stand in for the viewport
    const TERMINAL_VIEWPORT: (u32, u32) = (80, 24);

    pub fn run() -> ExitCode {
        let cli = Cli::parse();
        let path = cli.store.unwrap_or_else(default_store_path);
        let mut store = FileStore::open_or_empty(&path);
        log::info!("Using store {}", store.path().display());

        if let Command::Clear = cli.command {
            persistence::clear_saved(&mut store);
            println!("Cleared saved event");
            return ExitCode::SUCCESS;
        }

        let saved = SavedState::load(&store as &dyn KeyValueStore);
        let timer = ManualTimer::new();
        let view = HeadlessPresenter::new(TERMINAL_VIEWPORT);
        let mut app = CountdownApp::new(Services {
            store: Box::new(store),
            clock: Box::new(SystemClock),
            timer: Box::new(timer.clone()),
            frames: Box::new(ManualFrames::new()),
            canvas: Box::new(RecordingCanvas::new()),
            presenter: Box::new(view.clone()),
        });

        match cli.command {
            Command::Set { name, date } => {
                view.fill(&name, &date);
                if let Err(e) = app.set() {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
            Command::Show => {
                if saved.date.is_none() {
                    eprintln!("No saved event - use `dday-countdown set <name> <date>`");
                    return ExitCode::FAILURE;
                }
                app.load();
            }
            Command::Theme => {
                app.load();
                app.toggle_theme();
                println!("Theme: {}", app.theme().as_str());
                return ExitCode::SUCCESS;
            }
            Command::Clear => return ExitCode::SUCCESS,
        }

        render(&view);
        if !cli.once {
            follow(&mut app, &timer, &view);
        }
        println!();
        ExitCode::SUCCESS
    }

    /// Sleep between ticks until the countdown stops ticking
    fn follow(app: &mut CountdownApp, timer: &ManualTimer, view: &HeadlessPresenter) {
        while let Some(period) = timer.period_ms() {
            thread::sleep(Duration::from_millis(period as u64));
            app.on_tick();
            render(view);
        }
    }

    fn render(view: &HeadlessPresenter) {
        let view = view.view();
        if view.message_visible {
            print!("\r{}", view.message);
        } else if let Some(d) = &view.countdown {
            print!(
                "\r{}  {}d {}:{}:{}",
                view.title, d.days, d.hours, d.minutes, d.seconds
            );
        } else {
            print!("\r{}  (waiting for a valid date)", view.title);
        }
        let _ = std::io::stdout().flush();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    cli::run()
}
