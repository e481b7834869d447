//! Presentation adapter
//!
//! The controller talks to the page only through `Presenter`. The browser
//! implementation lives with the wasm entry point; `HeadlessPresenter` keeps
//! the view in memory for the terminal binary and for tests.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::countdown::CountdownDisplay;

pub trait Presenter {
    /// Current value of the event name field
    fn name_input(&self) -> String;
    /// Current value of the date field
    fn date_input(&self) -> String;
    fn set_name_input(&mut self, value: &str);
    fn set_date_input(&mut self, value: &str);
    fn set_title(&mut self, title: &str);
    /// Show the countdown block with these fields and hide the message
    fn show_countdown(&mut self, display: &CountdownDisplay);
    /// Show the arrival message
    fn show_message(&mut self, message: &str);
    /// Blocking user-facing alert
    fn alert(&mut self, message: &str);
    fn set_dark_mode(&mut self, dark: bool);
    fn set_background(&mut self, css: &str);
    /// Viewport size in CSS pixels
    fn viewport(&self) -> (u32, u32);
}

/// In-memory view state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeadlessView {
    pub name_input: String,
    pub date_input: String,
    pub title: String,
    pub countdown: Option<CountdownDisplay>,
    pub countdown_visible: bool,
    pub message: String,
    pub message_visible: bool,
    pub alerts: Vec<String>,
    pub dark_mode: bool,
    pub background: String,
    pub viewport: (u32, u32),
    /// Times `show_countdown` ran
    pub countdown_updates: usize,
}

/// Presenter over shared in-memory state; clones observe the same view
#[derive(Debug, Clone, Default)]
pub struct HeadlessPresenter {
    view: Rc<RefCell<HeadlessView>>,
}

impl HeadlessPresenter {
    pub fn new(viewport: (u32, u32)) -> Self {
        let presenter = Self::default();
        presenter.view.borrow_mut().viewport = viewport;
        presenter
    }

    pub fn view(&self) -> Ref<'_, HeadlessView> {
        self.view.borrow()
    }

    /// Type into the form fields
    pub fn fill(&self, name: &str, date: &str) {
        let mut view = self.view.borrow_mut();
        view.name_input = name.to_string();
        view.date_input = date.to_string();
    }

    pub fn set_viewport(&self, width: u32, height: u32) {
        self.view.borrow_mut().viewport = (width, height);
    }
}

impl Presenter for HeadlessPresenter {
    fn name_input(&self) -> String {
        self.view.borrow().name_input.clone()
    }

    fn date_input(&self) -> String {
        self.view.borrow().date_input.clone()
    }

    fn set_name_input(&mut self, value: &str) {
        self.view.borrow_mut().name_input = value.to_string();
    }

    fn set_date_input(&mut self, value: &str) {
        self.view.borrow_mut().date_input = value.to_string();
    }

    fn set_title(&mut self, title: &str) {
        self.view.borrow_mut().title = title.to_string();
    }

    fn show_countdown(&mut self, display: &CountdownDisplay) {
        let mut view = self.view.borrow_mut();
        view.countdown = Some(display.clone());
        view.countdown_visible = true;
        view.message_visible = false;
        view.countdown_updates += 1;
    }

    fn show_message(&mut self, message: &str) {
        let mut view = self.view.borrow_mut();
        view.message = message.to_string();
        view.message_visible = true;
    }

    fn alert(&mut self, message: &str) {
        self.view.borrow_mut().alerts.push(message.to_string());
    }

    fn set_dark_mode(&mut self, dark: bool) {
        self.view.borrow_mut().dark_mode = dark;
    }

    fn set_background(&mut self, css: &str) {
        self.view.borrow_mut().background = css.to_string();
    }

    fn viewport(&self) -> (u32, u32) {
        self.view.borrow().viewport
    }
}
