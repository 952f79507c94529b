#![allow(dead_code)]
use std::cell::RefCell;
use std::sync::{Arc, Mutex, Once};

use fastbar::{Config, DisplayId, DisplaySurface, Renderer};

/// Text written by a terminal renderer, as one string
#[derive(Clone, Default)]
pub struct Output(Arc<Mutex<String>>);

impl Output {
    pub fn text(&self) -> String {
        self.0.lock().unwrap().clone()
    }
}

/// Terminal renderer that writes to a buffer, as if stdout was a terminal
pub fn terminal() -> (Renderer, Output) {
    terminal_with(Config::default())
}

pub fn terminal_with(config: Config) -> (Renderer, Output) {
    let output = Output::default();
    let buf = Arc::clone(&output.0);
    let config = Config {
        interactive: true,
        flush: false,
        writer: Arc::new(move |text, end| {
            let mut buf = buf.lock().unwrap();
            buf.push_str(text);
            buf.push_str(end);
        }),
        ..config
    };
    (Renderer::terminal(config), output)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Display(u64, String),
    Update(u64, String),
    Clear(u64),
}

impl Event {
    pub fn markup(&self) -> Option<&str> {
        match self {
            Event::Display(_, m) | Event::Update(_, m) => Some(m),
            Event::Clear(_) => None,
        }
    }
}

/// Display surface that records what it is asked to do
#[derive(Clone, Default)]
pub struct Surface {
    events: Arc<Mutex<Vec<Event>>>,
    next_id: Arc<Mutex<u64>>,
}

impl Surface {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Markup of the last display or update
    pub fn last_markup(&self) -> String {
        self.events()
            .iter()
            .rev()
            .find_map(|e| e.markup().map(str::to_string))
            .unwrap_or_default()
    }
}

impl DisplaySurface for Surface {
    fn display(&mut self, markup: &str) -> DisplayId {
        let mut next_id = self.next_id.lock().unwrap();
        let id = *next_id;
        *next_id += 1;
        self.events
            .lock()
            .unwrap()
            .push(Event::Display(id, markup.to_string()));
        DisplayId(id)
    }

    fn update(&mut self, id: DisplayId, markup: &str) {
        self.events
            .lock()
            .unwrap()
            .push(Event::Update(id.0, markup.to_string()));
    }

    fn clear(&mut self, id: DisplayId) {
        self.events.lock().unwrap().push(Event::Clear(id.0));
    }
}

/// Rich renderer on a recording surface
pub fn rich() -> (Renderer, Surface) {
    let surface = Surface::default();
    (Renderer::rich(surface.clone()), surface)
}

thread_local! {
    static LOGS: RefCell<Vec<(log::Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CaptureLog;
impl log::Log for CaptureLog {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }
    fn log(&self, record: &log::Record) {
        LOGS.with_borrow_mut(|logs| logs.push((record.level(), record.args().to_string())));
    }
    fn flush(&self) {}
}

static CAPTURE_LOG: CaptureLog = CaptureLog;
static INIT_LOG: Once = Once::new();

/// Start capturing the log messages of the current thread
pub fn capture_logs() {
    INIT_LOG.call_once(|| {
        let _ = log::set_logger(&CAPTURE_LOG);
        log::set_max_level(log::LevelFilter::Trace);
    });
    LOGS.with_borrow_mut(|logs| logs.clear());
}

/// Log messages of the current thread since [`capture_logs`]
pub fn logs() -> Vec<(log::Level, String)> {
    LOGS.with_borrow(|logs| logs.clone())
}
