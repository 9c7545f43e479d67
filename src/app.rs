use crate::{
    api::{ApiClient, ApiError, SubmitReceipt, WeatherRecord, WeatherRequest},
    event::{AppEvent, Event, EventHandler},
    form::{SubmitStatus, WeatherForm},
    history::HistoryItem,
    keybindings::{KeybindingRegistry, text_edit_request},
    lookup::{LookupPanel, LookupStatus},
    store::HistoryStore,
};
use chrono::{Local, NaiveDate};
use ratatui::{
    DefaultTerminal,
    crossterm::event::{KeyEvent, KeyEventKind},
    layout::Position,
};
use std::cell::Cell;
use tracing::{debug, info, warn};

/// The panel that receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Focus {
    #[default]
    Form,
    Lookup,
    History,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Form => Focus::Lookup,
            Focus::Lookup => Focus::History,
            Focus::History => Focus::Form,
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Form => Focus::History,
            Focus::Lookup => Focus::Form,
            Focus::History => Focus::Lookup,
        }
    }
}

/// Popups drawn over the panels. While one is open it receives all keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Overlay {
    Help,
    ConfirmClear,
    Message(String),
    Error(String),
}

impl Overlay {
    /// Returns the fixed popup size (width, height), if any.
    pub fn popup_size(&self) -> Option<(u16, u16)> {
        match self {
            Overlay::Help => Some((60, 44)),
            Overlay::ConfirmClear => Some((44, 7)),
            Overlay::Message(_) | Overlay::Error(_) => None,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Application.
#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub focus: Focus,
    pub overlay: Option<Overlay>,
    pub events: EventHandler,
    pub keybindings: KeybindingRegistry,
    pub store: HistoryStore,
    api: ApiClient,
    pub form: WeatherForm,
    pub lookup: LookupPanel,
    /// Terminal cursor for the focused input, set while rendering.
    pub(crate) cursor: Cell<Option<Position>>,
}

impl App {
    /// Constructs a new instance of [`App`] reading terminal events.
    pub fn new(store: HistoryStore, api: ApiClient) -> Self {
        Self::with_events(store, api, EventHandler::new())
    }

    pub fn with_events(store: HistoryStore, api: ApiClient, events: EventHandler) -> Self {
        let lookup = LookupPanel::new(&store);
        Self {
            running: true,
            focus: Focus::Form,
            overlay: None,
            events,
            keybindings: KeybindingRegistry::new(),
            store,
            api,
            form: WeatherForm::new(today()),
            lookup,
            cursor: Cell::new(None),
        }
    }

    /// Run the application's main loop.
    pub async fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        info!("Using weather service at {}", self.api.base_url());

        while self.running {
            terminal.draw(|frame| {
                self.cursor.set(None);
                frame.render_widget(&self, frame.area());
                if let Some(position) = self.cursor.get() {
                    frame.set_cursor_position(position);
                }
            })?;
            match self.events.next().await? {
                Event::Tick => self.tick(),
                Event::Crossterm(event) => {
                    if let crossterm::event::Event::Key(key_event) = event {
                        self.handle_key_events(key_event)?
                    }
                }
                Event::App(app_event) => self.handle_app_event(app_event),
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    pub fn handle_key_events(&mut self, key_event: KeyEvent) -> color_eyre::Result<()> {
        if key_event.kind != KeyEventKind::Press {
            return Ok(());
        }

        if let Some(command) = self.keybindings.lookup(self.focus, &self.overlay, key_event) {
            debug!("Key {:?} -> {:?}", key_event.code, command);
            return command.execute(self);
        }

        if self.overlay.is_some() {
            return Ok(());
        }

        if let Some(request) = text_edit_request(key_event) {
            match self.focus {
                Focus::Form => self.form.edit(request),
                Focus::Lookup => self.lookup.edit(request),
                Focus::History => {}
            }
        }
        Ok(())
    }

    /// Applies the result of background work.
    pub fn handle_app_event(&mut self, app_event: AppEvent) {
        match app_event {
            AppEvent::SubmitFinished { request, result } => self.finish_submit(request, result),
            AppEvent::LookupFinished { id, result } => self.finish_lookup(id, result),
        }
    }

    /// Handles the tick event of the terminal.
    pub fn tick(&mut self) {
        self.lookup.sync();
    }

    /// Set running to false to quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn toggle_help(&mut self) {
        self.overlay = match self.overlay {
            Some(Overlay::Help) => None,
            _ => Some(Overlay::Help),
        };
    }

    pub fn cancel(&mut self) {
        if self.overlay.take().is_some() {
            return;
        }
        match self.focus {
            Focus::Form if !self.form.is_submitting() => self.form.status = SubmitStatus::Idle,
            Focus::Lookup if !self.lookup.is_loading() => self.lookup.status = LookupStatus::Idle,
            _ => {}
        }
    }

    /// Enter acts on the focused panel.
    pub fn confirm(&mut self) {
        match self.focus {
            Focus::Form => self.submit(),
            Focus::Lookup => self.start_lookup(),
            Focus::History => self.view_selected(),
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn shift_date(&mut self, days: i64) {
        self.form.shift_date(days, today());
    }

    pub fn reset_date(&mut self) {
        self.form.set_value(crate::form::FormField::Date, today().to_string());
    }

    /// Validates the form and sends it. Ignored while a submission is in flight.
    pub fn submit(&mut self) {
        if self.form.is_submitting() {
            return;
        }

        let request = match self.form.validate() {
            Ok(request) => request,
            Err(e) => {
                self.form.status = SubmitStatus::Failed(e.to_string());
                return;
            }
        };

        info!("Submitting weather request for {} on {}", request.location, request.date);
        self.form.status = SubmitStatus::Submitting;
        let api = self.api.clone();
        let sender = self.events.sender();
        tokio::spawn(async move {
            let result = api.submit(&request).await;
            sender.send(AppEvent::SubmitFinished { request, result });
        });
    }

    fn finish_submit(&mut self, request: WeatherRequest, result: Result<SubmitReceipt, ApiError>) {
        match result {
            Ok(receipt) => {
                info!("Weather request stored as {}", receipt.id);
                let item = HistoryItem::new(
                    receipt.id.clone(),
                    request.location,
                    request.date,
                    Some(request.notes),
                );
                match item {
                    Ok(item) => self.store.record(item),
                    Err(e) => warn!("Not recording {:?} in history: {}", receipt.id, e),
                }
                self.lookup.sync();
                self.form.status = SubmitStatus::Succeeded { id: receipt.id };
                self.form.reset(today());
            }
            Err(e) => {
                if e.is_transport() {
                    warn!("Weather service unreachable: {}", e);
                } else {
                    info!("Weather service rejected request: {}", e);
                }
                self.form.status = SubmitStatus::Failed(e.user_message().to_string());
            }
        }
    }

    /// Fetches the id typed in the lookup panel.
    pub fn start_lookup(&mut self) {
        let Some(id) = self.lookup.begin_lookup() else {
            return;
        };

        debug!("Looking up {}", id);
        let api = self.api.clone();
        let sender = self.events.sender();
        tokio::spawn(async move {
            let result = api.lookup(&id).await;
            sender.send(AppEvent::LookupFinished { id, result });
        });
    }

    fn finish_lookup(&mut self, id: String, result: Result<WeatherRecord, ApiError>) {
        let result = result.map_err(|e| {
            if !matches!(e, ApiError::NotFound(_)) {
                warn!("Lookup of {} failed: {}", id, e);
            }
            e.user_message().to_string()
        });
        if !self.lookup.finish_lookup(&id, result) {
            debug!("Dropped stale lookup result for {}", id);
        }
    }

    /// Loads the highlighted history entry into the lookup panel and fetches it.
    pub fn view_selected(&mut self) {
        if let Some(item) = self.lookup.selected_item() {
            self.lookup.set_input(&item.id);
            self.focus = Focus::Lookup;
            self.start_lookup();
        }
    }

    pub fn ask_clear_history(&mut self) {
        if self.lookup.history().is_empty() {
            self.overlay = Some(Overlay::Message("History is already empty.".to_string()));
        } else {
            self.overlay = Some(Overlay::ConfirmClear);
        }
    }

    pub fn clear_history(&mut self) {
        self.overlay = None;
        self.store.clear();
        self.lookup.sync();
        info!("History cleared");
    }

    /// The request id relevant to the focused panel.
    fn focused_id(&self) -> Option<String> {
        match self.focus {
            Focus::Form => match &self.form.status {
                SubmitStatus::Succeeded { id } => Some(id.clone()),
                _ => None,
            },
            Focus::Lookup => match &self.lookup.status {
                LookupStatus::Found(record) => Some(record.id.clone()),
                _ => None,
            },
            Focus::History => self.lookup.selected_item().map(|item| item.id),
        }
    }

    pub fn copy_id(&mut self) {
        let Some(id) = self.focused_id() else {
            return;
        };

        match arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(id.clone())) {
            Ok(()) => self.overlay = Some(Overlay::Message(format!("Copied {} to clipboard", id))),
            Err(e) => {
                warn!("Clipboard unavailable: {}", e);
                self.overlay = Some(Overlay::Error(format!("Could not copy to clipboard:\n{}", e)));
            }
        }
    }
}
