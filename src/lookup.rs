use crate::api::WeatherRecord;
use crate::history::{HistoryCursor, HistoryItem, HistoryList};
use crate::store::{HistoryStore, HistoryView};
use std::cell::Ref;
use tui_input::{Input, InputRequest};

/// State of the weather detail card.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LookupStatus {
    #[default]
    Idle,
    Loading(String),
    Found(WeatherRecord),
    Failed(String),
}

/// Looks up stored results by id and lists recent submissions.
#[derive(Debug)]
pub struct LookupPanel {
    input: Input,
    pub status: LookupStatus,
    cursor: HistoryCursor,
    history: HistoryView,
    selected: usize,
    seen_generation: u64,
}

impl LookupPanel {
    /// Mounts the panel's view of the history.
    pub fn new(store: &HistoryStore) -> Self {
        Self {
            input: Input::default(),
            status: LookupStatus::Idle,
            cursor: HistoryCursor::new(),
            history: store.mount(),
            selected: 0,
            seen_generation: 0,
        }
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn edit(&mut self, request: InputRequest) {
        self.input.handle(request);
        self.cursor.reset();
    }

    pub fn set_input(&mut self, id: &str) {
        self.input = Input::new(id.to_string());
    }

    pub fn history(&self) -> Ref<'_, HistoryList> {
        self.history.snapshot()
    }

    /// Index of the highlighted history entry, clamped to the current snapshot.
    pub fn selected(&self) -> usize {
        let len = self.history.snapshot().len();
        self.selected.min(len.saturating_sub(1))
    }

    pub fn selected_item(&self) -> Option<HistoryItem> {
        self.history.snapshot().items().get(self.selected()).cloned()
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected().saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let len = self.history.snapshot().len();
        if len > 0 {
            self.selected = (self.selected() + 1).min(len - 1);
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.history.snapshot().len().saturating_sub(1);
    }

    /// Reacts to a refreshed snapshot. Returns true when the history changed since
    /// the last call.
    pub fn sync(&mut self) -> bool {
        let generation = self.history.generation();
        if generation == self.seen_generation {
            return false;
        }
        self.seen_generation = generation;
        self.selected = self.selected();
        self.cursor.reset();
        true
    }

    /// Replaces the input with the next older id from history.
    pub fn recall_older(&mut self) {
        let snapshot = self.history.snapshot();
        if let Some(item) = self.cursor.older(&snapshot) {
            self.input = Input::new(item.id.clone());
        }
    }

    /// Replaces the input with the next newer id, or clears it when leaving history.
    pub fn recall_newer(&mut self) {
        if !self.cursor.is_navigating() {
            return;
        }
        let snapshot = self.history.snapshot();
        match self.cursor.newer(&snapshot) {
            Some(item) => self.input = Input::new(item.id.clone()),
            None => self.input.reset(),
        }
    }

    /// Marks a lookup as started. Returns the id to fetch, or None when the input is blank.
    pub fn begin_lookup(&mut self) -> Option<String> {
        let id = self.input.value().trim().to_string();
        if id.is_empty() {
            self.status = LookupStatus::Failed("Please enter a request ID.".to_string());
            return None;
        }
        self.status = LookupStatus::Loading(id.clone());
        Some(id)
    }

    /// Applies a finished lookup. Results for anything but the pending id are dropped.
    pub fn finish_lookup(&mut self, id: &str, result: Result<WeatherRecord, String>) -> bool {
        match &self.status {
            LookupStatus::Loading(pending) if pending == id => {}
            _ => return false,
        }

        self.status = match result {
            Ok(record) => LookupStatus::Found(record),
            Err(message) => LookupStatus::Failed(message),
        };
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, LookupStatus::Loading(_))
    }
}
