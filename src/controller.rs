use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::error::{FetchError, UpdateError};
use crate::filters::{build_query, FilterState, StatusFilter};
use crate::models::{JobRecord, Status};
use crate::render::{ActionCommand, ActionId, TableRenderer, TableView};

pub const UPDATE_FAILED_ALERT: &str = "Could not update job status.";

/// A change of one filter control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    SetStatusFilter(StatusFilter),
    ToggleGerman(String),
    ToggleSeniority(String),
    SetDays(Option<u32>),
    /// Search text edited; fetched after the debounce delay.
    SetQuery(String),
    RefreshCache,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub filename: String,
    pub status: Status,
    /// The row was hidden optimistically when the change was issued.
    pub hid_row: bool,
}

/// Work the front end must carry out on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Fetch(FetchTicket),
    UpdateStatus(StatusChange),
    Open { url: String, no_referrer: bool },
}

/// Trailing-edge debounce: only the last schedule within the delay fires.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true once per schedule, when `now` has reached the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(at) if at <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerOptions {
    pub debounce: Duration,
    /// Ignore a list response when a newer one has already been shown.
    pub drop_stale_responses: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            drop_stale_responses: true,
        }
    }
}

pub struct Controller {
    api: ApiClient,
    renderer: TableRenderer,
    filters: FilterState,
    debounce: Debounce,
    drop_stale: bool,
    view: TableView,
    records: Vec<JobRecord>,
    next_seq: u64,
    applied_seq: u64,
    in_flight: usize,
    alert: Option<String>,
}

impl Controller {
    pub fn new(api: ApiClient, renderer: TableRenderer, options: ControllerOptions) -> Self {
        let view = renderer.loading();
        Self {
            api,
            renderer,
            filters: FilterState::default(),
            debounce: Debounce::new(options.debounce),
            drop_stale: options.drop_stale_responses,
            view,
            records: Vec::new(),
            next_seq: 0,
            applied_seq: 0,
            in_flight: 0,
            alert: None,
        }
    }

    /// Initial load with default filters.
    pub fn start(&mut self) -> Vec<Effect> {
        self.fetch().into_iter().collect()
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn view(&self) -> &TableView {
        &self.view
    }

    pub fn record(&self, filename: &str) -> Option<&JobRecord> {
        self.records.iter().find(|r| r.filename == filename)
    }

    pub fn loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn show_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn handle(&mut self, input: Input, now: Instant) -> Vec<Effect> {
        match input {
            Input::SetStatusFilter(status) => self.filters.status = status,
            Input::ToggleGerman(value) => self.filters.german.toggle(&value),
            Input::ToggleSeniority(value) => self.filters.seniority.toggle(&value),
            Input::SetDays(days) => self.filters.days_since_saved = days,
            Input::SetQuery(query) => {
                self.filters.query = query;
                self.debounce.schedule(now);
                return Vec::new();
            }
            Input::RefreshCache => self.filters.request_cache_refresh(),
        }
        self.fetch().into_iter().collect()
    }

    /// Fires the debounced search fetch once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> Vec<Effect> {
        if self.debounce.fire(now) {
            return self.fetch().into_iter().collect();
        }
        Vec::new()
    }

    fn fetch(&mut self) -> Option<Effect> {
        let snapshot = self.filters.take_snapshot();
        let params = build_query(&snapshot);
        let url = match self.api.jobs_url(&params) {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "could not build job list URL");
                self.show_failure();
                return None;
            }
        };

        self.next_seq += 1;
        self.in_flight += 1;
        info!(seq = self.next_seq, %url, "fetching job list");
        Some(Effect::Fetch(FetchTicket {
            seq: self.next_seq,
            url: url.to_string(),
        }))
    }

    fn show_failure(&mut self) {
        self.records.clear();
        self.view = self.renderer.failed();
    }

    /// Applies a list response. Returns false when it was discarded as stale.
    pub fn on_fetch_result(&mut self, seq: u64, result: Result<Vec<JobRecord>, FetchError>) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);

        if self.drop_stale && seq < self.applied_seq {
            debug!(seq, applied = self.applied_seq, "discarding stale job list response");
            return false;
        }
        self.applied_seq = self.applied_seq.max(seq);

        match result {
            Ok(records) => {
                info!(seq, count = records.len(), "job list loaded");
                self.view = self.renderer.render(&records);
                self.records = records;
            }
            Err(e) => {
                warn!(seq, status = ?e.status(), error = %e, "failed to fetch jobs");
                self.show_failure();
            }
        }
        true
    }

    /// Runs the command behind an interactive table element.
    pub fn trigger(&mut self, id: &ActionId) -> Vec<Effect> {
        let Some(command) = self.view.command(id).cloned() else {
            debug!(?id, "no handler for action");
            return Vec::new();
        };
        match command {
            ActionCommand::Open { url, no_referrer } => vec![Effect::Open { url, no_referrer }],
            ActionCommand::ChangeStatus { filename, status } => {
                vec![self.change_status(&filename, status)]
            }
        }
    }

    /// Hides the row right away if it would drop out of the current status
    /// filter, then asks for the update.
    pub fn change_status(&mut self, filename: &str, status: Status) -> Effect {
        let hid_row = !self.filters.status.admits(status)
            && self.view.set_hidden(filename, true) == Some(false);
        info!(filename, %status, hid_row, "changing job status");
        Effect::UpdateStatus(StatusChange {
            filename: filename.to_string(),
            status,
            hid_row,
        })
    }

    /// On success the whole list is refreshed; on failure the user is alerted
    /// and an optimistic hide is undone.
    pub fn on_update_result(
        &mut self,
        change: &StatusChange,
        result: Result<(), UpdateError>,
    ) -> Vec<Effect> {
        match result {
            Ok(()) => self.fetch().into_iter().collect(),
            Err(e) => {
                warn!(filename = %change.filename, error = %e, "error updating status");
                if change.hid_row {
                    self.view.set_hidden(&change.filename, false);
                }
                self.show_alert(UPDATE_FAILED_ALERT);
                Vec::new()
            }
        }
    }
}
