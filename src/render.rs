//! Turns job records into a front-end independent table view.
//!
//! Rendering is pure: `TableRenderer::render` builds the whole table from
//! scratch. Interactive elements carry an [`ActionId`]; what each one does is
//! looked up in the view's dispatch map, so no row state is captured by
//! handlers.

use reqwest::Url;
use std::collections::HashMap;

use crate::client::join_segments;
use crate::dates::DateFormatter;
use crate::models::{Field, JobRecord, Status};
use crate::schema::{ColumnKind, ColumnSchema, ColumnSpec};

pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_JOBS: &str = "No jobs found.";
pub const LOAD_FAILED_ROW: &str = "Error loading jobs. Is the backend server running?";
pub const LOAD_FAILED_CAPTION: &str = "Could not load jobs.";
pub const LOADING: &str = "Loading jobs...";
pub const SELECTOR_PLACEHOLDER: &str = "Change status";
const NO_REFERRER: &str = "noopener noreferrer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowAction {
    OpenDetail,
    OpenOrigin,
    MarkViewed,
    SetStatus(Status),
}

/// Identity of one interactive element in the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionId {
    pub filename: String,
    pub action: RowAction,
}

impl ActionId {
    pub fn new(filename: &str, action: RowAction) -> Self {
        Self {
            filename: filename.to_string(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionCommand {
    /// Open a page in a new viewing context.
    Open { url: String, no_referrer: bool },
    ChangeStatus { filename: String, status: Status },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub id: ActionId,
    pub label: &'static str,
    pub href: String,
    pub class: &'static str,
    pub rel: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSelector {
    pub placeholder: &'static str,
    pub options: Vec<(Status, ActionId)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionsCell {
    pub links: Vec<Link>,
    pub mark_viewed: Option<ActionId>,
    pub selector: StatusSelector,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text {
        text: String,
        class: Option<&'static str>,
    },
    Badge {
        class: String,
        label: String,
    },
    Actions(ActionsCell),
}

impl Cell {
    /// Plain-text rendering, used for the non-interactive list output.
    pub fn display_text(&self) -> String {
        match self {
            Cell::Text { text, .. } => text.clone(),
            Cell::Badge { label, .. } => label.clone(),
            Cell::Actions(actions) => {
                let mut parts: Vec<&str> = actions.links.iter().map(|l| l.label).collect();
                if actions.mark_viewed.is_some() {
                    parts.push("Viewed");
                }
                parts.join(" | ")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub filename: String,
    pub cells: Vec<Cell>,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<Row>),
    Placeholder {
        text: &'static str,
        colspan: usize,
        is_error: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub header: Vec<&'static str>,
    pub body: TableBody,
    pub caption: String,
    pub dispatch: HashMap<ActionId, ActionCommand>,
}

impl TableView {
    pub fn rows(&self) -> &[Row] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            TableBody::Placeholder { .. } => &[],
        }
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows().iter().filter(|r| !r.hidden)
    }

    /// Sets the `hidden` flag of the row for `filename`. Returns the previous
    /// value, or `None` if no such row is shown.
    pub fn set_hidden(&mut self, filename: &str, hidden: bool) -> Option<bool> {
        let TableBody::Rows(rows) = &mut self.body else {
            return None;
        };
        let row = rows.iter_mut().find(|r| r.filename == filename)?;
        Some(std::mem::replace(&mut row.hidden, hidden))
    }

    pub fn command(&self, id: &ActionId) -> Option<&ActionCommand> {
        self.dispatch.get(id)
    }
}

pub fn badge_class(status: Option<&str>) -> String {
    match status.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => format!("status-{}", s.to_lowercase()),
        None => "status-default".to_string(),
    }
}

pub struct TableRenderer {
    schema: ColumnSchema,
    dates: DateFormatter,
    site: Url,
}

impl TableRenderer {
    /// `site` is the backend origin that serves the detail pages.
    pub fn new(schema: ColumnSchema, dates: DateFormatter, site: Url) -> Self {
        Self {
            schema,
            dates,
            site,
        }
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    fn placeholder(&self, text: &'static str, caption: &str, is_error: bool) -> TableView {
        TableView {
            header: self.schema.header(),
            body: TableBody::Placeholder {
                text,
                colspan: self.schema.len(),
                is_error,
            },
            caption: caption.to_string(),
            dispatch: HashMap::new(),
        }
    }

    /// Header only, shown until the first fetch completes.
    pub fn loading(&self) -> TableView {
        self.placeholder(LOADING, "", false)
    }

    pub fn failed(&self) -> TableView {
        self.placeholder(LOAD_FAILED_ROW, LOAD_FAILED_CAPTION, true)
    }

    pub fn render(&self, jobs: &[JobRecord]) -> TableView {
        if jobs.is_empty() {
            return self.placeholder(NO_JOBS, "0 jobs found.", false);
        }

        let mut dispatch = HashMap::new();
        let rows = jobs
            .iter()
            .map(|job| Row {
                filename: job.filename.clone(),
                cells: self
                    .schema
                    .columns()
                    .iter()
                    .map(|col| self.cell(col, job, &mut dispatch))
                    .collect(),
                hidden: false,
            })
            .collect();

        TableView {
            header: self.schema.header(),
            body: TableBody::Rows(rows),
            caption: format!("{} job(s) found.", jobs.len()),
            dispatch,
        }
    }

    fn cell(
        &self,
        col: &ColumnSpec,
        job: &JobRecord,
        dispatch: &mut HashMap<ActionId, ActionCommand>,
    ) -> Cell {
        match col.kind {
            ColumnKind::StatusBadge => {
                let status = job.field(col.data_key.unwrap_or(Field::Status));
                Cell::Badge {
                    class: badge_class(status),
                    label: status.unwrap_or_default().to_string(),
                }
            }
            ColumnKind::Actions => Cell::Actions(self.actions(job, dispatch)),
            ColumnKind::Date => Cell::Text {
                text: self.dates.format(col.data_key.and_then(|k| job.field(k))),
                class: col.style_class,
            },
            ColumnKind::Plain => {
                let text = col
                    .data_key
                    .and_then(|k| job.field(k))
                    .filter(|v| !v.is_empty())
                    .unwrap_or(NOT_AVAILABLE);
                Cell::Text {
                    text: text.to_string(),
                    class: col.style_class,
                }
            }
        }
    }

    fn actions(
        &self,
        job: &JobRecord,
        dispatch: &mut HashMap<ActionId, ActionCommand>,
    ) -> ActionsCell {
        let filename = job.filename.as_str();
        let mut links = Vec::new();

        if let Some(detail) = join_segments(&self.site, &["jobs", filename]) {
            let id = ActionId::new(filename, RowAction::OpenDetail);
            dispatch.insert(
                id.clone(),
                ActionCommand::Open {
                    url: detail.to_string(),
                    no_referrer: false,
                },
            );
            links.push(Link {
                id,
                label: "View HTML",
                href: detail.to_string(),
                class: "action-btn btn-view",
                rel: None,
            });
        }

        if let Some(origin) = job.external_url() {
            let id = ActionId::new(filename, RowAction::OpenOrigin);
            dispatch.insert(
                id.clone(),
                ActionCommand::Open {
                    url: origin.to_string(),
                    no_referrer: true,
                },
            );
            links.push(Link {
                id,
                label: "Go to URL",
                href: origin.to_string(),
                class: "action-btn btn-url",
                rel: Some(NO_REFERRER),
            });
        }

        let mark_viewed = (job.status_kind() == Some(Status::New)).then(|| {
            let id = ActionId::new(filename, RowAction::MarkViewed);
            dispatch.insert(
                id.clone(),
                ActionCommand::ChangeStatus {
                    filename: filename.to_string(),
                    status: Status::Viewed,
                },
            );
            id
        });

        let options = Status::ALL
            .into_iter()
            .map(|status| {
                let id = ActionId::new(filename, RowAction::SetStatus(status));
                dispatch.insert(
                    id.clone(),
                    ActionCommand::ChangeStatus {
                        filename: filename.to_string(),
                        status,
                    },
                );
                (status, id)
            })
            .collect();

        ActionsCell {
            links,
            mark_viewed,
            selector: StatusSelector {
                placeholder: SELECTOR_PLACEHOLDER,
                options,
            },
        }
    }
}
