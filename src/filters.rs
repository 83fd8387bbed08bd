use std::collections::BTreeSet;

use crate::models::Status;

/// Sentinel filter value meaning "no constraint". Never sent to the backend.
pub const ALL: &str = "all";

/// A flag that is consumed by the first read after it was raised.
#[derive(Debug, Default)]
pub struct OneShot(bool);

impl OneShot {
    pub fn set(&mut self) {
        self.0 = true;
    }

    pub fn is_set(&self) -> bool {
        self.0
    }

    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<StatusFilter> {
        if s.trim().is_empty() || s.trim().eq_ignore_ascii_case(ALL) {
            return Some(StatusFilter::All);
        }
        Status::parse(s).map(StatusFilter::Only)
    }

    /// Whether a record in `status` still belongs in a list filtered by `self`.
    pub fn admits(&self, status: Status) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(s) => *s == status,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusFilter::All => ALL,
            StatusFilter::Only(s) => s.as_str(),
        }
    }

    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(Status::ALL[0]),
            StatusFilter::Only(s) => match Status::ALL.iter().position(|x| *x == s) {
                Some(i) if i + 1 < Status::ALL.len() => StatusFilter::Only(Status::ALL[i + 1]),
                _ => StatusFilter::All,
            },
        }
    }

    pub fn prev(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Only(Status::ALL[Status::ALL.len() - 1]),
            StatusFilter::Only(s) => match Status::ALL.iter().position(|x| *x == s) {
                Some(i) if i > 0 => StatusFilter::Only(Status::ALL[i - 1]),
                _ => StatusFilter::All,
            },
        }
    }
}

/// Values picked in a multi-select control. Empty, or containing `ALL`,
/// means the control does not constrain the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiSelect {
    selected: BTreeSet<String>,
}

impl MultiSelect {
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selected: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.selected.is_empty() || self.selected.contains(ALL)
    }

    pub fn contains(&self, value: &str) -> bool {
        self.selected.contains(value)
    }

    /// Toggling `ALL` clears the selection; toggling anything else drops `ALL`.
    pub fn toggle(&mut self, value: &str) {
        if value == ALL {
            self.selected.clear();
            return;
        }
        self.selected.remove(ALL);
        if !self.selected.remove(value) {
            self.selected.insert(value.to_string());
        }
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    pub fn summary(&self) -> String {
        if self.is_unconstrained() {
            ALL.to_string()
        } else {
            self.values().collect::<Vec<_>>().join(",")
        }
    }
}

/// Current value of every filter control. Owned by the controller.
#[derive(Debug, Default)]
pub struct FilterState {
    pub status: StatusFilter,
    pub german: MultiSelect,
    pub seniority: MultiSelect,
    pub days_since_saved: Option<u32>,
    pub query: String,
    force_cache_refresh: OneShot,
}

impl FilterState {
    pub fn request_cache_refresh(&mut self) {
        self.force_cache_refresh.set();
    }

    pub fn cache_refresh_pending(&self) -> bool {
        self.force_cache_refresh.is_set()
    }

    /// Copies the filters for one fetch and consumes the cache-refresh flag.
    pub fn take_snapshot(&mut self) -> FilterSnapshot {
        FilterSnapshot {
            status: self.status,
            german: self.german.clone(),
            seniority: self.seniority.clone(),
            days_since_saved: self.days_since_saved,
            query: self.query.clone(),
            refcache: self.force_cache_refresh.take(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSnapshot {
    pub status: StatusFilter,
    pub german: MultiSelect,
    pub seniority: MultiSelect,
    pub days_since_saved: Option<u32>,
    pub query: String,
    pub refcache: bool,
}

/// Maps a filter snapshot to `/api/jobs` query parameters.
pub fn build_query(filters: &FilterSnapshot) -> Vec<(&'static str, String)> {
    let mut params = Vec::new();

    if let StatusFilter::Only(status) = filters.status {
        params.push(("status", status.as_str().to_string()));
    }
    if !filters.german.is_unconstrained() {
        params.extend(filters.german.values().map(|v| ("german", v.to_string())));
    }
    if !filters.seniority.is_unconstrained() {
        params.extend(filters.seniority.values().map(|v| ("seniority", v.to_string())));
    }
    if !filters.query.is_empty() {
        params.push(("q", filters.query.clone()));
    }
    if let Some(days) = filters.days_since_saved.filter(|d| *d > 0) {
        params.push(("days", days.to_string()));
    }
    if filters.refcache {
        params.push(("refcache", "true".to_string()));
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn as_set(params: &[(&'static str, String)]) -> HashSet<(String, String)> {
        params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_default_filters_emit_nothing() {
        let mut state = FilterState::default();
        assert!(build_query(&state.take_snapshot()).is_empty());
    }

    #[test]
    fn test_sentinels_emit_nothing() {
        let mut state = FilterState {
            status: StatusFilter::parse("all").unwrap(),
            german: MultiSelect::from_values(["all"]),
            seniority: MultiSelect::from_values(["all", "senior"]),
            ..Default::default()
        };
        assert!(build_query(&state.take_snapshot()).is_empty());
    }

    #[test]
    fn test_concrete_scenario() {
        let mut state = FilterState {
            status: StatusFilter::Only(Status::New),
            german: MultiSelect::from_values(["yes"]),
            seniority: MultiSelect::from_values(["all"]),
            query: "backend".to_string(),
            ..Default::default()
        };
        let params = build_query(&state.take_snapshot());

        let expected: HashSet<(String, String)> = [
            ("status".to_string(), "new".to_string()),
            ("german".to_string(), "yes".to_string()),
            ("q".to_string(), "backend".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(as_set(&params), expected);
        assert_eq!(params.len(), 3);
        assert!(!params.iter().any(|(k, _)| matches!(*k, "days" | "seniority" | "refcache")));
    }

    #[test]
    fn test_multi_values_repeat_once_each() {
        let snapshot = FilterSnapshot {
            german: MultiSelect::from_values(["no", "yes", "no"]),
            seniority: MultiSelect::from_values(["junior", "senior"]),
            ..Default::default()
        };
        let params = build_query(&snapshot);

        let german: Vec<_> = params.iter().filter(|(k, _)| *k == "german").collect();
        assert_eq!(german.len(), 2);
        let seniority: HashSet<_> = params
            .iter()
            .filter(|(k, _)| *k == "seniority")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(seniority, HashSet::from(["junior", "senior"]));
    }

    #[test]
    fn test_days_zero_and_empty_query_excluded() {
        let snapshot = FilterSnapshot {
            days_since_saved: Some(0),
            query: String::new(),
            ..Default::default()
        };
        assert!(build_query(&snapshot).is_empty());

        let snapshot = FilterSnapshot {
            days_since_saved: Some(7),
            query: " ".to_string(),
            ..Default::default()
        };
        let params = build_query(&snapshot);
        assert!(params.contains(&("days", "7".to_string())));
        assert!(params.contains(&("q", " ".to_string())));
    }

    #[test]
    fn test_refcache_is_one_shot() {
        let mut state = FilterState::default();
        state.request_cache_refresh();
        assert!(state.cache_refresh_pending());

        let first = build_query(&state.take_snapshot());
        assert!(first.contains(&("refcache", "true".to_string())));
        assert!(!state.cache_refresh_pending());

        let second = build_query(&state.take_snapshot());
        assert!(!second.iter().any(|(k, _)| *k == "refcache"));
    }

    #[test]
    fn test_build_query_is_pure() {
        let snapshot = FilterSnapshot {
            status: StatusFilter::Only(Status::Applied),
            refcache: true,
            ..Default::default()
        };
        assert_eq!(build_query(&snapshot), build_query(&snapshot));
    }

    #[test]
    fn test_toggle_all_clears_selection() {
        let mut select = MultiSelect::default();
        select.toggle("yes");
        select.toggle("no");
        assert_eq!(select.summary(), "no,yes");

        select.toggle("yes");
        assert_eq!(select.summary(), "no");

        select.toggle(ALL);
        assert!(select.is_unconstrained());
        assert_eq!(select.summary(), "all");
    }

    #[test]
    fn test_status_filter_cycles_through_all() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..=Status::ALL.len() {
            filter = filter.next();
            seen.push(filter);
        }
        assert_eq!(seen.last(), Some(&StatusFilter::All));
        assert_eq!(StatusFilter::All.prev().next(), StatusFilter::All);
        assert_eq!(StatusFilter::Only(Status::Viewed).prev(), StatusFilter::All);
    }

    #[test]
    fn test_status_filter_admits() {
        assert!(StatusFilter::All.admits(Status::Archived));
        assert!(StatusFilter::Only(Status::New).admits(Status::New));
        assert!(!StatusFilter::Only(Status::New).admits(Status::Viewed));
        assert_eq!(StatusFilter::parse("bogus"), None);
        assert_eq!(StatusFilter::parse(""), Some(StatusFilter::All));
    }
}
