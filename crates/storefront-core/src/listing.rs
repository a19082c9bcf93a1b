//! # Listing
//!
//! The list/table composition shared by every admin list view (products,
//! orders, payouts, users, ...).
//!
//! ## URL Is the Source of Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /admin/orders?page=3&search=mug&status=pending                         │
//! │        │                           ▲                                    │
//! │        │ from_query_string         │ to_query_string                    │
//! │        ▼                           │                                    │
//! │  ViewState { page: 3, search: Some("mug"),                              │
//! │              filters: { "status": "pending" } }                         │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  GET /orders?… ──► Page<Order> { data, page, totalPages }               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ListView::rows(…) ──► 6 × Skeleton while loading, else Row(render(o))  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Back/forward navigation and shared links reproduce the exact list state
//! because nothing about the list lives outside the query string.
//!
//! ## Wire Contract
//! - Filter values are plain strings mapped 1:1 to query parameters
//! - Removing a filter deletes its key; it is never sent as `param=`
//! - `page` is omitted when it is 1; `search` is omitted when empty

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;
use url::form_urlencoded;

use crate::error::ValidationError;
use crate::validation::validate_search_query;
use crate::SKELETON_ROWS;

pub const PAGE_PARAM: &str = "page";
pub const SEARCH_PARAM: &str = "search";

// =============================================================================
// Page
// =============================================================================

/// One page of a list endpoint's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub page: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// =============================================================================
// Filters
// =============================================================================

/// One selectable value of a filter dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        FilterOption {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A filter dropdown: its label, the query parameter it drives, and its
/// options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FilterDescriptor {
    pub name: String,
    pub param: String,
    pub data: Vec<FilterOption>,
}

impl FilterDescriptor {
    pub fn new(name: impl Into<String>, param: impl Into<String>, data: Vec<FilterOption>) -> Self {
        FilterDescriptor {
            name: name.into(),
            param: param.into(),
            data,
        }
    }

    /// The option currently selected in `state`, if its value is known.
    pub fn selected<'a>(&'a self, state: &ViewState) -> Option<&'a FilterOption> {
        let value = state.filter(&self.param)?;
        self.data.iter().find(|o| o.value == value)
    }
}

// =============================================================================
// View State
// =============================================================================

/// Everything that determines which rows a list shows.
///
/// Always normalized: `page ≥ 1`, `search` trimmed and non-empty, filter
/// values non-empty. Normalized states round-trip through
/// [`ViewState::to_query_string`] / [`ViewState::from_query_string`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ViewState {
    page: u32,
    search: Option<String>,
    filters: BTreeMap<String, String>,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            page: 1,
            search: None,
            filters: BTreeMap::new(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        ViewState::default()
    }

    /// Parses a URL query string, with or without the leading `?`.
    ///
    /// Lenient: unparseable or zero pages become 1, empty values are
    /// dropped, an over-long search is dropped, and the last occurrence of a
    /// repeated key wins.
    pub fn from_query_string(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut state = ViewState::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.trim();
            match key.as_ref() {
                PAGE_PARAM => state.page = value.parse().ok().filter(|p| *p >= 1).unwrap_or(1),
                SEARCH_PARAM => state.search = validate_search_query(value).ok().flatten(),
                param => {
                    if value.is_empty() {
                        state.filters.remove(param);
                    } else {
                        state.filters.insert(param.to_string(), value.to_string());
                    }
                }
            }
        }

        state
    }

    /// Renders the query string (without `?`). Empty for the default state.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if self.page > 1 {
            serializer.append_pair(PAGE_PARAM, &self.page.to_string());
        }
        if let Some(search) = &self.search {
            serializer.append_pair(SEARCH_PARAM, search);
        }
        for (param, value) in &self.filters {
            serializer.append_pair(param, value);
        }
        serializer.finish()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn filter(&self, param: &str) -> Option<&str> {
        self.filters.get(param).map(String::as_str)
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Moves to a page. Page 0 is treated as page 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Keeps the page inside `1..=total_pages` after a result shrinks.
    pub fn clamp_page(&mut self, total_pages: u32) {
        self.page = self.page.min(total_pages.max(1));
    }

    /// Sets the search text and returns to page 1. Blank text clears it.
    pub fn set_search(&mut self, search: &str) -> Result<(), ValidationError> {
        self.search = validate_search_query(search)?;
        self.page = 1;
        Ok(())
    }

    /// Sets a filter and returns to page 1. A blank value removes the
    /// filter.
    pub fn set_filter(&mut self, param: &str, value: &str) -> Result<(), ValidationError> {
        if param == PAGE_PARAM || param == SEARCH_PARAM || param.trim().is_empty() {
            return Err(ValidationError::InvalidFormat {
                field: "filter".to_string(),
                reason: format!("'{}' cannot be used as a filter parameter", param),
            });
        }

        let value = value.trim();
        if value.is_empty() {
            self.filters.remove(param);
        } else {
            self.filters.insert(param.to_string(), value.to_string());
        }
        self.page = 1;
        Ok(())
    }

    /// Removes a filter's key entirely and returns to page 1.
    pub fn clear_filter(&mut self, param: &str) {
        if self.filters.remove(param).is_some() {
            self.page = 1;
        }
    }

    /// Clears search and every filter.
    pub fn clear_all(&mut self) {
        *self = ViewState::default();
    }
}

// =============================================================================
// List View
// =============================================================================

/// Turns one row of data into whatever the page draws for it.
///
/// Any `Fn(&T) -> Out` closure is a renderer.
pub trait RowRenderer<T> {
    type Row;

    fn render(&self, row: &T) -> Self::Row;
}

impl<T, Out, F> RowRenderer<T> for F
where
    F: Fn(&T) -> Out,
{
    type Row = Out;

    fn render(&self, row: &T) -> Out {
        self(row)
    }
}

/// What a table body cell slot holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSlot<R> {
    /// Placeholder drawn while the query is in flight.
    Skeleton,
    Row(R),
}

/// A list/table: row renderer plus filter descriptors.
pub struct ListView<R> {
    renderer: R,
    filters: Vec<FilterDescriptor>,
    skeleton_rows: usize,
}

impl<R> ListView<R> {
    pub fn new(renderer: R) -> Self {
        ListView {
            renderer,
            filters: Vec::new(),
            skeleton_rows: SKELETON_ROWS,
        }
    }

    pub fn with_filters(mut self, filters: Vec<FilterDescriptor>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_skeleton_rows(mut self, rows: usize) -> Self {
        self.skeleton_rows = rows;
        self
    }

    pub fn filters(&self) -> &[FilterDescriptor] {
        &self.filters
    }

    /// Body rows for the current result.
    ///
    /// While `loading`, or before any result exists, the body is a fixed
    /// number of skeleton rows.
    pub fn rows<T>(
        &self,
        result: Option<&Page<T>>,
        loading: bool,
    ) -> Vec<RowSlot<<R as RowRenderer<T>>::Row>>
    where
        R: RowRenderer<T>,
    {
        match result {
            Some(page) if !loading => page
                .data
                .iter()
                .map(|row| RowSlot::Row(self.renderer.render(row)))
                .collect(),
            _ => (0..self.skeleton_rows).map(|_| RowSlot::Skeleton).collect(),
        }
    }

    /// Filters with a selected option, for the "active filter" chips.
    pub fn active_filters<'a>(
        &'a self,
        state: &ViewState,
    ) -> Vec<(&'a FilterDescriptor, &'a FilterOption)> {
        self.filters
            .iter()
            .filter_map(|descriptor| descriptor.selected(state).map(|o| (descriptor, o)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_filter() -> FilterDescriptor {
        FilterDescriptor::new(
            "Status",
            "status",
            vec![
                FilterOption::new("Pending", "pending"),
                FilterOption::new("Delivered", "delivered"),
            ],
        )
    }

    #[test]
    fn test_parse_query_string() {
        let state = ViewState::from_query_string("?page=3&search=blue+mug&status=pending&vendor=");

        assert_eq!(state.page(), 3);
        assert_eq!(state.search(), Some("blue mug"));
        assert_eq!(state.filter("status"), Some("pending"));
        assert_eq!(state.filter("vendor"), None);
    }

    #[test]
    fn test_parse_is_lenient() {
        let state = ViewState::from_query_string("page=zero&search=%20%20&a=1&a=2");
        assert_eq!(state.page(), 1);
        assert_eq!(state.search(), None);
        assert_eq!(state.filter("a"), Some("2"));

        assert_eq!(ViewState::from_query_string("page=0").page(), 1);
        assert_eq!(ViewState::from_query_string(""), ViewState::default());
    }

    #[test]
    fn test_render_query_string() {
        let mut state = ViewState::new();
        assert_eq!(state.to_query_string(), "");

        state.set_filter("status", "pending").unwrap();
        state.set_search("café & co").unwrap();
        state.set_page(2);

        assert_eq!(
            state.to_query_string(),
            "page=2&search=caf%C3%A9+%26+co&status=pending"
        );
        assert_eq!(ViewState::from_query_string(&state.to_query_string()), state);
    }

    #[test]
    fn test_removing_filter_deletes_key() {
        let mut state = ViewState::from_query_string("status=pending&category=mugs");

        state.clear_filter("status");
        assert_eq!(state.to_query_string(), "category=mugs");

        state.set_filter("category", "  ").unwrap();
        assert_eq!(state.to_query_string(), "");
    }

    #[test]
    fn test_changes_reset_page() {
        let mut state = ViewState::from_query_string("page=4");
        state.set_search("mug").unwrap();
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.set_filter("status", "pending").unwrap();
        assert_eq!(state.page(), 1);

        state.set_page(4);
        state.clear_filter("missing");
        assert_eq!(state.page(), 4);
    }

    #[test]
    fn test_reserved_filter_params() {
        let mut state = ViewState::new();
        assert!(state.set_filter("page", "2").is_err());
        assert!(state.set_filter("search", "x").is_err());
        assert!(state.filters().is_empty());
    }

    #[test]
    fn test_clamp_page() {
        let mut state = ViewState::from_query_string("page=9");
        state.clamp_page(3);
        assert_eq!(state.page(), 3);
        state.clamp_page(0);
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_rows_skeleton_while_loading() {
        let view = ListView::new(|name: &String| name.to_uppercase());
        let page = Page {
            data: vec!["mug".to_string(), "tee".to_string()],
            page: 1,
            total_pages: 1,
        };

        let loading = view.rows(Some(&page), true);
        assert_eq!(loading.len(), SKELETON_ROWS);
        assert!(loading.iter().all(|r| *r == RowSlot::Skeleton));
        assert_eq!(view.rows::<String>(None, false).len(), SKELETON_ROWS);

        assert_eq!(
            view.rows(Some(&page), false),
            vec![RowSlot::Row("MUG".to_string()), RowSlot::Row("TEE".to_string())]
        );
    }

    #[test]
    fn test_active_filters() {
        let view = ListView::new(|n: &u32| *n).with_filters(vec![status_filter()]);
        let state = ViewState::from_query_string("status=delivered&unknown=x");

        let active = view.active_filters(&state);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].1.label, "Delivered");

        let state = ViewState::from_query_string("status=lost");
        assert!(view.active_filters(&state).is_empty());
    }

    #[test]
    fn test_page_navigation_flags() {
        let page: Page<u8> = serde_json::from_str(r#"{"data":[],"page":2,"totalPages":3}"#).unwrap();
        assert!(page.has_previous());
        assert!(page.has_next());
        assert!(page.is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Any state built through the setters survives a trip through
            /// its query string.
            #[test]
            fn view_state_round_trips(
                page in 1u32..500,
                search in "[a-zA-Z0-9 &=%+?]{0,20}",
                filters in prop::collection::btree_map("[a-z]{1,8}", "[a-zA-Z0-9 &=/]{0,12}", 0..5)
            ) {
                let mut state = ViewState::new();
                for (param, value) in &filters {
                    if param != PAGE_PARAM && param != SEARCH_PARAM {
                        state.set_filter(param, value).unwrap();
                    }
                }
                state.set_search(&search).unwrap();
                state.set_page(page);

                let parsed = ViewState::from_query_string(&state.to_query_string());
                prop_assert_eq!(parsed, state);
            }
        }
    }
}
