//! Browsing session state
//!
//! A [`Session`] is the single owner of the client's view state: which view is
//! showing, the selected review, the filters and list results, the stats
//! banner, the submission draft and pending user notices. Every transition
//! goes through a method on it; nothing is shared or global.
//!
//! List fetches are split into [`Session::begin_list_fetch`] and
//! [`Session::apply_list_result`] so a caller may have several requests in
//! flight. Each request carries a generation number and only the newest one
//! is applied; responses to superseded requests are dropped.

use std::collections::VecDeque;

use nclex_common::models::{Comment, Created, NewComment, Review, ReviewPage, Stats};
use nclex_common::{FilterState, ReviewQuery};
use tracing::{debug, error, info, warn};

use crate::{ClientError, ReviewApi, ReviewDraft, SubmitError};

/// Top-level views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Home,
    Detail,
    Write,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// User-facing message raised by a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

/// An issued list request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListTicket {
    generation: u64,
    /// Query to send, built from the filters at issue time
    pub query: ReviewQuery,
}

impl ListTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// An issued detail request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    pub id: String,
}

/// What the home list area should render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView<'a> {
    Loading,
    Results(&'a [Review]),
    /// Finished with no matches; offer a reset to default filters
    Empty,
}

/// View state of one browsing session
#[derive(Debug, Clone)]
pub struct Session {
    view: ViewState,
    selected_id: Option<String>,
    selected: Option<Review>,
    comments: Vec<Comment>,
    filters: FilterState,
    reviews: Vec<Review>,
    total: i64,
    loading: bool,
    generation: u64,
    stats: Stats,
    draft: ReviewDraft,
    notices: VecDeque<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start on the home view with default filters, before the first fetch
    pub fn new() -> Self {
        Self {
            view: ViewState::Home,
            selected_id: None,
            selected: None,
            comments: Vec::new(),
            filters: FilterState::default(),
            reviews: Vec::new(),
            total: 0,
            loading: true,
            generation: 0,
            stats: Stats::default(),
            draft: ReviewDraft::default(),
            notices: VecDeque::new(),
        }
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected_id.as_deref()
    }

    /// Selected review, once its fetch has resolved
    pub fn selected_review(&self) -> Option<&Review> {
        self.selected.as_ref()
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// Total matches reported by the last applied list response
    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn draft(&self) -> &ReviewDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut ReviewDraft {
        &mut self.draft
    }

    /// Drain pending notices, oldest first
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    pub fn list_view(&self) -> ListView<'_> {
        if self.loading {
            ListView::Loading
        } else if self.reviews.is_empty() {
            ListView::Empty
        } else {
            ListView::Results(&self.reviews)
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Switch views
    ///
    /// Entering home clears the selection and issues a list fetch.
    pub fn navigate(&mut self, view: ViewState) -> Option<ListTicket> {
        debug!(from = ?self.view, to = ?view, "Navigate");
        self.view = view;

        if view == ViewState::Home {
            self.selected_id = None;
            self.selected = None;
            self.comments.clear();
            Some(self.begin_list_fetch())
        } else {
            None
        }
    }

    /// Open the write form; no fetch
    pub fn open_write(&mut self) {
        self.navigate(ViewState::Write);
    }

    /// Navigate home and refresh the list and stats
    pub async fn go_home<A: ReviewApi + ?Sized>(&mut self, api: &A) {
        if let Some(ticket) = self.navigate(ViewState::Home) {
            self.run_list_fetch(api, ticket).await;
        }
        self.load_stats(api).await;
    }

    // -------------------------------------------------------------------------
    // Filters and list
    // -------------------------------------------------------------------------

    /// Replace the filters
    ///
    /// Returns a list request when the filters changed while on the home view.
    pub fn set_filters(&mut self, filters: FilterState) -> Option<ListTicket> {
        if filters == self.filters {
            return None;
        }
        self.filters = filters;

        if self.view == ViewState::Home {
            Some(self.begin_list_fetch())
        } else {
            None
        }
    }

    /// Edit the filters in place, see [`Session::set_filters`]
    pub fn update_filters(&mut self, edit: impl FnOnce(&mut FilterState)) -> Option<ListTicket> {
        let mut filters = self.filters.clone();
        edit(&mut filters);
        self.set_filters(filters)
    }

    /// Restore `{search: "", isWorking: "all", englishLevel: "all", resource: "all"}`
    pub fn reset_filters(&mut self) -> Option<ListTicket> {
        self.set_filters(FilterState::default())
    }

    /// Issue a list request for the current filters and show the loading state
    pub fn begin_list_fetch(&mut self) -> ListTicket {
        self.generation += 1;
        self.loading = true;
        ListTicket {
            generation: self.generation,
            query: self.filters.build_query(),
        }
    }

    /// Apply the outcome of a list request
    ///
    /// Returns false when the ticket was superseded and the result dropped.
    /// A failed fetch is logged and leaves the previous results in place.
    pub fn apply_list_result(
        &mut self,
        ticket: ListTicket,
        result: Result<ReviewPage<Review>, ClientError>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                latest = self.generation,
                "Dropping superseded list response"
            );
            return false;
        }

        self.loading = false;
        match result {
            Ok(page) => {
                debug!(total = page.total, returned = page.reviews.len(), "List loaded");
                self.reviews = page.reviews;
                self.total = page.total;
            }
            Err(e) => {
                error!("Failed to load reviews: {}", e);
            }
        }
        true
    }

    /// Send a list request and apply its result
    pub async fn run_list_fetch<A: ReviewApi + ?Sized>(&mut self, api: &A, ticket: ListTicket) -> bool {
        let result = api.fetch_reviews(&ticket.query).await;
        self.apply_list_result(ticket, result)
    }

    /// Re-fetch the list for the current filters
    pub async fn refresh<A: ReviewApi + ?Sized>(&mut self, api: &A) -> bool {
        let ticket = self.begin_list_fetch();
        self.run_list_fetch(api, ticket).await
    }

    /// Refresh the stats banner; failures keep the previous values
    pub async fn load_stats<A: ReviewApi + ?Sized>(&mut self, api: &A) {
        match api.fetch_stats().await {
            Ok(stats) => self.stats = stats,
            Err(e) => warn!("Failed to fetch stats: {}", e),
        }
    }

    // -------------------------------------------------------------------------
    // Detail
    // -------------------------------------------------------------------------

    /// Select a review and switch to the detail view immediately
    ///
    /// The record itself arrives through [`Session::apply_detail_result`].
    pub fn begin_select(&mut self, id: &str) -> DetailTicket {
        self.selected_id = Some(id.to_string());
        self.selected = None;
        self.comments.clear();
        self.view = ViewState::Detail;
        DetailTicket { id: id.to_string() }
    }

    /// Apply a detail fetch; ignored when the selection has moved on
    pub fn apply_detail_result(
        &mut self,
        ticket: DetailTicket,
        result: Result<Review, ClientError>,
    ) -> bool {
        if self.view != ViewState::Detail || self.selected_id.as_deref() != Some(&ticket.id) {
            debug!(review_id = %ticket.id, "Dropping detail response for stale selection");
            return false;
        }

        match result {
            Ok(review) => {
                self.selected = Some(review);
                true
            }
            Err(e) => {
                error!(review_id = %ticket.id, "Failed to load review: {}", e);
                false
            }
        }
    }

    /// Select a review, fetch it and its comments
    pub async fn select_review<A: ReviewApi + ?Sized>(&mut self, api: &A, id: &str) -> bool {
        let ticket = self.begin_select(id);
        let result = api.fetch_review(id).await;
        if !self.apply_detail_result(ticket, result) {
            return false;
        }
        self.load_comments(api).await;
        true
    }

    /// Reload comments for the selected review
    pub async fn load_comments<A: ReviewApi + ?Sized>(&mut self, api: &A) {
        let Some(id) = self.selected_id.clone() else {
            return;
        };
        match api.fetch_comments(&id).await {
            Ok(comments) => self.comments = comments,
            Err(e) => warn!(review_id = %id, "Failed to load comments: {}", e),
        }
    }

    /// Like the selected review, returning the new count
    ///
    /// The displayed count only ever moves up.
    pub async fn like_selected<A: ReviewApi + ?Sized>(&mut self, api: &A) -> Option<u64> {
        let id = self.selected_id.clone()?;

        match api.like_review(&id).await {
            Ok(count) => {
                let likes = count.likes.max(0) as u64;
                if let Some(review) = self.selected.as_mut() {
                    review.likes = review.likes.max(likes);
                }
                Some(likes)
            }
            Err(e) => {
                warn!(review_id = %id, "Failed to like review: {}", e);
                self.notify(NoticeKind::Failure, "Failed to like review. Please try again.");
                None
            }
        }
    }

    /// Post a comment on the selected review and reload the thread
    pub async fn post_comment<A: ReviewApi + ?Sized>(
        &mut self,
        api: &A,
        author: &str,
        content: &str,
    ) -> Result<Created, SubmitError> {
        let Some(id) = self.selected_id.clone() else {
            return Err(SubmitError::Blocked);
        };
        if author.trim().is_empty() || content.trim().is_empty() {
            return Err(SubmitError::Blocked);
        }

        let comment = NewComment {
            author: author.to_string(),
            content: content.to_string(),
        };
        match api.create_comment(&id, &comment).await {
            Ok(created) => {
                self.load_comments(api).await;
                Ok(created)
            }
            Err(e) => {
                error!(review_id = %id, "Failed to post comment: {}", e);
                self.notify(NoticeKind::Failure, "Failed to post comment. Please try again.");
                Err(e.into())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Submit the draft
    ///
    /// A draft with a blank title, author or content is blocked without any
    /// request. On success the draft is cleared and the session returns home;
    /// on failure the session stays on the write view with the draft intact.
    pub async fn submit<A: ReviewApi + ?Sized>(&mut self, api: &A) -> Result<Created, SubmitError> {
        let body = self.draft.to_new_review()?;

        match api.create_review(&body).await {
            Ok(created) => {
                info!(review_id = created.id, "Review submitted");
                self.notify(NoticeKind::Success, "Review submitted successfully!");
                self.draft = ReviewDraft::default();
                self.go_home(api).await;
                Ok(created)
            }
            Err(e) => {
                error!("Failed to create review: {}", e);
                self.notify(NoticeKind::Failure, "Failed to submit review. Please try again.");
                Err(e.into())
            }
        }
    }

    fn notify(&mut self, kind: NoticeKind, message: &str) {
        self.notices.push_back(Notice {
            kind,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(titles: &[&str]) -> ReviewPage<Review> {
        let reviews = titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                nclex_common::transform_review(
                    serde_json::from_value(serde_json::json!({
                        "id": i, "title": title, "author": "a", "content": "c"
                    }))
                    .unwrap(),
                )
            })
            .collect::<Vec<_>>();
        ReviewPage {
            total: reviews.len() as i64,
            reviews,
            page: 1,
            per_page: 12,
            total_pages: 1,
        }
    }

    #[test]
    fn test_initial_state() {
        let session = Session::new();
        assert_eq!(session.view(), ViewState::Home);
        assert!(session.is_loading());
        assert_eq!(session.list_view(), ListView::Loading);
        assert_eq!(session.filters(), &FilterState::default());
    }

    #[test]
    fn test_filter_change_on_home_issues_fetch() {
        let mut session = Session::new();
        let ticket = session
            .update_filters(|f| f.is_working = "yes".to_string())
            .expect("filter change on home should fetch");
        assert_eq!(ticket.query.is_working.as_deref(), Some("yes"));
        assert!(session.is_loading());

        // Same value again is not a change
        assert!(session.update_filters(|f| f.is_working = "yes".to_string()).is_none());
    }

    #[test]
    fn test_filter_ticket_applies_without_refetch() {
        let mut session = Session::new();
        let ticket = session
            .update_filters(|f| f.english_level = "High".to_string())
            .unwrap_or_else(|| session.begin_list_fetch());

        assert_eq!(ticket.generation(), 1);
        assert!(session.apply_list_result(ticket, Ok(page(&["only"]))));
        assert!(!session.is_loading());
    }

    #[test]
    fn test_filter_change_off_home_does_not_fetch() {
        let mut session = Session::new();
        session.open_write();
        assert!(session.update_filters(|f| f.search = "x".to_string()).is_none());
        assert_eq!(session.filters().search, "x");
    }

    #[test]
    fn test_stale_list_response_dropped() {
        let mut session = Session::new();
        let first = session.update_filters(|f| f.search = "a".to_string()).unwrap();
        let second = session.update_filters(|f| f.search = "ab".to_string()).unwrap();
        assert!(second.generation() > first.generation());

        assert!(session.apply_list_result(second, Ok(page(&["newest"]))));
        assert!(!session.apply_list_result(first, Ok(page(&["stale"]))));

        assert_eq!(session.reviews()[0].title, "newest");
        assert!(!session.is_loading());
    }

    #[test]
    fn test_loading_until_latest_resolves() {
        let mut session = Session::new();
        let first = session.begin_list_fetch();
        let _second = session.begin_list_fetch();

        session.apply_list_result(first, Ok(page(&["x"])));
        assert!(session.is_loading());
    }

    #[test]
    fn test_failed_fetch_keeps_previous_results() {
        let mut session = Session::new();
        let t = session.begin_list_fetch();
        session.apply_list_result(t, Ok(page(&["kept"])));

        let t = session.begin_list_fetch();
        session.apply_list_result(t, Err(ClientError::Status(500, "boom".to_string())));

        assert!(!session.is_loading());
        assert_eq!(session.reviews().len(), 1);
        assert_eq!(session.reviews()[0].title, "kept");
    }

    #[test]
    fn test_empty_result_offers_reset() {
        let mut session = Session::new();
        let t = session.update_filters(|f| f.resource = "Kaplan".to_string()).unwrap();
        session.apply_list_result(t, Ok(page(&[])));
        assert_eq!(session.list_view(), ListView::Empty);

        let reset = session.reset_filters().expect("reset should refetch");
        assert_eq!(reset.query, ReviewQuery::default());
        assert_eq!(session.filters(), &FilterState::default());
    }

    #[test]
    fn test_detail_is_optimistic_and_home_clears() {
        let mut session = Session::new();
        let ticket = session.begin_select("5");
        assert_eq!(session.view(), ViewState::Detail);
        assert_eq!(session.selected_id(), Some("5"));
        assert!(session.selected_review().is_none());

        let review = page(&["five"]).reviews.remove(0);
        assert!(session.apply_detail_result(ticket, Ok(review)));
        assert!(session.selected_review().is_some());

        let ticket = session.navigate(ViewState::Home);
        assert!(ticket.is_some());
        assert_eq!(session.selected_id(), None);
        assert!(session.selected_review().is_none());
    }

    #[test]
    fn test_detail_for_old_selection_ignored() {
        let mut session = Session::new();
        let old = session.begin_select("1");
        let _new = session.begin_select("2");

        let review = page(&["one"]).reviews.remove(0);
        assert!(!session.apply_detail_result(old, Ok(review)));
        assert!(session.selected_review().is_none());
    }

    #[test]
    fn test_detail_failure_is_not_blocking() {
        let mut session = Session::new();
        let ticket = session.begin_select("9");
        let applied = session.apply_detail_result(ticket, Err(ClientError::Status(404, String::new())));

        assert!(!applied);
        assert_eq!(session.view(), ViewState::Detail);
        assert!(session.take_notices().is_empty());
    }

    #[test]
    fn test_open_write_no_fetch() {
        let mut session = Session::new();
        assert!(session.navigate(ViewState::Write).is_none());
        assert_eq!(session.view(), ViewState::Write);
    }
}
