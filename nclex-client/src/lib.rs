//! nclex-client library - review board client
//!
//! Talks to the review API and keeps the view state of a single browsing
//! session: the list/detail/write views, filters, and the submission draft.

pub mod api;
pub mod draft;
pub mod error;
pub mod http;
pub mod session;

pub use api::ReviewApi;
pub use draft::{ContentTemplate, ReviewDraft};
pub use error::{ClientError, SubmitError};
pub use http::HttpReviewApi;
pub use session::{DetailTicket, ListTicket, ListView, Notice, NoticeKind, Session, ViewState};
