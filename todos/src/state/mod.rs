//! Client-side state components driven by the controller.
//!
//! Each component is a plain owned value with synchronous transitions; the
//! [`Controller`](crate::controller::Controller) is the only place that
//! sequences them with remote calls.

pub mod busy;
pub mod edit;
pub mod errors;
pub mod task_list;

pub use busy::{BusyRelease, BusySet};
pub use edit::{Commit, EditError, EditSession, EditState, SessionPolicy, SessionTicket};
pub use errors::{DISMISS_AFTER, ErrorChannel, Failure};
pub use task_list::TaskList;
