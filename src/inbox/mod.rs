mod controller;
mod detail;
mod dispatcher;
mod fetch_coordinator;
mod notification;
mod pagination;
mod selection;

pub use controller::Event;
pub use controller::InboxController;
pub use detail::DetailPatch;
pub use detail::DetailViewController;
pub use dispatcher::BatchAction;
pub use dispatcher::MutationRequest;
pub use fetch_coordinator::FetchCoordinator;
pub use fetch_coordinator::FetchState;
pub use fetch_coordinator::FetchTicket;
pub use fetch_coordinator::Generation;
pub use fetch_coordinator::Settle;
pub use notification::Notification;
pub use notification::Severity;
pub use pagination::FilterState;
pub use pagination::PaginationState;
pub use pagination::page_query;
pub use selection::ReadToggle;
pub use selection::SelectionSet;
