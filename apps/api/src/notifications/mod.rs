// Candidate emails and recruiter notifications.
// Both are soft side effects: a failure here never aborts a request.

pub mod dispatcher;
pub mod registry;
pub mod templates;
pub mod transport;

pub use dispatcher::NotificationDispatcher;
pub use registry::{InMemoryNotificationRegistry, NotificationRegistry};
pub use transport::SendGridTransport;
