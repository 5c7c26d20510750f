//! Emails the rendered digest to the distribution list.

pub mod compose;
pub mod dispatcher;
pub mod transport;

pub use dispatcher::{Dispatched, Dispatcher};
pub use transport::{Mailer, SmtpMailer};
pub use lettre::Message;
