pub mod reminder_scheduler;
pub mod sink;

pub use reminder_scheduler::start_reminder_scheduler;
pub use sink::{LogNotifier, NotificationSink};
