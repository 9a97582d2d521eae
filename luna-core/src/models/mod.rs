mod event;
mod logbook;

pub use event::{Event, EventKind};
pub use logbook::Logbook;
