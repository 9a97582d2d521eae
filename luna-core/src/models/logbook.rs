use super::Event;

/// A named, ordered collection of events, the unit of load/save/list
/// operations.
///
/// Events are kept most-recent-first (descending `time`). Mutating an
/// event's timestamp breaks that order until the caller invokes
/// [`Logbook::sort`]; nothing re-sorts implicitly, since that would be
/// wasted work on bulk loads.
#[derive(Debug, Clone, PartialEq)]
pub struct Logbook {
    /// Logical name. The empty string is the default logbook, kept for
    /// installations that predate multiple logbooks.
    pub name: String,
    pub events: Vec<Event>,
}

impl Logbook {
    /// Soft cap on the event count, to keep files and memory bounded.
    pub const MAX_SAFE_SIZE: usize = 30_000;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            events: Vec::new(),
        }
    }

    /// Inserts an event at the front (most recent first). Does not re-sort.
    pub fn append(&mut self, event: Event) {
        self.events.insert(0, event);
    }

    /// Removes the first event equal to `event`. Returns whether one was
    /// removed.
    pub fn remove(&mut self, event: &Event) -> bool {
        match self.events.iter().position(|e| e == event) {
            Some(pos) => {
                self.events.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Stable sort, descending by timestamp. Call after editing an event's
    /// `time`.
    pub fn sort(&mut self) {
        self.events.sort_by(|a, b| b.time.cmp(&a.time));
    }

    pub fn is_oversized(&self) -> bool {
        self.events.len() > Self::MAX_SAFE_SIZE
    }

    /// Drops everything past the first `MAX_SAFE_SIZE / 2` events. Assuming
    /// descending-time order, that discards the oldest half. Lossy and
    /// irreversible; callers must get an explicit confirmation first.
    pub fn trim(&mut self) {
        self.events.truncate(Self::MAX_SAFE_SIZE / 2);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;

    fn event_at(time: i64) -> Event {
        Event::new(EventKind::DiaperPee).with_time(time)
    }

    #[test]
    fn test_append_inserts_at_front() {
        let mut logbook = Logbook::new("test");
        logbook.append(event_at(100));
        logbook.append(event_at(200));

        assert_eq!(logbook.events[0].time, 200);
        assert_eq!(logbook.events[1].time, 100);
    }

    #[test]
    fn test_remove() {
        let mut logbook = Logbook::new("test");
        let event = event_at(100);
        logbook.append(event.clone());

        assert!(logbook.remove(&event));
        assert!(logbook.is_empty());
        assert!(!logbook.remove(&event));
    }

    #[test]
    fn test_sort_descending_by_time() {
        let mut logbook = Logbook::new("test");
        logbook.events = vec![event_at(100), event_at(300), event_at(200)];
        logbook.sort();

        let times: Vec<i64> = logbook.events.iter().map(|e| e.time).collect();
        assert_eq!(times, vec![300, 200, 100]);
    }

    #[test]
    fn test_oversize_boundary() {
        let mut logbook = Logbook::new("test");
        logbook.events = (0..Logbook::MAX_SAFE_SIZE as i64).map(event_at).collect();
        assert!(!logbook.is_oversized());

        logbook.append(event_at(-1));
        assert!(logbook.is_oversized());
    }

    #[test]
    fn test_trim_keeps_most_recent_half() {
        let mut logbook = Logbook::new("test");
        // 30001 events in descending-time order.
        logbook.events = (0..=Logbook::MAX_SAFE_SIZE as i64)
            .rev()
            .map(event_at)
            .collect();
        assert!(logbook.is_oversized());

        logbook.trim();

        assert_eq!(logbook.len(), Logbook::MAX_SAFE_SIZE / 2);
        // Survivors are exactly the most recent ones, order untouched.
        assert_eq!(logbook.events[0].time, Logbook::MAX_SAFE_SIZE as i64);
        assert_eq!(
            logbook.events.last().unwrap().time,
            (Logbook::MAX_SAFE_SIZE / 2) as i64 + 1
        );
        assert!(!logbook.is_oversized());
    }
}
