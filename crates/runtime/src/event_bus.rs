use std::collections::VecDeque;

use foundation::ids::ShapeId;

/// Input contracts the viewer reacts to.
///
/// Each variant has exactly one handler (the interaction controller); hosts
/// translate their native widget/pointer events into these and never call
/// rendering code directly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerEvent {
    YearChanged { year: i32 },
    PointerEntered { shape: ShapeId },
    PointerMoved { shape: ShapeId, page_x: f64, page_y: f64 },
    PointerLeft { shape: ShapeId },
}

impl ViewerEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ViewerEvent::YearChanged { .. } => "year-changed",
            ViewerEvent::PointerEntered { .. } => "pointer-entered",
            ViewerEvent::PointerMoved { .. } => "pointer-moved",
            ViewerEvent::PointerLeft { .. } => "pointer-left",
        }
    }
}

/// Event with its arrival order, for traceability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    pub seq: u64,
    pub event: ViewerEvent,
}

/// FIFO queue between event sources and the single event owner.
///
/// Draining preserves arrival order, so a year change is always handled
/// before any pointer event that arrived after it.
#[derive(Debug, Default)]
pub struct EventBus {
    next_seq: u64,
    queue: VecDeque<Envelope>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: ViewerEvent) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push_back(Envelope { seq, event });
        seq
    }

    pub fn drain(&mut self) -> Vec<Envelope> {
        self.queue.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{EventBus, ViewerEvent};
    use foundation::ids::ShapeId;

    #[test]
    fn drains_in_arrival_order() {
        let mut bus = EventBus::new();
        bus.emit(ViewerEvent::YearChanged { year: 2000 });
        bus.emit(ViewerEvent::PointerMoved {
            shape: ShapeId(3),
            page_x: 1.0,
            page_y: 2.0,
        });
        bus.emit(ViewerEvent::PointerLeft { shape: ShapeId(3) });

        let drained = bus.drain();
        let kinds: Vec<_> = drained.iter().map(|e| e.event.kind()).collect();
        assert_eq!(kinds, vec!["year-changed", "pointer-moved", "pointer-left"]);
        assert_eq!(drained[0].seq, 0);
        assert_eq!(drained[2].seq, 2);
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn sequence_numbers_keep_growing_across_drains() {
        let mut bus = EventBus::new();
        bus.emit(ViewerEvent::YearChanged { year: 1990 });
        let _ = bus.drain();
        let seq = bus.emit(ViewerEvent::PointerEntered { shape: ShapeId(0) });
        assert_eq!(seq, 1);
        let seqs: Vec<u64> = bus.drain().iter().map(|e| e.seq).collect();
        assert_eq!(seqs, vec![1]);
    }
}
