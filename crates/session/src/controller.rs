use compute::year_index::index_for;
use foundation::ids::ShapeId;
use foundation::time::Time;
use layers::symbology::Color;
use runtime::event_bus::{EventBus, ViewerEvent};
use tracing::{debug, info, warn};

use crate::session::Session;
use crate::tooltip::{TooltipContent, TooltipState};
use crate::view_state::ViewState;

/// What the host has to change on the page after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Reaction {
    YearLabel { year: i32 },
    /// Fills were retargeted; the host should keep drawing frames until
    /// [`InteractionController::needs_repaint`] turns false.
    Restyled { year: i32 },
    TooltipShown,
    TooltipMoved { html: String, left: f64, top: f64 },
    TooltipHidden,
}

/// Sole owner of the view state. Events go through the bus and are handled
/// strictly in arrival order.
#[derive(Debug)]
pub struct InteractionController {
    session: Session,
    view: ViewState,
    tooltip: TooltipState,
    bus: EventBus,
}

impl InteractionController {
    /// Selects the latest year and paints it at `now`.
    pub fn new(session: Session, now: Time) -> Self {
        // `Session::build` rejects datasets without years.
        let initial = session.years().latest().unwrap_or(session.config().min_year);
        info!("initial year: {initial}");
        let mut controller = Self {
            session,
            view: ViewState::new(initial),
            tooltip: TooltipState::default(),
            bus: EventBus::new(),
        };
        controller.update_year(initial, now);
        controller
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn tooltip(&self) -> &TooltipState {
        &self.tooltip
    }

    pub fn emit(&mut self, event: ViewerEvent) -> u64 {
        self.bus.emit(event)
    }

    /// Handles everything queued so far.
    pub fn pump(&mut self, now: Time) -> Vec<Reaction> {
        let mut reactions = Vec::new();
        for envelope in self.bus.drain() {
            debug!(seq = envelope.seq, kind = envelope.event.kind(), "handling event");
            reactions.extend(self.handle(envelope.event, now));
        }
        reactions
    }

    pub fn handle(&mut self, event: ViewerEvent, now: Time) -> Vec<Reaction> {
        match event {
            ViewerEvent::YearChanged { year } => {
                let year = self.snap_year(year);
                self.update_year(year, now);
                vec![Reaction::YearLabel { year }, Reaction::Restyled { year }]
            }
            ViewerEvent::PointerEntered { .. } => {
                self.tooltip.show();
                vec![Reaction::TooltipShown]
            }
            ViewerEvent::PointerMoved {
                shape,
                page_x,
                page_y,
            } => match self.tooltip_for(shape) {
                Some(content) => {
                    let html = content.to_html();
                    let offset = self.session.config().tooltip_offset;
                    self.tooltip.place(content, page_x, page_y, offset);
                    vec![Reaction::TooltipMoved {
                        html,
                        left: self.tooltip.left,
                        top: self.tooltip.top,
                    }]
                }
                None => {
                    warn!(shape = shape.0, "pointer event for unknown shape");
                    Vec::new()
                }
            },
            ViewerEvent::PointerLeft { .. } => {
                self.tooltip.hide();
                vec![Reaction::TooltipHidden]
            }
        }
    }

    pub fn tooltip_for(&self, shape: ShapeId) -> Option<TooltipContent> {
        let shape = self.session.layer().shape(shape)?;
        Some(TooltipContent {
            name: shape.name.clone(),
            year: self.view.selected_year(),
            value: self.view.value_of(shape.code.as_deref()),
        })
    }

    /// Fill colors to draw at `now`.
    pub fn frame(&mut self, now: Time) -> Vec<(ShapeId, Color)> {
        self.session.layer_mut().frame(now)
    }

    pub fn is_animating(&self, now: Time) -> bool {
        self.session.layer().is_animating(now)
    }

    /// Whether the host should draw another frame.
    pub fn needs_repaint(&self, now: Time) -> bool {
        self.session.layer().needs_repaint(now)
    }

    fn snap_year(&self, requested: i32) -> i32 {
        let years = self.session.years();
        match years.nearest(requested) {
            Some(year) => {
                if year != requested {
                    debug!(requested, year, "year not in data; snapped");
                }
                year
            }
            None => self.view.selected_year(),
        }
    }

    fn update_year(&mut self, year: i32, now: Time) {
        info!("updating map for year: {year}");
        let index = index_for(self.session.dataset(), year);
        self.session.restyle(&index, now);
        self.view.select(index);
    }
}
