//! Seams between the controllers and whatever renders the HUD.
//!
//! Every method is called while the owning controller holds its session
//! lock. Implementations must not call back into the controller.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use hud_core::{InputLimits, OrderQuote, ProgressCurve};

/// Receives the display lifecycle of one timed controller.
pub trait FrameSink<C: ProgressCurve>: Send + Sync {
    /// A session became active.
    fn started(&self, curve: &C);
    /// A tick recomputed the display values.
    fn frame(&self, frame: &C::Frame);
    /// The terminal transition happened. No frames follow for this session.
    fn finished(&self, outcome: &C::Outcome);
    /// The display hold elapsed; the display returns to its idle state.
    fn cleared(&self);
}

/// The order card the player fills in before the host starts a pump.
#[derive(Clone, Debug, PartialEq)]
pub struct InputCard {
    pub station_name: String,
    pub currency: String,
    pub litre_price: f64,
    pub current_fuel: f64,
    pub max_litres: f64,
    pub limits: InputLimits,
}

/// Static cards that are not driven by a timer.
pub trait CardSink: Send + Sync {
    fn show_input(&self, card: &InputCard);
    /// The player edited the order; mirror the other field and the tank fill.
    fn update_quote(&self, quote: &OrderQuote);
    fn hide_all(&self);
}

/// One recorded display call.
#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent<F, O> {
    Started,
    Frame(F),
    Finished(O),
    Cleared,
}

pub type Events<C> = Vec<SinkEvent<<C as ProgressCurve>::Frame, <C as ProgressCurve>::Outcome>>;

/// Records frame sink calls in order, for tests.
pub struct RecordingSink<C: ProgressCurve> {
    events: Arc<Mutex<Events<C>>>,
    _curve: PhantomData<fn() -> C>,
}

impl<C: ProgressCurve> Default for RecordingSink<C> {
    fn default() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            _curve: PhantomData,
        }
    }
}

impl<C: ProgressCurve> Clone for RecordingSink<C> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
            _curve: PhantomData,
        }
    }
}

impl<C: ProgressCurve> RecordingSink<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Events<C> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn frames(&self) -> Vec<C::Frame> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|event| match event {
                SinkEvent::Frame(frame) => Some(frame.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn last_frame(&self) -> Option<C::Frame> {
        self.frames().pop()
    }

    fn push(&self, event: SinkEvent<C::Frame, C::Outcome>) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl<C> FrameSink<C> for RecordingSink<C>
where
    C: ProgressCurve,
    C::Frame: Send,
    C::Outcome: Send,
{
    fn started(&self, _curve: &C) {
        self.push(SinkEvent::Started);
    }

    fn frame(&self, frame: &C::Frame) {
        self.push(SinkEvent::Frame(frame.clone()));
    }

    fn finished(&self, outcome: &C::Outcome) {
        self.push(SinkEvent::Finished(outcome.clone()));
    }

    fn cleared(&self) {
        self.push(SinkEvent::Cleared);
    }
}
