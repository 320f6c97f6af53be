//! Running filters over events drawn from several sources.
//!
//! Both the pipeline and [`Action::Multiple`](crate::Action::Multiple) are
//! built from the same step: a population of events is mapped item by item,
//! and each item's results are concatenated in order to form the next
//! population.

use crate::calendar::Calendar;
use crate::error::Result;
use crate::event::Event;
use crate::filter::Filter;
use crate::source::EventSource;
use tracing::{debug, trace};

/// One population transformation stage.
///
/// Results keep per-item order, then per-output order. The population may
/// grow, shrink or stay the same size.
pub(crate) fn fan_out<F>(population: Vec<Event>, mut stage: F) -> Vec<Event>
where
    F: FnMut(Event) -> Vec<Event>,
{
    let mut next = Vec::with_capacity(population.len());
    for event in population {
        next.extend(stage(event));
    }
    next
}

/// Sources plus the ordered filters applied to every event they yield.
#[derive(Default)]
pub struct Pipeline {
    sources: Vec<Box<dyn EventSource>>,
    filters: Vec<Filter>,
}

impl Pipeline {
    pub fn new(sources: Vec<Box<dyn EventSource>>, filters: Vec<Filter>) -> Self {
        Self { sources, filters }
    }

    pub fn with_source(mut self, source: impl EventSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sources(&self) -> &[Box<dyn EventSource>] {
        &self.sources
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Run every source event through every filter, in order.
    ///
    /// Output order is: sources in order, events within a source in order,
    /// and the survivors of one event in the order the actions produced them.
    ///
    /// # Errors
    /// A failing source aborts the build with its error; nothing is retried.
    pub fn build(&self) -> Result<Calendar> {
        let mut output = Vec::new();
        let mut consumed = 0usize;

        for source in &self.sources {
            let events = source.events()?;
            debug!(source = %source.name(), events = events.len(), "read source");
            consumed += events.len();

            for event in events {
                output.extend(self.apply(event));
            }
        }

        debug!(events_in = consumed, events_out = output.len(), "built calendar");
        Ok(Calendar::new(output))
    }

    /// Run a single event through every filter.
    pub fn apply(&self, event: Event) -> Vec<Event> {
        self.filters
            .iter()
            .enumerate()
            .fold(vec![event], |population, (index, filter)| {
                let before = population.len();
                let next = fan_out(population, |e| filter.check(e));
                trace!(filter = index, before, after = next.len(), "applied filter");
                next
            })
    }
}
