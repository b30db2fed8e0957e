//! Selection of parameter descriptors from a [`ParameterEvent`] by name and
//! change type.

use super::ParameterEvent;
use super::ParameterMsg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    New,
    Changed,
    Deleted,
}

/// Matches are ordered NEW entries first, then CHANGED, then DELETED, each
/// group in event order.
#[derive(Debug)]
pub struct ParameterEventsFilter<'a> {
    event: &'a ParameterEvent,
    result: Vec<(EventType, &'a ParameterMsg)>,
}

impl<'a> ParameterEventsFilter<'a> {
    pub fn new(
        event: &'a ParameterEvent,
        names: &[&str],
        types: &[EventType],
    ) -> Self {
        let groups = [
            (EventType::New, &event.new_parameters),
            (EventType::Changed, &event.changed_parameters),
            (EventType::Deleted, &event.deleted_parameters),
        ];

        let result = groups
            .into_iter()
            .filter(|(event_type, _)| types.contains(event_type))
            .flat_map(|(event_type, params)| {
                params
                    .iter()
                    .filter(|p| names.contains(&p.name.as_str()))
                    .map(move |p| (event_type, p))
            })
            .collect();

        Self { event, result }
    }

    pub fn get_events(&self) -> &[(EventType, &'a ParameterMsg)] {
        &self.result
    }

    pub fn event(&self) -> &'a ParameterEvent {
        self.event
    }

    pub fn is_empty(&self) -> bool {
        self.result.is_empty()
    }
}
