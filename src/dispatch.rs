//! Event dispatch: handlers are registered against named sources, and every
//! update they produce is applied to a rendering surface.

use crate::context::AppContext;
use crate::events::{EventData, EventSource};
use crate::handlers::{handle_click, handle_hover};
use crate::render::Figure;
use crate::session::Session;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "target", rename_all = "kebab-case")]
pub enum ViewUpdate {
    InputField { value: String },
    Map { figure: Figure },
}

pub trait Surface {
    fn apply(&mut self, update: &ViewUpdate);
}

pub type Handler =
    Box<dyn Fn(&AppContext, &mut Session, Option<&EventData>) -> Vec<ViewUpdate> + Send + Sync>;

#[derive(Default)]
pub struct Dispatcher {
    handlers: HashMap<EventSource, Vec<Handler>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_handlers() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register(EventSource::GlobeHover, handle_hover);
        dispatcher.register(EventSource::GlobeClick, handle_click);
        dispatcher
    }

    pub fn register<F>(&mut self, source: EventSource, handler: F)
    where
        F: Fn(&AppContext, &mut Session, Option<&EventData>) -> Vec<ViewUpdate> + Send + Sync + 'static,
    {
        self.handlers.entry(source).or_default().push(Box::new(handler));
    }

    /// Runs every handler for `source` in registration order, applying each
    /// update to the session before returning them all.
    pub fn dispatch(
        &self,
        ctx: &AppContext,
        session: &mut Session,
        source: EventSource,
        payload: Option<&EventData>,
    ) -> Vec<ViewUpdate> {
        let Some(handlers) = self.handlers.get(&source) else {
            debug!("No handlers registered for {}", source);
            return Vec::new();
        };

        let mut updates = Vec::new();
        for handler in handlers {
            for update in handler(ctx, session, payload) {
                session.apply(&update);
                updates.push(update);
            }
        }
        updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::fixtures::sample_dataset;
    use crate::session::Selection;

    fn context() -> AppContext {
        AppContext::new(sample_dataset())
    }

    #[test]
    fn default_click_updates_map_and_session() {
        let ctx = context();
        let dispatcher = Dispatcher::with_default_handlers();
        let mut session = Session::new("s");

        let updates = dispatcher.dispatch(
            &ctx,
            &mut session,
            EventSource::GlobeClick,
            Some(&EventData::labelled("Tokyo")),
        );

        assert_eq!(updates.len(), 1);
        assert!(matches!(&updates[0], ViewUpdate::Map { figure } if figure == session.map()));
        assert_eq!(session.selection(), &Selection::Selected("Tokyo".to_string()));
        assert_eq!(session.map().markers().len(), 1);
    }

    #[test]
    fn default_hover_updates_input_field_only() {
        let ctx = context();
        let dispatcher = Dispatcher::with_default_handlers();
        let mut session = Session::new("s");

        let updates = dispatcher.dispatch(
            &ctx,
            &mut session,
            EventSource::GlobeHover,
            Some(&EventData::labelled("London")),
        );

        assert_eq!(updates, vec![ViewUpdate::InputField { value: "London".to_string() }]);
        assert_eq!(session.input_field(), Some("London"));
        assert_eq!(session.selection(), &Selection::NoSelection);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let ctx = context();
        let mut dispatcher = Dispatcher::new();
        dispatcher.register(EventSource::GlobeHover, |_, _, _| {
            vec![ViewUpdate::InputField { value: "first".to_string() }]
        });
        dispatcher.register(EventSource::GlobeHover, |_, session, _| {
            // Sees the first handler's update already applied
            let seen = session.input_field().unwrap_or_default().to_string();
            vec![ViewUpdate::InputField { value: format!("{seen}+second") }]
        });
        let mut session = Session::new("s");

        let updates = dispatcher.dispatch(&ctx, &mut session, EventSource::GlobeHover, None);

        assert_eq!(updates.len(), 2);
        assert_eq!(session.input_field(), Some("first+second"));
    }

    #[test]
    fn unregistered_source_yields_nothing() {
        let ctx = context();
        let dispatcher = Dispatcher::new();
        let mut session = Session::new("s");
        assert!(dispatcher
            .dispatch(&ctx, &mut session, EventSource::GlobeClick, Some(&EventData::labelled("London")))
            .is_empty());
        assert_eq!(session.selection(), &Selection::NoSelection);
    }
}
