use crate::context::AppContext;
use crate::dispatch::ViewUpdate;
use crate::events::EventData;
use crate::processing::destinations_from;
use crate::render::{map_figure, Figure};
use crate::session::{Selection, Session};
use tracing::debug;

/// Mirrors the hovered origin's label into the input field.
pub fn handle_hover(
    _ctx: &AppContext,
    _session: &mut Session,
    payload: Option<&EventData>,
) -> Vec<ViewUpdate> {
    match payload.and_then(EventData::first_label) {
        Some(label) => vec![ViewUpdate::InputField { value: label.to_string() }],
        None => Vec::new(),
    }
}

// No labelled first point clears the selection
pub fn handle_click(
    ctx: &AppContext,
    session: &mut Session,
    payload: Option<&EventData>,
) -> Vec<ViewUpdate> {
    let selection = Selection::from_label(payload.and_then(EventData::first_label));
    debug!("Session {} selection is {:?}", session.id, selection);

    let figure = render_map(ctx, &selection);
    session.select(selection);
    vec![ViewUpdate::Map { figure }]
}

pub fn render_map(ctx: &AppContext, selection: &Selection) -> Figure {
    let destinations = match selection {
        Selection::NoSelection => Vec::new(),
        Selection::Selected(name) => destinations_from(ctx.dataset(), name),
    };
    map_figure(selection.origin_name(), &destinations)
}
