//! Activation glue: registers the toggle command and the change listeners

use std::rc::Rc;

use tracing::debug;

use super::controller::HighlightController;
use super::styles::DecorationStyles;
use super::toggle::ToggleState;
use crate::error::Result;
use crate::host::{ExtensionContext, Host, Registry};

/// The one command this add-on exports
pub const TOGGLE_COMMAND: &str = "paritylight.toggle";

/// Wire the add-on into a host.
///
/// Paints the focused document once before returning, but leaves the flag
/// inactive: until the first toggle, highlights are visible while the state
/// says "off". That first toggle repaints the same ranges and reports
/// "enabled"; edits made before it are not picked up until then.
pub fn activate(
    host: &mut dyn Host,
    registry: &mut Registry,
    context: &mut ExtensionContext,
) -> Result<ToggleState> {
    let controller = Rc::new(HighlightController::new(DecorationStyles::register(host)));
    let state = ToggleState::new();

    let (c, s) = (controller.clone(), state.clone());
    context.subscriptions.push(registry.register_command(
        TOGGLE_COMMAND,
        Box::new(move |host| {
            s.toggle(&c, host);
        }),
    )?);

    let (c, s) = (controller.clone(), state.clone());
    context
        .subscriptions
        .push(registry.on_did_change_text_document(Box::new(move |host| s.refresh(&c, host))));

    let (c, s) = (controller.clone(), state.clone());
    context
        .subscriptions
        .push(registry.on_did_change_active_text_editor(Box::new(move |host| s.refresh(&c, host))));

    controller.apply_highlights(host);
    debug!(command = TOGGLE_COMMAND, "parity highlighter activated");

    Ok(state)
}

/// Nothing to release by hand; the host disposes the context.
pub fn deactivate() {}
