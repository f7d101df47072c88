//! Inbound message dispatch and cold-start hydration.
//!
//! Bus messages land here: every payload is cached, and report-side
//! messages addressed to a component on the active panel produce a
//! [`Refresh`] the host applies to the widget's visual. The panel is only
//! read on this path; drag commits are the sole writer.

use crate::component::ComponentId;
use crate::panel::Panel;
use paneldeck_sync::{Direction, SyncContext, WidgetKind, parse_topic};

/// Display update for one component.
#[derive(Debug, Clone, PartialEq)]
pub struct Refresh {
    pub component: ComponentId,
    pub kind: WidgetKind,
    pub value: DisplayValue,
}

/// Interpreted payload, by widget kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayValue {
    /// Raw text for text widgets.
    Text(String),
    /// LED on/off.
    LedOn(bool),
    /// Numeric level for sliders and analog gauges.
    Level(f64),
    /// Opaque payload (image data) handed to the renderer as-is.
    Blob(String),
}

/// Interpret a payload for a widget kind. `None` means the widget has no
/// inbound visual (buttons) or the payload does not parse (non-numeric
/// level); either way nothing changes on screen.
pub fn interpret(kind: WidgetKind, payload: &str) -> Option<DisplayValue> {
    match kind {
        WidgetKind::Text => Some(DisplayValue::Text(payload.to_string())),
        WidgetKind::Led => Some(DisplayValue::LedOn(payload == "1" || payload == "true")),
        WidgetKind::Slider | WidgetKind::Thermometer => {
            payload.trim().parse().ok().map(DisplayValue::Level)
        }
        WidgetKind::Image | WidgetKind::Camera => Some(DisplayValue::Blob(payload.to_string())),
        WidgetKind::Button => None,
    }
}

/// Handle one inbound bus message.
///
/// The payload is cached unconditionally. A refresh is produced only for a
/// well-formed report topic addressing a component of this panel's project;
/// anything else (short topics, command echoes, other projects' traffic)
/// is cached and otherwise ignored.
pub fn apply_message(
    ctx: &mut SyncContext,
    panel: &Panel,
    topic: &str,
    payload: &str,
) -> Option<Refresh> {
    ctx.cache_mut().put(topic, payload);

    let address = parse_topic(topic)?;
    if address.direction != Direction::Rep {
        return None;
    }
    if address.project_id != panel.project.id {
        return None;
    }
    let component = panel.find_by_address(address.kind, address.index)?;
    let value = interpret(component.kind, payload)?;
    Some(Refresh {
        component: component.id,
        kind: component.kind,
        value,
    })
}

/// Cold-start pass: resolve every component's display value from the cache,
/// falling back from a `cmd` bound topic to its companion report topic.
/// Components with no cached state are skipped.
pub fn hydrate(ctx: &SyncContext, panel: &Panel) -> Vec<Refresh> {
    panel
        .components()
        .iter()
        .filter_map(|component| {
            let payload = ctx.cache().get_report(&component.bound_topic)?;
            let value = interpret(component.kind, payload)?;
            Some(Refresh {
                component: component.id,
                kind: component.kind,
                value,
            })
        })
        .collect()
}
