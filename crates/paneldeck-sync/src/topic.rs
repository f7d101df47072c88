//! Canonical topic naming for panel components.
//!
//! Every placed widget is addressed by a slash-delimited topic derived from
//! the owning project and the widget's identity:
//! `{slug}/{projectId}/{kindToken}/{index}/{direction}`.

use crate::project::ProjectRef;
use serde::{Deserialize, Serialize};

/// The closed set of widget kinds a panel can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetKind {
    Text,
    Image,
    Button,
    Slider,
    Led,
    Thermometer,
    Camera,
}

/// All widget kinds, in palette order.
pub const ALL_KINDS: [WidgetKind; 7] = [
    WidgetKind::Text,
    WidgetKind::Image,
    WidgetKind::Button,
    WidgetKind::Slider,
    WidgetKind::Led,
    WidgetKind::Thermometer,
    WidgetKind::Camera,
];

impl WidgetKind {
    /// Canonical lowercase topic token for this kind.
    pub fn token(self) -> &'static str {
        match self {
            WidgetKind::Text => "text",
            WidgetKind::Image => "image",
            WidgetKind::Button => "button",
            WidgetKind::Slider => "slider",
            WidgetKind::Led => "led",
            WidgetKind::Thermometer => "analog",
            WidgetKind::Camera => "camera",
        }
    }

    /// Parse a topic token back into a kind.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "text" => Some(WidgetKind::Text),
            "image" => Some(WidgetKind::Image),
            "button" => Some(WidgetKind::Button),
            "slider" => Some(WidgetKind::Slider),
            "led" => Some(WidgetKind::Led),
            "analog" => Some(WidgetKind::Thermometer),
            "camera" => Some(WidgetKind::Camera),
            _ => None,
        }
    }

    /// Whether user interaction with this widget publishes to the bus.
    pub fn is_outbound(self) -> bool {
        matches!(
            self,
            WidgetKind::Button | WidgetKind::Slider | WidgetKind::Camera
        )
    }

    /// The direction a widget of this kind binds by default: outbound
    /// widgets bind the command side, display widgets the report side.
    pub fn direction(self) -> Direction {
        if self.is_outbound() {
            Direction::Cmd
        } else {
            Direction::Rep
        }
    }
}

/// Topic direction: `cmd` carries user-triggered values out, `rep` carries
/// reported values back for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Cmd,
    Rep,
}

impl Direction {
    /// Wire token for this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Cmd => "cmd",
            Direction::Rep => "rep",
        }
    }

    /// Parse a wire token.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cmd" => Some(Direction::Cmd),
            "rep" => Some(Direction::Rep),
            _ => None,
        }
    }
}

/// A fully parsed component topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicAddress {
    pub slug: String,
    pub project_id: String,
    pub kind: WidgetKind,
    pub index: u32,
    pub direction: Direction,
}

/// Reduce a project name to its topic slug: lowercase, runs of whitespace
/// become a single underscore, anything outside `[a-z0-9_]` is dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_space = false;
    for c in name.trim().chars() {
        if c.is_whitespace() {
            in_space = true;
            continue;
        }
        if in_space {
            slug.push('_');
            in_space = false;
        }
        for lc in c.to_lowercase() {
            if lc.is_ascii_lowercase() || lc.is_ascii_digit() || lc == '_' {
                slug.push(lc);
            }
        }
    }
    slug
}

/// The `{slug}/{projectId}` prefix shared by all of a project's topics.
pub fn base_topic(project: &ProjectRef) -> String {
    format!("{}/{}", slugify(&project.name), project.id)
}

/// Build the full topic for one component. Deterministic: the same inputs
/// always produce the same string.
pub fn format_topic(
    project: &ProjectRef,
    kind: WidgetKind,
    index: u32,
    direction: Direction,
) -> String {
    format!(
        "{}/{}/{}/{}",
        base_topic(project),
        kind.token(),
        index,
        direction.as_str()
    )
}

/// Wildcard filter matching every report topic of a project
/// (`+` spans the kind and index levels).
pub fn report_filter(project: &ProjectRef) -> String {
    format!("{}/+/+/rep", base_topic(project))
}

/// Parse an inbound topic. Topics that do not have exactly five segments, a
/// known kind token, a numeric index, and a known direction are not errors;
/// they are simply not component topics and yield `None`.
pub fn parse_topic(topic: &str) -> Option<TopicAddress> {
    let mut segments = topic.split('/');
    let slug = segments.next()?;
    let project_id = segments.next()?;
    let kind = WidgetKind::from_token(segments.next()?)?;
    let index: u32 = segments.next()?.parse().ok()?;
    let direction = Direction::from_str(segments.next()?)?;
    if segments.next().is_some() {
        return None;
    }
    Some(TopicAddress {
        slug: slug.to_string(),
        project_id: project_id.to_string(),
        kind,
        index,
        direction,
    })
}

/// Rewrite a command topic to its companion report topic. Components bound
/// to the `cmd` side still display state from the `rep` side.
pub fn companion_report_topic(topic: &str) -> Option<String> {
    topic
        .strip_suffix("/cmd")
        .map(|base| format!("{base}/rep"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project() -> ProjectRef {
        ProjectRef::with_id("abc123", "My Panel")
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Panel"), "my_panel");
        assert_eq!(slugify("  Pump  Station 3 "), "pump_station_3");
        assert_eq!(slugify("Héllo-World!"), "hlloworld");
        assert_eq!(slugify("already_fine"), "already_fine");
    }

    #[test]
    fn test_format_topic_deterministic() {
        let topic = format_topic(&project(), WidgetKind::Button, 2, Direction::Cmd);
        assert_eq!(topic, "my_panel/abc123/button/2/cmd");
        // Re-deriving for an unchanged component reproduces the string.
        assert_eq!(
            topic,
            format_topic(&project(), WidgetKind::Button, 2, Direction::Cmd)
        );
    }

    #[test]
    fn test_thermometer_token() {
        let topic = format_topic(&project(), WidgetKind::Thermometer, 1, Direction::Rep);
        assert_eq!(topic, "my_panel/abc123/analog/1/rep");
    }

    #[test]
    fn test_report_filter() {
        assert_eq!(report_filter(&project()), "my_panel/abc123/+/+/rep");
    }

    #[test]
    fn test_parse_topic_round_trip() {
        let topic = format_topic(&project(), WidgetKind::Led, 3, Direction::Rep);
        let addr = parse_topic(&topic).unwrap();
        assert_eq!(addr.slug, "my_panel");
        assert_eq!(addr.project_id, "abc123");
        assert_eq!(addr.kind, WidgetKind::Led);
        assert_eq!(addr.index, 3);
        assert_eq!(addr.direction, Direction::Rep);
    }

    #[test]
    fn test_parse_rejects_short_topics() {
        assert!(parse_topic("my_panel/abc123/button/2").is_none());
        assert!(parse_topic("my_panel").is_none());
        assert!(parse_topic("").is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_segments() {
        // Unknown direction.
        assert!(parse_topic("my_panel/abc123/button/2/ack").is_none());
        // Unknown kind token.
        assert!(parse_topic("my_panel/abc123/dial/2/cmd").is_none());
        // Non-numeric index.
        assert!(parse_topic("my_panel/abc123/button/two/cmd").is_none());
        // Trailing segments.
        assert!(parse_topic("my_panel/abc123/button/2/cmd/extra").is_none());
    }

    #[test]
    fn test_companion_report_topic() {
        assert_eq!(
            companion_report_topic("my_panel/abc123/button/2/cmd").as_deref(),
            Some("my_panel/abc123/button/2/rep")
        );
        assert!(companion_report_topic("my_panel/abc123/led/1/rep").is_none());
    }

    #[test]
    fn test_direction_per_kind() {
        assert_eq!(WidgetKind::Button.direction(), Direction::Cmd);
        assert_eq!(WidgetKind::Slider.direction(), Direction::Cmd);
        assert_eq!(WidgetKind::Camera.direction(), Direction::Cmd);
        assert_eq!(WidgetKind::Led.direction(), Direction::Rep);
        assert_eq!(WidgetKind::Text.direction(), Direction::Rep);
        assert_eq!(WidgetKind::Thermometer.direction(), Direction::Rep);
        assert_eq!(WidgetKind::Image.direction(), Direction::Rep);
    }

    #[test]
    fn test_token_round_trip() {
        for kind in ALL_KINDS {
            assert_eq!(WidgetKind::from_token(kind.token()), Some(kind));
        }
        assert_eq!(WidgetKind::from_token("thermometer"), None);
    }
}
