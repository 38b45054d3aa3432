//! Closed vocabularies shared by the editor model, the layout engine and
//! code generation.
//!
//! - [`NodeKind`] - what a node represents; picks its default size and outline
//! - [`Outline`] - boundary shape used when clipping connectors
//! - [`EdgeStyle`] - arrow directionality and dash pattern of an edge
//! - [`DiagramType`] - which PlantUML diagram the editor generates

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

/// Kind of a diagram node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A plain box. Older saved diagrams call this kind `node`.
    #[default]
    #[serde(alias = "node")]
    Generic,
    Actor,
    Class,
    Component,
    Database,
}

impl NodeKind {
    /// All kinds, in toolbar order.
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Generic,
        NodeKind::Actor,
        NodeKind::Class,
        NodeKind::Component,
        NodeKind::Database,
    ];

    /// Size a freshly created node of this kind gets.
    ///
    /// # Examples
    ///
    /// ```
    /// # use umlsketch_core::{geometry::Size, model::NodeKind};
    /// assert_eq!(NodeKind::Actor.default_size(), Size::new(50.0, 50.0));
    /// assert_eq!(NodeKind::Class.default_size(), Size::new(80.0, 40.0));
    /// ```
    pub fn default_size(self) -> Size {
        match self {
            NodeKind::Actor => Size::new(50.0, 50.0),
            NodeKind::Database => Size::new(80.0, 50.0),
            NodeKind::Generic | NodeKind::Class | NodeKind::Component => Size::new(80.0, 40.0),
        }
    }

    /// Boundary shape of the node.
    pub fn outline(self) -> Outline {
        match self {
            NodeKind::Actor => Outline::Ellipse,
            NodeKind::Generic | NodeKind::Class | NodeKind::Component | NodeKind::Database => {
                Outline::Rectangle
            }
        }
    }

    /// Actors are always treated as flow sources by the layered layout.
    pub fn is_flow_source(self) -> bool {
        matches!(self, NodeKind::Actor)
    }

    /// Capitalized name used for default labels (`Actor1`, `Class2`, ...).
    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::Generic => "Node",
            NodeKind::Actor => "Actor",
            NodeKind::Class => "Class",
            NodeKind::Component => "Component",
            NodeKind::Database => "Database",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Boundary shape a connector is clipped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outline {
    Rectangle,
    /// Ellipse inscribed in the node's box; a circle when the box is square.
    Ellipse,
}

/// Arrow directionality and dash pattern of an edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Solid,
    Dashed,
    Bidirectional,
    Undirected,
}

/// PlantUML diagram flavour produced by code generation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagramType {
    #[default]
    Sequence,
    Class,
    Usecase,
    Component,
}

impl DiagramType {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramType::Sequence => "sequence",
            DiagramType::Class => "class",
            DiagramType::Usecase => "usecase",
            DiagramType::Component => "component",
        }
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagramType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequence" => Ok(DiagramType::Sequence),
            "class" => Ok(DiagramType::Class),
            "usecase" | "use-case" => Ok(DiagramType::Usecase),
            "component" => Ok(DiagramType::Component),
            other => Err(format!("unknown diagram type `{other}`")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_actor_is_elliptic() {
        for kind in NodeKind::ALL {
            let expected = if kind == NodeKind::Actor {
                Outline::Ellipse
            } else {
                Outline::Rectangle
            };
            assert_eq!(kind.outline(), expected, "{kind:?}");
        }
    }

    #[test]
    fn test_default_sizes_are_positive() {
        for kind in NodeKind::ALL {
            assert!(kind.default_size().is_positive(), "{kind:?}");
        }
    }

    #[test]
    fn test_node_kind_serde() {
        let kind: NodeKind = serde_json::from_str("\"database\"").unwrap();
        assert_eq!(kind, NodeKind::Database);

        // Legacy token from older saves
        let legacy: NodeKind = serde_json::from_str("\"node\"").unwrap();
        assert_eq!(legacy, NodeKind::Generic);

        assert_eq!(
            serde_json::to_string(&NodeKind::Generic).unwrap(),
            "\"generic\""
        );
    }

    #[test]
    fn test_diagram_type_from_str() {
        assert_eq!("Sequence".parse(), Ok(DiagramType::Sequence));
        assert_eq!("use-case".parse(), Ok(DiagramType::Usecase));
        assert!("flowchart".parse::<DiagramType>().is_err());
    }

    #[test]
    fn test_diagram_type_round_trips_through_display() {
        for ty in [
            DiagramType::Sequence,
            DiagramType::Class,
            DiagramType::Usecase,
            DiagramType::Component,
        ] {
            assert_eq!(ty.to_string().parse(), Ok(ty));
        }
    }
}
