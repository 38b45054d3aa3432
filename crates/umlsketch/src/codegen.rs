//! PlantUML text generation.
//!
//! [`generate`] turns a [`Diagram`] into PlantUML source for its
//! [`DiagramType`]. The output is plain text wrapped in `@startuml` /
//! `@enduml`; nothing is parsed or validated.
//!
//! Node ids become aliases, so every declaration and relation refers to a
//! node by its sanitized id while the label is kept for display. Class
//! diagrams are the exception: PlantUML classes are referenced by name, so
//! the sanitized label is used throughout.

use log::debug;

use umlsketch_core::model::{DiagramType, EdgeStyle, NodeKind};

use crate::diagram::{Diagram, Edge, Node};

/// Generates PlantUML source for `diagram`.
///
/// # Examples
///
/// ```
/// # use rand::{SeedableRng, rngs::StdRng};
/// # use umlsketch::{codegen, diagram::Diagram};
/// # use umlsketch_core::model::{DiagramType, EdgeStyle, NodeKind};
/// let mut rng = StdRng::seed_from_u64(0);
/// let mut diagram = Diagram::new(DiagramType::Sequence);
/// let user = diagram.add_node(NodeKind::Actor, &mut rng);
/// let server = diagram.add_node(NodeKind::Generic, &mut rng);
/// diagram.connect(user, server, EdgeStyle::Solid).unwrap();
///
/// assert_eq!(
///     codegen::generate(&diagram),
///     "@startuml\n\
///      actor \"Actor1\" as node_0\n\
///      participant \"Node2\" as node_1\n\
///      \n\
///      node_0 -> node_1: Message\n\
///      @enduml"
/// );
/// ```
pub fn generate(diagram: &Diagram) -> String {
    debug!(
        diagram_type:% = diagram.diagram_type(),
        node_count = diagram.node_count(),
        edge_count = diagram.edges().len();
        "Generating PlantUML"
    );

    let mut out = String::from("@startuml\n");
    match diagram.diagram_type() {
        DiagramType::Sequence => write_sequence(diagram, &mut out),
        DiagramType::Class => write_class(diagram, &mut out),
        DiagramType::Usecase => write_usecase(diagram, &mut out),
        DiagramType::Component => write_component(diagram, &mut out),
    }
    out.push_str("@enduml");
    out
}

fn write_sequence(diagram: &Diagram, out: &mut String) {
    for node in diagram.nodes() {
        let keyword = match node.kind() {
            NodeKind::Actor => "actor",
            _ => "participant",
        };
        write_declaration(keyword, node, out);
    }
    out.push('\n');

    for edge in diagram.edges() {
        write_relation(edge, sequence_arrow(edge.style()), out);
        out.push_str(": Message\n");
    }
}

fn write_class(diagram: &Diagram, out: &mut String) {
    for node in diagram.nodes() {
        out.push_str("class ");
        out.push_str(&class_name(node));
        out.push_str(" {\n  +field1\n  +method1()\n}\n\n");
    }

    for edge in diagram.edges() {
        let (Some(from), Some(to)) = (diagram.node(edge.from()), diagram.node(edge.to())) else {
            continue;
        };
        out.push_str(&class_name(from));
        out.push(' ');
        out.push_str(relation_arrow(edge.style()));
        out.push(' ');
        out.push_str(&class_name(to));
        out.push('\n');
    }
}

fn write_usecase(diagram: &Diagram, out: &mut String) {
    for node in diagram.nodes() {
        let keyword = match node.kind() {
            NodeKind::Actor => "actor",
            _ => "usecase",
        };
        write_declaration(keyword, node, out);
    }
    out.push('\n');

    for edge in diagram.edges() {
        write_relation(edge, relation_arrow(edge.style()), out);
        out.push('\n');
    }
}

fn write_component(diagram: &Diagram, out: &mut String) {
    for node in diagram.nodes() {
        let keyword = match node.kind() {
            NodeKind::Database => "database",
            _ => "component",
        };
        write_declaration(keyword, node, out);
    }
    out.push('\n');

    for edge in diagram.edges() {
        write_relation(edge, relation_arrow(edge.style()), out);
        out.push('\n');
    }
}

/// `keyword "label" as alias`
fn write_declaration(keyword: &str, node: &Node, out: &mut String) {
    out.push_str(keyword);
    out.push_str(" \"");
    out.push_str(&sanitize_label(node.label().trim()));
    out.push_str("\" as ");
    out.push_str(&sanitize_alias(&node.id().as_string()));
    out.push('\n');
}

/// `from arrow to`, without a line break.
fn write_relation(edge: &Edge, arrow: &str, out: &mut String) {
    out.push_str(&sanitize_alias(&edge.from().as_string()));
    out.push(' ');
    out.push_str(arrow);
    out.push(' ');
    out.push_str(&sanitize_alias(&edge.to().as_string()));
}

fn class_name(node: &Node) -> String {
    let name = sanitize_class_name(node.label().trim());
    if name.is_empty() {
        sanitize_alias(&node.id().as_string())
    } else {
        name
    }
}

/// Message arrow of a sequence diagram.
pub fn sequence_arrow(style: EdgeStyle) -> &'static str {
    match style {
        EdgeStyle::Solid | EdgeStyle::Undirected => "->",
        EdgeStyle::Dashed => "-->",
        EdgeStyle::Bidirectional => "<->",
    }
}

/// Relation arrow of class, use case and component diagrams.
pub fn relation_arrow(style: EdgeStyle) -> &'static str {
    match style {
        EdgeStyle::Solid => "-->",
        EdgeStyle::Dashed => "..>",
        EdgeStyle::Bidirectional => "<-->",
        EdgeStyle::Undirected => "--",
    }
}

/// Escapes backslashes and double quotes for use inside a quoted label.
pub fn sanitize_label(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        if matches!(c, '\\' | '"') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Replaces every character outside `[A-Za-z0-9_]` with `_`.
pub fn sanitize_alias(alias: &str) -> String {
    alias
        .chars()
        .map(|c| if is_identifier_char(c) { c } else { '_' })
        .collect()
}

/// Drops every character outside `[A-Za-z0-9_]`.
pub fn sanitize_class_name(name: &str) -> String {
    name.chars().filter(|&c| is_identifier_char(c)).collect()
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use umlsketch_core::{geometry::Point, identifier::NodeId};

    use super::*;

    fn diagram(diagram_type: DiagramType, nodes: &[(&str, NodeKind, &str)]) -> Diagram {
        let mut diagram = Diagram::new(diagram_type);
        for &(id, kind, label) in nodes {
            diagram.insert_node(Node::new(NodeId::new(id), kind, label, Point::default()));
        }
        diagram
    }

    fn connect(diagram: &mut Diagram, from: &str, to: &str, style: EdgeStyle) {
        diagram
            .connect(NodeId::new(from), NodeId::new(to), style)
            .unwrap();
    }

    #[test]
    fn test_empty_diagram() {
        let diagram = Diagram::new(DiagramType::Sequence);
        assert_eq!(generate(&diagram), "@startuml\n\n@enduml");

        let diagram = Diagram::new(DiagramType::Class);
        assert_eq!(generate(&diagram), "@startuml\n@enduml");
    }

    #[test]
    fn test_sequence_styles() {
        let mut diagram = diagram(
            DiagramType::Sequence,
            &[
                ("seq-1", NodeKind::Actor, "User"),
                ("seq-2", NodeKind::Database, "Store"),
            ],
        );
        connect(&mut diagram, "seq-1", "seq-2", EdgeStyle::Dashed);
        connect(&mut diagram, "seq-2", "seq-1", EdgeStyle::Bidirectional);

        assert_eq!(
            generate(&diagram),
            "@startuml\n\
             actor \"User\" as seq_1\n\
             participant \"Store\" as seq_2\n\
             \n\
             seq_1 --> seq_2: Message\n\
             seq_2 <-> seq_1: Message\n\
             @enduml"
        );
    }

    #[test]
    fn test_class_diagram() {
        let mut diagram = diagram(
            DiagramType::Class,
            &[
                ("cls-1", NodeKind::Class, " Order Line "),
                ("cls-2", NodeKind::Class, "!!!"),
            ],
        );
        connect(&mut diagram, "cls-1", "cls-2", EdgeStyle::Solid);
        connect(&mut diagram, "cls-2", "cls-1", EdgeStyle::Undirected);

        assert_eq!(
            generate(&diagram),
            "@startuml\n\
             class OrderLine {\n  +field1\n  +method1()\n}\n\n\
             class cls_2 {\n  +field1\n  +method1()\n}\n\n\
             OrderLine --> cls_2\n\
             cls_2 -- OrderLine\n\
             @enduml"
        );
    }

    #[test]
    fn test_usecase_diagram() {
        let mut diagram = diagram(
            DiagramType::Usecase,
            &[
                ("uc-1", NodeKind::Actor, "Customer"),
                ("uc-2", NodeKind::Generic, "Check out"),
            ],
        );
        connect(&mut diagram, "uc-1", "uc-2", EdgeStyle::Solid);

        assert_eq!(
            generate(&diagram),
            "@startuml\n\
             actor \"Customer\" as uc_1\n\
             usecase \"Check out\" as uc_2\n\
             \n\
             uc_1 --> uc_2\n\
             @enduml"
        );
    }

    #[test]
    fn test_component_diagram() {
        let mut diagram = diagram(
            DiagramType::Component,
            &[
                ("cmp-1", NodeKind::Component, "API"),
                ("cmp-2", NodeKind::Database, "say \"hi\""),
            ],
        );
        connect(&mut diagram, "cmp-1", "cmp-2", EdgeStyle::Dashed);

        assert_eq!(
            generate(&diagram),
            "@startuml\n\
             component \"API\" as cmp_1\n\
             database \"say \\\"hi\\\"\" as cmp_2\n\
             \n\
             cmp_1 ..> cmp_2\n\
             @enduml"
        );
    }

    #[test]
    fn test_sanitizers() {
        assert_eq!(sanitize_label(r#"a\b"c"#), r#"a\\b\"c"#);
        assert_eq!(sanitize_alias("node-1.x y"), "node_1_x_y");
        assert_eq!(sanitize_alias("café"), "caf_");
        assert_eq!(sanitize_class_name("My Class<T>"), "MyClassT");
        assert_eq!(sanitize_class_name(""), "");
    }

    #[test]
    fn test_arrow_tokens() {
        assert_eq!(sequence_arrow(EdgeStyle::Undirected), "->");
        assert_eq!(relation_arrow(EdgeStyle::Bidirectional), "<-->");
    }
}
