use select::node::Node;
use select::predicate::Predicate;

/// Matches elements by tag name and a set of classes that must all be present.
///
/// Listing markup carries generated class names next to stable `f-test-*`
/// hooks, so selectors match on a subset rather than the exact attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassSelector {
    pub tag: &'static str,
    pub classes: &'static [&'static str],
}

impl ClassSelector {
    pub const fn new(tag: &'static str, classes: &'static [&'static str]) -> Self {
        Self { tag, classes }
    }
}

impl Predicate for ClassSelector {
    fn matches(&self, node: &Node) -> bool {
        if node.name() != Some(self.tag) {
            return false;
        }
        let Some(attr) = node.attr("class") else {
            return self.classes.is_empty();
        };
        self.classes
            .iter()
            .all(|wanted| attr.split_whitespace().any(|have| have == *wanted))
    }
}

/// Element text with surrounding whitespace removed.
pub fn text_of(node: &Node) -> String {
    node.text().trim().to_string()
}

/// First descendant of `node` matching `selector`.
pub fn first<'a>(node: &Node<'a>, selector: ClassSelector) -> Option<Node<'a>> {
    node.find(selector).next()
}
