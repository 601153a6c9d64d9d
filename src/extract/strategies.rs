//! Topic section strategies
//!
//! Each strategy looks for the part of a page that describes a program using
//! a different structural cue. They share one signature so the extractor can
//! try them in order and stop at the first that yields text.

use crate::extract::{element_text, join_texts, select_all};
use scraper::{ElementRef, Html};

/// Keyword every strategy searches for, matched case-insensitively
pub const TOPIC_KEYWORD: &str = "program";

/// Signature shared by all topic strategies
pub type StrategyFn = fn(&Html) -> Option<String>;

/// A named topic strategy
#[derive(Clone, Copy)]
pub struct TopicStrategy {
    pub name: &'static str,
    pub run: StrategyFn,
}

impl std::fmt::Debug for TopicStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("TopicStrategy").field(&self.name).finish()
    }
}

/// Strategies in priority order
pub const DEFAULT_STRATEGIES: [TopicStrategy; 3] = [
    TopicStrategy {
        name: "id-attribute",
        run: by_id,
    },
    TopicStrategy {
        name: "class-attribute",
        run: by_class,
    },
    TopicStrategy {
        name: "heading-siblings",
        run: by_heading_siblings,
    },
];

fn contains_keyword(value: &str) -> bool {
    value.to_lowercase().contains(TOPIC_KEYWORD)
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Text of every element whose `id` contains the keyword
pub fn by_id(document: &Html) -> Option<String> {
    by_attribute(document, "id")
}

/// Text of every element whose `class` attribute contains the keyword
pub fn by_class(document: &Html) -> Option<String> {
    by_attribute(document, "class")
}

/// Joins the outermost elements whose `attr` contains the keyword
///
/// A match nested inside another match is already part of its text.
fn by_attribute(document: &Html, attr: &str) -> Option<String> {
    let is_match =
        |el: &ElementRef| el.value().attr(attr).is_some_and(contains_keyword);

    let matches = select_all(document, &format!("[{}]", attr))
        .into_iter()
        .filter(|el| is_match(el))
        .filter(|el| {
            !el.ancestors()
                .filter_map(ElementRef::wrap)
                .any(|ancestor| is_match(&ancestor))
        });
    non_empty(join_texts(matches))
}

/// Text of the siblings following the first keyword heading that has any
///
/// Collection stops at the next `h1`-`h4` sibling.
pub fn by_heading_siblings(document: &Html) -> Option<String> {
    select_all(document, "h1, h2, h3, h4")
        .into_iter()
        .filter(|heading| contains_keyword(&element_text(heading)))
        .find_map(|heading| non_empty(join_texts(section_after(heading))))
}

fn is_section_heading(element: &ElementRef) -> bool {
    matches!(element.value().name(), "h1" | "h2" | "h3" | "h4")
}

fn section_after(heading: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|sibling| !is_section_heading(sibling))
        .collect()
}
