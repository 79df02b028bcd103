//! Section presence detection at the page boundary

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::section::Section;

static CLASS_ATTR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bclass\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Answers whether a section's container exists on the current page
pub trait SectionProbe {
    fn is_present(&self, section: Section) -> bool;
}

impl SectionProbe for [Section] {
    fn is_present(&self, section: Section) -> bool {
        self.contains(&section)
    }
}

impl SectionProbe for Vec<Section> {
    fn is_present(&self, section: Section) -> bool {
        self.as_slice().is_present(section)
    }
}

/// Probe over a page's markup, matching section marker classes
#[derive(Debug, Clone, Default)]
pub struct HtmlProbe {
    classes: HashSet<String>,
}

impl HtmlProbe {
    pub fn from_html(html: &str) -> Self {
        let classes = CLASS_ATTR_RE
            .captures_iter(html)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .flat_map(|value| value.as_str().split_whitespace())
            .map(str::to_string)
            .collect();
        Self { classes }
    }

    pub fn present_sections(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.is_present(*s))
            .collect()
    }
}

impl SectionProbe for HtmlProbe {
    fn is_present(&self, section: Section) -> bool {
        self.classes.contains(section.marker())
    }
}
