//! Sidebar outline: guide sections plus generated package listings.

use serde::Deserialize;

use super::package::{PackageIndex, Tier};
use super::route::Route;

/// Outline as written in `assets/outline.toml`.
#[derive(Debug, Deserialize)]
struct OutlineSpec {
    default_section: String,
    sections: Vec<SectionSpec>,
}

#[derive(Debug, Deserialize)]
struct SectionSpec {
    id: String,
    title: String,
    /// Guide id the section header links to
    header: Option<String>,
    #[serde(default)]
    entries: Vec<EntrySpec>,
    packages: Option<Tier>,
}

#[derive(Debug, Deserialize)]
struct EntrySpec {
    title: String,
    guide: String,
}

/// Navigation link in the sidebar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    /// Link target including the leading `#`
    pub href: String,
    /// Nested links (modules under a package entry)
    pub children: Vec<Entry>,
    /// Markdown summary shown under package entries
    pub summary: Option<String>,
}

impl Entry {
    fn guide(title: &str, id: &str) -> Self {
        Self {
            title: title.to_string(),
            href: Route::Guide {
                path: id.to_string(),
            }
            .to_hash(),
            children: Vec::new(),
            summary: None,
        }
    }

    fn contains(&self, href: &str) -> bool {
        self.href == href || self.children.iter().any(|c| c.contains(href))
    }
}

/// Collapsible group of sidebar entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub title: String,
    /// Link rendered as the section header, if any
    pub header: Option<Entry>,
    pub entries: Vec<Entry>,
    /// Package tier listed in this section
    pub packages: Option<Tier>,
}

impl Section {
    /// True if `href` is linked from the section body (not its header).
    pub fn contains(&self, href: &str) -> bool {
        self.entries.iter().any(|e| e.contains(href))
    }
}

/// Complete sidebar outline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outline {
    /// Section shown when the URL has no fragment
    pub default_section: String,
    pub sections: Vec<Section>,
}

impl Outline {
    /// Parse the TOML outline.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let spec: OutlineSpec = toml::from_str(text)?;
        let sections = spec
            .sections
            .into_iter()
            .map(|s| Section {
                header: s.header.as_deref().map(|id| Entry::guide(&s.title, id)),
                entries: s
                    .entries
                    .iter()
                    .map(|e| Entry::guide(&e.title, &e.guide))
                    .collect(),
                id: s.id,
                title: s.title,
                packages: s.packages,
            })
            .collect();

        Ok(Self {
            default_section: spec.default_section,
            sections,
        })
    }

    /// Fill package sections with one entry per package of their tier,
    /// each listing its modules.
    pub fn with_packages(mut self, index: &PackageIndex) -> Self {
        for section in &mut self.sections {
            let Some(tier) = section.packages else {
                continue;
            };
            section.entries = index
                .packages(tier)
                .map(|pkg| Entry {
                    title: pkg.name.clone(),
                    href: Route::Package {
                        name: pkg.name.clone(),
                    }
                    .to_hash(),
                    children: pkg
                        .modules()
                        .into_iter()
                        .map(|module| Entry {
                            href: Route::Module {
                                package: pkg.name.clone(),
                                module: module.clone(),
                            }
                            .to_hash(),
                            title: module,
                            children: Vec::new(),
                            summary: None,
                        })
                        .collect(),
                    summary: pkg.readme.clone(),
                })
                .collect();
        }
        self
    }
}
