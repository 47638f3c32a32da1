use serde::{Deserialize, Serialize};

use crate::core::{frontmatter::FrontMatter, markdown::TocEntry};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Nav {
    pub projects: String,
    pub blog: String,
    pub about: String,
    pub contact: String,
}

/// Translated UI strings from `{lang}/index.json`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct HomeContent {
    pub hero_title: String,
    pub hero_subtitle: String,
    pub nav: Nav,
    pub projects_title: String,
    pub projects_subtitle: String,
    pub blog_title: String,
    pub blog_subtitle: String,
    pub about_title: String,
    pub about_text: Vec<String>,
    pub contact_title: Option<String>,
    pub cta_projects: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ProjectLinks {
    pub github: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub links: Option<ProjectLinks>,
}

impl Project {
    pub fn link(&self) -> &str {
        self.links
            .as_ref()
            .and_then(|links| links.github.as_deref())
            .unwrap_or("#")
    }
}

/// One entry of the blog list: the front matter of a post plus its slug.
#[derive(Serialize, Clone, Debug)]
pub struct PostSummary {
    pub slug: String,
    pub title: Option<String>,
    pub date: Option<String>,
    pub minutes: Option<u32>,
    pub excerpt: Option<String>,
    pub image: Option<String>,
    pub tags: Vec<String>,
}

impl PostSummary {
    pub fn from_meta(slug: &str, meta: &FrontMatter) -> Self {
        PostSummary {
            slug: slug.to_string(),
            title: meta.title().map(str::to_string),
            date: meta.date().map(str::to_string),
            minutes: meta.minutes(),
            excerpt: meta.excerpt().map(str::to_string),
            image: meta.image().map(str::to_string),
            tags: meta.tags(),
        }
    }

    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let hit = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&query))
        };
        hit(&self.title) || hit(&self.excerpt)
    }
}

/// A fully rendered post.
#[derive(Serialize, Clone, Debug)]
pub struct Post {
    pub slug: String,
    pub meta: FrontMatter,
    pub minutes: u32,
    pub html: String,
    pub toc: Vec<TocEntry>,
}
