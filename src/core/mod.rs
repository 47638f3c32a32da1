pub mod data;
pub mod frontmatter;
pub mod markdown;
pub mod posts;
pub mod reading;
pub mod settings;
