// Simplified view of one arXiv feed entry, rebuilt fresh on every fetch.
// Nothing is persisted between runs.

#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub link: String,
    pub title: String,
    pub summary: Option<String>,
}

impl Article {
    pub fn new(link: String, title: String, summary: Option<String>) -> Self {
        Article {
            link,
            title,
            summary,
        }
    }
}
