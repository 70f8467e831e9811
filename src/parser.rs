use std::fmt;

use quick_xml::de::from_str;
use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};
use tracing::error;
use urlencoding::encode;

use crate::{config::NotifierConfig, model::Article};

const DEFAULT_ENDPOINT: &str = "https://export.arxiv.org/api/query";

// URL query creator
macro_rules! arxiv_url {
    () => {
        concat!(
            "{}?search_query=all:{}",
            "&start={}&max_results={}&sortBy={}&sortOrder={}"
        )
    };
}

#[derive(Debug)]
pub struct ArxivFetcher {
    config: NotifierConfig,
    endpoint: String,
}

impl ArxivFetcher {
    pub fn from_config(config: NotifierConfig) -> Self {
        ArxivFetcher {
            config,
            endpoint: String::from(DEFAULT_ENDPOINT),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    fn create_query_url(&self) -> String {
        format!(
            arxiv_url!(),
            self.endpoint,
            encode(&self.config.topic),
            self.config.start,
            self.config.max_results,
            self.config.sort_by.as_str(),
            self.config.sort_order.as_str()
        )
    }

    async fn get_raw_xml(&self) -> String {
        let url = self.create_query_url();
        let response = match reqwest::get(url).await {
            Ok(response) => response,
            Err(e) => {
                error!("Failed to fetch feed: {}", e);
                return String::new();
            }
        };
        if !response.status().is_success() {
            error!("Feed request failed: HTTP {}", response.status());
            return String::new();
        }
        match response.text().await {
            Ok(body) => body,
            Err(e) => {
                error!("Failed to read response body: {}", e);
                String::new()
            }
        }
    }

    // Fetch failures never surface to the caller: an unreachable or
    // malformed feed reads as "no articles today".
    pub async fn fetch_articles(&self) -> Vec<Article> {
        let xml = self.get_raw_xml().await;
        if xml.is_empty() {
            return Vec::new();
        }
        let parsed: AtomFeed = match from_str(xml.as_str()) {
            Ok(feed) => feed,
            Err(e) => {
                error!("Failed to parse feed xml: {}", e);
                return Vec::new();
            }
        };
        parsed
            .entries
            .into_iter()
            .filter_map(AtomEntry::into_article)
            .take(self.config.max_results.max(0) as usize)
            .collect()
    }
}

// Atom Raw XML Model

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct AtomFeed {
    #[serde(rename = "entry")]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct AtomEntry {
    id: String,
    title: String,
    summary: Option<String>,
    #[serde(rename = "link", flatten, deserialize_with = "de_link")]
    links: Vec<LinkField>,
}

impl AtomEntry {
    // The entry <id> is the canonical abstract permalink; entries without
    // one fall back to their text/html alternate link.
    fn into_article(self) -> Option<Article> {
        let AtomEntry {
            id,
            title,
            summary,
            links,
        } = self;
        let link = if id.is_empty() {
            links
                .into_iter()
                .find(|field| matches!(field.link_type, Some(LinkType::Home)))
                .map(|field| field.href)
                .unwrap_or_default()
        } else {
            id
        };
        let title = title.replace('\n', " ").trim().to_string();
        if link.is_empty() || title.is_empty() {
            return None;
        }
        let summary = summary
            .map(|text| text.replace('\n', " ").trim().to_string())
            .filter(|text| !text.is_empty());
        Some(Article::new(link, title, summary))
    }
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
struct LinkField {
    #[serde(rename = "@href")]
    href: String,
    #[serde(rename = "@type")]
    link_type: Option<LinkType>,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
enum LinkType {
    #[serde(rename = "text/html")]
    Home,
    #[serde(rename = "application/pdf")]
    Pdf,
    #[default]
    Unknown,
}

fn de_link<'de, D>(deserializer: D) -> Result<Vec<LinkField>, D::Error>
where
    D: Deserializer<'de>,
{
    struct LinkVisitor;
    impl<'de> Visitor<'de> for LinkVisitor {
        type Value = Vec<LinkField>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("Map of children elements - filtering for field: `link`")
        }

        fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            let mut links = Vec::<LinkField>::new();
            while let Some(key) = access.next_key::<String>()? {
                if key == "link" {
                    let var = access.next_value::<LinkField>()?;
                    links.push(var);
                }
            }
            Ok(links)
        }
    }
    deserializer.deserialize_any(LinkVisitor {})
}

// end Atom Raw XML Model
