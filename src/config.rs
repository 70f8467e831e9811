use dotenvy;
use std::{env, process};

const ENV_FILE: &str = "notifier.env";

// Sort field accepted by the arXiv query API.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortBy {
    Relevance,
    LastUpdatedDate,
    SubmittedDate,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::LastUpdatedDate => "lastUpdatedDate",
            SortBy::SubmittedDate => "submittedDate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub topic: String,
    pub start: i32,
    pub max_results: i32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
    pub app_name: String,
}

#[allow(dead_code)]
impl NotifierConfig {
    pub fn default() -> Self {
        NotifierConfig {
            topic: String::from("machine learning"),
            start: 0,
            max_results: 5,
            hour: 17,
            minute: 30,
            second: 0,
            sort_by: SortBy::LastUpdatedDate,
            sort_order: SortOrder::Descending,
            app_name: String::from("arXiv Notifier"),
        }
    }

    // Defaults overridden by notifier.env / process environment.
    pub fn from_env() -> Self {
        dotenvy::from_filename(ENV_FILE).ok();
        let defaults = Self::default();
        let config = NotifierConfig {
            topic: get_env_or("TOPIC", defaults.topic),
            start: get_i32_from_env("START", defaults.start),
            max_results: get_i32_from_env("MAX_RESULTS", defaults.max_results),
            hour: get_u32_from_env("NOTIFY_HOUR", defaults.hour),
            minute: get_u32_from_env("NOTIFY_MINUTE", defaults.minute),
            second: get_u32_from_env("NOTIFY_SECOND", defaults.second),
            sort_by: get_sort_by_from_env("SORT_BY", defaults.sort_by),
            sort_order: get_sort_order_from_env("SORT_ORDER", defaults.sort_order),
            app_name: get_env_or("APP_NAME", defaults.app_name),
        };
        config.validate();
        config
    }

    fn validate(&self) {
        assert!(self.start >= 0, "START must be non-negative");
        assert!(self.max_results >= 0, "MAX_RESULTS must be non-negative");
        assert!(self.hour < 24, "NOTIFY_HOUR must be in 0..=23");
        assert!(self.minute < 60, "NOTIFY_MINUTE must be in 0..=59");
        assert!(self.second < 60, "NOTIFY_SECOND must be in 0..=59");
        assert!(!self.topic.is_empty(), "TOPIC must not be empty");
    }
}

fn get_env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn get_i32_from_env(key: &str, default: i32) -> i32 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Failed to parse {} as i32", key);
            process::exit(1);
        }),
        Err(_) => default,
    }
}

fn get_u32_from_env(key: &str, default: u32) -> u32 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Failed to parse {} as u32", key);
            process::exit(1);
        }),
        Err(_) => default,
    }
}

fn get_sort_by_from_env(key: &str, default: SortBy) -> SortBy {
    match env::var(key) {
        Ok(raw) => match raw.as_str() {
            "relevance" => SortBy::Relevance,
            "lastUpdatedDate" => SortBy::LastUpdatedDate,
            "submittedDate" => SortBy::SubmittedDate,
            _ => {
                eprintln!("{} must be one of relevance|lastUpdatedDate|submittedDate", key);
                process::exit(1);
            }
        },
        Err(_) => default,
    }
}

fn get_sort_order_from_env(key: &str, default: SortOrder) -> SortOrder {
    match env::var(key) {
        Ok(raw) => match raw.as_str() {
            "ascending" => SortOrder::Ascending,
            "descending" => SortOrder::Descending,
            _ => {
                eprintln!("{} must be ascending or descending", key);
                process::exit(1);
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NotifierConfig::default();
        assert_eq!(config.topic, "machine learning");
        assert_eq!(config.max_results, 5);
        assert_eq!((config.hour, config.minute, config.second), (17, 30, 0));
        assert_eq!(config.sort_by, SortBy::LastUpdatedDate);
        assert_eq!(config.sort_order, SortOrder::Descending);
        config.validate();
    }

    #[test]
    fn test_sort_params_render_as_api_values() {
        assert_eq!(SortBy::LastUpdatedDate.as_str(), "lastUpdatedDate");
        assert_eq!(SortBy::SubmittedDate.as_str(), "submittedDate");
        assert_eq!(SortOrder::Descending.as_str(), "descending");
    }
}
