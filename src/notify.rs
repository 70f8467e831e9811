use std::sync::Arc;

use notify_rust::Notification;
#[cfg(all(unix, not(target_os = "macos")))]
use notify_rust::Urgency;
use tracing::{error, info};

use crate::{error::Result, model::Article};

const DEFAULT_SOUND: &str = "message-new-instant";
const CLICK_ACTION: &str = "default";
const CLOSE_ACTION: &str = "__closed";

// Capability invoked when the user interacts with a notification.
pub trait NotificationSink: Send + Sync {
    fn on_clicked(&self, link: &str);
    fn on_dismissed(&self, link: &str);
}

// Production sink: a click opens the article in the default browser.
pub struct BrowserSink;

impl NotificationSink for BrowserSink {
    fn on_clicked(&self, link: &str) {
        info!("Notification clicked, opening {}", link);
        if let Err(e) = open::that_detached(link) {
            error!("Failed to open browser for {}: {}", link, e);
        }
    }

    fn on_dismissed(&self, link: &str) {
        info!("Notification for {} dismissed", link);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub link: String,
    pub summary: String,
    pub body: String,
}

pub fn build_notices(articles: &[Article]) -> Vec<Notice> {
    articles
        .iter()
        .map(|article| Notice {
            link: article.link.clone(),
            summary: format!("Title: {}", article.title),
            body: format!("Link: {}", article.link),
        })
        .collect()
}

// Maps a platform action name to the sink call for that notification.
pub fn route_action(action: &str, link: &str, sink: &dyn NotificationSink) {
    match action {
        CLICK_ACTION => sink.on_clicked(link),
        CLOSE_ACTION => sink.on_dismissed(link),
        _ => {}
    }
}

pub struct Dispatcher {
    app_name: String,
    sink: Arc<dyn NotificationSink>,
}

impl Dispatcher {
    pub fn new(app_name: String, sink: Arc<dyn NotificationSink>) -> Self {
        Dispatcher { app_name, sink }
    }

    // One notification per article, in feed order. Send errors propagate.
    pub fn dispatch(&self, articles: &[Article]) -> Result<usize> {
        let notices = build_notices(articles);
        let count = notices.len();
        for notice in notices {
            self.send(notice)?;
        }
        Ok(count)
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn send(&self, notice: Notice) -> Result<()> {
        let handle = Notification::new()
            .appname(&self.app_name)
            .summary(&notice.summary)
            .body(&notice.body)
            .urgency(Urgency::Normal)
            .sound_name(DEFAULT_SOUND)
            .action(CLICK_ACTION, "Open")
            .show()?;
        // Each wait owns a moved copy of its article link, so a click always
        // opens the article it was raised for.
        let sink = Arc::clone(&self.sink);
        let link = notice.link;
        std::thread::spawn(move || {
            handle.wait_for_action(|action| route_action(action, &link, sink.as_ref()));
        });
        Ok(())
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn send(&self, notice: Notice) -> Result<()> {
        // No action callbacks outside XDG platforms; fire and forget.
        let _ = Notification::new()
            .appname(&self.app_name)
            .summary(&notice.summary)
            .body(&notice.body)
            .sound_name(DEFAULT_SOUND)
            .show()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl NotificationSink for RecordingSink {
        fn on_clicked(&self, link: &str) {
            self.events.lock().unwrap().push(format!("clicked {}", link));
        }

        fn on_dismissed(&self, link: &str) {
            self.events.lock().unwrap().push(format!("dismissed {}", link));
        }
    }

    fn sample_articles() -> Vec<Article> {
        vec![
            Article::new(
                String::from("http://arxiv.org/abs/2401.00001v1"),
                String::from("A"),
                None,
            ),
            Article::new(
                String::from("http://arxiv.org/abs/2401.00002v1"),
                String::from("B"),
                Some(String::from("second abstract")),
            ),
        ]
    }

    #[test]
    fn test_one_notice_per_article_in_feed_order() {
        let notices = build_notices(&sample_articles());
        assert_eq!(notices.len(), 2);
        assert!(notices[0].summary.contains("A"));
        assert!(notices[0].body.contains("http://arxiv.org/abs/2401.00001v1"));
        assert!(notices[1].summary.contains("B"));
        assert!(notices[1].body.contains("http://arxiv.org/abs/2401.00002v1"));
    }

    #[test]
    fn test_no_articles_build_no_notices() {
        assert!(build_notices(&[]).is_empty());
    }

    #[test]
    fn test_click_routes_to_sink_with_link() {
        let sink = RecordingSink::default();
        route_action(CLICK_ACTION, "http://arxiv.org/abs/2401.00001v1", &sink);
        assert_eq!(
            sink.events(),
            vec![String::from("clicked http://arxiv.org/abs/2401.00001v1")]
        );
    }

    #[test]
    fn test_close_routes_to_dismissed() {
        let sink = RecordingSink::default();
        route_action(CLOSE_ACTION, "http://arxiv.org/abs/2401.00002v1", &sink);
        assert_eq!(
            sink.events(),
            vec![String::from("dismissed http://arxiv.org/abs/2401.00002v1")]
        );
    }

    #[test]
    fn test_unknown_action_is_ignored() {
        let sink = RecordingSink::default();
        route_action("other", "http://arxiv.org/abs/2401.00003v1", &sink);
        assert!(sink.events().is_empty());
    }
}
