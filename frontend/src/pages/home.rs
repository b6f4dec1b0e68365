use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use wardrobe_shared::{PageName, PageParams, WardrobeSummary};

use crate::error::NavResult;
use crate::log::log_warn;
use crate::registry::PageController;
use crate::scope::PageScope;

use super::render_items;

const TOP_PICKS: (&str, &str) = ("top-picks-container", "top-picks-empty");
const RECENTLY_ADDED: (&str, &str) = ("recently-added-container", "recently-added-empty");

#[derive(Default)]
pub struct HomeController {
    /// 测试中固定日期
    today: Option<NaiveDate>,
}

impl HomeController {
    pub fn new() -> Self {
        Self { today: None }
    }

    #[cfg(test)]
    pub fn on_date(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }
}

/// 日期标签：("Mon", "Jan 5")
pub(crate) fn date_labels(date: NaiveDate) -> (String, String) {
    (
        date.format("%a").to_string(),
        date.format("%b %-d").to_string(),
    )
}

async fn load_summary(scope: PageScope, uid: String) {
    let items = match scope.backend().fetch_wardrobe(&uid).await {
        Ok(items) => items,
        Err(e) => {
            log_warn!("[Home] Failed to load wardrobe: {}", e);
            Vec::new()
        }
    };
    let summary = WardrobeSummary::from_items(&items);
    render_items(&scope, TOP_PICKS.0, TOP_PICKS.1, &summary.top_picks);
    render_items(&scope, RECENTLY_ADDED.0, RECENTLY_ADDED.1, &summary.recently_added);
}

#[async_trait(?Send)]
impl PageController for HomeController {
    fn page(&self) -> PageName {
        PageName::Home
    }

    async fn init(&mut self, scope: &PageScope, _params: &PageParams) -> NavResult<()> {
        scope.require_root()?;

        let navigate = scope.clone();
        scope.on("home-calendar-btn", "click", move || {
            navigate.request(PageName::Calendar, PageParams::new());
        });

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let (day, main) = date_labels(today);
        scope.set_text("home-date-day", &day);
        scope.set_text("home-date-main", &main);

        match scope.current_user() {
            Some(user) => scope.spawn(load_summary(scope.clone(), user.uid)),
            None => {
                render_items(scope, TOP_PICKS.0, TOP_PICKS.1, &[]);
                render_items(scope, RECENTLY_ADDED.0, RECENTLY_ADDED.1, &[]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_labels() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(date_labels(date), ("Mon".to_string(), "Jan 5".to_string()));

        let date = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        assert_eq!(date_labels(date), ("Sun".to_string(), "Oct 18".to_string()));
    }
}
