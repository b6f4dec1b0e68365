//! 连续打卡页
//!
//! 一周七格，从周一开始；今天及之前标记为完成。

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use wardrobe_shared::{PageName, PageParams};

use crate::error::NavResult;
use crate::registry::PageController;
use crate::scope::PageScope;

const STREAK_PARAM: &str = "loginStreak";

#[derive(Default)]
pub struct StreaksController {
    today: Option<NaiveDate>,
}

impl StreaksController {
    pub fn new() -> Self {
        Self { today: None }
    }

    #[cfg(test)]
    pub fn on_date(today: NaiveDate) -> Self {
        Self { today: Some(today) }
    }
}

/// 周一为 0，周日为 6
pub(crate) fn monday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

/// 打卡天数：优先使用参数，否则为本周已过天数
pub(crate) fn streak_length(params: &PageParams, day_index: usize) -> i64 {
    params
        .get_int(STREAK_PARAM)
        .unwrap_or(day_index as i64 + 1)
}

/// 火焰图标等级：1-7 / 8-15 / 16-21 / 22+
pub(crate) fn flame_tier(length: i64) -> u8 {
    match length {
        i64::MIN..=7 => 1,
        8..=15 => 2,
        16..=21 => 3,
        _ => 4,
    }
}

#[async_trait(?Send)]
impl PageController for StreaksController {
    fn page(&self) -> PageName {
        PageName::Streaks
    }

    async fn init(&mut self, scope: &PageScope, params: &PageParams) -> NavResult<()> {
        scope.require_root()?;

        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let index = monday_index(today);
        for day in 0..7 {
            let id = format!("streaks-day-{}", day);
            scope.set_class(&id, "completed", day <= index);
            scope.set_class(&id, "today", day == index);
        }

        let length = streak_length(params, index);
        scope.set_text("streaks-count", &length.to_string());
        scope.set_text("streaks-day-count", &length.to_string());
        let icon = scope
            .config()
            .asset_url(&format!("images/streaks-icon-{}.png", flame_tier(length)));
        scope.set_attribute("streaks-flame-img", "src", &icon);

        let navigate = scope.clone();
        scope.on("streaks-back-btn", "click", move || {
            navigate.request(PageName::Calendar, PageParams::new());
        });
        Ok(())
    }
}
