//! 衣橱条目与首页摘要

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 首页每个列表最多展示的条目数
pub const SUMMARY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WardrobeItem {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// 早期条目只有 `url` 字段
    #[serde(default)]
    pub url: Option<String>,
    /// 历史数据里既有布尔值也有字符串 "true"
    #[serde(default, deserialize_with = "bool_or_string")]
    pub is_liked: bool,
    #[serde(default, deserialize_with = "lenient_time")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient_time")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl WardrobeItem {
    /// 排序用的时间：优先 createdAt，其次 timestamp，都没有则视为纪元零点
    pub fn added_at(&self) -> DateTime<Utc> {
        self.created_at.or(self.timestamp).unwrap_or_default()
    }

    /// 展示用图片：`imageUrl`，其次 `url`
    pub fn image_src(&self) -> Option<&str> {
        [self.image_url.as_deref(), self.url.as_deref()]
            .into_iter()
            .flatten()
            .find(|src| !src.is_empty())
    }
}

/// 时间字段的宽松解析
///
/// 接受 RFC 3339 字符串、毫秒时间戳，以及 Firestore `Timestamp` 经 JSON 序列化后的
/// `{_seconds, _nanoseconds}` / `{seconds, nanoseconds}` 对象。
/// 无法识别的值记为 `None`，单个条目的坏时间不会导致整个列表解析失败。
fn lenient_time<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(time_from_value))
}

fn time_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(text) => DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            DateTime::<Utc>::from_timestamp_millis(millis)
        }
        Value::Object(map) => {
            let seconds = map
                .get("_seconds")
                .or_else(|| map.get("seconds"))?
                .as_i64()?;
            let nanos = map
                .get("_nanoseconds")
                .or_else(|| map.get("nanoseconds"))
                .and_then(Value::as_u64)
                .unwrap_or(0);
            DateTime::<Utc>::from_timestamp(seconds, u32::try_from(nanos).ok()?)
        }
        _ => None,
    }
}

fn bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Text(s)) => s == "true",
        None => false,
    })
}

/// `GET /api/wardrobe` 的响应，兼容 `{items: [...]}` 与裸数组两种形态
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WardrobeListResponse {
    Wrapped { items: Vec<WardrobeItem> },
    Bare(Vec<WardrobeItem>),
}

impl WardrobeListResponse {
    pub fn into_items(self) -> Vec<WardrobeItem> {
        match self {
            Self::Wrapped { items } => items,
            Self::Bare(items) => items,
        }
    }
}

/// 首页展示的两组条目
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WardrobeSummary {
    pub top_picks: Vec<WardrobeItem>,
    pub recently_added: Vec<WardrobeItem>,
}

impl WardrobeSummary {
    pub fn from_items(items: &[WardrobeItem]) -> Self {
        let mut sorted = items.to_vec();
        // 稳定排序，时间相同时保持原顺序
        sorted.sort_by(|a, b| b.added_at().cmp(&a.added_at()));
        sorted.truncate(SUMMARY_LIMIT);

        let top_picks = items
            .iter()
            .filter(|item| item.is_liked)
            .take(SUMMARY_LIMIT)
            .cloned()
            .collect();

        Self {
            top_picks,
            recently_added: sorted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, liked: bool, day: Option<u32>) -> WardrobeItem {
        WardrobeItem {
            id: id.to_string(),
            name: None,
            category: None,
            image_url: None,
            url: None,
            is_liked: liked,
            created_at: day.map(|d| Utc.with_ymd_and_hms(2025, 1, d, 0, 0, 0).unwrap()),
            timestamp: None,
        }
    }

    #[test]
    fn test_is_liked_accepts_string_flag() {
        let items: Vec<WardrobeItem> = serde_json::from_str(
            r#"[{"id":"a","isLiked":"true"},{"id":"b","isLiked":false},{"id":"c","isLiked":"no"},{"id":"d"}]"#,
        )
        .unwrap();
        let liked: Vec<_> = items.iter().map(|i| i.is_liked).collect();
        assert_eq!(liked, vec![true, false, false, false]);
    }

    #[test]
    fn test_firestore_timestamps_decode() {
        let body = r#"[
            {"id":"a","isLiked":true,"createdAt":{"_seconds":1700000000,"_nanoseconds":500000000}},
            {"id":"b"},
            {"id":"c","timestamp":{"seconds":1700000100,"nanoseconds":0}},
            {"id":"d","createdAt":"2025-01-05T10:00:00.000Z"},
            {"id":"e","createdAt":1736071200000},
            {"id":"f","createdAt":{"weird":1},"timestamp":"not a date"}
        ]"#;
        let items = serde_json::from_str::<WardrobeListResponse>(body)
            .unwrap()
            .into_items();
        assert_eq!(items.len(), 6);

        let expected_a = Utc.timestamp_opt(1_700_000_000, 500_000_000).unwrap();
        assert_eq!(items[0].created_at, Some(expected_a));
        assert_eq!(items[1].created_at, None);
        assert_eq!(items[2].timestamp, Utc.timestamp_opt(1_700_000_100, 0).single());
        assert_eq!(
            items[3].created_at,
            Some(Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).unwrap())
        );
        assert_eq!(
            items[4].created_at,
            Some(Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0).unwrap())
        );
        assert_eq!(items[5].created_at, None);
        assert_eq!(items[5].timestamp, None);

        let summary = WardrobeSummary::from_items(&items);
        assert_eq!(summary.top_picks[0].id, "a");
        assert_eq!(summary.recently_added[0].id, "d");
    }

    #[test]
    fn test_image_src_falls_back_to_url() {
        let items: Vec<WardrobeItem> = serde_json::from_str(
            r#"[{"id":"a","imageUrl":"a.png","url":"old.png"},{"id":"b","url":"b.png"},{"id":"c","imageUrl":""}]"#,
        )
        .unwrap();
        assert_eq!(items[0].image_src(), Some("a.png"));
        assert_eq!(items[1].image_src(), Some("b.png"));
        assert_eq!(items[2].image_src(), None);
    }

    #[test]
    fn test_list_response_shapes() {
        let wrapped: WardrobeListResponse =
            serde_json::from_str(r#"{"items":[{"id":"a"}]}"#).unwrap();
        assert_eq!(wrapped.into_items().len(), 1);

        let bare: WardrobeListResponse = serde_json::from_str(r#"[{"id":"a"},{"id":"b"}]"#).unwrap();
        assert_eq!(bare.into_items().len(), 2);
    }

    #[test]
    fn test_summary_orders_newest_first() {
        let items = vec![item("old", false, Some(1)), item("none", false, None), item("new", true, Some(9))];
        let summary = WardrobeSummary::from_items(&items);
        let ids: Vec<_> = summary.recently_added.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old", "none"]);
        assert_eq!(summary.top_picks.len(), 1);
        assert_eq!(summary.top_picks[0].id, "new");
    }

    #[test]
    fn test_summary_falls_back_to_timestamp() {
        let mut stamped = item("stamped", false, None);
        stamped.timestamp = Some(Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap());
        let items = vec![item("early", false, Some(2)), stamped];
        let summary = WardrobeSummary::from_items(&items);
        assert_eq!(summary.recently_added[0].id, "stamped");
    }

    #[test]
    fn test_summary_limits_lists() {
        let items: Vec<_> = (1..=15).map(|d| item(&d.to_string(), true, Some(d))).collect();
        let summary = WardrobeSummary::from_items(&items);
        assert_eq!(summary.top_picks.len(), SUMMARY_LIMIT);
        assert_eq!(summary.recently_added.len(), SUMMARY_LIMIT);
        assert_eq!(summary.recently_added[0].id, "15");
        assert_eq!(summary.top_picks[0].id, "1");
    }
}
