//! 前端与测试共用的领域模型

pub use chrono;

pub mod page;
pub mod user;
pub mod wardrobe;

pub use page::{PageName, PageParams, ParamValue};
pub use user::{AuthUser, UserProfile};
pub use wardrobe::{WardrobeItem, WardrobeListResponse, WardrobeSummary};

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 导航自定义事件名，payload 为 `{ page: PageName }`
pub const NAVIGATE_EVENT: &str = "navigate";
