use async_trait::async_trait;
use wardrobe_shared::{UserProfile, WardrobeItem};

use crate::error::NavResult;

/// 抽象后端接口：REST 数据层
///
/// wasm32 下由 `api::WardrobeApi` 实现，测试中使用 `MockBackend`。
#[async_trait(?Send)]
pub trait WardrobeBackend {
    /// 获取用户资料；后端无记录时返回 `None`
    async fn fetch_user_profile(&self, uid: &str) -> NavResult<Option<UserProfile>>;
    /// 获取用户全部衣橱条目
    async fn fetch_wardrobe(&self, uid: &str) -> NavResult<Vec<WardrobeItem>>;
}
