use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use wardrobe_shared::{UserProfile, WardrobeItem, WardrobeListResponse};

use crate::backend::WardrobeBackend;
use crate::error::{NavError, NavResult};

/// REST 后端客户端
#[derive(Clone, Debug, PartialEq)]
pub struct WardrobeApi {
    pub base_url: String,
}

impl WardrobeApi {
    pub fn new(base_url: String) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { base_url }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    async fn get(&self, path: &str) -> NavResult<Response> {
        Request::get(&self.url(path))
            .send()
            .await
            .map_err(|e| NavError::network(e.to_string()))
    }

    async fn body(res: Response) -> NavResult<String> {
        res.text().await.map_err(|e| NavError::network(e.to_string()))
    }
}

fn encode(value: &str) -> String {
    String::from(js_sys::encode_uri_component(value))
}

#[async_trait(?Send)]
impl WardrobeBackend for WardrobeApi {
    /// 获取用户资料
    async fn fetch_user_profile(&self, uid: &str) -> NavResult<Option<UserProfile>> {
        let res = self
            .get(&format!("/api/users/{}", encode(uid)))
            .await
            .map_err(|e| e.in_op_with("api.fetch_user_profile", uid))?;

        if res.status() == 404 {
            return Ok(None);
        }
        if !res.ok() {
            return Err(NavError::network(format!("获取用户资料失败: {}", res.status()))
                .in_op_with("api.fetch_user_profile", uid));
        }

        let body = Self::body(res).await?;
        let profile: UserProfile = serde_json::from_str(&body)
            .map_err(|e| NavError::from(e).in_op_with("api.fetch_user_profile", uid))?;
        Ok(profile.into_found())
    }

    /// 获取衣橱条目
    async fn fetch_wardrobe(&self, uid: &str) -> NavResult<Vec<WardrobeItem>> {
        let res = self
            .get(&format!("/api/wardrobe?userId={}", encode(uid)))
            .await
            .map_err(|e| e.in_op_with("api.fetch_wardrobe", uid))?;

        if !res.ok() {
            return Err(NavError::network(format!("获取衣橱失败: {}", res.status()))
                .in_op_with("api.fetch_wardrobe", uid));
        }

        let body = Self::body(res).await?;
        let list: WardrobeListResponse = serde_json::from_str(&body)
            .map_err(|e| NavError::from(e).in_op_with("api.fetch_wardrobe", uid))?;
        Ok(list.into_items())
    }
}
