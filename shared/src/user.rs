use serde::{Deserialize, Serialize};

/// 身份提供方给出的当前用户快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// `GET /api/users/:uid` 返回的用户资料
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    /// 后端在文档不存在时返回 `{ "notFound": true }`
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub not_found: bool,
}

impl UserProfile {
    /// 将 notFound 标记折叠为 `None`
    pub fn into_found(self) -> Option<Self> {
        if self.not_found { None } else { Some(self) }
    }
}
