//! 用户资料预取
//!
//! 在 home / profile 控制器初始化之前把资料字段写入片段：
//! 先用身份提供方的数据立即填充，再用后端资料覆盖。

use wardrobe_shared::AuthUser;

use crate::error::{NavErrorKind, NavResult};
use crate::scope::PageScope;

const AVATAR_IDS: [&str; 2] = ["home-user-avatar", "profile-user-avatar"];

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn paint_user_profile(scope: &PageScope, user: &AuthUser) -> NavResult<()> {
    // 1. 身份数据，避免页面停留在加载状态
    let display_name = non_empty(user.display_name.as_deref()).unwrap_or("Friend");
    scope.set_text("home-user-name", &format!("Hello, {}", display_name));
    scope.set_text("profile-user-name", display_name);
    scope.set_text("profile-user-email", &user.email);

    // 2. 后端资料
    let profile = match scope.backend().fetch_user_profile(&user.uid).await {
        Ok(profile) => profile,
        Err(e) => {
            paint_avatar(scope, None);
            return Err(e
                .reclassify(NavErrorKind::PreFetch)
                .in_op_with("prefetch.user_profile", user.uid.as_str()));
        }
    };

    // 没有资料文档时按空资料处理，字段显示 "-"
    let profile = profile.unwrap_or_default();
    let name = non_empty(profile.name.as_deref()).unwrap_or(display_name);
    scope.set_text("home-user-name", &format!("Hello, {}!", name));
    scope.set_text("profile-user-name", name);
    scope.set_text(
        "profile-user-gender",
        non_empty(profile.gender.as_deref()).unwrap_or("-"),
    );
    scope.set_text(
        "profile-user-birthdate",
        non_empty(profile.birth_date.as_deref()).unwrap_or("-"),
    );
    scope.set_text(
        "profile-user-phone",
        non_empty(profile.phone_number.as_deref()).unwrap_or("-"),
    );

    // 3. 头像
    paint_avatar(scope, profile.profile_image_url.as_deref());
    Ok(())
}

/// 头像回退链：资料中的图片 -> 配置的占位头像
fn paint_avatar(scope: &PageScope, image_url: Option<&str>) {
    let fallback = scope.config().fallback_avatar_url.clone();
    let src = non_empty(image_url).unwrap_or(&fallback);
    for id in AVATAR_IDS {
        scope.set_attribute(id, "src", src);
    }
}
