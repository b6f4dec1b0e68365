//! 内置页面控制器
//!
//! 其余页面只有片段，没有控制器；需要脚本的页面通过配置的 `page_scripts` 挂载。

mod home;
mod landing;
mod streaks;
mod wardrobe;

pub use home::HomeController;
pub use landing::LandingController;
pub use streaks::StreaksController;
pub use wardrobe::WardrobeController;

use wardrobe_shared::{PageName, WardrobeItem};

use crate::registry::ControllerRegistry;
use crate::scope::PageScope;

/// 应用默认的控制器注册表
pub fn default_registry() -> ControllerRegistry {
    ControllerRegistry::new()
        .register(PageName::Landing, || Box::new(LandingController))
        .register(PageName::Home, || Box::new(HomeController::new()))
        .register(PageName::Wardrobe, || Box::new(WardrobeController::new()))
        .register(PageName::Streaks, || Box::new(StreaksController::new()))
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn item_card(item: &WardrobeItem) -> String {
    let name = item.name.as_deref().unwrap_or("Item");
    let image = item.image_src().unwrap_or_default();
    let liked = if item.is_liked { " liked" } else { "" };
    format!(
        r#"<div class="item-card" data-id="{}"><img src="{}" alt="{}" class="wardrobe-thumb" /><button class="like-btn{}"></button></div>"#,
        escape_html(&item.id),
        escape_html(image),
        escape_html(name),
        liked
    )
}

/// 把条目渲染进容器，并根据是否为空切换空状态元素
pub(crate) fn render_items(scope: &PageScope, container: &str, empty: &str, items: &[WardrobeItem]) {
    let html: String = items.iter().map(item_card).collect();
    scope.set_inner_html(container, &html);
    scope.set_hidden(empty, !items.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_item_card_escapes_fields() {
        let item = WardrobeItem {
            id: "a1".to_string(),
            name: Some("<script>".to_string()),
            category: None,
            image_url: None,
            url: Some("img.png".to_string()),
            is_liked: true,
            created_at: None,
            timestamp: None,
        };
        let card = item_card(&item);
        assert!(card.contains(r#"class="like-btn liked""#));
        assert!(card.contains(r#"alt="&lt;script&gt;""#));
        assert!(card.contains(r#"src="img.png""#));
    }

    #[test]
    fn test_default_registry_covers_allow_list() {
        let registry = default_registry();
        for page in PageName::ALL {
            assert_eq!(registry.resolve(page).unwrap().page(), page);
        }
    }
}
