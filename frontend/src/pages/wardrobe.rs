use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use wardrobe_shared::{PageName, PageParams, WardrobeItem};

use crate::error::NavResult;
use crate::log::log_warn;
use crate::registry::PageController;
use crate::scope::PageScope;

use super::render_items;

const GRID: &str = "wardrobe-grid-container";
const EMPTY: &str = "wardrobe-empty-message";
const CHIPS: &str = "wardrobe-filter-chips";

/// 筛选标签：`<button class="chip" data-category="...">`
const CHIP_CLASS: &str = "chip";
const CHIP_DATA: &str = "category";
const CHIP_ACTIVE: &str = "active";

/// 不筛选
const ALL_CATEGORIES: &str = "all";

/// 衣橱页：条目网格与分类筛选
#[derive(Default)]
pub struct WardrobeController {
    /// 已加载的全部条目，筛选在其上进行
    items: Rc<RefCell<Vec<WardrobeItem>>>,
}

impl WardrobeController {
    pub fn new() -> Self {
        Self::default()
    }
}

/// 按分类筛选，忽略大小写；`all` 返回全部
fn filter_by_category(items: &[WardrobeItem], category: &str) -> Vec<WardrobeItem> {
    if category == ALL_CATEGORIES {
        return items.to_vec();
    }
    let wanted = category.to_lowercase();
    items
        .iter()
        .filter(|item| {
            item.category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == wanted)
        })
        .cloned()
        .collect()
}

fn apply_filter(scope: &PageScope, items: &[WardrobeItem], category: &str) {
    scope.mark_children(CHIPS, CHIP_CLASS, CHIP_DATA, category, CHIP_ACTIVE);
    render_items(scope, GRID, EMPTY, &filter_by_category(items, category));
}

async fn load_items(scope: PageScope, items: Rc<RefCell<Vec<WardrobeItem>>>, uid: String) {
    let loaded = match scope.backend().fetch_wardrobe(&uid).await {
        Ok(loaded) => loaded,
        Err(e) => {
            log_warn!("[Wardrobe] Failed to load items: {}", e);
            Vec::new()
        }
    };
    if !scope.is_active() {
        return;
    }
    *items.borrow_mut() = loaded;
    apply_filter(&scope, &items.borrow(), ALL_CATEGORIES);
}

#[async_trait(?Send)]
impl PageController for WardrobeController {
    fn page(&self) -> PageName {
        PageName::Wardrobe
    }

    async fn init(&mut self, scope: &PageScope, _params: &PageParams) -> NavResult<()> {
        scope.require_root()?;

        let chip_scope = scope.clone();
        let items = self.items.clone();
        scope.on_child(CHIPS, "click", CHIP_CLASS, CHIP_DATA, move |category| {
            apply_filter(&chip_scope, &items.borrow(), &category);
        });

        match scope.current_user() {
            Some(user) => scope.spawn(load_items(scope.clone(), self.items.clone(), user.uid)),
            None => apply_filter(scope, &[], ALL_CATEGORIES),
        }
        Ok(())
    }

    fn cleanup(&mut self) -> NavResult<()> {
        self.items.borrow_mut().clear();
        Ok(())
    }
}
