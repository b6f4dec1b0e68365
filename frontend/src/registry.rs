//! 页面控制器注册表
//!
//! 以封闭的 `PageName` 枚举为键，显式注册控制器工厂，
//! 取代按字符串约定动态导入模块的做法。

use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use wardrobe_shared::{PageName, PageParams};

use crate::error::{NavError, NavResult};
use crate::scope::PageScope;

/// 页面控制器
///
/// `init` 中注册的监听器、定时器和异步任务都应通过 `PageScope` 完成，
/// 页面离开时由作用域统一撤销。`cleanup` 只负责控制器自身持有的状态，
/// 并且必须容忍 `init` 中途失败的情况。
#[async_trait(?Send)]
pub trait PageController {
    /// 控制器负责的页面
    fn page(&self) -> PageName;

    async fn init(&mut self, scope: &PageScope, params: &PageParams) -> NavResult<()>;

    fn cleanup(&mut self) -> NavResult<()> {
        Ok(())
    }
}

/// 空控制器：init 与 cleanup 都是空操作
pub struct NullController {
    page: PageName,
}

impl NullController {
    pub fn new(page: PageName) -> Self {
        Self { page }
    }
}

#[async_trait(?Send)]
impl PageController for NullController {
    fn page(&self) -> PageName {
        self.page
    }

    async fn init(&mut self, _scope: &PageScope, _params: &PageParams) -> NavResult<()> {
        Ok(())
    }
}

pub type ControllerFactory = Rc<dyn Fn() -> Box<dyn PageController>>;

#[derive(Default, Clone)]
pub struct ControllerRegistry {
    factories: HashMap<PageName, ControllerFactory>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册页面控制器工厂，重复注册时后者覆盖前者
    pub fn register<F>(mut self, page: PageName, factory: F) -> Self
    where
        F: Fn() -> Box<dyn PageController> + 'static,
    {
        self.factories.insert(page, Rc::new(factory));
        self
    }

    /// 解析页面控制器
    ///
    /// - 不在白名单中的页面得到空控制器
    /// - 白名单页面未注册时返回 `ModuleNotFound`
    /// - 工厂产出的控制器页面不符时返回 `ContractViolation`
    pub fn resolve(&self, page: PageName) -> NavResult<Box<dyn PageController>> {
        if !page.has_controller() {
            return Ok(Box::new(NullController::new(page)));
        }

        let factory = self.factories.get(&page).ok_or_else(|| {
            NavError::module_not_found(format!("No controller registered for '{}'", page))
                .in_op_with("registry.resolve", page.as_str())
        })?;

        let controller = factory();
        if controller.page() != page {
            return Err(NavError::contract_violation(format!(
                "Controller for '{}' was registered under '{}'",
                controller.page(),
                page
            ))
            .in_op_with("registry.resolve", page.as_str()));
        }

        Ok(controller)
    }
}
