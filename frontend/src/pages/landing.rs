use async_trait::async_trait;
use wardrobe_shared::{PageName, PageParams};

use crate::error::NavResult;
use crate::registry::PageController;
use crate::scope::PageScope;

/// 启动页：延迟后自动进入登录页
pub struct LandingController;

#[async_trait(?Send)]
impl PageController for LandingController {
    fn page(&self) -> PageName {
        PageName::Landing
    }

    async fn init(&mut self, scope: &PageScope, _params: &PageParams) -> NavResult<()> {
        let navigate = scope.clone();
        scope.set_timeout(scope.config().landing_delay, move || {
            navigate.request(PageName::Login, PageParams::new());
        });
        Ok(())
    }
}
