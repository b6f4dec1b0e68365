//! 资源加载器
//!
//! 负责把 HTML 片段写入持久容器，以及挂载/移除样式表和脚本元素。

use std::rc::Rc;

use crate::error::NavResult;
use crate::host::{AssetId, Container, DomHost, FragmentFetcher};

/// 样式表句柄
#[derive(Debug, PartialEq, Eq)]
pub struct StylesheetHandle(AssetId);

/// 脚本句柄
///
/// 移除脚本元素不会撤销模块已经产生的副作用，页面的清理必须通过控制器完成。
#[derive(Debug, PartialEq, Eq)]
pub struct ScriptHandle(AssetId);

pub struct ResourceLoader {
    dom: Rc<dyn DomHost>,
    fetcher: Rc<dyn FragmentFetcher>,
}

impl ResourceLoader {
    pub fn new(dom: Rc<dyn DomHost>, fetcher: Rc<dyn FragmentFetcher>) -> Self {
        Self { dom, fetcher }
    }

    /// 加载片段到目标容器
    ///
    /// 失败时写入包含路径的占位内容并返回错误供调用方记录，
    /// 不会保留上一页的旧内容。
    pub async fn load_fragment(&self, path: &str, target: Container) -> NavResult<()> {
        match self.fetcher.fetch_text(path).await {
            Ok(html) => {
                self.dom.set_container_html(target, &html);
                Ok(())
            }
            Err(e) => {
                self.dom
                    .set_container_html(target, &format!("<p>Error loading: {}</p>", path));
                Err(e.in_op_with("loader.load_fragment", path))
            }
        }
    }

    pub fn attach_stylesheet(&self, path: &str) -> StylesheetHandle {
        StylesheetHandle(self.dom.attach_stylesheet(path))
    }

    /// 句柄按值传入，同一个句柄无法被移除两次
    pub fn detach_stylesheet(&self, handle: StylesheetHandle) {
        self.dom.detach_asset(handle.0);
    }

    pub fn attach_script(&self, path: &str, is_module: bool) -> ScriptHandle {
        ScriptHandle(self.dom.attach_script(path, is_module))
    }

    pub fn detach_script(&self, handle: ScriptHandle) {
        self.dom.detach_asset(handle.0);
    }
}
