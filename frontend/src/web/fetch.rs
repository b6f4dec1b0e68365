//! 片段获取
//!
//! 相对路径由浏览器按当前文档解析。

use async_trait::async_trait;
use gloo_net::http::Request;

use crate::error::{NavError, NavResult};
use crate::host::FragmentFetcher;

pub struct HttpFragmentFetcher;

#[async_trait(?Send)]
impl FragmentFetcher for HttpFragmentFetcher {
    async fn fetch_text(&self, path: &str) -> NavResult<String> {
        let res = Request::get(path)
            .send()
            .await
            .map_err(|e| NavError::fragment_load(format!("Failed to fetch {}: {}", path, e)))?;

        if !res.ok() {
            return Err(NavError::fragment_load(format!(
                "File {} not found (HTTP {})",
                path,
                res.status()
            )));
        }

        res.text()
            .await
            .map_err(|e| NavError::fragment_load(format!("Failed to read {}: {}", path, e)))
    }
}
