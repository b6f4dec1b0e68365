use std::fmt;

// =========================================================
// 错误类型枚举
// =========================================================

/// 导航子系统的错误分类
///
/// 所有错误都在本地恢复，最坏结果是一个空白或无交互的页面，
/// 永远不会让导航机制本身崩溃。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavErrorKind {
    /// HTML 片段加载失败（网络错误或非 2xx），显示占位内容
    FragmentLoad,
    /// 白名单页面没有注册控制器
    ModuleNotFound,
    /// 控制器与页面约定不符（页面不匹配、片段缺少根元素）
    ContractViolation,
    /// 离开页面的 cleanup 失败，不阻塞导航
    Cleanup,
    /// 用户资料预取失败，页面以默认数据继续
    PreFetch,
    /// 控制器 init 失败
    Init,
    /// 后端请求失败
    Network,
    /// 响应解析失败
    Decode,
}

impl NavErrorKind {
    /// 机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            NavErrorKind::FragmentLoad => "FRAGMENT_LOAD_ERROR",
            NavErrorKind::ModuleNotFound => "MODULE_NOT_FOUND",
            NavErrorKind::ContractViolation => "CONTRACT_VIOLATION",
            NavErrorKind::Cleanup => "CLEANUP_ERROR",
            NavErrorKind::PreFetch => "PREFETCH_ERROR",
            NavErrorKind::Init => "INIT_ERROR",
            NavErrorKind::Network => "NETWORK_ERROR",
            NavErrorKind::Decode => "DECODE_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorSpan {
    /// 操作名称，如 "lifecycle.cleanup", "api.fetch_wardrobe"
    pub operation: String,
    /// 额外细节，如页面名、路径
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavError {
    pub kind: NavErrorKind,
    pub message: String,
    spans: Vec<ErrorSpan>,
}

impl NavError {
    pub fn new(kind: NavErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn fragment_load(message: impl Into<String>) -> Self {
        Self::new(NavErrorKind::FragmentLoad, message)
    }

    pub fn module_not_found(message: impl Into<String>) -> Self {
        Self::new(NavErrorKind::ModuleNotFound, message)
    }

    pub fn contract_violation(message: impl Into<String>) -> Self {
        Self::new(NavErrorKind::ContractViolation, message)
    }

    pub fn cleanup(message: impl Into<String>) -> Self {
        Self::new(NavErrorKind::Cleanup, message)
    }

    pub fn init(message: impl Into<String>) -> Self {
        Self::new(NavErrorKind::Init, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(NavErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(NavErrorKind::Decode, message)
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 保留原始信息但改变分类（如后端错误在预取阶段被归为 PreFetch）
    pub fn reclassify(mut self, kind: NavErrorKind) -> Self {
        self.kind = kind;
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for NavError {}

impl From<serde_json::Error> for NavError {
    fn from(e: serde_json::Error) -> Self {
        NavError::decode(e.to_string())
    }
}

pub type NavResult<T> = std::result::Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_trace() {
        let err = NavError::fragment_load("File pages/home.html not found")
            .in_op("loader.fetch")
            .in_op_with("lifecycle.transition", "home");
        assert_eq!(
            err.to_string(),
            "[FRAGMENT_LOAD_ERROR] File pages/home.html not found | trace: loader.fetch -> lifecycle.transition(home)"
        );
        assert_eq!(err.spans().len(), 2);
    }

    #[test]
    fn test_reclassify_keeps_trace() {
        let err = NavError::network("HTTP 500")
            .in_op("api.fetch_user_profile")
            .reclassify(NavErrorKind::PreFetch);
        assert_eq!(err.kind, NavErrorKind::PreFetch);
        assert_eq!(err.message(), "HTTP 500");
        assert_eq!(err.spans()[0].operation, "api.fetch_user_profile");
    }
}
