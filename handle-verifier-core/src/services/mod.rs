//! 业务逻辑服务层

mod classifier;
mod display_tracker;
mod fast_validator;
mod lifecycle;
mod slow_validator;

pub use classifier::{classify_lookup_failure, ServerProbe};
pub use display_tracker::ErrorDisplayTracker;
pub use fast_validator::FastValidator;
pub use lifecycle::{HandleFieldAdapter, DEFAULT_FIELD_ID};
pub use slow_validator::SlowValidator;

use std::sync::Arc;

use handle_verifier_provider::AccountDirectory;

use crate::traits::MessageSurface;

/// 服务上下文 - 持有所有依赖
///
/// 宿主需要创建此上下文，并注入远程目录与消息界面的实现。
pub struct ServiceContext {
    /// 远程账户目录
    pub directory: Arc<dyn AccountDirectory>,
    /// 消息横幅
    pub messages: Arc<dyn MessageSurface>,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(directory: Arc<dyn AccountDirectory>, messages: Arc<dyn MessageSurface>) -> Self {
        Self {
            directory,
            messages,
        }
    }
}
