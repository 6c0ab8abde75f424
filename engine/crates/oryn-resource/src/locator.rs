use std::fmt;

/// 资源定位符
///
/// 一个名字加上是否共享的标记。共享的 Locator 会登记到 `ResourceRegistry`，
/// 用同一个共享 Locator 再次创建时直接复用已有资源；非共享的从不去重。
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Locator {
    name: String,
    shared: bool,
}

impl Locator {
    pub fn shared(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: true,
        }
    }

    pub fn non_shared(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shared: false,
        }
    }

    /// 匿名、非共享
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn is_shared(&self) -> bool {
        self.shared
    }
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shared {
            write!(f, "Locator({:?}, shared)", self.name)
        } else {
            write!(f, "Locator({:?})", self.name)
        }
    }
}

impl From<&str> for Locator {
    /// 由字符串得到的 Locator 默认是共享的
    fn from(name: &str) -> Self {
        Self::shared(name)
    }
}
