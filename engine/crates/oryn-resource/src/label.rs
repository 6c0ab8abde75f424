use std::sync::atomic::{AtomicU32, Ordering};

/// 资源标签
///
/// 创建资源时打上标签，之后可以按标签一次性释放一组资源（例如一个场景的全部资源）。
/// 新标签来自进程级单调递增的计数器，不会重复。
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ResourceLabel(u32);

impl ResourceLabel {
    /// 未显式指定标签时使用
    pub const DEFAULT: Self = Self(0);
    /// 在批量释放中匹配所有标签
    pub const ALL: Self = Self(u32::MAX);

    /// 分配一个新的唯一标签
    pub fn next() -> Self {
        static NEXT_LABEL: AtomicU32 = AtomicU32::new(1);
        let value = NEXT_LABEL.fetch_add(1, Ordering::Relaxed);
        assert!(value != u32::MAX, "resource label space exhausted");
        Self(value)
    }

    #[inline]
    pub fn value(self) -> u32 {
        self.0
    }

    /// `self` 作为过滤条件时，是否匹配资源上的 `label`
    #[inline]
    pub fn matches(self, label: ResourceLabel) -> bool {
        self == Self::ALL || self == label
    }
}

impl Default for ResourceLabel {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 标签栈
///
/// 栈顶标签会被打到之后创建的资源上，便于按"作用域"管理一批资源。
pub struct LabelStack {
    labels: Vec<ResourceLabel>,
    capacity: usize,
}

impl LabelStack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// 分配新标签并压栈
    pub fn push_new(&mut self) -> ResourceLabel {
        let label = ResourceLabel::next();
        self.push(label);
        label
    }

    pub fn push(&mut self, label: ResourceLabel) {
        if self.labels.len() >= self.capacity {
            log::warn!("label stack grows past its configured depth {}", self.capacity);
        }
        self.labels.push(label);
    }

    pub fn pop(&mut self) -> Option<ResourceLabel> {
        let label = self.labels.pop();
        if label.is_none() {
            log::warn!("pop on empty label stack");
        }
        label
    }

    /// 栈顶标签，栈为空时为 `ResourceLabel::DEFAULT`
    #[inline]
    pub fn peek(&self) -> ResourceLabel {
        self.labels.last().copied().unwrap_or_default()
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_is_unique() {
        let a = ResourceLabel::next();
        let b = ResourceLabel::next();
        assert_ne!(a, b);
        assert_ne!(a, ResourceLabel::DEFAULT);
        assert_ne!(b, ResourceLabel::ALL);
    }

    #[test]
    fn test_all_matches_everything() {
        let label = ResourceLabel::next();
        assert!(ResourceLabel::ALL.matches(label));
        assert!(ResourceLabel::ALL.matches(ResourceLabel::DEFAULT));
        assert!(label.matches(label));
        assert!(!label.matches(ResourceLabel::DEFAULT));
    }

    #[test]
    fn test_label_stack() {
        let mut stack = LabelStack::with_capacity(4);
        assert_eq!(stack.peek(), ResourceLabel::DEFAULT);

        let outer = stack.push_new();
        let inner = stack.push_new();
        assert_eq!(stack.peek(), inner);
        assert_eq!(stack.depth(), 2);

        assert_eq!(stack.pop(), Some(inner));
        assert_eq!(stack.peek(), outer);
        assert_eq!(stack.pop(), Some(outer));
        assert_eq!(stack.pop(), None);
        assert_eq!(stack.peek(), ResourceLabel::DEFAULT);
    }
}
