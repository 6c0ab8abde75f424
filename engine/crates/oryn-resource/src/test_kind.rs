//! 单元测试用的资源类型和工厂

use std::collections::HashSet;

use slotmap::new_key_type;

use crate::error::InitError;
use crate::factory::Factory;
use crate::handle::ResourceType;
use crate::kind::ResourceKind;
use crate::locator::Locator;

new_key_type! { pub struct TestHandle; }

#[derive(Debug, Default, Clone)]
pub struct TestSetup {
    pub locator: Locator,
    pub fail: bool,
    pub needs_content: bool,
}

pub struct TestKind;

impl ResourceKind for TestKind {
    type Handle = TestHandle;
    type Setup = TestSetup;
    type Resource = u32;

    const TYPE: ResourceType = ResourceType::new(7);
    const NAME: &'static str = "Test";

    fn locator(setup: &Self::Setup) -> &Locator {
        &setup.locator
    }
}

/// 记录创建/销毁情况的工厂
#[derive(Default)]
pub struct CountingFactory {
    next_id: u32,
    pub live: HashSet<u32>,
    pub destroyed: Vec<u32>,
    pub contents: Vec<Vec<u8>>,
}

impl Factory<TestKind> for CountingFactory {
    fn init(&mut self, setup: &TestSetup, content: Option<&[u8]>) -> Result<u32, InitError> {
        if setup.fail {
            return Err(InitError::InvalidSetup("fail requested".to_string()));
        }
        if setup.needs_content && content.is_none() {
            return Err(InitError::MissingContent);
        }
        if let Some(content) = content {
            self.contents.push(content.to_vec());
        }
        self.next_id += 1;
        self.live.insert(self.next_id);
        Ok(self.next_id)
    }

    fn destroy(&mut self, resource: u32) {
        assert!(self.live.remove(&resource), "double destroy of {}", resource);
        self.destroyed.push(resource);
    }
}
