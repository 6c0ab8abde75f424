use oryn_resource::{InitError, Locator, ResourceKind, ResourcePool, ResourceType};

use crate::backend::{Backend, NativeDevice, NativeId};
use crate::factory::GfxFactory;
use crate::handles::{GfxResourceType, ShaderHandle};
use crate::kind::{GfxHandle, GfxPools, GfxResourceKind, GfxSetup};
use crate::types::ShaderLang;

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ShaderSource {
    Source(String),
    ByteCode(Vec<u8>),
}

impl ShaderSource {
    #[inline]
    pub fn is_empty(&self) -> bool {
        match self {
            ShaderSource::Source(s) => s.is_empty(),
            ShaderSource::ByteCode(b) => b.is_empty(),
        }
    }
}

impl From<&str> for ShaderSource {
    fn from(source: &str) -> Self {
        ShaderSource::Source(source.to_string())
    }
}

impl From<String> for ShaderSource {
    fn from(source: String) -> Self {
        ShaderSource::Source(source)
    }
}

impl From<Vec<u8>> for ShaderSource {
    fn from(byte_code: Vec<u8>) -> Self {
        ShaderSource::ByteCode(byte_code)
    }
}

/// 某一种着色语言的一对 vertex / fragment 程序
#[derive(Clone, Debug)]
pub struct ShaderProgram {
    pub lang: ShaderLang,
    pub vs: ShaderSource,
    pub fs: ShaderSource,
    pub vs_entry: String,
    pub fs_entry: String,
}

/// Shader 创建参数
///
/// 可以同时携带多种语言的程序，由后端挑选自己支持的那一个。
#[derive(Clone, Debug, Default)]
pub struct ShaderSetup {
    pub locator: Locator,
    programs: Vec<ShaderProgram>,
}

impl ShaderSetup {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            programs: Vec::new(),
        }
    }

    /// 入口函数默认为 `main`（Metal 为 `vs_main` / `fs_main`）
    pub fn with_program(mut self, lang: ShaderLang, vs: impl Into<ShaderSource>, fs: impl Into<ShaderSource>) -> Self {
        let (vs_entry, fs_entry) = match lang {
            ShaderLang::Metal => ("vs_main", "fs_main"),
            _ => ("main", "main"),
        };
        self.programs.push(ShaderProgram {
            lang,
            vs: vs.into(),
            fs: fs.into(),
            vs_entry: vs_entry.to_string(),
            fs_entry: fs_entry.to_string(),
        });
        self
    }

    #[inline]
    pub fn programs(&self) -> &[ShaderProgram] {
        &self.programs
    }

    pub fn program(&self, lang: ShaderLang) -> Option<&ShaderProgram> {
        self.programs.iter().find(|p| p.lang == lang)
    }

    /// 按优先级挑选第一个存在的程序
    pub(crate) fn select_program(&self, preferred: &[ShaderLang]) -> Result<&ShaderProgram, InitError> {
        let program = preferred
            .iter()
            .find_map(|lang| self.program(*lang))
            .ok_or_else(|| InitError::InvalidSetup(format!("no shader program for {:?}", preferred)))?;
        if program.vs.is_empty() || program.fs.is_empty() {
            return Err(InitError::InvalidSetup(format!("empty {:?} shader stage", program.lang)));
        }
        Ok(program)
    }
}

/// 后端创建出的 Shader
#[derive(Debug)]
pub struct Shader {
    pub(crate) objects: Vec<NativeId>,
    lang: ShaderLang,
}

impl Shader {
    pub(crate) fn new(objects: Vec<NativeId>, lang: ShaderLang) -> Self {
        Self { objects, lang }
    }

    /// GL: program；D3D11: VS + PS；Metal: library
    #[inline]
    pub fn objects(&self) -> &[NativeId] {
        &self.objects
    }

    #[inline]
    pub fn lang(&self) -> ShaderLang {
        self.lang
    }
}

pub struct ShaderKind;

impl ResourceKind for ShaderKind {
    type Handle = ShaderHandle;
    type Setup = ShaderSetup;
    type Resource = Shader;

    const TYPE: ResourceType = GfxResourceType::SHADER;
    const NAME: &'static str = "Shader";

    fn locator(setup: &ShaderSetup) -> &Locator {
        &setup.locator
    }
}

impl GfxResourceKind for ShaderKind {
    #[inline]
    fn pool(pools: &GfxPools) -> &ResourcePool<Self> {
        &pools.shaders
    }

    #[inline]
    fn pool_mut(pools: &mut GfxPools) -> &mut ResourcePool<Self> {
        &mut pools.shaders
    }

    fn init<B: Backend, D: NativeDevice<B>>(
        factory: &mut GfxFactory<B, D>,
        setup: &ShaderSetup,
        _content: Option<&[u8]>,
    ) -> Result<Shader, InitError> {
        factory.init_shader(setup)
    }

    fn native_objects(shader: &Shader) -> Vec<NativeId> {
        shader.objects.clone()
    }
}

impl GfxHandle for ShaderHandle {
    type Kind = ShaderKind;
}

impl GfxSetup for ShaderSetup {
    type Kind = ShaderKind;
}
