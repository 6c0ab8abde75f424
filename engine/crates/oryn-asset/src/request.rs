use oryn_gfx::types::ShaderLang;
use oryn_gfx::{MeshHandle, ShaderHandle, TextureHandle, TextureSetup};
use oryn_resource::Locator;

use crate::decode::{DecodedImage, decode_rgba8};
use crate::source::ContentSource;

/// 加载结果要交给哪个资源
#[derive(Debug)]
pub enum AssetTarget {
    /// 携带创建时的 Setup，`from_file` 时用解码尺寸修正后再完成
    Texture(TextureHandle, TextureSetup),
    Mesh(MeshHandle),
    /// 完成时用读到的程序重新构造 Setup
    Shader(ShaderHandle, Locator),
}

/// IO 线程中要做的事
#[derive(Debug)]
pub enum IoJob {
    /// 原样读取字节
    Raw(ContentSource),
    /// 读取并解码成 RGBA8
    Image(ContentSource),
    ShaderStages {
        lang: ShaderLang,
        vs: ContentSource,
        fs: ContentSource,
    },
}

#[derive(Debug)]
pub struct IoRequest {
    pub target: AssetTarget,
    pub job: IoJob,
}

#[derive(Debug)]
pub enum IoPayload {
    Bytes(Vec<u8>),
    Image(DecodedImage),
    ShaderStages { lang: ShaderLang, vs: Vec<u8>, fs: Vec<u8> },
}

pub struct IoResult {
    pub target: AssetTarget,
    pub payload: anyhow::Result<IoPayload>,
}

impl IoJob {
    /// 实际的加载任务，运行在 rayon 线程池中
    pub(crate) fn run(self) -> anyhow::Result<IoPayload> {
        let _span = tracy_client::span!("IoJob::run");
        match self {
            IoJob::Raw(source) => Ok(IoPayload::Bytes(source.fetch()?)),
            IoJob::Image(source) => {
                let bytes = source.fetch()?;
                Ok(IoPayload::Image(decode_rgba8(&bytes)?))
            }
            IoJob::ShaderStages { lang, vs, fs } => Ok(IoPayload::ShaderStages {
                lang,
                vs: vs.fetch()?,
                fs: fs.fetch()?,
            }),
        }
    }
}
