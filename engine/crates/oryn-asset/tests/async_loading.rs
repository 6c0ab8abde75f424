use std::time::{Duration, Instant};

use oryn_asset::{AssetHub, ContentSource, LoaderConfig};
use oryn_gfx::backend::{D3d11Backend, HeadlessBackend};
use oryn_gfx::types::{PixelFormat, ShaderLang, VertexAttr, VertexFormat};
use oryn_gfx::{
    GfxConfig, GfxResourceContainer, HeadlessDevice, NativeDevice, PipelineSetup, TextureSetup, VertexLayout,
};
use oryn_resource::{Locator, ResourceState};

fn pump<B: oryn_gfx::Backend, D: NativeDevice<B>>(hub: &mut AssetHub, gfx: &mut GfxResourceContainer<B, D>) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while hub.num_in_flight() > 0 {
        assert!(Instant::now() < deadline, "loading timed out");
        gfx.update();
        if hub.update(gfx) == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }
    }
}

#[test]
fn test_pipeline_after_async_shader() {
    oryn_crate_tools::init_log::init_test_log();
    let mut gfx = GfxResourceContainer::<HeadlessBackend, _>::new(&GfxConfig::default(), HeadlessDevice::new());
    let mut hub = AssetHub::new(&LoaderConfig::default()).unwrap();
    let layout = VertexLayout::new().add(VertexAttr::Position, VertexFormat::Float3);

    let shader = hub
        .load_shader(
            &mut gfx,
            Locator::shared("shaders/basic"),
            ShaderLang::Glsl330,
            ContentSource::memory(b"void main(){}".to_vec()),
            ContentSource::memory(b"void main(){}".to_vec()),
        )
        .unwrap();

    // shader 还没加载完，pipeline 创建失败
    let early = gfx.create(PipelineSetup::new(shader, layout.clone()), None).unwrap();
    assert_eq!(gfx.query_state(early), ResourceState::Failed);

    pump(&mut hub, &mut gfx);
    let pipeline = gfx.create(PipelineSetup::new(shader, layout), None).unwrap();
    assert_eq!(gfx.query_state(pipeline), ResourceState::Valid);

    assert_eq!(hub.stats().completed, 1);
    gfx.destroy();
}

#[test]
fn test_label_release_cancels_pending_loads() {
    oryn_crate_tools::init_log::init_test_log();
    let mut gfx = GfxResourceContainer::<D3d11Backend, _>::new(&GfxConfig::default(), HeadlessDevice::new());
    let mut hub = AssetHub::new(&LoaderConfig::default()).unwrap();

    let level = gfx.push_label();
    let pixels = vec![0u8; 8 * 8 * 4];
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let setup = TextureSetup::from_pixel_data_2d(8, 8, 1, PixelFormat::RGBA8)
                .with_locator(Locator::non_shared(format!("tile{}", i)));
            hub.load_texture(&mut gfx, ContentSource::memory(pixels.clone()), setup).unwrap()
        })
        .collect();
    gfx.pop_label();

    assert_eq!(gfx.release_label(level), 4);
    pump(&mut hub, &mut gfx);

    assert_eq!(hub.stats().discarded, 4);
    for handle in handles {
        assert_eq!(gfx.query_state(handle), ResourceState::Initial);
    }
    assert_eq!(gfx.device().num_live(), 0);
    gfx.destroy();
}

#[test]
fn test_raw_pixel_texture_per_backend_objects() {
    oryn_crate_tools::init_log::init_test_log();
    let mut gfx = GfxResourceContainer::<D3d11Backend, _>::new(&GfxConfig::default(), HeadlessDevice::new());
    let mut hub = AssetHub::new(&LoaderConfig::default()).unwrap();

    let setup = TextureSetup::from_pixel_data_2d(2, 2, 1, PixelFormat::RGBA8);
    let handle = hub.load_texture(&mut gfx, ContentSource::memory(vec![255u8; 16]), setup).unwrap();
    pump(&mut hub, &mut gfx);

    // texture + SRV + sampler
    assert_eq!(gfx.lookup(handle).unwrap().objects().len(), 3);
    assert_eq!(gfx.device().num_live(), 3);
    gfx.destroy();
}
