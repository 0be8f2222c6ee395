mod pattern;

use anyhow::Result;
use framecast_engine::logging::{init_logging, LoggingConfig};
use framecast_engine::window::{Runtime, RuntimeConfig};
use framecast_engine::{BlitConfig, SamplerFilter, SessionConfig};

use pattern::TestPattern;

const FRAME_WIDTH: u32 = 320;
const FRAME_HEIGHT: u32 = 200;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let runtime = RuntimeConfig {
        title: "framecast viewer".to_string(),
        scale: 3,
    };

    // Integer upscale of a low-res frame: keep texels square and sharp.
    let session = SessionConfig {
        blit: BlitConfig {
            filter: SamplerFilter::Nearest,
            ..Default::default()
        },
        ..Default::default()
    };

    log::info!("presenting {FRAME_WIDTH}x{FRAME_HEIGHT} frames at {}x", runtime.scale);

    Runtime::run(runtime, session, TestPattern::new(FRAME_WIDTH, FRAME_HEIGHT))
}
