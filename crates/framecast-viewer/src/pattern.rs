use framecast_engine::time::FrameTime;
use framecast_engine::{FrameBuffer, FrameSource};

/// Opaque SMPTE-style bars along the top quarter of the frame.
const BARS: [[u8; 4]; 7] = [
    [192, 192, 192, 255],
    [192, 192, 0, 255],
    [0, 192, 192, 255],
    [0, 192, 0, 255],
    [192, 0, 192, 255],
    [192, 0, 0, 255],
    [0, 0, 192, 255],
];

/// Scrolling XOR texture under a row of color bars.
///
/// The bars never move, which makes scaling or channel-order mistakes easy to
/// spot; the XOR field scrolls so dropped or repeated frames are visible.
pub struct TestPattern {
    width: u32,
    height: u32,

    /// Scroll speed in pixels per second.
    speed: f64,
}

impl TestPattern {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            speed: 60.0,
        }
    }

    fn bar_height(&self) -> u32 {
        self.height / 4
    }
}

impl FrameSource for TestPattern {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn render(&mut self, time: &FrameTime, frame: &mut FrameBuffer) {
        let width = frame.width() as usize;
        let bar_rows = self.bar_height() as usize;
        let offset = (time.elapsed * self.speed) as u32;

        for (i, px) in frame.pixels_mut().iter_mut().enumerate() {
            let x = (i % width) as u32;
            let y = (i / width) as u32;

            *px = if (y as usize) < bar_rows {
                BARS[(x as usize * BARS.len()) / width]
            } else {
                let v = ((x.wrapping_add(offset)) ^ y) as u8;
                [v, v.wrapping_mul(3), 255 - v, 255]
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecast_engine::time::FrameClock;

    fn rendered(w: u32, h: u32) -> FrameBuffer {
        let mut pattern = TestPattern::new(w, h);
        let mut frame = FrameBuffer::new(w, h).unwrap();
        let time = FrameClock::new().tick();
        pattern.render(&time, &mut frame);
        frame
    }

    #[test]
    fn bars_span_the_full_width() {
        let frame = rendered(70, 8);
        assert_eq!(frame.pixel(0, 0), Some(BARS[0]));
        assert_eq!(frame.pixel(69, 0), Some(BARS[6]));
        assert_eq!(frame.pixel(35, 1), Some(BARS[3]));
    }

    #[test]
    fn every_pixel_is_opaque() {
        let frame = rendered(32, 16);
        assert!(frame.as_bytes().chunks(4).all(|px| px[3] == 255));
    }
}
