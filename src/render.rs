use crate::config::Config;
use crate::projector::{DrawCommand, Rgb};

/// Compose one frame into a row-major 0RGB framebuffer: ceiling fill over the
/// upper half, floor fill over the lower half, then one clamped rectangle per
/// draw command in ascending ray order.
///
/// `buf` must hold `screen_width * screen_height` pixels. Slab rows that fall
/// outside the screen (a clamped near-wall slab) are dropped here rather than
/// surfaced as errors.
pub(crate) fn render_frame(
    buf: &mut [u32],
    config: &Config,
    commands: &[DrawCommand],
    ceiling: Rgb,
    floor: Rgb,
) {
    let (w, h) = (config.screen_width, config.screen_height);
    let mid = h / 2;

    buf[..mid * w].fill(ceiling.to_u32());
    buf[mid * w..].fill(floor.to_u32());

    for cmd in commands {
        let y0 = (cmd.top.max(0.) as usize).min(h);
        let y1 = (((cmd.top + cmd.height).ceil()).max(0.) as usize).min(h);
        let x0 = cmd.x.min(w);
        let x1 = (cmd.x + cmd.width).min(w);
        let color = cmd.color.to_u32();

        for y in y0..y1 {
            buf[y * w + x0..y * w + x1].fill(color);
        }
    }
}
