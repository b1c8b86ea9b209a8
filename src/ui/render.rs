use crate::loader::DecodedImage;

// Constants
pub const BG_COLOR: [u8; 3] = [31, 31, 31];

/// Drawing surface the frame driver paints the current image onto.
pub trait Renderer {
    type Bitmap;

    /// Reset per-frame state (the scale transform).
    fn begin_frame(&mut self);
    fn clear(&mut self);
    /// Scale subsequent draws by `(sx, sy)` about the screen point `origin`.
    fn apply_scale_transform(&mut self, sx: f32, sy: f32, origin_x: f32, origin_y: f32);
    /// Draw at `(x, y)` in transformed coordinates.
    fn draw_bitmap(&mut self, x: f32, y: f32, bitmap: &Self::Bitmap);
}

/// Pack RGB into softbuffer u32 format: 0x00RRGGBB.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Unpack softbuffer u32 into (r, g, b).
fn unpack_rgb(v: u32) -> (u8, u8, u8) {
    ((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

/// Software renderer over a softbuffer frame (u32 per pixel, 0x00RRGGBB).
pub struct FrameCanvas<'a> {
    frame: &'a mut [u32],
    width: u32,
    height: u32,
    scale: (f32, f32),
    origin: (f32, f32),
}

impl<'a> FrameCanvas<'a> {
    pub fn new(frame: &'a mut [u32], width: u32, height: u32) -> Self {
        debug_assert!(frame.len() >= (width as usize) * (height as usize));
        Self {
            frame,
            width,
            height,
            scale: (1.0, 1.0),
            origin: (0.0, 0.0),
        }
    }

    fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.origin.0 + (x - self.origin.0) * self.scale.0,
            self.origin.1 + (y - self.origin.1) * self.scale.1,
        )
    }
}

impl Renderer for FrameCanvas<'_> {
    type Bitmap = DecodedImage;

    fn begin_frame(&mut self) {
        self.scale = (1.0, 1.0);
        self.origin = (0.0, 0.0);
    }

    fn clear(&mut self) {
        self.frame.fill(rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]));
    }

    fn apply_scale_transform(&mut self, sx: f32, sy: f32, origin_x: f32, origin_y: f32) {
        self.scale = (sx, sy);
        self.origin = (origin_x, origin_y);
    }

    fn draw_bitmap(&mut self, x: f32, y: f32, bitmap: &DecodedImage) {
        let (x0, y0) = self.to_screen(x, y);
        blit_scaled(
            self.frame,
            self.width,
            self.height,
            &bitmap.rgba_bytes,
            bitmap.width,
            bitmap.height,
            x0,
            y0,
            self.scale,
        );
    }
}

/// Nearest-neighbour blit of an RGBA image with its top-left at `(x0, y0)`,
/// alpha-blended over the frame.
#[allow(clippy::too_many_arguments)]
pub fn blit_scaled(
    dst: &mut [u32], dst_w: u32, dst_h: u32,
    src: &[u8], src_w: u32, src_h: u32,
    x0: f32, y0: f32, scale: (f32, f32),
) {
    let (sx_scale, sy_scale) = scale;
    if !(sx_scale > 0.0 && sy_scale > 0.0) || src_w == 0 || src_h == 0 {
        return;
    }
    let draw_w = src_w as f32 * sx_scale;
    let draw_h = src_h as f32 * sy_scale;

    let dx_start = x0.max(0.0).min(dst_w as f32) as u32;
    let dy_start = y0.max(0.0).min(dst_h as f32) as u32;
    let dx_end = (x0 + draw_w).ceil().max(0.0).min(dst_w as f32) as u32;
    let dy_end = (y0 + draw_h).ceil().max(0.0).min(dst_h as f32) as u32;

    let inv_x = 1.0 / sx_scale;
    let inv_y = 1.0 / sy_scale;

    for dy in dy_start..dy_end {
        let vy = (dy as f32 + 0.5 - y0) * inv_y;
        if vy < 0.0 || vy >= src_h as f32 {
            continue;
        }
        let sy = vy as u32;
        for dx in dx_start..dx_end {
            let vx = (dx as f32 + 0.5 - x0) * inv_x;
            if vx < 0.0 || vx >= src_w as f32 {
                continue;
            }
            let sx = vx as u32;

            let si = (sy as usize * src_w as usize + sx as usize) * 4;
            let di = dy as usize * dst_w as usize + dx as usize;

            let sa = src[si + 3] as u32;
            if sa == 255 {
                dst[di] = rgb(src[si], src[si + 1], src[si + 2]);
            } else if sa > 0 {
                let inv = 255 - sa;
                let (dr, dg, db) = unpack_rgb(dst[di]);
                let r = ((src[si] as u32 * sa + dr as u32 * inv) / 255) as u8;
                let g = ((src[si + 1] as u32 * sa + dg as u32 * inv) / 255) as u8;
                let b = ((src[si + 2] as u32 * sa + db as u32 * inv) / 255) as u8;
                dst[di] = rgb(r, g, b);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn checker() -> DecodedImage {
        // 2x2: red blue / blue red
        let rgba_bytes = [RED, BLUE, BLUE, RED].concat();
        DecodedImage {
            rgba_bytes,
            width: 2,
            height: 2,
        }
    }

    fn bg() -> u32 {
        rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2])
    }

    #[test]
    fn clear_fills_background() {
        let mut buf = vec![0u32; 12];
        let mut canvas = FrameCanvas::new(&mut buf, 4, 3);
        canvas.begin_frame();
        canvas.clear();
        assert!(buf.iter().all(|&p| p == bg()));
    }

    #[test]
    fn unscaled_draw_copies_pixels() {
        let mut buf = vec![0u32; 16];
        let mut canvas = FrameCanvas::new(&mut buf, 4, 4);
        canvas.begin_frame();
        canvas.clear();
        canvas.draw_bitmap(1.0, 1.0, &checker());

        let red = rgb(255, 0, 0);
        let blue = rgb(0, 0, 255);
        assert_eq!(buf[5], red);
        assert_eq!(buf[6], blue);
        assert_eq!(buf[9], blue);
        assert_eq!(buf[10], red);
        assert_eq!(buf[0], bg());
        assert_eq!(buf[15], bg());
    }

    #[test]
    fn scale_transform_magnifies_about_origin() {
        let mut buf = vec![0u32; 36];
        let mut canvas = FrameCanvas::new(&mut buf, 6, 6);
        canvas.begin_frame();
        canvas.clear();
        canvas.apply_scale_transform(2.0, 2.0, 0.0, 0.0);
        // (1,1) in transformed space is (2,2) on screen; 2x2 image covers 4x4
        canvas.draw_bitmap(1.0, 1.0, &checker());

        let red = rgb(255, 0, 0);
        let blue = rgb(0, 0, 255);
        let at = |x: usize, y: usize| buf[y * 6 + x];
        assert_eq!(at(1, 1), bg());
        assert_eq!(at(2, 2), red);
        assert_eq!(at(3, 3), red);
        assert_eq!(at(4, 2), blue);
        assert_eq!(at(5, 3), blue);
        assert_eq!(at(2, 4), blue);
        assert_eq!(at(5, 5), red);
    }

    #[test]
    fn offscreen_draw_is_clipped() {
        let mut buf = vec![0u32; 4];
        let mut canvas = FrameCanvas::new(&mut buf, 2, 2);
        canvas.begin_frame();
        canvas.clear();
        canvas.draw_bitmap(-1.0, -1.0, &checker());
        canvas.draw_bitmap(50.0, -80.0, &checker());
        assert_eq!(buf[0], rgb(255, 0, 0));
        assert_eq!(buf[1], bg());
        assert_eq!(buf[3], bg());
    }

    #[test]
    fn translucent_pixels_blend() {
        let mut buf = vec![rgb(0, 0, 0)];
        let half = DecodedImage {
            rgba_bytes: vec![255, 255, 255, 128],
            width: 1,
            height: 1,
        };
        blit_scaled(&mut buf, 1, 1, &half.rgba_bytes, 1, 1, 0.0, 0.0, (1.0, 1.0));
        assert_eq!(buf[0], rgb(128, 128, 128));
    }
}
