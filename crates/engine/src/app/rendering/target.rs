use crate::assets::{AssetProvider, TileImage};
use crate::tilemap::{GridPos, Tilemap};

/// Mutable RGBA8 view over a frame buffer. All drawing is clipped to the
/// buffer bounds.
pub struct RenderTarget<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> RenderTarget<'a> {
    /// Returns `None` when `frame` is not exactly `width * height` RGBA8 pixels.
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if frame.len() != expected {
            return None;
        }
        Some(Self {
            frame,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        let offset = self.byte_offset(x, y)?;
        let mut color = [0; 4];
        color.copy_from_slice(&self.frame[offset..offset + 4]);
        Some(color)
    }

    pub fn clear(&mut self, color: [u8; 4]) {
        for pixel in self.frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        let Some((left, top, right, bottom)) = self.clip(x, y, width, height) else {
            return;
        };
        for py in top..bottom {
            for px in left..right {
                self.write_pixel(px, py, color);
            }
        }
    }

    /// One-pixel outline.
    pub fn stroke_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: [u8; 4]) {
        if width == 0 || height == 0 {
            return;
        }
        let right = x.saturating_add(width as i32 - 1);
        let bottom = y.saturating_add(height as i32 - 1);
        for px in x..=right {
            self.write_pixel(px, y, color);
            self.write_pixel(px, bottom, color);
        }
        for py in y..=bottom {
            self.write_pixel(x, py, color);
            self.write_pixel(right, py, color);
        }
    }

    /// Draws `image` with its top-left corner at (`x`, `y`). Source alpha is
    /// scaled by `opacity`; fully transparent results are skipped and fully
    /// opaque ones copied.
    pub fn blit(&mut self, image: &TileImage, x: i32, y: i32, opacity: u8) {
        if opacity == 0 {
            return;
        }
        let Some((left, top, right, bottom)) = self.clip(x, y, image.width(), image.height())
        else {
            return;
        };
        let src = image.rgba();
        let src_width = image.width() as usize;

        for py in top..bottom {
            let src_y = (py - y) as usize;
            for px in left..right {
                let src_x = (px - x) as usize;
                let src_offset = (src_y * src_width + src_x) * 4;
                let alpha = scale_alpha(src[src_offset + 3], opacity);
                if alpha == 0 {
                    continue;
                }
                let Some(dst_offset) = self.byte_offset(px, py) else {
                    continue;
                };
                let dst = &mut self.frame[dst_offset..dst_offset + 4];
                if alpha == u8::MAX {
                    dst[..3].copy_from_slice(&src[src_offset..src_offset + 3]);
                } else {
                    for channel in 0..3 {
                        let source = src[src_offset + channel];
                        dst[channel] = blend_channel(source, dst[channel], alpha);
                    }
                }
                dst[3] = u8::MAX;
            }
        }
    }

    fn write_pixel(&mut self, x: i32, y: i32, color: [u8; 4]) {
        if let Some(offset) = self.byte_offset(x, y) {
            self.frame[offset..offset + 4].copy_from_slice(&color);
        }
    }

    fn byte_offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    fn clip(&self, x: i32, y: i32, width: u32, height: u32) -> Option<(i32, i32, i32, i32)> {
        let left = x.max(0);
        let top = y.max(0);
        let right = x.saturating_add(width as i32).min(self.width as i32);
        let bottom = y.saturating_add(height as i32).min(self.height as i32);
        (left < right && top < bottom).then_some((left, top, right, bottom))
    }
}

fn scale_alpha(alpha: u8, opacity: u8) -> u8 {
    ((u16::from(alpha) * u16::from(opacity) + 127) / 255) as u8
}

fn blend_channel(src: u8, dst: u8, alpha: u8) -> u8 {
    let alpha = u16::from(alpha);
    ((u16::from(src) * alpha + u16::from(dst) * (255 - alpha) + 127) / 255) as u8
}

/// Inclusive range of grid cells touched by a view starting at `offset`
/// (world pixels) spanning `size` pixels.
pub fn visible_cell_range(offset: i32, size: u32, tile_size: u32) -> (i32, i32) {
    let tile_size = tile_size.max(1) as i32;
    let first = offset.div_euclid(tile_size);
    let last = offset.saturating_add(size as i32).div_euclid(tile_size);
    (first, last)
}

/// Draws off-grid tiles then grid tiles, both shifted by `offset` (the camera
/// scroll in world pixels). Only grid cells inside the view are visited.
/// Tiles without an image are skipped.
pub fn render_tilemap<A>(
    tilemap: &Tilemap,
    assets: &A,
    target: &mut RenderTarget<'_>,
    offset: (i32, i32),
) where
    A: AssetProvider + ?Sized,
{
    let (offset_x, offset_y) = offset;
    for tile in tilemap.off_grid_tiles() {
        if let Some(image) = assets.image(&tile.kind, tile.variant) {
            let x = tile.pos.x.floor() as i32 - offset_x;
            let y = tile.pos.y.floor() as i32 - offset_y;
            target.blit(image, x, y, u8::MAX);
        }
    }

    let tile_size = tilemap.tile_size() as i32;
    let (x_min, x_max) = visible_cell_range(offset_x, target.width(), tilemap.tile_size());
    let (y_min, y_max) = visible_cell_range(offset_y, target.height(), tilemap.tile_size());
    for cell_x in x_min..=x_max {
        for cell_y in y_min..=y_max {
            let Some(tile) = tilemap.grid_tile(GridPos::new(cell_x, cell_y)) else {
                continue;
            };
            if let Some(image) = assets.image(&tile.kind, tile.variant) {
                target.blit(
                    image,
                    cell_x * tile_size - offset_x,
                    cell_y * tile_size - offset_y,
                    u8::MAX,
                );
            }
        }
    }
}
