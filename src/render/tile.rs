use crate::chunk::column::Column;
use crate::render::color::{render_color, MapColor};
use crate::render::searcher::BlockSearcher;
use crate::world::plane::Plane;

pub const TILE_WIDTH: usize = 16;
pub const PIXELS_PER_TILE: usize = TILE_WIDTH * TILE_WIDTH;

/// A chunk column bound to its position, ready for rendering.
pub struct Lump {
    column: Column,
    x: i32,
    z: i32,
}

impl Lump {
    pub fn new(column: Column, x: i32, z: i32) -> Self {
        Lump { column, x, z }
    }

    pub fn column(&self) -> &Column {
        &self.column
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn z(&self) -> i32 {
        self.z
    }

    pub fn global_x(&self, local_x: i32) -> i32 {
        (self.x << 4) + local_x
    }

    pub fn global_z(&self, local_z: i32) -> i32 {
        (self.z << 4) + local_z
    }
}

/// Shade level for a fluid pixel, from its depth and a checkerboard
/// dither. Starts at 1; shallow water brightens to 2, deep water
/// darkens to 0, and the darkening test runs last so extreme depth
/// always wins.
fn fluid_shade(depth: i32, x: i32, z: i32) -> usize {
    let test = f64::from(depth) * 0.1 + f64::from((x + z) & 1) * 0.2;
    let mut shade = 1;
    if test < 0.5 {
        shade = 2;
    }
    if test > 0.9 {
        shade = 0;
    }
    shade
}

/// Shade level for a terrain pixel, from the height delta against the
/// cell one step north and the same checkerboard dither.
fn terrain_shade(height: i32, last_height: i32, x: i32, z: i32) -> usize {
    let test =
        f64::from(height - last_height) * 4.0 / 5.0 + (f64::from((x + z) & 1) - 0.5) * 0.4;
    let mut shade = 1;
    if test > 0.6 {
        shade = 2;
    }
    if test < -0.6 {
        shade = 0;
    }
    shade
}

/// Renders the 16x16 pixel colors of one chunk column. Relief shading
/// compares each cell against the one directly north of it, so the
/// northern neighbour column feeds the very first comparison of every
/// x; with no northern neighbour those comparisons see height zero.
pub fn render_colors(plane: &Plane, lump: &Lump) -> [u32; PIXELS_PER_TILE] {
    let mut colors = [0u32; PIXELS_PER_TILE];

    let has_ceiling = plane.has_ceiling();
    let north = plane.lump(lump.x(), lump.z() - 1);

    let classifier = plane.classifier();
    let mut searcher = BlockSearcher::new(classifier.as_ref(), plane.shape());
    let mut last_heights = [0i32; TILE_WIDTH];

    for x in 0..TILE_WIDTH as i32 {
        if let Some(north) = &north {
            if has_ceiling {
                searcher.search_under_ceiling(north, x, 15);
            } else {
                searcher.search(north, x, 15);
            }
            last_heights[x as usize] = searcher.height();
        }

        for z in 0..TILE_WIDTH as i32 {
            if has_ceiling {
                searcher.search_under_ceiling(lump, x, z);
            } else {
                searcher.search(lump, x, z);
            }

            let height = searcher.height();
            if height > plane.shape().min_y && searcher.is_visible_fluid() {
                searcher.calculate_water_depth(lump);
            }

            let map_color = searcher.map_color();
            let shade = if map_color == MapColor::WATER {
                fluid_shade(searcher.water_depth(), x, z)
            } else {
                terrain_shade(height, last_heights[x as usize], x, z)
            };

            last_heights[x as usize] = height;
            colors[x as usize + z as usize * TILE_WIDTH] =
                render_color(map_color, shade, plane.pixel_format());
        }
    }

    colors
}
