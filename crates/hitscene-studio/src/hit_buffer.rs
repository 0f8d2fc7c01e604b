use hitscene_engine::hit::{HitColor, HitId};
use hitscene_engine::render::{DrawCall, DrawExecutor};
use hitscene_ui::shapes::BaseShape;

/// Side length of one drawn instance, in pixels.
pub const CELL: usize = 4;

/// CPU stand-in for the GPU hit pass.
///
/// Each instance of an interactive shape fills a `CELL`-sized square at the
/// shape's x/y position, instances laid out left to right. Later draw calls
/// overwrite earlier ones, like a depth-less GPU pass drawn back-to-front.
pub struct SoftwareHitBuffer {
    width: usize,
    height: usize,
    pixels: Vec<HitColor>,
    draws: usize,
}

impl SoftwareHitBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![HitColor::BACKGROUND; width * height], draws: 0 }
    }

    pub fn clear(&mut self) {
        self.pixels.fill(HitColor::BACKGROUND);
        self.draws = 0;
    }

    pub fn draws(&self) -> usize {
        self.draws
    }

    /// Reads the id under `(x, y)` the way a GPU readback would be decoded.
    pub fn read(&self, x: usize, y: usize) -> Option<HitId> {
        let bytes: &[u8] = bytemuck::cast_slice(&self.pixels);
        HitColor::decode_pixel(bytes, self.width * size_of::<HitColor>(), x, y)
    }

    /// Every id within `radius` pixels (square) of `(x, y)`, clipped to the buffer.
    pub fn read_around(&self, x: usize, y: usize, radius: usize) -> Vec<HitId> {
        let ys = y.saturating_sub(radius)..=(y + radius).min(self.height - 1);
        ys.flat_map(|py| {
            let xs = x.saturating_sub(radius)..=(x + radius).min(self.width - 1);
            xs.filter_map(move |px| self.read(px, py))
        })
        .collect()
    }

    fn fill(&mut self, x0: usize, y0: usize, color: HitColor) {
        for y in y0..(y0 + CELL).min(self.height) {
            for x in x0..(x0 + CELL).min(self.width) {
                self.pixels[y * self.width + x] = color;
            }
        }
    }
}

impl DrawExecutor<BaseShape, &'static str> for SoftwareHitBuffer {
    fn draw(&mut self, call: &DrawCall<'_, BaseShape, &'static str>) {
        self.draws += 1;
        log::debug!(
            "draw `{}` layer {:?}: {} object(s), interactive={}",
            **call.command,
            call.layer,
            call.objects.len(),
            call.is_interactive()
        );

        for span in call.hit_spans {
            let shape = &call.objects[span.object_index];
            let x = shape.position.x.max(0.0) as usize;
            let y = shape.position.y.max(0.0) as usize;
            for (i, id) in span.ids().enumerate() {
                match HitColor::from_hit_id(id) {
                    Some(color) => self.fill(x + i * CELL, y, color),
                    None => log::warn!("hit id {} does not fit the hit buffer", id),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use hitscene_engine::hit::HitSample;
    use hitscene_engine::scene::InstanceCount;
    use hitscene_ui::shapes;
    use hitscene_ui::Stage;

    use super::*;

    #[test]
    fn later_layers_cover_earlier_ones() {
        let spheres = shapes::spheres("spheres");
        let cones = shapes::cones("cones");
        let mut stage = Stage::new();
        stage.mount(spheres.create(), spheres.props(vec![BaseShape::at([0.0, 0.0, 0.0])]).interactive(true));
        stage.mount(
            cones.create(),
            cones
                .props(vec![BaseShape::at([2.0, 0.0, 0.0])])
                .layer(1)
                .instance_count(InstanceCount::fixed(2)),
        );

        let mut buffer = SoftwareHitBuffer::new(16, 4);
        let generation = stage.render(&mut buffer).unwrap();

        assert_eq!(buffer.draws(), 2);
        assert_eq!(buffer.read(0, 0).map(HitId::get), Some(1));
        assert_eq!(buffer.read(2, 0).map(HitId::get), Some(2));
        assert_eq!(buffer.read(6, 1).map(HitId::get), Some(3));
        assert_eq!(buffer.read(12, 0), None);

        let id = buffer.read(6, 0).unwrap();
        let hit = stage.context().borrow().resolve_hit_id(HitSample::new(generation, id)).unwrap();
        assert_eq!(hit.instance_index, Some(1));
    }

    #[test]
    fn read_around_collects_neighbours() {
        let cones = shapes::cones("cones");
        let mut stage = Stage::new();
        stage.mount(cones.create(), cones.props(vec![BaseShape::at([4.0, 0.0, 0.0])]));

        let mut buffer = SoftwareHitBuffer::new(8, 4);
        stage.render(&mut buffer).unwrap();

        assert!(buffer.read(3, 0).is_none());
        let ids: Vec<u32> = buffer.read_around(3, 0, 1).into_iter().map(HitId::get).collect();
        assert_eq!(ids, vec![1, 1]);
        assert!(buffer.read_around(0, 3, 2).is_empty());
    }
}
