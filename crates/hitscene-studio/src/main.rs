mod hit_buffer;

use std::time::{Duration, Instant};

use anyhow::{Context, ensure};
use hitscene_engine::input::{
    ClickConfig, ClickSynthesizer, MouseButton, MouseButtonState, PointerEvent, RawPointerInput,
};
use hitscene_engine::logging::{LoggingConfig, init_logging};
use hitscene_ui::prelude::*;

use hit_buffer::{CELL, SoftwareHitBuffer};

const WIDTH: usize = 64;
const HEIGHT: usize = 16;
/// Pointer tolerance in pixels around the cursor.
const PICK_RADIUS: usize = 1;

/// Headless picking session: raw pointer input in, dispatched handlers out.
struct Session {
    stage: Stage<BaseShape, &'static str>,
    buffer: SoftwareHitBuffer,
    clicks: ClickSynthesizer,
    generation: Generation,
    clock: Instant,
}

impl Session {
    fn new() -> Self {
        Self {
            stage: Stage::new(),
            buffer: SoftwareHitBuffer::new(WIDTH, HEIGHT),
            clicks: ClickSynthesizer::new(ClickConfig::default()),
            generation: Generation::default(),
            clock: Instant::now(),
        }
    }

    fn render(&mut self) -> anyhow::Result<Generation> {
        self.buffer.clear();
        self.generation = self.stage.render(&mut self.buffer).context("render context busy")?;
        log::info!("rendered {} ({} draw calls)", self.generation, self.buffer.draws());
        Ok(self.generation)
    }

    /// Feeds one raw input and dispatches every pointer event it produces.
    fn input(&mut self, raw: RawPointerInput, after: Duration) -> Vec<DispatchOutcome> {
        self.clock += after;
        let mut events = Vec::new();
        self.clicks.apply(raw, self.clock, &mut events);

        events.iter().map(|ev| self.dispatch(ev)).collect()
    }

    fn dispatch(&mut self, ev: &PointerEvent) -> DispatchOutcome {
        let generation = self.generation;
        let samples = self
            .buffer
            .read_around(ev.pos.x as usize, ev.pos.y as usize, PICK_RADIUS)
            .into_iter()
            .map(|id| HitSample::new(generation, id));
        let ray = camera_ray(ev.pos);
        let outcome = self.stage.dispatch_any(ev, samples, ray);
        log::info!("{} at ({}, {}) -> {:?}", ev.kind, ev.pos.x, ev.pos.y, outcome);
        outcome
    }

    fn press_and_release(&mut self, pos: Vec2) -> Vec<DispatchOutcome> {
        let mut out = self.input(RawPointerInput::Moved { pos }, Duration::from_millis(16));
        out.extend(self.input(
            RawPointerInput::Button { button: MouseButton::Left, state: MouseButtonState::Pressed },
            Duration::from_millis(16),
        ));
        out.extend(self.input(
            RawPointerInput::Button { button: MouseButton::Left, state: MouseButtonState::Released },
            Duration::from_millis(80),
        ));
        out
    }
}

/// Orthographic camera looking down -z, one scene unit per pixel.
fn camera_ray(pos: Vec2) -> Ray {
    Ray::new(Vec3::new(pos.x, pos.y, 10.0), Vec3::new(0.0, 0.0, -1.0))
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let spheres = shapes::spheres("spheres");
    let cones = shapes::cones("cones");
    let mut session = Session::new();

    let sphere_key = session
        .stage
        .mount(
            spheres.create(),
            spheres
                .props(vec![BaseShape::at([1.0, 1.0, 0.0]).with_id(100)])
                .on_click(|_, info| log::info!("sphere {:?} clicked", info.object.id)),
        )
        .context("mounting spheres")?;

    // Three cones per object; overrides the kind's one-per-shape default.
    let cone_key = session
        .stage
        .mount(
            cones.create(),
            cones
                .props(vec![BaseShape::at([16.0, 1.0, 0.0]).with_id(200)])
                .layer(1)
                .instance_count(InstanceCount::fixed(3))
                .on_mouse_down(|_, info| {
                    let hit = info.ray.point_at(10.0);
                    log::info!(
                        "cone {:?} instance {:?} pressed at ({}, {})",
                        info.object.id,
                        info.instance_index,
                        hit.x,
                        hit.y
                    );
                }),
        )
        .context("mounting cones")?;

    let first = session.render()?;

    // Click on the sphere: only its click handler runs.
    let sphere_px = Vec2::new(2.0, 2.0);
    let outcomes = session.press_and_release(sphere_px);
    ensure!(
        outcomes.contains(&DispatchOutcome::Dispatched { component: sphere_key }),
        "sphere click was not dispatched: {outcomes:?}"
    );

    // Press on the middle cone instance: hit id 3, instance 1.
    let cone_px = Vec2::new((16 + CELL + 1) as f32, 2.0);
    let outcomes = session.press_and_release(cone_px);
    ensure!(
        outcomes.iter().filter(|o| o.is_dispatched()).count() == 1,
        "expected exactly one cone handler: {outcomes:?}"
    );
    ensure!(outcomes.contains(&DispatchOutcome::Dispatched { component: cone_key }));

    // Empty space: nothing runs.
    let outcomes = session.press_and_release(Vec2::new(60.0, 14.0));
    ensure!(outcomes.iter().all(|o| *o == DispatchOutcome::NoHit), "{outcomes:?}");

    // Unmount the cones, re-render, then replay a sample from the old pass.
    session.stage.unmount(cone_key).context("cones were not mounted")?;
    let second = session.render()?;
    ensure!(second > first);

    let stale = HitSample::new(first, HitId::new(3).context("zero hit id")?);
    let ev = PointerEvent::new(MouseEventKind::MouseDown, cone_px);
    let outcome = session.stage.dispatch(&ev, Some(stale), camera_ray(cone_px));
    log::info!("replayed {} from {} -> {:?}", stale.id, stale.generation, outcome);
    ensure!(outcome == DispatchOutcome::Stale, "stale hit resolved: {outcome:?}");

    // The sphere keeps id 1 after re-assignment.
    let outcomes = session.press_and_release(sphere_px);
    ensure!(outcomes.contains(&DispatchOutcome::Dispatched { component: sphere_key }));

    log::info!("all picking scenarios passed");
    Ok(())
}
