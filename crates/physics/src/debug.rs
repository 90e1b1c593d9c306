use glam::Vec3;
use rapier3d::math::{Point, Real};
use rapier3d::pipeline::{DebugRenderBackend, DebugRenderObject};

/// One collider wireframe segment, already converted to renderable RGBA.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: [f32; 4],
}

/// Backend that buffers wireframe segments instead of drawing them.
pub(crate) struct LineCollector<'a> {
    pub(crate) lines: &'a mut Vec<DebugLine>,
}

impl DebugRenderBackend for LineCollector<'_> {
    fn draw_line(
        &mut self,
        _object: DebugRenderObject<'_>,
        a: Point<Real>,
        b: Point<Real>,
        color: [f32; 4],
    ) {
        self.lines.push(DebugLine {
            start: Vec3::new(a.x, a.y, a.z),
            end: Vec3::new(b.x, b.y, b.z),
            color: hsla_to_rgba(color),
        });
    }
}

/// Convert the debug pipeline's HSLA colors (hue in degrees, rest in 0..1)
/// to straight RGBA.
pub fn hsla_to_rgba(hsla: [f32; 4]) -> [f32; 4] {
    let [h, s, l, a] = hsla;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let hp = (h / 60.0).rem_euclid(6.0);
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c / 2.0;
    [r + m, g + m, b + m, a]
}
