//! Screen ↔ world mapping.
//!
//! [`project`] and [`unproject`] are the classic homogeneous-divide
//! pipelines (the `gluProject` / `gluUnProject` pair). Both report a
//! degenerate divide as `None` instead of returning a bogus point. The
//! `Camera` methods wrap them with the camera's own matrices and a viewport
//! whose Y axis grows downward, matching pointer coordinates.

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::core::{Camera, ProjectionType};

/// Combined matrices with a smaller determinant are treated as singular.
const SINGULAR_DETERMINANT: f32 = 1e-12;

/// Window rectangle used to map normalized device coordinates to pixels.
///
/// A negative `height` flips the Y axis so pixel rows grow downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Window X of the NDC `x = -1` edge.
    pub x: f32,
    /// Window Y of the NDC `y = -1` edge.
    pub y: f32,
    /// Signed extent covered by NDC X in `[-1, 1]`.
    pub width: f32,
    /// Signed extent covered by NDC Y in `[-1, 1]`.
    pub height: f32,
}

impl Viewport {
    /// Top-left-origin viewport covering a `width × height` pixel surface.
    #[must_use]
    pub fn top_left(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: height,
            width,
            height: -height,
        }
    }
}

/// Map a world point to window coordinates.
///
/// The returned `z` is the window depth in `[0, 1]` for points between the
/// clipping planes. Returns `None` when the homogeneous `w` is zero.
#[must_use]
pub fn project(
    point: Vec3,
    view: &Mat4,
    projection: &Mat4,
    viewport: &Viewport,
) -> Option<Vec3> {
    let eye = *view * point.extend(1.0);
    let clip = *projection * eye;
    if clip.w == 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    let unit = ndc * 0.5 + Vec3::splat(0.5);
    Some(Vec3::new(
        viewport.x + unit.x * viewport.width,
        viewport.y + unit.y * viewport.height,
        unit.z,
    ))
}

/// Map window coordinates (with depth) back to a world point.
///
/// Returns `None` when `projection × view` is singular, the viewport is
/// empty, or the homogeneous `w` is zero.
#[must_use]
pub fn unproject(
    window: Vec3,
    view: &Mat4,
    projection: &Mat4,
    viewport: &Viewport,
) -> Option<Vec3> {
    if viewport.width == 0.0 || viewport.height == 0.0 {
        return None;
    }
    let combined = *projection * *view;
    let det = combined.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
        return None;
    }
    let ndc = Vec4::new(
        (window.x - viewport.x) / viewport.width * 2.0 - 1.0,
        (window.y - viewport.y) / viewport.height * 2.0 - 1.0,
        window.z * 2.0 - 1.0,
        1.0,
    );
    let world = combined.inverse() * ndc;
    if world.w == 0.0 {
        return None;
    }
    Some(world.truncate() / world.w)
}

impl Camera {
    /// Viewport covering the camera screen, Y growing downward.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::top_left(
            self.screen_width() as f32,
            self.screen_height() as f32,
        )
    }

    /// Pixel coordinates (and window depth) of a world point.
    #[must_use]
    pub fn projected_coordinates_of(&self, point: Vec3) -> Option<Vec3> {
        project(
            point,
            &self.view_matrix(),
            &self.projection_matrix(),
            &self.viewport(),
        )
    }

    /// World point at the given pixel coordinates and window depth.
    #[must_use]
    pub fn unprojected_coordinates_of(&self, window: Vec3) -> Option<Vec3> {
        unproject(
            window,
            &self.view_matrix(),
            &self.projection_matrix(),
            &self.viewport(),
        )
    }

    /// World point under `pixel` given a depth sampled by the host from its
    /// depth buffer. A depth of 1 (or more) is background and gives `None`.
    #[must_use]
    pub fn point_under_pixel(&self, pixel: Vec2, depth: f32) -> Option<Vec3> {
        if depth >= 1.0 {
            return None;
        }
        self.unprojected_coordinates_of(pixel.extend(depth))
    }

    /// World-space ray through a pixel: `(origin, unit direction)`.
    ///
    /// In perspective the ray starts at the eye; in orthographic it starts
    /// on the camera plane and runs along the view direction.
    #[must_use]
    pub fn convert_click_to_line(&self, pixel: Vec2) -> (Vec3, Vec3) {
        let w = self.screen_width() as f32;
        let h = self.screen_height() as f32;
        match self.projection_type() {
            ProjectionType::Perspective => {
                let origin = self.position();
                let t = (self.field_of_view() / 2.0).tan();
                let local = Vec3::new(
                    (2.0 * pixel.x / w - 1.0) * t * self.aspect_ratio(),
                    (2.0 * (h - pixel.y) / h - 1.0) * t,
                    -1.0,
                );
                let dir = self.frame().inverse_transform_of(local);
                (origin, dir.normalize())
            }
            ProjectionType::Orthographic => {
                let (half_w, half_h) = self.ortho_width_height();
                let local = Vec3::new(
                    (2.0 * pixel.x / w - 1.0) * half_w,
                    -(2.0 * pixel.y / h - 1.0) * half_h,
                    0.0,
                );
                let origin = self.frame().inverse_coordinates_of(local);
                (origin, self.view_direction())
            }
        }
    }

    /// World-space size of one pixel at the depth of `position`.
    #[must_use]
    pub fn pixel_to_scene_ratio(&self, position: Vec3) -> f32 {
        let h = self.screen_height() as f32;
        match self.projection_type() {
            ProjectionType::Perspective => {
                2.0 * self.camera_coordinates_of(position).z.abs()
                    * (self.field_of_view() / 2.0).tan()
                    / h
            }
            ProjectionType::Orthographic => {
                let (_, half_h) = self.ortho_width_height();
                2.0 * half_h / h
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).length() < eps
    }

    #[test]
    fn projects_scene_center_to_screen_center() {
        let camera = Camera::new();
        let screen = camera.projected_coordinates_of(Vec3::ZERO).unwrap();
        assert!((screen.x - 300.0).abs() < 1e-3);
        assert!((screen.y - 200.0).abs() < 1e-3);
        assert!(screen.z > 0.0 && screen.z < 1.0);
    }

    #[test]
    fn pixel_y_grows_downward() {
        let camera = Camera::new();
        let above = camera
            .projected_coordinates_of(Vec3::new(0.0, 0.5, 0.0))
            .unwrap();
        assert!(above.y < 200.0);
    }

    #[test]
    fn unproject_inverts_project() {
        for projection_type in
            [ProjectionType::Perspective, ProjectionType::Orthographic]
        {
            let mut camera = Camera::new();
            camera.set_projection_type(projection_type);
            camera.set_position(Vec3::new(2.0, 1.5, 4.0));
            camera.look_at(Vec3::ZERO);
            for p in [
                Vec3::ZERO,
                Vec3::new(0.3, -0.2, 0.1),
                Vec3::new(-0.5, 0.4, -0.6),
            ] {
                let screen = camera.projected_coordinates_of(p).unwrap();
                let back = camera.unprojected_coordinates_of(screen).unwrap();
                assert!(approx(back, p, 1e-3), "{projection_type:?}: {p} -> {back}");
            }
        }
    }

    #[test]
    fn zero_w_is_not_found() {
        let camera = Camera::new();
        // A point in the eye plane has clip w = 0 in perspective.
        let eye_plane = camera.position() + camera.right_vector();
        assert!(camera.projected_coordinates_of(eye_plane).is_none());
    }

    #[test]
    fn singular_matrix_is_not_found() {
        let viewport = Viewport::top_left(100.0, 100.0);
        let result = unproject(
            Vec3::new(50.0, 50.0, 0.5),
            &Mat4::ZERO,
            &Mat4::IDENTITY,
            &viewport,
        );
        assert!(result.is_none());
    }

    #[test]
    fn near_singular_matrix_is_not_found() {
        let viewport = Viewport::top_left(100.0, 100.0);
        let window = Vec3::new(50.0, 50.0, 0.5);
        // det = 1e-15
        let crushed = Mat4::from_scale(Vec3::splat(1e-5));
        assert!(unproject(window, &Mat4::IDENTITY, &crushed, &viewport).is_none());
        // det = 1e-9, still invertible
        let small = Mat4::from_scale(Vec3::splat(1e-3));
        assert!(unproject(window, &Mat4::IDENTITY, &small, &viewport).is_some());
    }

    #[test]
    fn click_line_passes_through_projected_point() {
        let mut camera = Camera::new();
        camera.set_position(Vec3::new(1.0, 2.0, 5.0));
        camera.look_at(Vec3::ZERO);
        let target = Vec3::new(0.2, -0.3, 0.1);
        let screen = camera.projected_coordinates_of(target).unwrap();
        let (origin, dir) = camera.convert_click_to_line(screen.truncate());
        let to_target = target - origin;
        let along = dir * to_target.dot(dir);
        assert!(approx(origin + along, target, 1e-3));
    }

    #[test]
    fn point_under_pixel_rejects_background() {
        let camera = Camera::new();
        assert!(camera.point_under_pixel(Vec2::new(10.0, 10.0), 1.0).is_none());
        let center = camera.projected_coordinates_of(Vec3::ZERO).unwrap();
        let picked = camera.point_under_pixel(center.truncate(), center.z).unwrap();
        assert!(approx(picked, Vec3::ZERO, 1e-3));
    }

    #[test]
    fn pixel_ratio_matches_projection() {
        let camera = Camera::new();
        let ratio = camera.pixel_to_scene_ratio(Vec3::ZERO);
        let a = camera.projected_coordinates_of(Vec3::ZERO).unwrap();
        let b = camera
            .projected_coordinates_of(Vec3::new(ratio * 10.0, 0.0, 0.0))
            .unwrap();
        assert!(((b.x - a.x) - 10.0).abs() < 1e-2);
    }
}
