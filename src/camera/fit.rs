//! Camera fitting: move (or rescale) the camera so a sphere, a box or a
//! dragged screen rectangle fills the view.
//!
//! Perspective fits translate the camera along its current view direction.
//! Orthographic fits center the target on the view axis with a move
//! perpendicular to it, then rescale the ortho coefficient, so the image
//! zooms without the camera dollying.

use glam::{Vec2, Vec3};

use super::core::{Camera, ProjectionType};
use crate::frame::Frame;

/// Axis-aligned pixel rectangle (Y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// One corner.
    pub min: Vec2,
    /// The opposite corner.
    pub max: Vec2,
}

impl ScreenRect {
    /// Rectangle spanned by two arbitrary corners.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Center pixel.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Width and height in pixels.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Whether the rectangle covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let size = self.size();
        size.x <= 0.0 || size.y <= 0.0
    }
}

impl Camera {
    /// Frame the sphere `(center, radius)`.
    ///
    /// Perspective: the camera moves along its view direction to
    /// `radius / sin(half_fov)` from the center, using whichever of the
    /// horizontal/vertical half-angles needs the larger distance.
    pub fn fit_sphere(&mut self, center: Vec3, radius: f32) {
        match self.projection_type() {
            ProjectionType::Perspective => {
                let y_view = radius / (self.field_of_view() / 2.0).sin();
                let x_view =
                    radius / (self.horizontal_field_of_view() / 2.0).sin();
                let distance = x_view.max(y_view);
                let position = center - distance * self.view_direction();
                self.set_position(position);
            }
            ProjectionType::Orthographic => {
                self.fit_orthographic(center, Vec2::splat(radius), radius);
            }
        }
    }

    /// Frame the sphere enclosing the axis-aligned box `[min, max]`.
    pub fn fit_bounding_box(&mut self, min: Vec3, max: Vec3) {
        let center = (min + max) * 0.5;
        let radius = 0.5 * (max - min).length();
        self.fit_sphere(center, radius);
    }

    /// Zoom so the world region under a pixel rectangle fills the view.
    ///
    /// The rectangle is back-projected onto the plane through the
    /// revolve-around point perpendicular to the view direction. Empty
    /// rectangles are ignored.
    pub fn fit_screen_region(&mut self, rect: &ScreenRect) {
        if rect.is_empty() {
            return;
        }
        let view_dir = self.view_direction();
        let plane_distance =
            (self.revolve_around_point() - self.position()).dot(view_dir);
        let on_plane = |camera: &Self, pixel: Vec2| {
            let (origin, dir) = camera.convert_click_to_line(pixel);
            origin + dir * (plane_distance / dir.dot(view_dir))
        };

        let center_pixel = rect.center();
        let center = on_plane(self, center_pixel);
        let edge_x = on_plane(self, Vec2::new(rect.min.x, center_pixel.y));
        let edge_y = on_plane(self, Vec2::new(center_pixel.x, rect.min.y));
        let half_w = (edge_x - center).length();
        let half_h = (edge_y - center).length();

        match self.projection_type() {
            ProjectionType::Perspective => {
                let dist_x =
                    half_w / (self.horizontal_field_of_view() / 2.0).sin();
                let dist_y = half_h / (self.field_of_view() / 2.0).sin();
                let distance = dist_x.max(dist_y);
                self.set_position(center - distance * view_dir);
            }
            ProjectionType::Orthographic => {
                let depth = half_w.max(half_h);
                self.fit_orthographic(center, Vec2::new(half_w, half_h), depth);
            }
        }
    }

    /// Center `center` on the view axis and rescale the ortho coefficient
    /// so the half extents fit. `min_depth` keeps the target in front of
    /// the camera.
    fn fit_orthographic(&mut self, center: Vec3, half: Vec2, min_depth: f32) {
        let view_dir = self.view_direction();
        let depth = (center - self.position()).dot(view_dir);
        let depth = if depth < min_depth { 2.0 * min_depth } else { depth };
        self.set_position(center - depth * view_dir);

        let pivot_distance = self.distance_to_revolve_around_point();
        if pivot_distance <= f32::EPSILON {
            return;
        }
        let aspect = self.aspect_ratio();
        let (w_scale, h_scale) = if aspect < 1.0 {
            (1.0, 1.0 / aspect)
        } else {
            (aspect, 1.0)
        };
        let needed = (half.x / w_scale).max(half.y / h_scale);
        self.set_ortho_coefficient(needed / pivot_distance);
    }

    /// Frame the whole scene bounding sphere.
    pub fn show_entire_scene(&mut self) {
        self.fit_sphere(self.scene_center(), self.scene_radius());
    }

    /// Slide the camera perpendicular to its view direction so the scene
    /// center lies on the view axis.
    pub fn center_scene(&mut self) {
        let center = self.scene_center();
        let view_dir = self.view_direction();
        self.frame_mut().project_on_line(center, view_dir);
    }

    /// Pose 90% of the way from the camera to `target`, looking at it.
    ///
    /// Meant as the end point of a
    /// [`CameraTransition`](super::transition::CameraTransition).
    #[must_use]
    pub fn zoom_on_point_pose(&self, target: Vec3) -> Frame {
        let mut probe = self.clone();
        let position = 0.1 * self.position() + 0.9 * target;
        probe.set_position(position);
        probe.look_at(target);
        probe.frame().clone()
    }
}
