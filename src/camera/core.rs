use std::cell::Cell;
use std::f32::consts::FRAC_PI_4;

use glam::{Mat4, Quat, Vec3, Vec4};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewError;
use crate::frame::Frame;
use crate::math::QuatExt;

/// Below this projected distance the revolve-around point is treated as
/// lying in the camera plane and ortho rescaling is skipped.
const MIN_PIVOT_DISTANCE: f32 = 1e-6;

/// How the camera maps view space onto the screen.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionType {
    /// Symmetric frustum driven by the vertical field of view.
    #[default]
    Perspective,
    /// Parallel projection whose extent follows the pivot distance.
    Orthographic,
}

/// Virtual camera: a [`Frame`] plus intrinsic parameters.
///
/// The camera looks down its frame's local −Z axis with +Y up. Projection
/// and view matrices are cached and rebuilt lazily after any change to the
/// camera or its frame.
#[derive(Debug, Clone)]
pub struct Camera {
    frame: Frame,
    projection_type: ProjectionType,
    field_of_view: f32,
    screen_width: u32,
    screen_height: u32,
    scene_center: Vec3,
    scene_radius: f32,
    revolve_around_point: Vec3,
    focus_distance: f32,
    z_near_coefficient: f32,
    z_clipping_coefficient: f32,
    ortho_coefficient: f32,
    projection_cache: Cell<Option<Mat4>>,
    view_cache: Cell<Option<Mat4>>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Perspective camera (45° vertical field of view, 600×400 screen)
    /// framing a unit sphere at the origin.
    #[must_use]
    pub fn new() -> Self {
        let field_of_view = FRAC_PI_4;
        let mut camera = Self {
            frame: Frame::default(),
            projection_type: ProjectionType::Perspective,
            field_of_view,
            screen_width: 600,
            screen_height: 400,
            scene_center: Vec3::ZERO,
            scene_radius: 1.0,
            revolve_around_point: Vec3::ZERO,
            focus_distance: 1.0 / (field_of_view / 2.0).tan(),
            z_near_coefficient: 0.005,
            z_clipping_coefficient: 3.0_f32.sqrt(),
            ortho_coefficient: (field_of_view / 2.0).tan(),
            projection_cache: Cell::new(None),
            view_cache: Cell::new(None),
        };
        camera.show_entire_scene();
        camera
    }

    /// Drop cached matrices; they are rebuilt on next access.
    pub fn invalidate(&self) {
        self.projection_cache.set(None);
        self.view_cache.set(None);
    }

    // ── Frame ──

    /// The camera frame (world pose of the eye).
    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Mutable access to the camera frame. Invalidates cached matrices.
    pub fn frame_mut(&mut self) -> &mut Frame {
        self.invalidate();
        &mut self.frame
    }

    /// Eye position in world space.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.frame.position()
    }

    /// Move the eye to a world-space position.
    pub fn set_position(&mut self, position: Vec3) {
        self.frame_mut().set_position(position);
    }

    /// Camera orientation in world space.
    #[must_use]
    pub fn orientation(&self) -> Quat {
        self.frame.orientation()
    }

    /// Set the world-space camera orientation.
    pub fn set_orientation(&mut self, orientation: Quat) {
        self.frame_mut().set_orientation(orientation);
    }

    /// Orientation from spherical angles: `theta` turns around world Y,
    /// then a positive `phi` tilts the view down around the resulting
    /// horizontal axis. The camera never rolls.
    pub fn set_orientation_angles(&mut self, theta: f32, phi: f32) {
        let yaw = Quat::from_rotation_y(theta);
        let tilt = Quat::from_rotation_x(-phi);
        self.set_orientation(yaw * tilt);
    }

    /// World-space direction the camera looks at (its local −Z).
    #[must_use]
    pub fn view_direction(&self) -> Vec3 {
        self.frame.inverse_transform_of(Vec3::NEG_Z)
    }

    /// World-space up direction of the camera (its local +Y).
    #[must_use]
    pub fn up_vector(&self) -> Vec3 {
        self.frame.inverse_transform_of(Vec3::Y)
    }

    /// World-space right direction of the camera (its local +X).
    #[must_use]
    pub fn right_vector(&self) -> Vec3 {
        self.frame.inverse_transform_of(Vec3::X)
    }

    /// Rotate the camera so it looks along `direction`, keeping the current
    /// up vector as closely as possible. Near-zero directions are ignored.
    pub fn set_view_direction(&mut self, direction: Vec3) {
        if direction.length_squared() < 1e-10 {
            return;
        }
        let mut x_axis = direction.cross(self.up_vector());
        if x_axis.length_squared() < 1e-10 {
            // Looking along the current up vector: keep the right axis.
            x_axis = self.right_vector();
        }
        let orientation = Quat::from_rotated_basis(
            x_axis,
            x_axis.cross(direction),
            -direction,
        );
        self.set_orientation(orientation);
    }

    /// Rotate the camera so it looks at `target`. Position is unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        self.set_view_direction(target - self.position());
    }

    /// Rotate the camera around its view direction so its up vector aligns
    /// with `up`.
    ///
    /// With `no_move` false the camera also orbits the revolve-around point
    /// so that the pivot keeps its place on screen.
    pub fn set_up_vector(&mut self, up: Vec3, no_move: bool) {
        let q = Quat::from_two_vectors(Vec3::Y, self.frame.transform_of(up));
        if !no_move {
            let pivot = self.revolve_around_point;
            let local_pivot = self.frame.coordinates_of(pivot);
            let position =
                pivot - (self.frame.orientation() * q) * local_pivot;
            self.frame_mut().set_position(position);
        }
        self.frame_mut().rotate(q);
    }

    // ── Screen ──

    /// Screen width in pixels.
    #[must_use]
    pub fn screen_width(&self) -> u32 {
        self.screen_width
    }

    /// Screen height in pixels.
    #[must_use]
    pub fn screen_height(&self) -> u32 {
        self.screen_height
    }

    /// Resize the render surface. Zero dimensions are clamped to one pixel.
    pub fn set_screen_width_and_height(&mut self, width: u32, height: u32) {
        self.screen_width = width.max(1);
        self.screen_height = height.max(1);
        self.invalidate();
    }

    /// Width over height.
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.screen_width as f32 / self.screen_height as f32
    }

    // ── Projection parameters ──

    /// Current projection type.
    #[must_use]
    pub fn projection_type(&self) -> ProjectionType {
        self.projection_type
    }

    /// Switch projection type.
    ///
    /// Going from perspective to orthographic resets the ortho coefficient
    /// so both projections agree in the plane of the revolve-around point.
    pub fn set_projection_type(&mut self, projection_type: ProjectionType) {
        if projection_type == ProjectionType::Orthographic
            && self.projection_type == ProjectionType::Perspective
        {
            self.ortho_coefficient = (self.field_of_view / 2.0).tan();
        }
        self.projection_type = projection_type;
        self.invalidate();
    }

    /// Vertical field of view in radians.
    #[must_use]
    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    /// Set the vertical field of view (radians) and update the focus
    /// distance.
    pub fn set_field_of_view(&mut self, fov: f32) {
        self.field_of_view = fov;
        self.focus_distance = self.scene_radius / (fov / 2.0).tan();
        self.invalidate();
    }

    /// Horizontal field of view derived from the vertical one and the
    /// aspect ratio.
    #[must_use]
    pub fn horizontal_field_of_view(&self) -> f32 {
        2.0 * ((self.field_of_view / 2.0).tan() * self.aspect_ratio()).atan()
    }

    /// Set the horizontal field of view by adjusting the vertical one.
    pub fn set_horizontal_field_of_view(&mut self, hfov: f32) {
        let fov = 2.0 * ((hfov / 2.0).tan() / self.aspect_ratio()).atan();
        self.set_field_of_view(fov);
    }

    /// Distance at which the scene radius exactly fills the vertical field
    /// of view.
    #[must_use]
    pub fn focus_distance(&self) -> f32 {
        self.focus_distance
    }

    /// Override the focus distance.
    pub fn set_focus_distance(&mut self, distance: f32) {
        self.focus_distance = distance;
    }

    /// Orthographic scale coefficient.
    #[must_use]
    pub fn ortho_coefficient(&self) -> f32 {
        self.ortho_coefficient
    }

    /// Set the orthographic scale coefficient.
    pub fn set_ortho_coefficient(&mut self, coefficient: f32) {
        self.ortho_coefficient = coefficient;
        self.invalidate();
    }

    /// Near-plane coefficient used to bound `z_near` away from zero.
    #[must_use]
    pub fn z_near_coefficient(&self) -> f32 {
        self.z_near_coefficient
    }

    /// Set the near-plane coefficient.
    pub fn set_z_near_coefficient(&mut self, coefficient: f32) {
        self.z_near_coefficient = coefficient;
        self.invalidate();
    }

    /// Multiple of the scene radius added around the scene center to place
    /// the clipping planes.
    #[must_use]
    pub fn z_clipping_coefficient(&self) -> f32 {
        self.z_clipping_coefficient
    }

    /// Set the clipping coefficient.
    pub fn set_z_clipping_coefficient(&mut self, coefficient: f32) {
        self.z_clipping_coefficient = coefficient;
        self.invalidate();
    }

    // ── Scene ──

    /// Scene bounding-sphere center.
    #[must_use]
    pub fn scene_center(&self) -> Vec3 {
        self.scene_center
    }

    /// Scene bounding-sphere radius.
    #[must_use]
    pub fn scene_radius(&self) -> f32 {
        self.scene_radius
    }

    /// Set the scene center. The revolve-around point follows it.
    pub fn set_scene_center(&mut self, center: Vec3) {
        self.scene_center = center;
        self.set_revolve_around_point(center);
    }

    /// Set the scene radius and the derived focus distance.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidSceneRadius`] (and keeps the previous
    /// radius) when `radius` is not strictly positive.
    pub fn set_scene_radius(&mut self, radius: f32) -> Result<(), ViewError> {
        if radius.is_nan() || radius <= 0.0 {
            log::warn!(
                "scene radius must be positive, got {radius}; keeping {}",
                self.scene_radius
            );
            return Err(ViewError::InvalidSceneRadius(radius));
        }
        self.scene_radius = radius;
        self.focus_distance = radius / (self.field_of_view / 2.0).tan();
        self.invalidate();
        Ok(())
    }

    /// Set the scene bounding sphere in one step.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidSceneRadius`] without touching any state
    /// when `radius` is not strictly positive.
    pub fn set_scene_bounding_sphere(
        &mut self,
        center: Vec3,
        radius: f32,
    ) -> Result<(), ViewError> {
        self.set_scene_radius(radius)?;
        self.set_scene_center(center);
        Ok(())
    }

    /// Set the scene bounding sphere from an axis-aligned box.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::InvalidSceneRadius`] for a degenerate box.
    pub fn set_scene_bounding_box(
        &mut self,
        min: Vec3,
        max: Vec3,
    ) -> Result<(), ViewError> {
        self.set_scene_bounding_sphere((min + max) * 0.5, 0.5 * (max - min).length())
    }

    /// Pivot for rotations and reference point for zoom/pan scaling.
    #[must_use]
    pub fn revolve_around_point(&self) -> Vec3 {
        self.revolve_around_point
    }

    /// Move the pivot. An orthographic image keeps its framing: the ortho
    /// coefficient is rescaled by old/new projected pivot distance.
    pub fn set_revolve_around_point(&mut self, point: Vec3) {
        let previous = self.distance_to_revolve_around_point();
        self.revolve_around_point = point;
        let current = self.distance_to_revolve_around_point();
        if previous > MIN_PIVOT_DISTANCE && current > MIN_PIVOT_DISTANCE {
            self.ortho_coefficient *= previous / current;
        }
        self.invalidate();
    }

    /// Depth of the scene center along the view axis.
    #[must_use]
    pub fn distance_to_scene_center(&self) -> f32 {
        self.frame.coordinates_of(self.scene_center).z.abs()
    }

    /// Depth of the revolve-around point along the view axis.
    #[must_use]
    pub fn distance_to_revolve_around_point(&self) -> f32 {
        self.frame.coordinates_of(self.revolve_around_point).z.abs()
    }

    /// Camera-space coordinates of a world point.
    #[must_use]
    pub fn camera_coordinates_of(&self, point: Vec3) -> Vec3 {
        self.frame.coordinates_of(point)
    }

    /// World coordinates of a camera-space point.
    #[must_use]
    pub fn world_coordinates_of(&self, point: Vec3) -> Vec3 {
        self.frame.inverse_coordinates_of(point)
    }

    // ── Clipping ──

    /// Near clipping distance.
    ///
    /// Follows the scene sphere: `distance_to_scene_center − c·r`, bounded
    /// below by `n·c·r` in perspective and by 0 in orthographic.
    #[must_use]
    pub fn z_near(&self) -> f32 {
        let extent = self.z_clipping_coefficient * self.scene_radius;
        let z = self.distance_to_scene_center() - extent;
        let z_min = match self.projection_type {
            ProjectionType::Perspective => self.z_near_coefficient * extent,
            ProjectionType::Orthographic => 0.0,
        };
        z.max(z_min)
    }

    /// Far clipping distance: `distance_to_scene_center + c·r`.
    #[must_use]
    pub fn z_far(&self) -> f32 {
        self.distance_to_scene_center()
            + self.z_clipping_coefficient * self.scene_radius
    }

    /// Half width and half height of the orthographic frustum.
    ///
    /// Proportional to the projected distance to the revolve-around point,
    /// so dollying the camera zooms an orthographic view.
    #[must_use]
    pub fn ortho_width_height(&self) -> (f32, f32) {
        let dist =
            self.ortho_coefficient * self.distance_to_revolve_around_point();
        let aspect = self.aspect_ratio();
        if aspect < 1.0 {
            (dist, dist / aspect)
        } else {
            (dist * aspect, dist)
        }
    }

    // ── Matrices ──

    /// Rebuild and cache the projection matrix (OpenGL depth range).
    #[must_use]
    pub fn compute_projection_matrix(&self) -> Mat4 {
        let z_near = self.z_near();
        let z_far = self.z_far();
        let matrix = match self.projection_type {
            ProjectionType::Perspective => Mat4::perspective_rh_gl(
                self.field_of_view,
                self.aspect_ratio(),
                z_near,
                z_far,
            ),
            ProjectionType::Orthographic => {
                let (w, h) = self.ortho_width_height();
                Mat4::orthographic_rh_gl(-w, w, -h, h, z_near, z_far)
            }
        };
        self.projection_cache.set(Some(matrix));
        matrix
    }

    /// Rebuild and cache the world → camera matrix.
    ///
    /// The rotation block comes straight from the quaternion products; the
    /// translation column is `−q⁻¹(position)`.
    #[must_use]
    pub fn compute_view_matrix(&self) -> Mat4 {
        let q = self.frame.orientation();
        let q00 = 2.0 * q.x * q.x;
        let q11 = 2.0 * q.y * q.y;
        let q22 = 2.0 * q.z * q.z;
        let q01 = 2.0 * q.x * q.y;
        let q02 = 2.0 * q.x * q.z;
        let q03 = 2.0 * q.x * q.w;
        let q12 = 2.0 * q.y * q.z;
        let q13 = 2.0 * q.y * q.w;
        let q23 = 2.0 * q.z * q.w;

        let t = q.inverse_rotate(self.frame.position());
        let matrix = Mat4::from_cols(
            Vec4::new(1.0 - q11 - q22, q01 - q23, q02 + q13, 0.0),
            Vec4::new(q01 + q23, 1.0 - q22 - q00, q12 - q03, 0.0),
            Vec4::new(q02 - q13, q12 + q03, 1.0 - q11 - q00, 0.0),
            Vec4::new(-t.x, -t.y, -t.z, 1.0),
        );
        self.view_cache.set(Some(matrix));
        matrix
    }

    /// Cached projection matrix, rebuilt if stale.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_cache
            .get()
            .unwrap_or_else(|| self.compute_projection_matrix())
    }

    /// Cached view matrix, rebuilt if stale.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_cache
            .get()
            .unwrap_or_else(|| self.compute_view_matrix())
    }

    /// `projection × view`.
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Snapshot of the render-facing state.
    #[must_use]
    pub fn uniform(&self) -> CameraUniform {
        let mut uniform = CameraUniform::new();
        uniform.update(self);
        uniform
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer layout for one render pass.
pub struct CameraUniform {
    /// World → camera matrix.
    pub view: [[f32; 4]; 4],
    /// Camera → clip matrix.
    pub projection: [[f32; 4]; 4],
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Camera forward direction.
    pub forward: [f32; 3],
    /// Vertical field of view in radians.
    pub fovy: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Identity matrices, camera at the origin looking down −Z.
    #[must_use]
    pub fn new() -> Self {
        let identity = Mat4::IDENTITY.to_cols_array_2d();
        Self {
            view: identity,
            projection: identity,
            view_proj: identity,
            position: [0.0; 3],
            aspect: 1.5,
            forward: [0.0, 0.0, -1.0],
            fovy: FRAC_PI_4,
        }
    }

    /// Refresh every field from the camera.
    pub fn update(&mut self, camera: &Camera) {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        self.view = view.to_cols_array_2d();
        self.projection = projection.to_cols_array_2d();
        self.view_proj = (projection * view).to_cols_array_2d();
        self.position = camera.position().to_array();
        self.aspect = camera.aspect_ratio();
        self.forward = camera.view_direction().to_array();
        self.fovy = camera.field_of_view();
    }
}
