use glam::{Mat4, Vec3};
use serde::Serialize;

use crate::api::types::{PovMode, Viewport};

/// Perspective camera plus orbit-control limits for one point of view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraRig {
    pub pov: PovMode,
    pub position: Vec3,
    /// Orbit pivot.
    pub target: Vec3,
    /// Initial view direction when it differs from the pivot.
    pub look_at: Option<Vec3>,
    pub fov_deg: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub aspect: f32,
}

impl CameraRig {
    pub fn for_pov(pov: PovMode) -> Self {
        let base = Self {
            pov,
            position: Vec3::new(-9.0, 4.0, -4.0),
            target: Vec3::ZERO,
            look_at: None,
            fov_deg: 60.0,
            near: 0.01,
            far: 100.0,
            min_distance: 5.0,
            max_distance: 50.0,
            aspect: Viewport::default().aspect(),
        };
        match pov {
            PovMode::Third => base,
            // Standing next to the lamp.
            PovMode::First => Self {
                position: Vec3::new(-1.0, 0.1, 0.4),
                target: Vec3::new(-0.9972, 0.1017, 0.395),
                look_at: Some(Vec3::new(2.0, 2.0, -5.0)),
                min_distance: 0.0,
                max_distance: 0.001,
                ..base
            },
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    /// Where the camera points before the user touches the controls.
    pub fn view_point(&self) -> Vec3 {
        self.look_at.unwrap_or(self.target)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.view_point(), Vec3::Y)
    }

    /// The rig plus both matrices, column-major, for the host camera.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&CameraJson {
            rig: self,
            projection: self.projection_matrix().to_cols_array(),
            view: self.view_matrix().to_cols_array(),
        })
    }
}

#[derive(Serialize)]
struct CameraJson<'a> {
    #[serde(flatten)]
    rig: &'a CameraRig,
    projection: [f32; 16],
    view: [f32; 16],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_person_orbits_origin() {
        let rig = CameraRig::for_pov(PovMode::Third);
        assert_eq!(rig.target, Vec3::ZERO);
        assert_eq!((rig.min_distance, rig.max_distance), (5.0, 50.0));
        let d = rig.position.distance(rig.target);
        assert!(d >= rig.min_distance && d <= rig.max_distance);
    }

    #[test]
    fn first_person_is_pinned() {
        let rig = CameraRig::for_pov(PovMode::First);
        assert_eq!(rig.max_distance, 0.001);
        assert!(rig.position.distance(rig.target) < 0.01);
        assert_eq!(rig.view_point(), Vec3::new(2.0, 2.0, -5.0));
        assert_eq!(rig.fov_deg, 60.0);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut rig = CameraRig::for_pov(PovMode::Third);
        rig.resize(Viewport::new(800.0, 400.0));
        assert_eq!(rig.aspect, 2.0);
        assert!(rig.projection_matrix().is_finite());
    }

    #[test]
    fn json_carries_look_at() {
        let json = CameraRig::for_pov(PovMode::First).to_json().unwrap();
        assert!(json.contains("\"look_at\":[2.0,2.0,-5.0]"));
        assert!(json.contains("\"fov_deg\":60.0"));
    }

    #[test]
    fn json_carries_matrices() {
        let mut rig = CameraRig::for_pov(PovMode::Third);
        rig.resize(Viewport::new(1600.0, 900.0));
        let value: serde_json::Value = serde_json::from_str(&rig.to_json().unwrap()).unwrap();

        let projection: Vec<f32> = serde_json::from_value(value["projection"].clone()).unwrap();
        assert_eq!(projection, rig.projection_matrix().to_cols_array().to_vec());
        let view: Vec<f32> = serde_json::from_value(value["view"].clone()).unwrap();
        assert_eq!(view, rig.view_matrix().to_cols_array().to_vec());
        assert_eq!(value["fov_deg"], 60.0);
    }

    #[test]
    fn view_matrix_puts_view_point_in_front() {
        let rig = CameraRig::for_pov(PovMode::Third);
        let p = rig.view_matrix().transform_point3(rig.view_point());
        // Right-handed view space looks down -Z.
        assert!(p.z < 0.0);
    }
}
