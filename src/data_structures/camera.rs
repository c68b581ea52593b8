//! A perspective camera: view and projection matrices in GL clip space.

use cgmath::{Matrix4, Point3, Rad, SquareMatrix, Vector3, perspective};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub fovy: Rad<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(fovy: F, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            fovy: fovy.into(),
            aspect,
            znear,
            zfar,
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    pub projection: Projection,
    view: Matrix4<f32>,
}

impl Camera {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            view: Matrix4::identity(),
        }
    }

    pub fn perspective<F: Into<Rad<f32>>>(fovy: F, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self::new(Projection::new(fovy, aspect, znear, zfar))
    }

    pub fn look_at(mut self, eye: Point3<f32>, target: Point3<f32>, up: Vector3<f32>) -> Self {
        self.set_view(Matrix4::look_at_rh(eye, target, up));
        self
    }

    pub fn set_view(&mut self, view: Matrix4<f32>) {
        self.view = view;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.projection.aspect = aspect;
    }

    /// Matches the aspect ratio to a `width` x `height` viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.set_aspect(width as f32 / height.max(1) as f32);
    }

    pub fn view(&self) -> &Matrix4<f32> {
        &self.view
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.calc_matrix()
    }

    /// Eye position recovered from the view matrix.
    pub fn position(&self) -> Option<Point3<f32>> {
        let world = self.view.invert()?;
        Some(Point3::new(world.w.x, world.w.y, world.w.z))
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, EuclideanSpace, InnerSpace};

    use super::*;

    #[test]
    fn look_at_round_trips_the_eye() {
        let eye = Point3::new(0.0, 2.0, 5.0);
        let camera = Camera::perspective(Deg(45.0), 4.0 / 3.0, 0.1, 100.0)
            .look_at(eye, Point3::origin(), Vector3::unit_y());
        let position = camera.position().unwrap();
        assert!((position - eye).magnitude() < 1e-4);
    }

    #[test]
    fn set_aspect_updates_the_projection() {
        let mut camera = Camera::perspective(Deg(60.0), 1.0, 0.1, 100.0);
        let square = camera.projection_matrix();
        camera.set_aspect(2.0);
        assert_eq!(camera.projection.aspect, 2.0);
        assert_ne!(camera.projection_matrix(), square);
        // x scale halves when the aspect doubles
        assert!((camera.projection_matrix().x.x * 2.0 - square.x.x).abs() < 1e-6);
    }

    #[test]
    fn resize_to_zero_height_does_not_divide_by_zero() {
        let mut camera = Camera::perspective(Deg(60.0), 1.0, 0.1, 100.0);
        camera.resize(640, 0);
        assert_eq!(camera.projection.aspect, 640.0);
    }
}
