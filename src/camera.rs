//! Hover (orbit) camera.
//!
//! [`HoverController`] keeps the camera on a sphere around a look-at point. Pan
//! and tilt are the target angles set by pointer drags; the rendered angles
//! follow them over a few frames in [`HoverController::update`]. The controller
//! knows nothing about rendering, it only produces a [`CameraView`].

use cgmath::{Angle, Deg, EuclideanSpace, Matrix4, Point3, Vector3};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};

/// Degrees of pan/tilt per pixel of pointer movement.
pub const DRAG_SENSITIVITY: f32 = 0.3;
/// Distance change per wheel notch.
pub const WHEEL_STEP: f32 = 20.0;

/// Angles and pointer position captured when a drag starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragAnchor {
    pub start_pan: f32,
    pub start_tilt: f32,
    pub start_x: f32,
    pub start_y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelDirection {
    /// Scrolling up: the camera backs off.
    Away,
    /// Scrolling down: the camera closes in.
    Toward,
}

/// What the renderer needs to know about the camera for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraView {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub far: f32,
}

impl CameraView {
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.eye, self.target, Vector3::unit_y())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HoverController {
    pan_angle: f32,
    tilt_angle: f32,
    distance: f32,
    min_tilt: f32,
    max_tilt: f32,
    /// Frames the rendered angles take to catch up with the target angles.
    steps: u32,
    current_pan: f32,
    current_tilt: f32,
    look_at: Point3<f32>,
    y_factor: f32,
    wheel_zoom: bool,
    drag: Option<DragAnchor>,
    cursor: Option<(f32, f32)>,
}

impl HoverController {
    pub const DEFAULT_STEPS: u32 = 8;

    /// Angles are in degrees. Tilt is limited to [-90, 90] until
    /// [`HoverController::with_tilt_bounds`] says otherwise.
    pub fn new(pan_angle: f32, tilt_angle: f32, distance: f32) -> Self {
        let tilt_angle = tilt_angle.clamp(-90.0, 90.0);
        Self {
            pan_angle,
            tilt_angle,
            distance,
            min_tilt: -90.0,
            max_tilt: 90.0,
            steps: Self::DEFAULT_STEPS,
            current_pan: pan_angle,
            current_tilt: tilt_angle,
            look_at: Point3::origin(),
            y_factor: 2.0,
            wheel_zoom: true,
            drag: None,
            cursor: None,
        }
    }

    pub fn with_tilt_bounds(mut self, min_tilt: f32, max_tilt: f32) -> Self {
        self.min_tilt = min_tilt;
        self.max_tilt = max_tilt.max(min_tilt);
        self.tilt_angle = self.clamp_tilt(self.tilt_angle);
        self.current_tilt = self.tilt_angle;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_look_at(mut self, look_at: Point3<f32>) -> Self {
        self.look_at = look_at;
        self
    }

    /// Whether wheel events change the distance.
    pub fn with_wheel_zoom(mut self, enabled: bool) -> Self {
        self.wheel_zoom = enabled;
        self
    }

    fn clamp_tilt(&self, tilt: f32) -> f32 {
        tilt.clamp(self.min_tilt, self.max_tilt)
    }

    pub fn pan_angle(&self) -> f32 {
        self.pan_angle
    }

    pub fn set_pan_angle(&mut self, pan_angle: f32) {
        self.pan_angle = pan_angle;
    }

    pub fn tilt_angle(&self) -> f32 {
        self.tilt_angle
    }

    /// Set the target tilt, clamped to the tilt bounds.
    pub fn set_tilt_angle(&mut self, tilt_angle: f32) {
        self.tilt_angle = self.clamp_tilt(tilt_angle);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
    }

    pub fn tilt_bounds(&self) -> (f32, f32) {
        (self.min_tilt, self.max_tilt)
    }

    /// The angles the camera is currently rendered at.
    pub fn current_angles(&self) -> (f32, f32) {
        (self.current_pan, self.current_tilt)
    }

    pub fn drag(&self) -> Option<&DragAnchor> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a drag at `(x, y)`. Pressing again while dragging re-anchors.
    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        self.drag = Some(DragAnchor {
            start_pan: self.pan_angle,
            start_tilt: self.tilt_angle,
            start_x: x,
            start_y: y,
        });
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let Some(anchor) = self.drag else {
            return;
        };
        self.pan_angle = anchor.start_pan + DRAG_SENSITIVITY * (x - anchor.start_x);
        self.tilt_angle = self.clamp_tilt(anchor.start_tilt + DRAG_SENSITIVITY * (y - anchor.start_y));
    }

    pub fn pointer_released(&mut self) {
        self.drag = None;
    }

    pub fn wheel(&mut self, direction: WheelDirection) {
        match direction {
            WheelDirection::Away => self.distance += WHEEL_STEP,
            WheelDirection::Toward => self.distance -= WHEEL_STEP,
        }
    }

    /// Translate winit input into pointer and wheel calls.
    ///
    /// Returns `true` if the event changed the controller.
    pub fn handle_window_events(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let (x, y) = (position.x as f32, position.y as f32);
                self.cursor = Some((x, y));
                let dragging = self.is_dragging();
                self.pointer_moved(x, y);
                dragging
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => match self.cursor {
                Some((x, y)) => {
                    self.pointer_pressed(x, y);
                    true
                }
                // no position to anchor the drag to yet
                None => false,
            },
            WindowEvent::MouseInput {
                state: ElementState::Released,
                ..
            } => {
                let dragging = self.is_dragging();
                self.pointer_released();
                dragging
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } if self.wheel_zoom => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y as f64,
                    MouseScrollDelta::PixelDelta(position) => position.y,
                };
                if y > 0.0 {
                    self.wheel(WheelDirection::Away);
                    true
                } else if y < 0.0 {
                    self.wheel(WheelDirection::Toward);
                    true
                } else {
                    false
                }
            }
            _ => false,
        }
    }

    /// Move the rendered angles a step toward the target angles.
    pub fn update(&mut self) {
        if self.current_pan == self.pan_angle && self.current_tilt == self.tilt_angle {
            return;
        }
        let divisor = (self.steps + 1) as f32;
        self.current_pan += (self.pan_angle - self.current_pan) / divisor;
        self.current_tilt += (self.tilt_angle - self.current_tilt) / divisor;
        if (self.pan_angle - self.current_pan).abs() < 0.01
            && (self.tilt_angle - self.current_tilt).abs() < 0.01
        {
            self.current_pan = self.pan_angle;
            self.current_tilt = self.tilt_angle;
        }
    }

    /// Snap the rendered angles to the target angles.
    pub fn jump_to_target(&mut self) {
        self.current_pan = self.pan_angle;
        self.current_tilt = self.tilt_angle;
    }

    pub fn eye(&self) -> Point3<f32> {
        let pan = Deg(self.current_pan);
        let tilt = Deg(self.current_tilt);
        let (pan_sin, pan_cos) = (pan.sin(), pan.cos());
        let (tilt_sin, tilt_cos) = (tilt.sin(), tilt.cos());
        Point3::new(
            self.look_at.x + self.distance * pan_sin * tilt_cos,
            self.look_at.y + self.distance * tilt_sin * self.y_factor,
            self.look_at.z + self.distance * pan_cos * tilt_cos,
        )
    }

    pub fn view(&self, far: f32) -> CameraView {
        CameraView {
            eye: self.eye(),
            target: self.look_at,
            far,
        }
    }
}
