use glam::Vec2;
use std::f32::consts::PI;

/// Boolean pressed-state snapshot handed to the core once per frame by the
/// driver. The core never polls input itself.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub(crate) struct InputState {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub quit: bool,
}

/// World position + heading. Mutated only by `advance` between frames; the
/// casting pass reads it immutably.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) struct Camera {
    pub pos: Vec2,
    /// Heading in radians, wrapped to [0, 2pi).
    pub angle: f32,
    speed: f32,
    angle_step: f32,
}

impl Camera {
    pub fn new(pos: Vec2, angle: f32, speed: f32, angle_step: f32) -> Self {
        Self {
            pos,
            angle,
            speed,
            angle_step,
        }
    }

    /// Apply one fixed step of held input.
    ///
    /// All four translational inputs are independent and additive, so holding
    /// forward and a strafe together moves at full speed on both axes. That
    /// un-normalized diagonal is intentional, kept for reproducibility.
    ///
    /// There is no collision check here; walking through walls is the
    /// driver's problem if it wants to prevent it.
    pub fn advance(&mut self, input: &InputState) {
        let dir = Vec2::from_angle(self.angle);

        if input.forward {
            self.pos += self.speed * dir;
        }
        if input.back {
            self.pos -= self.speed * dir;
        }
        if input.strafe_left {
            self.pos += self.speed * Vec2::new(dir.y, -dir.x);
        }
        if input.strafe_right {
            self.pos += self.speed * Vec2::new(-dir.y, dir.x);
        }

        if input.turn_left {
            self.angle -= self.angle_step;
        }
        if input.turn_right {
            self.angle += self.angle_step;
        }

        // fix camera angle
        while self.angle >= 2. * PI {
            self.angle -= 2. * PI;
        }
        while self.angle < 0. {
            self.angle += 2. * PI;
        }
    }
}
