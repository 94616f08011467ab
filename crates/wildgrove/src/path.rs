//! Scripted focal-point paths.

use wildgrove_core::PixelPos;

/// Square spiral around a start point: east, south, west, north, with the
/// leg length growing by one step every two legs.
#[derive(Clone, Debug)]
pub struct SpiralPath {
    position: PixelPos,
    step: f64,
    direction: u8,
    leg_length: u32,
    steps_in_leg: u32,
    legs_completed: u32,
}

impl SpiralPath {
    /// Starts a spiral at `start`, moving `step` pixels per item.
    #[must_use]
    pub const fn new(start: PixelPos, step: f64) -> Self {
        Self {
            position: start,
            step,
            direction: 0,
            leg_length: 1,
            steps_in_leg: 0,
            legs_completed: 0,
        }
    }
}

impl Iterator for SpiralPath {
    type Item = PixelPos;

    fn next(&mut self) -> Option<PixelPos> {
        match self.direction {
            0 => self.position.x += self.step,
            1 => self.position.y += self.step,
            2 => self.position.x -= self.step,
            _ => self.position.y -= self.step,
        }

        self.steps_in_leg += 1;
        if self.steps_in_leg >= self.leg_length {
            self.steps_in_leg = 0;
            self.direction = (self.direction + 1) % 4;
            self.legs_completed += 1;
            if self.legs_completed % 2 == 0 {
                self.leg_length += 1;
            }
        }

        Some(self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spiral_first_steps() {
        let points: Vec<_> = SpiralPath::new(PixelPos::new(0.0, 0.0), 10.0).take(6).collect();

        assert_eq!(
            points,
            vec![
                PixelPos::new(10.0, 0.0),
                PixelPos::new(10.0, 10.0),
                PixelPos::new(0.0, 10.0),
                PixelPos::new(-10.0, 10.0),
                PixelPos::new(-10.0, 0.0),
                PixelPos::new(-10.0, -10.0),
            ]
        );
    }

    #[test]
    fn test_spiral_grows() {
        let far = SpiralPath::new(PixelPos::default(), 1.0)
            .take(10_000)
            .map(|p| p.x.abs().max(p.y.abs()))
            .fold(0.0_f64, f64::max);
        assert!(far >= 49.0, "spiral stayed within {far}");
    }
}
