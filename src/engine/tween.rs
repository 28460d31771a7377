use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    Linear,
    /// power2.inOut
    QuadInOut,
    /// power3.out
    CubicOut,
    /// back.out(overshoot)
    BackOut(f64),
    /// sine.inOut
    SineInOut,
}

impl Ease {
    pub fn apply(self, x: f64) -> f64 {
        let x = x.clamp(0.0, 1.0);
        match self {
            Self::Linear => x,
            Self::QuadInOut => {
                if x < 0.5 {
                    2.0 * x * x
                } else {
                    1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - x).powi(3),
            Self::BackOut(s) => 1.0 + (s + 1.0) * (x - 1.0).powi(3) + s * (x - 1.0).powi(2),
            Self::SineInOut => -((PI * x).cos() - 1.0) / 2.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Repeat {
    Once,
    /// Runs forever, reversing direction on every pass.
    YoyoForever,
}

/// Scalar tween driven by the frame delta, seconds throughout.
#[derive(Clone, Debug)]
pub struct Tween {
    from: f64,
    to: f64,
    duration: f64,
    delay: f64,
    elapsed: f64,
    ease: Ease,
    repeat: Repeat,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration: f64, ease: Ease) -> Self {
        Tween {
            from,
            to,
            duration: duration.max(0.0),
            delay: 0.0,
            elapsed: 0.0,
            ease,
            repeat: Repeat::Once,
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn yoyo(mut self) -> Self {
        self.repeat = Repeat::YoyoForever;
        self
    }

    /// Advances by `dt` seconds and returns the new value.
    pub fn update(&mut self, dt: f64) -> f64 {
        self.elapsed += dt.max(0.0);
        self.value()
    }

    pub fn value(&self) -> f64 {
        let active = self.elapsed - self.delay;
        if active <= 0.0 {
            return self.from;
        }
        if self.duration == 0.0 || (self.repeat == Repeat::Once && active >= self.duration) {
            return self.to;
        }
        let progress = match self.repeat {
            Repeat::Once => (active / self.duration).min(1.0),
            Repeat::YoyoForever => {
                let pass = (active / self.duration).floor();
                let within = active / self.duration - pass;
                if pass as u64 % 2 == 0 {
                    within
                } else {
                    1.0 - within
                }
            }
        };
        self.from + (self.to - self.from) * self.ease.apply(progress)
    }

    pub fn is_finished(&self) -> bool {
        self.repeat == Repeat::Once && self.elapsed >= self.delay + self.duration
    }

    pub fn target(&self) -> f64 {
        self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn eases_pin_endpoints() {
        for ease in [
            Ease::Linear,
            Ease::QuadInOut,
            Ease::CubicOut,
            Ease::BackOut(1.7),
            Ease::SineInOut,
        ] {
            assert_relative_eq!(ease.apply(0.0), 0.0, epsilon = 1e-12);
            assert_relative_eq!(ease.apply(1.0), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn back_out_overshoots() {
        let peak = (1..100)
            .map(|i| Ease::BackOut(1.7).apply(f64::from(i) / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn tween_respects_delay_and_finishes() {
        let mut tween = Tween::new(0.0, 1.0, 0.1, Ease::Linear).with_delay(0.3);
        assert_relative_eq!(tween.update(0.2), 0.0);
        assert_relative_eq!(tween.update(0.15), 0.5, epsilon = 1e-9);
        assert!(!tween.is_finished());
        assert_relative_eq!(tween.update(1.0), 1.0);
        assert!(tween.is_finished());
    }

    #[test]
    fn yoyo_returns_and_never_finishes() {
        let mut tween = Tween::new(1.5, 2.2, 1.0, Ease::Linear).yoyo();
        assert_relative_eq!(tween.update(1.5), 1.85, epsilon = 1e-9);
        assert_relative_eq!(tween.update(0.5), 1.5, epsilon = 1e-9);
        assert!(!tween.is_finished());
    }
}
