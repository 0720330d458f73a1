// ---------------------------------------------------------------------------
// Axis domains
// ---------------------------------------------------------------------------

/// Closed numeric interval an axis maps onto its screen range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn new(min: f64, max: f64) -> Self {
        Domain { min, max }
    }

    /// Smallest domain covering every finite value, or `None` if there are none.
    pub fn extent<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<Domain>, v| match acc {
                None => Some(Domain::new(v, v)),
                Some(d) => Some(Domain::new(d.min.min(v), d.max.max(v))),
            })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    pub fn is_degenerate(&self) -> bool {
        let span = self.span();
        span.is_nan() || span <= 0.0
    }

    /// Widen a zero-width domain by `amount` on each side.
    pub fn padded_if_degenerate(self, amount: f64) -> Self {
        if self.is_degenerate() {
            Domain::new(self.min - amount, self.max + amount)
        } else {
            self
        }
    }

    /// Position of `value` in `[0, 1]` along the domain; a degenerate domain maps to the centre.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() {
            0.5
        } else {
            (value - self.min) / self.span()
        }
    }

    /// Extend the bounds outward to multiples of a round tick step, repeating
    /// until the step settles (the same rounding d3's `scale.nice()` applies).
    pub fn nice(self, count: usize) -> Self {
        if self.is_degenerate() || count == 0 {
            return self;
        }
        let (mut start, mut stop) = (self.min, self.max);
        let mut previous: Option<f64> = None;
        // The step stabilises within two or three rounds; the bound is a guard.
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous == Some(step) || step == 0.0 || !step.is_finite() {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            }
            previous = Some(step);
        }
        Domain::new(start, stop)
    }
}

/// Tick step for roughly `count` ticks over `[start, stop]`. Steps below one are
/// returned as the negated reciprocal so they stay exact integers.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let e10 = 50f64.sqrt();
    let e5 = 10f64.sqrt();
    let e2 = 2f64.sqrt();

    let step = (stop - start) / count as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= e10 {
        10.0
    } else if error >= e5 {
        5.0
    } else if error >= e2 {
        2.0
    } else {
        1.0
    };
    if power < 0.0 {
        -(10f64.powf(-power) / factor)
    } else {
        10f64.powf(power) * factor
    }
}
