/// Round `raw` up to 1, 2, 5 or 10 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    if !(raw.is_finite() && raw > 0.0) {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Axis extent and tick positions covering `[min, max]` with roughly
/// `target` intervals. The axis always starts at a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub lo: f64,
    pub hi: f64,
    pub step: f64,
}

impl Axis {
    pub fn covering(min: f64, max: f64, target: u32) -> Self {
        let (min, max) = if max > min {
            (min, max)
        } else {
            (min - 0.5, min + 0.5)
        };
        let step = nice_step((max - min) / target.max(1) as f64);
        let lo = (min / step).floor() * step;
        let hi = (max / step).ceil() * step;
        Self { lo, hi, step }
    }

    pub fn span(&self) -> f64 {
        self.hi - self.lo
    }

    pub fn ticks(&self) -> Vec<f64> {
        let count = (self.span() / self.step).round() as i64;
        (0..=count).map(|i| self.lo + i as f64 * self.step).collect()
    }

    /// Tick label with as many decimals as the step needs.
    pub fn label(&self, value: f64) -> String {
        let decimals = (-self.step.log10().floor()).max(0.0) as usize;
        let value = if value.abs() < self.step * 1e-9 { 0.0 } else { value };
        format!("{value:.decimals$}")
    }
}
