/// Continuous mapping from a numeric domain to a pixel range.
#[derive(Debug, Clone)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    /// A degenerate domain (min == max) is widened so positions stay finite;
    /// the common case `[0, 0]` becomes `[0, 1]`.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let domain = if domain.0 == domain.1 {
            (domain.0, domain.0 + 1.0)
        } else {
            domain
        };
        Self { domain, range }
    }

    /// Round the domain outward to nice tick boundaries
    pub fn nice(mut self) -> Self {
        let step = tick_step(self.domain.0, self.domain.1, 10);
        if step > 0.0 {
            self.domain.0 = (self.domain.0 / step).floor() * step;
            self.domain.1 = (self.domain.1 / step).ceil() * step;
        }
        self
    }

    pub fn scale(&self, v: f64) -> f64 {
        let t = (v - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Roughly `count` nice round values covering the domain
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (start, stop) = self.domain;
        let step = tick_step(start, stop, count);
        if step <= 0.0 {
            return vec![start];
        }
        let first = (start / step).ceil();
        let last = (stop / step).floor();
        let mut out = Vec::new();
        let mut i = first;
        while i <= last {
            out.push(i * step);
            i += 1.0;
        }
        out
    }
}

/// Nice step size so that the span holds about `count` intervals
fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let span = (stop - start).abs();
    if span == 0.0 || count == 0 {
        return 0.0;
    }
    let step0 = span / count as f64;
    let power = step0.log10().floor();
    let base = 10f64.powf(power);
    let error = step0 / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    base * factor
}

/// Discrete mapping from category index to a pixel slot with inner and
/// outer padding expressed as a fraction of the step.
#[derive(Debug, Clone)]
pub struct BandScale {
    pub count: usize,
    pub range: (f64, f64),
    pub padding: f64,
    step: f64,
    bandwidth: f64,
    offset: f64,
}

impl BandScale {
    pub fn new(count: usize, range: (f64, f64), padding: f64) -> Self {
        let span = range.1 - range.0;
        let n = count.max(1) as f64;
        let step = span / (n + padding);
        let bandwidth = step * (1.0 - padding);
        let offset = (span - step * (n - padding)) / 2.0;
        Self {
            count,
            range,
            padding,
            step,
            bandwidth,
            offset,
        }
    }

    /// Leading edge of band `i`
    pub fn slot(&self, i: usize) -> f64 {
        self.range.0 + self.offset + i as f64 * self.step
    }

    /// Midpoint of band `i`
    pub fn center(&self, i: usize) -> f64 {
        self.slot(i) + self.bandwidth / 2.0
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_scale_maps_endpoints() {
        let s = LinearScale::new((0.0, 100.0), (150.0, 780.0));
        assert_eq!(s.scale(0.0), 150.0);
        assert_eq!(s.scale(100.0), 780.0);
        assert_eq!(s.scale(50.0), 465.0);
    }

    #[test]
    fn test_linear_scale_inverted_range() {
        // Vertical axes run top-down in pixel space
        let s = LinearScale::new((0.0, 10.0), (460.0, 40.0));
        assert_eq!(s.scale(0.0), 460.0);
        assert_eq!(s.scale(10.0), 40.0);
    }

    #[test]
    fn test_linear_scale_degenerate_domain() {
        let s = LinearScale::new((0.0, 0.0), (0.0, 800.0));
        assert_eq!(s.domain, (0.0, 1.0));
        let v = s.scale(0.0);
        assert!(v.is_finite());
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_nice_rounds_domain_up() {
        let s = LinearScale::new((0.0, 97.0), (0.0, 1.0)).nice();
        assert_eq!(s.domain.0, 0.0);
        assert_eq!(s.domain.1, 100.0);
    }

    #[test]
    fn test_ticks_are_round_and_in_domain() {
        let s = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        let ticks = s.ticks(5);
        assert!(ticks.contains(&0.0));
        assert!(ticks.contains(&100.0));
        for t in &ticks {
            assert!(*t >= 0.0 && *t <= 100.0);
            assert_eq!(t % 20.0, 0.0);
        }
    }

    #[test]
    fn test_band_scale_slots_within_range() {
        let b = BandScale::new(5, (20.0, 520.0), 0.1);
        for i in 0..5 {
            assert!(b.slot(i) >= 20.0);
            assert!(b.slot(i) + b.bandwidth() <= 520.0 + 1e-9);
        }
        // Slots are evenly spaced and do not overlap
        let gap = b.slot(1) - (b.slot(0) + b.bandwidth());
        assert!(gap > 0.0);
    }

    #[test]
    fn test_band_scale_single_category() {
        let b = BandScale::new(1, (0.0, 100.0), 0.1);
        assert!(b.bandwidth() > 0.0);
        assert!(b.slot(0) > 0.0);
        assert!(b.slot(0) + b.bandwidth() < 100.0);
    }
}
