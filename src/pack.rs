//! Deterministic front-chain circle packing.
//!
//! Circles are placed one at a time, each tangent to two circles on the
//! current front chain, backing up along the chain whenever the candidate
//! position overlaps an earlier circle. Identical input always produces
//! identical output; no two placed circles overlap.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    fn new(r: f64) -> Self {
        Self { x: 0.0, y: 0.0, r }
    }
}

/// Position `c` tangent to both `b` and `a`, on the outside of the chain.
fn place(b: Circle, a: Circle, c: &mut Circle) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r) * (a.r + c.r);
        let b2 = (b.r + c.r) * (b.r + c.r);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + a.r + c.r;
        c.y = a.y;
    }
}

fn intersects(a: Circle, b: Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    if dr <= 0.0 {
        return false;
    }
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr * dr > dx * dx + dy * dy
}

/// Weighted midpoint distance of a front-chain edge from the origin; the
/// chain advances to the edge closest to the center of the packing.
fn score(circles: &[Circle], next: &[usize], i: usize) -> f64 {
    let a = circles[i];
    let b = circles[next[i]];
    let ab = a.r + b.r;
    if ab == 0.0 {
        return 0.0;
    }
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Pack circles of the given radii around the origin, in input order.
pub fn pack_circles(radii: &[f64]) -> Vec<Circle> {
    let n = radii.len();
    let mut circles: Vec<Circle> = radii.iter().map(|&r| Circle::new(r)).collect();
    if n == 0 {
        return circles;
    }
    if n == 1 {
        return circles;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles;
    }

    let (c0, c1) = (circles[0], circles[1]);
    let mut third = circles[2];
    place(c1, c0, &mut third);
    circles[2] = third;

    // Front chain as a linked list over circle indices
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    next[0] = 1;
    prev[2] = 1;
    next[1] = 2;
    prev[0] = 2;
    next[2] = 0;
    prev[1] = 0;

    let mut a = 0usize;
    let mut b = 1usize;

    for i in 3..n {
        loop {
            let mut c = circles[i];
            place(circles[a], circles[b], &mut c);
            circles[i] = c;

            // Walk outward from the insertion point in both directions,
            // looking for the nearest chain circle the candidate overlaps
            let mut j = next[b];
            let mut k = prev[a];
            let mut sj = circles[b].r;
            let mut sk = circles[a].r;
            let mut retry = false;
            loop {
                if sj <= sk {
                    if intersects(circles[j], circles[i]) {
                        b = j;
                        next[a] = b;
                        prev[b] = a;
                        retry = true;
                        break;
                    }
                    sj += circles[j].r;
                    j = next[j];
                } else {
                    if intersects(circles[k], circles[i]) {
                        a = k;
                        next[a] = b;
                        prev[b] = a;
                        retry = true;
                        break;
                    }
                    sk += circles[k].r;
                    k = prev[k];
                }
                if j == next[k] {
                    break;
                }
            }
            if retry {
                continue;
            }

            // Splice the new circle into the chain between a and b
            prev[i] = a;
            next[i] = b;
            next[a] = i;
            prev[b] = i;
            b = i;

            // Re-anchor on the chain edge closest to the packing center
            let mut best = a;
            let mut best_score = score(&circles, &next, a);
            let mut t = next[b];
            while t != b {
                let s = score(&circles, &next, t);
                if s < best_score {
                    best = t;
                    best_score = s;
                }
                t = next[t];
            }
            a = best;
            b = next[a];
            break;
        }
    }

    circles
}

/// Bounding box of a set of circles as (min_x, min_y, max_x, max_y)
pub fn bounds(circles: &[Circle]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for c in circles {
        min_x = min_x.min(c.x - c.r);
        min_y = min_y.min(c.y - c.r);
        max_x = max_x.max(c.x + c.r);
        max_y = max_y.max(c.y + c.r);
    }
    if min_x > max_x {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (min_x, min_y, max_x, max_y)
    }
}

/// Pack circles sized area-proportionally to `values` (radius = sqrt of the
/// value, rescaled) into a width x height canvas, keeping at least `padding`
/// pixels between any two circles. Returned radii exclude the padding.
pub fn pack_fit(values: &[f64], width: f64, height: f64, padding: f64) -> Vec<Circle> {
    let unit: Vec<f64> = values.iter().map(|&v| v.sqrt()).collect();
    if unit.is_empty() {
        return Vec::new();
    }

    if unit.iter().all(|&u| u == 0.0) {
        return unit
            .iter()
            .map(|_| Circle {
                x: width / 2.0,
                y: height / 2.0,
                r: 0.0,
            })
            .collect();
    }

    // First pass at unit size just to estimate the value-to-pixel factor
    let rough = pack_circles(&unit);
    let (x0, y0, x1, y1) = bounds(&rough);
    let mut k = (width / (x1 - x0).max(1e-9)).min(height / (y1 - y0).max(1e-9));

    // Two refinement passes at pixel size with half the padding folded into
    // each radius; the second pass absorbs the overflow the padding added
    let mut packed = Vec::new();
    for _ in 0..2 {
        let inflated: Vec<f64> = unit.iter().map(|&u| k * u + padding / 2.0).collect();
        packed = pack_circles(&inflated);
        let (x0, y0, x1, y1) = bounds(&packed);
        let fit = (width / (x1 - x0).max(1e-9)).min(height / (y1 - y0).max(1e-9));
        if fit >= 1.0 {
            break;
        }
        k *= fit;
    }

    // Center in the canvas and strip the padding back off the radii
    let (x0, y0, x1, y1) = bounds(&packed);
    let dx = width / 2.0 - (x0 + x1) / 2.0;
    let dy = height / 2.0 - (y0 + y1) / 2.0;
    packed
        .iter()
        .zip(&unit)
        .map(|(c, &u)| Circle {
            x: c.x + dx,
            y: c.y + dy,
            r: k * u,
        })
        .collect()
}
