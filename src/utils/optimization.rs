//! Derivative-free minimisation used to fit smoothing and ARMA parameters.

use std::cmp::Ordering;

/// Result of a Nelder-Mead run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best point found.
    pub optimal_point: Vec<f64>,
    /// Objective value at `optimal_point`.
    pub optimal_value: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether the simplex met the tolerance before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimisation.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Relative convergence tolerance on the spread of objective values.
    pub tolerance: f64,
    /// Reflection coefficient.
    pub alpha: f64,
    /// Expansion coefficient.
    pub gamma: f64,
    /// Contraction coefficient.
    pub rho: f64,
    /// Shrink coefficient.
    pub sigma: f64,
    /// Initial simplex step, relative to the starting coordinate when non-zero.
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

impl NelderMeadConfig {
    /// Smaller iteration budget used inside walk-forward loops, where a fit
    /// runs once per test step.
    pub fn fast() -> Self {
        Self {
            max_iter: 400,
            tolerance: 1e-6,
            ..Self::default()
        }
    }
}

/// Simplex vertices paired with their objective values.
struct Simplex {
    vertices: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    /// Vertex indices ordered from best to worst.
    fn ranking(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.vertices.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[a]
                .partial_cmp(&self.values[b])
                .unwrap_or(Ordering::Equal)
        });
        order
    }

    /// Centroid of every vertex except `skip`.
    fn centroid(&self, skip: usize) -> Vec<f64> {
        let dim = self.vertices[0].len();
        let count = (self.vertices.len() - 1) as f64;
        let mut centroid = vec![0.0; dim];
        for (_, vertex) in self.vertices.iter().enumerate().filter(|(i, _)| *i != skip) {
            for (c, x) in centroid.iter_mut().zip(vertex) {
                *c += x;
            }
        }
        centroid.iter_mut().for_each(|c| *c /= count);
        centroid
    }

    /// Largest distance from vertex `anchor` to any other vertex.
    fn diameter(&self, anchor: usize) -> f64 {
        self.vertices
            .iter()
            .map(|v| distance(v, &self.vertices[anchor]))
            .fold(0.0, f64::max)
    }

    fn replace(&mut self, idx: usize, vertex: Vec<f64>, value: f64) {
        self.vertices[idx] = vertex;
        self.values[idx] = value;
    }
}

/// Minimise `objective` starting from `initial` with the Nelder-Mead simplex
/// method.
///
/// Points are clamped into `bounds` when given. Non-finite objective values
/// are treated as `f64::MAX` so that invalid regions are simply avoided.
///
/// # Example
/// ```
/// use anofox_gridsearch::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     NelderMeadConfig::default(),
/// );
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    if dim == 0 {
        return NelderMeadResult {
            optimal_point: vec![],
            optimal_value: f64::NAN,
            iterations: 0,
            converged: false,
        };
    }

    let eval = |x: &[f64]| {
        let v = objective(x);
        if v.is_finite() {
            v
        } else {
            f64::MAX
        }
    };

    let start = clamp_to(initial, bounds);
    let mut vertices = Vec::with_capacity(dim + 1);
    vertices.push(start.clone());
    for i in 0..dim {
        let mut vertex = start.clone();
        let step = if vertex[i].abs() > 1e-10 {
            config.initial_step * vertex[i].abs()
        } else {
            config.initial_step
        };
        vertex[i] += step;
        // A step pushed back onto the bound would collapse the simplex.
        let mut clamped = clamp_to(&vertex, bounds);
        if (clamped[i] - start[i]).abs() < 1e-12 {
            vertex[i] = start[i] - step;
            clamped = clamp_to(&vertex, bounds);
        }
        vertices.push(clamped);
    }
    let values = vertices.iter().map(|v| eval(v)).collect();
    let mut simplex = Simplex { vertices, values };

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let order = simplex.ranking();
        let best = order[0];
        let worst = order[dim];
        let second_worst = order[dim - 1];
        let best_value = simplex.values[best];
        let worst_value = simplex.values[worst];

        // Values alone can agree while the simplex straddles the minimum.
        let diameter = simplex.diameter(best);
        let flat = (worst_value - best_value).abs() <= config.tolerance * (1.0 + best_value.abs());
        let point_scale = 1.0 + norm(&simplex.vertices[best]);
        if (flat && diameter <= config.tolerance.sqrt() * point_scale)
            || diameter < config.tolerance
        {
            converged = true;
            break;
        }

        let centroid = simplex.centroid(worst);

        let reflected = clamp_to(
            &towards(&centroid, &simplex.vertices[worst], -config.alpha),
            bounds,
        );
        let reflected_value = eval(&reflected);

        if reflected_value < best_value {
            let expanded = clamp_to(&towards(&centroid, &reflected, config.gamma), bounds);
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                simplex.replace(worst, expanded, expanded_value);
            } else {
                simplex.replace(worst, reflected, reflected_value);
            }
            continue;
        }

        if reflected_value < simplex.values[second_worst] {
            simplex.replace(worst, reflected, reflected_value);
            continue;
        }

        let (target, target_value) = if reflected_value < worst_value {
            (reflected.clone(), reflected_value)
        } else {
            (simplex.vertices[worst].clone(), worst_value)
        };
        let contracted = clamp_to(&towards(&centroid, &target, config.rho), bounds);
        let contracted_value = eval(&contracted);
        if contracted_value < target_value {
            simplex.replace(worst, contracted, contracted_value);
            continue;
        }

        let anchor = simplex.vertices[best].clone();
        for idx in (0..=dim).filter(|&i| i != best) {
            let shrunk = clamp_to(
                &towards(&anchor, &simplex.vertices[idx], config.sigma),
                bounds,
            );
            let value = eval(&shrunk);
            simplex.replace(idx, shrunk, value);
        }
    }

    let best = simplex.ranking()[0];
    NelderMeadResult {
        optimal_point: simplex.vertices[best].clone(),
        optimal_value: simplex.values[best],
        iterations,
        converged,
    }
}

/// `origin + factor * (point - origin)`.
fn towards(origin: &[f64], point: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(point)
        .map(|(o, p)| o + factor * (p - o))
        .collect()
}

fn clamp_to(point: &[f64], bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    match bounds {
        None => point.to_vec(),
        Some(b) => point
            .iter()
            .enumerate()
            .map(|(i, &x)| match b.get(i) {
                Some(&(lo, hi)) => x.clamp(lo, hi),
                None => x,
            })
            .collect(),
    }
}

fn norm(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum::<f64>().sqrt()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}
