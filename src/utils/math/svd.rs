use ndarray::{Array1, Array2};
use tracing::warn;

/// sweep limit for the Jacobi iteration
/// Convergence is quadratic, small corpora settle in well under 20 sweeps.
pub const MAX_SWEEPS: usize = 64;

/// columns with |<p,q>| <= TOL * |p||q| count as orthogonal
const ORTHOGONALITY_TOL: f64 = 1e-15;

/// singular values below `SINGULAR_VALUE_CUTOFF * σ_max` are stored as exactly 0.0
pub const SINGULAR_VALUE_CUTOFF: f64 = 1e-10;

/// Thin singular value decomposition `A = U · diag(σ) · Vᵀ`
/// For an `m × n` input with `p = min(m, n)`:
/// - `u`: `m × p`, orthonormal columns
///   (columns for σ = 0 are completed from the null space)
/// - `singular_values`: `p` values, descending
/// - `v`: `n × p`, orthonormal columns
#[derive(Debug, Clone)]
pub struct Svd {
    pub u: Array2<f64>,
    pub singular_values: Array1<f64>,
    pub v: Array2<f64>,
    /// sweeps performed
    pub sweeps: usize,
    pub converged: bool,
}

/// One-sided (Hestenes) Jacobi SVD
///
/// Rotates column pairs of `W = A·V` until all columns are mutually orthogonal.
/// Then `σ_j = |W_j|`, `U_j = W_j / σ_j`.
/// Columns of U whose σ is 0 are filled with an orthonormal completion.
/// Wide inputs are decomposed through their transpose.
///
/// Equal singular values keep their original column order, so the output is
/// deterministic for a given input.
pub fn jacobi_svd(a: &Array2<f64>) -> Svd {
    let (m, n) = a.dim();
    if m < n {
        let t = jacobi_svd(&a.t().to_owned());
        return Svd {
            u: t.v,
            singular_values: t.singular_values,
            v: t.u,
            sweeps: t.sweeps,
            converged: t.converged,
        };
    }

    let mut w = a.clone();
    let mut v = Array2::<f64>::eye(n);
    let mut converged = n < 2;
    let mut sweeps = 0;

    while !converged && sweeps < MAX_SWEEPS {
        sweeps += 1;
        let mut rotated = false;
        for p in 0..n {
            for q in (p + 1)..n {
                let (alpha, beta, gamma) = column_products(&w, p, q);
                if gamma == 0.0 || gamma.abs() <= ORTHOGONALITY_TOL * (alpha * beta).sqrt() {
                    continue;
                }
                rotated = true;
                // tan of the rotation angle, smaller root for stability
                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + (1.0 + zeta * zeta).sqrt());
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = c * t;
                rotate(&mut w, p, q, c, s);
                rotate(&mut v, p, q, c, s);
            }
        }
        converged = !rotated;
    }
    if !converged {
        warn!(rows = m, cols = n, sweeps, "jacobi svd hit the sweep limit before converging");
    }

    let norms: Vec<f64> = (0..n)
        .map(|j| {
            let col = w.column(j);
            col.dot(&col).sqrt()
        })
        .collect();
    let sigma_max = norms.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = sigma_max * SINGULAR_VALUE_CUTOFF;

    // 降順 (stable)
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| norms[j].total_cmp(&norms[i]));

    let mut u = Array2::<f64>::zeros((m, n));
    let mut singular_values = Array1::<f64>::zeros(n);
    let mut v_sorted = Array2::<f64>::zeros((n, n));
    let mut filled = vec![false; n];
    for (dst, &src) in order.iter().enumerate() {
        v_sorted.column_mut(dst).assign(&v.column(src));
        let sigma = norms[src];
        if sigma > 0.0 && sigma > cutoff {
            singular_values[dst] = sigma;
            u.column_mut(dst).assign(&(&w.column(src) / sigma));
            filled[dst] = true;
        }
    }
    complete_basis(&mut u, &mut filled);

    Svd {
        u,
        singular_values,
        v: v_sorted,
        sweeps,
        converged,
    }
}

/// Fill every unfilled column of `q` so all columns are orthonormal
/// Gram-Schmidt (applied twice) of the standard basis vectors against the
/// filled columns. Needs `q.nrows() >= q.ncols()`.
fn complete_basis(q: &mut Array2<f64>, filled: &mut [bool]) {
    let m = q.nrows();
    let mut next_basis = 0;
    for j in 0..filled.len() {
        if filled[j] {
            continue;
        }
        while next_basis < m {
            let mut candidate = Array1::<f64>::zeros(m);
            candidate[next_basis] = 1.0;
            next_basis += 1;
            for _ in 0..2 {
                for (k, _) in filled.iter().enumerate().filter(|(_, f)| **f) {
                    let col = q.column(k);
                    let proj = col.dot(&candidate);
                    candidate.scaled_add(-proj, &col);
                }
            }
            let len = candidate.dot(&candidate).sqrt();
            // e_i がほぼ張られた空間内なら次へ
            if len > 1e-8 {
                q.column_mut(j).assign(&(candidate / len));
                filled[j] = true;
                break;
            }
        }
    }
}

#[inline]
fn column_products(w: &Array2<f64>, p: usize, q: usize) -> (f64, f64, f64) {
    let cp = w.column(p);
    let cq = w.column(q);
    (cp.dot(&cp), cq.dot(&cq), cp.dot(&cq))
}

/// apply the plane rotation (c, s) to columns p and q
#[inline]
fn rotate(m: &mut Array2<f64>, p: usize, q: usize, c: f64, s: f64) {
    for mut row in m.rows_mut() {
        let xp = row[p];
        let xq = row[q];
        row[p] = c * xp - s * xq;
        row[q] = s * xp + c * xq;
    }
}
