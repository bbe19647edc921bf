//! Binary cross-entropy cost and its derivative with respect to the predictions.
use crate::error::{NetError, NetResult};
use ndarray::{Array2, Zip};

/// Predictions are clipped to `[EPSILON, 1 - EPSILON]` before any log or division.
pub const EPSILON: f64 = 1e-12;

fn check_inputs(op: &'static str, al: &Array2<f64>, y: &Array2<f64>) -> NetResult<()> {
    if al.shape() != y.shape() {
        return Err(NetError::shape(op, al.shape(), y.shape()));
    }
    if al.is_empty() {
        return Err(NetError::EmptyDataset);
    }
    if let Some(bad) = al.iter().find(|v| !v.is_finite()) {
        return Err(NetError::NumericInstability {
            op,
            detail: format!("non-finite prediction {}", bad),
        });
    }
    Ok(())
}

fn clip(al: &Array2<f64>) -> Array2<f64> {
    al.mapv(|p| p.clamp(EPSILON, 1.0 - EPSILON))
}

/// cost = -(1/m) Σ [y·ln(a) + (1-y)·ln(1-a)]
pub fn compute_cost(al: &Array2<f64>, y: &Array2<f64>) -> NetResult<f64> {
    check_inputs("compute_cost", al, y)?;
    let m = al.ncols() as f64;
    let p = clip(al);

    let mut total = 0.0;
    Zip::from(&p).and(y).for_each(|&a, &t| {
        total += t * a.ln() + (1.0 - t) * (1.0 - a).ln();
    });
    let cost = -total / m;

    if !cost.is_finite() {
        return Err(NetError::NumericInstability {
            op: "compute_cost",
            detail: format!("cost evaluated to {}", cost),
        });
    }
    Ok(cost)
}

/// dAL = -(y/a - (1-y)/(1-a)), evaluated on the clipped predictions.
pub fn cost_derivative(al: &Array2<f64>, y: &Array2<f64>) -> NetResult<Array2<f64>> {
    check_inputs("cost_derivative", al, y)?;
    let p = clip(al);
    let mut dal = Array2::<f64>::zeros(p.raw_dim());
    Zip::from(&mut dal)
        .and(&p)
        .and(y)
        .for_each(|d, &a, &t| *d = -(t / a - (1.0 - t) / (1.0 - a)));
    Ok(dal)
}
