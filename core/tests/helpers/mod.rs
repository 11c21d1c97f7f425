// tests/helpers/mod.rs
use lloyd::Matrix;

/// Build a `Matrix` from row literals.
pub fn matrix(rows: &[&[f64]]) -> Matrix {
    let rows: Vec<Vec<f64>> = rows.iter().map(|r| r.to_vec()).collect();
    Matrix::from_rows(&rows).unwrap()
}

/// Points 0, 1, ..., n-1 on a line.
#[allow(dead_code)]
pub fn line(n: usize) -> Matrix {
    let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64]).collect();
    Matrix::from_rows(&rows).unwrap()
}

/// Small deterministic wiggle in [-0.5, 0.5].
#[allow(dead_code)]
pub fn jitter(i: u32) -> f64 {
    let mut x = i.wrapping_mul(1664525).wrapping_add(1013904223);
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    (x as f64 / (u32::MAX as f64)) - 0.5
}

/// `per` points around each center, interleaved so the first rows cover
/// every blob. Spread is at most `spread / 2` per coordinate.
#[allow(dead_code)]
pub fn blobs(centers: &[&[f64]], per: usize, spread: f64) -> Matrix {
    let mut rows = Vec::with_capacity(centers.len() * per);
    let mut s = 1u32;
    for _ in 0..per {
        for c in centers {
            let p: Vec<f64> = c
                .iter()
                .map(|&v| {
                    s += 1;
                    v + spread * jitter(s)
                })
                .collect();
            rows.push(p);
        }
    }
    Matrix::from_rows(&rows).unwrap()
}

/// Check two numbers are close within a simple absolute tolerance.
#[allow(dead_code)]
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol
}

/// Row-wise `approx_eq` for whole matrices.
#[allow(dead_code)]
pub fn rows_close(m: &Matrix, expected: &[&[f64]], tol: f64) -> bool {
    m.rows() == expected.len()
        && m.iter_rows().zip(expected).all(|(r, e)| {
            r.len() == e.len() && r.iter().zip(e.iter()).all(|(&a, &b)| approx_eq(a, b, tol))
        })
}
