use rayon::{ThreadPool, prelude::*};

use crate::utilities::distance::euclidean;
use crate::utilities::structs::Matrix;

/// Index of the closest centroid. Ties go to the lowest index.
#[inline]
pub fn nearest(point: &[f64], centroids: &Matrix) -> usize {
    let mut idx = 0usize;
    let mut best = f64::INFINITY;
    for (j, c) in centroids.iter_rows().enumerate() {
        let d = euclidean(point, c);
        if d < best {
            best = d;
            idx = j;
        }
    }
    idx
}

pub fn assign(data: &Matrix, centroids: &Matrix) -> Vec<usize> {
    data.iter_rows().map(|p| nearest(p, centroids)).collect()
}

/// Same as [`assign`], with points split across the pool's workers.
pub fn assign_in(pool: &ThreadPool, data: &Matrix, centroids: &Matrix) -> Vec<usize> {
    pool.install(|| {
        data.as_slice()
            .par_chunks_exact(data.cols())
            .map(|p| nearest(p, centroids))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::ThreadPoolBuilder;

    fn m(rows: &[&[f64]]) -> Matrix {
        Matrix::from_rows(&rows.iter().map(|r| r.to_vec()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn picks_closest_centroid() {
        let data = m(&[&[0.0], &[4.0], &[9.0]]);
        let cs = m(&[&[1.0], &[8.0]]);
        assert_eq!(assign(&data, &cs), vec![0, 0, 1]);
    }

    #[test]
    fn tie_goes_to_lowest_index() {
        let cs = m(&[&[0.0, 0.0], &[2.0, 0.0], &[1.0, 5.0]]);
        assert_eq!(nearest(&[1.0, 0.0], &cs), 0);
    }

    #[test]
    fn pool_matches_sequential() {
        let rows: Vec<Vec<f64>> = (0..257).map(|i| vec![(i * 37 % 101) as f64, i as f64]).collect();
        let data = Matrix::from_rows(&rows).unwrap();
        let cs = data.head(5).unwrap();
        let pool = ThreadPoolBuilder::new().num_threads(4).build().unwrap();
        assert_eq!(assign_in(&pool, &data, &cs), assign(&data, &cs));
    }
}
