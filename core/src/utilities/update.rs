use crate::utilities::error::Result;
use crate::utilities::structs::Matrix;

/// Point indices per cluster, recovered from an assignment.
pub fn clusters(assignment: &[usize], k: usize) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (i, &c) in assignment.iter().enumerate() {
        debug_assert!(c < k);
        groups[c].push(i);
    }
    groups
}

fn mean_into(data: &Matrix, members: &[usize], out: &mut [f64]) {
    out.fill(0.0);
    for &ix in members {
        for (m, v) in out.iter_mut().zip(data.row(ix)) {
            *m += v;
        }
    }
    let n = members.len() as f64;
    for m in out.iter_mut() {
        *m /= n;
    }
}

/// New centroid set: each cluster's mean. A cluster without members keeps
/// its centroid from `previous`.
pub fn update(data: &Matrix, assignment: &[usize], previous: &Matrix) -> Result<Matrix> {
    let k = previous.rows();
    let groups = clusters(assignment, k);
    let mut next = Matrix::zeros(k, previous.cols())?;
    for (gi, members) in groups.iter().enumerate() {
        if members.is_empty() {
            log::warn!("cluster {gi} has no points, keeping its centroid");
            next.row_mut(gi).copy_from_slice(previous.row(gi));
        } else {
            mean_into(data, members, next.row_mut(gi));
        }
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_lists_follow_assignment() {
        let g = clusters(&[1, 0, 1, 2, 1], 4);
        assert_eq!(g, vec![vec![1], vec![0, 2, 4], vec![3], vec![]]);
    }

    #[test]
    fn centroid_is_component_mean() {
        let data = Matrix::from_rows(&[vec![0.0, 0.0], vec![2.0, 4.0], vec![9.0, 9.0]]).unwrap();
        let prev = Matrix::from_rows(&[vec![1.0, 1.0], vec![9.0, 9.0]]).unwrap();
        let next = update(&data, &[0, 0, 1], &prev).unwrap();
        assert_eq!(next.row(0), &[1.0, 2.0]);
        assert_eq!(next.row(1), &[9.0, 9.0]);
    }

    #[test]
    fn empty_cluster_keeps_previous_centroid() {
        let data = Matrix::from_rows(&[vec![0.0], vec![1.0]]).unwrap();
        let prev = Matrix::from_rows(&[vec![0.5], vec![-7.25]]).unwrap();
        let next = update(&data, &[0, 0], &prev).unwrap();
        assert_eq!(next.row(0), &[0.5]);
        assert_eq!(next.row(1), &[-7.25]);
        assert!(next.is_finite());
    }
}
