use lloyd::{KMeansOptions, Matrix, RunState, Session, kmeans};
use proptest::prelude::*;

fn dataset() -> impl Strategy<Value = (Matrix, usize, usize)> {
    (3usize..30, 1usize..4).prop_flat_map(|(n, d)| {
        (
            prop::collection::vec(-100.0f64..100.0, n * d),
            2usize..n,
            2usize..40,
        )
            .prop_map(move |(values, k, max_iter)| {
                (Matrix::from_flat(values, n, d).unwrap(), k, max_iter)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn terminates_within_budget_with_k_finite_centroids((data, k, max_iter) in dataset()) {
        let r = kmeans(&data, k, Some(KMeansOptions { max_iter, ..Default::default() })).unwrap();
        prop_assert!(r.iterations >= 1 && r.iterations <= max_iter);
        prop_assert_ne!(r.state, RunState::Running);
        prop_assert_eq!(r.centroids.rows(), k);
        prop_assert_eq!(r.centroids.cols(), data.cols());
        prop_assert!(r.centroids.is_finite());
        if r.state == RunState::Exhausted {
            prop_assert_eq!(r.iterations, max_iter);
        }
    }

    #[test]
    fn every_iteration_partitions_all_points((data, k, max_iter) in dataset()) {
        let mut s = Session::new(&data, k, Some(KMeansOptions { max_iter, ..Default::default() })).unwrap();
        while s.state() == RunState::Running {
            s.step().unwrap();
            prop_assert_eq!(s.assignment().len(), data.rows());
            prop_assert!(s.assignment().iter().all(|&c| c < k));
            let sizes: usize = lloyd::utilities::clusters(s.assignment(), k)
                .iter()
                .map(Vec::len)
                .sum();
            prop_assert_eq!(sizes, data.rows());
            prop_assert_eq!(s.centroids().rows(), k);
        }
    }

    #[test]
    fn runs_are_deterministic((data, k, max_iter) in dataset()) {
        let o = Some(KMeansOptions { max_iter, ..Default::default() });
        let a = kmeans(&data, k, o).unwrap();
        let b = kmeans(&data, k, o).unwrap();
        prop_assert_eq!(a, b);
    }
}
