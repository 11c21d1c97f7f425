use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Serialize;

use crate::utilities::assign::{assign, assign_in, nearest};
use crate::utilities::config::validate;
use crate::utilities::distance::{euclidean, squared_euclidean};
use crate::utilities::error::{KMeansError, Result};
use crate::utilities::structs::{KMeansOptions, Matrix, RunState, StopPolicy};
use crate::utilities::update::{clusters, update};

/// Outcome of one clustering run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KMeansResult {
    pub centroids: Matrix,
    /// Assignment that produced `centroids`.
    pub assignment: Vec<usize>,
    pub iterations: usize,
    /// Largest centroid movement of the last iteration.
    pub movement: f64,
    pub state: RunState,
}

impl KMeansResult {
    pub fn converged(&self) -> bool {
        self.state == RunState::Converged
    }

    pub fn clusters(&self) -> Vec<Vec<usize>> {
        clusters(&self.assignment, self.centroids.rows())
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.rows()];
        for &c in &self.assignment {
            sizes[c] += 1;
        }
        sizes
    }

    /// Within-cluster sum of squared distances for the `data` this result
    /// was computed from.
    pub fn inertia(&self, data: &Matrix) -> Result<f64> {
        if data.rows() != self.assignment.len() || data.cols() != self.centroids.cols() {
            return Err(KMeansError::malformed(
                0,
                format!(
                    "data is {}x{}, result covers {}x{}",
                    data.rows(),
                    data.cols(),
                    self.assignment.len(),
                    self.centroids.cols()
                ),
            ));
        }
        Ok(data
            .iter_rows()
            .zip(&self.assignment)
            .map(|(p, &c)| squared_euclidean(p, self.centroids.row(c)))
            .sum())
    }

    pub fn predict(&self, point: &[f64]) -> Result<usize> {
        if point.len() != self.centroids.cols() {
            return Err(KMeansError::malformed(
                0,
                format!(
                    "point has {} coordinates, expected {}",
                    point.len(),
                    self.centroids.cols()
                ),
            ));
        }
        Ok(nearest(point, &self.centroids))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// State of one clustering invocation. Owns the centroids, the iteration
/// counter and the optional worker pool; the dataset is only borrowed.
pub struct Session<'a> {
    data: &'a Matrix,
    centroids: Matrix,
    assignment: Vec<usize>,
    iteration: usize,
    movement: f64,
    state: RunState,
    options: KMeansOptions,
    pool: Option<ThreadPool>,
}

impl<'a> Session<'a> {
    /// Seeds the centroids with the first `k` points.
    pub fn new(data: &'a Matrix, k: usize, options: Option<KMeansOptions>) -> Result<Self> {
        let options = options.unwrap_or_default();
        validate(k, data.rows(), data.cols(), &options)?;
        let centroids = data.head(k)?;
        Self::start(data, centroids, options)
    }

    /// Starts from caller-provided centroids instead of the first points.
    pub fn with_centroids(
        data: &'a Matrix,
        initial: Matrix,
        options: Option<KMeansOptions>,
    ) -> Result<Self> {
        let options = options.unwrap_or_default();
        validate(initial.rows(), data.rows(), data.cols(), &options)?;
        if initial.cols() != data.cols() {
            return Err(KMeansError::malformed(
                0,
                format!(
                    "initial centroids have {} coordinates, points have {}",
                    initial.cols(),
                    data.cols()
                ),
            ));
        }
        Self::start(data, initial, options)
    }

    fn start(data: &'a Matrix, centroids: Matrix, options: KMeansOptions) -> Result<Self> {
        let threads = worker_count(options.cores, data.rows());
        let pool = if threads > 1 {
            let p = ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .map_err(|e| KMeansError::WorkerPool(e.to_string()))?;
            Some(p)
        } else {
            None
        };
        log::debug!(
            "k-means: n={} d={} k={} max_iter={} epsilon={} stop={:?}",
            data.rows(),
            data.cols(),
            centroids.rows(),
            options.max_iter,
            options.epsilon,
            options.stop
        );
        Ok(Self {
            data,
            centroids,
            assignment: Vec::new(),
            iteration: 0,
            movement: f64::INFINITY,
            state: RunState::Running,
            options,
            pool,
        })
    }

    /// One assignment + update cycle. Returns the largest centroid movement.
    /// Stepping a finished session is allowed; the state is re-evaluated.
    pub fn step(&mut self) -> Result<f64> {
        let assignment = match &self.pool {
            Some(pool) => assign_in(pool, self.data, &self.centroids),
            None => assign(self.data, &self.centroids),
        };
        let next = update(self.data, &assignment, &self.centroids)?;
        let movement = max_movement(&self.centroids, &next);

        self.centroids = next;
        self.assignment = assignment;
        self.iteration += 1;
        self.movement = movement;
        self.state = self.evaluate();
        log::debug!(
            "iteration {}: movement {:.6} ({:?})",
            self.iteration,
            movement,
            self.state
        );
        Ok(movement)
    }

    fn evaluate(&self) -> RunState {
        let eps = self.options.epsilon;
        let settled = match self.options.stop {
            StopPolicy::Threshold => self.movement < eps,
            StopPolicy::Stable => self.movement <= eps,
        };
        if settled {
            RunState::Converged
        } else if self.iteration >= self.options.max_iter {
            RunState::Exhausted
        } else {
            RunState::Running
        }
    }

    pub fn run(mut self) -> Result<KMeansResult> {
        while self.state == RunState::Running {
            self.step()?;
        }
        log::info!(
            "k-means finished after {} iterations ({:?}, movement {:.6})",
            self.iteration,
            self.state,
            self.movement
        );
        Ok(self.into_result())
    }

    pub fn into_result(self) -> KMeansResult {
        KMeansResult {
            centroids: self.centroids,
            assignment: self.assignment,
            iterations: self.iteration,
            movement: self.movement,
            state: self.state,
        }
    }

    pub fn centroids(&self) -> &Matrix {
        &self.centroids
    }

    /// Empty until the first step.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn movement(&self) -> f64 {
        self.movement
    }

    pub fn state(&self) -> RunState {
        self.state
    }
}

/// Requested workers, capped at the machine's parallelism and at one per
/// point.
fn worker_count(requested: usize, points: usize) -> usize {
    let available = std::thread::available_parallelism().map_or(1, |n| n.get());
    requested.min(available).min(points).max(1)
}

fn max_movement(old: &Matrix, new: &Matrix) -> f64 {
    old.iter_rows()
        .zip(new.iter_rows())
        .map(|(a, b)| euclidean(a, b))
        .fold(0.0, f64::max)
}

/// Lloyd's k-means seeded with the first `k` rows of `data`.
pub fn kmeans(data: &Matrix, k: usize, options: Option<KMeansOptions>) -> Result<KMeansResult> {
    Session::new(data, k, options)?.run()
}

/// Lloyd's k-means from explicit initial centroids; `k` is their row count.
pub fn kmeans_from(
    data: &Matrix,
    initial: Matrix,
    options: Option<KMeansOptions>,
) -> Result<KMeansResult> {
    Session::with_centroids(data, initial, options)?.run()
}
