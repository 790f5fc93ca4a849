//! Integration tests for the reduction engine (mean, variance, std, covariance,
//! max_occurence, sigmoid).

use numkernel::{Array, Axis, Kernel, KernelConfig, KernelError, Reduction};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::statistics::Statistics;

fn vector(values: &[f64]) -> Array {
    Array::from_vector(values.to_vec()).unwrap()
}

fn sample_matrix() -> Array {
    Array::from_rows(vec![
        vec![1, 5, 3],
        vec![4, 2, 6],
        vec![7, 8, 0],
        vec![4, 2, 1],
    ])
    .unwrap()
}

fn scalar(r: Reduction<f64>) -> f64 {
    r.as_scalar().expect("expected a scalar reduction")
}

fn values(r: Reduction<f64>) -> Vec<f64> {
    r.as_vector().expect("expected a vector reduction").to_vec()
}

fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() < tol, "{} != {} (tol {})", a, b, tol);
}

// ---------------------------------------------------------------------------
// mean
// ---------------------------------------------------------------------------

#[test]
fn test_mean_of_vector() {
    let v = Array::from_vector(vec![-5, 3, 10, 2, 5, 0]).unwrap();
    assert_eq!(scalar(numkernel::mean(&v, Axis::Flat).unwrap()), 2.5);
}

#[test]
fn test_mean_ignores_axis_for_vectors() {
    let v = vector(&[1.0, 2.0, 6.0]);
    for axis in [Axis::Rows, Axis::Columns, Axis::Flat] {
        assert_eq!(scalar(numkernel::mean(&v, axis).unwrap()), 3.0);
    }
}

#[test]
fn test_mean_of_matrix_per_axis() {
    let m = sample_matrix();
    assert_eq!(values(numkernel::mean(&m, Axis::Rows).unwrap()), vec![4.0, 4.25, 2.5]);

    let rows = values(numkernel::mean(&m, Axis::Columns).unwrap());
    assert_eq!(rows.len(), 4);
    assert_close(rows[0], 3.0, 1e-12);
    assert_close(rows[3], 7.0 / 3.0, 1e-12);
}

#[test]
fn test_flat_mean_is_mean_of_column_means() {
    let m = sample_matrix();
    let flat = scalar(numkernel::mean(&m, Axis::Flat).unwrap());
    let column_means = values(numkernel::mean(&m, Axis::Rows).unwrap());
    let expected = column_means.iter().sum::<f64>() / column_means.len() as f64;
    assert_eq!(flat, expected);
    assert_close(flat, 43.0 / 12.0, 1e-12);
}

#[test]
fn test_mean_matches_statrs() {
    let mut rng = StdRng::seed_from_u64(3);
    let data: Vec<f64> = (0..500).map(|_| rng.gen_range(-100.0..100.0)).collect();
    let ours = scalar(numkernel::mean(&vector(&data), Axis::Flat).unwrap());
    assert_close(ours, data.iter().mean(), 1e-9);
}

// ---------------------------------------------------------------------------
// variance / std
// ---------------------------------------------------------------------------

#[test]
fn test_std_of_vector() {
    let v = Array::from_vector(vec![-5, 3, 8, 2, 0, -1]).unwrap();
    let std = scalar(numkernel::std(&v, 0, Axis::Flat).unwrap());
    assert_close(std, 3.9756201472921875, 1e-12);
}

#[test]
fn test_variance_and_std_match_statrs() {
    let mut rng = StdRng::seed_from_u64(5);
    let data: Vec<f64> = (0..300).map(|_| rng.gen_range(-10.0..10.0)).collect();
    let v = vector(&data);

    let population = scalar(numkernel::variance(&v, 0, Axis::Flat).unwrap());
    let sample = scalar(numkernel::variance(&v, 1, Axis::Flat).unwrap());
    assert_close(population, data.iter().population_variance(), 1e-9);
    assert_close(sample, data.iter().variance(), 1e-9);

    let sample_std = scalar(numkernel::std(&v, 1, Axis::Flat).unwrap());
    assert_close(sample_std, data.iter().std_dev(), 1e-9);
}

#[test]
fn test_variance_is_std_squared() {
    let mut rng = StdRng::seed_from_u64(9);
    for len in [2usize, 3, 10, 100] {
        let data: Vec<f64> = (0..len).map(|_| rng.gen_range(-50.0..50.0)).collect();
        let v = vector(&data);
        let var = scalar(numkernel::variance(&v, 0, Axis::Flat).unwrap());
        let std = scalar(numkernel::std(&v, 0, Axis::Flat).unwrap());
        assert_close(var, std * std, 1e-9 * var.max(1.0));
    }
}

#[test]
fn test_variance_of_matrix_per_axis() {
    let m = sample_matrix();
    let per_column = values(numkernel::variance(&m, 0, Axis::Rows).unwrap());
    assert_eq!(per_column.len(), 3);
    // column 0 = [1, 4, 7, 4], mean 4
    assert_close(per_column[0], 4.5, 1e-12);

    let per_row = values(numkernel::std(&m, 1, Axis::Columns).unwrap());
    assert_eq!(per_row.len(), 4);
    // row 0 = [1, 5, 3], sample std 2
    assert_close(per_row[0], 2.0, 1e-12);
}

#[test]
fn test_variance_rejects_dof_at_or_above_sample_count() {
    let data = [1.0, 2.0, 3.0, 4.0];
    let v = vector(&data);
    let err = numkernel::variance(&v, data.len(), Axis::Flat).unwrap_err();
    assert!(matches!(err, KernelError::Domain { operation: "variance", .. }));
    assert!(matches!(
        numkernel::std(&v, data.len() + 3, Axis::Flat),
        Err(KernelError::Domain { operation: "std", .. })
    ));

    // Lanes of a 4x3 matrix along axis 0 hold 4 samples.
    let m = sample_matrix();
    assert!(numkernel::variance(&m, 3, Axis::Rows).is_ok());
    assert!(matches!(
        numkernel::variance(&m, 4, Axis::Rows),
        Err(KernelError::Domain { .. })
    ));
    assert!(matches!(
        numkernel::variance(&m, 3, Axis::Columns),
        Err(KernelError::Domain { .. })
    ));
}

#[test]
fn test_flat_variance_and_std_are_unsupported_for_matrices() {
    let m = sample_matrix();
    assert!(matches!(
        numkernel::variance(&m, 0, Axis::Flat),
        Err(KernelError::Unsupported { .. })
    ));
    assert!(matches!(
        numkernel::std(&m, 0, Axis::Flat),
        Err(KernelError::Unsupported { .. })
    ));
}

// ---------------------------------------------------------------------------
// covariance
// ---------------------------------------------------------------------------

#[test]
fn test_covariance_is_symmetric_with_variance_diagonal() {
    let mut rng = StdRng::seed_from_u64(17);
    let rows: Vec<Vec<f64>> = (0..30)
        .map(|_| (0..4).map(|_| rng.gen_range(-3.0..3.0)).collect())
        .collect();
    let m = Array::from_rows(rows).unwrap();

    let cov = numkernel::covariance(&m).unwrap();
    let cov = cov.as_matrix().unwrap();
    assert_eq!(cov.shape(), (4, 4));

    let column_variances = values(numkernel::variance(&m, 0, Axis::Rows).unwrap());
    for i in 0..4 {
        assert_close(cov[(i, i)], column_variances[i], 1e-12);
        for j in 0..4 {
            assert_eq!(cov[(i, j)], cov[(j, i)]);
        }
    }
}

#[test]
fn test_covariance_of_known_matrix() {
    let m = Array::from_rows(vec![vec![1.0, 2.0], vec![3.0, 6.0], vec![5.0, 10.0]]).unwrap();
    let cov = numkernel::covariance(&m).unwrap();
    let cov = cov.as_matrix().unwrap();
    // x = [1, 3, 5], y = 2x: var(x) = 8/3, cov = 16/3, var(y) = 32/3
    assert_close(cov[(0, 0)], 8.0 / 3.0, 1e-12);
    assert_close(cov[(0, 1)], 16.0 / 3.0, 1e-12);
    assert_close(cov[(1, 1)], 32.0 / 3.0, 1e-12);
}

#[test]
fn test_covariance_rejects_vectors() {
    let v = vector(&[1.0, 2.0, 3.0]);
    assert!(matches!(
        numkernel::covariance(&v),
        Err(KernelError::Type { operation: "covariance", .. })
    ));
}

#[test]
fn test_reductions_agree_across_parallel_paths() {
    let mut rng = StdRng::seed_from_u64(23);
    let rows: Vec<Vec<f64>> = (0..64)
        .map(|_| (0..8).map(|_| rng.gen_range(-1.0..1.0)).collect())
        .collect();
    let m = Array::from_rows(rows).unwrap();

    let parallel = Kernel::new(KernelConfig::new(0));
    let sequential = Kernel::new(KernelConfig::sequential());
    for axis in [Axis::Rows, Axis::Columns] {
        assert_eq!(parallel.mean(&m, axis).unwrap(), sequential.mean(&m, axis).unwrap());
        assert_eq!(
            parallel.variance(&m, 1, axis).unwrap(),
            sequential.variance(&m, 1, axis).unwrap()
        );
    }
    assert_eq!(parallel.covariance(&m).unwrap(), sequential.covariance(&m).unwrap());
}

// ---------------------------------------------------------------------------
// max_occurence / sigmoid
// ---------------------------------------------------------------------------

#[test]
fn test_max_occurence_returns_most_frequent() {
    let v = Array::from_vector(vec![-5, 3, 10, 2, 1, -1, -5, 2, 2]).unwrap();
    assert_eq!(numkernel::max_occurence(&v).unwrap(), 2.0);
}

#[test]
fn test_max_occurence_breaks_ties_by_first_occurrence() {
    let v = vector(&[7.0, 1.0, 1.0, 7.0, 3.0]);
    assert_eq!(numkernel::max_occurence(&v).unwrap(), 7.0);

    let zeros = vector(&[-0.0, 4.0, 0.0, 4.0, 0.0]);
    assert_eq!(numkernel::max_occurence(&zeros).unwrap(), 0.0);
}

#[test]
fn test_max_occurence_rejects_matrices() {
    assert!(matches!(
        numkernel::max_occurence(&sample_matrix()),
        Err(KernelError::Type { .. })
    ));
}

#[test]
fn test_sigmoid_elementwise() {
    let v = vector(&[0.0, 2.0, -2.0, 40.0, -800.0]);
    let s = numkernel::sigmoid(&v).unwrap();
    assert_eq!(s.len(), 5);
    assert_eq!(s[0], 0.5);
    assert_close(s[1], 0.8807970779778823, 1e-12);
    assert_close(s[1] + s[2], 1.0, 1e-12);
    assert_close(s[3], 1.0, 1e-12);
    assert_eq!(s[4], 0.0);
}

#[test]
fn test_sigmoid_rejects_matrices() {
    assert!(matches!(
        numkernel::sigmoid(&sample_matrix()),
        Err(KernelError::Type { operation: "sigmoid", .. })
    ));
}
