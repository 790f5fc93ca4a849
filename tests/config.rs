use numkernel::{Array, Axis, Kernel, KernelConfig};

#[test]
fn test_default_config() {
    let config = KernelConfig::default();
    assert_eq!(config.parallel_threshold, 16_384);
    assert_eq!(config.eigen_tolerance, 1e-10);
    assert_eq!(config.eigen_max_iterations, 100);
    assert_eq!(Kernel::default().config(), &config);
}

#[test]
fn test_partial_json_falls_back_to_defaults() {
    let config = KernelConfig::from_json_str(r#"{ "parallel_threshold": 8 }"#).unwrap();
    assert_eq!(config.parallel_threshold, 8);
    assert_eq!(config.eigen_max_iterations, 100);

    let config = KernelConfig::from_json_str("{}").unwrap();
    assert_eq!(config, KernelConfig::default());
}

#[test]
fn test_config_json_round_trip() {
    let config = KernelConfig {
        parallel_threshold: 1,
        eigen_tolerance: 1e-6,
        eigen_max_iterations: 12,
    };
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(KernelConfig::from_json_str(&json).unwrap(), config);
}

#[test]
fn test_malformed_config_is_rejected() {
    assert!(KernelConfig::from_json_str("{ \"parallel_threshold\": -1 }").is_err());
    assert!(KernelConfig::from_json_str("not json").is_err());
}

#[test]
fn test_sequential_config_gives_identical_results() {
    let m = Array::from_rows(vec![vec![3.0, 1.0], vec![2.0, 5.0], vec![4.0, 0.5]]).unwrap();
    let sequential = Kernel::new(KernelConfig::sequential());
    assert_eq!(sequential.config().parallel_threshold, usize::MAX);
    assert_eq!(
        sequential.sort(&m, Axis::Rows).unwrap(),
        Kernel::new(KernelConfig::new(0)).sort(&m, Axis::Rows).unwrap()
    );
}

#[test]
fn test_eigen_defaults_come_from_config() {
    let m = Array::from_rows(vec![vec![2.0, 1.0], vec![1.0, 2.0]]).unwrap();
    let strict = Kernel::new(KernelConfig {
        eigen_max_iterations: 0,
        ..KernelConfig::default()
    });
    assert!(strict.eigen_solve_default(&m).is_err());
    assert!(Kernel::default().eigen_solve_default(&m).is_ok());
}
