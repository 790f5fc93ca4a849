use anyhow::{Context, Result};
use numkernel::{Array, Axis, Kernel, KernelConfig};

fn main() -> Result<()> {
    numkernel::logging::init("warn,numkernel=info");

    // 6 samples, 3 features
    let x = Array::from_json(&serde_json::json!([
        [5.1, 3.5, 1.4],
        [4.9, 3.0, 1.4],
        [6.2, 2.9, 4.3],
        [5.9, 3.0, 5.1],
        [6.7, 3.1, 4.4],
        [5.0, 3.4, 1.5],
    ]))
    .context("failed to classify feature matrix")?;

    let kernel = Kernel::new(KernelConfig::sequential());

    let (rows, cols) = x.shape();
    println!("X shape: ({}, {})", rows, cols);
    println!("column means: {}", serde_json::to_string(&kernel.mean(&x, Axis::Rows)?)?);
    println!("row means:    {}", serde_json::to_string(&kernel.mean(&x, Axis::Columns)?)?);
    println!("overall mean: {}", serde_json::to_string(&kernel.mean(&x, Axis::Flat)?)?);
    println!("column std (ddof=1): {}", serde_json::to_string(&kernel.std(&x, 1, Axis::Rows)?)?);
    println!("argsort per column:\n{}", kernel.argsort(&x, Axis::Rows)?);

    let cov = kernel.covariance(&x)?;
    println!("covariance:\n{}", cov);

    let eigen = kernel
        .eigen_solve_default(&cov)
        .context("covariance eigendecomposition failed")?;
    println!(
        "principal variances: {} ({} sweeps)",
        eigen.values, eigen.sweeps
    );

    let scores = Array::from_vector(vec![-2.0, -0.5, 0.0, 0.5, 2.0])?;
    println!("sigmoid: {}", kernel.sigmoid(&scores)?);

    match kernel.variance(&x, 0, Axis::Flat) {
        Ok(_) => println!("unexpected: flat variance succeeded"),
        Err(err) => println!("flat variance refused: {}", err),
    }

    Ok(())
}
