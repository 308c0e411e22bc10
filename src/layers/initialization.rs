use ndarray::Array2;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Normal;
use rand::Rng;

use crate::error::{NetError, Result};

/// He/Kaiming normal `(fan_in, fan_out)` weights, `std = sqrt(2 / fan_in)`, drawn from `rng`.
pub fn he_normal<R: Rng + ?Sized>(shape: (usize, usize), rng: &mut R) -> Result<Array2<f32>> {
    let (fan_in, _) = shape;
    let std = (2.0 / fan_in as f32).sqrt();
    let normal = Normal::new(0.0, std).map_err(|e| NetError::Configuration {
        name: "weight_init".to_string(),
        reason: e.to_string(),
    })?;
    Ok(Array2::random_using(shape, normal, rng))
}
