/// Cosine similarity of two vectors of equal length.
///
/// Defined as 0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// `1 - cosine_similarity(a, b)`, used both to rank candidates and for the displayed score.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    1.0 - cosine_similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let v = [0.3, -1.2, 4.0];
        assert!(cosine_distance(&v, &v).abs() < 1e-12);
    }

    #[test]
    fn test_orthogonal_and_opposite() {
        assert_eq!(cosine_distance(&[1.0, 0.0], &[0.0, 2.0]), 1.0);
        assert!((cosine_distance(&[1.0, 1.0], &[-3.0, -3.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vector_has_distance_one() {
        let zero = [0.0; 3];
        assert_eq!(cosine_distance(&zero, &[1.0, 2.0, 3.0]), 1.0);
        assert_eq!(cosine_distance(&[1.0, 2.0, 3.0], &zero), 1.0);
        assert_eq!(cosine_distance(&zero, &zero), 1.0);
    }

    #[test]
    fn test_symmetric() {
        let a = [0.12, 0.5, -0.7, 0.01];
        let b = [-0.4, 0.33, 0.9, 0.2];
        assert_eq!(cosine_distance(&a, &b), cosine_distance(&b, &a));
    }
}
