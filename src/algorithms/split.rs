use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> TrainTestSplit {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let ratio = test_ratio.clamp(0.0, 1.0);
    let n_test = ((n as f64) * ratio).ceil() as usize;
    let n_test = n_test.min(n);

    let train = indices.split_off(n_test);
    TrainTestSplit { train, test: indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_split_sizes() {
        let split = train_test_split(100, 0.2, 42);
        assert_eq!(split.test.len(), 20);
        assert_eq!(split.train.len(), 80);

        let all: HashSet<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
        assert_eq!(all.len(), 100);
    }

    #[test]
    fn test_split_is_deterministic() {
        assert_eq!(train_test_split(57, 0.2, 42), train_test_split(57, 0.2, 42));
        assert_ne!(train_test_split(57, 0.2, 42), train_test_split(57, 0.2, 7));
    }

    #[test]
    fn test_split_small_inputs() {
        let split = train_test_split(0, 0.2, 42);
        assert!(split.train.is_empty() && split.test.is_empty());

        let split = train_test_split(3, 0.2, 42);
        assert_eq!(split.test.len(), 1);
        assert_eq!(split.train.len(), 2);
    }
}
