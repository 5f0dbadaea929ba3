pub mod permutations;
pub mod solver;
