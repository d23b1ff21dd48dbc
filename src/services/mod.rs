pub mod dataset;
pub mod recommendation;
pub mod sessions;
pub mod similarity;
pub mod training;
pub mod users;
