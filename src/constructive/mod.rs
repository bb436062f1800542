//! Constructive heuristics for seeding the swarm with a good tour.

mod savings;

pub use savings::{savings_list, savings_tour, SavingsEntry};
