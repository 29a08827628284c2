// Domain layer: the subject/grading models and the ports the adapters implement.

pub mod model;
pub mod ports;
