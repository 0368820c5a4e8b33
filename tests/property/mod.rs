// tests/property/mod.rs

mod queue_ordering;
