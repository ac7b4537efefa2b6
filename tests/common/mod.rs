#![allow(dead_code)]

pub mod strategies;

use std::sync::{Arc, Mutex};

pub use strategies::*;

/// Record of one callback invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub values: Vec<usize>,
    pub error: Option<String>,
}

impl Delivery {
    /// Values sorted, since order inside a batch follows completion order
    pub fn sorted_values(&self) -> Vec<usize> {
        let mut values = self.values.clone();
        values.sort_unstable();
        values
    }
}

/// Shared log of callback invocations, usable from a callback that must not borrow
#[derive(Debug, Clone, Default)]
pub struct DeliveryLog {
    inner: Arc<Mutex<Vec<Delivery>>>,
}

impl DeliveryLog {
    pub fn record(&self, values: Vec<usize>, error: Option<&anyhow::Error>) -> usize {
        let mut deliveries = self.inner.lock().unwrap();
        deliveries.push(Delivery {
            values,
            error: error.map(|err| err.to_string()),
        });
        deliveries.len()
    }

    pub fn deliveries(&self) -> Vec<Delivery> {
        self.inner.lock().unwrap().clone()
    }

    pub fn sorted_batches(&self) -> Vec<Vec<usize>> {
        self.deliveries().iter().map(Delivery::sorted_values).collect()
    }
}

/// Install the console subscriber so failing tests show the group's events
pub fn setup_logging() {
    batch_group::logging::init_console_logging();
}
