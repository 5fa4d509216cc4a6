use uuid::Uuid;

/// Source of shape identifiers. Injectable so tests can supply
/// deterministic ids instead of process-wide random UUIDs.
pub trait IdSource {
    fn next_id(&mut self) -> Uuid;
}

/// Production source: random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic source for tests: 1, 2, 3, ... encoded as UUIDs.
#[derive(Debug, Default)]
pub struct SequentialIdSource {
    counter: u64,
}

impl IdSource for SequentialIdSource {
    fn next_id(&mut self) -> Uuid {
        self.counter += 1;
        Uuid::from_u128(self.counter as u128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_are_distinct_and_ordered() {
        let mut source = SequentialIdSource::default();
        assert_eq!(source.next_id(), Uuid::from_u128(1));
        assert_eq!(source.next_id(), Uuid::from_u128(2));
    }

    #[test]
    fn uuid_source_yields_distinct_ids() {
        let mut source = UuidSource;
        assert_ne!(source.next_id(), source.next_id());
    }
}
