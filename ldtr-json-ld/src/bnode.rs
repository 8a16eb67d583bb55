//! Blank node identifier generation.

/// Issues `_:<prefix><n>` identifiers from a running counter.
#[derive(Debug, Clone)]
pub struct BlankNodeGenerator {
    prefix: String,
    counter: u64,
}

impl Default for BlankNodeGenerator {
    fn default() -> Self {
        Self::new("b")
    }
}

impl BlankNodeGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 0)
    }

    pub fn starting_at(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            counter: start,
        }
    }

    /// A fresh, unlabelled identifier
    pub fn next_id(&mut self) -> String {
        let id = format!("_:{}{}", self.prefix, self.counter);
        self.counter += 1;
        id
    }

    /// Number of identifiers issued so far (including the start offset).
    pub fn counter(&self) -> u64 {
        self.counter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids() {
        let mut ids = BlankNodeGenerator::default();
        assert_eq!(ids.next_id(), "_:b0");
        assert_eq!(ids.next_id(), "_:b1");
        assert_eq!(ids.counter(), 2);
    }

    #[test]
    fn test_start_offset() {
        let mut ids = BlankNodeGenerator::starting_at("n", 5);
        assert_eq!(ids.next_id(), "_:n5");
        assert_eq!(ids.next_id(), "_:n6");
        assert_eq!(ids.counter(), 7);
    }
}
