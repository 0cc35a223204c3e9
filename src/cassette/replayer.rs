//! Serves recorded outputs back in order.

use std::collections::{HashMap, VecDeque};

use super::format::{Cassette, CassetteError};

/// Hands out recorded outputs per `(port, method)` pair, oldest first.
#[derive(Debug, Default)]
pub struct CassetteReplayer {
    queues: HashMap<(String, String), VecDeque<serde_json::Value>>,
}

impl CassetteReplayer {
    /// Index a loaded cassette, ordering each queue by `seq`.
    #[must_use]
    pub fn new(cassette: Cassette) -> Self {
        let mut interactions = cassette.interactions;
        interactions.sort_by_key(|i| i.seq);

        let mut queues: HashMap<_, VecDeque<_>> = HashMap::new();
        for interaction in interactions {
            queues
                .entry((interaction.port, interaction.method))
                .or_default()
                .push_back(interaction.output);
        }
        Self { queues }
    }

    /// Take the next recorded output for `port::method`.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::Exhausted`] when nothing is left to serve.
    pub fn next_output(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<serde_json::Value, CassetteError> {
        self.queues
            .get_mut(&(port.to_string(), method.to_string()))
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| CassetteError::Exhausted {
                port: port.to_string(),
                method: method.to_string(),
            })
    }
}
