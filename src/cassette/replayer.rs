//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Replays interactions from a loaded cassette per port/method pair.
///
/// Concurrent stages do not call ports in recording order, so a request is
/// first matched against an unconsumed interaction with an identical input.
/// Only when none matches (inputs that embed temporary paths, for instance)
/// is the oldest unconsumed interaction served.
pub struct CassetteReplayer {
    queues: HashMap<PortMethodKey, Vec<(Interaction, bool)>>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<(Interaction, bool)>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push((interaction.clone(), false));
        }
        Self { queues }
    }

    /// Return the next interaction for the given port, method and input.
    ///
    /// # Panics
    ///
    /// Panics if the cassette has no (more) interactions for the given
    /// port/method combination, naming what was requested and what is
    /// available.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
        input: &serde_json::Value,
    ) -> &Interaction {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };

        if !self.queues.contains_key(&key) {
            let mut available: Vec<String> =
                self.queues.keys().map(|k| format!("{}::{}", k.port, k.method)).collect();
            available.sort();
            panic!(
                "Cassette exhausted: no interactions recorded for port={port:?} method={method:?}. \
                 Available port::method pairs: [{}]",
                available.join(", ")
            );
        }

        let queue = self.queues.get_mut(&key).expect("queue checked above");
        let position = queue
            .iter()
            .position(|(i, used)| !used && i.input == *input)
            .or_else(|| queue.iter().position(|(_, used)| !used));

        let Some(position) = position else {
            panic!(
                "Cassette exhausted: all {count} interactions for port={port:?} method={method:?} \
                 have been consumed. Last interaction was seq={last_seq}.",
                count = queue.len(),
                last_seq = queue.last().map_or(0, |(i, _)| i.seq),
            );
        };

        queue[position].1 = true;
        &queue[position].0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn interaction(seq: u64, port: &str, method: &str, input: serde_json::Value) -> Interaction {
        Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output: json!({"ok": seq}),
        }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), interactions }
    }

    #[test]
    fn replays_in_order_per_port() {
        let cassette = make_cassette(vec![
            interaction(0, "web", "get_text", json!({"url": "a"})),
            interaction(1, "git", "clone_repo", json!({"url": "x"})),
            interaction(2, "web", "get_text", json!({"url": "b"})),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("web", "get_text", &json!({})).seq, 0);
        assert_eq!(replayer.next_interaction("git", "clone_repo", &json!({})).seq, 1);
        assert_eq!(replayer.next_interaction("web", "get_text", &json!({})).seq, 2);
    }

    #[test]
    fn matching_input_wins_over_order() {
        let cassette = make_cassette(vec![
            interaction(0, "web", "get_text", json!({"url": "a"})),
            interaction(1, "web", "get_text", json!({"url": "b"})),
        ]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction("web", "get_text", &json!({"url": "b"})).seq, 1);
        assert_eq!(replayer.next_interaction("web", "get_text", &json!({"url": "a"})).seq, 0);
    }

    #[test]
    #[should_panic(expected = "Cassette exhausted")]
    fn exhausted_replayer_panics_with_descriptive_message() {
        let cassette = make_cassette(vec![interaction(0, "web", "get_text", json!({}))]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("web", "get_text", &json!({}));
        let _ = replayer.next_interaction("web", "get_text", &json!({}));
    }

    #[test]
    #[should_panic(expected = "no interactions recorded")]
    fn unknown_port_panics() {
        let cassette = make_cassette(vec![]);
        let mut replayer = CassetteReplayer::new(&cassette);
        let _ = replayer.next_interaction("farm", "add_package", &json!({}));
    }
}
