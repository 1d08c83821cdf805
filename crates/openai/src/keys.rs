//! Round-robin API key selection.

use promptsheet_core::CoreError;
use tokio::sync::Mutex;

/// A fixed set of API keys handed out in rotation.
///
/// The rotation counter is only touched under the internal lock, so
/// concurrent callers each receive a distinct call index and the key at
/// `call_index % len`.
pub struct KeyRing {
    keys: Vec<String>,
    next: Mutex<u64>,
}

impl std::fmt::Debug for KeyRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRing").finish_non_exhaustive()
    }
}

impl KeyRing {
    /// Build a ring from configured keys. Blank entries are dropped; an
    /// empty result is a configuration error.
    pub fn new(keys: Vec<String>) -> Result<Self, CoreError> {
        let keys: Vec<String> = keys
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        if keys.is_empty() {
            return Err(CoreError::Configuration(
                "No OpenAI API key configured (OPENAI_API_KEY or OPENAI_API_KEYS)".to_string(),
            ));
        }

        Ok(Self {
            keys,
            next: Mutex::new(0),
        })
    }

    /// Number of keys in the ring.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Always false; an empty ring cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Take the next key. Returns the call index alongside the key.
    pub async fn next_key(&self) -> (u64, &str) {
        let mut next = self.next.lock().await;
        let call_index = *next;
        *next += 1;
        let key = &self.keys[(call_index % self.keys.len() as u64) as usize];
        (call_index, key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use assert_matches::assert_matches;

    use super::*;

    fn ring(keys: &[&str]) -> KeyRing {
        KeyRing::new(keys.iter().map(|k| k.to_string()).collect()).unwrap()
    }

    #[test]
    fn empty_ring_is_a_configuration_error() {
        assert_matches!(KeyRing::new(vec![]), Err(CoreError::Configuration(_)));
        assert_matches!(
            KeyRing::new(vec!["  ".into(), String::new()]),
            Err(CoreError::Configuration(_))
        );
    }

    #[test]
    fn blank_keys_are_dropped() {
        let ring = KeyRing::new(vec![" a ".into(), "".into(), "b".into()]).unwrap();
        assert_eq!(ring.len(), 2);
    }

    #[tokio::test]
    async fn sequential_calls_rotate() {
        let ring = ring(&["k0", "k1", "k2"]);
        let mut picked = Vec::new();
        for _ in 0..7 {
            picked.push(ring.next_key().await);
        }
        assert_eq!(
            picked,
            vec![
                (0, "k0"),
                (1, "k1"),
                (2, "k2"),
                (3, "k0"),
                (4, "k1"),
                (5, "k2"),
                (6, "k0"),
            ]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_calls_never_share_an_index() {
        let ring = Arc::new(ring(&["k0", "k1", "k2"]));
        let calls = 600;

        let mut handles = Vec::new();
        for _ in 0..calls {
            let ring = Arc::clone(&ring);
            handles.push(tokio::spawn(async move {
                let (idx, key) = ring.next_key().await;
                (idx, key.to_string())
            }));
        }

        let mut indices = Vec::new();
        let mut per_key: HashMap<String, usize> = HashMap::new();
        for handle in handles {
            let (idx, key) = handle.await.unwrap();
            assert_eq!(key, format!("k{}", idx % 3));
            indices.push(idx);
            *per_key.entry(key).or_default() += 1;
        }

        indices.sort_unstable();
        assert_eq!(indices, (0..calls as u64).collect::<Vec<_>>());
        assert_eq!(per_key.len(), 3);
        assert!(per_key.values().all(|&n| n == calls / 3));
    }
}
