use serde::{Deserialize, Serialize};

/// Append-only history that keeps the newest `CAP` entries.
///
/// Serializes as a plain JSON array, oldest first. Deserializing a longer
/// array drops the oldest entries so rows written before a cap change still
/// load.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedLog<T, const CAP: usize> {
    entries: Vec<T>,
}

impl<T, const CAP: usize> BoundedLog<T, CAP> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append one entry, evicting the oldest when full.
    pub fn push(&mut self, entry: T) {
        if self.entries.len() >= CAP {
            self.entries.remove(0);
        }
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Up to `n` newest entries, newest first.
    pub fn recent(&self, n: usize) -> Vec<T>
    where
        T: Clone,
    {
        self.entries.iter().rev().take(n).cloned().collect()
    }
}

impl<T, const CAP: usize> Default for BoundedLog<T, CAP> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Serialize, const CAP: usize> Serialize for BoundedLog<T, CAP> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.entries.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>, const CAP: usize> Deserialize<'de> for BoundedLog<T, CAP> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut entries = Vec::<T>::deserialize(deserializer)?;
        if entries.len() > CAP {
            entries.drain(..entries.len() - CAP);
        }
        Ok(Self { entries })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut log: BoundedLog<u32, 3> = BoundedLog::new();
        for i in 0..5 {
            log.push(i);
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.entries(), &[2, 3, 4]);
    }

    #[test]
    fn recent_returns_newest_first() {
        let mut log: BoundedLog<u32, 10> = BoundedLog::new();
        for i in 0..6 {
            log.push(i);
        }
        assert_eq!(log.recent(3), vec![5, 4, 3]);
        assert_eq!(log.recent(100).len(), 6);
    }

    #[test]
    fn serde_round_trip_keeps_order() {
        let mut log: BoundedLog<u32, 5> = BoundedLog::new();
        log.push(1);
        log.push(2);
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, "[1,2]");
        let back: BoundedLog<u32, 5> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    fn deserializing_oversized_array_keeps_newest() {
        let values: Vec<u32> = (0..8).collect();
        let json = serde_json::to_string(&values).unwrap();
        let log: BoundedLog<u32, 4> = serde_json::from_str(&json).unwrap();
        assert_eq!(log.entries(), &[4, 5, 6, 7]);
    }
}
