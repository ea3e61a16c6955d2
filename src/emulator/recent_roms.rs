// Recent ROM list
//
// A small JSON file remembering the last ten loaded images, most recent
// first. Duplicates move to the front rather than repeating.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Storage file for the list
const RECENT_ROMS_FILE: &str = "recent_roms.json";

/// Maximum number of remembered entries
const MAX_ENTRIES: usize = 10;

/// Recently loaded ROM paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentRomsList {
    entries: Vec<PathBuf>,
}

impl RecentRomsList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the list, or start empty when the file is missing or bad
    pub fn load_or_default() -> Self {
        fs::read_to_string(RECENT_ROMS_FILE)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    /// Persist the list
    pub fn save(&self) -> Result<(), io::Error> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(RECENT_ROMS_FILE, contents)
    }

    /// Record a freshly loaded path at the front
    pub fn add<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref().to_path_buf();
        self.entries.retain(|entry| entry != &path);
        self.entries.insert(0, path);
        self.entries.truncate(MAX_ENTRIES);
    }

    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_puts_newest_first() {
        let mut list = RecentRomsList::new();
        list.add("a.nes");
        list.add("b.nes");

        assert_eq!(list.entries()[0], PathBuf::from("b.nes"));
        assert_eq!(list.entries()[1], PathBuf::from("a.nes"));
    }

    #[test]
    fn test_duplicate_moves_to_front() {
        let mut list = RecentRomsList::new();
        list.add("a.nes");
        list.add("b.nes");
        list.add("a.nes");

        assert_eq!(list.entries().len(), 2);
        assert_eq!(list.entries()[0], PathBuf::from("a.nes"));
    }

    #[test]
    fn test_capped_at_ten() {
        let mut list = RecentRomsList::new();
        for i in 0..15 {
            list.add(format!("rom{}.nes", i));
        }

        assert_eq!(list.entries().len(), MAX_ENTRIES);
        assert_eq!(list.entries()[0], PathBuf::from("rom14.nes"));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut list = RecentRomsList::new();
        list.add("game.nes");

        let json = serde_json::to_string(&list).unwrap();
        let parsed: RecentRomsList = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.entries(), list.entries());
    }
}
