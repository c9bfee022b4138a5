use std::collections::HashMap;

/// Per-node collapsed flags keyed by assigned tree paths.
///
/// This is viewer preference, not device state: it is never reset when the
/// snapshot clears or the backend reconnects. Unknown keys read as expanded.
#[derive(Debug, Clone, Default)]
pub struct CollapsedStates {
    map: HashMap<String, bool>,
}

impl CollapsedStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self, path: &str) {
        let entry = self.map.entry(path.to_string()).or_insert(false);
        *entry = !*entry;
    }

    pub fn is_collapsed(&self, path: &str) -> bool {
        self.map.get(path).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_unknown_is_expanded() {
        let mut states = CollapsedStates::new();
        assert!(!states.is_collapsed("Imaging-Items-2"));

        states.toggle("Imaging-Items-2");
        assert!(states.is_collapsed("Imaging-Items-2"));
        assert!(!states.is_collapsed("Imaging-Items-3"));

        states.toggle("Imaging-Items-2");
        assert!(!states.is_collapsed("Imaging-Items-2"));
    }
}
