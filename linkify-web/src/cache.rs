//! Cache de linkifiers por configuração.
//!
//! O linkifier da configuração do servidor fica sempre disponível. Os montados
//! para esquemas enviados pelos clientes ocupam no máximo `capacity` entradas;
//! ao passar disso, sai o usado há mais tempo.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use linkify_core::{Linkifier, LinkifyConfig};

pub struct LinkifierCache {
    base: LinkifyConfig,
    base_linkifier: Arc<Linkifier>,
    capacity: usize,
    entries: HashMap<LinkifyConfig, Arc<Linkifier>>,
    /// Do menos para o mais recente.
    recency: VecDeque<LinkifyConfig>,
}

impl LinkifierCache {
    pub fn new(base: LinkifyConfig, base_linkifier: Arc<Linkifier>, capacity: usize) -> Self {
        Self {
            base,
            base_linkifier,
            capacity,
            entries: HashMap::new(),
            recency: VecDeque::new(),
        }
    }

    pub fn get(&mut self, config: &LinkifyConfig) -> Option<Arc<Linkifier>> {
        if *config == self.base {
            return Some(Arc::clone(&self.base_linkifier));
        }
        let found = Arc::clone(self.entries.get(config)?);
        self.touch(config);
        Some(found)
    }

    /// Guarda `linkifier` (ou devolve o que outra requisição já guardou).
    pub fn insert(&mut self, config: LinkifyConfig, linkifier: Arc<Linkifier>) -> Arc<Linkifier> {
        if let Some(existing) = self.get(&config) {
            return existing;
        }
        if self.capacity == 0 {
            return linkifier;
        }
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.recency.pop_front() else {
                break;
            };
            self.entries.remove(&oldest);
        }
        self.recency.push_back(config.clone());
        self.entries.insert(config, Arc::clone(&linkifier));
        linkifier
    }

    /// Entradas além da configuração base.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn touch(&mut self, config: &LinkifyConfig) {
        if let Some(pos) = self.recency.iter().position(|c| c == config) {
            if let Some(entry) = self.recency.remove(pos) {
                self.recency.push_back(entry);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(scheme: &str) -> LinkifyConfig {
        LinkifyConfig::core_only().with_scheme(scheme, false)
    }

    fn build(config: &LinkifyConfig) -> Arc<Linkifier> {
        Arc::new(Linkifier::new(config.clone()).unwrap())
    }

    fn cache(capacity: usize) -> LinkifierCache {
        let base = LinkifyConfig::core_only();
        let linkifier = build(&base);
        LinkifierCache::new(base, linkifier, capacity)
    }

    #[test]
    fn test_base_is_always_cached() {
        let mut cache = cache(0);
        assert!(cache.get(&LinkifyConfig::core_only()).is_some());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_size_is_bounded() {
        let mut cache = cache(2);
        for scheme in ["steam", "magnet", "spotify", "slack"] {
            let c = config(scheme);
            let linkifier = build(&c);
            cache.insert(c, linkifier);
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&config("steam")).is_none());
        assert!(cache.get(&config("slack")).is_some());
    }

    #[test]
    fn test_recently_used_entry_survives() {
        let mut cache = cache(2);
        let (steam, magnet, slack) = (config("steam"), config("magnet"), config("slack"));
        cache.insert(steam.clone(), build(&steam));
        cache.insert(magnet.clone(), build(&magnet));

        // "steam" volta a ser usado; "magnet" passa a ser o mais antigo
        assert!(cache.get(&steam).is_some());
        cache.insert(slack.clone(), build(&slack));

        assert!(cache.get(&steam).is_some());
        assert!(cache.get(&magnet).is_none());
    }

    #[test]
    fn test_insert_keeps_first_linkifier() {
        let mut cache = cache(4);
        let steam = config("steam");
        let first = cache.insert(steam.clone(), build(&steam));
        let second = cache.insert(steam.clone(), build(&steam));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }
}
