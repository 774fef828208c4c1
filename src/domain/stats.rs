use std::collections::BTreeMap;

/// Role of a dashboard statistic card, taken from its `bg-*` class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatKey {
    Primary,
    Success,
    Info,
    Warning,
}

impl StatKey {
    pub const ALL: [StatKey; 4] = [
        StatKey::Primary,
        StatKey::Success,
        StatKey::Info,
        StatKey::Warning,
    ];

    pub fn css_class(&self) -> &'static str {
        match self {
            StatKey::Primary => "bg-primary",
            StatKey::Success => "bg-success",
            StatKey::Info => "bg-info",
            StatKey::Warning => "bg-warning",
        }
    }

    pub fn from_class(class: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.css_class() == class)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StatCard {
    pub key: StatKey,
    /// Server-rendered card body, copied verbatim.
    pub inner_html: String,
}

/// The statistic cards currently on screen, one per key.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatBoard {
    cards: BTreeMap<StatKey, StatCard>,
}

impl StatBoard {
    pub fn from_cards(cards: impl IntoIterator<Item = StatCard>) -> Self {
        let mut board = Self::default();
        for card in cards {
            board.cards.entry(card.key).or_insert(card);
        }
        board
    }

    /// Overwrites every live card that has a fetched counterpart with the same
    /// key. Live cards without a counterpart stay as they are, and fetched
    /// cards for keys that are not on screen are dropped. Returns the keys
    /// that changed.
    pub fn apply(&mut self, fetched: impl IntoIterator<Item = StatCard>) -> Vec<StatKey> {
        let mut seen = Vec::new();
        let mut changed = Vec::new();
        for card in fetched {
            // First fetched card per key wins.
            if seen.contains(&card.key) {
                continue;
            }
            seen.push(card.key);
            let Some(live) = self.cards.get_mut(&card.key) else {
                continue;
            };
            if live.inner_html != card.inner_html {
                live.inner_html = card.inner_html;
                changed.push(card.key);
            }
        }
        changed
    }

    pub fn get(&self, key: StatKey) -> Option<&StatCard> {
        self.cards.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatCard> {
        self.cards.values()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Auto-refresh only runs while the location looks like a dashboard.
pub fn is_dashboard_path(path: &str) -> bool {
    path.contains("dashboard") || path.contains("customer")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(key: StatKey, html: &str) -> StatCard {
        StatCard {
            key,
            inner_html: html.to_string(),
        }
    }

    #[test]
    fn apply_replaces_cards_by_key_not_position() {
        let mut board = StatBoard::from_cards([
            card(StatKey::Primary, "<h3>3</h3>"),
            card(StatKey::Success, "<h3>1</h3>"),
            card(StatKey::Info, "<h3>Rs. 0.00</h3>"),
        ]);

        // Fetched order differs and one key is missing.
        let changed = board.apply([
            card(StatKey::Info, "<h3>Rs. 120.00</h3>"),
            card(StatKey::Primary, "<h3>4</h3>"),
        ]);

        assert_eq!(changed, vec![StatKey::Info, StatKey::Primary]);
        assert_eq!(board.get(StatKey::Primary).unwrap().inner_html, "<h3>4</h3>");
        assert_eq!(board.get(StatKey::Info).unwrap().inner_html, "<h3>Rs. 120.00</h3>");
        assert_eq!(board.get(StatKey::Success).unwrap().inner_html, "<h3>1</h3>");
    }

    #[test]
    fn apply_ignores_cards_that_are_not_live() {
        let mut board = StatBoard::from_cards([card(StatKey::Primary, "a")]);
        let changed = board.apply([card(StatKey::Warning, "w")]);
        assert!(changed.is_empty());
        assert!(board.get(StatKey::Warning).is_none());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn unchanged_content_is_not_reported() {
        let mut board = StatBoard::from_cards([card(StatKey::Success, "same")]);
        assert!(board.apply([card(StatKey::Success, "same")]).is_empty());
    }

    #[test]
    fn duplicate_keys_keep_first_card() {
        let board = StatBoard::from_cards([card(StatKey::Info, "first"), card(StatKey::Info, "second")]);
        assert_eq!(board.get(StatKey::Info).unwrap().inner_html, "first");
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn duplicate_fetched_cards_refresh_only_the_first() {
        let mut board = StatBoard::from_cards([card(StatKey::Info, "old")]);
        let changed = board.apply([card(StatKey::Info, "new"), card(StatKey::Info, "extra")]);
        assert_eq!(changed, vec![StatKey::Info]);
        assert_eq!(board.get(StatKey::Info).unwrap().inner_html, "new");
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn dashboard_paths() {
        assert!(is_dashboard_path("/customer/"));
        assert!(is_dashboard_path("dashboard/"));
        assert!(!is_dashboard_path("/request-pickup/"));
    }
}
