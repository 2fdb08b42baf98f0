//! Roster - ordered tournament slots

use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::strategy::{StrategyKind, UnknownStrategy};

/// Roster configuration errors
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("roster is empty")]
    Empty,

    #[error("duplicate player name in roster: {0}")]
    DuplicateName(String),

    #[error(transparent)]
    UnknownStrategy(#[from] UnknownStrategy),

    #[error("roster index {index} out of range for {len} players")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown roster preset: {0}")]
    UnknownPreset(String),

    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid roster file: {0}")]
    Json(#[from] serde_json::Error),
}

/// One roster slot: a display name and the strategy behind it
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(rename = "strategy")]
    pub kind: StrategyKind,
}

impl RosterEntry {
    /// Entry named after its strategy
    pub fn new(kind: StrategyKind) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
        }
    }

    /// Entry with a custom display name
    pub fn named(name: impl Into<String>, kind: StrategyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// Ordered list of players; the position of an entry is its score slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Roster {
    entries: Vec<RosterEntry>,
}

impl Roster {
    /// Names of the built-in rosters
    pub const PRESETS: [&'static str; 2] = ["standard", "defect-flood"];

    /// Build a roster, rejecting empty lists and repeated names
    pub fn new(entries: Vec<RosterEntry>) -> Result<Self, RosterError> {
        if entries.is_empty() {
            return Err(RosterError::Empty);
        }

        let mut seen = FxHashSet::default();
        for entry in &entries {
            if !seen.insert(entry.name.as_str()) {
                return Err(RosterError::DuplicateName(entry.name.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// Build from strategy tags, one entry per tag
    pub fn from_tags<'a, I>(tags: I) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let entries = tags
            .into_iter()
            .map(|tag| tag.parse::<StrategyKind>().map(RosterEntry::new))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(entries)
    }

    /// All eighteen strategies, one slot each
    pub fn standard() -> Self {
        Self {
            entries: StrategyKind::ALL.iter().map(|&k| RosterEntry::new(k)).collect(),
        }
    }

    /// Fourteen always-defect players flooding the Tit-for-Tat family.
    ///
    /// Slots 10-13 hold standard tit-for-tat and tit-for-two/three/four-tats;
    /// every other slot is a separately named always-defect player.
    pub fn defect_flood() -> Self {
        let tit_for_tats = [
            StrategyKind::StandardTitForTat,
            StrategyKind::TitForTwoTats,
            StrategyKind::TitForThreeTats,
            StrategyKind::TitForFourTats,
        ];

        let mut defector = 0;
        let entries = (0..18)
            .map(|slot| match slot {
                10..=13 => RosterEntry::new(tit_for_tats[slot - 10]),
                _ => {
                    defector += 1;
                    RosterEntry::named(format!("always-defect-{}", defector), StrategyKind::AlwaysDefect)
                }
            })
            .collect();

        Self { entries }
    }

    /// Look up a built-in roster by name
    pub fn preset(name: &str) -> Result<Self, RosterError> {
        match name {
            "standard" => Ok(Self::standard()),
            "defect-flood" => Ok(Self::defect_flood()),
            other => Err(RosterError::UnknownPreset(other.to_string())),
        }
    }

    /// Load from a JSON file.
    ///
    /// Accepts either a bare array or `{ "players": [...] }`. Each element is a
    /// strategy tag (`"pavlov"`) or an object `{ "name": "...", "strategy": "..." }`
    /// where `name` is optional.
    pub fn load(path: &Path) -> Result<Self, RosterError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse the JSON roster format described in [`Roster::load`]
    pub fn from_json(content: &str) -> Result<Self, RosterError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum EntrySpec {
            Tag(String),
            Named {
                name: Option<String>,
                strategy: String,
            },
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RosterFile {
            Flat(Vec<EntrySpec>),
            Wrapped { players: Vec<EntrySpec> },
        }

        let specs = match serde_json::from_str::<RosterFile>(content)? {
            RosterFile::Flat(specs) | RosterFile::Wrapped { players: specs } => specs,
        };

        let entries = specs
            .into_iter()
            .map(|spec| -> Result<RosterEntry, RosterError> {
                match spec {
                    EntrySpec::Tag(tag) => Ok(RosterEntry::new(tag.parse()?)),
                    EntrySpec::Named { name, strategy } => {
                        let kind: StrategyKind = strategy.parse()?;
                        Ok(match name {
                            Some(name) => RosterEntry::named(name, kind),
                            None => RosterEntry::new(kind),
                        })
                    }
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    /// Entry at slot `index`
    pub fn get(&self, index: usize) -> Result<&RosterEntry, RosterError> {
        self.entries.get(index).ok_or(RosterError::IndexOutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &RosterEntry> {
        self.entries.iter()
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_roster() {
        let roster = Roster::standard();
        assert_eq!(roster.len(), 18);
        assert_eq!(roster.get(0).unwrap().kind, StrategyKind::AlwaysCooperate);
        assert_eq!(roster.get(17).unwrap().kind, StrategyKind::EndGameDefector);
        assert_eq!(roster.get(15).unwrap().name, "pavlov");
    }

    #[test]
    fn test_defect_flood_roster() {
        let roster = Roster::defect_flood();
        assert_eq!(roster.len(), 18);
        let defectors = roster
            .iter()
            .filter(|e| e.kind == StrategyKind::AlwaysDefect)
            .count();
        assert_eq!(defectors, 14);
        assert_eq!(roster.get(10).unwrap().kind, StrategyKind::StandardTitForTat);
        assert_eq!(roster.get(13).unwrap().kind, StrategyKind::TitForFourTats);
        assert_eq!(roster.get(0).unwrap().name, "always-defect-1");
        assert_eq!(roster.get(14).unwrap().name, "always-defect-11");
        assert_eq!(roster.get(17).unwrap().name, "always-defect-14");

        // Names must stay unique for per-name experiment history
        assert!(Roster::new(roster.entries().to_vec()).is_ok());
    }

    #[test]
    fn test_presets() {
        for name in Roster::PRESETS {
            assert!(Roster::preset(name).is_ok(), "preset {}", name);
        }
        assert!(matches!(
            Roster::preset("everyone"),
            Err(RosterError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_empty_roster_rejected() {
        assert!(matches!(Roster::new(vec![]), Err(RosterError::Empty)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = Roster::from_tags(["pavlov", "trigger", "pavlov"]).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateName(ref n) if n == "pavlov"));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = Roster::from_tags(["pavlov", "grim"]).unwrap_err();
        assert!(matches!(err, RosterError::UnknownStrategy(_)));
        assert_eq!(err.to_string(), "unknown strategy: grim");
    }

    #[test]
    fn test_index_out_of_range() {
        let roster = Roster::from_tags(["pavlov"]).unwrap();
        assert!(matches!(
            roster.get(3),
            Err(RosterError::IndexOutOfRange { index: 3, len: 1 })
        ));
    }

    #[test]
    fn test_from_json_flat_and_wrapped() {
        let flat = r#"["always-defect", {"name": "grim", "strategy": "trigger"}, {"strategy": "joss"}]"#;
        let roster = Roster::from_json(flat).unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.get(1).unwrap().name, "grim");
        assert_eq!(roster.get(1).unwrap().kind, StrategyKind::Trigger);
        assert_eq!(roster.get(2).unwrap().name, "joss");

        let wrapped = r#"{"players": ["pavlov", "tester"]}"#;
        let roster = Roster::from_json(wrapped).unwrap();
        assert_eq!(roster.len(), 2);
    }

    #[test]
    fn test_from_json_unknown_strategy() {
        let err = Roster::from_json(r#"[{"name": "x", "strategy": "nope"}]"#).unwrap_err();
        assert!(matches!(err, RosterError::UnknownStrategy(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(Roster::from_json("{"), Err(RosterError::Json(_))));
    }
}
