//! Declarative game-script types: grid, movement directives, win list.
//!
//! These types mirror the wire shapes of the script document exactly
//! (`GridSize`, `ObjectID`, `CurrentPosition{Row,Column}`, ...), so a
//! record round-trips through serde without field-name drift. Unknown
//! authoring fields are preserved via flattened maps: the script is
//! immutable after game creation and must survive whole-document
//! rewrites untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

/// A board square, 1-indexed from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    #[serde(rename = "Row")]
    pub row: i64,
    #[serde(rename = "Column")]
    pub column: i64,
}

impl Position {
    pub fn new(row: i64, column: i64) -> Self {
        Self { row, column }
    }
}

/// Grid bounds from the script. Rows and columns count from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    #[serde(rename = "Rows")]
    pub rows: i64,
    #[serde(rename = "Columns")]
    pub columns: i64,
}

impl GridSize {
    pub fn contains(&self, pos: &Position) -> bool {
        (1..=self.rows).contains(&pos.row) && (1..=self.columns).contains(&pos.column)
    }
}

/// Symbolic movement directive keys accepted by the rule normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Diagonal,
    DiagonalUp,
    DiagonalDown,
    DiagonalLeft,
    DiagonalRight,
    DiagonalUpLeft,
    DiagonalUpRight,
    DiagonalDownLeft,
    DiagonalDownRight,
}

/// Step counts for one directive: an explicit ordered list, or the
/// `"Infinite"` sentinel meaning "walk outward until out of bounds".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "StepSpecRepr")]
pub enum StepSpec {
    Steps(Vec<i64>),
    Infinite,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StepSpecRepr {
    Steps(Vec<i64>),
    Word(String),
}

impl TryFrom<StepSpecRepr> for StepSpec {
    type Error = String;

    fn try_from(repr: StepSpecRepr) -> Result<Self, Self::Error> {
        match repr {
            StepSpecRepr::Steps(steps) => Ok(StepSpec::Steps(steps)),
            StepSpecRepr::Word(word) if word == "Infinite" => Ok(StepSpec::Infinite),
            StepSpecRepr::Word(word) => Err(format!(
                "expected a step list or \"Infinite\", got \"{word}\""
            )),
        }
    }
}

impl Serialize for StepSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            StepSpec::Steps(steps) => steps.serialize(serializer),
            StepSpec::Infinite => serializer.serialize_str("Infinite"),
        }
    }
}

/// One movement directive object from a piece's `Moves` list: one or
/// more direction keys, each mapped to a step spec, plus the
/// first-move-only tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRule {
    #[serde(flatten)]
    pub directions: BTreeMap<Direction, StepSpec>,
    #[serde(default)]
    pub first_move_only: bool,
}

impl MoveRule {
    pub fn single(direction: Direction, spec: StepSpec) -> Self {
        Self {
            directions: BTreeMap::from([(direction, spec)]),
            first_move_only: false,
        }
    }
}

/// Win condition discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinCondition {
    ReachedPosition,
    CapturedObject,
}

/// One entry of the script's win list. `player` is the seat number the
/// item applies to; exactly one of `position`/`object_types` is
/// meaningful depending on `condition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinItem {
    #[serde(rename = "Player")]
    pub player: i64,
    #[serde(rename = "WinCondition")]
    pub condition: WinCondition,
    #[serde(rename = "Position", default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(rename = "ObjectTypes", default, skip_serializing_if = "Vec::is_empty")]
    pub object_types: Vec<String>,
}

/// The full declarative rule document. Immutable after game creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameScript {
    #[serde(rename = "GridSize")]
    pub grid_size: GridSize,
    #[serde(rename = "WinList", default)]
    pub win_list: Vec<WinItem>,
    /// Authoring fields the engine does not interpret (piece catalogs,
    /// display hints). Carried verbatim through record rewrites.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn step_spec_parses_list_and_sentinel() {
        let steps: StepSpec = serde_json::from_value(json!([1, 2])).unwrap();
        assert_eq!(steps, StepSpec::Steps(vec![1, 2]));

        let infinite: StepSpec = serde_json::from_value(json!("Infinite")).unwrap();
        assert_eq!(infinite, StepSpec::Infinite);

        let bad = serde_json::from_value::<StepSpec>(json!("Forever"));
        assert!(bad.is_err());
    }

    #[test]
    fn move_rule_flattens_direction_keys() {
        let rule: MoveRule = serde_json::from_value(json!({
            "UP": "Infinite",
            "LEFT": [1, 2],
            "first_move_only": true,
        }))
        .unwrap();
        assert_eq!(rule.directions[&Direction::Up], StepSpec::Infinite);
        assert_eq!(rule.directions[&Direction::Left], StepSpec::Steps(vec![1, 2]));
        assert!(rule.first_move_only);

        let back = serde_json::to_value(&rule).unwrap();
        assert_eq!(back["UP"], json!("Infinite"));
        assert_eq!(back["LEFT"], json!([1, 2]));
    }

    #[test]
    fn grid_contains_is_one_indexed() {
        let grid = GridSize { rows: 8, columns: 8 };
        assert!(grid.contains(&Position::new(1, 1)));
        assert!(grid.contains(&Position::new(8, 8)));
        assert!(!grid.contains(&Position::new(0, 4)));
        assert!(!grid.contains(&Position::new(4, 9)));
    }

    #[test]
    fn script_preserves_unknown_authoring_fields() {
        let script: GameScript = serde_json::from_value(json!({
            "GridSize": {"Rows": 8, "Columns": 8},
            "WinList": [],
            "DisplayName": "Mini Chess",
        }))
        .unwrap();
        let back = serde_json::to_value(&script).unwrap();
        assert_eq!(back["DisplayName"], json!("Mini Chess"));
    }
}
