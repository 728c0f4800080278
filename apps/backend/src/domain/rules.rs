//! Rule normalizer: expands symbolic movement directives into
//! primitive axis rules the move generator can walk.
//!
//! Every output rule carries at most one vertical and at most one
//! horizontal component, so it resolves as a single ray or an
//! axis-aligned run. Compound diagonal keys expand into their axis
//! pairs, reusing the compound's step spec on both axes.

use crate::domain::script::{Direction, MoveRule, StepSpec};

/// Vertical ray direction. `Up` decreases the row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Up,
    Down,
}

impl Vertical {
    pub fn sign(&self) -> i64 {
        match self {
            Vertical::Up => -1,
            Vertical::Down => 1,
        }
    }
}

/// Horizontal ray direction. `Left` decreases the column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
}

impl Horizontal {
    pub fn sign(&self) -> i64 {
        match self {
            Horizontal::Left => -1,
            Horizontal::Right => 1,
        }
    }
}

/// A primitive axis rule: at most one component per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRule {
    pub vertical: Option<(Vertical, StepSpec)>,
    pub horizontal: Option<(Horizontal, StepSpec)>,
    pub first_move_only: bool,
}

impl NormalizedRule {
    fn vertical_only(dir: Vertical, spec: StepSpec, first_move_only: bool) -> Self {
        Self {
            vertical: Some((dir, spec)),
            horizontal: None,
            first_move_only,
        }
    }

    fn horizontal_only(dir: Horizontal, spec: StepSpec, first_move_only: bool) -> Self {
        Self {
            vertical: None,
            horizontal: Some((dir, spec)),
            first_move_only,
        }
    }

    fn paired(v: Vertical, h: Horizontal, spec: &StepSpec, first_move_only: bool) -> Self {
        Self {
            vertical: Some((v, spec.clone())),
            horizontal: Some((h, spec.clone())),
            first_move_only,
        }
    }
}

/// Axis pairs a compound diagonal key expands into.
fn diagonal_pairs(direction: Direction) -> &'static [(Vertical, Horizontal)] {
    use Horizontal::{Left, Right};
    use Vertical::{Down, Up};
    match direction {
        Direction::Diagonal => &[(Up, Left), (Up, Right), (Down, Left), (Down, Right)],
        Direction::DiagonalUp => &[(Up, Left), (Up, Right)],
        Direction::DiagonalDown => &[(Down, Left), (Down, Right)],
        Direction::DiagonalLeft => &[(Up, Left), (Down, Left)],
        Direction::DiagonalRight => &[(Up, Right), (Down, Right)],
        Direction::DiagonalUpLeft => &[(Up, Left)],
        Direction::DiagonalUpRight => &[(Up, Right)],
        Direction::DiagonalDownLeft => &[(Down, Left)],
        Direction::DiagonalDownRight => &[(Down, Right)],
        _ => &[],
    }
}

/// Expand one directive object into primitive axis rules.
fn normalize_rule(rule: &MoveRule, out: &mut Vec<NormalizedRule>) {
    let up = rule.directions.get(&Direction::Up);
    let down = rule.directions.get(&Direction::Down);
    let left = rule.directions.get(&Direction::Left);
    let right = rule.directions.get(&Direction::Right);

    // Primitive keys combine within one rule: a single vertical and a
    // single horizontal merge into one (possibly paired) rule, while
    // UP+DOWN or LEFT+RIGHT split into separate rules so the output
    // invariant (one key per axis) holds.
    let verticals: Vec<Option<(Vertical, StepSpec)>> = match (up, down) {
        (None, None) => vec![None],
        (up, down) => {
            let mut v = Vec::new();
            if let Some(spec) = up {
                v.push(Some((Vertical::Up, spec.clone())));
            }
            if let Some(spec) = down {
                v.push(Some((Vertical::Down, spec.clone())));
            }
            v
        }
    };
    let horizontals: Vec<Option<(Horizontal, StepSpec)>> = match (left, right) {
        (None, None) => vec![None],
        (left, right) => {
            let mut h = Vec::new();
            if let Some(spec) = left {
                h.push(Some((Horizontal::Left, spec.clone())));
            }
            if let Some(spec) = right {
                h.push(Some((Horizontal::Right, spec.clone())));
            }
            h
        }
    };

    for vertical in &verticals {
        for horizontal in &horizontals {
            if vertical.is_none() && horizontal.is_none() {
                continue;
            }
            out.push(NormalizedRule {
                vertical: vertical.clone(),
                horizontal: horizontal.clone(),
                first_move_only: rule.first_move_only,
            });
        }
    }

    // Compound diagonal keys expand independently of the primitives.
    for (direction, spec) in &rule.directions {
        for (v, h) in diagonal_pairs(*direction) {
            out.push(NormalizedRule::paired(*v, *h, spec, rule.first_move_only));
        }
    }
}

/// Normalize a piece's full `Moves` list. Rules tagged
/// `first_move_only` are dropped entirely once the piece has moved.
pub fn normalize_moves(moves: &[MoveRule], move_counter: u32) -> Vec<NormalizedRule> {
    let mut out = Vec::new();
    for rule in moves {
        if rule.first_move_only && move_counter > 0 {
            continue;
        }
        normalize_rule(rule, &mut out);
    }
    out
}
