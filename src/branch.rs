//! Recursive branching tree.
//!
//! Every node derives its geometry from its parent: length and size shrink
//! (or grow) by fixed ratios, the heading turns by `curve` plus the node's
//! share of the `fan`, and the color walks the colormap with depth. Child
//! slots are filled by independent Bernoulli draws weighted toward the
//! center of the fan by `centerness`.
//!
//! Nodes live in an arena in generation (breadth-first) order. A run first
//! grows the whole tree, one node per step, then paints it one node per
//! step in depth-first post-order so children always land under their
//! parent's disc.

use crate::canvas::{Canvas, Color, Size};
use crate::colormap::Colormap;
use crate::config::BranchOverrides;
use crate::error::{check_range, Error, Result};
use crate::model::{Model, Progress, Randomize};
use rand::prelude::*;
use tracing::{debug, info, warn};

/// Node budget the depth suggestion is tuned for
pub const NODE_BUDGET: u64 = 10_000;

/// Growth stops here no matter what the parameters say
pub const HARD_NODE_CAP: usize = 1_000_000;

pub const MIN_DEPTH: u32 = 2;
pub const MAX_DEPTH: u32 = 64;
pub const MAX_CHILDREN: u32 = 99;

/// Deepest tree with `children` per node that stays near `NODE_BUDGET`
/// nodes: `floor(log_n(budget * (n - 1) + 1))`.
///
/// `None` for `children <= 1`, which has no exponential growth to bound.
pub fn suggested_max_depth(children: u32) -> Option<u32> {
    if children <= 1 {
        return None;
    }
    let n = children as f64;
    let total = NODE_BUDGET as f64 * (n - 1.0) + 1.0;
    Some(total.log(n).floor() as u32)
}

/// Per-slot branch weights.
///
/// Uniform below three children. Otherwise a slot's weight is
/// `1 + place * centerness + fudge`, where `place` runs from 1 at the
/// center of the fan to -1 at its edges and `fudge` lifts odd counts
/// slightly. The weights are not normalized.
pub fn sibling_distribution(children: u32, centerness: f64) -> Vec<f64> {
    let n = children as usize;
    if n < 3 {
        return vec![1.0; n];
    }
    let center = (n - 1) as f64 / 2.0;
    let fudge = (n % 2) as f64 * centerness / n as f64;
    (0..n)
        .map(|i| {
            let distance = (i as f64 - center).abs();
            let place = 1.0 - 2.0 * distance / center;
            1.0 + place * centerness + fudge
        })
        .collect()
}

/// Tunable parameters of a tree run
#[derive(Clone, Debug, PartialEq)]
pub struct BranchParams {
    pub colormap: Colormap,
    pub children: u32,
    pub max_depth: u32,
    pub draw_lines: bool,
    pub size: f64,
    pub size_grow: f64,
    pub length: f64,
    pub length_grow: f64,
    /// Degrees added to the heading every generation
    pub curve: f64,
    /// Degrees between the first and last child
    pub fan: f64,
    pub branch_prob: f64,
    pub centerness: f64,
}

impl Default for BranchParams {
    fn default() -> Self {
        Self {
            colormap: Colormap::default(),
            children: 2,
            max_depth: 4,
            draw_lines: true,
            size: 15.0,
            size_grow: 0.9,
            length: 100.0,
            length_grow: 0.9,
            curve: 30.0,
            fan: 90.0,
            branch_prob: 1.0,
            centerness: 0.0,
        }
    }
}

impl BranchParams {
    /// Colormap position for a node at `depth`; painted depths map onto [0, 1].
    pub fn color_at(&self, depth: u32) -> Color {
        let t = if self.max_depth <= 1 {
            0.0
        } else {
            depth as f64 / (self.max_depth - 1) as f64
        };
        self.colormap.sample(t)
    }

    /// Heading offset of child `slot` inside the fan.
    pub fn deviation(&self, slot: u32) -> f64 {
        if self.children <= 1 {
            return 0.0;
        }
        let spread = (self.children - 1) as f64;
        self.fan * (slot as f64 - spread / 2.0) / spread
    }
}

/// One node of a grown tree
#[derive(Clone, Debug, PartialEq)]
pub struct BranchNode {
    pub x: f64,
    pub y: f64,
    /// Heading in degrees; -90 points up
    pub angle: f64,
    pub size: f64,
    pub length: f64,
    pub color: Color,
    pub depth: u32,
    pub child_index: u32,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
}

enum Phase {
    Idle,
    Growing { next: usize },
    Painting { order: Vec<usize>, next: usize },
    Done,
}

/// The branching tree model
pub struct BranchTree {
    canvas: Size,
    params: BranchParams,
    distribution: Vec<f64>,
    run: BranchParams,
    run_distribution: Vec<f64>,
    nodes: Vec<BranchNode>,
    phase: Phase,
    capped: bool,
}

impl BranchTree {
    pub fn new(canvas: Size) -> Self {
        let params = BranchParams::default();
        let distribution = sibling_distribution(params.children, params.centerness);
        Self {
            canvas,
            run: params.clone(),
            run_distribution: distribution.clone(),
            params,
            distribution,
            nodes: Vec::new(),
            phase: Phase::Idle,
            capped: false,
        }
    }

    pub fn params(&self) -> &BranchParams {
        &self.params
    }

    pub fn distribution(&self) -> &[f64] {
        &self.distribution
    }

    /// Nodes of the latest run, in generation order.
    pub fn nodes(&self) -> &[BranchNode] {
        &self.nodes
    }

    pub fn suggested_max_depth(&self) -> Option<u32> {
        suggested_max_depth(self.params.children)
    }

    fn refresh_distribution(&mut self) {
        self.distribution = sibling_distribution(self.params.children, self.params.centerness);
    }

    pub fn set_colormap(&mut self, name: &str) -> Result<()> {
        self.params.colormap = Colormap::by_name(name)?;
        Ok(())
    }

    /// Set children per node; lowers (never raises) `max_depth` to the
    /// suggested bound for the new count.
    pub fn set_children(&mut self, children: u32) -> Result<()> {
        if !(1..=MAX_CHILDREN).contains(&children) {
            return Err(Error::InvalidParameter {
                name: "children",
                value: children as f64,
                expected: "1-99",
            });
        }
        self.params.children = children;
        if let Some(bound) = suggested_max_depth(children) {
            self.params.max_depth = self.params.max_depth.min(bound);
        }
        self.refresh_distribution();
        Ok(())
    }

    pub fn set_max_depth(&mut self, max_depth: u32) -> Result<()> {
        if !(MIN_DEPTH..=MAX_DEPTH).contains(&max_depth) {
            return Err(Error::InvalidParameter {
                name: "max_depth",
                value: max_depth as f64,
                expected: "2-64",
            });
        }
        self.params.max_depth = max_depth;
        Ok(())
    }

    pub fn set_draw_lines(&mut self, draw_lines: bool) {
        self.params.draw_lines = draw_lines;
    }

    pub fn set_size(&mut self, size: f64) -> Result<()> {
        self.params.size = check_range("size", size, 1.0, 100.0, "1-100")?;
        Ok(())
    }

    pub fn set_size_grow(&mut self, ratio: f64) -> Result<()> {
        self.params.size_grow = check_range("size_grow", ratio, 0.1, 2.0, "0.1-2.0")?;
        Ok(())
    }

    pub fn set_length(&mut self, length: f64) -> Result<()> {
        self.params.length = check_range("length", length, 1.0, 400.0, "1-400")?;
        Ok(())
    }

    pub fn set_length_grow(&mut self, ratio: f64) -> Result<()> {
        self.params.length_grow = check_range("length_grow", ratio, 0.1, 2.0, "0.1-2.0")?;
        Ok(())
    }

    pub fn set_curve(&mut self, degrees: f64) -> Result<()> {
        self.params.curve = check_range("curve", degrees, -180.0, 180.0, "-180-180")?;
        Ok(())
    }

    pub fn set_fan(&mut self, degrees: f64) -> Result<()> {
        self.params.fan = check_range("fan", degrees, 0.0, 360.0, "0-360")?;
        Ok(())
    }

    pub fn set_branch_prob(&mut self, p: f64) -> Result<()> {
        self.params.branch_prob = check_range("branch_prob", p, 0.0, 1.0, "0-1")?;
        Ok(())
    }

    pub fn set_centerness(&mut self, c: f64) -> Result<()> {
        self.params.centerness = check_range("centerness", c, 0.0, 1.0, "0-1")?;
        self.refresh_distribution();
        Ok(())
    }

    /// Apply every present override through the setters.
    ///
    /// All-or-nothing: on the first rejected value the previous parameters
    /// are restored.
    pub fn apply(&mut self, o: &BranchOverrides) -> Result<()> {
        let saved = self.params.clone();
        let result = self.apply_inner(o);
        if result.is_err() {
            self.params = saved;
            self.refresh_distribution();
        }
        result
    }

    fn apply_inner(&mut self, o: &BranchOverrides) -> Result<()> {
        if let Some(name) = &o.colormap {
            self.set_colormap(name)?;
        }
        // children first: it may lower max_depth, an explicit depth wins
        if let Some(v) = o.children {
            self.set_children(v)?;
        }
        if let Some(v) = o.max_depth {
            self.set_max_depth(v)?;
        }
        if let Some(v) = o.draw_lines {
            self.set_draw_lines(v);
        }
        if let Some(v) = o.size {
            self.set_size(v)?;
        }
        if let Some(v) = o.size_grow {
            self.set_size_grow(v)?;
        }
        if let Some(v) = o.length {
            self.set_length(v)?;
        }
        if let Some(v) = o.length_grow {
            self.set_length_grow(v)?;
        }
        if let Some(v) = o.curve {
            self.set_curve(v)?;
        }
        if let Some(v) = o.fan {
            self.set_fan(v)?;
        }
        if let Some(v) = o.branch_prob {
            self.set_branch_prob(v)?;
        }
        if let Some(v) = o.centerness {
            self.set_centerness(v)?;
        }
        Ok(())
    }

    /// Current parameters as a complete override set.
    pub fn overrides(&self) -> BranchOverrides {
        let p = &self.params;
        BranchOverrides {
            colormap: Some(p.colormap.name().to_string()),
            children: Some(p.children),
            max_depth: Some(p.max_depth),
            draw_lines: Some(p.draw_lines),
            size: Some(p.size),
            size_grow: Some(p.size_grow),
            length: Some(p.length),
            length_grow: Some(p.length_grow),
            curve: Some(p.curve),
            fan: Some(p.fan),
            branch_prob: Some(p.branch_prob),
            centerness: Some(p.centerness),
        }
    }

    fn root(&self) -> BranchNode {
        let p = &self.run;
        BranchNode {
            x: (self.canvas.width / 2.0).floor(),
            y: (self.canvas.height / 2.0).floor(),
            angle: -90.0,
            size: p.size,
            length: p.length,
            color: p.color_at(0),
            depth: 0,
            child_index: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    fn child_of(&self, parent_idx: usize, slot: u32) -> BranchNode {
        let p = &self.run;
        let parent = &self.nodes[parent_idx];
        let depth = parent.depth + 1;
        let length = if depth > 1 {
            parent.length * p.length_grow
        } else {
            parent.length
        };
        let angle = parent.angle + p.curve + p.deviation(slot);
        let heading = angle.to_radians();
        BranchNode {
            x: parent.x + length * heading.cos(),
            y: parent.y + length * heading.sin(),
            angle,
            size: parent.size * p.size_grow,
            length,
            color: p.color_at(depth),
            depth,
            child_index: slot,
            parent: Some(parent_idx),
            children: Vec::new(),
        }
    }

    /// Roll the child slots of node `idx` and append the survivors.
    fn expand(&mut self, idx: usize, rng: &mut StdRng) {
        if self.nodes[idx].depth >= self.run.max_depth {
            return;
        }
        for slot in 0..self.run.children {
            if self.nodes.len() >= HARD_NODE_CAP {
                if !self.capped {
                    warn!(cap = HARD_NODE_CAP, "tree hit the hard node cap, growth stopped");
                    self.capped = true;
                }
                return;
            }
            let p = self.run.branch_prob * self.run_distribution[slot as usize];
            if rng.gen::<f64>() < p {
                let child = self.child_of(idx, slot);
                let child_idx = self.nodes.len();
                self.nodes.push(child);
                self.nodes[idx].children.push(child_idx);
            }
        }
    }

    /// Depth-first post-order over painted nodes (depth below `max_depth`).
    fn paint_order(&self) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }
        let mut stack = vec![(0usize, false)];
        while let Some((idx, expanded)) = stack.pop() {
            if expanded {
                if self.nodes[idx].depth < self.run.max_depth {
                    order.push(idx);
                }
                continue;
            }
            stack.push((idx, true));
            for &child in self.nodes[idx].children.iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }

    fn paint(&self, idx: usize, canvas: &mut dyn Canvas) -> Result<()> {
        let node = &self.nodes[idx];
        if let (Some(parent_idx), true) = (node.parent, self.run.draw_lines) {
            let parent = &self.nodes[parent_idx];
            let heading = node.angle.to_radians();
            let rim_x = parent.x + parent.size * heading.cos();
            let rim_y = parent.y + parent.size * heading.sin();
            canvas.draw_line(rim_x, rim_y, node.x, node.y, node.color, 1.0);
        }
        canvas.draw_ellipse(node.x, node.y, node.size, node.color);
        canvas.present()
    }
}

impl Model for BranchTree {
    fn name(&self) -> &'static str {
        "branch"
    }

    fn reset(&mut self) {
        self.params = BranchParams::default();
        self.refresh_distribution();
    }

    fn begin(&mut self) {
        self.run = self.params.clone();
        self.run_distribution = self.distribution.clone();
        self.nodes.clear();
        self.capped = false;
        let root = self.root();
        self.nodes.push(root);
        self.phase = Phase::Growing { next: 0 };
        debug!(params = ?self.run, "branch run started");
    }

    /// Grows one node, or paints one node once growth is exhausted.
    /// Without a prior `begin` there is nothing to do.
    fn step(&mut self, canvas: &mut dyn Canvas, rng: &mut StdRng) -> Result<Progress> {
        if let Phase::Growing { next } = self.phase {
            if next < self.nodes.len() {
                self.expand(next, rng);
                self.phase = Phase::Growing { next: next + 1 };
                return Ok(Progress::Working);
            }
            self.phase = Phase::Painting {
                order: self.paint_order(),
                next: 0,
            };
        }

        match &mut self.phase {
            Phase::Painting { order, next } => {
                if let Some(&idx) = order.get(*next) {
                    *next += 1;
                    self.paint(idx, canvas)?;
                    Ok(Progress::Working)
                } else {
                    info!(
                        nodes = self.nodes.len(),
                        painted = order.len(),
                        "branch run finished"
                    );
                    self.phase = Phase::Done;
                    Ok(Progress::Finished)
                }
            }
            Phase::Idle | Phase::Done | Phase::Growing { .. } => Ok(Progress::Finished),
        }
    }

    fn as_randomize(&mut self) -> Option<&mut dyn Randomize> {
        Some(self)
    }
}

impl Randomize for BranchTree {
    fn randomize(&mut self, rng: &mut StdRng) {
        let children: u32 = rng.gen_range(2..=6);
        let depth_top = suggested_max_depth(children).unwrap_or(MAX_DEPTH).max(4);
        let fan_top = (360.0 - 360.0 / children as f64).floor() as i32;
        let size: i32 = rng.gen_range(15..=80);
        let size_grow_pct: i32 = rng.gen_range(50..=120);

        let p = &mut self.params;
        p.children = children;
        p.max_depth = rng.gen_range(4..=depth_top);
        p.branch_prob = rng.gen_range(0.5..=1.0);
        p.centerness = rng.gen_range(0.0..=0.5);
        p.curve = rng.gen_range(-60..=60) as f64;
        p.fan = rng.gen_range(0..=fan_top) as f64;
        p.size = size as f64;
        p.size_grow = size_grow_pct as f64 / 100.0;
        p.length = rng.gen_range(p.size / 2.0..=200.0);
        // length grows at least as fast as size
        p.length_grow = rng.gen_range(size_grow_pct..=150) as f64 / 100.0;
        p.draw_lines = rng.gen_bool(0.5);

        self.refresh_distribution();
        debug!(params = ?self.params, "branch parameters randomized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawOp, RecordingCanvas};

    const EPS: f64 = 1e-9;

    fn tree() -> BranchTree {
        BranchTree::new(Size::new(800, 600))
    }

    fn run(tree: &mut BranchTree, seed: u64) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new(800, 600);
        let mut rng = StdRng::seed_from_u64(seed);
        tree.go(&mut canvas, &mut rng).unwrap();
        canvas
    }

    #[test]
    fn distribution_is_ones_below_three_children() {
        for n in 0..3 {
            for c in [0.0, 0.3, 1.0] {
                assert_eq!(sibling_distribution(n, c), vec![1.0; n as usize]);
            }
        }
    }

    #[test]
    fn distribution_is_uniform_without_centerness() {
        for n in 3..=12 {
            let d = sibling_distribution(n, 0.0);
            assert_eq!(d.len(), n as usize);
            assert!(d.iter().all(|w| (w - 1.0).abs() < EPS), "n={n}: {d:?}");
        }
    }

    #[test]
    fn distribution_favors_center() {
        let d = sibling_distribution(5, 0.5);
        // place = [-1, 0, 1, 0, -1], fudge = 0.1
        let expected = [0.6, 1.1, 1.6, 1.1, 0.6];
        for (w, e) in d.iter().zip(expected) {
            assert!((w - e).abs() < EPS, "{d:?}");
        }
    }

    #[test]
    fn distribution_even_count_has_no_fudge() {
        let d = sibling_distribution(4, 0.3);
        // place = [-1, 1/3, 1/3, -1]
        let expected = [0.7, 1.1, 1.1, 0.7];
        for (w, e) in d.iter().zip(expected) {
            assert!((w - e).abs() < EPS, "{d:?}");
        }
    }

    #[test]
    fn suggested_depth_values() {
        assert_eq!(suggested_max_depth(0), None);
        assert_eq!(suggested_max_depth(1), None);
        assert_eq!(suggested_max_depth(2), Some(13));
        assert_eq!(suggested_max_depth(3), Some(9));
        assert_eq!(suggested_max_depth(4), Some(7));
        assert_eq!(suggested_max_depth(6), Some(6));
        assert_eq!(suggested_max_depth(99), Some(3));
    }

    #[test]
    fn children_change_lowers_but_never_raises_depth() {
        let mut t = tree();
        t.set_max_depth(12).unwrap();
        t.set_children(4).unwrap();
        assert_eq!(t.params().max_depth, 7);
        t.set_children(2).unwrap();
        assert_eq!(t.params().max_depth, 7);
        t.set_children(1).unwrap();
        assert_eq!(t.params().max_depth, 7);
    }

    #[test]
    fn children_change_refreshes_distribution() {
        let mut t = tree();
        t.set_centerness(0.5).unwrap();
        t.set_children(5).unwrap();
        assert_eq!(t.distribution(), sibling_distribution(5, 0.5).as_slice());
        t.set_centerness(0.0).unwrap();
        assert!(t.distribution().iter().all(|w| (w - 1.0).abs() < EPS));
    }

    #[test]
    fn setters_reject_out_of_range() {
        let mut t = tree();
        let before = t.params().clone();
        assert!(t.set_children(0).is_err());
        assert!(t.set_max_depth(1).is_err());
        assert!(t.set_fan(361.0).is_err());
        assert!(t.set_curve(f64::NAN).is_err());
        assert!(t.set_branch_prob(1.5).is_err());
        assert!(matches!(t.set_colormap("nope"), Err(Error::UnknownColormap(_))));
        assert_eq!(t.params(), &before);
    }

    #[test]
    fn apply_is_all_or_nothing() {
        let mut t = tree();
        let before = t.params().clone();
        let bad = BranchOverrides {
            children: Some(5),
            fan: Some(999.0),
            ..Default::default()
        };
        assert!(t.apply(&bad).is_err());
        assert_eq!(t.params(), &before);
        assert_eq!(t.distribution(), &[1.0, 1.0]);

        let good = BranchOverrides {
            children: Some(3),
            max_depth: Some(5),
            ..Default::default()
        };
        t.apply(&good).unwrap();
        assert_eq!(t.params().children, 3);
        assert_eq!(t.params().max_depth, 5);
    }

    #[test]
    fn overrides_roundtrip_through_apply() {
        let mut a = tree();
        let mut rng = StdRng::seed_from_u64(11);
        a.randomize(&mut rng);
        let mut b = tree();
        b.apply(&a.overrides()).unwrap();
        assert_eq!(a.params(), b.params());
    }

    #[test]
    fn reset_is_idempotent() {
        let mut t = tree();
        let mut rng = StdRng::seed_from_u64(3);
        t.randomize(&mut rng);
        t.reset();
        let first = t.params().clone();
        t.reset();
        assert_eq!(t.params(), &first);
        assert_eq!(first, BranchParams::default());
    }

    #[test]
    fn full_tree_node_count() {
        for n in 2..=4u32 {
            for depth in 2..=4u32 {
                let mut t = tree();
                t.set_children(n).unwrap();
                t.set_max_depth(depth).unwrap();
                run(&mut t, 1);
                let expected = (n.pow(depth + 1) - 1) / (n - 1);
                assert_eq!(t.nodes().len() as u32, expected, "n={n} depth={depth}");
            }
        }
    }

    #[test]
    fn zero_probability_leaves_only_root() {
        let mut t = tree();
        t.set_branch_prob(0.0).unwrap();
        let canvas = run(&mut t, 1);
        assert_eq!(t.nodes().len(), 1);
        assert_eq!(canvas.ellipses().count(), 1);
        assert_eq!(canvas.lines().count(), 0);
    }

    #[test]
    fn generation_order_is_breadth_first() {
        let mut t = tree();
        t.set_max_depth(3).unwrap();
        run(&mut t, 9);
        let depths: Vec<u32> = t.nodes().iter().map(|n| n.depth).collect();
        assert_eq!(depths, vec![0, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3]);
    }

    #[test]
    fn root_geometry() {
        let mut t = tree();
        run(&mut t, 1);
        let root = &t.nodes()[0];
        assert_eq!((root.x, root.y, root.angle), (400.0, 300.0, -90.0));
        assert_eq!(root.size, 15.0);
        assert_eq!(root.parent, None);
        assert_eq!(root.color, Colormap::default().sample(0.0));
    }

    #[test]
    fn child_recurrences() {
        let mut t = tree();
        run(&mut t, 1);
        let nodes = t.nodes();
        let root = &nodes[0];
        let left = &nodes[1];
        let right = &nodes[2];

        // depth 1 keeps the parent's length, size shrinks from the start
        assert!((left.length - 100.0).abs() < EPS);
        assert!((left.size - 13.5).abs() < EPS);
        // -90 + 30 -/+ 45
        assert!((left.angle - -105.0).abs() < EPS);
        assert!((right.angle - -15.0).abs() < EPS);
        let heading = left.angle.to_radians();
        assert!((left.x - (root.x + 100.0 * heading.cos())).abs() < EPS);
        assert!((left.y - (root.y + 100.0 * heading.sin())).abs() < EPS);

        let grandchild = &nodes[left.children[0]];
        assert!((grandchild.length - 90.0).abs() < EPS);
        assert!((grandchild.angle - (left.angle + 30.0 - 45.0)).abs() < EPS);
        assert_eq!(grandchild.depth, 2);
    }

    #[test]
    fn single_child_has_no_deviation() {
        let mut t = tree();
        t.set_children(1).unwrap();
        t.set_curve(0.0).unwrap();
        run(&mut t, 1);
        assert_eq!(t.nodes().len(), 5);
        assert!(t.nodes().iter().all(|n| (n.angle - -90.0).abs() < EPS));
    }

    #[test]
    fn children_paint_before_parents_and_tips_stay_hidden() {
        let mut t = tree();
        t.set_max_depth(3).unwrap();
        let canvas = run(&mut t, 1);
        let painted: Vec<(f64, f64)> = canvas
            .ellipses()
            .map(|op| match op {
                DrawOp::Ellipse { center, .. } => *center,
                _ => unreachable!(),
            })
            .collect();

        // 15 nodes, 8 tips at max depth are never painted
        assert_eq!(painted.len(), 7);
        let root = &t.nodes()[0];
        assert_eq!(painted.last(), Some(&(root.x, root.y)));
        let first_leafish = &t.nodes()[t.nodes()[1].children[0]];
        assert_eq!(painted[0], (first_leafish.x, first_leafish.y));
    }

    #[test]
    fn painted_colors_span_colormap() {
        let mut t = tree();
        t.set_max_depth(3).unwrap();
        let canvas = run(&mut t, 1);
        let cmap = Colormap::default();
        let colors: Vec<Color> = canvas
            .ellipses()
            .map(|op| match op {
                DrawOp::Ellipse { color, .. } => *color,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(colors[0], cmap.sample(1.0));
        assert_eq!(*colors.last().unwrap(), cmap.sample(0.0));
    }

    #[test]
    fn stems_start_on_parent_rim() {
        let mut t = tree();
        t.set_max_depth(2).unwrap();
        let canvas = run(&mut t, 1);
        let nodes = t.nodes();
        let child = &nodes[1];
        let heading = child.angle.to_radians();
        let rim = (15.0 * heading.cos() + 400.0, 15.0 * heading.sin() + 300.0);

        let first_line = canvas.lines().next().unwrap();
        match first_line {
            DrawOp::Line { from, to, width, color } => {
                assert!((from.0 - rim.0).abs() < EPS && (from.1 - rim.1).abs() < EPS);
                assert_eq!(*to, (child.x, child.y));
                assert_eq!(*width, 1.0);
                assert_eq!(*color, child.color);
            }
            _ => unreachable!(),
        }
        assert_eq!(canvas.lines().count(), 2);
    }

    #[test]
    fn no_stems_when_lines_disabled() {
        let mut t = tree();
        t.set_draw_lines(false);
        let canvas = run(&mut t, 1);
        assert_eq!(canvas.lines().count(), 0);
        assert_eq!(canvas.ellipses().count(), 15);
    }

    #[test]
    fn every_paint_is_presented() {
        let mut t = tree();
        let canvas = run(&mut t, 1);
        let presents = canvas.ops.iter().filter(|op| **op == DrawOp::Present).count();
        assert_eq!(presents, canvas.ellipses().count());
    }

    #[test]
    fn go_discards_previous_tree() {
        let mut t = tree();
        run(&mut t, 1);
        assert_eq!(t.nodes().len(), 31);
        t.set_max_depth(2).unwrap();
        run(&mut t, 1);
        assert_eq!(t.nodes().len(), 7);
    }

    #[test]
    fn go_counts_grow_and_paint_steps() {
        let mut t = tree();
        let mut canvas = RecordingCanvas::new(800, 600);
        let mut rng = StdRng::seed_from_u64(1);
        let steps = t.go(&mut canvas, &mut rng).unwrap();
        // 31 growth steps + 15 painted nodes
        assert_eq!(steps, 31 + 15);
        assert_eq!(t.step(&mut canvas, &mut rng).unwrap(), Progress::Finished);
    }

    #[test]
    fn step_without_begin_does_nothing() {
        let mut t = tree();
        let mut canvas = RecordingCanvas::new(800, 600);
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(t.step(&mut canvas, &mut rng).unwrap(), Progress::Finished);
        assert!(canvas.ops.is_empty());
    }

    #[test]
    fn seeded_runs_repeat() {
        let mut a = tree();
        let mut b = tree();
        for t in [&mut a, &mut b] {
            t.set_children(4).unwrap();
            t.set_branch_prob(0.7).unwrap();
            t.set_centerness(0.4).unwrap();
        }
        let ca = run(&mut a, 42);
        let cb = run(&mut b, 42);
        assert_eq!(a.nodes(), b.nodes());
        assert_eq!(ca.ops, cb.ops);
    }

    fn root_slot_counts(branch_prob: f64, seeds: u64) -> [u32; 5] {
        let mut t = tree();
        t.set_children(5).unwrap();
        t.set_max_depth(2).unwrap();
        t.set_centerness(1.0).unwrap();
        t.set_branch_prob(branch_prob).unwrap();
        let mut counts = [0; 5];
        for seed in 0..seeds {
            run(&mut t, seed);
            for &c in &t.nodes()[0].children {
                counts[t.nodes()[c].child_index as usize] += 1;
            }
        }
        counts
    }

    #[test]
    fn weighted_slots_follow_centerness() {
        let dist = sibling_distribution(5, 1.0);
        let expected = [0.2, 1.2, 2.2, 1.2, 0.2];
        for (w, e) in dist.iter().zip(expected) {
            assert!((w - e).abs() < EPS, "{dist:?}");
        }

        // Weights above 1 are not clamped: those slots always grow.
        let counts = root_slot_counts(1.0, 2000);
        assert_eq!(&counts[1..4], &[2000, 2000, 2000]);
        for edge in [counts[0], counts[4]] {
            assert!((300..=500).contains(&edge), "{counts:?}");
        }
    }

    #[test]
    fn branch_prob_scales_slot_weights() {
        // 0.5 * 2.2 > 1 keeps the center certain; 0.5 * 1.2 and 0.5 * 0.2 do not.
        let counts = root_slot_counts(0.5, 2000);
        assert_eq!(counts[2], 2000);
        for inner in [counts[1], counts[3]] {
            assert!((1080..=1320).contains(&inner), "{counts:?}");
        }
        for edge in [counts[0], counts[4]] {
            assert!((120..=280).contains(&edge), "{counts:?}");
        }
    }

    #[test]
    fn randomized_lengths_are_not_rounded() {
        let mut t = tree();
        let fractional = (0..50).any(|seed| {
            t.randomize(&mut StdRng::seed_from_u64(seed));
            t.params().length.fract() != 0.0
        });
        assert!(fractional);
    }

    #[test]
    fn randomize_stays_in_documented_ranges() {
        let mut t = tree();
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            t.randomize(&mut rng);
            let p = t.params();
            assert!((2..=6).contains(&p.children));
            let top = suggested_max_depth(p.children).unwrap();
            assert!(p.max_depth >= 4 && p.max_depth <= top);
            assert!((0.5..=1.0).contains(&p.branch_prob));
            assert!((0.0..=0.5).contains(&p.centerness));
            assert!((-60.0..=60.0).contains(&p.curve));
            assert!(p.fan >= 0.0 && p.fan <= 360.0 - 360.0 / p.children as f64);
            assert!((15.0..=80.0).contains(&p.size));
            assert!((0.5..=1.2).contains(&p.size_grow));
            assert!(p.length >= p.size / 2.0 && p.length <= 200.0);
            assert!(p.length_grow >= p.size_grow - EPS && p.length_grow <= 1.5);
            assert_eq!(t.distribution(), sibling_distribution(p.children, p.centerness).as_slice());
            assert_eq!(p.colormap, Colormap::default());
        }
    }

    #[test]
    fn tree_supports_randomize() {
        let mut t = tree();
        assert!(t.as_randomize().is_some());
        assert_eq!(t.name(), "branch");
    }
}
