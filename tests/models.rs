//! End-to-end scenarios through the public API.

use canvart::branch::{sibling_distribution, suggested_max_depth};
use canvart::canvas::DrawOp;
use canvart::config::Background;
use canvart::harmonograph::color_position;
use canvart::{
    BranchTree, Canvas, Colormap, Harmonograph, Model, RasterCanvas, Randomize, RecordingCanvas,
    Size, Studio,
};
use rand::prelude::*;

fn record(model: &mut dyn Model, seed: u64) -> RecordingCanvas {
    let mut canvas = RecordingCanvas::new(1000, 800);
    let mut rng = StdRng::seed_from_u64(seed);
    model.go(&mut canvas, &mut rng).unwrap();
    canvas
}

#[test]
fn binary_tree_of_depth_three() {
    let mut tree = BranchTree::new(Size::new(1000, 800));
    tree.set_children(2).unwrap();
    tree.set_max_depth(3).unwrap();
    tree.set_branch_prob(1.0).unwrap();
    record(&mut tree, 1);

    let depths: Vec<u32> = tree.nodes().iter().map(|n| n.depth).collect();
    assert_eq!(depths.len(), 15);
    assert_eq!(depths, vec![0, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3]);
}

#[test]
fn full_trees_match_geometric_series() {
    for (children, depth) in [(2u32, 5u32), (3, 4), (5, 3)] {
        let mut tree = BranchTree::new(Size::new(1000, 800));
        tree.set_children(children).unwrap();
        tree.set_max_depth(depth).unwrap();
        record(&mut tree, 7);
        let expected = (children.pow(depth + 1) - 1) / (children - 1);
        assert_eq!(tree.nodes().len() as u32, expected);
    }
}

#[test]
fn zero_centerness_is_uniform() {
    for n in 1..=10 {
        assert!(sibling_distribution(n, 0.0).iter().all(|&w| w == 1.0));
    }
}

#[test]
fn one_child_has_no_depth_suggestion() {
    assert_eq!(suggested_max_depth(1), None);
    let mut tree = BranchTree::new(Size::new(100, 100));
    tree.set_max_depth(20).unwrap();
    tree.set_children(1).unwrap();
    assert_eq!(tree.params().max_depth, 20);
    assert_eq!(tree.suggested_max_depth(), None);
}

#[test]
fn suggested_depth_keeps_trees_near_budget() {
    for n in 2..=12u32 {
        let depth = suggested_max_depth(n).unwrap();
        let nodes = (n as u64).pow(depth + 1).saturating_sub(1) / (n as u64 - 1);
        let fewer = ((n as u64).pow(depth) - 1) / (n as u64 - 1);
        assert!(fewer <= 10_000, "n={n} depth={depth}");
        assert!(nodes > 1_000, "n={n} depth={depth} nodes={nodes}");
    }
}

#[test]
fn harmonograph_rests_at_origin_without_amplitude() {
    let mut h = Harmonograph::new(Size::new(1000, 800));
    for i in 0..4 {
        h.set_amplitude(i, 0.0).unwrap();
    }
    assert_eq!(h.pos(0.0), h.origin());
    assert_eq!(h.origin(), (500.0, 400.0));
}

#[test]
fn harmonograph_color_ping_pong() {
    assert!((color_position(100.0) - 1.0).abs() < 1e-12);
    assert!((color_position(150.0) - 0.5).abs() < 1e-12);
    let h = Harmonograph::new(Size::new(10, 10));
    assert_eq!(h.color_at(150.0), h.color_at(50.0));
    assert_eq!(h.color_at(100.0), Colormap::default().sample(1.0));
}

#[test]
fn reset_twice_gives_identical_parameters() {
    let mut rng = StdRng::seed_from_u64(99);

    let mut tree = BranchTree::new(Size::new(640, 480));
    tree.randomize(&mut rng);
    tree.reset();
    let once = tree.params().clone();
    tree.reset();
    assert_eq!(tree.params(), &once);

    let mut h = Harmonograph::new(Size::new(640, 480));
    h.randomize(&mut rng);
    h.reset();
    let once = *h.pendulums();
    h.reset();
    assert_eq!(h.pendulums(), &once);
}

#[test]
fn still_pendulum_draws_a_fixed_offset() {
    let mut h = Harmonograph::new(Size::new(1000, 800));
    for i in 0..4 {
        h.set_amplitude(i, 0.0).unwrap();
    }
    h.set_amplitude(0, 100.0).unwrap();
    h.set_frequency(0, 0.0).unwrap();
    h.set_phase(0, 0.0).unwrap();
    h.set_decay(0, 0.0).unwrap();

    let canvas = record(&mut h, 0);
    let (x0, y0) = h.origin();
    let last = canvas.lines().last().unwrap();
    match last {
        DrawOp::Line { to, .. } => assert_eq!(*to, (x0 + 100.0, y0)),
        _ => unreachable!(),
    }
    assert_eq!(canvas.lines().count(), 10_000);
}

#[test]
fn same_seed_same_picture() {
    let picture = |seed| {
        let mut studio = Studio::new(Background::White, StdRng::seed_from_u64(seed));
        studio.register(Box::new(BranchTree::new(Size::new(320, 240))));
        studio.randomize().unwrap();
        let mut canvas = RasterCanvas::new(320, 240, Background::White.color());
        studio.go(&mut canvas).unwrap();
        canvas.image().clone()
    };
    assert_eq!(picture(5), picture(5));
}

#[test]
fn tree_paints_pixels_on_a_raster() {
    let mut tree = BranchTree::new(Size::new(200, 200));
    let mut canvas = RasterCanvas::new(200, 200, Background::Black.color());
    let mut rng = StdRng::seed_from_u64(3);
    tree.go(&mut canvas, &mut rng).unwrap();

    let root = Colormap::default().sample(0.0);
    assert_eq!(*canvas.image().get_pixel(100, 100), root);
    assert_eq!(canvas.width(), 200);
}

#[test]
fn config_can_name_any_dropdown_colormap() {
    let settings = canvart::settings::Settings::parse(
        "[branch]\ncolormap = \"Spectral\"\n[harmonograph]\ncolormap = \"gist_ncar\"\n",
    )
    .unwrap();

    let mut tree = BranchTree::new(Size::new(320, 240));
    tree.apply(&settings.branch).unwrap();
    assert_eq!(tree.params().colormap.name(), "Spectral");

    let mut h = Harmonograph::new(Size::new(320, 240));
    h.apply(&settings.harmonograph).unwrap();
    assert_eq!(h.colormap().name(), "gist_ncar");
}
