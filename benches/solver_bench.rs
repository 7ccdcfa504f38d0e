//! Benchmarks for the reduced static solve

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fea_static::prelude::*;

/// Multi-story frame in the XY plane; with `diaphragms` every floor is tied
/// to its first node by a rigid element for wind
fn create_multi_story_frame(stories: usize, bays: usize, diaphragms: bool) -> Model {
    let steel = Material::steel();
    let column = Section::rectangular(0.4, 0.4);
    let beam = Section::rectangular(0.3, 0.6);

    let story_height = 3.5;
    let bay_width = 6.0;

    let mut model = Model::new();
    let mut grid = vec![vec![0; bays + 1]; stories + 1];

    for (story, row) in grid.iter_mut().enumerate() {
        for (bay, slot) in row.iter_mut().enumerate() {
            let node = Node::new(bay as f64 * bay_width, story as f64 * story_height, 0.0);
            *slot = model.add_node(node).unwrap();
        }
    }

    for story in 0..stories {
        for bay in 0..=bays {
            let (i, j) = (grid[story][bay], grid[story + 1][bay]);
            model.add_element(FrameElement::new(i, j, steel, column)).unwrap();
        }
    }
    for floor in grid.iter().skip(1) {
        for pair in floor.windows(2) {
            model
                .add_element(FrameElement::new(pair[0], pair[1], steel, beam))
                .unwrap();
        }
    }

    for &base in &grid[0] {
        model.set_constraint(base, Constraint::fixed()).unwrap();
    }

    let dead = LoadCase::dead("Dead");
    let wind = LoadCase::new("Wind", LoadType::Wind);
    for floor in grid.iter().skip(1) {
        for &node in floor {
            model
                .add_nodal_load(node, NodalLoad::force(0.0, -50_000.0, 0.0, dead.clone()))
                .unwrap();
        }
        model
            .add_nodal_load(floor[0], NodalLoad::force(20_000.0, 0.0, 0.0, wind.clone()))
            .unwrap();
        if diaphragms {
            model
                .add_rigid_element(RigidElement::new(floor.clone()).for_load_type(LoadType::Wind))
                .unwrap();
        }
    }

    model
}

fn benchmark_small_frame(c: &mut Criterion) {
    c.bench_function("frame_3story_2bay_linear", |b| {
        b.iter(|| {
            let mut model = create_multi_story_frame(3, 2, false);
            model.solve(&AnalysisOptions::linear()).unwrap();
            black_box(&model);
        })
    });
}

fn benchmark_medium_frame(c: &mut Criterion) {
    c.bench_function("frame_10story_5bay_linear", |b| {
        b.iter(|| {
            let mut model = create_multi_story_frame(10, 5, false);
            model.solve(&AnalysisOptions::linear()).unwrap();
            black_box(&model);
        })
    });
}

fn benchmark_rigid_diaphragms(c: &mut Criterion) {
    c.bench_function("frame_10story_5bay_diaphragms", |b| {
        b.iter(|| {
            let mut model = create_multi_story_frame(10, 5, true);
            model.solve(&AnalysisOptions::linear()).unwrap();
            black_box(&model);
        })
    });
}

fn benchmark_iterative(c: &mut Criterion) {
    c.bench_function("frame_10story_5bay_pcg", |b| {
        b.iter(|| {
            let mut model = create_multi_story_frame(10, 5, false);
            model.solve(&AnalysisOptions::iterative()).unwrap();
            black_box(&model);
        })
    });
}

criterion_group!(
    benches,
    benchmark_small_frame,
    benchmark_medium_frame,
    benchmark_rigid_diaphragms,
    benchmark_iterative,
);

criterion_main!(benches);
