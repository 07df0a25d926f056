use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mocap_anim_parser::parse::{load_amc_from_string, load_asf_from_string, load_bvh_from_string};
use mocap_anim_parser::LoadOptions;
use std::fmt::Write;

const SKELETON_ASF: &str = include_str!("../tests/data/skeleton.asf");
const SKELETON_AMC: &str = include_str!("../tests/data/skeleton.amc");

// single chain of `depth` joints below the root, `frames` frames of motion
fn chain_bvh(depth: usize, frames: usize) -> String {
    let mut bvh = String::from("HIERARCHY\nROOT Hips\n{\nOFFSET 0 0 0\n");
    bvh.push_str("CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation\n");
    for i in 0..depth {
        let _ = write!(
            bvh,
            "JOINT Bone{}\n{{\nOFFSET 0 1 0\nCHANNELS 3 Zrotation Xrotation Yrotation\n",
            i
        );
    }
    bvh.push_str("End Site\n{\nOFFSET 0 1 0\n}\n");
    for _ in 0..=depth {
        bvh.push_str("}\n");
    }

    let _ = write!(bvh, "MOTION\nFrames: {}\nFrame Time: 0.008333\n", frames);
    let values = 6 + 3 * depth;
    for frame in 0..frames {
        let line: Vec<String> = (0..values)
            .map(|v| format!("{:.4}", ((frame * 7 + v) % 360) as f64 * 0.5))
            .collect();
        bvh.push_str(&line.join(" "));
        bvh.push('\n');
    }
    bvh
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let bvh = chain_bvh(30, 600);
    let options = LoadOptions::default();
    let asf = load_asf_from_string(SKELETON_ASF, &options).unwrap();

    let mut group = c.benchmark_group("parse");
    group.sample_size(10);
    group.bench_function("bvh chain", |b| {
        b.iter(|| black_box(load_bvh_from_string(black_box(&bvh)).unwrap()))
    });
    group.bench_function("asf", |b| {
        b.iter(|| black_box(load_asf_from_string(black_box(SKELETON_ASF), &options).unwrap()))
    });
    group.bench_function("amc", |b| {
        b.iter(|| black_box(load_amc_from_string(black_box(SKELETON_AMC), &asf, &options).unwrap()))
    });
    group.finish();

    let (mut skeleton, motion) = load_bvh_from_string(&bvh).unwrap();
    c.bench_function("pose + world transforms", |b| {
        b.iter(|| {
            for frame in 0..motion.frame_count() {
                skeleton.set_pose(&motion, frame);
                black_box(skeleton.world_transforms());
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
