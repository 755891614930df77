//! Benchmarks for the per-frame mapping stages

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use face_keyframes::{
    action_units::ActionUnitExtractor,
    assembler::FrameAssembler,
    config::Config,
    expression::ExpressionMapper,
    gaze::{correct_pupil_depth, EyeModelTable, EyeSide, GazeEstimator},
    rotation::RotationComposer,
    tracking::{CameraIntrinsics, FrameInput, HeadPose},
};
use nalgebra::Point3;

fn eye(pupil: Point3<f64>) -> Vec<Point3<f64>> {
    (0..28)
        .map(|i| {
            let angle = f64::from(i) * std::f64::consts::TAU / 8.0;
            Point3::new(pupil.x + 5.0 * angle.cos(), pupil.y + 5.0 * angle.sin(), pupil.z)
        })
        .collect()
}

fn frame() -> FrameInput {
    let mut face = vec![Point3::new(0.0, 0.0, 500.0); 68];
    face[36] = Point3::new(-45.0, -10.0, 505.0);
    face[39] = Point3::new(-15.0, -10.0, 495.0);
    face[42] = Point3::new(15.0, -10.0, 495.0);
    face[45] = Point3::new(45.0, -10.0, 505.0);

    let codes = [1, 2, 4, 5, 6, 7, 9, 12, 15, 23, 25, 26, 45];
    FrameInput {
        head_pose: HeadPose::from_array([10.0, -20.0, 520.0, 0.1, -0.15, 0.02]),
        camera: CameraIntrinsics::from_frame_size(640, 480),
        face_landmarks: face,
        part_landmarks: vec![
            eye(Point3::new(-31.0, -9.0, 490.0)),
            eye(Point3::new(29.0, -9.0, 490.0)),
        ],
        au_presence: codes.iter().map(|c| (format!("AU{c:02}_c"), 1.0)).collect(),
        au_intensity: codes.iter().map(|c| (format!("AU{c:02}_r"), 1.5)).collect(),
    }
}

fn benchmark_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("stages");
    let config = Config::default();
    let input = frame();

    let extractor = ActionUnitExtractor::default();
    group.bench_function("extract_action_units", |b| {
        b.iter(|| black_box(extractor.extract(&input.au_presence, &input.au_intensity)));
    });

    let au = extractor.extract(&input.au_presence, &input.au_intensity);
    let mapper = ExpressionMapper::new(&config.expression);
    group.bench_function("map_expression", |b| {
        b.iter(|| black_box(mapper.map(black_box(&au))));
    });

    let estimator = GazeEstimator::new(EyeModelTable::from_config(&config.tracker), &config.gaze);
    group.bench_function("estimate_gaze", |b| {
        b.iter(|| black_box(estimator.estimate(EyeSide::Left, &input).ok()));
    });

    group.bench_function("correct_pupil_depth", |b| {
        let pupil = Point3::new(-31.0, -9.0, 490.0);
        let left = Point3::new(-45.0, -10.0, 505.0);
        let right = Point3::new(-15.0, -10.0, 495.0);
        b.iter(|| black_box(correct_pupil_depth(&pupil, &left, &right, 500.0).ok()));
    });

    let composer = RotationComposer::new(&config.head, &config.gaze);
    group.bench_function("head_rotation", |b| {
        b.iter(|| black_box(composer.head_rotation(black_box(&input.head_pose))));
    });

    group.finish();
}

fn benchmark_assembler(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembler");
    let assembler = FrameAssembler::new(&Config::default()).expect("default config is valid");
    let input = frame();

    group.bench_function("assemble_frame", |b| {
        b.iter(|| black_box(assembler.assemble(0, black_box(&input))));
    });

    let recording: Vec<Option<FrameInput>> = (0..100).map(|i| (i % 10 != 0).then(frame)).collect();
    group.bench_function("stream_100_frames", |b| {
        b.iter(|| black_box(assembler.stream(recording.iter().cloned()).count()));
    });

    group.finish();
}

criterion_group!(benches, benchmark_stages, benchmark_assembler);
criterion_main!(benches);
