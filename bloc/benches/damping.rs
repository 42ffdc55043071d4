use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bloc::{ContactDamping, StepState};

fn contact_state(n: usize) -> (Vec<f64>, Vec<f64>) {
    let gaps = (0..n)
        .map(|i| if i % 3 == 0 { -1.0e-3 } else { 1.0e-3 })
        .collect();
    let velocities = (0..2 * n).map(|i| i as f64 * 1.0e-2).collect();
    (gaps, velocities)
}

fn damping(c: &mut Criterion) {
    let damping = ContactDamping::default();
    let mut group = c.benchmark_group("Contact Damping");
    for &n in &[1_000, 100_000] {
        let (gaps, mut velocities) = contact_state(n);
        group.bench_function(format!("nodal 2D {}", n), |b| {
            b.iter(|| {
                let state = StepState::nodal(&gaps, &mut velocities, 2);
                black_box(damping.apply(state).unwrap())
            })
        });
    }
    group.finish();
}

criterion_group!(benches, damping);
criterion_main!(benches);
