use criterion::*;
use ndarray::*;
use ndarray_quadprog::*;

fn solve_small(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_quadprog");
    for &n in &[4, 8, 16, 32] {
        group.bench_with_input(BenchmarkId::new("inequalities", n), &n, |bench, n| {
            let n = *n;
            let m = 2 * n;
            let g: Array2<f64> = random_spd(n);
            let g0: Array1<f64> = random(n);
            let x_feas: Array1<f64> = random(n);
            let ci: Array2<f64> = random((n, m));
            let slack: Array1<f64> = random(m);
            let ci0 = &slack - &ci.t().dot(&x_feas);
            let ce: Array2<f64> = Array2::zeros((n, 0));
            let ce0: Array1<f64> = Array1::zeros(0);
            bench.iter(|| solve_quadprog(&g, &g0, &ce, &ce0, &ci, &ci0).unwrap())
        });
    }
}

criterion_group!(quadprog, solve_small);
criterion_main!(quadprog);
