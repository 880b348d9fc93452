use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use subpy_analysis::{Feature, FeatureSet, Policy, SourceUnit, check_unit, detect_unit};

const MODULE: &str = r#"
import math
from collections import defaultdict

class Matrix(object):
    def __init__(self, rows, cols, fill=0.0):
        self.rows, self.cols = rows, cols
        self.data = [[fill for _ in range(cols)] for _ in range(rows)]

    def __getitem__(self, index):
        r, c = index
        return self.data[r][c]

    def transpose(self):
        out = Matrix(self.cols, self.rows)
        for r in range(self.rows):
            for c in range(self.cols):
                out.data[c][r] = self.data[r][c]
        return out

    @staticmethod
    def identity(n):
        m = Matrix(n, n)
        for i in range(n):
            m.data[i][i] = 1.0
        return m

def histogram(words, *, key=None):
    counts = defaultdict(int)
    for word in words:
        counts[key(word) if key else word] += 1
    return {w: n for w, n in counts.items() if n > 1}

def pairs(xs):
    def step(i):
        return xs[i], xs[i + 1]
    for i in range(len(xs) - 1):
        yield step(i)

try:
    total = sum(x * 2 for x in range(100))
except ValueError as e:
    print(e)
finally:
    done = True
"#;

fn source(copies: usize) -> String {
    (0..copies)
        .map(|i| MODULE.replace("Matrix", &format!("Matrix{i}")))
        .collect()
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect");

    for copies in [1usize, 16, 128] {
        let text = source(copies);
        let unit = SourceUnit::parse(text.as_str()).expect("benchmark module must parse");
        group.throughput(Throughput::Bytes(text.len() as u64));

        group.bench_with_input(BenchmarkId::new("detect", copies), &unit, |b, u| {
            b.iter(|| detect_unit(black_box(u)).unwrap());
        });

        let strict = Policy::new(FeatureSet::full() - Feature::Generators - Feature::Closures);
        group.bench_with_input(BenchmarkId::new("check", copies), &unit, |b, u| {
            b.iter(|| check_unit(black_box(u), &strict).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("parse_and_detect", copies), &text, |b, t| {
            b.iter(|| subpy_analysis::detect(black_box(t)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_detect);
criterion_main!(benches);
