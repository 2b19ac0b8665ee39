use std::{hint::unreachable_unchecked, num::NonZeroU32};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::{Rng, SeedableRng};

use cvariant::{Alts, Optional, Variant, Visit};

#[derive(Clone, Copy)]
pub struct Params {
    value: u32,
    repeats: u8,
}

pub enum StdOp {
    Add(Params),
    Sub(Params),
    Mul(Params),
}

#[repr(C)]
pub enum COp {
    Add(Params),
    Sub(Params),
    Mul(Params),
}

pub struct Add(Params);
pub struct Sub(Params);
pub struct Mul(Params);

type VariantOp = Variant<Alts![Add, Sub, Mul]>;

#[repr(C)]
pub enum COption<T> {
    Some(T),
    None,
}

const N: usize = 100000;
fn bench_enums(c: &mut Criterion) {
    const _: () = {
        // The tagged union must cost exactly what repr(C) costs, no more.
        assert!(std::mem::size_of::<VariantOp>() == std::mem::size_of::<COp>());
        assert!(std::mem::align_of::<VariantOp>() == std::mem::align_of::<COp>());
        assert!(
            std::mem::size_of::<Optional<NonZeroU32>>()
                == std::mem::size_of::<COption<NonZeroU32>>()
        );
    };
    let rng = rand::rngs::StdRng::seed_from_u64(0);
    let ops = (0..N)
        .map({
            let mut rng = rng.clone();
            move |_| {
                (
                    rng.gen_range(0..=2u8),
                    rng.gen_range(1..=5u8),
                    rng.gen_range(0..=100u32),
                )
            }
        })
        .collect::<Vec<_>>();
    let mut std_op = Vec::with_capacity(ops.len());
    let mut c_op = Vec::with_capacity(ops.len());
    let mut variant_op = Vec::with_capacity(ops.len());
    // Baseline for constructing 100K enum values.
    c.bench_function("std_new", |b| {
        b.iter(|| {
            std_op.clear();
            for (op, repeats, value) in &ops {
                std_op.push(match op {
                    0 => StdOp::Add(Params {
                        value: *value,
                        repeats: *repeats,
                    }),
                    1 => StdOp::Sub(Params {
                        value: *value,
                        repeats: *repeats,
                    }),
                    2 => StdOp::Mul(Params {
                        value: *value,
                        repeats: *repeats,
                    }),
                    _ => unsafe { unreachable_unchecked() },
                });
            }
        });
    });
    c.bench_function("c_new", |b| {
        b.iter(|| {
            c_op.clear();
            for (op, repeats, value) in &ops {
                c_op.push(match op {
                    0 => COp::Add(Params {
                        value: *value,
                        repeats: *repeats,
                    }),
                    1 => COp::Sub(Params {
                        value: *value,
                        repeats: *repeats,
                    }),
                    2 => COp::Mul(Params {
                        value: *value,
                        repeats: *repeats,
                    }),
                    _ => unsafe { unreachable_unchecked() },
                });
            }
        });
    });
    // Converting construction resolves the position at compile time, so this
    // should stay within noise of c_new.
    c.bench_function("variant_new", |b| {
        b.iter(|| {
            variant_op.clear();
            for (op, repeats, value) in &ops {
                let params = Params {
                    value: *value,
                    repeats: *repeats,
                };
                variant_op.push(match op {
                    0 => VariantOp::new(Add(params)),
                    1 => VariantOp::new(Sub(params)),
                    2 => VariantOp::new(Mul(params)),
                    _ => unsafe { unreachable_unchecked() },
                });
            }
        });
    });

    // Baseline for executing 100K operations.
    c.bench_function("std_run", |b| {
        b.iter(|| {
            let mut result = 0;
            for op in &std_op {
                match op {
                    StdOp::Add(Params { value, repeats }) => {
                        for _ in 0..*repeats {
                            result += value
                        }
                    }
                    StdOp::Sub(Params { value, repeats }) => {
                        for _ in 0..*repeats {
                            result -= value
                        }
                    }
                    StdOp::Mul(Params { value, repeats }) => {
                        for _ in 0..*repeats {
                            result *= value
                        }
                    }
                }
            }
            black_box(result);
        });
    });
    c.bench_function("c_run", |b| {
        b.iter(|| {
            let mut result = 0;
            for op in &c_op {
                match op {
                    COp::Add(Params { value, repeats }) => {
                        for _ in 0..*repeats {
                            result += value
                        }
                    }
                    COp::Sub(Params { value, repeats }) => {
                        for _ in 0..*repeats {
                            result -= value
                        }
                    }
                    COp::Mul(Params { value, repeats }) => {
                        for _ in 0..*repeats {
                            result *= value
                        }
                    }
                }
            }
            black_box(result);
        });
    });
    // The linear tag recursion should fold to the same jump table a match
    // compiles to.
    struct Run<'a>(&'a mut u32);
    impl Visit<Add> for Run<'_> {
        type Output = ();
        fn visit(self, Add(Params { value, repeats }): &Add) {
            for _ in 0..*repeats {
                *self.0 += *value
            }
        }
    }
    impl Visit<Sub> for Run<'_> {
        type Output = ();
        fn visit(self, Sub(Params { value, repeats }): &Sub) {
            for _ in 0..*repeats {
                *self.0 -= *value
            }
        }
    }
    impl Visit<Mul> for Run<'_> {
        type Output = ();
        fn visit(self, Mul(Params { value, repeats }): &Mul) {
            for _ in 0..*repeats {
                *self.0 *= *value
            }
        }
    }
    c.bench_function("variant_run", |b| {
        b.iter(|| {
            let mut result = 0;
            for op in &variant_op {
                op.visit(Run(&mut result));
            }
            black_box(result);
        });
    });

    let ops = (0..N)
        .map({
            let mut rng = rng.clone();
            move |_| {
                (
                    rng.gen_bool(0.7),
                    NonZeroU32::new(rng.gen_range(1..=100u32)).unwrap(),
                )
            }
        })
        .collect::<Vec<_>>();
    let mut std_op = Vec::with_capacity(ops.len());
    let mut c_op = Vec::with_capacity(ops.len());
    let mut optional_op = Vec::with_capacity(ops.len());
    // `new_opt` series: pushing 100000 optionals into a pre-allocated vector.
    // Option<NonZeroU32> is niche-packed into 4 bytes; the explicit
    // discriminant costs 8, so the last two contenders churn more memory.
    c.bench_function("std_new_opt", |b| {
        b.iter(|| {
            std_op.clear();
            for (some, value) in &ops {
                std_op.push(some.then_some(*value));
            }
        });
    });
    c.bench_function("c_new_opt", |b| {
        b.iter(|| {
            c_op.clear();
            for (some, value) in &ops {
                c_op.push(match some {
                    true => COption::Some(*value),
                    false => COption::None,
                });
            }
        });
    });
    c.bench_function("optional_new_opt", |b| {
        b.iter(|| {
            optional_op.clear();
            for (some, value) in &ops {
                optional_op.push(match some {
                    true => Optional::some(*value),
                    false => Optional::none(),
                });
            }
        });
    });

    // `run_opt` series: adding all present values to a result.
    c.bench_function("std_run_opt", |b| {
        b.iter(|| {
            let mut result = 0;
            for value in std_op.iter().filter_map(Option::as_ref) {
                result += value.get()
            }
            black_box(result);
        });
    });
    c.bench_function("c_run_opt", |b| {
        b.iter(|| {
            let mut result = 0;
            for op in &c_op {
                match op {
                    COption::Some(value) => result += value.get(),
                    COption::None => {}
                }
            }
            black_box(result);
        });
    });
    c.bench_function("optional_run_opt", |b| {
        b.iter(|| {
            let mut result = 0;
            for op in optional_op.iter().filter_map(Optional::as_ref) {
                result += op.get()
            }
            black_box(result);
        });
    });
}

criterion_group!(benches, bench_enums);
criterion_main!(benches);
