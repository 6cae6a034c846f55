//! Functions under test with deliberate, well-located defects.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use division_oracle::gold::FLOAT_DIVISORS;

/// Agrees with `reference` everywhere except at `bad`, where it is off by one.
pub fn diverges_at(reference: fn(i64) -> i64, bad: i64) -> impl Fn(i64) -> i64 {
    move |n| {
        let value = reference(n);
        if n == bad {
            value.wrapping_add(1)
        } else {
            value
        }
    }
}

/// Agrees with `reference` except at inputs with the same bits as `bad`, where it
/// returns the negated result, or zero in place of NaN.
pub fn diverges_at_float(reference: fn(f64) -> f64, bad: f64) -> impl Fn(f64) -> f64 {
    move |x| {
        let value = reference(x);
        if x.to_bits() != bad.to_bits() {
            value
        } else if value.is_nan() {
            0.0
        } else {
            -value
        }
    }
}

/// Wraps a target and counts how often it is called.
pub fn counting<F>(target: F) -> (impl Fn(i64) -> i64, Rc<Cell<u64>>)
where
    F: Fn(i64) -> i64,
{
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let wrapped = move |n| {
        counter.set(counter.get() + 1);
        target(n)
    };
    (wrapped, calls)
}

/// The float expression with the final `/ 7.0` lowered to a multiplication by the
/// rounded reciprocal. Agrees with the reference on most inputs and differs in the last
/// bit on some, including deep subnormal powers of two.
pub fn reciprocal_weight(x: f64) -> f64 {
    let (first, rest) = FLOAT_DIVISORS.split_at(1);
    let head = first[0];
    let a = rest.iter().fold(x / head, |acc, &d| acc + x / d);
    let c = rest.iter().fold(x / -head, |acc, &d| acc + x / -d);
    a + (3.0 * c) * (1.0 / 7.0)
}
