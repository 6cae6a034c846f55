//! Safe wrappers around the generated functions in `libdivision_target`.

mod ffi {
    unsafe extern "C" {
        pub fn calculate_div_p2(n: i64) -> i64;
        pub fn calculate_div_ext(n: i64) -> i64;
        pub fn calculate_fdiv_p2(x: f64) -> f64;
    }
}

pub fn calculate_div_p2(n: i64) -> i64 {
    // SAFETY: the generated function takes and returns a plain i64 in registers,
    // touches no memory and is defined for every input.
    unsafe { ffi::calculate_div_p2(n) }
}

pub fn calculate_div_ext(n: i64) -> i64 {
    // SAFETY: same contract as `calculate_div_p2`.
    unsafe { ffi::calculate_div_ext(n) }
}

pub fn calculate_fdiv_p2(x: f64) -> f64 {
    // SAFETY: the generated function takes and returns a plain f64 in registers,
    // touches no memory and is defined for every input, NaN included.
    unsafe { ffi::calculate_fdiv_p2(x) }
}
