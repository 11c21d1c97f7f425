use core::ffi::c_int;
use serde_json::json;
use std::{
    panic::{AssertUnwindSafe, catch_unwind},
    ptr, slice,
};

pub mod cli;
pub mod utilities;
pub use utilities::{
    InvalidParam, KMeansError, KMeansOptions, KMeansResult, Matrix, RunState, Session,
    StopPolicy, kmeans, kmeans_from,
    parse::{format_centroids, read_dataset, read_points, write_centroids},
};

const OK: c_int = 0;
const ERR_INVALID_ARGS: c_int = 1;
const ERR_PANIC: c_int = 2;
const ERR_CONFIG: c_int = 3;
const ERR_PARSE: c_int = 4;
const ERR_ALLOC: c_int = 5;

#[repr(C)]
pub struct Buf {
    pub ptr: *mut u8,
    pub len: usize,
}

/// Run options as passed by a host runtime. Non-positive or non-finite
/// fields fall back to the defaults.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CKMeansOptions {
    pub max_iter: c_int,
    pub epsilon: f64,
    pub stable: c_int,
    pub cores: c_int,
}

#[cfg(all(target_arch = "wasm32", not(target_os = "wasi")))]
#[link(wasm_import_module = "env")]
unsafe extern "C" {
    fn js_log(ptr: *const u8, len: usize);
}

#[inline]
pub fn log_json<T: serde::Serialize>(v: &T) {
    if let Ok(s) = serde_json::to_string_pretty(v) {
        #[cfg(all(target_arch = "wasm32", not(target_os = "wasi")))]
        unsafe {
            js_log(s.as_ptr(), s.len());
        }

        #[cfg(not(all(target_arch = "wasm32", not(target_os = "wasi"))))]
        eprintln!("{s}");
    }
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn alloc(size: usize) -> *mut u8 {
    if size == 0 {
        return core::ptr::null_mut();
    }
    let mut v = Vec::<u8>::with_capacity(size);
    let p = v.as_mut_ptr();
    core::mem::forget(v);
    p
}

#[unsafe(no_mangle)]
pub unsafe extern "C" fn free_(ptr_raw: *mut u8, size: usize) {
    if !ptr_raw.is_null() {
        let _ = unsafe { Vec::<u8>::from_raw_parts(ptr_raw, size, size) };
    }
}

/// Clusters `n` points of dimension `d` (row-major in `data_ptr`) into `k`
/// groups. `init_ptr` may hold `k * d` starting centroids; when null the
/// first `k` points are used. Final centroids are written to
/// `out_centroids` as raw little-endian `f64`; when `out_json` is not null
/// the full result is written there as JSON.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn kmeans_fit(
    data_ptr: *const f64,
    n: usize,
    d: usize,
    k: usize,
    init_ptr: *const f64,
    options: *const CKMeansOptions,
    verbose: c_int,
    out_centroids: *mut Buf,
    out_json: *mut Buf,
) -> c_int {
    if data_ptr.is_null() || out_centroids.is_null() || d == 0 {
        return ERR_INVALID_ARGS;
    }
    let run = || -> Result<(), c_int> {
        let len = f64_len(n, d).ok_or(ERR_INVALID_ARGS)?;
        let xs = unsafe { slice::from_raw_parts(data_ptr, len) };
        let data = Matrix::from_slice(xs, n, d).map_err(|e| error_code(&e))?;
        let opts = build_kmeans_options(options);

        let result = if init_ptr.is_null() {
            kmeans(&data, k, Some(opts))
        } else {
            let klen = f64_len(k, d).ok_or(ERR_INVALID_ARGS)?;
            let cs = unsafe { slice::from_raw_parts(init_ptr, klen) };
            let initial = Matrix::from_slice(cs, k, d).map_err(|e| error_code(&e))?;
            kmeans_from(&data, initial, Some(opts))
        }
        .map_err(|e| error_code(&e))?;

        if verbose != 0 {
            log_json(&json!({
                "n": n,
                "d": d,
                "k": k,
                "iterations": result.iterations,
                "state": result.state,
                "movement": result.movement,
                "sizes": result.cluster_sizes(),
                "inertia": result.inertia(&data).ok(),
            }));
        }

        if !out_json.is_null() {
            let s = result.to_json().map_err(|_| ERR_PARSE)?;
            write_buf(out_json, s.into_bytes().into_boxed_slice());
        }
        write_buf(out_centroids, f64_slice_to_u8_box(result.centroids.as_slice()));
        Ok(())
    };
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

/// Text in, text out: comma-separated points, one per line, and the final
/// centroids with four decimals.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn kmeans_fit_text(
    text_ptr: *const u8,
    text_len: usize,
    k: usize,
    options: *const CKMeansOptions,
    out_text: *mut Buf,
) -> c_int {
    if text_ptr.is_null() || out_text.is_null() {
        return ERR_INVALID_ARGS;
    }
    let res = catch_unwind(AssertUnwindSafe(|| -> Result<(), c_int> {
        let text = unsafe { slice::from_raw_parts(text_ptr, text_len) };
        let data = read_points(text).map_err(|e| error_code(&e))?;
        let result = kmeans(&data, k, Some(build_kmeans_options(options)))
            .map_err(|e| error_code(&e))?;
        let s = format_centroids(&result.centroids);
        write_buf(out_text, s.into_bytes().into_boxed_slice());
        Ok(())
    }));
    match res {
        Ok(Ok(())) => OK,
        Ok(Err(code)) => code,
        Err(_) => ERR_PANIC,
    }
}

fn error_code(e: &KMeansError) -> c_int {
    match e {
        KMeansError::InvalidConfiguration(_) | KMeansError::WorkerPool(_) => ERR_CONFIG,
        KMeansError::MalformedInput { .. } => ERR_PARSE,
        KMeansError::ResourceExhaustion { .. } => ERR_ALLOC,
    }
}

/// Element count of a `rows x cols` f64 buffer, if its byte size fits in
/// `isize`.
fn f64_len(rows: usize, cols: usize) -> Option<usize> {
    let len = rows.checked_mul(cols)?;
    (len <= isize::MAX as usize / size_of::<f64>()).then_some(len)
}

fn f64_slice_to_u8_box(v: &[f64]) -> Box<[u8]> {
    let mut out = Vec::<u8>::with_capacity(v.len() * 8);
    for x in v {
        out.extend_from_slice(&x.to_le_bytes());
    }
    out.into_boxed_slice()
}

fn write_buf(out: *mut Buf, bytes: Box<[u8]>) {
    let len = bytes.len();
    let ptr_bytes = Box::into_raw(bytes) as *mut u8;
    unsafe {
        ptr::write_unaligned(
            out,
            Buf {
                ptr: ptr_bytes,
                len,
            },
        )
    };
}

fn build_kmeans_options(options: *const CKMeansOptions) -> KMeansOptions {
    let defaults = KMeansOptions::default();
    if options.is_null() {
        return defaults;
    }
    let o = unsafe { *options };
    KMeansOptions {
        max_iter: if o.max_iter > 0 {
            o.max_iter as usize
        } else {
            defaults.max_iter
        },
        epsilon: if o.epsilon.is_finite() && o.epsilon >= 0.0 {
            o.epsilon
        } else {
            defaults.epsilon
        },
        stop: if o.stable != 0 {
            StopPolicy::Stable
        } else {
            StopPolicy::Threshold
        },
        cores: if o.cores > 0 {
            o.cores as usize
        } else {
            defaults.cores
        },
    }
}
