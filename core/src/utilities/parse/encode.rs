use std::fmt::Write as _;
use std::io;

use crate::utilities::structs::Matrix;

/// One centroid per line, four decimals, comma-separated.
pub fn format_centroids(m: &Matrix) -> String {
    let mut out = String::with_capacity(m.rows() * m.cols() * 8);
    for row in m.iter_rows() {
        for (j, v) in row.iter().enumerate() {
            if j > 0 {
                out.push(',');
            }
            let _ = write!(out, "{v:.4}");
        }
        out.push('\n');
    }
    out
}

pub fn write_centroids<W: io::Write>(w: &mut W, m: &Matrix) -> io::Result<()> {
    w.write_all(format_centroids(m).as_bytes())?;
    w.flush()
}
