use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const LUT_SIZE: usize = 4096;

/// IEC 61966-2-1 decode curve.
fn decode(v: f64) -> f64 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// IEC 61966-2-1 encode curve.
fn encode(v: f64) -> f64 {
    if v <= 0.0031308 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn emit_table(out: &mut String, name: &str, doc: &str, curve: fn(f64) -> f64) {
    writeln!(out, "/// {doc}").unwrap();
    writeln!(out, "pub(crate) static {name}: [f32; {LUT_SIZE}] = [").unwrap();
    for i in 0..LUT_SIZE {
        let x = i as f64 / (LUT_SIZE - 1) as f64;
        write!(out, "{:.9},", curve(x) as f32).unwrap();
        if i % 8 == 7 {
            out.push('\n');
        }
    }
    writeln!(out, "];\n").unwrap();
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let mut out = String::new();

    emit_table(
        &mut out,
        "DECODE",
        "sRGB component (index / 4095) to linear light.",
        decode,
    );
    emit_table(
        &mut out,
        "ENCODE",
        "Linear light (index / 4095) to sRGB component.",
        encode,
    );

    fs::write(Path::new(&out_dir).join("gamma_lut.rs"), out).unwrap();
    println!("cargo::rerun-if-changed=build.rs");
}
