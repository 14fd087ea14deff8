use which::which;

/// Building this crate has an undeclared dependency on the `bpf-linker` binary. This would be
/// better expressed as a [artifact-dependency][bindeps] but issues such as
/// https://github.com/rust-lang/cargo/issues/12385 make their use impractical for the time being.
///
/// This file implements an imperfect but intuitive workaround: it causes cargo to rebuild the crate
/// whenever the `bpf-linker` binary changes (i.e. via `cargo install bpf-linker`), and as a result
/// whenever the eBPF code changes.
///
/// [bindeps]: https://doc.rust-lang.org/nightly/cargo/reference/unstable.html#artifact-dependencies
fn main() {
	let bpf_linker = which("bpf-linker").unwrap();
	println!("cargo:rerun-if-changed={}", bpf_linker.to_str().unwrap());
}
