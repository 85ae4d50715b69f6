fn main() {
  // `static/` is embedded by the server; pick up a fresh `wasm-pack` output.
  println!("cargo:rerun-if-changed=static");
}
