//! Build script for callbacks
//!
//! Records the C compiler cc would use as `CALLBACKS_C_COMPILER`, so the
//! C ABI tests can build a C program against the staticlib and
//! `include/callbacks.h`. Empty when no compiler is found.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let compiler = match cc::Build::new().cargo_metadata(false).try_get_compiler() {
        Ok(compiler) if !compiler.is_like_msvc() => compiler.path().to_string_lossy().into_owned(),
        Ok(_) => String::new(),
        Err(e) => {
            println!("cargo:warning=No C compiler for the C ABI tests: {}", e);
            String::new()
        }
    };
    println!("cargo:rustc-env=CALLBACKS_C_COMPILER={}", compiler);
}
