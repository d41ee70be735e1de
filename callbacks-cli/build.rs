//! Build script for callbacks-cli
//!
//! Compiles the C plugin fixture used by the tests into a shared library and
//! exposes its path as `CALLBACKS_FIXTURE_PLUGIN`. The variable is empty when
//! no suitable C compiler is found; the plugin tests are skipped then.

use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=tests/fixtures/plugin.c");

    let plugin = build_plugin_fixture().unwrap_or_default();
    println!("cargo:rustc-env=CALLBACKS_FIXTURE_PLUGIN={}", plugin);
}

fn build_plugin_fixture() -> Option<String> {
    let target = env::var("TARGET").ok()?;
    if target.contains("windows") {
        println!("cargo:warning=Plugin fixture is not built on Windows targets");
        return None;
    }

    let compiler = match cc::Build::new().cargo_metadata(false).try_get_compiler() {
        Ok(compiler) => compiler,
        Err(e) => {
            println!("cargo:warning=No C compiler for the plugin fixture: {}", e);
            return None;
        }
    };

    let extension = if target.contains("apple") { "dylib" } else { "so" };
    let out_dir = PathBuf::from(env::var("OUT_DIR").ok()?);
    let library = out_dir.join(format!("libcallbacks_fixture.{}", extension));
    let source = PathBuf::from(env::var("CARGO_MANIFEST_DIR").ok()?)
        .join("tests")
        .join("fixtures")
        .join("plugin.c");

    let status = compiler
        .to_command()
        .args(["-shared", "-fPIC", "-o"])
        .arg(&library)
        .arg(&source)
        .status();

    match status {
        Ok(status) if status.success() => Some(library.to_string_lossy().into_owned()),
        Ok(status) => {
            println!("cargo:warning=Plugin fixture compilation failed: {}", status);
            None
        }
        Err(e) => {
            println!("cargo:warning=Could not run the C compiler: {}", e);
            None
        }
    }
}
