/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2024-2025 ByteDance and/or its affiliates.
 */

use std::env;

fn forward_cargo_env(cargo_var: &str, g3_var: &str) {
    let value = env::var(cargo_var).unwrap_or_else(|_| "unknown".to_string());
    println!("cargo:rustc-env={g3_var}={value}");
}

pub fn check_basic() {
    match rustc_version::version_meta() {
        Ok(rustc) => {
            println!(
                "cargo:rustc-env=G3_BUILD_RUSTC_VERSION={}",
                rustc.short_version_string
            );
            println!("cargo:rustc-env=G3_BUILD_RUSTC_CHANNEL={:?}", rustc.channel);
        }
        Err(e) => {
            println!("cargo:warning=unable to detect rustc version: {e}");
            println!("cargo:rustc-env=G3_BUILD_RUSTC_VERSION=unknown");
            println!("cargo:rustc-env=G3_BUILD_RUSTC_CHANNEL=unknown");
        }
    }

    forward_cargo_env("HOST", "G3_BUILD_HOST");
    forward_cargo_env("TARGET", "G3_BUILD_TARGET");
    forward_cargo_env("PROFILE", "G3_BUILD_PROFILE");
    forward_cargo_env("OPT_LEVEL", "G3_BUILD_OPT_LEVEL");
    forward_cargo_env("DEBUG", "G3_BUILD_DEBUG");

    if let Ok(v) = env::var("G3_PACKAGE_VERSION") {
        println!("cargo:rustc-env=G3_PACKAGE_VERSION={v}");
    }
}
