// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::env;

fn main() {
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();

    match target_os.as_str() {
        "macos" => {
            println!("cargo:warning=Building for macOS, enable the `metal` feature for GPU inference");
        }
        "linux" | "windows" => {
            println!("cargo:warning=Building for {}, enable the `cuda` feature for GPU inference", target_os);
        }
        _ => {}
    }

    println!("cargo:rerun-if-changed=proto/clip_service.proto");
    println!("cargo:rerun-if-changed=proto/ocr_service.proto");

    tonic_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(
            &["proto/clip_service.proto", "proto/ocr_service.proto"],
            &["proto/"],
        )
        .expect("Failed to compile proto files");
}
