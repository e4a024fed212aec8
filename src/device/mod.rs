// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::model::DeviceType;
use candle_core::Device;

/// Resolves a configured device to a candle [`Device`].
///
/// Accelerators that are not compiled in or not present fall back to CPU.
pub fn select_device(device_type: DeviceType) -> Device {
    match device_type {
        DeviceType::Cpu => {
            tracing::info!("Using CPU");
            Device::Cpu
        }
        DeviceType::Cuda(ordinal) => {
            if !candle_core::utils::cuda_is_available() {
                tracing::warn!("CUDA requested but not available, falling back to CPU");
                return Device::Cpu;
            }
            match Device::new_cuda(ordinal) {
                Ok(device) => {
                    tracing::info!("Using CUDA GPU {}", ordinal);
                    device
                }
                Err(e) => {
                    tracing::warn!("Failed to open CUDA device {}: {}, falling back to CPU", ordinal, e);
                    Device::Cpu
                }
            }
        }
        DeviceType::Metal(ordinal) => {
            if !candle_core::utils::metal_is_available() {
                tracing::warn!("Metal requested but not available, falling back to CPU");
                return Device::Cpu;
            }
            match Device::new_metal(ordinal) {
                Ok(device) => {
                    tracing::info!("Using Metal GPU {}", ordinal);
                    device
                }
                Err(e) => {
                    tracing::warn!("Failed to open Metal device {}: {}, falling back to CPU", ordinal, e);
                    Device::Cpu
                }
            }
        }
    }
}

pub fn device_label(device: &Device) -> &'static str {
    if device.is_cuda() {
        "cuda"
    } else if device.is_metal() {
        "metal"
    } else {
        "cpu"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_selected() {
        let device = select_device(DeviceType::Cpu);
        assert!(device.is_cpu());
        assert_eq!(device_label(&device), "cpu");
    }

    #[cfg(not(any(feature = "cuda", feature = "metal")))]
    #[test]
    fn test_accelerator_falls_back_without_feature() {
        assert!(select_device(DeviceType::Cuda(0)).is_cpu());
        assert!(select_device(DeviceType::Metal(1)).is_cpu());
    }
}
